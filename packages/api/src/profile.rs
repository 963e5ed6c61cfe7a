//! Public profile pages, addressed as `/perfiles/<username-or-id>`.
//!
//! The segment is tried as a username first. Only when that finds nothing and
//! the segment has the canonical UUID shape is it tried as an id.

use store::query::{from_rows, to_row};
use store::{
    fetch, fetch_one, Backend, Filter, Profile, ProfilePatch, Project, Query, SessionUser,
    SocialLinks, StoreError,
};

use crate::error::ApiError;
use crate::events::{AppEvent, EventBus};
use crate::upload::ImageFile;

/// How the viewer relates to the profile on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileAccess {
    Owner,
    Visitor,
    /// No session. The page renders behind a call-to-register overlay.
    Anonymous,
}

impl ProfileAccess {
    pub fn of(session: Option<&SessionUser>, profile_id: &str) -> Self {
        match session {
            Some(user) if user.id == profile_id => ProfileAccess::Owner,
            Some(_) => ProfileAccess::Visitor,
            None => ProfileAccess::Anonymous,
        }
    }

    pub fn is_owner(self) -> bool {
        self == ProfileAccess::Owner
    }

    pub fn is_obscured(self) -> bool {
        self == ProfileAccess::Anonymous
    }
}

/// Hyphenated 8-4-4-4-12 hex form only.
pub fn looks_like_uuid(s: &str) -> bool {
    s.len() == 36 && uuid::Uuid::try_parse(s).is_ok()
}

/// Find a profile by username, then by id if the segment is UUID-shaped.
pub async fn resolve_profile<B: Backend>(
    backend: &B,
    segment: &str,
) -> Result<Option<Profile>, StoreError> {
    let by_username = Query::table("profiles").eq("username", segment);
    if let Some(profile) = fetch_one::<Profile, B>(backend, &by_username).await? {
        return Ok(Some(profile));
    }
    if looks_like_uuid(segment) {
        let by_id = Query::table("profiles").eq("id", segment);
        return fetch_one(backend, &by_id).await;
    }
    Ok(None)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfilePage {
    pub profile: Profile,
    pub access: ProfileAccess,
    /// Public projects, or every project when the owner is looking.
    pub projects: Vec<Project>,
}

/// Resolve and load a profile page, broadcasting the ownership flag.
pub async fn load_profile_page<B: Backend>(
    backend: &B,
    events: &EventBus,
    segment: &str,
) -> Result<ProfilePage, ApiError> {
    let profile = resolve_profile(backend, segment)
        .await?
        .ok_or_else(|| ApiError::NotFound("Perfil".to_string()))?;
    let session = backend.current_user().await?;
    let access = ProfileAccess::of(session.as_ref(), &profile.id);

    let mut query = Query::table("projects")
        .eq("creator_id", profile.id.as_str())
        .order("created_at", false);
    if !access.is_owner() {
        query = query.eq("visibility", "public");
    }
    let projects = match fetch::<Project, B>(backend, &query).await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::warn!("Projects for profile {} unavailable: {}", profile.id, e);
            Vec::new()
        }
    };

    tracing::info!(profile = %profile.username, ?access, "Profile loaded");
    events.publish(AppEvent::OwnershipChanged(access.is_owner()));
    Ok(ProfilePage {
        profile,
        access,
        projects,
    })
}

async fn require_owner<B: Backend>(backend: &B, profile_id: &str) -> Result<SessionUser, ApiError> {
    let user = backend
        .current_user()
        .await?
        .ok_or(ApiError::NotAuthenticated)?;
    if user.id != profile_id {
        tracing::warn!(user_id = %user.id, profile_id, "Refused edit of foreign profile");
        return Err(ApiError::NotOwner);
    }
    Ok(user)
}

/// Editable profile fields, as typed. Skills are comma separated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileForm {
    pub full_name: String,
    pub profession: String,
    pub bio: String,
    pub skills: String,
    pub website: String,
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
}

fn blank_to_none(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ProfileForm {
    pub fn from_profile(profile: &Profile) -> Self {
        let links = &profile.social_links;
        Self {
            full_name: profile.full_name.clone().unwrap_or_default(),
            profession: profile.profession.clone().unwrap_or_default(),
            bio: profile.bio.clone().unwrap_or_default(),
            skills: profile.skills.join(", "),
            website: links.website.clone().unwrap_or_default(),
            github: links.github.clone().unwrap_or_default(),
            linkedin: links.linkedin.clone().unwrap_or_default(),
            twitter: links.twitter.clone().unwrap_or_default(),
        }
    }

    /// Every field is sent, so clearing one clears it on the profile.
    pub fn to_patch(&self) -> ProfilePatch {
        ProfilePatch {
            full_name: Some(self.full_name.trim().to_string()),
            profession: Some(self.profession.trim().to_string()),
            bio: Some(self.bio.trim().to_string()),
            avatar_url: None,
            skills: Some(crate::experience::merge_skills(
                &[],
                &self.skills.split(',').map(str::to_string).collect::<Vec<_>>(),
            )),
            social_links: Some(SocialLinks {
                website: blank_to_none(&self.website),
                github: blank_to_none(&self.github),
                linkedin: blank_to_none(&self.linkedin),
                twitter: blank_to_none(&self.twitter),
            }),
        }
    }
}

/// Owner-only edit. Returns the stored profile.
pub async fn update_profile<B: Backend>(
    backend: &B,
    profile_id: &str,
    patch: &ProfilePatch,
) -> Result<Profile, ApiError> {
    require_owner(backend, profile_id).await?;
    let rows = backend
        .update("profiles", to_row(patch)?, &[Filter::eq("id", profile_id)])
        .await?;
    let mut profiles: Vec<Profile> = from_rows(rows)?;
    profiles
        .pop()
        .ok_or_else(|| ApiError::NotFound("Perfil".to_string()))
}

/// Owner-only avatar upload; stores the public URL on the profile.
pub async fn upload_avatar<B: Backend>(
    backend: &B,
    bucket: &str,
    profile_id: &str,
    image: &ImageFile,
) -> Result<Profile, ApiError> {
    let user = require_owner(backend, profile_id).await?;
    let path = image.storage_path(&user.id);
    backend
        .upload(bucket, &path, image.bytes.clone(), &image.content_type)
        .await?;
    let patch = ProfilePatch {
        avatar_url: Some(backend.public_url(bucket, &path)),
        ..Default::default()
    };
    update_profile(backend, profile_id, &patch).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use store::{MemoryBackend, UserMetadata};

    const ANA_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    fn backend() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend.seed(
            "profiles",
            vec![json!({"id": ANA_ID, "username": "ana", "full_name": "Ana Pérez"})],
        );
        backend.seed(
            "projects",
            vec![
                json!({"id": "p1", "slug": "a", "title": "A", "creator_id": ANA_ID, "visibility": "public"}),
                json!({"id": "p2", "slug": "b", "title": "B", "creator_id": ANA_ID, "visibility": "draft"}),
            ],
        );
        backend
    }

    fn session(id: &str) -> SessionUser {
        SessionUser {
            id: id.into(),
            email: "x@example.com".into(),
            metadata: UserMetadata::default(),
        }
    }

    #[test]
    fn test_uuid_shape() {
        assert!(looks_like_uuid(ANA_ID));
        assert!(!looks_like_uuid("0f8fad5bd9cb469fa16570867728950e"));
        assert!(!looks_like_uuid("ana"));
    }

    #[test]
    fn test_access() {
        assert_eq!(ProfileAccess::of(None, ANA_ID), ProfileAccess::Anonymous);
        assert_eq!(ProfileAccess::of(Some(&session(ANA_ID)), ANA_ID), ProfileAccess::Owner);
        assert_eq!(ProfileAccess::of(Some(&session("otro")), ANA_ID), ProfileAccess::Visitor);
        assert!(ProfileAccess::Anonymous.is_obscured());
    }

    #[tokio::test]
    async fn test_resolve_by_username_then_id() {
        let backend = backend();
        assert_eq!(resolve_profile(&backend, "ana").await.unwrap().unwrap().id, ANA_ID);
        assert_eq!(
            resolve_profile(&backend, ANA_ID).await.unwrap().unwrap().username,
            "ana"
        );
        assert!(resolve_profile(&backend, "nadie").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_anonymous_page_hides_drafts_and_broadcasts() {
        let backend = backend();
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let page = load_profile_page(&backend, &events, "ana").await.unwrap();
        assert_eq!(page.access, ProfileAccess::Anonymous);
        assert_eq!(page.projects.len(), 1);
        assert_eq!(rx.recv().await.unwrap(), AppEvent::OwnershipChanged(false));
    }

    #[tokio::test]
    async fn test_owner_sees_everything() {
        let backend = backend();
        backend.sign_in_as(session(ANA_ID));
        let page = load_profile_page(&backend, &EventBus::new(), ANA_ID).await.unwrap();
        assert!(page.access.is_owner());
        assert_eq!(page.projects.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let err = load_profile_page(&backend(), &EventBus::new(), "nadie")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_only_owner_updates() {
        let backend = backend();
        let patch = ProfilePatch {
            bio: Some("Hola".into()),
            ..Default::default()
        };
        backend.sign_in_as(session("intruso"));
        assert!(matches!(
            update_profile(&backend, ANA_ID, &patch).await,
            Err(ApiError::NotOwner)
        ));
        assert!(backend.calls().is_empty());

        backend.sign_in_as(session(ANA_ID));
        let updated = update_profile(&backend, ANA_ID, &patch).await.unwrap();
        assert_eq!(updated.bio.as_deref(), Some("Hola"));
        assert_eq!(updated.full_name.as_deref(), Some("Ana Pérez"));
    }

    #[tokio::test]
    async fn test_avatar_upload_sets_url() {
        let backend = backend();
        backend.sign_in_as(session(ANA_ID));
        let image = ImageFile::new("yo.jpg", "image/jpeg", vec![9]);
        let profile = upload_avatar(&backend, "avatars", ANA_ID, &image).await.unwrap();
        let url = profile.avatar_url.unwrap();
        assert!(url.starts_with(&format!("memory://avatars/{ANA_ID}/")));
    }

    #[test]
    fn test_profile_form_patch() {
        let form = ProfileForm {
            full_name: " Ana Pérez ".into(),
            skills: "Rust, rust, ,SQL".into(),
            github: "https://github.com/ana".into(),
            twitter: "  ".into(),
            ..Default::default()
        };
        let patch = form.to_patch();
        assert_eq!(patch.full_name.as_deref(), Some("Ana Pérez"));
        assert_eq!(patch.skills, Some(vec!["Rust".to_string(), "SQL".to_string()]));
        let links = patch.social_links.unwrap();
        assert_eq!(links.github.as_deref(), Some("https://github.com/ana"));
        assert_eq!(links.twitter, None);
        assert_eq!(patch.avatar_url, None);
    }
}
