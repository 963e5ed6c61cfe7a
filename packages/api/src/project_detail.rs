//! Single project page, addressed as `/proyectos/<slug>`.

use serde_json::json;
use store::{
    fetch, fetch_one, Backend, Profile, Project, ProjectDesiredTechnology, ProjectMember,
    ProjectRoleNeeded, Query, SessionUser,
};

use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq)]
pub struct TeamMember {
    pub member: ProjectMember,
    pub profile: Option<Profile>,
}

impl TeamMember {
    pub fn label(&self) -> String {
        self.profile
            .as_ref()
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| crate::catalog::placeholder_author(&self.member.user_id))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectDetail {
    pub project: Project,
    pub creator: Option<Profile>,
    pub members: Vec<TeamMember>,
    pub roles_needed: Vec<ProjectRoleNeeded>,
    pub desired_technologies: Vec<ProjectDesiredTechnology>,
    pub viewer_is_creator: bool,
}

/// Whether `viewer` may open `project`. Private and draft projects are for
/// their creator only.
pub fn can_view(project: &Project, viewer: Option<&SessionUser>) -> bool {
    project.visibility.is_shareable() || viewer.is_some_and(|u| u.id == project.creator_id)
}

/// Load everything the page shows and record the visit.
///
/// A project the viewer may not see is reported as not found, same as a
/// missing slug.
pub async fn load_project_detail<B: Backend>(backend: &B, slug: &str) -> Result<ProjectDetail, ApiError> {
    let not_found = || ApiError::NotFound("Proyecto".to_string());
    let project = fetch_one::<Project, B>(backend, &Query::table("projects").eq("slug", slug))
        .await?
        .ok_or_else(not_found)?;
    let viewer = backend.current_user().await?;
    if !can_view(&project, viewer.as_ref()) {
        tracing::info!(slug, "Project hidden from this viewer");
        return Err(not_found());
    }
    let pid = project.id.as_str();

    let creator = fetch_one::<Profile, B>(
        backend,
        &Query::table("profiles").eq("id", project.creator_id.as_str()),
    )
    .await?;

    let members: Vec<ProjectMember> =
        fetch(backend, &Query::table("project_members").eq("project_id", pid)).await?;
    let member_profiles: Vec<Profile> = if members.is_empty() {
        Vec::new()
    } else {
        fetch(
            backend,
            &Query::table("profiles").is_in("id", members.iter().map(|m| m.user_id.clone())),
        )
        .await?
    };
    let members = members
        .into_iter()
        .map(|member| {
            let profile = member_profiles
                .iter()
                .find(|p| p.id == member.user_id)
                .cloned();
            TeamMember { member, profile }
        })
        .collect();

    let roles_needed = fetch(backend, &Query::table("project_roles_needed").eq("project_id", pid)).await?;
    let desired_technologies = fetch(
        backend,
        &Query::table("project_desired_technologies").eq("project_id", pid),
    )
    .await?;

    let viewer_is_creator = viewer.as_ref().is_some_and(|u| u.id == project.creator_id);
    if !viewer_is_creator {
        record_view(backend, pid, viewer.as_ref()).await;
    }

    Ok(ProjectDetail {
        project,
        creator,
        members,
        roles_needed,
        desired_technologies,
        viewer_is_creator,
    })
}

/// Best-effort insert into `project_views`.
async fn record_view<B: Backend>(backend: &B, project_id: &str, viewer: Option<&SessionUser>) {
    let row = json!({
        "project_id": project_id,
        "viewer_id": viewer.map(|u| u.id.as_str()),
    });
    if let Some(row) = row.as_object().cloned() {
        if let Err(e) = backend.insert("project_views", vec![row]).await {
            tracing::debug!("View not recorded for {}: {}", project_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{MemoryBackend, UserMetadata};

    fn backend() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend.seed(
            "projects",
            vec![
                json!({"id": "p1", "slug": "abierto", "title": "Abierto", "creator_id": "u1", "visibility": "public"}),
                json!({"id": "p2", "slug": "secreto", "title": "Secreto", "creator_id": "u1", "visibility": "private"}),
            ],
        );
        backend.seed(
            "profiles",
            vec![
                json!({"id": "u1", "username": "ana"}),
                json!({"id": "u2", "username": "bea", "full_name": "Bea Ruiz"}),
            ],
        );
        backend.seed(
            "project_members",
            vec![
                json!({"project_id": "p1", "user_id": "u2", "role": "frontend"}),
                json!({"project_id": "p1", "user_id": "u3abcdefgh"}),
            ],
        );
        backend.seed(
            "project_roles_needed",
            vec![json!({"project_id": "p1", "role": "Diseño"})],
        );
        backend
    }

    fn sign_in(backend: &MemoryBackend, id: &str) {
        backend.sign_in_as(SessionUser {
            id: id.into(),
            email: format!("{id}@example.com"),
            metadata: UserMetadata::default(),
        });
    }

    #[tokio::test]
    async fn test_public_project_loads_and_records_view() {
        let backend = backend();
        let detail = load_project_detail(&backend, "abierto").await.unwrap();
        assert_eq!(detail.creator.unwrap().username, "ana");
        assert_eq!(detail.members.len(), 2);
        assert_eq!(detail.members[0].label(), "Bea Ruiz");
        assert_eq!(detail.members[1].label(), "usuario_u3abcdef");
        assert_eq!(detail.roles_needed[0].role, "Diseño");
        assert!(detail.desired_technologies.is_empty());

        let views = backend.rows("project_views");
        assert_eq!(views.len(), 1);
        assert!(views[0]["viewer_id"].is_null());
    }

    #[tokio::test]
    async fn test_private_project_only_for_creator() {
        let backend = backend();
        assert!(matches!(
            load_project_detail(&backend, "secreto").await,
            Err(ApiError::NotFound(_))
        ));
        sign_in(&backend, "u2");
        assert!(load_project_detail(&backend, "secreto").await.is_err());

        sign_in(&backend, "u1");
        let detail = load_project_detail(&backend, "secreto").await.unwrap();
        assert!(detail.viewer_is_creator);
        assert!(backend.rows("project_views").is_empty());
    }

    #[tokio::test]
    async fn test_view_recording_failure_is_ignored() {
        let backend = backend();
        backend.fail_on("project_views");
        assert!(load_project_detail(&backend, "abierto").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_slug() {
        assert!(matches!(
            load_project_detail(&backend(), "nada").await,
            Err(ApiError::NotFound(_))
        ));
    }
}
