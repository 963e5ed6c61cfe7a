//! # Domain models for Proyecto 301
//!
//! Mirrors of the rows the backend keeps. Nothing here is cached across pages:
//! controllers fetch, render, and drop them. Every type is
//! `Serialize + Deserialize` so it can be decoded straight from a [`crate::Row`]
//! and encoded back as an insert payload.
//!
//! ## Types
//!
//! | Struct / enum | Table | Represents |
//! |---------------|-------|-----------|
//! | [`SessionUser`] | auth | The signed-in account: id, email and sign-up metadata. |
//! | [`Profile`] | `profiles` | Public profile: username, display name, profession, bio, skills, social links. |
//! | [`AuthUser`] | `users` | Secondary identity source, consulted when a profile row is missing. |
//! | [`Project`] / [`NewProject`] | `projects` | A published project and its insert payload. |
//! | [`ProjectStatus`] / [`Visibility`] | | Closed sets of project states. |
//! | [`ProjectMember`] | `project_members` | Membership of a user in a project. |
//! | [`ProjectRoleNeeded`] | `project_roles_needed` | Roles the creator is recruiting for. |
//! | [`ProjectDesiredTechnology`] | `project_desired_technologies` | Technologies the creator wants to adopt. |
//! | [`Task`] / [`NewTask`] | `tasks` | Production board tasks. |
//! | [`ChatMessage`] / [`NewChatMessage`] | `project_messages` | Project chat log. |
//! | [`Experience`] / [`ExperienceDraft`] | `experiences` | Career entries rendered on the profile timeline. |
//! | [`ProjectViewStats`] | RPC | Aggregated view counters per project. |

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sign-up metadata attached to an auth account.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// The account behind the current session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "user_metadata")]
    pub metadata: UserMetadata,
}

impl SessionUser {
    /// Username from metadata, falling back to the local part of the email.
    pub fn handle(&self) -> &str {
        self.metadata
            .username
            .as_deref()
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or(&self.email))
    }
}

/// Links shown on a profile card. Stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl SocialLinks {
    /// Non-empty links as `(label, url)` pairs, in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Web", &self.website),
            ("GitHub", &self.github),
            ("LinkedIn", &self.linkedin),
            ("Twitter", &self.twitter),
        ]
        .into_iter()
        .filter_map(|(label, url)| {
            url.as_deref()
                .filter(|u| !u.trim().is_empty())
                .map(|u| (label, u))
        })
        .collect()
    }
}

/// A row from the `profiles` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
}

impl Profile {
    /// Full name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Owner edits to a profile. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
}

/// A row from the secondary `users` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl AuthUser {
    /// Best available human label, if any.
    pub fn label(&self) -> Option<&str> {
        [&self.full_name, &self.username, &self.email]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.trim().is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Idea,
    #[default]
    Planning,
    Development,
    Testing,
    Launched,
    Paused,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 6] = [
        ProjectStatus::Idea,
        ProjectStatus::Planning,
        ProjectStatus::Development,
        ProjectStatus::Testing,
        ProjectStatus::Launched,
        ProjectStatus::Paused,
    ];

    /// Wire value, as stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Idea => "idea",
            ProjectStatus::Planning => "planning",
            ProjectStatus::Development => "development",
            ProjectStatus::Testing => "testing",
            ProjectStatus::Launched => "launched",
            ProjectStatus::Paused => "paused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    /// Reachable by direct link, hidden from the catalog.
    Link,
    Draft,
}

impl Visibility {
    pub const ALL: [Visibility; 4] = [
        Visibility::Public,
        Visibility::Private,
        Visibility::Link,
        Visibility::Draft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Link => "link",
            Visibility::Draft => "draft",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// Whether someone other than the creator may open the project page.
    pub fn is_shareable(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::Link)
    }
}

/// A row from the `projects` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub creator_id: String,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub looking_for_team: bool,
    #[serde(default)]
    pub views_count: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for `projects`. The backend assigns `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewProject {
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub status: ProjectStatus,
    pub visibility: Visibility,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub creator_id: String,
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
    pub looking_for_team: bool,
}

/// A row from `project_members`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    #[serde(default)]
    pub id: Option<String>,
    pub project_id: String,
    pub user_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

/// A row from `project_roles_needed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectRoleNeeded {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub project_id: String,
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A row from `project_desired_technologies`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectDesiredTechnology {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub project_id: String,
    pub technology: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A row from `tasks`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub assignee_id: Option<String>,
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<String>,
    pub created_by: String,
}

/// A row from `project_messages`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewChatMessage {
    pub project_id: String,
    pub user_id: String,
    pub content: String,
}

/// Kind of a career entry. Drives icon and title selection on the timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceKind {
    #[default]
    Work,
    Education,
    Project,
    Volunteer,
    Certification,
}

impl ExperienceKind {
    pub const ALL: [ExperienceKind; 5] = [
        ExperienceKind::Work,
        ExperienceKind::Education,
        ExperienceKind::Project,
        ExperienceKind::Volunteer,
        ExperienceKind::Certification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceKind::Work => "work",
            ExperienceKind::Education => "education",
            ExperienceKind::Project => "project",
            ExperienceKind::Volunteer => "volunteer",
            ExperienceKind::Certification => "certification",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// A row from `experiences`.
///
/// `title` is the position, degree, project name, role or certificate name
/// depending on `kind`; `organization` is the company, institution, or issuer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ExperienceKind,
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Create/update payload for `experiences`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExperienceDraft {
    #[serde(rename = "type")]
    pub kind: ExperienceKind,
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub description: Option<String>,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub link: Option<String>,
}

/// Result row of the `project_view_stats` procedure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectViewStats {
    pub project_id: String,
    #[serde(default)]
    pub total_views: i64,
    #[serde(default)]
    pub unique_viewers: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_decodes_with_missing_optional_columns() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "slug": "demo",
            "title": "Demo",
            "creator_id": "u1",
            "status": "launched",
            "visibility": "link",
        }))
        .unwrap();
        assert_eq!(project.status, ProjectStatus::Launched);
        assert_eq!(project.visibility, Visibility::Link);
        assert!(project.tags.is_empty());
        assert_eq!(project.views_count, 0);
    }

    #[test]
    fn test_experience_kind_uses_type_column() {
        let exp: Experience = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "user_id": "u1",
            "type": "education",
            "title": "Ingeniería",
            "start_date": "2019-09-01",
        }))
        .unwrap();
        assert_eq!(exp.kind, ExperienceKind::Education);
        assert!(exp.end_date.is_none());
    }

    #[test]
    fn test_display_names() {
        let mut profile = Profile {
            id: "u1".into(),
            username: "ana".into(),
            full_name: Some("  ".into()),
            profession: None,
            avatar_url: None,
            bio: None,
            skills: vec![],
            social_links: SocialLinks::default(),
        };
        assert_eq!(profile.display_name(), "ana");
        profile.full_name = Some("Ana Pérez".into());
        assert_eq!(profile.display_name(), "Ana Pérez");

        let user = AuthUser {
            id: "u2".into(),
            email: Some("b@x.io".into()),
            username: None,
            full_name: None,
        };
        assert_eq!(user.label(), Some("b@x.io"));
    }

    #[test]
    fn test_session_handle_falls_back_to_email() {
        let user = SessionUser {
            id: "u1".into(),
            email: "carla@example.com".into(),
            metadata: UserMetadata::default(),
        };
        assert_eq!(user.handle(), "carla");
    }
}
