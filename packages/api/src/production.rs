//! # Production board
//!
//! `/produccion?project_id=<id>&tab=<tab>` shows one project's work area in
//! three tabs:
//!
//! | Tab | Query value | Content |
//! |-----|-------------|---------|
//! | [`ProductionTab::Tasks`] | `tareas` | task list: create, change status, delete |
//! | [`ProductionTab::Chat`] | `chat` | message log, oldest first, and a send box |
//! | [`ProductionTab::Team`] | `equipo` | project members |
//!
//! An unknown or missing tab means `tareas`. A missing `project_id` falls back
//! to the last project opened, kept under [`CURRENT_PROJECT_KEY`]; whichever id
//! is used is stored back there.

use store::{
    fetch, insert_one, Backend, ChatMessage, Filter, NewChatMessage, NewTask, Profile,
    ProjectMember, Query, SessionUser, Task, TaskPriority, TaskStatus,
};

use crate::error::ApiError;
use crate::local::LocalStore;
use crate::project_detail::TeamMember;

pub const PRODUCTION_PATH: &str = "/produccion";
pub const CURRENT_PROJECT_KEY: &str = "p301.current_project";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProductionTab {
    #[default]
    Tasks,
    Chat,
    Team,
}

impl ProductionTab {
    pub const ALL: [ProductionTab; 3] = [ProductionTab::Tasks, ProductionTab::Chat, ProductionTab::Team];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionTab::Tasks => "tareas",
            ProductionTab::Chat => "chat",
            ProductionTab::Team => "equipo",
        }
    }

    /// Unknown or absent values select the task list.
    pub fn parse(value: Option<&str>) -> Self {
        value
            .map(str::trim)
            .and_then(|v| Self::ALL.into_iter().find(|t| t.as_str() == v))
            .unwrap_or_default()
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            ProductionTab::Tasks => "production.tab_tasks",
            ProductionTab::Chat => "production.tab_chat",
            ProductionTab::Team => "production.tab_team",
        }
    }
}

/// Parsed `/produccion` query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductionQuery {
    pub project_id: Option<String>,
    pub tab: ProductionTab,
}

impl ProductionQuery {
    /// Accepts the query string with or without its leading `?`.
    pub fn parse(query: &str) -> Self {
        let mut project_id = None;
        let mut tab = None;
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "project_id" if !value.trim().is_empty() => project_id = Some(value.trim().to_string()),
                "tab" => tab = Some(value),
                _ => {}
            }
        }
        Self {
            project_id,
            tab: ProductionTab::parse(tab),
        }
    }
}

/// Location to push into history when the tab or project changes.
pub fn production_location(project_id: &str, tab: ProductionTab) -> String {
    format!("{PRODUCTION_PATH}?project_id={project_id}&tab={}", tab.as_str())
}

/// Project id from the query, else the stored one. The result is stored back.
pub fn resolve_project_id(from_query: Option<&str>, local: &impl LocalStore) -> Option<String> {
    let chosen = from_query
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| local.get(CURRENT_PROJECT_KEY).filter(|id| !id.is_empty()))?;
    local.set(CURRENT_PROJECT_KEY, &chosen);
    Some(chosen)
}

/// Tasks bucketed by status, in [`TaskStatus::ALL`] order.
pub fn group_tasks(tasks: &[Task]) -> Vec<(TaskStatus, Vec<Task>)> {
    TaskStatus::ALL
        .into_iter()
        .map(|status| {
            let bucket = tasks.iter().filter(|t| t.status == status).cloned().collect();
            (status, bucket)
        })
        .collect()
}

/// Task, chat and team operations for one project, on behalf of the
/// signed-in user.
#[derive(Clone)]
pub struct TaskBoard<B> {
    backend: B,
    project_id: String,
    user: SessionUser,
}

impl<B: Backend> TaskBoard<B> {
    pub async fn open(backend: B, project_id: &str) -> Result<Self, ApiError> {
        let user = backend
            .current_user()
            .await?
            .ok_or(ApiError::NotAuthenticated)?;
        Ok(Self {
            backend,
            project_id: project_id.to_string(),
            user,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    fn scoped(&self, table: &str) -> Query {
        Query::table(table)
            .eq("project_id", self.project_id.as_str())
            .order("created_at", true)
    }

    pub async fn tasks(&self) -> Result<Vec<Task>, ApiError> {
        Ok(fetch(&self.backend, &self.scoped("tasks")).await?)
    }

    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
        priority: TaskPriority,
    ) -> Result<Task, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation(
                "La tarea necesita un título".to_string(),
            ));
        }
        let description = description.trim();
        let task = NewTask {
            project_id: self.project_id.clone(),
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status: TaskStatus::Todo,
            priority,
            assignee_id: None,
            created_by: self.user.id.clone(),
        };
        let created: Task = insert_one(&self.backend, "tasks", &task).await?;
        tracing::info!(task_id = %created.id, project_id = %self.project_id, "Task created");
        Ok(created)
    }

    pub async fn set_status(&self, task_id: &str, status: TaskStatus) -> Result<(), ApiError> {
        let mut patch = serde_json::Map::new();
        patch.insert("status".to_string(), status.as_str().into());
        let updated = self
            .backend
            .update("tasks", patch, &self.task_filters(task_id))
            .await?;
        if updated.is_empty() {
            return Err(ApiError::NotFound("Tarea".to_string()));
        }
        Ok(())
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), ApiError> {
        self.backend
            .delete("tasks", &self.task_filters(task_id))
            .await?;
        Ok(())
    }

    fn task_filters(&self, task_id: &str) -> [Filter; 2] {
        [
            Filter::eq("id", task_id),
            Filter::eq("project_id", self.project_id.as_str()),
        ]
    }

    pub async fn messages(&self) -> Result<Vec<ChatMessage>, ApiError> {
        Ok(fetch(&self.backend, &self.scoped("project_messages")).await?)
    }

    pub async fn send_message(&self, content: &str) -> Result<ChatMessage, ApiError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ApiError::Validation("El mensaje está vacío".to_string()));
        }
        let message = NewChatMessage {
            project_id: self.project_id.clone(),
            user_id: self.user.id.clone(),
            content: content.to_string(),
        };
        Ok(insert_one(&self.backend, "project_messages", &message).await?)
    }

    pub async fn members(&self) -> Result<Vec<TeamMember>, ApiError> {
        let members: Vec<ProjectMember> = fetch(
            &self.backend,
            &Query::table("project_members").eq("project_id", self.project_id.as_str()),
        )
        .await?;
        if members.is_empty() {
            return Ok(Vec::new());
        }
        let profiles: Vec<Profile> = fetch(
            &self.backend,
            &Query::table("profiles").is_in("id", members.iter().map(|m| m.user_id.clone())),
        )
        .await?;
        Ok(members
            .into_iter()
            .map(|member| {
                let profile = profiles.iter().find(|p| p.id == member.user_id).cloned();
                TeamMember { member, profile }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryLocalStore;
    use serde_json::json;
    use store::{MemoryBackend, UserMetadata};

    async fn board() -> (MemoryBackend, TaskBoard<MemoryBackend>) {
        let backend = MemoryBackend::new();
        backend.sign_in_as(SessionUser {
            id: "u1".into(),
            email: "ana@example.com".into(),
            metadata: UserMetadata::default(),
        });
        let board = TaskBoard::open(backend.clone(), "p1").await.unwrap();
        (backend, board)
    }

    #[test]
    fn test_tab_parsing_falls_back_to_tasks() {
        assert_eq!(ProductionTab::parse(Some("chat")), ProductionTab::Chat);
        assert_eq!(ProductionTab::parse(Some("equipo")), ProductionTab::Team);
        assert_eq!(ProductionTab::parse(Some("otra")), ProductionTab::Tasks);
        assert_eq!(ProductionTab::parse(None), ProductionTab::Tasks);
    }

    #[test]
    fn test_query_round_trip() {
        let q = ProductionQuery::parse("?project_id=abc-123&tab=equipo");
        assert_eq!(q.project_id.as_deref(), Some("abc-123"));
        assert_eq!(q.tab, ProductionTab::Team);

        let location = production_location("abc-123", ProductionTab::Chat);
        let (path, query) = location.split_once('?').unwrap();
        assert_eq!(path, PRODUCTION_PATH);
        assert_eq!(
            ProductionQuery::parse(query),
            ProductionQuery {
                project_id: Some("abc-123".into()),
                tab: ProductionTab::Chat
            }
        );

        assert_eq!(ProductionQuery::parse(""), ProductionQuery::default());
        assert_eq!(ProductionQuery::parse("project_id=&tab").project_id, None);
    }

    #[test]
    fn test_project_id_fallback_and_store_back() {
        let local = MemoryLocalStore::new();
        assert_eq!(resolve_project_id(None, &local), None);

        assert_eq!(resolve_project_id(Some("p1"), &local).as_deref(), Some("p1"));
        assert_eq!(resolve_project_id(None, &local).as_deref(), Some("p1"));
        assert_eq!(resolve_project_id(Some("p2"), &local).as_deref(), Some("p2"));
        assert_eq!(local.get(CURRENT_PROJECT_KEY).as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn test_board_requires_session() {
        let result = TaskBoard::open(MemoryBackend::new(), "p1").await;
        assert!(matches!(result, Err(ApiError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_task_lifecycle() {
        let (backend, board) = board().await;
        assert!(matches!(
            board.create_task("  ", "", TaskPriority::Low).await,
            Err(ApiError::Validation(_))
        ));

        let task = board
            .create_task("Diseñar esquema", "", TaskPriority::High)
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.created_by, "u1");

        board.set_status(&task.id, TaskStatus::InProgress).await.unwrap();
        let tasks = board.tasks().await.unwrap();
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        let grouped = group_tasks(&tasks);
        assert_eq!(grouped[1].0, TaskStatus::InProgress);
        assert_eq!(grouped[1].1.len(), 1);

        assert!(board.set_status("missing", TaskStatus::Done).await.is_err());
        board.delete_task(&task.id).await.unwrap();
        assert!(backend.rows("tasks").is_empty());
    }

    #[tokio::test]
    async fn test_chat_and_team() {
        let (backend, board) = board().await;
        assert!(board.send_message("   ").await.is_err());
        board.send_message(" Hola equipo ").await.unwrap();
        let messages = board.messages().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "Hola equipo");

        backend.seed("project_members", vec![json!({"project_id": "p1", "user_id": "u2"})]);
        backend.seed("profiles", vec![json!({"id": "u2", "username": "bea"})]);
        let team = board.members().await.unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].label(), "bea");
    }
}
