use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde_json::{json, Value};

use crate::backend::Backend;
use crate::error::StoreError;
use crate::models::{SessionUser, UserMetadata};
use crate::query::{Filter, Query, Row};

/// In-memory Backend for tests and local demos.
///
/// Tables are plain row vectors. Inserts assign `id` (UUID v4) and
/// `created_at` when the payload omits them. Unique constraints are opt-in
/// through [`MemoryBackend::with_unique`], and any table, `"storage"` or
/// `"rpc"` can be told to fail with [`MemoryBackend::fail_on`].
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Row>>,
    accounts: Vec<Account>,
    session: Option<SessionUser>,
    objects: BTreeMap<(String, String), Vec<u8>>,
    unique: Vec<(String, String)>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: SessionUser,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reject inserts that duplicate `column` within `table`.
    pub fn with_unique(self, table: &str, column: &str) -> Self {
        self.state()
            .unique
            .push((table.to_string(), column.to_string()));
        self
    }

    /// Make every call against `target` (a table name, `"storage"` or `"rpc"`) fail.
    pub fn fail_on(&self, target: &str) {
        self.state().failing.insert(target.to_string());
    }

    /// Seed rows without going through constraint checks.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut state = self.state();
        let entry = state.tables.entry(table.to_string()).or_default();
        entry.extend(rows.into_iter().filter_map(|v| v.as_object().cloned()));
    }

    /// Current contents of a table.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.state().tables.get(table).cloned().unwrap_or_default()
    }

    /// Paths stored in a bucket.
    pub fn object_paths(&self, bucket: &str) -> Vec<String> {
        self.state()
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Register an account and open a session for it.
    pub fn sign_in_as(&self, user: SessionUser) {
        let mut state = self.state();
        if !state.accounts.iter().any(|a| a.user.id == user.id) {
            state.accounts.push(Account {
                password: String::new(),
                user: user.clone(),
            });
        }
        state.session = Some(user);
    }

    /// Log of mutating calls, e.g. `"insert:projects"`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn check(&self, target: &str) -> Result<(), StoreError> {
        if self.state().failing.contains(target) {
            return Err(StoreError::Http {
                status: 500,
                message: format!("{target} unavailable"),
            });
        }
        Ok(())
    }
}

impl Backend for MemoryBackend {
    async fn current_user(&self) -> Result<Option<SessionUser>, StoreError> {
        Ok(self.state().session.clone())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, StoreError> {
        let email = email.trim().to_lowercase();
        let mut state = self.state();
        if state.accounts.iter().any(|a| a.user.email == email) {
            return Err(StoreError::Auth("User already registered".to_string()));
        }
        if password.len() < 6 {
            return Err(StoreError::Auth(
                "Password should be at least 6 characters".to_string(),
            ));
        }
        let user = SessionUser {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            metadata,
        };
        state.accounts.push(Account {
            password: password.to_string(),
            user: user.clone(),
        });
        state.session = Some(user.clone());
        Ok(user)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, StoreError> {
        let email = email.trim().to_lowercase();
        let mut state = self.state();
        let user = state
            .accounts
            .iter()
            .find(|a| a.user.email == email && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| StoreError::Auth("Invalid login credentials".to_string()))?;
        state.session = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        self.state().session = None;
        Ok(())
    }

    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        self.check(&query.table)?;
        let rows = self.rows(&query.table);
        Ok(query.apply(rows))
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        self.state().calls.push(format!("insert:{table}"));
        self.check(table)?;
        let mut state = self.state();

        let mut prepared = Vec::with_capacity(rows.len());
        for mut row in rows {
            row.entry("id".to_string())
                .or_insert_with(|| json!(uuid::Uuid::new_v4().to_string()));
            row.entry("created_at".to_string())
                .or_insert_with(|| json!(Utc::now().to_rfc3339()));
            prepared.push(row);
        }

        for (t, column) in state.unique.iter().filter(|(t, _)| t == table) {
            let existing = state.tables.get(t).map(Vec::as_slice).unwrap_or_default();
            let mut seen: Vec<&Value> = existing.iter().filter_map(|r| r.get(column)).collect();
            for row in &prepared {
                if let Some(v) = row.get(column) {
                    if seen.contains(&v) {
                        return Err(StoreError::UniqueViolation(format!("{t}_{column}_key")));
                    }
                    seen.push(v);
                }
            }
        }

        state
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(prepared.iter().cloned());
        Ok(prepared)
    }

    async fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, StoreError> {
        self.state().calls.push(format!("update:{table}"));
        self.check(table)?;
        let mut state = self.state();
        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut() {
                if filters.iter().all(|f| f.matches(row)) {
                    for (k, v) in &patch {
                        row.insert(k.clone(), v.clone());
                    }
                    updated.push(row.clone());
                }
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        self.state().calls.push(format!("delete:{table}"));
        self.check(table)?;
        if let Some(rows) = self.state().tables.get_mut(table) {
            rows.retain(|row| !filters.iter().all(|f| f.matches(row)));
        }
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        self.state().calls.push(format!("upload:{bucket}"));
        self.check("storage")?;
        let key = (bucket.to_string(), path.to_string());
        let mut state = self.state();
        if state.objects.contains_key(&key) {
            return Err(StoreError::UniqueViolation(format!("{bucket}/{path}")));
        }
        state.objects.insert(key, bytes);
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.check("storage")?;
        Ok(self
            .object_paths(bucket)
            .into_iter()
            .filter(|p| p.starts_with(prefix))
            .collect())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StoreError> {
        self.state().calls.push(format!("remove:{bucket}"));
        self.check("storage")?;
        let mut state = self.state();
        for path in paths {
            state.objects.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, StoreError> {
        self.check("rpc")?;
        match function {
            "project_view_stats" => {
                let ids: Vec<String> = args
                    .get("project_ids")
                    .and_then(Value::as_array)
                    .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                    .unwrap_or_default();
                let views = self.rows("project_views");
                let stats: Vec<Value> = ids
                    .iter()
                    .map(|id| {
                        let for_project: Vec<&Row> = views
                            .iter()
                            .filter(|r| r.get("project_id").and_then(Value::as_str) == Some(id))
                            .collect();
                        let viewers: HashSet<&str> = for_project
                            .iter()
                            .filter_map(|r| r.get("viewer_id").and_then(Value::as_str))
                            .collect();
                        json!({
                            "project_id": id,
                            "total_views": for_project.len(),
                            "unique_viewers": viewers.len(),
                        })
                    })
                    .collect();
                Ok(Value::Array(stats))
            }
            other => Err(StoreError::NotFound(format!("rpc {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{fetch, insert_one};
    use crate::models::{Project, ProjectStatus};
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_created_at() {
        let backend = MemoryBackend::new();
        let project: Project = insert_one(
            &backend,
            "projects",
            &json!({"slug": "demo", "title": "Demo", "creator_id": "u1"}),
        )
        .await
        .unwrap();
        assert!(!project.id.is_empty());
        assert!(project.created_at.is_some());
        assert_eq!(project.status, ProjectStatus::Planning);
    }

    #[tokio::test]
    async fn test_unique_constraint_rejects_duplicate() {
        let backend = MemoryBackend::new().with_unique("projects", "slug");
        backend.seed("projects", vec![json!({"id": "p1", "slug": "taken"})]);

        let err = backend
            .insert("projects", vec![json!({"slug": "taken"}).as_object().cloned().unwrap()])
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(backend.rows("projects").len(), 1);
    }

    #[tokio::test]
    async fn test_select_update_delete() {
        let backend = MemoryBackend::new();
        backend.seed(
            "tasks",
            vec![
                json!({"id": "t1", "project_id": "p1", "status": "todo"}),
                json!({"id": "t2", "project_id": "p1", "status": "todo"}),
                json!({"id": "t3", "project_id": "p2", "status": "todo"}),
            ],
        );

        let patch = json!({"status": "done"}).as_object().cloned().unwrap();
        let updated = backend
            .update("tasks", patch, &[Filter::eq("id", "t2")])
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);

        backend.delete("tasks", &[Filter::eq("id", "t1")]).await.unwrap();

        let rows: Vec<Value> = fetch(&backend, &Query::table("tasks").eq("project_id", "p1"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["status"], "done");
    }

    #[tokio::test]
    async fn test_auth_flow() {
        let backend = MemoryBackend::new();
        assert!(backend.current_user().await.unwrap().is_none());

        let user = backend
            .sign_up("Ana@Example.com", "secret123", UserMetadata::default())
            .await
            .unwrap();
        assert_eq!(user.email, "ana@example.com");
        backend.sign_out().await.unwrap();

        let err = backend
            .sign_in_with_password("ana@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");

        let again = backend
            .sign_in_with_password("ana@example.com", "secret123")
            .await
            .unwrap();
        assert_eq!(again.id, user.id);
        assert_eq!(backend.current_user().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_storage_and_failure_injection() {
        let backend = MemoryBackend::new();
        backend
            .upload("covers", "u1/a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(backend.list("covers", "u1/").await.unwrap(), vec!["u1/a.png"]);

        backend.fail_on("storage");
        assert!(backend
            .upload("covers", "u1/b.png", vec![], "image/png")
            .await
            .is_err());
        assert_eq!(backend.calls(), vec!["upload:covers", "upload:covers"]);
    }

    #[tokio::test]
    async fn test_view_stats_rpc() {
        let backend = MemoryBackend::new();
        backend.seed(
            "project_views",
            vec![
                json!({"project_id": "p1", "viewer_id": "a"}),
                json!({"project_id": "p1", "viewer_id": "a"}),
                json!({"project_id": "p1", "viewer_id": "b"}),
            ],
        );
        let out = backend
            .rpc("project_view_stats", json!({"project_ids": ["p1", "p2"]}))
            .await
            .unwrap();
        assert_eq!(out[0]["total_views"], 3);
        assert_eq!(out[0]["unique_viewers"], 2);
        assert_eq!(out[1]["total_views"], 0);
    }
}
