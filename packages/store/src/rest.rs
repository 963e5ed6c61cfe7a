//! # RestBackend: HTTP client for the hosted backend service
//!
//! Implements [`Backend`] over the service's public HTTP API with `reqwest`
//! (which targets both native and `wasm32`).
//!
//! | Concern | Endpoint |
//! |---------|----------|
//! | Sign up | `POST /auth/v1/signup` |
//! | Sign in | `POST /auth/v1/token?grant_type=password` |
//! | Sign out | `POST /auth/v1/logout` |
//! | Current user | `GET /auth/v1/user` |
//! | Tables | `GET/POST/PATCH/DELETE /rest/v1/<table>` with PostgREST filters |
//! | Procedures | `POST /rest/v1/rpc/<function>` |
//! | Storage | `/storage/v1/object/<bucket>/<path>`, `/storage/v1/object/list/<bucket>` |
//!
//! Every request carries the anon key as `apikey`; the bearer token is the
//! session's access token when signed in, the anon key otherwise.
//!
//! ## Errors
//!
//! Auth failures keep the service's message verbatim in [`StoreError::Auth`] so the
//! UI can translate them. PostgREST error code `23505` becomes
//! [`StoreError::UniqueViolation`]; `PGRST116` becomes [`StoreError::NotFound`].

use std::sync::{Arc, Mutex, MutexGuard};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::backend::Backend;
use crate::config::BackendConfig;
use crate::error::StoreError;
use crate::models::{SessionUser, UserMetadata};
use crate::query::{filter_params, Filter, Query, Row};

/// Production [`Backend`] talking to the hosted service.
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    config: BackendConfig,
    session: Arc<Mutex<Option<Session>>>,
}

#[derive(Clone, Debug)]
struct Session {
    access_token: String,
    user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn text(&self) -> Option<String> {
        [&self.error_description, &self.msg, &self.message, &self.error]
            .into_iter()
            .find_map(|m| m.clone())
    }

    fn code(&self) -> Option<String> {
        self.code.as_ref().map(|c| match c {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StorageEntry {
    name: String,
}

impl RestBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            session: Arc::new(Mutex::new(None)),
        }
    }

    fn session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Access token of the open session, for persisting across reloads.
    pub fn access_token(&self) -> Option<String> {
        self.session().as_ref().map(|s| s.access_token.clone())
    }

    /// Re-attach a previously persisted access token. The next
    /// [`Backend::current_user`] call validates it.
    pub fn restore_session(&self, access_token: String) {
        *self.session() = Some(Session {
            access_token,
            user: None,
        });
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.url.trim_end_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token()
            .unwrap_or_else(|| self.config.anon_key.clone());
        builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.authorized(builder).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(error_from_response(response).await)
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value, StoreError> {
        let response = self.send(builder).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn open_session(&self, token: TokenResponse) -> SessionUser {
        *self.session() = Some(Session {
            access_token: token.access_token,
            user: Some(token.user.clone()),
        });
        token.user
    }
}

async fn error_from_response(response: Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: Option<ErrorBody> = serde_json::from_str(&body).ok();
    let message = parsed
        .as_ref()
        .and_then(ErrorBody::text)
        .unwrap_or_else(|| body.clone());
    let code = parsed.as_ref().and_then(ErrorBody::code);

    match code.as_deref() {
        Some("23505") => return StoreError::UniqueViolation(message),
        Some("PGRST116") => return StoreError::NotFound(message),
        _ => {}
    }
    if status == StatusCode::UNAUTHORIZED {
        return StoreError::Unauthenticated;
    }
    StoreError::Http {
        status: status.as_u16(),
        message,
    }
}

/// True when the auth service refused the stored token itself. Outages and
/// other server errors keep the session.
fn session_rejected(e: &StoreError) -> bool {
    match e {
        StoreError::Unauthenticated => true,
        StoreError::Http { status, .. } => *status == 401 || *status == 403,
        _ => false,
    }
}

fn rows_from(value: Value) -> Result<Vec<Row>, StoreError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()),
        Value::Object(map) => Ok(vec![map]),
        other => Err(StoreError::Decode(serde::de::Error::custom(format!(
            "expected rows, got {other}"
        )))),
    }
}

impl Backend for RestBackend {
    async fn current_user(&self) -> Result<Option<SessionUser>, StoreError> {
        let cached = self.session().clone();
        let Some(session) = cached else {
            return Ok(None);
        };
        if let Some(user) = session.user {
            return Ok(Some(user));
        }

        match self.send_json(self.client.get(self.url("/auth/v1/user"))).await {
            Ok(value) => {
                let user: SessionUser = serde_json::from_value(value)?;
                if let Some(s) = self.session().as_mut() {
                    s.user = Some(user.clone());
                }
                Ok(Some(user))
            }
            Err(e) if session_rejected(&e) => {
                tracing::debug!("Stored session rejected, signing out locally");
                *self.session() = None;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, StoreError> {
        let body = json!({ "email": email, "password": password, "data": metadata });
        let value = self
            .send_json(self.client.post(self.url("/auth/v1/signup")).json(&body))
            .await
            .map_err(auth_error)?;

        // With email confirmation on, the service returns the bare user.
        if value.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(value)?;
            Ok(self.open_session(token))
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, StoreError> {
        let body = json!({ "email": email, "password": password });
        let value = self
            .send_json(
                self.client
                    .post(self.url("/auth/v1/token"))
                    .query(&[("grant_type", "password")])
                    .json(&body),
            )
            .await
            .map_err(auth_error)?;
        let token: TokenResponse = serde_json::from_value(value)?;
        Ok(self.open_session(token))
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        let result = match self.access_token() {
            Some(_) => self
                .send(self.client.post(self.url("/auth/v1/logout")))
                .await
                .map(|_| ()),
            None => Ok(()),
        };
        *self.session() = None;
        result
    }

    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        let url = self.url(&format!("/rest/v1/{}", query.table));
        let value = self
            .send_json(self.client.get(url).query(&query.to_params()))
            .await?;
        rows_from(value)
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        let url = self.url(&format!("/rest/v1/{table}"));
        let value = self
            .send_json(
                self.client
                    .post(url)
                    .header("Prefer", "return=representation")
                    .json(&rows),
            )
            .await?;
        rows_from(value)
    }

    async fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, StoreError> {
        let url = self.url(&format!("/rest/v1/{table}"));
        let value = self
            .send_json(
                self.client
                    .patch(url)
                    .query(&filter_params(filters))
                    .header("Prefer", "return=representation")
                    .json(&patch),
            )
            .await?;
        rows_from(value)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        let url = self.url(&format!("/rest/v1/{table}"));
        self.send(self.client.delete(url).query(&filter_params(filters)))
            .await?;
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let url = self.url(&format!("/storage/v1/object/{bucket}/{path}"));
        self.send(
            self.client
                .post(url)
                .header("Content-Type", content_type)
                .header("x-upsert", "false")
                .body(bytes),
        )
        .await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.url(&format!("/storage/v1/object/public/{bucket}/{path}"))
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        let url = self.url(&format!("/storage/v1/object/list/{bucket}"));
        let body = json!({ "prefix": prefix, "limit": 100, "offset": 0 });
        let value = self.send_json(self.client.post(url).json(&body)).await?;
        let entries: Vec<StorageEntry> = serde_json::from_value(value)?;
        let prefix = prefix.trim_end_matches('/');
        Ok(entries
            .into_iter()
            .map(|e| {
                if prefix.is_empty() {
                    e.name
                } else {
                    format!("{prefix}/{}", e.name)
                }
            })
            .collect())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StoreError> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = self.url(&format!("/storage/v1/object/{bucket}"));
        self.send(self.client.delete(url).json(&json!({ "prefixes": paths })))
            .await?;
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, StoreError> {
        let url = self.url(&format!("/rest/v1/rpc/{function}"));
        self.send_json(self.client.post(url).json(&args)).await
    }
}

/// Auth endpoints answer 400/422 with a human message; keep it for the UI.
fn auth_error(e: StoreError) -> StoreError {
    match e {
        StoreError::Http { message, .. } => StoreError::Auth(message),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        RestBackend::new(BackendConfig {
            url: "https://demo.example.co/".to_string(),
            anon_key: "anon".to_string(),
        })
    }

    #[test]
    fn test_public_url_joins_without_double_slash() {
        assert_eq!(
            backend().public_url("project-covers", "u1/x.png"),
            "https://demo.example.co/storage/v1/object/public/project-covers/u1/x.png"
        );
    }

    #[test]
    fn test_restore_session_exposes_token() {
        let b = backend();
        assert!(b.access_token().is_none());
        b.restore_session("tok".to_string());
        assert_eq!(b.access_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_rows_from_accepts_object_and_array() {
        assert_eq!(rows_from(json!([{"a": 1}, {"b": 2}])).unwrap().len(), 2);
        assert_eq!(rows_from(json!({"a": 1})).unwrap().len(), 1);
        assert!(rows_from(Value::Null).unwrap().is_empty());
        assert!(rows_from(json!(3)).is_err());
    }

    #[test]
    fn test_only_rejected_tokens_end_the_session() {
        assert!(session_rejected(&StoreError::Unauthenticated));
        assert!(session_rejected(&StoreError::Http { status: 403, message: "bad jwt".into() }));
        assert!(!session_rejected(&StoreError::Http { status: 503, message: "down".into() }));
        assert!(!session_rejected(&StoreError::Http { status: 500, message: "oops".into() }));
        assert!(!session_rejected(&StoreError::Network("offline".into())));
    }
}
