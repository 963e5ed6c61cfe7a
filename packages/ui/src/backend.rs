//! Shared backend handle for every view.
//!
//! The launcher passes an [`AppConfig`] to [`AppProvider`], which builds one
//! [`AppBackend`] and exposes it, together with the event bus and the
//! platform [`LocalStore`](api::local::LocalStore), through [`use_app`]:
//! - **Configured**: the hosted service via [`RestBackend`]
//! - **Unconfigured**: an in-memory [`MemoryBackend`] so the UI still runs

use api::auth::stored_token;
use api::bootstrap::{connect, ReadySignal};
use api::EventBus;
use dioxus::prelude::*;
use serde_json::Value;
use store::query::{Filter, Query, Row};
use store::{AppConfig, Backend, MemoryBackend, RestBackend, SessionUser, StoreError, UserMetadata};

use crate::storage::{platform_store, PlatformStore};

#[derive(Clone)]
pub enum AppBackend {
    Rest(RestBackend),
    Memory(MemoryBackend),
}

macro_rules! delegate {
    ($self:ident, $b:ident => $call:expr) => {
        match $self {
            AppBackend::Rest($b) => $call,
            AppBackend::Memory($b) => $call,
        }
    };
}

impl AppBackend {
    /// Hosted backend when configured, else an in-memory one.
    pub fn from_config(config: &AppConfig) -> Self {
        match connect(config) {
            Ok(rest) => AppBackend::Rest(rest),
            Err(e) => {
                tracing::warn!("{}; running against in-memory demo data", e);
                AppBackend::Memory(MemoryBackend::new().with_unique("projects", "slug"))
            }
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, AppBackend::Memory(_))
    }

    pub fn access_token(&self) -> Option<String> {
        match self {
            AppBackend::Rest(rest) => rest.access_token(),
            AppBackend::Memory(_) => None,
        }
    }

    pub fn restore_session(&self, access_token: String) {
        if let AppBackend::Rest(rest) = self {
            rest.restore_session(access_token);
        }
    }
}

impl Backend for AppBackend {
    async fn current_user(&self) -> Result<Option<SessionUser>, StoreError> {
        delegate!(self, b => b.current_user().await)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, StoreError> {
        delegate!(self, b => b.sign_up(email, password, metadata).await)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SessionUser, StoreError> {
        delegate!(self, b => b.sign_in_with_password(email, password).await)
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        delegate!(self, b => b.sign_out().await)
    }

    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        delegate!(self, b => b.select(query).await)
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        delegate!(self, b => b.insert(table, rows).await)
    }

    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        delegate!(self, b => b.update(table, patch, filters).await)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        delegate!(self, b => b.delete(table, filters).await)
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        delegate!(self, b => b.upload(bucket, path, bytes, content_type).await)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        delegate!(self, b => b.public_url(bucket, path))
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        delegate!(self, b => b.list(bucket, prefix).await)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StoreError> {
        delegate!(self, b => b.remove(bucket, paths).await)
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, StoreError> {
        delegate!(self, b => b.rpc(function, args).await)
    }
}

/// Everything a view needs besides its own signals.
#[derive(Clone)]
pub struct AppContext {
    pub backend: AppBackend,
    pub events: EventBus,
    pub config: AppConfig,
    pub ready: ReadySignal,
    pub local: PlatformStore,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let backend = AppBackend::from_config(&config);
        let local = platform_store();
        if let Some(token) = stored_token(&local) {
            tracing::debug!("Restoring stored session");
            backend.restore_session(token);
        }
        Self {
            backend,
            events: EventBus::new(),
            config,
            ready: ReadySignal::new(),
            local,
        }
    }
}

pub fn use_app() -> AppContext {
    use_context::<AppContext>()
}

/// Root provider. Must wrap every other provider and the router.
#[component]
pub fn AppProvider(config: AppConfig, children: Element) -> Element {
    use_context_provider(|| AppContext::new(config.clone()));

    rsx! {
        {children}
    }
}
