//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod storage;
pub use storage::{platform_store, PlatformStore};

mod backend;
pub use backend::{use_app, AppBackend, AppContext, AppProvider};

mod auth;
pub use auth::{use_auth, AuthProvider, AuthState, LogoutButton};

mod i18n;
pub use i18n::{use_i18n, I18n, I18nProvider, LanguageSelector};

mod notifications;
pub use notifications::{notify, use_notifications, NotificationProvider, Notifications, ToastLevel};

mod navbar;
pub use navbar::Navbar;

mod spinner;
pub use spinner::{LoadingOverlay, Spinner};

mod markdown;
pub use markdown::{render_markdown, Markdown};

mod file_input;
mod project_card;
pub use project_card::ProjectCardView;

mod timeline;
pub use timeline::Timeline;

mod wizard;
pub use wizard::WizardModal;

pub mod views;
