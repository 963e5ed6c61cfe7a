//! Authentication context and hooks for the UI.

use api::auth::{check_session, remember_token, sign_out};
use api::{AppEvent, SessionUser};
use dioxus::prelude::*;

use crate::backend::use_app;
use crate::i18n::use_i18n;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user signs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that manages authentication state.
///
/// Checks the restored session once, then raises the app's ready signal.
/// Afterwards it follows `SessionChanged` events and keeps the stored token
/// in step with the backend's.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let app = use_app();
    let mut auth_state = use_signal(AuthState::default);

    let checker = app.clone();
    let _ = use_resource(move || {
        let app = checker.clone();
        async move {
            let user = match check_session(&app.backend).await {
                Ok(user) => {
                    if user.is_none() {
                        remember_token(&app.local, None);
                    }
                    user
                }
                Err(e) => {
                    tracing::warn!("Session check failed: {}", e);
                    None
                }
            };
            auth_state.set(AuthState {
                user,
                loading: false,
            });
            app.ready.mark_ready();
        }
    });

    use_future(move || {
        let app = app.clone();
        async move {
            let mut events = app.events.stream();
            while let Some(event) = events.next().await {
                if let AppEvent::SessionChanged(user) = event {
                    remember_token(&app.local, app.backend.access_token().as_deref());
                    auth_state.set(AuthState {
                        user,
                        loading: false,
                    });
                }
            }
        }
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button to sign the current user out.
#[component]
pub fn LogoutButton(
    on_signed_out: EventHandler<()>,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let app = use_app();
    let i18n = use_i18n();
    let mut busy = use_signal(|| false);

    let onclick = move |_| {
        let app = app.clone();
        async move {
            busy.set(true);
            match sign_out(&app.backend, &app.events).await {
                Ok(()) => on_signed_out.call(()),
                Err(e) => tracing::error!("Sign-out failed: {}", e),
            }
            busy.set(false);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: busy(),
            onclick: onclick,
            {i18n.t("nav.logout")}
        }
    }
}
