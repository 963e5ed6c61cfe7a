//! Email + password authentication against the backend's auth service.
//!
//! Every successful sign-in, sign-up or sign-out is broadcast as
//! [`AppEvent::SessionChanged`] so the navbar and any open page can react.

mod errors;
mod form;
mod password;
mod session;

pub use errors::{auth_error_message, UNKNOWN_AUTH_ERROR};
pub use form::{AuthFormError, AuthMode, SignInForm, SignUpForm};
pub use password::{check_password, MIN_PASSWORD_LEN};
pub use session::{remember_token, stored_token, SESSION_TOKEN_KEY};

use serde_json::json;
use store::{Backend, SessionUser, StoreError};
use thiserror::Error;

use crate::events::{AppEvent, EventBus};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Form(#[from] AuthFormError),

    #[error(transparent)]
    Service(#[from] StoreError),
}

impl AuthError {
    /// Text for the form's error line.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Form(e) => e.to_string(),
            AuthError::Service(e) => auth_error_message(&e.to_string()).to_string(),
        }
    }
}

/// Register an account, then create its public profile row.
///
/// The profile insert is best-effort: the account exists either way and the
/// profile page falls back to the `users` table.
pub async fn sign_up<B: Backend>(
    backend: &B,
    events: &EventBus,
    form: &SignUpForm,
) -> Result<SessionUser, AuthError> {
    form.validate()?;
    let metadata = form.metadata();
    let user = backend
        .sign_up(form.email.trim(), &form.password, metadata.clone())
        .await?;
    tracing::info!(user_id = %user.id, "Account created");

    let profile = json!({
        "id": user.id,
        "username": metadata.username,
        "full_name": metadata.full_name,
    });
    if let Some(row) = profile.as_object().cloned() {
        if let Err(e) = backend.insert("profiles", vec![row]).await {
            tracing::warn!("Profile row not created for {}: {}", user.id, e);
        }
    }

    events.publish(AppEvent::SessionChanged(Some(user.clone())));
    Ok(user)
}

pub async fn sign_in<B: Backend>(
    backend: &B,
    events: &EventBus,
    form: &SignInForm,
) -> Result<SessionUser, AuthError> {
    form.validate()?;
    let user = backend
        .sign_in_with_password(form.email.trim(), &form.password)
        .await?;
    tracing::info!(user_id = %user.id, "Signed in");
    events.publish(AppEvent::SessionChanged(Some(user.clone())));
    Ok(user)
}

pub async fn sign_out<B: Backend>(backend: &B, events: &EventBus) -> Result<(), AuthError> {
    backend.sign_out().await?;
    tracing::info!("Signed out");
    events.publish(AppEvent::SessionChanged(None));
    Ok(())
}

/// Current session, if any. Does not broadcast.
pub async fn check_session<B: Backend>(backend: &B) -> Result<Option<SessionUser>, AuthError> {
    Ok(backend.current_user().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryBackend;

    fn sign_up_form() -> SignUpForm {
        SignUpForm {
            email: "luis@example.com".into(),
            password: "secreto1".into(),
            confirm_password: "secreto1".into(),
            username: "luis".into(),
            full_name: "Luis Gómez".into(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile_and_broadcasts() {
        let backend = MemoryBackend::new();
        let events = EventBus::new();
        let mut rx = events.subscribe();

        let user = sign_up(&backend, &events, &sign_up_form()).await.unwrap();
        let profiles = backend.rows("profiles");
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0]["id"], user.id.as_str());
        assert_eq!(profiles[0]["username"], "luis");
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::SessionChanged(Some(user))
        );
    }

    #[tokio::test]
    async fn test_sign_up_survives_profile_failure() {
        let backend = MemoryBackend::new();
        backend.fail_on("profiles");
        let user = sign_up(&backend, &EventBus::new(), &sign_up_form()).await;
        assert!(user.is_ok());
        assert!(check_session(&backend).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_backend() {
        let backend = MemoryBackend::new();
        let mut form = sign_up_form();
        form.confirm_password = "otro".into();
        let err = sign_up(&backend, &EventBus::new(), &form).await.unwrap_err();
        assert_eq!(err.user_message(), "Las contraseñas no coinciden");
        assert!(check_session(&backend).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_is_localized() {
        let backend = MemoryBackend::new();
        let events = EventBus::new();
        sign_up(&backend, &events, &sign_up_form()).await.unwrap();
        sign_out(&backend, &events).await.unwrap();

        let err = sign_in(
            &backend,
            &events,
            &SignInForm {
                email: "luis@example.com".into(),
                password: "incorrecta".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.user_message(), "Correo o contraseña incorrectos");
    }

    #[tokio::test]
    async fn test_sign_out_broadcasts_none() {
        let backend = MemoryBackend::new();
        let events = EventBus::new();
        let mut rx = events.subscribe();
        sign_out(&backend, &events).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), AppEvent::SessionChanged(None));
    }
}
