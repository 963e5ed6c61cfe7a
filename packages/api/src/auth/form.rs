//! Login/register form: the two modes and their field checks.

use store::UserMetadata;
use thiserror::Error;

use super::password::check_password;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggle(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    /// Username, full name and password confirmation only appear when registering.
    pub fn shows_registration_fields(self) -> bool {
        self == AuthMode::Register
    }

    pub fn title_key(self) -> &'static str {
        match self {
            AuthMode::Login => "auth.login_title",
            AuthMode::Register => "auth.register_title",
        }
    }

    pub fn submit_key(self) -> &'static str {
        match self {
            AuthMode::Login => "auth.login_submit",
            AuthMode::Register => "auth.register_submit",
        }
    }

    /// Label of the link that switches to the other mode.
    pub fn switch_key(self) -> &'static str {
        match self {
            AuthMode::Login => "auth.switch_to_register",
            AuthMode::Register => "auth.switch_to_login",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AuthFormError {
    #[error("El correo electrónico es obligatorio")]
    EmailRequired,
    #[error("El correo electrónico no es válido")]
    EmailInvalid,
    #[error("La contraseña debe tener al menos 6 caracteres")]
    PasswordTooShort,
    #[error("Las contraseñas no coinciden")]
    PasswordMismatch,
    #[error("El nombre de usuario es obligatorio")]
    UsernameRequired,
    #[error("El nombre de usuario solo puede tener letras, números, guiones y guiones bajos (mínimo 3)")]
    UsernameInvalid,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), AuthFormError> {
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AuthFormError::PasswordTooShort);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub username: String,
    pub full_name: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), AuthFormError> {
        check_email(&self.email)?;
        check_username(&self.username)?;
        check_password(&self.password, &self.confirm_password)
    }

    /// Metadata stored on the auth account.
    pub fn metadata(&self) -> UserMetadata {
        let full_name = self.full_name.trim();
        UserMetadata {
            username: Some(self.username.trim().to_string()),
            full_name: (!full_name.is_empty()).then(|| full_name.to_string()),
        }
    }
}

fn check_email(email: &str) -> Result<(), AuthFormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthFormError::EmailRequired);
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(AuthFormError::EmailInvalid),
    }
}

fn check_username(username: &str) -> Result<(), AuthFormError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthFormError::UsernameRequired);
    }
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if username.chars().count() < 3 || !valid_chars {
        return Err(AuthFormError::UsernameInvalid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignUpForm {
        SignUpForm {
            email: "ana@example.com".into(),
            password: "secreto".into(),
            confirm_password: "secreto".into(),
            username: "ana_dev".into(),
            full_name: " Ana Pérez ".into(),
        }
    }

    #[test]
    fn test_mode_toggle_swaps_fields() {
        let mode = AuthMode::default();
        assert!(!mode.shows_registration_fields());
        let mode = mode.toggle();
        assert_eq!(mode, AuthMode::Register);
        assert!(mode.shows_registration_fields());
        assert_eq!(mode.submit_key(), "auth.register_submit");
        assert_eq!(mode.toggle(), AuthMode::Login);
    }

    #[test]
    fn test_sign_up_validation() {
        assert_eq!(form().validate(), Ok(()));

        let mut f = form();
        f.email = "ana.example.com".into();
        assert_eq!(f.validate(), Err(AuthFormError::EmailInvalid));

        let mut f = form();
        f.username = "a b".into();
        assert_eq!(f.validate(), Err(AuthFormError::UsernameInvalid));

        let mut f = form();
        f.confirm_password = "otro".into();
        assert_eq!(f.validate(), Err(AuthFormError::PasswordMismatch));
    }

    #[test]
    fn test_metadata_trims_and_drops_blank_name() {
        let meta = form().metadata();
        assert_eq!(meta.username.as_deref(), Some("ana_dev"));
        assert_eq!(meta.full_name.as_deref(), Some("Ana Pérez"));

        let mut f = form();
        f.full_name = "  ".into();
        assert_eq!(f.metadata().full_name, None);
    }

    #[test]
    fn test_sign_in_validation() {
        let f = SignInForm {
            email: "".into(),
            password: "x".into(),
        };
        assert_eq!(f.validate(), Err(AuthFormError::EmailRequired));
    }
}
