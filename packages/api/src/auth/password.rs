//! Password rules checked before the form reaches the auth service.
//!
//! The service enforces its own minimum too; checking here keeps the round
//! trip for the obvious cases out of the network.

use super::form::AuthFormError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Length check plus confirmation match.
pub fn check_password(password: &str, confirm: &str) -> Result<(), AuthFormError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthFormError::PasswordTooShort);
    }
    if password != confirm {
        return Err(AuthFormError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert_eq!(check_password("12345", "12345"), Err(AuthFormError::PasswordTooShort));
        assert_eq!(check_password("123456", "123457"), Err(AuthFormError::PasswordMismatch));
        assert_eq!(check_password("contraseña", "contraseña"), Ok(()));
    }
}
