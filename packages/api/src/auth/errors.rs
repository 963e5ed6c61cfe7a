//! Auth service messages mapped to what the user reads.
//!
//! The service answers in English with free-form text, so matching is by
//! case-insensitive substring, first hit wins.

const AUTH_MESSAGES: &[(&str, &str)] = &[
    ("invalid login credentials", "Correo o contraseña incorrectos"),
    ("email not confirmed", "Debes confirmar tu correo antes de iniciar sesión"),
    ("user already registered", "Ya existe una cuenta con este correo"),
    ("password should be at least", "La contraseña debe tener al menos 6 caracteres"),
    ("unable to validate email address", "El correo electrónico no es válido"),
    ("rate limit", "Demasiados intentos. Espera unos minutos e inténtalo de nuevo"),
    ("network error", "No se pudo conectar con el servidor"),
];

pub const UNKNOWN_AUTH_ERROR: &str = "Error desconocido. Inténtalo de nuevo.";

/// Localized message for a raw auth-service error.
pub fn auth_error_message(raw: &str) -> &'static str {
    let raw = raw.to_lowercase();
    AUTH_MESSAGES
        .iter()
        .find(|(needle, _)| raw.contains(needle))
        .map(|(_, message)| *message)
        .unwrap_or(UNKNOWN_AUTH_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_messages() {
        assert_eq!(
            auth_error_message("Invalid login credentials"),
            "Correo o contraseña incorrectos"
        );
        assert_eq!(
            auth_error_message("Password should be at least 6 characters"),
            "La contraseña debe tener al menos 6 caracteres"
        );
        assert_eq!(
            auth_error_message("Email rate limit exceeded"),
            "Demasiados intentos. Espera unos minutos e inténtalo de nuevo"
        );
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(auth_error_message("something odd"), UNKNOWN_AUTH_ERROR);
        assert_eq!(auth_error_message(""), UNKNOWN_AUTH_ERROR);
    }
}
