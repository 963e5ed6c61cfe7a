//! Persisted session token.

use crate::local::LocalStore;

/// Browser-local key for the access token of the last session.
pub const SESSION_TOKEN_KEY: &str = "p301.session";

/// Store the token, or clear it on `None`.
pub fn remember_token(local: &impl LocalStore, token: Option<&str>) {
    match token {
        Some(token) if !token.is_empty() => local.set(SESSION_TOKEN_KEY, token),
        _ => local.remove(SESSION_TOKEN_KEY),
    }
}

pub fn stored_token(local: &impl LocalStore) -> Option<String> {
    local.get(SESSION_TOKEN_KEY).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryLocalStore;

    #[test]
    fn test_remember_and_clear() {
        let local = MemoryLocalStore::new();
        assert_eq!(stored_token(&local), None);
        remember_token(&local, Some("abc"));
        assert_eq!(stored_token(&local).as_deref(), Some("abc"));
        remember_token(&local, None);
        assert_eq!(stored_token(&local), None);
    }
}
