//! Languages and translation lookup.
//!
//! Resources are one JSON document per language, nested objects addressed by
//! dotted keys (`"wizard.step_cover"`). A missing key renders as the key itself
//! so gaps are visible on screen instead of blank.

use serde_json::Value;

use crate::local::LocalStore;

/// Browser-local key holding the chosen language code.
pub const LANGUAGE_STORAGE_KEY: &str = "p301.language";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Es, Language::En];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::Es => "Español",
            Language::En => "English",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Language::Es => "🇪🇸",
            Language::En => "🇬🇧",
        }
    }

    /// Accepts `"es"`, `"EN"`, `"es-MX"` and the like.
    pub fn parse(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|l| l.code() == primary)
    }
}

/// Parsed resource bundle for one language.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Translations {
    root: Value,
}

impl Translations {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            root: serde_json::from_str(json)?,
        })
    }

    /// Look up a dotted key. Only string leaves count.
    pub fn get(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.root, |node, part| node.get(part))?
            .as_str()
    }

    /// Translated text, or the key itself when missing.
    pub fn t(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }

    /// Like [`t`](Self::t), substituting `{name}` placeholders.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.t(key), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

/// Language to start with: the persisted choice if valid, else `default_code`,
/// else Spanish.
pub fn initial_language(local: &impl LocalStore, default_code: &str) -> Language {
    local
        .get(LANGUAGE_STORAGE_KEY)
        .and_then(|code| Language::parse(&code))
        .or_else(|| Language::parse(default_code))
        .unwrap_or_default()
}

/// Persist the language choice.
pub fn store_language(local: &impl LocalStore, language: Language) {
    local.set(LANGUAGE_STORAGE_KEY, language.code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryLocalStore;

    const ES: &str = r#"{
        "nav": { "explore": "Explorar", "login": "Iniciar sesión" },
        "catalog": { "count": "{n} proyectos" },
        "broken": { "leaf": 3 }
    }"#;

    #[test]
    fn test_dotted_lookup() {
        let tr = Translations::from_json(ES).unwrap();
        assert_eq!(tr.get("nav.explore"), Some("Explorar"));
        assert_eq!(tr.t("nav.login"), "Iniciar sesión");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let tr = Translations::from_json(ES).unwrap();
        assert_eq!(tr.t("nav.missing"), "nav.missing");
        assert_eq!(tr.t("nav"), "nav");
        assert_eq!(tr.t("broken.leaf"), "broken.leaf");
    }

    #[test]
    fn test_placeholders() {
        let tr = Translations::from_json(ES).unwrap();
        assert_eq!(tr.t_with("catalog.count", &[("n", "4")]), "4 proyectos");
    }

    #[test]
    fn test_parse_language_codes() {
        assert_eq!(Language::parse("es"), Some(Language::Es));
        assert_eq!(Language::parse("EN-us"), Some(Language::En));
        assert_eq!(Language::parse("fr"), None);
        assert_eq!(Language::parse(""), None);
    }

    #[test]
    fn test_initial_language_prefers_persisted_choice() {
        let local = MemoryLocalStore::new();
        assert_eq!(initial_language(&local, "es"), Language::Es);
        assert_eq!(initial_language(&local, "xx"), Language::Es);

        store_language(&local, Language::En);
        assert_eq!(initial_language(&local, "es"), Language::En);

        local.set(LANGUAGE_STORAGE_KEY, "klingon");
        assert_eq!(initial_language(&local, "en"), Language::En);
    }
}
