//! Translation context: current language plus both resource bundles.

use std::collections::HashMap;
use std::rc::Rc;

use api::i18n::{initial_language, store_language, Language, Translations};
use api::AppEvent;
use dioxus::prelude::*;

use crate::backend::{use_app, AppContext};

const ES_JSON: &str = include_str!("../assets/i18n/es.json");
const EN_JSON: &str = include_str!("../assets/i18n/en.json");

fn load_bundles() -> HashMap<Language, Translations> {
    [(Language::Es, ES_JSON), (Language::En, EN_JSON)]
        .into_iter()
        .map(|(language, json)| {
            let bundle = Translations::from_json(json).unwrap_or_else(|e| {
                tracing::error!("Bad {} translations: {}", language.code(), e);
                Translations::default()
            });
            (language, bundle)
        })
        .collect()
}

#[derive(Clone)]
pub struct I18n {
    language: Signal<Language>,
    bundles: Rc<HashMap<Language, Translations>>,
    app: AppContext,
}

impl I18n {
    pub fn language(&self) -> Language {
        (self.language)()
    }

    pub fn t(&self, key: &str) -> String {
        match self.bundles.get(&self.language()) {
            Some(bundle) => bundle.t(key),
            None => key.to_string(),
        }
    }

    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        match self.bundles.get(&self.language()) {
            Some(bundle) => bundle.t_with(key, args),
            None => key.to_string(),
        }
    }

    /// Switch language, persist the choice and tell the rest of the app.
    pub fn set_language(&mut self, language: Language) {
        if self.language() == language {
            return;
        }
        self.language.set(language);
        store_language(&self.app.local, language);
        self.app.events.publish(AppEvent::LanguageChanged(language));
    }
}

pub fn use_i18n() -> I18n {
    use_context::<I18n>()
}

#[component]
pub fn I18nProvider(children: Element) -> Element {
    let app = use_app();
    let language = use_signal(|| initial_language(&app.local, &app.config.ui.default_language));
    use_context_provider(|| I18n {
        language,
        bundles: Rc::new(load_bundles()),
        app: app.clone(),
    });

    rsx! {
        {children}
    }
}

#[component]
pub fn LanguageSelector() -> Element {
    let mut i18n = use_i18n();
    let current = i18n.language();
    let label = i18n.t("nav.language");

    rsx! {
        select {
            class: "language-selector",
            aria_label: "{label}",
            onchange: move |evt: Event<FormData>| {
                if let Some(language) = Language::parse(&evt.value()) {
                    i18n.set_language(language);
                }
            },
            for language in Language::ALL {
                option {
                    value: language.code(),
                    selected: language == current,
                    "{language.flag()} {language.label()}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn leaf_keys(value: &Value, prefix: &str, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    leaf_keys(v, &key, out);
                }
            }
            _ => out.push(prefix.to_string()),
        }
    }

    fn keys(json: &str) -> Vec<String> {
        let mut out = Vec::new();
        leaf_keys(&serde_json::from_str(json).unwrap(), "", &mut out);
        out.sort();
        out
    }

    #[test]
    fn test_bundles_parse_with_same_keys() {
        assert_eq!(keys(ES_JSON), keys(EN_JSON));
        let bundles = load_bundles();
        assert_eq!(bundles[&Language::Es].t("nav.explore"), "Explorar");
        assert_eq!(bundles[&Language::En].t("nav.explore"), "Explore");
    }

    #[test]
    fn test_controller_keys_are_translated() {
        let bundles = load_bundles();
        let keys = api::wizard::WizardStep::ALL
            .iter()
            .map(|s| s.title_key())
            .chain(api::production::ProductionTab::ALL.iter().map(|t| t.label_key()))
            .chain(
                [api::auth::AuthMode::Login, api::auth::AuthMode::Register]
                    .iter()
                    .flat_map(|m| [m.title_key(), m.submit_key(), m.switch_key()]),
            );
        for key in keys {
            for language in Language::ALL {
                assert!(bundles[&language].get(key).is_some(), "{key} missing in {language:?}");
            }
        }
    }
}
