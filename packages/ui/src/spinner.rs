use dioxus::prelude::*;

use crate::i18n::use_i18n;

#[component]
pub fn Spinner(#[props(default = "".to_string())] label: String) -> Element {
    rsx! {
        div {
            class: "spinner-wrap",
            div { class: "spinner", role: "progressbar" }
            if !label.is_empty() {
                p { class: "spinner-label", "{label}" }
            }
        }
    }
}

/// Full-page loading state.
#[component]
pub fn LoadingOverlay() -> Element {
    let i18n = use_i18n();
    rsx! {
        div {
            class: "loading-overlay",
            Spinner { label: i18n.t("common.loading") }
        }
    }
}
