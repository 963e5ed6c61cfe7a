use dioxus::prelude::*;

use crate::i18n::LanguageSelector;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

/// Top bar: brand, page links passed as children, language switch.
#[component]
pub fn Navbar(on_home: EventHandler<()>, children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: APP_CSS }
        nav {
            class: "navbar",
            button {
                class: "navbar-brand",
                onclick: move |_| on_home.call(()),
                "Proyecto 301"
            }
            div {
                class: "navbar-links",
                {children}
            }
            LanguageSelector {}
        }
    }
}
