use api::catalog::Catalog;
use api::debounce::Debouncer;
use dioxus::prelude::*;

use crate::backend::use_app;
use crate::i18n::use_i18n;
use crate::project_card::ProjectCardView;
use crate::spinner::Spinner;
use crate::{icons, Icon};

/// Public catalog grouped by category, with a debounced search box.
#[component]
pub fn CatalogView(on_open_project: EventHandler<String>) -> Element {
    let app = use_app();
    let i18n = use_i18n();
    let mut catalog = use_signal(|| Option::<Catalog>::None);
    let mut failed = use_signal(|| false);
    let mut search_text = use_signal(String::new);
    let debouncer = use_hook(|| Debouncer::from_millis(app.config.ui.search_debounce_ms));

    let loader = app.clone();
    let mut load = use_resource(move || {
        let app = loader.clone();
        async move {
            failed.set(false);
            match Catalog::load(&app.backend).await {
                Ok(mut loaded) => {
                    loaded.search(&search_text.peek());
                    catalog.set(Some(loaded));
                }
                Err(e) => {
                    tracing::error!("Catalog load failed: {}", e);
                    failed.set(true);
                }
            }
        }
    });

    let on_search = move |evt: FormEvent| {
        let value = evt.value();
        search_text.set(value.clone());
        let debouncer = debouncer.clone();
        spawn(async move {
            if debouncer.settle().await {
                if let Some(c) = catalog.write().as_mut() {
                    c.search(&value);
                }
            }
        });
    };

    let body = match catalog() {
        None if failed() => rsx! {
            div {
                class: "empty-state",
                p { {i18n.t("catalog.load_error")} }
                button { class: "btn btn--primary", onclick: move |_| load.restart(), {i18n.t("common.retry")} }
            }
        },
        None => rsx! { Spinner { label: i18n.t("common.loading") } },
        Some(c) if c.total() == 0 => rsx! {
            p { class: "empty-state", {i18n.t("catalog.empty")} }
        },
        Some(c) => {
            let visible = c.visible().len();
            let count = visible.to_string();
            rsx! {
                p { class: "catalog-count", {i18n.t_with("catalog.count", &[("n", count.as_str())])} }
                if visible == 0 {
                    p { class: "empty-state", {i18n.t_with("catalog.no_results", &[("query", c.query())])} }
                }
                for group in c.groups() {
                    section {
                        key: "{group.category}",
                        class: "catalog-group",
                        h2 { "{group.category} " span { class: "muted", "({group.cards.len()})" } }
                        div {
                            class: "card-grid",
                            for card in group.cards {
                                ProjectCardView {
                                    key: "{card.project.id}",
                                    card: card.clone(),
                                    on_open: move |slug| on_open_project.call(slug),
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            class: "page catalog-page",
            header {
                class: "page-header",
                h1 { {i18n.t("catalog.title")} }
                div {
                    class: "search-box",
                    Icon { icon: icons::FaMagnifyingGlass, width: 14, height: 14 }
                    input {
                        r#type: "search",
                        placeholder: i18n.t("catalog.search_placeholder"),
                        value: "{search_text}",
                        oninput: on_search,
                    }
                }
            }
            {body}
        }
    }
}
