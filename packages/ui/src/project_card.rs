use api::catalog::ProjectCard;
use dioxus::prelude::*;

use crate::i18n::use_i18n;
use crate::{icons, Icon};

pub fn status_key(status: store::ProjectStatus) -> String {
    format!("status.{}", status.as_str())
}

/// Catalog tile. Clicking it reports the project's slug.
#[component]
pub fn ProjectCardView(card: ProjectCard, on_open: EventHandler<String>) -> Element {
    let i18n = use_i18n();
    let project = card.project.clone();
    let slug = project.slug.clone();
    let status = i18n.t(&status_key(project.status));
    let subtitle = project.subtitle.clone().unwrap_or_default();

    rsx! {
        article {
            class: "project-card",
            onclick: move |_| on_open.call(slug.clone()),
            if let Some(url) = project.cover_image_url.clone() {
                img { class: "project-card-cover", src: "{url}", alt: "{project.title}" }
            } else {
                div { class: "project-card-cover project-card-cover--empty",
                    Icon { icon: icons::FaLightbulb, width: 32, height: 32 }
                }
            }
            div {
                class: "project-card-body",
                h3 { "{project.title}" }
                if !subtitle.is_empty() {
                    p { class: "project-card-subtitle", "{subtitle}" }
                }
                div {
                    class: "project-card-meta",
                    span { class: "badge badge--{project.status.as_str()}", "{status}" }
                    span {
                        class: "project-card-author",
                        Icon { icon: icons::FaUser, width: 12, height: 12 }
                        " {card.author}"
                    }
                    if project.looking_for_team {
                        span { class: "badge badge--team", {i18n.t("catalog.looking_for_team")} }
                    }
                }
                div {
                    class: "tag-list",
                    for tag in project.tags.iter().take(4) {
                        span { class: "tag", "{tag}" }
                    }
                }
            }
        }
    }
}
