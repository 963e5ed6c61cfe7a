use api::timeline::{build_timeline, TimelineIcon, TimelineMarker};
use dioxus::prelude::*;
use store::Experience;

use crate::i18n::use_i18n;
use crate::{icons, Icon};

fn marker_icon(icon: TimelineIcon) -> Element {
    match icon {
        TimelineIcon::Briefcase => rsx! { Icon { icon: icons::FaBriefcase, width: 14, height: 14 } },
        TimelineIcon::GraduationCap => rsx! { Icon { icon: icons::FaGraduationCap, width: 14, height: 14 } },
        TimelineIcon::Code => rsx! { Icon { icon: icons::FaCode, width: 14, height: 14 } },
        TimelineIcon::HandHeart => rsx! { Icon { icon: icons::FaHandHoldingHeart, width: 14, height: 14 } },
        TimelineIcon::Certificate => rsx! { Icon { icon: icons::FaCertificate, width: 14, height: 14 } },
    }
}

/// Career timeline, newest first. Edit and delete controls only render for
/// the owner.
#[component]
pub fn Timeline(
    experiences: Vec<Experience>,
    is_owner: bool,
    on_edit: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let i18n = use_i18n();
    let markers = build_timeline(&experiences);

    if markers.is_empty() {
        return rsx! {
            p { class: "timeline-empty", {i18n.t("profile.timeline_empty")} }
        };
    }

    rsx! {
        ol {
            class: "timeline",
            for marker in markers {
                TimelineEntry {
                    key: "{marker.id}",
                    marker: marker.clone(),
                    is_owner,
                    on_edit,
                    on_delete,
                }
            }
        }
    }
}

#[component]
fn TimelineEntry(
    marker: TimelineMarker,
    is_owner: bool,
    on_edit: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let i18n = use_i18n();
    let edit_id = marker.id.clone();
    let delete_id = marker.id.clone();

    rsx! {
        li {
            class: "timeline-item",
            span { class: "timeline-icon {marker.icon.css_class()}", {marker_icon(marker.icon)} }
            div {
                class: "timeline-content",
                h4 { "{marker.title}" }
                if let Some(subtitle) = &marker.subtitle {
                    p { class: "timeline-subtitle", "{subtitle}" }
                }
                p {
                    class: "timeline-period",
                    "{marker.period}"
                    if let Some(location) = &marker.location {
                        " · {location}"
                    }
                }
                if let Some(description) = &marker.description {
                    p { class: "timeline-description", "{description}" }
                }
                if !marker.achievements.is_empty() {
                    ul {
                        class: "timeline-achievements",
                        for achievement in marker.achievements.iter() {
                            li { "{achievement}" }
                        }
                    }
                }
                div {
                    class: "tag-list",
                    for tech in marker.technologies.iter() {
                        span { class: "tag", "{tech}" }
                    }
                }
                if let Some(link) = &marker.link {
                    a { href: "{link}", target: "_blank", rel: "noopener", {i18n.t("profile.timeline_link")} }
                }
                if is_owner {
                    div {
                        class: "timeline-actions",
                        button {
                            class: "btn btn--ghost",
                            onclick: move |_| on_edit.call(edit_id.clone()),
                            {i18n.t("common.edit")}
                        }
                        button {
                            class: "btn btn--danger",
                            onclick: move |_| on_delete.call(delete_id.clone()),
                            {i18n.t("common.delete")}
                        }
                    }
                }
            }
        }
    }
}
