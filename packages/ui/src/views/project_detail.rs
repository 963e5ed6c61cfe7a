use api::project_detail::{load_project_detail, ProjectDetail};
use api::ApiError;
use dioxus::prelude::*;

use crate::backend::use_app;
use crate::i18n::use_i18n;
use crate::markdown::Markdown;
use crate::project_card::status_key;
use crate::spinner::LoadingOverlay;
use crate::{icons, Icon};

#[derive(Clone, Debug, PartialEq)]
enum DetailState {
    Loading,
    NotFound,
    Failed(String),
    Loaded(ProjectDetail),
}

#[component]
pub fn ProjectDetailView(
    slug: String,
    on_open_profile: EventHandler<String>,
    on_open_production: EventHandler<String>,
) -> Element {
    let app = use_app();
    let i18n = use_i18n();

    let mut slug_signal = use_signal(|| slug.clone());
    if *slug_signal.peek() != slug {
        slug_signal.set(slug.clone());
    }

    let mut state = use_signal(|| DetailState::Loading);

    let mut loader = use_resource(move || {
        let app = app.clone();
        let slug = slug_signal();
        async move {
            state.set(DetailState::Loading);
            match load_project_detail(&app.backend, &slug).await {
                Ok(detail) => state.set(DetailState::Loaded(detail)),
                Err(ApiError::NotFound(_)) => state.set(DetailState::NotFound),
                Err(e) => {
                    tracing::error!("Project {} failed to load: {}", slug, e);
                    state.set(DetailState::Failed(e.to_string()));
                }
            }
        }
    });

    let detail = match state() {
        DetailState::Loading => return rsx! { LoadingOverlay {} },
        DetailState::NotFound => {
            return rsx! { div { class: "empty-state", h2 { {i18n.t("project.not_found")} } } };
        }
        DetailState::Failed(message) => {
            return rsx! {
                div {
                    class: "empty-state",
                    p { {i18n.t("project.load_error")} }
                    p { class: "muted", "{message}" }
                    button { class: "btn btn--primary", onclick: move |_| loader.restart(), {i18n.t("common.retry")} }
                }
            };
        }
        DetailState::Loaded(detail) => detail,
    };

    let project = detail.project.clone();
    let project_id = project.id.clone();
    let creator_label = detail
        .creator
        .as_ref()
        .map(|p| p.display_name().to_string())
        .unwrap_or_else(|| api::catalog::placeholder_author(&project.creator_id));
    let creator_handle = detail
        .creator
        .as_ref()
        .map(|p| p.username.clone())
        .unwrap_or_else(|| project.creator_id.clone());

    rsx! {
        article {
            class: "page project-page",
            if let Some(url) = &project.cover_image_url {
                img { class: "project-cover", src: "{url}", alt: "{project.title}" }
            }
            header {
                class: "page-header",
                div {
                    h1 { "{project.title}" }
                    if let Some(subtitle) = &project.subtitle {
                        p { class: "project-subtitle", "{subtitle}" }
                    }
                    p {
                        class: "muted",
                        {i18n.t("project.by")}
                        " "
                        button {
                            class: "btn btn--link",
                            onclick: move |_| on_open_profile.call(creator_handle.clone()),
                            "{creator_label}"
                        }
                    }
                }
                div {
                    class: "project-badges",
                    span { class: "badge badge--{project.status.as_str()}", {i18n.t(&status_key(project.status))} }
                    if project.looking_for_team {
                        span { class: "badge badge--team", {i18n.t("catalog.looking_for_team")} }
                    }
                    if detail.viewer_is_creator {
                        button {
                            class: "btn btn--primary",
                            onclick: move |_| on_open_production.call(project_id.clone()),
                            {i18n.t("dashboard.production")}
                        }
                    }
                }
            }

            if let Some(description) = &project.description {
                Markdown { source: description.clone(), class: "project-description" }
            }

            div {
                class: "project-links",
                if let Some(repo) = &project.repository_url {
                    a { href: "{repo}", target: "_blank", rel: "noopener",
                        Icon { icon: icons::FaCode, width: 12, height: 12 }
                        " "
                        {i18n.t("project.repository")}
                    }
                }
                if let Some(demo) = &project.demo_url {
                    a { href: "{demo}", target: "_blank", rel: "noopener",
                        Icon { icon: icons::FaArrowUpRightFromSquare, width: 12, height: 12 }
                        " "
                        {i18n.t("project.demo")}
                    }
                }
            }

            if !project.tags.is_empty() {
                section {
                    h2 { {i18n.t("project.technologies")} }
                    div {
                        class: "tag-list",
                        for tag in project.tags.iter() {
                            span { class: "tag", "{tag}" }
                        }
                    }
                }
            }

            if !detail.desired_technologies.is_empty() {
                section {
                    h2 { {i18n.t("project.desired_technologies")} }
                    div {
                        class: "tag-list",
                        for tech in detail.desired_technologies.iter() {
                            span { class: "tag tag--wanted", "{tech.technology}" }
                        }
                    }
                }
            }

            if !detail.roles_needed.is_empty() {
                section {
                    h2 { {i18n.t("project.roles_needed")} }
                    ul {
                        class: "role-list",
                        for role in detail.roles_needed.iter() {
                            li {
                                strong { "{role.role}" }
                                if let Some(description) = &role.description {
                                    " · {description}"
                                }
                            }
                        }
                    }
                }
            }

            section {
                h2 {
                    Icon { icon: icons::FaUsers, width: 14, height: 14 }
                    " "
                    {i18n.t("project.team")}
                }
                if detail.members.is_empty() {
                    p { class: "muted", {i18n.t("project.no_members")} }
                }
                ul {
                    class: "member-list",
                    for member in detail.members.clone() {
                        li {
                            key: "{member.member.user_id}",
                            "{member.label()}"
                            if let Some(role) = &member.member.role {
                                span { class: "muted", " · {role}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
