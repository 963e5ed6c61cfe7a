use api::dashboard::{load_critical, load_metrics, DashboardCritical, DashboardMetrics};
use api::{ApiError, AppEvent};
use dioxus::prelude::*;
use store::Project;

use crate::backend::use_app;
use crate::i18n::use_i18n;
use crate::notifications::{notify, use_notifications, ToastLevel};
use crate::project_card::status_key;
use crate::spinner::LoadingOverlay;
use crate::wizard::WizardModal;
use crate::{icons, Icon};

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Loading,
    Failed(String),
    Ready(DashboardCritical),
}

/// Signed-in home. Projects load first; metrics follow and may stay empty.
#[component]
pub fn DashboardView(
    on_login: EventHandler<()>,
    on_open_project: EventHandler<String>,
    on_open_production: EventHandler<String>,
) -> Element {
    let app = use_app();
    let i18n = use_i18n();
    let mut notifications = use_notifications();
    let mut phase = use_signal(|| Phase::Loading);
    let mut metrics = use_signal(|| Option::<DashboardMetrics>::None);
    let mut show_wizard = use_signal(|| false);
    let mut generation = use_signal(|| 0u32);

    let loader = app.clone();
    let _ = use_resource(move || {
        let app = loader.clone();
        let _ = generation();
        async move {
            if let Err(e) = app.ready.wait(&app.config.bootstrap).await {
                phase.set(Phase::Failed(e.to_string()));
                return;
            }
            let critical = match load_critical(&app.backend).await {
                Ok(critical) => critical,
                Err(ApiError::NotAuthenticated) => {
                    on_login.call(());
                    return;
                }
                Err(e) => {
                    tracing::error!("Dashboard load failed: {}", e);
                    phase.set(Phase::Failed(e.to_string()));
                    return;
                }
            };
            phase.set(Phase::Ready(critical.clone()));
            metrics.set(Some(load_metrics(&app.backend, &critical).await));
        }
    });

    use_future(move || {
        let app = app.clone();
        async move {
            let mut events = app.events.stream();
            while let Some(event) = events.next().await {
                if let AppEvent::ProjectCreated { slug, .. } = event {
                    tracing::debug!(slug, "Refreshing dashboard");
                    generation += 1;
                }
            }
        }
    });

    let critical = match phase() {
        Phase::Loading => return rsx! { LoadingOverlay {} },
        Phase::Failed(message) => {
            return rsx! {
                div {
                    class: "empty-state",
                    p { {i18n.t("dashboard.load_error")} }
                    p { class: "muted", "{message}" }
                    button { class: "btn btn--primary", onclick: move |_| generation += 1, {i18n.t("common.retry")} }
                }
            };
        }
        Phase::Ready(critical) => critical,
    };

    let name = critical.greeting_name();
    let m = metrics();

    rsx! {
        div {
            class: "page dashboard-page",
            header {
                class: "page-header",
                h1 { {i18n.t_with("dashboard.greeting", &[("name", name.as_str())])} }
                button {
                    class: "btn btn--primary",
                    onclick: move |_| show_wizard.set(true),
                    Icon { icon: icons::FaPlus, width: 12, height: 12 }
                    " "
                    {i18n.t("dashboard.new_project")}
                }
            }

            section {
                class: "metric-grid",
                MetricCard { label: i18n.t("dashboard.projects"), value: critical.projects.len().to_string() }
                if let Some(m) = &m {
                    MetricCard { label: i18n.t("dashboard.total_views"), value: m.total_views.to_string() }
                    MetricCard { label: i18n.t("dashboard.unique_viewers"), value: m.unique_viewers.to_string() }
                    MetricCard { label: i18n.t("dashboard.collaborations"), value: m.collaborations.to_string() }
                } else {
                    p { class: "muted", {i18n.t("dashboard.metrics_loading")} }
                }
            }

            if let Some(m) = &m {
                section {
                    class: "status-breakdown",
                    h2 { {i18n.t("dashboard.by_status")} }
                    ul {
                        for (status, count) in m.status_counts.iter().filter(|(_, n)| *n > 0) {
                            li {
                                span { class: "badge badge--{status.as_str()}", {i18n.t(&status_key(*status))} }
                                " {count}"
                            }
                        }
                    }
                }
            }

            section {
                class: "dashboard-projects",
                h2 { {i18n.t("dashboard.my_projects")} }
                if critical.projects.is_empty() {
                    p { class: "empty-state", {i18n.t("dashboard.no_projects")} }
                }
                for project in critical.projects.clone() {
                    DashboardRow {
                        key: "{project.id}",
                        views: m.as_ref().and_then(|m| m.views.get(&project.id)).map(|v| v.total_views),
                        project: project.clone(),
                        on_open_project,
                        on_open_production,
                    }
                }
            }
        }

        if show_wizard() {
            WizardModal {
                on_close: move |_| show_wizard.set(false),
                on_created: move |project: Project| {
                    show_wizard.set(false);
                    notify(&mut notifications, ToastLevel::Success, &project.title);
                },
            }
        }
    }
}

#[component]
fn MetricCard(label: String, value: String) -> Element {
    rsx! {
        div {
            class: "metric-card",
            span { class: "metric-value", "{value}" }
            span { class: "metric-label", "{label}" }
        }
    }
}

#[component]
fn DashboardRow(
    project: Project,
    views: Option<i64>,
    on_open_project: EventHandler<String>,
    on_open_production: EventHandler<String>,
) -> Element {
    let i18n = use_i18n();
    let slug = project.slug.clone();
    let id = project.id.clone();

    rsx! {
        div {
            class: "dashboard-row",
            div {
                class: "dashboard-row-main",
                strong { "{project.title}" }
                span { class: "badge badge--{project.status.as_str()}", {i18n.t(&status_key(project.status))} }
                span { class: "muted", {i18n.t(&format!("visibility.{}", project.visibility.as_str()))} }
            }
            if let Some(views) = views {
                span {
                    class: "dashboard-row-views",
                    Icon { icon: icons::FaEye, width: 12, height: 12 }
                    " {views}"
                }
            }
            div {
                class: "dashboard-row-actions",
                button { class: "btn btn--ghost", onclick: move |_| on_open_project.call(slug.clone()), {i18n.t("dashboard.view")} }
                button { class: "btn btn--ghost", onclick: move |_| on_open_production.call(id.clone()), {i18n.t("dashboard.production")} }
            }
        }
    }
}
