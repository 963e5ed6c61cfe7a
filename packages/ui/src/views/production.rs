use api::production::{group_tasks, production_location, resolve_project_id, ProductionTab, TaskBoard};
use api::project_detail::TeamMember;
use api::ApiError;
use dioxus::prelude::*;
use store::{ChatMessage, Task, TaskPriority, TaskStatus};

use crate::backend::{use_app, AppBackend};
use crate::i18n::use_i18n;
use crate::notifications::{notify, use_notifications, Notifications, ToastLevel};
use crate::spinner::LoadingOverlay;
use crate::{icons, Icon};

#[derive(Clone, Debug, PartialEq)]
enum BoardState {
    Loading,
    NoProject,
    Failed(String),
    Ready,
}

fn task_status_key(status: TaskStatus) -> String {
    format!("production.status_{}", status.as_str())
}

fn report(notifications: &mut Signal<Notifications>, result: Result<(), ApiError>) {
    if let Err(e) = result {
        notify(notifications, ToastLevel::Error, &e.to_string());
    }
}

/// Work area of one project. `on_location_change` receives the new
/// `/produccion?...` location whenever the tab or project changes.
#[component]
pub fn ProductionView(
    project_id: Option<String>,
    tab: Option<String>,
    on_login: EventHandler<()>,
    on_location_change: EventHandler<String>,
) -> Element {
    let app = use_app();
    let i18n = use_i18n();
    let mut notifications = use_notifications();

    let active = ProductionTab::parse(tab.as_deref());
    let mut query_signal = use_signal(|| project_id.clone());
    if *query_signal.peek() != project_id {
        query_signal.set(project_id.clone());
    }

    let mut state = use_signal(|| BoardState::Loading);
    let mut board = use_signal(|| Option::<TaskBoard<AppBackend>>::None);
    let mut tasks = use_signal(Vec::<Task>::new);
    let mut messages = use_signal(Vec::<ChatMessage>::new);
    let mut members = use_signal(Vec::<TeamMember>::new);

    let _ = use_resource(move || {
        let app = app.clone();
        let from_query = query_signal();
        async move {
            state.set(BoardState::Loading);
            if let Err(e) = app.ready.wait(&app.config.bootstrap).await {
                state.set(BoardState::Failed(e.to_string()));
                return;
            }
            let Some(id) = resolve_project_id(from_query.as_deref(), &app.local) else {
                state.set(BoardState::NoProject);
                return;
            };
            if from_query.as_deref() != Some(id.as_str()) {
                on_location_change.call(production_location(&id, active));
            }
            let opened = match TaskBoard::open(app.backend.clone(), &id).await {
                Ok(opened) => opened,
                Err(ApiError::NotAuthenticated) => {
                    on_login.call(());
                    return;
                }
                Err(e) => {
                    state.set(BoardState::Failed(e.to_string()));
                    return;
                }
            };
            let (t, m, team) = (opened.tasks().await, opened.messages().await, opened.members().await);
            match t {
                Ok(t) => tasks.set(t),
                Err(e) => tracing::warn!("Tasks unavailable: {}", e),
            }
            match m {
                Ok(m) => messages.set(m),
                Err(e) => tracing::warn!("Messages unavailable: {}", e),
            }
            match team {
                Ok(team) => members.set(team),
                Err(e) => tracing::warn!("Team unavailable: {}", e),
            }
            board.set(Some(opened));
            state.set(BoardState::Ready);
        }
    });

    match state() {
        BoardState::Loading => return rsx! { LoadingOverlay {} },
        BoardState::NoProject => {
            return rsx! { div { class: "empty-state", p { {i18n.t("production.no_project")} } } };
        }
        BoardState::Failed(message) => {
            return rsx! {
                div {
                    class: "empty-state",
                    p { {i18n.t("production.load_error")} }
                    p { class: "muted", "{message}" }
                }
            };
        }
        BoardState::Ready => {}
    }

    let current_id = board.read().as_ref().map(|b| b.project_id().to_string()).unwrap_or_default();
    let user_id = board.read().as_ref().map(|b| b.user().id.clone()).unwrap_or_default();

    rsx! {
        div {
            class: "page production-page",
            nav {
                class: "tabs",
                for t in ProductionTab::ALL {
                    button {
                        class: if t == active { "tab tab--active" } else { "tab" },
                        onclick: {
                            let id = current_id.clone();
                            move |_| on_location_change.call(production_location(&id, t))
                        },
                        {i18n.t(t.label_key())}
                    }
                }
            }
            match active {
                ProductionTab::Tasks => rsx! {
                    TaskTab {
                        tasks: tasks(),
                        on_create: move |(title, description, priority): (String, String, TaskPriority)| async move {
                            let Some(b) = board() else { return };
                            let result = b.create_task(&title, &description, priority).await.map(|task| {
                                tasks.write().push(task);
                            });
                            report(&mut notifications, result);
                        },
                        on_status: move |(id, status): (String, TaskStatus)| async move {
                            let Some(b) = board() else { return };
                            let result = b.set_status(&id, status).await.map(|()| {
                                if let Some(task) = tasks.write().iter_mut().find(|t| t.id == id) {
                                    task.status = status;
                                }
                            });
                            report(&mut notifications, result);
                        },
                        on_delete: move |id: String| async move {
                            let Some(b) = board() else { return };
                            let result = b.delete_task(&id).await.map(|()| {
                                tasks.write().retain(|t| t.id != id);
                            });
                            report(&mut notifications, result);
                        },
                    }
                },
                ProductionTab::Chat => rsx! {
                    ChatTab {
                        messages: messages(),
                        members: members(),
                        user_id: user_id.clone(),
                        on_send: move |content: String| async move {
                            let Some(b) = board() else { return };
                            let result = b.send_message(&content).await.map(|message| {
                                messages.write().push(message);
                            });
                            report(&mut notifications, result);
                        },
                    }
                },
                ProductionTab::Team => rsx! {
                    ul {
                        class: "member-list",
                        if members().is_empty() {
                            p { class: "muted", {i18n.t("project.no_members")} }
                        }
                        for member in members() {
                            li {
                                key: "{member.member.user_id}",
                                "{member.label()}"
                                if let Some(role) = &member.member.role {
                                    span { class: "muted", " · {role}" }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn TaskTab(
    tasks: Vec<Task>,
    on_create: EventHandler<(String, String, TaskPriority)>,
    on_status: EventHandler<(String, TaskStatus)>,
    on_delete: EventHandler<String>,
) -> Element {
    let i18n = use_i18n();
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut priority = use_signal(TaskPriority::default);

    rsx! {
        form {
            class: "task-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                on_create.call((title(), description(), priority()));
                title.set(String::new());
                description.set(String::new());
            },
            input {
                r#type: "text",
                placeholder: i18n.t("production.task_title"),
                value: "{title}",
                oninput: move |evt| title.set(evt.value()),
            }
            input {
                r#type: "text",
                placeholder: i18n.t("production.task_description"),
                value: "{description}",
                oninput: move |evt| description.set(evt.value()),
            }
            select {
                onchange: move |evt| {
                    priority.set(match evt.value().as_str() {
                        "low" => TaskPriority::Low,
                        "high" => TaskPriority::High,
                        _ => TaskPriority::Medium,
                    });
                },
                option { value: "low", selected: priority() == TaskPriority::Low, {i18n.t("production.priority_low")} }
                option { value: "medium", selected: priority() == TaskPriority::Medium, {i18n.t("production.priority_medium")} }
                option { value: "high", selected: priority() == TaskPriority::High, {i18n.t("production.priority_high")} }
            }
            button { class: "btn btn--primary", r#type: "submit",
                Icon { icon: icons::FaPlus, width: 12, height: 12 }
            }
        }
        div {
            class: "task-columns",
            for (status, bucket) in group_tasks(&tasks) {
                section {
                    key: "{status.as_str()}",
                    class: "task-column",
                    h3 { {i18n.t(&task_status_key(status))} " ({bucket.len()})" }
                    for task in bucket {
                        div {
                            key: "{task.id}",
                            class: "task-card",
                            strong { "{task.title}" }
                            if let Some(d) = &task.description {
                                p { class: "muted", "{d}" }
                            }
                            div {
                                class: "task-actions",
                                select {
                                    onchange: {
                                        let id = task.id.clone();
                                        move |evt: FormEvent| {
                                            if let Some(s) = TaskStatus::ALL.into_iter().find(|s| s.as_str() == evt.value()) {
                                                on_status.call((id.clone(), s));
                                            }
                                        }
                                    },
                                    for s in TaskStatus::ALL {
                                        option { value: s.as_str(), selected: s == task.status, {i18n.t(&task_status_key(s))} }
                                    }
                                }
                                button {
                                    class: "btn btn--icon",
                                    onclick: {
                                        let id = task.id.clone();
                                        move |_| on_delete.call(id.clone())
                                    },
                                    Icon { icon: icons::FaTrashCan, width: 12, height: 12 }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ChatTab(
    messages: Vec<ChatMessage>,
    members: Vec<TeamMember>,
    user_id: String,
    on_send: EventHandler<String>,
) -> Element {
    let i18n = use_i18n();
    let mut draft = use_signal(String::new);

    let author = |id: &str| -> String {
        members
            .iter()
            .find(|m| m.member.user_id == id)
            .map(|m| m.label())
            .unwrap_or_else(|| api::catalog::placeholder_author(id))
    };

    rsx! {
        ol {
            class: "chat-log",
            if messages.is_empty() {
                p { class: "muted", {i18n.t("production.chat_empty")} }
            }
            for message in messages.iter() {
                li {
                    key: "{message.id}",
                    class: if message.user_id == user_id { "chat-message chat-message--own" } else { "chat-message" },
                    span { class: "chat-author", {author(&message.user_id)} }
                    p { "{message.content}" }
                }
            }
        }
        form {
            class: "chat-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                on_send.call(draft());
                draft.set(String::new());
            },
            input {
                r#type: "text",
                placeholder: i18n.t("production.chat_placeholder"),
                value: "{draft}",
                oninput: move |evt| draft.set(evt.value()),
            }
            button { class: "btn btn--primary", r#type: "submit",
                Icon { icon: icons::FaPaperPlane, width: 12, height: 12 }
            }
        }
    }
}
