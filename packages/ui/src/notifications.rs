use std::time::Duration;

use dioxus::prelude::*;

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    fn css_class(self) -> &'static str {
        match self {
            ToastLevel::Info => "toast toast--info",
            ToastLevel::Success => "toast toast--success",
            ToastLevel::Warning => "toast toast--warning",
            ToastLevel::Error => "toast toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notifications {
    pub toasts: Vec<Toast>,
    next_id: u64,
}

impl Notifications {
    pub fn push(&mut self, level: ToastLevel, message: &str) -> u64 {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            level,
            message: message.to_string(),
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }
}

pub fn use_notifications() -> Signal<Notifications> {
    use_context::<Signal<Notifications>>()
}

/// Show a toast and drop it after a few seconds.
pub fn notify(notifications: &mut Signal<Notifications>, level: ToastLevel, message: &str) {
    match level {
        ToastLevel::Error => tracing::error!("{}", message),
        ToastLevel::Warning => tracing::warn!("{}", message),
        _ => tracing::info!("{}", message),
    }
    let id = notifications.write().push(level, message);
    let mut notifications = *notifications;
    spawn(async move {
        api::sleep(TOAST_LIFETIME).await;
        notifications.write().dismiss(id);
    });
}

#[component]
pub fn NotificationProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(Notifications::default()));

    rsx! {
        {children}
        ToastHost {}
    }
}

#[component]
fn ToastHost() -> Element {
    let mut notifications = use_notifications();

    rsx! {
        div {
            class: "toast-host",
            for toast in notifications().toasts {
                div {
                    key: "{toast.id}",
                    class: toast.level.css_class(),
                    role: "status",
                    span { "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: move |_| notifications.write().dismiss(toast.id),
                        "×"
                    }
                }
            }
        }
    }
}
