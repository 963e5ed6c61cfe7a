//! Project-creation wizard modal.

use std::time::Duration;

use api::wizard::{ProjectWizard, WizardField, WizardStep};
use dioxus::prelude::*;
use store::{Project, ProjectStatus, Visibility};

use crate::backend::use_app;
use crate::file_input::read_image;
use crate::i18n::use_i18n;
use crate::notifications::{notify, use_notifications, ToastLevel};
use crate::project_card::status_key;
use crate::views::ModalOverlay;
use crate::{icons, Icon};

#[component]
pub fn WizardModal(on_close: EventHandler<()>, on_created: EventHandler<Project>) -> Element {
    let app = use_app();
    let i18n = use_i18n();
    let mut notifications = use_notifications();
    let mut wizard = use_signal(ProjectWizard::new);
    let mut submitting = use_signal(|| false);
    let mut banner = use_signal(|| Option::<String>::None);
    let mut created = use_signal(|| Option::<Project>::None);

    let step = wizard.read().step();
    let last = step == WizardStep::Configuration;

    let t = i18n.clone();
    let submit = move |_: MouseEvent| {
        let app = app.clone();
        let i18n = t.clone();
        async move {
            submitting.set(true);
            banner.set(None);
            let mut draft = wizard();
            let result = draft
                .submit(&app.backend, &app.events, &app.config.storage.covers_bucket)
                .await;
            wizard.set(draft);
            submitting.set(false);
            match result {
                Ok(outcome) => {
                    for warning in &outcome.warnings {
                        notify(&mut notifications, ToastLevel::Warning, &i18n.t(warning.i18n_key()));
                    }
                    created.set(Some(outcome.project.clone()));
                    api::sleep(Duration::from_millis(u64::from(app.config.ui.close_delay_ms))).await;
                    wizard.write().reset();
                    created.set(None);
                    on_created.call(outcome.project);
                }
                Err(e) => {
                    tracing::warn!("Project submission refused: {}", e);
                    banner.set(Some(i18n.t(e.i18n_key())));
                }
            }
        }
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| {
                if !submitting() {
                    on_close.call(());
                }
            },
            div {
                class: "wizard",
                header {
                    class: "wizard-header",
                    h2 { {i18n.t("wizard.title")} }
                    ol {
                        class: "wizard-progress",
                        for s in WizardStep::ALL {
                            li {
                                class: if s == step { "active" } else if s < step { "done" } else { "" },
                                "{s.number()}"
                            }
                        }
                    }
                    h3 { {i18n.t(step.title_key())} }
                }

                if let Some(project) = created() {
                    div {
                        class: "wizard-success",
                        p { {i18n.t_with("wizard.success", &[("title", project.title.as_str())])} }
                    }
                } else {
                    div {
                        class: "wizard-body",
                        match step {
                            WizardStep::Cover => rsx! { CoverStep { wizard } },
                            WizardStep::Identity => rsx! { IdentityStep { wizard } },
                            WizardStep::Team => rsx! { TeamStep { wizard } },
                            WizardStep::Technology => rsx! { TechnologyStep { wizard } },
                            WizardStep::Configuration => rsx! { ConfigurationStep { wizard } },
                        }
                    }
                    if let Some(message) = banner() {
                        p { class: "form-error form-error--banner", "{message}" }
                    }
                    footer {
                        class: "wizard-footer",
                        button {
                            class: "btn btn--ghost",
                            disabled: step == WizardStep::Cover || submitting(),
                            onclick: move |_| {
                                wizard.write().prev();
                            },
                            {i18n.t("wizard.back")}
                        }
                        if last {
                            button {
                                class: "btn btn--primary",
                                disabled: submitting(),
                                onclick: submit,
                                if submitting() {
                                    {i18n.t("wizard.creating")}
                                } else {
                                    {i18n.t("wizard.create")}
                                }
                            }
                        } else {
                            button {
                                class: "btn btn--primary",
                                onclick: move |_| {
                                    if let Err(e) = wizard.write().next() {
                                        tracing::debug!("Wizard step refused: {}", e);
                                    }
                                },
                                {i18n.t("wizard.next")}
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn FieldError(wizard: Signal<ProjectWizard>, field: WizardField) -> Element {
    let i18n = use_i18n();
    match wizard.read().field_error(field) {
        Some(e) => rsx! { p { class: "form-error", {i18n.t(e.i18n_key())} } },
        None => rsx! {},
    }
}

#[component]
fn CoverStep(mut wizard: Signal<ProjectWizard>) -> Element {
    let i18n = use_i18n();
    let cover = wizard.read().draft().cover.clone();

    rsx! {
        label { {i18n.t("wizard.field_title")}
            input {
                r#type: "text",
                value: "{cover.title}",
                oninput: move |evt| wizard.write().set_title(&evt.value()),
            }
        }
        FieldError { wizard, field: WizardField::Title }
        label { {i18n.t("wizard.field_subtitle")}
            input {
                r#type: "text",
                value: "{cover.subtitle}",
                oninput: move |evt| wizard.write().set_subtitle(&evt.value()),
            }
        }
        label { {i18n.t("wizard.field_cover")}
            input {
                r#type: "file",
                accept: "image/*",
                onchange: move |evt| async move {
                    let image = read_image(&evt).await;
                    wizard.write().set_cover_image(image);
                },
            }
        }
        if let Some(image) = &cover.image {
            p { class: "wizard-file", "{image.file_name}" }
        }
    }
}

#[component]
fn IdentityStep(mut wizard: Signal<ProjectWizard>) -> Element {
    let i18n = use_i18n();
    let identity = wizard.read().draft().identity.clone();

    rsx! {
        label { {i18n.t("wizard.field_name")}
            input {
                r#type: "text",
                value: "{identity.name}",
                oninput: move |evt| wizard.write().set_name(&evt.value()),
            }
        }
        FieldError { wizard, field: WizardField::Name }
        label { {i18n.t("wizard.field_slug")}
            input {
                r#type: "text",
                value: "{identity.slug}",
                oninput: move |evt| wizard.write().edit_slug(&evt.value()),
            }
        }
        FieldError { wizard, field: WizardField::Slug }
        label { {i18n.t("wizard.field_description")}
            textarea {
                rows: 4,
                value: "{identity.description}",
                oninput: move |evt| wizard.write().set_description(&evt.value()),
            }
        }
        label { {i18n.t("wizard.field_category")}
            input {
                r#type: "text",
                value: "{identity.category}",
                oninput: move |evt| wizard.write().set_category(&evt.value()),
            }
        }
        label { {i18n.t("wizard.field_status")}
            select {
                onchange: move |evt| {
                    if let Some(status) = ProjectStatus::parse(&evt.value()) {
                        wizard.write().set_status(status);
                    }
                },
                for status in ProjectStatus::ALL {
                    option {
                        value: status.as_str(),
                        selected: status == identity.status,
                        {i18n.t(&status_key(status))}
                    }
                }
            }
        }
    }
}

#[component]
fn TeamStep(mut wizard: Signal<ProjectWizard>) -> Element {
    let i18n = use_i18n();
    let team = wizard.read().draft().team.clone();
    let mut role = use_signal(String::new);
    let mut description = use_signal(String::new);

    rsx! {
        div {
            class: "wizard-row",
            input {
                r#type: "text",
                placeholder: i18n.t("wizard.field_role"),
                value: "{role}",
                oninput: move |evt| role.set(evt.value()),
            }
            input {
                r#type: "text",
                placeholder: i18n.t("wizard.field_role_description"),
                value: "{description}",
                oninput: move |evt| description.set(evt.value()),
            }
            button {
                class: "btn btn--ghost",
                onclick: move |_| {
                    wizard.write().add_role(&role(), &description());
                    role.set(String::new());
                    description.set(String::new());
                },
                Icon { icon: icons::FaPlus, width: 12, height: 12 }
            }
        }
        ul {
            class: "wizard-list",
            for (index, r) in team.roles_needed.iter().enumerate() {
                li {
                    key: "{index}",
                    strong { "{r.role}" }
                    if !r.description.is_empty() {
                        " · {r.description}"
                    }
                    button {
                        class: "btn btn--icon",
                        onclick: move |_| wizard.write().remove_role(index),
                        Icon { icon: icons::FaXmark, width: 12, height: 12 }
                    }
                }
            }
        }
        label {
            class: "checkbox",
            input {
                r#type: "checkbox",
                checked: team.looking_for_team,
                onchange: move |evt| wizard.write().set_looking_for_team(evt.checked()),
            }
            {i18n.t("wizard.field_looking_for_team")}
        }
    }
}

/// Text box that turns Enter or the add button into a new chip.
#[component]
fn ChipInput(placeholder: String, chips: Vec<String>, on_add: EventHandler<String>, on_remove: EventHandler<String>) -> Element {
    let mut text = use_signal(String::new);

    rsx! {
        div {
            class: "wizard-row",
            input {
                r#type: "text",
                placeholder: "{placeholder}",
                value: "{text}",
                oninput: move |evt| text.set(evt.value()),
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.key() == Key::Enter {
                        evt.prevent_default();
                        on_add.call(text());
                        text.set(String::new());
                    }
                },
            }
            button {
                class: "btn btn--ghost",
                onclick: move |_| {
                    on_add.call(text());
                    text.set(String::new());
                },
                Icon { icon: icons::FaPlus, width: 12, height: 12 }
            }
        }
        div {
            class: "tag-list",
            for chip in chips {
                span {
                    key: "{chip}",
                    class: "tag tag--removable",
                    "{chip}"
                    button {
                        class: "btn btn--icon",
                        onclick: {
                            let chip = chip.clone();
                            move |_| on_remove.call(chip.clone())
                        },
                        Icon { icon: icons::FaXmark, width: 10, height: 10 }
                    }
                }
            }
        }
    }
}

#[component]
fn TechnologyStep(mut wizard: Signal<ProjectWizard>) -> Element {
    let i18n = use_i18n();
    let technology = wizard.read().draft().technology.clone();

    rsx! {
        h4 { {i18n.t("wizard.field_tags")} }
        ChipInput {
            placeholder: i18n.t("wizard.field_tags_placeholder"),
            chips: technology.tags,
            on_add: move |tag: String| wizard.write().add_tag(&tag),
            on_remove: move |tag: String| wizard.write().remove_tag(&tag),
        }
        h4 { {i18n.t("wizard.field_desired")} }
        ChipInput {
            placeholder: i18n.t("wizard.field_desired_placeholder"),
            chips: technology.desired,
            on_add: move |tech: String| wizard.write().add_desired_technology(&tech),
            on_remove: move |tech: String| wizard.write().remove_desired_technology(&tech),
        }
    }
}

#[component]
fn ConfigurationStep(mut wizard: Signal<ProjectWizard>) -> Element {
    let i18n = use_i18n();
    let config = wizard.read().draft().configuration.clone();

    rsx! {
        label { {i18n.t("wizard.field_visibility")}
            select {
                onchange: move |evt| {
                    if let Some(visibility) = Visibility::parse(&evt.value()) {
                        wizard.write().set_visibility(visibility);
                    }
                },
                for visibility in Visibility::ALL {
                    option {
                        value: visibility.as_str(),
                        selected: visibility == config.visibility,
                        {i18n.t(&format!("visibility.{}", visibility.as_str()))}
                    }
                }
            }
        }
        label { {i18n.t("wizard.field_repository")}
            input {
                r#type: "url",
                value: "{config.repository_url}",
                oninput: move |evt| wizard.write().set_repository_url(&evt.value()),
            }
        }
        label { {i18n.t("wizard.field_demo")}
            input {
                r#type: "url",
                value: "{config.demo_url}",
                oninput: move |evt| wizard.write().set_demo_url(&evt.value()),
            }
        }
        FieldError { wizard, field: WizardField::Name }
        FieldError { wizard, field: WizardField::Slug }
    }
}
