use api::experience::{ExperienceForm, ExperienceManager};
use api::profile::{load_profile_page, update_profile, upload_avatar, ProfileForm, ProfilePage};
use api::{ApiError, AppEvent};
use dioxus::prelude::*;
use store::{Experience, ExperienceKind};

use crate::backend::{use_app, AppBackend};
use crate::file_input::read_image;
use crate::i18n::use_i18n;
use crate::markdown::Markdown;
use crate::notifications::{notify, use_notifications, ToastLevel};
use crate::project_card::status_key;
use crate::spinner::LoadingOverlay;
use crate::timeline::Timeline;
use crate::{icons, Icon};

#[derive(Clone, Debug, PartialEq)]
enum PageState {
    Loading,
    NotFound,
    Failed(String),
    Loaded(ProfilePage),
}

/// Entry being edited: `None` id means a new one.
#[derive(Clone, Debug, PartialEq)]
struct ExperienceEdit {
    id: Option<String>,
    form: ExperienceForm,
    error: Option<String>,
}

#[component]
pub fn ProfileView(handle: String, on_login: EventHandler<()>, on_open_project: EventHandler<String>) -> Element {
    let app = use_app();
    let i18n = use_i18n();
    let mut notifications = use_notifications();

    // Track the handle in a signal so the loader reruns on route param change
    let mut handle_signal = use_signal(|| handle.clone());
    if *handle_signal.peek() != handle {
        handle_signal.set(handle.clone());
    }

    let mut state = use_signal(|| PageState::Loading);
    let mut manager = use_signal(|| Option::<ExperienceManager<AppBackend>>::None);
    let mut experiences = use_signal(Vec::<Experience>::new);
    let mut editing = use_signal(|| Option::<ExperienceEdit>::None);
    let mut profile_form = use_signal(|| Option::<ProfileForm>::None);
    let mut generation = use_signal(|| 0u32);

    let loader = app.clone();
    let _ = use_resource(move || {
        let app = loader.clone();
        let segment = handle_signal();
        let _ = generation();
        async move {
            state.set(PageState::Loading);
            let page = match load_profile_page(&app.backend, &app.events, &segment).await {
                Ok(page) => page,
                Err(ApiError::NotFound(_)) => {
                    state.set(PageState::NotFound);
                    return;
                }
                Err(e) => {
                    tracing::error!("Profile {} failed to load: {}", segment, e);
                    state.set(PageState::Failed(e.to_string()));
                    return;
                }
            };
            let mut mgr = ExperienceManager::new(app.backend.clone(), app.events.clone(), page.profile.id.clone());
            mgr.set_ownership(page.access.is_owner());
            match mgr.load().await {
                Ok(list) => experiences.set(list.to_vec()),
                Err(e) => tracing::warn!("Experiences unavailable: {}", e),
            }
            manager.set(Some(mgr));
            state.set(PageState::Loaded(page));
        }
    });

    let listener = app.clone();
    use_future(move || {
        let app = listener.clone();
        async move {
            let mut events = app.events.stream();
            while let Some(event) = events.next().await {
                match &event {
                    AppEvent::SessionChanged(_) => generation += 1,
                    AppEvent::OwnershipChanged(_) => {
                        if let Some(mgr) = manager.write().as_mut() {
                            mgr.apply_event(&event);
                        }
                    }
                    _ => {}
                }
            }
        }
    });

    let page = match state() {
        PageState::Loading => return rsx! { LoadingOverlay {} },
        PageState::NotFound => {
            return rsx! { div { class: "empty-state", h2 { {i18n.t("profile.not_found")} } } };
        }
        PageState::Failed(message) => {
            return rsx! {
                div {
                    class: "empty-state",
                    p { {i18n.t("profile.load_error")} }
                    p { class: "muted", "{message}" }
                    button { class: "btn btn--primary", onclick: move |_| generation += 1, {i18n.t("common.retry")} }
                }
            };
        }
        PageState::Loaded(page) => page,
    };

    let profile = page.profile.clone();
    let is_owner = page.access.is_owner();
    let profile_id = profile.id.clone();
    let name = profile.display_name().to_string();

    let save_experience = {
        let i18n = i18n.clone();
        move |_: ()| {
            let i18n = i18n.clone();
            async move {
                let Some(edit) = editing() else { return };
                let draft = match edit.form.to_draft() {
                    Ok(draft) => draft,
                    Err(e) => {
                        editing.set(Some(ExperienceEdit { error: Some(e.to_string()), ..edit }));
                        return;
                    }
                };
                let Some(mut mgr) = manager() else { return };
                let result = match &edit.id {
                    Some(id) => mgr.update(id, &draft).await.map(|_| ()),
                    None => mgr.create(&draft).await.map(|_| ()),
                };
                match result {
                    Ok(()) => {
                        experiences.set(mgr.experiences().to_vec());
                        editing.set(None);
                        notify(&mut notifications, ToastLevel::Success, &i18n.t("profile.experience_saved"));
                    }
                    Err(e) => editing.set(Some(ExperienceEdit { error: Some(e.to_string()), ..edit })),
                }
                manager.set(Some(mgr));
            }
        }
    };

    let delete_experience = move |id: String| async move {
        let Some(mut mgr) = manager() else { return };
        match mgr.delete(&id).await {
            Ok(()) => experiences.set(mgr.experiences().to_vec()),
            Err(e) => notify(&mut notifications, ToastLevel::Error, &e.to_string()),
        }
        manager.set(Some(mgr));
    };

    let edit_experience = move |id: String| {
        if let Some(exp) = experiences.read().iter().find(|e| e.id == id) {
            editing.set(Some(ExperienceEdit {
                id: Some(id.clone()),
                form: ExperienceForm::from_experience(exp),
                error: None,
            }));
        }
    };

    let save_profile = {
        let app = app.clone();
        let profile_id = profile_id.clone();
        move |_: ()| {
            let app = app.clone();
            let profile_id = profile_id.clone();
            async move {
                let Some(form) = profile_form() else { return };
                match update_profile(&app.backend, &profile_id, &form.to_patch()).await {
                    Ok(updated) => {
                        if let PageState::Loaded(page) = &mut *state.write() {
                            page.profile = updated;
                        }
                        profile_form.set(None);
                    }
                    Err(e) => notify(&mut notifications, ToastLevel::Error, &e.to_string()),
                }
            }
        }
    };

    let change_avatar = {
        let app = app.clone();
        let profile_id = profile_id.clone();
        move |evt: FormEvent| {
            let app = app.clone();
            let profile_id = profile_id.clone();
            async move {
                let Some(image) = read_image(&evt).await else { return };
                match upload_avatar(&app.backend, &app.config.storage.avatars_bucket, &profile_id, &image).await {
                    Ok(updated) => {
                        if let PageState::Loaded(page) = &mut *state.write() {
                            page.profile = updated;
                        }
                    }
                    Err(e) => notify(&mut notifications, ToastLevel::Error, &e.to_string()),
                }
            }
        }
    };

    rsx! {
        div {
            class: "page profile-page",
            div {
                class: if page.access.is_obscured() { "profile-content obscured" } else { "profile-content" },
                header {
                    class: "profile-header",
                    if let Some(url) = &profile.avatar_url {
                        img { class: "avatar", src: "{url}", alt: "{name}" }
                    } else {
                        div { class: "avatar avatar--empty", Icon { icon: icons::FaUser, width: 40, height: 40 } }
                    }
                    div {
                        h1 { "{name}" }
                        p { class: "muted", "@{profile.username}" }
                        if let Some(profession) = profile.profession.as_ref().filter(|p| !p.is_empty()) {
                            p { class: "profile-profession", "{profession}" }
                        }
                        div {
                            class: "profile-links",
                            for (label, url) in profile.social_links.entries() {
                                a { href: "{url}", target: "_blank", rel: "noopener", "{label}" }
                            }
                        }
                    }
                    if is_owner {
                        div {
                            class: "profile-owner-actions",
                            label {
                                class: "btn btn--ghost",
                                {i18n.t("profile.change_avatar")}
                                input { r#type: "file", accept: "image/*", hidden: true, onchange: change_avatar }
                            }
                            button {
                                class: "btn btn--ghost",
                                onclick: {
                                    let profile = profile.clone();
                                    move |_| profile_form.set(Some(ProfileForm::from_profile(&profile)))
                                },
                                {i18n.t("profile.edit")}
                            }
                        }
                    }
                }

                if let Some(form) = profile_form() {
                    ProfileEditor {
                        form,
                        on_change: move |f| profile_form.set(Some(f)),
                        on_save: save_profile,
                        on_cancel: move |_| profile_form.set(None),
                    }
                } else if let Some(bio) = profile.bio.as_ref().filter(|b| !b.trim().is_empty()) {
                    Markdown { source: bio.clone(), class: "profile-bio" }
                }

                if !profile.skills.is_empty() {
                    section {
                        h2 { {i18n.t("profile.skills")} }
                        div {
                            class: "tag-list",
                            for skill in profile.skills.iter() {
                                span { class: "tag", "{skill}" }
                            }
                        }
                    }
                }

                section {
                    h2 { {i18n.t("profile.projects")} }
                    if page.projects.is_empty() {
                        p { class: "muted", {i18n.t("profile.no_projects")} }
                    }
                    ul {
                        class: "profile-projects",
                        for project in page.projects.clone() {
                            li {
                                key: "{project.id}",
                                button {
                                    class: "btn btn--link",
                                    onclick: {
                                        let slug = project.slug.clone();
                                        move |_| on_open_project.call(slug.clone())
                                    },
                                    "{project.title}"
                                }
                                span { class: "badge badge--{project.status.as_str()}", {i18n.t(&status_key(project.status))} }
                            }
                        }
                    }
                }

                section {
                    div {
                        class: "section-header",
                        h2 { {i18n.t("profile.timeline")} }
                        if is_owner && editing().is_none() {
                            button {
                                class: "btn btn--ghost",
                                onclick: move |_| editing.set(Some(ExperienceEdit {
                                    id: None,
                                    form: ExperienceForm::default(),
                                    error: None,
                                })),
                                Icon { icon: icons::FaPlus, width: 12, height: 12 }
                                " "
                                {i18n.t("profile.add_experience")}
                            }
                        }
                    }
                    if let Some(edit) = editing() {
                        ExperienceEditor {
                            edit,
                            on_change: move |e| editing.set(Some(e)),
                            on_save: save_experience,
                            on_cancel: move |_| editing.set(None),
                        }
                    }
                    Timeline {
                        experiences: experiences(),
                        is_owner,
                        on_edit: edit_experience,
                        on_delete: delete_experience,
                    }
                }
            }

            if page.access.is_obscured() {
                div {
                    class: "profile-gate",
                    h2 { {i18n.t_with("profile.gate_title", &[("name", name.as_str())])} }
                    p { {i18n.t("profile.gate_body")} }
                    button { class: "btn btn--primary", onclick: move |_| on_login.call(()), {i18n.t("profile.gate_cta")} }
                }
            }
        }
    }
}

#[component]
fn ProfileEditor(
    form: ProfileForm,
    on_change: EventHandler<ProfileForm>,
    on_save: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let i18n = use_i18n();

    macro_rules! text_field {
        ($label:expr, $field:ident) => {{
            let current = form.clone();
            rsx! {
                label { {i18n.t($label)}
                    input {
                        r#type: "text",
                        value: form.$field.clone(),
                        oninput: move |evt: FormEvent| {
                            let mut next = current.clone();
                            next.$field = evt.value();
                            on_change.call(next);
                        },
                    }
                }
            }
        }};
    }

    let bio_base = form.clone();

    rsx! {
        div {
            class: "editor-card",
            {text_field!("profile.field_full_name", full_name)}
            {text_field!("profile.field_profession", profession)}
            label { {i18n.t("profile.field_bio")}
                textarea {
                    rows: 5,
                    value: "{form.bio}",
                    oninput: move |evt: FormEvent| {
                        let mut next = bio_base.clone();
                        next.bio = evt.value();
                        on_change.call(next);
                    },
                }
            }
            {text_field!("profile.field_skills", skills)}
            {text_field!("profile.field_website", website)}
            {text_field!("profile.field_github", github)}
            {text_field!("profile.field_linkedin", linkedin)}
            {text_field!("profile.field_twitter", twitter)}
            div {
                class: "editor-actions",
                button { class: "btn btn--ghost", onclick: move |_| on_cancel.call(()), {i18n.t("common.cancel")} }
                button { class: "btn btn--primary", onclick: move |_| on_save.call(()), {i18n.t("common.save")} }
            }
        }
    }
}

#[component]
fn ExperienceEditor(
    edit: ExperienceEdit,
    on_change: EventHandler<ExperienceEdit>,
    on_save: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let i18n = use_i18n();
    let form = edit.form.clone();

    let update = {
        let edit = edit.clone();
        move |apply: &dyn Fn(&mut ExperienceForm)| {
            let mut next = edit.clone();
            apply(&mut next.form);
            next.error = None;
            on_change.call(next);
        }
    };

    macro_rules! field {
        ($label:expr, $kind:expr, $field:ident) => {{
            let update = update.clone();
            rsx! {
                label { {i18n.t($label)}
                    input {
                        r#type: $kind,
                        value: form.$field.clone(),
                        oninput: move |evt: FormEvent| {
                            let value = evt.value();
                            update(&|f: &mut ExperienceForm| f.$field = value.clone());
                        },
                    }
                }
            }
        }};
    }

    macro_rules! area {
        ($label:expr, $field:ident) => {{
            let update = update.clone();
            rsx! {
                label { {i18n.t($label)}
                    textarea {
                        rows: 3,
                        value: form.$field.clone(),
                        oninput: move |evt: FormEvent| {
                            let value = evt.value();
                            update(&|f: &mut ExperienceForm| f.$field = value.clone());
                        },
                    }
                }
            }
        }};
    }

    let kind_update = update.clone();
    let current_update = update.clone();

    rsx! {
        div {
            class: "editor-card",
            label { {i18n.t("experience.field_kind")}
                select {
                    onchange: move |evt: FormEvent| {
                        if let Some(kind) = ExperienceKind::parse(&evt.value()) {
                            kind_update(&|f: &mut ExperienceForm| f.kind = kind);
                        }
                    },
                    for kind in ExperienceKind::ALL {
                        option {
                            value: kind.as_str(),
                            selected: kind == form.kind,
                            {i18n.t(&format!("experience.kind_{}", kind.as_str()))}
                        }
                    }
                }
            }
            {field!("experience.field_title", "text", title)}
            {field!("experience.field_organization", "text", organization)}
            {field!("experience.field_location", "text", location)}
            {field!("experience.field_start", "date", start_date)}
            if !form.is_current {
                {field!("experience.field_end", "date", end_date)}
            }
            label {
                class: "checkbox",
                input {
                    r#type: "checkbox",
                    checked: form.is_current,
                    onchange: move |evt: FormEvent| {
                        let checked = evt.checked();
                        current_update(&|f: &mut ExperienceForm| f.is_current = checked);
                    },
                }
                {i18n.t("experience.field_current")}
            }
            {area!("experience.field_description", description)}
            {area!("experience.field_achievements", achievements)}
            {field!("experience.field_technologies", "text", technologies)}
            {field!("experience.field_link", "url", link)}
            if let Some(error) = &edit.error {
                p { class: "form-error", "{error}" }
            }
            div {
                class: "editor-actions",
                button { class: "btn btn--ghost", onclick: move |_| on_cancel.call(()), {i18n.t("common.cancel")} }
                button { class: "btn btn--primary", onclick: move |_| on_save.call(()), {i18n.t("common.save")} }
            }
        }
    }
}
