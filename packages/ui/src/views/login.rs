use api::auth::{sign_in, sign_up, AuthMode, SignInForm, SignUpForm};
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::backend::use_app;
use crate::i18n::use_i18n;

/// Combined login and registration form.
#[component]
pub fn LoginView(on_authenticated: EventHandler<()>) -> Element {
    let app = use_app();
    let i18n = use_i18n();
    let auth = use_auth();
    let mut mode = use_signal(AuthMode::default);
    let mut form = use_signal(SignUpForm::default);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    use_effect(move || {
        let state = auth();
        if !state.loading && state.user.is_some() {
            on_authenticated.call(());
        }
    });

    let current = mode();
    let f = form();

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let app = app.clone();
        async move {
            busy.set(true);
            error.set(None);
            let values = form();
            let result = match mode() {
                AuthMode::Login => {
                    let credentials = SignInForm {
                        email: values.email.clone(),
                        password: values.password.clone(),
                    };
                    sign_in(&app.backend, &app.events, &credentials).await
                }
                AuthMode::Register => sign_up(&app.backend, &app.events, &values).await,
            };
            busy.set(false);
            match result {
                Ok(_) => on_authenticated.call(()),
                Err(e) => error.set(Some(e.user_message())),
            }
        }
    };

    rsx! {
        div {
            class: "auth-page",
            form {
                class: "auth-card",
                onsubmit: submit,
                h1 { {i18n.t(current.title_key())} }

                label { {i18n.t("auth.email")}
                    input {
                        r#type: "email",
                        autocomplete: "email",
                        value: "{f.email}",
                        oninput: move |evt| form.write().email = evt.value(),
                    }
                }
                if current.shows_registration_fields() {
                    label { {i18n.t("auth.username")}
                        input {
                            r#type: "text",
                            value: "{f.username}",
                            oninput: move |evt| form.write().username = evt.value(),
                        }
                    }
                    label { {i18n.t("auth.full_name")}
                        input {
                            r#type: "text",
                            value: "{f.full_name}",
                            oninput: move |evt| form.write().full_name = evt.value(),
                        }
                    }
                }
                label { {i18n.t("auth.password")}
                    input {
                        r#type: "password",
                        value: "{f.password}",
                        oninput: move |evt| form.write().password = evt.value(),
                    }
                }
                if current.shows_registration_fields() {
                    label { {i18n.t("auth.confirm_password")}
                        input {
                            r#type: "password",
                            value: "{f.confirm_password}",
                            oninput: move |evt| form.write().confirm_password = evt.value(),
                        }
                    }
                }

                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }

                button {
                    class: "btn btn--primary btn--block",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() {
                        {i18n.t("common.loading")}
                    } else {
                        {i18n.t(current.submit_key())}
                    }
                }
                button {
                    class: "btn btn--link",
                    r#type: "button",
                    onclick: move |_| {
                        mode.set(current.toggle());
                        error.set(None);
                    },
                    {i18n.t(current.switch_key())}
                }
            }
        }
    }
}
