use api::production::ProductionQuery;
use dioxus::prelude::*;
use store::AppConfig;

use ui::views::{CatalogView, DashboardView, LoginView, ProductionView, ProfileView, ProjectDetailView};
use ui::{
    use_app, use_auth, use_i18n, AppProvider, AuthProvider, I18nProvider, LogoutButton, Navbar,
    NotificationProvider, Spinner,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Root {},
        #[route("/login")]
        Login {},
        #[route("/explorar")]
        Explore {},
        #[route("/dashboard")]
        Dashboard {},
        #[route("/perfiles/:handle")]
        Profile { handle: String },
        #[route("/proyectos/:slug")]
        Project { slug: String },
        #[route("/produccion?:project_id&:tab")]
        Production { project_id: String, tab: String },
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Bundled at build time; see [`load_config`] for the overrides.
const CONFIG_TOML: &str = include_str!("../proyecto301.toml");

fn main() {
    dioxus::launch(App);
}

/// Bundled config, then compile-time env, then (native only) `.env` and the
/// process environment.
fn load_config() -> AppConfig {
    let config = AppConfig::from_toml(CONFIG_TOML).unwrap_or_else(|e| {
        tracing::warn!("Bundled {} is invalid, using defaults: {}", AppConfig::filename(), e);
        AppConfig::default()
    });
    let config = config.with_backend_overrides(option_env!("P301_BACKEND_URL"), option_env!("P301_ANON_KEY"));

    #[cfg(not(target_arch = "wasm32"))]
    let config = {
        dotenvy::dotenv().ok();
        let url = std::env::var("P301_BACKEND_URL").ok();
        let anon_key = std::env::var("P301_ANON_KEY").ok();
        config.with_backend_overrides(url.as_deref(), anon_key.as_deref())
    };

    config
}

fn production_route(location: &str) -> Route {
    let query = ProductionQuery::parse(location.split_once('?').map(|(_, q)| q).unwrap_or(""));
    Route::Production {
        project_id: query.project_id.unwrap_or_default(),
        tab: query.tab.as_str().to_string(),
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AppProvider {
            config,
            I18nProvider {
                AuthProvider {
                    NotificationProvider {
                        Router::<Route> {}
                    }
                }
            }
        }
    }
}

/// Navbar, demo banner and the routed page.
#[component]
fn Shell() -> Element {
    let app = use_app();
    let auth = use_auth();
    let i18n = use_i18n();
    let nav = use_navigator();

    let user = auth().user;
    let profile_handle = user
        .as_ref()
        .map(|u| u.metadata.username.clone().unwrap_or_else(|| u.id.clone()));

    rsx! {
        Navbar {
            on_home: move |_| {
                nav.push(Route::Root {});
            },
            Link { class: "btn btn--ghost", to: Route::Explore {}, {i18n.t("nav.explore")} }
            if let Some(handle) = profile_handle {
                Link { class: "btn btn--ghost", to: Route::Dashboard {}, {i18n.t("nav.dashboard")} }
                Link { class: "btn btn--ghost", to: Route::Profile { handle }, {i18n.t("nav.profile")} }
                LogoutButton {
                    class: "btn btn--ghost",
                    on_signed_out: move |_| {
                        nav.replace(Route::Explore {});
                    },
                }
            } else if !auth().loading {
                Link { class: "btn btn--primary", to: Route::Login {}, {i18n.t("nav.login")} }
            }
        }
        if app.backend.is_demo() {
            div { class: "demo-banner", {i18n.t("nav.demo_mode")} }
        }
        main {
            class: "app-main",
            Outlet::<Route> {}
        }
    }
}

/// Signed-in users land on their dashboard, everyone else on the catalog.
#[component]
fn Root() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        let state = auth();
        if state.loading {
            return;
        }
        if state.user.is_some() {
            nav.replace(Route::Dashboard {});
        } else {
            nav.replace(Route::Explore {});
        }
    });

    rsx! { Spinner {} }
}

#[component]
fn Login() -> Element {
    let nav = use_navigator();
    rsx! {
        LoginView {
            on_authenticated: move |_| {
                nav.replace(Route::Dashboard {});
            },
        }
    }
}

#[component]
fn Explore() -> Element {
    let nav = use_navigator();
    rsx! {
        CatalogView {
            on_open_project: move |slug| {
                nav.push(Route::Project { slug });
            },
        }
    }
}

#[component]
fn Dashboard() -> Element {
    let nav = use_navigator();
    rsx! {
        DashboardView {
            on_login: move |_| {
                nav.replace(Route::Login {});
            },
            on_open_project: move |slug| {
                nav.push(Route::Project { slug });
            },
            on_open_production: move |project_id| {
                nav.push(Route::Production { project_id, tab: String::new() });
            },
        }
    }
}

#[component]
fn Profile(handle: String) -> Element {
    let nav = use_navigator();
    rsx! {
        ProfileView {
            handle,
            on_login: move |_| {
                nav.push(Route::Login {});
            },
            on_open_project: move |slug| {
                nav.push(Route::Project { slug });
            },
        }
    }
}

#[component]
fn Project(slug: String) -> Element {
    let nav = use_navigator();
    rsx! {
        ProjectDetailView {
            slug,
            on_open_profile: move |handle| {
                nav.push(Route::Profile { handle });
            },
            on_open_production: move |project_id| {
                nav.push(Route::Production { project_id, tab: String::new() });
            },
        }
    }
}

#[component]
fn Production(project_id: String, tab: String) -> Element {
    let nav = use_navigator();
    let project_id = Some(project_id).filter(|id| !id.trim().is_empty());
    let tab = Some(tab).filter(|t| !t.is_empty());
    rsx! {
        ProductionView {
            project_id,
            tab,
            on_login: move |_| {
                nav.replace(Route::Login {});
            },
            on_location_change: move |location: String| {
                nav.replace(production_route(&location));
            },
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let i18n = use_i18n();
    tracing::debug!("No route for /{}", segments.join("/"));
    rsx! {
        div {
            class: "empty-state",
            h2 { {i18n.t("common.not_found")} }
            Link { class: "btn btn--primary", to: Route::Explore {}, {i18n.t("nav.explore")} }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_matches_defaults() {
        let config = AppConfig::from_toml(CONFIG_TOML).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.backend.is_configured());
    }

    #[test]
    fn test_production_location_maps_to_route() {
        assert_eq!(
            production_route("/produccion?project_id=abc&tab=chat"),
            Route::Production { project_id: "abc".into(), tab: "chat".into() }
        );
        assert_eq!(
            production_route("/produccion"),
            Route::Production { project_id: String::new(), tab: "tareas".into() }
        );
    }
}
