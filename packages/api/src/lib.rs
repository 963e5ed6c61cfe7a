//! # API crate: page controllers for Proyecto 301
//!
//! Every page of the front-end is driven by a controller in this crate. Controllers
//! are plain async Rust, generic over [`store::Backend`], so the same logic runs
//! against the hosted service in the browser and against [`store::MemoryBackend`]
//! in tests. None of them touch the DOM: the `ui` crate renders their results.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Sign-up, sign-in, sign-out, session check; login/register form modes; auth error messages |
//! | [`bootstrap`] | Backend construction from config and the bounded readiness wait |
//! | [`catalog`] | Public catalog: fetch, author resolution, search, grouping by category |
//! | [`dashboard`] | Signed-in user's projects (critical phase) and metrics (best-effort phase) |
//! | [`debounce`] | Generation-counter debouncer for search boxes |
//! | [`events`] | Typed publish/subscribe bus shared by sibling components |
//! | [`experience`] | Owner-gated CRUD for career entries, with skill merging |
//! | [`i18n`] | Languages, dotted-key translation lookup, persisted language choice |
//! | [`local`] | Browser-local key/value persistence seam |
//! | [`production`] | Per-project task board, chat and team tabs |
//! | [`profile`] | Profile resolution by username or id, ownership, owner edits |
//! | [`project_detail`] | Single project page by slug |
//! | [`slug`] | Slug derivation and validation |
//! | [`timeline`] | Pure formatter turning experiences into timeline markers |
//! | [`upload`] | Image files picked in the browser and their storage paths |
//! | [`wizard`] | Five-step project-creation wizard and its submission protocol |

pub mod auth;
pub mod bootstrap;
pub mod catalog;
pub mod dashboard;
pub mod debounce;
mod error;
pub mod events;
pub mod experience;
pub mod i18n;
pub mod local;
pub mod production;
pub mod profile;
pub mod project_detail;
pub mod slug;
mod timer;
pub mod timeline;
pub mod upload;
pub mod wizard;

pub use error::ApiError;
pub use events::{AppEvent, EventBus, EventStream};
pub use timer::sleep;

pub use store::{Backend, MemoryBackend, RestBackend, SessionUser};
