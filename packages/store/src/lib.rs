pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod query;

mod memory;
pub use memory::MemoryBackend;

mod rest;
pub use rest::RestBackend;

pub use backend::{fetch, fetch_one, insert_many, insert_one, Backend};
pub use config::AppConfig;
pub use error::StoreError;
pub use models::{
    AuthUser, ChatMessage, Experience, ExperienceDraft, ExperienceKind, NewChatMessage,
    NewProject, NewTask, Profile, ProfilePatch, Project, ProjectDesiredTechnology,
    ProjectMember, ProjectRoleNeeded, ProjectStatus, ProjectViewStats, SessionUser,
    SocialLinks, Task, TaskPriority, TaskStatus, UserMetadata, Visibility,
};
pub use query::{Filter, Order, Query, Row};
