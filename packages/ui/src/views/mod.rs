mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod login;
pub use login::LoginView;

mod catalog;
pub use catalog::CatalogView;

mod dashboard;
pub use dashboard::DashboardView;

mod profile;
pub use profile::ProfileView;

mod project_detail;
pub use project_detail::ProjectDetailView;

mod production;
pub use production::ProductionView;
