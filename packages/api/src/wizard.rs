//! # Project-creation wizard
//!
//! Five linear steps accumulate one [`WizardDraft`] in page memory:
//!
//! | Step | Collects | Gate to leave it |
//! |------|----------|------------------|
//! | 1 [`WizardStep::Cover`] | title, subtitle, cover image | non-blank title |
//! | 2 [`WizardStep::Identity`] | project name, slug, description, category, status | non-blank name; slug non-empty, ≥ 3 chars, `[a-z0-9-]` |
//! | 3 [`WizardStep::Team`] | roles needed, "looking for team" | |
//! | 4 [`WizardStep::Technology`] | technology tags, desired technologies | |
//! | 5 [`WizardStep::Configuration`] | visibility, repository and demo links | step 2 again, at submit |
//!
//! A refused transition flags the offending field and leaves the step unchanged.
//! Going back never validates.
//!
//! ## Slug latch
//!
//! Until the slug field is edited by hand, [`ProjectWizard::set_name`] rederives
//! it with [`slugify`]. The first manual edit sets a one-way latch that only
//! [`ProjectWizard::reset`] clears.
//!
//! ## Submission
//!
//! [`ProjectWizard::submit`] resolves the session user, uploads the cover (an
//! upload failure downgrades to a warning), inserts the project (a unique
//! violation becomes [`SubmitError::SlugTaken`]), then best-effort batch inserts
//! the roles and desired technologies. It creates at most one project row and
//! one storage object, and never updates or deletes anything.

use std::collections::HashMap;

use store::{
    insert_many, insert_one, Backend, NewProject, Project, ProjectDesiredTechnology,
    ProjectRoleNeeded, ProjectStatus, StoreError, Visibility,
};
use thiserror::Error;

use crate::events::{AppEvent, EventBus};
use crate::slug::{slugify, validate_slug, SlugProblem};
use crate::upload::ImageFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Cover = 1,
    Identity = 2,
    Team = 3,
    Technology = 4,
    Configuration = 5,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Cover,
        WizardStep::Identity,
        WizardStep::Team,
        WizardStep::Technology,
        WizardStep::Configuration,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Translation key of the step heading.
    pub fn title_key(self) -> &'static str {
        match self {
            WizardStep::Cover => "wizard.step_cover",
            WizardStep::Identity => "wizard.step_identity",
            WizardStep::Team => "wizard.step_team",
            WizardStep::Technology => "wizard.step_technology",
            WizardStep::Configuration => "wizard.step_configuration",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WizardField {
    Title,
    Name,
    Slug,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("El título es obligatorio")]
    TitleRequired,
    #[error("El nombre del proyecto es obligatorio")]
    NameRequired,
    #[error("El slug es obligatorio")]
    SlugRequired,
    #[error("El slug debe tener al menos 3 caracteres")]
    SlugTooShort,
    #[error("El slug solo puede contener minúsculas, números y guiones")]
    SlugInvalid,
}

impl ValidationError {
    pub fn field(&self) -> WizardField {
        match self {
            ValidationError::TitleRequired => WizardField::Title,
            ValidationError::NameRequired => WizardField::Name,
            ValidationError::SlugRequired
            | ValidationError::SlugTooShort
            | ValidationError::SlugInvalid => WizardField::Slug,
        }
    }

    pub fn i18n_key(&self) -> &'static str {
        match self {
            ValidationError::TitleRequired => "wizard.error_title_required",
            ValidationError::NameRequired => "wizard.error_name_required",
            ValidationError::SlugRequired => "wizard.error_slug_required",
            ValidationError::SlugTooShort => "wizard.error_slug_short",
            ValidationError::SlugInvalid => "wizard.error_slug_invalid",
        }
    }
}

impl From<SlugProblem> for ValidationError {
    fn from(p: SlugProblem) -> Self {
        match p {
            SlugProblem::Empty => ValidationError::SlugRequired,
            SlugProblem::TooShort => ValidationError::SlugTooShort,
            SlugProblem::InvalidCharacters => ValidationError::SlugInvalid,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoverDraft {
    pub title: String,
    pub subtitle: String,
    pub image: Option<ImageFile>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdentityDraft {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub status: ProjectStatus,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoleDraft {
    pub role: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeamDraft {
    pub roles_needed: Vec<RoleDraft>,
    pub looking_for_team: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TechnologyDraft {
    pub tags: Vec<String>,
    pub desired: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigurationDraft {
    pub visibility: Visibility,
    pub repository_url: String,
    pub demo_url: String,
}

/// Everything the wizard has collected so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardDraft {
    pub cover: CoverDraft,
    pub identity: IdentityDraft,
    pub team: TeamDraft,
    pub technology: TechnologyDraft,
    pub configuration: ConfigurationDraft,
}

/// Non-fatal problems during a successful submission.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitWarning {
    /// The project was created without its cover image.
    CoverUploadFailed(String),
    /// An auxiliary batch insert failed after the project row was created.
    AuxiliaryInsertFailed { table: &'static str, error: String },
}

impl SubmitWarning {
    pub fn i18n_key(&self) -> &'static str {
        match self {
            SubmitWarning::CoverUploadFailed(_) => "wizard.warning_cover",
            SubmitWarning::AuxiliaryInsertFailed { .. } => "wizard.warning_auxiliary",
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Debes iniciar sesión para crear un proyecto")]
    NotAuthenticated,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Ese slug ya está en uso. Elige otro.")]
    SlugTaken,
    #[error("Error del servidor. Inténtalo de nuevo más tarde.")]
    Server(#[source] StoreError),
}

impl SubmitError {
    /// Message shown in the wizard's error banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn i18n_key(&self) -> &'static str {
        match self {
            SubmitError::NotAuthenticated => "wizard.error_not_authenticated",
            SubmitError::Validation(e) => e.i18n_key(),
            SubmitError::SlugTaken => "wizard.error_slug_taken",
            SubmitError::Server(_) => "wizard.error_server",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitOutcome {
    pub project: Project,
    pub warnings: Vec<SubmitWarning>,
}

/// Wizard state: current step, draft, slug latch and flagged fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectWizard {
    step: WizardStep,
    draft: WizardDraft,
    slug_edited: bool,
    errors: HashMap<WizardField, ValidationError>,
}

impl Default for ProjectWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Cover,
            draft: WizardDraft::default(),
            slug_edited: false,
            errors: HashMap::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn slug_is_manual(&self) -> bool {
        self.slug_edited
    }

    pub fn field_error(&self, field: WizardField) -> Option<ValidationError> {
        self.errors.get(&field).copied()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Back to an empty step-1 draft; clears the slug latch.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // --- step 1 ---

    pub fn set_title(&mut self, title: &str) {
        self.draft.cover.title = title.to_string();
        self.errors.remove(&WizardField::Title);
    }

    pub fn set_subtitle(&mut self, subtitle: &str) {
        self.draft.cover.subtitle = subtitle.to_string();
    }

    pub fn set_cover_image(&mut self, image: Option<ImageFile>) {
        self.draft.cover.image = image;
    }

    // --- step 2 ---

    /// Set the project name, rederiving the slug unless it was edited by hand.
    pub fn set_name(&mut self, name: &str) {
        self.draft.identity.name = name.to_string();
        self.errors.remove(&WizardField::Name);
        if !self.slug_edited {
            self.draft.identity.slug = slugify(name);
            self.errors.remove(&WizardField::Slug);
        }
    }

    /// Manual slug edit. Latches off automatic derivation until [`reset`](Self::reset).
    pub fn edit_slug(&mut self, slug: &str) {
        self.slug_edited = true;
        self.draft.identity.slug = slug.trim().to_string();
        self.errors.remove(&WizardField::Slug);
    }

    pub fn set_description(&mut self, description: &str) {
        self.draft.identity.description = description.to_string();
    }

    pub fn set_category(&mut self, category: &str) {
        self.draft.identity.category = category.to_string();
    }

    pub fn set_status(&mut self, status: ProjectStatus) {
        self.draft.identity.status = status;
    }

    // --- step 3 ---

    pub fn add_role(&mut self, role: &str, description: &str) {
        let role = role.trim();
        if role.is_empty() {
            return;
        }
        self.draft.team.roles_needed.push(RoleDraft {
            role: role.to_string(),
            description: description.trim().to_string(),
        });
    }

    pub fn remove_role(&mut self, index: usize) {
        if index < self.draft.team.roles_needed.len() {
            self.draft.team.roles_needed.remove(index);
        }
    }

    pub fn set_looking_for_team(&mut self, looking: bool) {
        self.draft.team.looking_for_team = looking;
    }

    // --- step 4 ---

    pub fn add_tag(&mut self, tag: &str) {
        push_unique(&mut self.draft.technology.tags, tag);
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.draft.technology.tags.retain(|t| t != tag);
    }

    pub fn add_desired_technology(&mut self, tech: &str) {
        push_unique(&mut self.draft.technology.desired, tech);
    }

    pub fn remove_desired_technology(&mut self, tech: &str) {
        self.draft.technology.desired.retain(|t| t != tech);
    }

    // --- step 5 ---

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.draft.configuration.visibility = visibility;
    }

    pub fn set_repository_url(&mut self, url: &str) {
        self.draft.configuration.repository_url = url.to_string();
    }

    pub fn set_demo_url(&mut self, url: &str) {
        self.draft.configuration.demo_url = url.to_string();
    }

    // --- navigation ---

    /// Check the gate of `step` against the current draft.
    pub fn validate(&self, step: WizardStep) -> Result<(), ValidationError> {
        match step {
            WizardStep::Cover => {
                if self.draft.cover.title.trim().is_empty() {
                    return Err(ValidationError::TitleRequired);
                }
                Ok(())
            }
            WizardStep::Identity | WizardStep::Configuration => {
                if self.draft.identity.name.trim().is_empty() {
                    return Err(ValidationError::NameRequired);
                }
                validate_slug(&self.draft.identity.slug)?;
                Ok(())
            }
            WizardStep::Team | WizardStep::Technology => Ok(()),
        }
    }

    /// Advance one step if the current one validates.
    ///
    /// On failure the field is flagged and the step is unchanged. On the last
    /// step this only validates.
    pub fn next(&mut self) -> Result<WizardStep, ValidationError> {
        if let Err(e) = self.validate(self.step) {
            self.errors.insert(e.field(), e);
            return Err(e);
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step, without validation.
    pub fn prev(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Assemble the insert payload.
    pub fn build_project(&self, creator_id: &str, cover_image_url: Option<String>) -> NewProject {
        let d = &self.draft;
        NewProject {
            slug: d.identity.slug.clone(),
            title: d.cover.title.trim().to_string(),
            subtitle: non_blank(&d.cover.subtitle),
            name: d.identity.name.trim().to_string(),
            description: non_blank(&d.identity.description),
            cover_image_url,
            status: d.identity.status,
            visibility: d.configuration.visibility,
            category: non_blank(&d.identity.category),
            tags: d.technology.tags.clone(),
            creator_id: creator_id.to_string(),
            repository_url: non_blank(&d.configuration.repository_url),
            demo_url: non_blank(&d.configuration.demo_url),
            looking_for_team: d.team.looking_for_team || !d.team.roles_needed.is_empty(),
        }
    }

    /// Run the submission protocol.
    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        events: &EventBus,
        covers_bucket: &str,
    ) -> Result<SubmitOutcome, SubmitError> {
        if let Err(e) = self.validate(WizardStep::Configuration) {
            self.errors.insert(e.field(), e);
            return Err(e.into());
        }

        let user = match backend.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(SubmitError::NotAuthenticated),
            Err(e) => {
                tracing::error!("Session lookup failed: {}", e);
                return Err(SubmitError::Server(e));
            }
        };

        let mut warnings = Vec::new();
        let cover_url = match &self.draft.cover.image {
            Some(image) => match upload_cover(backend, covers_bucket, &user.id, image).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("Cover upload failed, creating project without image: {}", e);
                    warnings.push(SubmitWarning::CoverUploadFailed(e.to_string()));
                    None
                }
            },
            None => None,
        };

        let record = self.build_project(&user.id, cover_url);
        let project: Project = match insert_one(backend, "projects", &record).await {
            Ok(project) => project,
            Err(e) if e.is_unique_violation() => {
                tracing::info!(slug = %record.slug, "Slug already taken");
                return Err(SubmitError::SlugTaken);
            }
            Err(e) => {
                tracing::error!("Project insert failed: {}", e);
                return Err(SubmitError::Server(e));
            }
        };
        tracing::info!(id = %project.id, slug = %project.slug, "Project created");

        let roles: Vec<ProjectRoleNeeded> = self
            .draft
            .team
            .roles_needed
            .iter()
            .map(|r| ProjectRoleNeeded {
                id: None,
                project_id: project.id.clone(),
                role: r.role.clone(),
                description: non_blank(&r.description),
            })
            .collect();
        if let Err(e) = insert_many(backend, "project_roles_needed", &roles).await {
            tracing::warn!("Roles insert failed for {}: {}", project.id, e);
            warnings.push(SubmitWarning::AuxiliaryInsertFailed {
                table: "project_roles_needed",
                error: e.to_string(),
            });
        }

        let desired: Vec<ProjectDesiredTechnology> = self
            .draft
            .technology
            .desired
            .iter()
            .map(|t| ProjectDesiredTechnology {
                id: None,
                project_id: project.id.clone(),
                technology: t.clone(),
            })
            .collect();
        if let Err(e) = insert_many(backend, "project_desired_technologies", &desired).await {
            tracing::warn!("Desired technologies insert failed for {}: {}", project.id, e);
            warnings.push(SubmitWarning::AuxiliaryInsertFailed {
                table: "project_desired_technologies",
                error: e.to_string(),
            });
        }

        events.publish(AppEvent::ProjectCreated {
            id: project.id.clone(),
            slug: project.slug.clone(),
        });
        Ok(SubmitOutcome { project, warnings })
    }
}

/// Upload a cover image and return its public URL. Errors propagate so the
/// caller decides whether to continue without an image.
pub async fn upload_cover<B: Backend>(
    backend: &B,
    bucket: &str,
    owner_id: &str,
    image: &ImageFile,
) -> Result<String, StoreError> {
    let path = image.storage_path(owner_id);
    backend
        .upload(bucket, &path, image.bytes.clone(), &image.content_type)
        .await?;
    Ok(backend.public_url(bucket, &path))
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        return;
    }
    list.push(value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{MemoryBackend, SessionUser, UserMetadata};

    const BUCKET: &str = "project-covers";

    fn signed_in_backend() -> MemoryBackend {
        let backend = MemoryBackend::new().with_unique("projects", "slug");
        backend.sign_in_as(SessionUser {
            id: "11111111-2222-3333-4444-555555555555".into(),
            email: "ana@example.com".into(),
            metadata: UserMetadata::default(),
        });
        backend
    }

    fn demo_wizard() -> ProjectWizard {
        let mut w = ProjectWizard::new();
        w.set_title("Demo");
        w.set_name("Demo Project");
        w
    }

    #[test]
    fn test_step_one_requires_title() {
        let mut w = ProjectWizard::new();
        w.set_title("   ");
        assert_eq!(w.next(), Err(ValidationError::TitleRequired));
        assert_eq!(w.step(), WizardStep::Cover);
        assert_eq!(w.field_error(WizardField::Title), Some(ValidationError::TitleRequired));

        w.set_title("Demo");
        assert!(w.field_error(WizardField::Title).is_none());
        assert_eq!(w.next(), Ok(WizardStep::Identity));
    }

    #[test]
    fn test_step_two_slug_rules() {
        let mut w = demo_wizard();
        w.next().unwrap();

        w.edit_slug("ab");
        assert_eq!(w.next(), Err(ValidationError::SlugTooShort));
        assert_eq!(w.step(), WizardStep::Identity);

        w.edit_slug("ab-3");
        assert_eq!(w.next(), Ok(WizardStep::Team));
    }

    #[test]
    fn test_steps_three_and_four_are_free_and_back_never_validates() {
        let mut w = demo_wizard();
        w.next().unwrap();
        w.next().unwrap();
        assert_eq!(w.next(), Ok(WizardStep::Technology));
        assert_eq!(w.next(), Ok(WizardStep::Configuration));
        assert_eq!(w.next(), Ok(WizardStep::Configuration));

        w.set_title("");
        assert_eq!(w.prev(), WizardStep::Technology);
        assert_eq!(w.prev(), WizardStep::Team);
        assert_eq!(w.prev(), WizardStep::Identity);
        assert_eq!(w.prev(), WizardStep::Cover);
        assert_eq!(w.prev(), WizardStep::Cover);
    }

    #[test]
    fn test_manual_slug_edit_latches_until_reset() {
        let mut w = ProjectWizard::new();
        w.set_name("Mi App");
        assert_eq!(w.draft().identity.slug, "mi-app");

        w.edit_slug("custom-slug");
        w.set_name("Otro Nombre");
        assert_eq!(w.draft().identity.slug, "custom-slug");
        assert!(w.slug_is_manual());

        w.reset();
        assert!(!w.slug_is_manual());
        w.set_name("Otro Nombre");
        assert_eq!(w.draft().identity.slug, "otro-nombre");
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let mut w = ProjectWizard::new();
        w.add_tag("Rust");
        w.add_tag(" rust ");
        w.add_tag("");
        w.add_tag("Dioxus");
        assert_eq!(w.draft().technology.tags, vec!["Rust", "Dioxus"]);
        w.remove_tag("Rust");
        assert_eq!(w.draft().technology.tags, vec!["Dioxus"]);
    }

    #[tokio::test]
    async fn test_submit_derives_slug_from_name() {
        let backend = signed_in_backend();
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let mut w = demo_wizard();

        let outcome = w.submit(&backend, &events, BUCKET).await.unwrap();
        assert_eq!(outcome.project.slug, "demo-project");
        assert!(outcome.warnings.is_empty());

        let rows = backend.rows("projects");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["slug"], "demo-project");
        assert_eq!(rows[0]["title"], "Demo");
        assert_eq!(rows[0]["creator_id"], "11111111-2222-3333-4444-555555555555");

        // No roles or desired technologies: no auxiliary calls.
        assert_eq!(backend.calls(), vec!["insert:projects"]);

        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::ProjectCreated {
                id: outcome.project.id.clone(),
                slug: "demo-project".into()
            }
        );
    }

    #[tokio::test]
    async fn test_submit_slug_taken_skips_auxiliary_inserts() {
        let backend = signed_in_backend();
        backend.seed(
            "projects",
            vec![serde_json::json!({"id": "p0", "slug": "demo-project", "title": "x", "creator_id": "u0"})],
        );
        let mut w = demo_wizard();
        w.add_role("Frontend", "");
        w.add_desired_technology("Rust");

        let err = w.submit(&backend, &EventBus::new(), BUCKET).await.unwrap_err();
        assert!(matches!(err, SubmitError::SlugTaken));
        assert!(err.to_string().contains("slug ya está en uso"));
        assert_eq!(backend.calls(), vec!["insert:projects"]);
        assert!(backend.rows("project_roles_needed").is_empty());
    }

    #[tokio::test]
    async fn test_submit_requires_session() {
        let backend = MemoryBackend::new();
        let mut w = demo_wizard();
        let err = w.submit(&backend, &EventBus::new(), BUCKET).await.unwrap_err();
        assert!(matches!(err, SubmitError::NotAuthenticated));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_revalidates_identity() {
        let backend = signed_in_backend();
        let mut w = demo_wizard();
        w.edit_slug("No Valid");
        let err = w.submit(&backend, &EventBus::new(), BUCKET).await.unwrap_err();
        assert!(matches!(err, SubmitError::Validation(ValidationError::SlugInvalid)));
        assert_eq!(w.field_error(WizardField::Slug), Some(ValidationError::SlugInvalid));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_downgrades_to_warning() {
        let backend = signed_in_backend();
        backend.fail_on("storage");
        let mut w = demo_wizard();
        w.set_cover_image(Some(ImageFile::new("cover.png", "image/png", vec![1, 2])));

        let outcome = w.submit(&backend, &EventBus::new(), BUCKET).await.unwrap();
        assert!(outcome.project.cover_image_url.is_none());
        assert!(matches!(
            outcome.warnings.as_slice(),
            [SubmitWarning::CoverUploadFailed(_)]
        ));
    }

    #[tokio::test]
    async fn test_cover_upload_sets_public_url() {
        let backend = signed_in_backend();
        let mut w = demo_wizard();
        w.set_cover_image(Some(ImageFile::new("cover.png", "image/png", vec![1, 2])));

        let outcome = w.submit(&backend, &EventBus::new(), BUCKET).await.unwrap();
        let paths = backend.object_paths(BUCKET);
        assert_eq!(paths.len(), 1);
        assert_eq!(
            outcome.project.cover_image_url,
            Some(format!("memory://{BUCKET}/{}", paths[0]))
        );
    }

    #[tokio::test]
    async fn test_auxiliary_failure_keeps_project() {
        let backend = signed_in_backend();
        backend.fail_on("project_roles_needed");
        let mut w = demo_wizard();
        w.add_role("Backend", "Rust + SQL");
        w.add_desired_technology("WebAssembly");

        let outcome = w.submit(&backend, &EventBus::new(), BUCKET).await.unwrap();
        assert_eq!(backend.rows("projects").len(), 1);
        assert_eq!(backend.rows("project_desired_technologies").len(), 1);
        assert_eq!(
            outcome.warnings,
            vec![SubmitWarning::AuxiliaryInsertFailed {
                table: "project_roles_needed",
                error: "Backend returned 500: project_roles_needed unavailable".into(),
            }]
        );
        assert!(outcome.project.looking_for_team);
    }
}
