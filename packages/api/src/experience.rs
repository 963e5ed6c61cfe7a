//! Career entries shown on a profile timeline.
//!
//! [`ExperienceManager`] holds the entries of one user. Reads are open to
//! everyone; every write checks both the ownership flag broadcast by the
//! profile page and the live session, and is refused with
//! [`ApiError::NotOwner`] before any request goes out.
//!
//! Technologies of a created or updated entry are merged into the profile's
//! skills (case-insensitive, existing order kept, new ones appended).

use chrono::NaiveDate;
use serde_json::Value;
use store::query::{from_rows, to_row};
use store::{
    fetch, fetch_one, Backend, Experience, ExperienceDraft, ExperienceKind, Filter, Profile, Query,
};

use crate::error::ApiError;
use crate::events::{AppEvent, EventBus};

/// Check a draft before it is sent.
pub fn validate_draft(draft: &ExperienceDraft) -> Result<(), ApiError> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::Validation("El título es obligatorio".to_string()));
    }
    if draft.organization.trim().is_empty() {
        return Err(ApiError::Validation(
            "La organización es obligatoria".to_string(),
        ));
    }
    if let Some(end) = draft.end_date {
        if !draft.is_current && end < draft.start_date {
            return Err(ApiError::Validation(
                "La fecha de fin no puede ser anterior a la de inicio".to_string(),
            ));
        }
    }
    Ok(())
}

/// Append the skills of `incoming` missing from `existing`, ignoring case.
pub fn merge_skills(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + incoming.len());
    for skill in existing.iter().chain(incoming) {
        let skill = skill.trim();
        if skill.is_empty() {
            continue;
        }
        let lower = skill.to_lowercase();
        if !merged.iter().any(|s| s.to_lowercase() == lower) {
            merged.push(skill.to_string());
        }
    }
    merged
}

/// Trimmed copy with an ongoing entry's end date dropped.
fn normalized(draft: &ExperienceDraft) -> ExperienceDraft {
    let mut d = draft.clone();
    d.title = d.title.trim().to_string();
    d.organization = d.organization.trim().to_string();
    if d.is_current {
        d.end_date = None;
    }
    d.achievements.retain(|a| !a.trim().is_empty());
    d.technologies.retain(|t| !t.trim().is_empty());
    d
}

/// Text fields of the experience editor, as typed.
///
/// Dates are `YYYY-MM-DD` strings from a date input, achievements one per
/// line, technologies comma separated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExperienceForm {
    pub kind: ExperienceKind,
    pub title: String,
    pub organization: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub description: String,
    pub achievements: String,
    pub technologies: String,
    pub link: String,
}

fn parse_date(value: &str, field: &str) -> Result<Option<NaiveDate>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::Validation(format!("La fecha de {field} no es válida")))
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ExperienceForm {
    pub fn from_experience(exp: &Experience) -> Self {
        Self {
            kind: exp.kind,
            title: exp.title.clone(),
            organization: exp.organization.clone(),
            location: exp.location.clone().unwrap_or_default(),
            start_date: exp.start_date.format("%Y-%m-%d").to_string(),
            end_date: exp
                .end_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            is_current: exp.is_current,
            description: exp.description.clone().unwrap_or_default(),
            achievements: exp.achievements.join("\n"),
            technologies: exp.technologies.join(", "),
            link: exp.link.clone().unwrap_or_default(),
        }
    }

    pub fn to_draft(&self) -> Result<ExperienceDraft, ApiError> {
        let start_date = parse_date(&self.start_date, "inicio")?.ok_or_else(|| {
            ApiError::Validation("La fecha de inicio es obligatoria".to_string())
        })?;
        let end_date = parse_date(&self.end_date, "fin")?;
        Ok(ExperienceDraft {
            kind: self.kind,
            title: self.title.clone(),
            organization: self.organization.clone(),
            location: optional(&self.location),
            start_date,
            end_date,
            is_current: self.is_current,
            description: optional(&self.description),
            achievements: self
                .achievements
                .lines()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
            technologies: self
                .technologies
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            link: optional(&self.link),
        })
    }
}

#[derive(Clone)]
pub struct ExperienceManager<B> {
    backend: B,
    events: EventBus,
    user_id: String,
    is_owner: bool,
    experiences: Vec<Experience>,
}

impl<B: Backend> ExperienceManager<B> {
    pub fn new(backend: B, events: EventBus, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            events,
            user_id: user_id.into(),
            is_owner: false,
            experiences: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    pub fn set_ownership(&mut self, is_owner: bool) {
        self.is_owner = is_owner;
    }

    /// React to a bus message. Only ownership changes matter here.
    pub fn apply_event(&mut self, event: &AppEvent) {
        if let AppEvent::OwnershipChanged(owner) = event {
            self.set_ownership(*owner);
        }
    }

    pub fn experiences(&self) -> &[Experience] {
        &self.experiences
    }

    /// Fetch the user's entries, newest start first.
    pub async fn load(&mut self) -> Result<&[Experience], ApiError> {
        let query = Query::table("experiences")
            .eq("user_id", self.user_id.as_str())
            .order("start_date", false);
        self.experiences = fetch(&self.backend, &query).await?;
        self.events
            .publish(AppEvent::ExperiencesLoaded(self.experiences.len()));
        Ok(&self.experiences)
    }

    async fn ensure_owner(&self) -> Result<(), ApiError> {
        if !self.is_owner {
            return Err(ApiError::NotOwner);
        }
        match self.backend.current_user().await? {
            Some(user) if user.id == self.user_id => Ok(()),
            Some(_) => Err(ApiError::NotOwner),
            None => Err(ApiError::NotAuthenticated),
        }
    }

    pub async fn create(&mut self, draft: &ExperienceDraft) -> Result<Experience, ApiError> {
        self.ensure_owner().await?;
        validate_draft(draft)?;
        let draft = normalized(draft);

        let mut row = to_row(&draft)?;
        row.insert("user_id".to_string(), Value::String(self.user_id.clone()));
        let stored = self.backend.insert("experiences", vec![row]).await?;
        let created: Experience = from_rows(stored)?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound("Experiencia".to_string()))?;
        tracing::info!(id = %created.id, kind = created.kind.as_str(), "Experience created");

        self.sync_skills(&draft.technologies).await;
        self.experiences.push(created.clone());
        self.sort();
        Ok(created)
    }

    pub async fn update(&mut self, id: &str, draft: &ExperienceDraft) -> Result<Experience, ApiError> {
        self.ensure_owner().await?;
        validate_draft(draft)?;
        let draft = normalized(draft);

        let filters = [Filter::eq("id", id), Filter::eq("user_id", self.user_id.as_str())];
        let rows = self
            .backend
            .update("experiences", to_row(&draft)?, &filters)
            .await?;
        let updated: Experience = from_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound("Experiencia".to_string()))?;

        self.sync_skills(&draft.technologies).await;
        if let Some(slot) = self.experiences.iter_mut().find(|e| e.id == id) {
            *slot = updated.clone();
        }
        self.sort();
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.ensure_owner().await?;
        let filters = [Filter::eq("id", id), Filter::eq("user_id", self.user_id.as_str())];
        self.backend.delete("experiences", &filters).await?;
        self.experiences.retain(|e| e.id != id);
        tracing::info!(id, "Experience deleted");
        Ok(())
    }

    fn sort(&mut self) {
        self.experiences
            .sort_by(|a, b| b.start_date.cmp(&a.start_date));
    }

    /// Read-merge-write of the profile's skills. Failures are logged only.
    async fn sync_skills(&self, technologies: &[String]) {
        if technologies.is_empty() {
            return;
        }
        let query = Query::table("profiles").eq("id", self.user_id.as_str());
        let profile = match fetch_one::<Profile, B>(&self.backend, &query).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::debug!("No profile row for {}, skills not synced", self.user_id);
                return;
            }
            Err(e) => {
                tracing::warn!("Skill sync read failed: {}", e);
                return;
            }
        };

        let merged = merge_skills(&profile.skills, technologies);
        if merged == profile.skills {
            return;
        }
        let mut patch = serde_json::Map::new();
        patch.insert("skills".to_string(), serde_json::json!(merged));
        if let Err(e) = self
            .backend
            .update("profiles", patch, &[Filter::eq("id", self.user_id.as_str())])
            .await
        {
            tracing::warn!("Skill sync write failed: {}", e);
        }
    }
}
