//! Signed-in user's dashboard.
//!
//! Loaded as two independent phases. [`load_critical`] (profile and own
//! projects) must succeed before anything renders. [`load_metrics`] (view
//! statistics, status breakdown, collaborations) is best-effort: any failure
//! leaves that part empty and is logged at debug level.

use std::collections::HashMap;

use serde_json::json;
use store::{
    fetch, fetch_one, Backend, Profile, Project, ProjectMember, ProjectStatus, ProjectViewStats,
    Query, SessionUser,
};

use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardCritical {
    pub user: SessionUser,
    pub profile: Option<Profile>,
    /// Own projects, newest first.
    pub projects: Vec<Project>,
}

impl DashboardCritical {
    /// Name for the greeting: profile display name, else the account handle.
    pub fn greeting_name(&self) -> String {
        self.profile
            .as_ref()
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| self.user.handle().to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardMetrics {
    pub views: HashMap<String, ProjectViewStats>,
    pub total_views: i64,
    pub unique_viewers: i64,
    /// Every status with its count, in [`ProjectStatus::ALL`] order.
    pub status_counts: Vec<(ProjectStatus, usize)>,
    /// Projects of other creators the user is a member of.
    pub collaborations: usize,
}

pub async fn load_critical<B: Backend>(backend: &B) -> Result<DashboardCritical, ApiError> {
    let user = backend
        .current_user()
        .await?
        .ok_or(ApiError::NotAuthenticated)?;

    let profile = fetch_one::<Profile, B>(backend, &Query::table("profiles").eq("id", user.id.as_str()))
        .await?;
    let projects = fetch::<Project, B>(
        backend,
        &Query::table("projects")
            .eq("creator_id", user.id.as_str())
            .order("created_at", false),
    )
    .await?;
    tracing::info!(user_id = %user.id, projects = projects.len(), "Dashboard loaded");

    Ok(DashboardCritical {
        user,
        profile,
        projects,
    })
}

/// Supplementary numbers. Never fails.
pub async fn load_metrics<B: Backend>(backend: &B, critical: &DashboardCritical) -> DashboardMetrics {
    let mut metrics = DashboardMetrics {
        status_counts: status_breakdown(&critical.projects),
        ..Default::default()
    };

    let ids: Vec<&str> = critical.projects.iter().map(|p| p.id.as_str()).collect();
    if !ids.is_empty() {
        match view_stats(backend, &ids).await {
            Ok(stats) => {
                for s in stats {
                    metrics.views.insert(s.project_id.clone(), s);
                }
            }
            Err(e) => {
                tracing::debug!("View stats unavailable, using stored counters: {}", e);
                for p in &critical.projects {
                    metrics.views.insert(
                        p.id.clone(),
                        ProjectViewStats {
                            project_id: p.id.clone(),
                            total_views: p.views_count,
                            unique_viewers: 0,
                        },
                    );
                }
            }
        }
    }
    metrics.total_views = metrics.views.values().map(|s| s.total_views).sum();
    metrics.unique_viewers = metrics.views.values().map(|s| s.unique_viewers).sum();

    let memberships = Query::table("project_members").eq("user_id", critical.user.id.as_str());
    match fetch::<ProjectMember, B>(backend, &memberships).await {
        Ok(rows) => {
            metrics.collaborations = rows
                .iter()
                .filter(|m| !ids.contains(&m.project_id.as_str()))
                .count();
        }
        Err(e) => tracing::debug!("Membership count unavailable: {}", e),
    }

    metrics
}

async fn view_stats<B: Backend>(
    backend: &B,
    project_ids: &[&str],
) -> Result<Vec<ProjectViewStats>, ApiError> {
    let value = backend
        .rpc("project_view_stats", json!({ "project_ids": project_ids }))
        .await?;
    Ok(serde_json::from_value(value).map_err(store::StoreError::from)?)
}

/// Count projects per status.
pub fn status_breakdown(projects: &[Project]) -> Vec<(ProjectStatus, usize)> {
    ProjectStatus::ALL
        .into_iter()
        .map(|status| {
            let n = projects.iter().filter(|p| p.status == status).count();
            (status, n)
        })
        .collect()
}
