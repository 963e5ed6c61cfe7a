//! Public project catalog.
//!
//! Loading happens in two passes: the public projects first, newest first,
//! then one batched lookup of author labels for the distinct creators. Author
//! labels come from `profiles`, then `users` for whoever is still missing, and
//! finally a `usuario_<id prefix>` placeholder, so every card has a label.
//!
//! Search runs over the loaded list in memory: title, description or any tag,
//! case-insensitive.

use std::collections::HashMap;

use serde::Deserialize;
use store::{fetch, AuthUser, Backend, Project, Query, StoreError};

/// Label for projects without a category.
pub const UNCATEGORIZED: &str = "Otros";

/// A project with its resolved author label.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectCard {
    pub project: Project,
    pub author: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub cards: Vec<ProjectCard>,
}

/// The slice of a `profiles` row the author lookup reads. Both name columns
/// are nullable so one incomplete profile cannot fail the whole batch.
#[derive(Debug, Deserialize)]
struct AuthorRow {
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
}

impl AuthorRow {
    /// Full name, else username.
    fn label(&self) -> Option<String> {
        [&self.full_name, &self.username]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// `usuario_` followed by the first eight characters of the id.
pub fn placeholder_author(user_id: &str) -> String {
    let prefix: String = user_id.chars().take(8).collect();
    format!("usuario_{prefix}")
}

pub async fn fetch_public_projects<B: Backend>(backend: &B) -> Result<Vec<Project>, StoreError> {
    let query = Query::table("projects")
        .eq("visibility", "public")
        .order("created_at", false);
    fetch(backend, &query).await
}

/// Map every distinct creator id to a non-empty label.
///
/// Lookup failures are logged and fall through to the next source.
pub async fn resolve_authors<B: Backend>(
    backend: &B,
    creator_ids: &[String],
) -> HashMap<String, String> {
    let mut ids: Vec<String> = Vec::new();
    for id in creator_ids {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    let mut labels = HashMap::new();
    if ids.is_empty() {
        return labels;
    }

    let profiles = Query::table("profiles")
        .select("id,username,full_name")
        .is_in("id", ids.iter().cloned());
    match fetch::<AuthorRow, B>(backend, &profiles).await {
        Ok(found) => {
            for row in found {
                if let Some(label) = row.label() {
                    labels.insert(row.id, label);
                }
            }
        }
        Err(e) => tracing::warn!("Author lookup in profiles failed: {}", e),
    }

    let missing: Vec<String> = ids
        .iter()
        .filter(|id| !labels.contains_key(*id))
        .cloned()
        .collect();
    if !missing.is_empty() {
        let users = Query::table("users").is_in("id", missing);
        match fetch::<AuthUser, B>(backend, &users).await {
            Ok(found) => {
                for u in found {
                    if let Some(label) = u.label() {
                        labels.insert(u.id.clone(), label.trim().to_string());
                    }
                }
            }
            Err(e) => tracing::warn!("Author lookup in users failed: {}", e),
        }
    }

    for id in ids {
        labels
            .entry(id.clone())
            .or_insert_with(|| placeholder_author(&id));
    }
    labels
}

/// Case-insensitive substring match over title, description and tags.
/// A blank query matches everything.
pub fn matches_search(project: &Project, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    project.title.to_lowercase().contains(&needle)
        || project
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
        || project
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}

/// Group cards by category, largest group first. Equal sizes keep the order
/// in which their category first appeared.
pub fn group_by_category(cards: &[ProjectCard]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for card in cards {
        let category = card
            .project
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED);
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.cards.push(card.clone()),
            None => groups.push(CategoryGroup {
                category: category.to_string(),
                cards: vec![card.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| b.cards.len().cmp(&a.cards.len()));
    groups
}

/// Loaded catalog plus the current search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    cards: Vec<ProjectCard>,
    query: String,
}

impl Catalog {
    pub async fn load<B: Backend>(backend: &B) -> Result<Self, StoreError> {
        let projects = fetch_public_projects(backend).await?;
        let creators: Vec<String> = projects.iter().map(|p| p.creator_id.clone()).collect();
        let authors = resolve_authors(backend, &creators).await;
        let cards = projects
            .into_iter()
            .map(|project| {
                let author = authors
                    .get(&project.creator_id)
                    .cloned()
                    .unwrap_or_else(|| placeholder_author(&project.creator_id));
                ProjectCard { project, author }
            })
            .collect::<Vec<_>>();
        tracing::info!(count = cards.len(), "Catalog loaded");
        Ok(Self {
            cards,
            query: String::new(),
        })
    }

    pub fn from_cards(cards: Vec<ProjectCard>) -> Self {
        Self {
            cards,
            query: String::new(),
        }
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// Cards matching the current search, in load order.
    pub fn visible(&self) -> Vec<ProjectCard> {
        self.cards
            .iter()
            .filter(|c| matches_search(&c.project, &self.query))
            .cloned()
            .collect()
    }

    pub fn groups(&self) -> Vec<CategoryGroup> {
        group_by_category(&self.visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use store::MemoryBackend;

    fn project(id: &str, category: Option<&str>) -> Project {
        serde_json::from_value(json!({
            "id": id,
            "slug": id,
            "title": format!("Proyecto {id}"),
            "creator_id": "u1",
            "category": category,
        }))
        .unwrap()
    }

    fn card(id: &str, category: Option<&str>) -> ProjectCard {
        ProjectCard {
            project: project(id, category),
            author: "ana".into(),
        }
    }

    #[test]
    fn test_groups_sorted_by_size_then_first_seen() {
        let cards = vec![
            card("1", Some("A")),
            card("2", Some("B")),
            card("3", Some("A")),
        ];
        let groups = group_by_category(&cards);
        assert_eq!(groups[0].category, "A");
        assert_eq!(groups[0].cards.len(), 2);
        assert_eq!(groups[1].category, "B");

        let tied = vec![card("1", Some("Z")), card("2", None), card("3", Some(" "))];
        let groups = group_by_category(&tied);
        assert_eq!(groups[0].category, UNCATEGORIZED);
        assert_eq!(groups[1].category, "Z");
        let ties = vec![card("1", Some("Z")), card("2", Some("Y"))];
        let names: Vec<_> = group_by_category(&ties)
            .into_iter()
            .map(|g| g.category)
            .collect();
        assert_eq!(names, vec!["Z", "Y"]);
    }

    #[test]
    fn test_search_and_restore() {
        let mut rust = card("1", None);
        rust.project.tags = vec!["Rust".into()];
        let mut web = card("2", None);
        web.project.description = Some("Una app WEB".into());
        let mut catalog = Catalog::from_cards(vec![rust, web]);

        catalog.search("rust");
        assert_eq!(catalog.visible().len(), 1);
        catalog.search("web");
        assert_eq!(catalog.visible()[0].project.id, "2");
        catalog.search("nada");
        assert!(catalog.visible().is_empty());
        catalog.search("   ");
        assert_eq!(catalog.visible().len(), catalog.total());
    }

    #[test]
    fn test_empty_search_restores_grouped_list() {
        let mut rust = card("1", Some("Backend"));
        rust.project.tags = vec!["Rust".into()];
        let cards = vec![
            rust,
            card("2", Some("Web")),
            card("3", Some("Web")),
            card("4", None),
        ];
        let mut catalog = Catalog::from_cards(cards);
        let before = catalog.groups();

        catalog.search("rust");
        assert_eq!(catalog.groups().len(), 1);
        catalog.search("");
        assert_eq!(catalog.groups(), before);

        let shape: Vec<(String, usize)> = before
            .iter()
            .map(|g| (g.category.clone(), g.cards.len()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("Web".to_string(), 2),
                ("Backend".to_string(), 1),
                (UNCATEGORIZED.to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_placeholder_author() {
        assert_eq!(
            placeholder_author("abcdef1234567890"),
            "usuario_abcdef12"
        );
        assert_eq!(placeholder_author("abc"), "usuario_abc");
    }

    #[tokio::test]
    async fn test_authors_fall_back_through_sources() {
        let backend = MemoryBackend::new();
        backend.seed(
            "profiles",
            vec![json!({"id": "u1", "username": "ana", "full_name": "Ana Pérez"})],
        );
        backend.seed(
            "users",
            vec![json!({"id": "u2", "email": "bruno@example.com"})],
        );
        let ids = vec![
            "u1".to_string(),
            "u2".to_string(),
            "u3-without-anything".to_string(),
            "u1".to_string(),
        ];
        let labels = resolve_authors(&backend, &ids).await;
        assert_eq!(labels.len(), 3);
        assert_eq!(labels["u1"], "Ana Pérez");
        assert_eq!(labels["u2"], "bruno@example.com");
        assert_eq!(labels["u3-without-anything"], "usuario_u3-witho");
    }

    #[tokio::test]
    async fn test_profile_without_username_does_not_hide_other_authors() {
        let backend = MemoryBackend::new();
        backend.seed(
            "profiles",
            vec![
                json!({"id": "u1", "username": "ana", "full_name": "Ana Pérez"}),
                json!({"id": "u2", "username": null, "full_name": null}),
                json!({"id": "u3", "username": "carla", "full_name": null}),
            ],
        );
        let ids = vec!["u1".to_string(), "u2".to_string(), "u3".to_string()];
        let labels = resolve_authors(&backend, &ids).await;
        assert_eq!(labels["u1"], "Ana Pérez");
        assert_eq!(labels["u2"], "usuario_u2");
        assert_eq!(labels["u3"], "carla");
    }

    #[tokio::test]
    async fn test_load_only_public_newest_first() {
        let backend = MemoryBackend::new();
        backend.fail_on("users");
        backend.seed(
            "projects",
            vec![
                json!({"id": "p1", "slug": "a", "title": "Viejo", "creator_id": "zz999999x",
                       "visibility": "public", "created_at": "2024-01-01T00:00:00Z"}),
                json!({"id": "p2", "slug": "b", "title": "Privado", "creator_id": "u1",
                       "visibility": "private", "created_at": "2024-03-01T00:00:00Z"}),
                json!({"id": "p3", "slug": "c", "title": "Nuevo", "creator_id": "u1",
                       "visibility": "public", "created_at": "2024-02-01T00:00:00Z"}),
            ],
        );
        let catalog = Catalog::load(&backend).await.unwrap();
        let visible = catalog.visible();
        let ids: Vec<_> = visible.iter().map(|c| c.project.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p1"]);
        assert!(visible.iter().all(|c| !c.author.is_empty()));
        assert_eq!(visible[1].author, "usuario_zz999999");
    }
}
