//! Database setup: tables, projects and declared dimensions.

use super::open_existing;
use crate::records::Project;
use crate::storage::ExpenseStore;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// What `declare` adds to the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclareTarget {
    Category(String),
    Stage { name: String, id: Option<String> },
}

/// Create the database (if needed) and seed default stages, categories and payment modes
pub fn execute_init(db_path: &Path) -> Result<()> {
    let mut store = ExpenseStore::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    store.initialize().context("Failed to create tables")?;

    info!("✓ Database ready: {}", db_path.display());
    Ok(())
}

pub fn execute_add_project(db_path: &Path, name: &str, location: Option<&str>) -> Result<i64> {
    let store = open_existing(db_path)?;
    let id = store
        .create_project(name, location)
        .context("Failed to create project")?;

    println!("Created project {} - {}", id, name.trim());
    Ok(id)
}

pub fn execute_list_projects(db_path: &Path) -> Result<Vec<Project>> {
    let store = open_existing(db_path)?;
    let projects = store.projects()?;

    if projects.is_empty() {
        println!("No projects yet. Create one with `project add --name <name>`.");
    }
    for project in &projects {
        match &project.location {
            Some(location) => println!("{} ({})", project, location),
            None => println!("{}", project),
        }
    }

    Ok(projects)
}

/// Rename or relocate a project
pub fn execute_edit_project(
    db_path: &Path,
    id: i64,
    name: Option<&str>,
    location: Option<&str>,
) -> Result<Project> {
    let store = open_existing(db_path)?;
    let current = store.project(id)?;

    let name = name.unwrap_or(&current.name);
    let location = location.or(current.location.as_deref());
    store
        .update_project(id, name, location)
        .with_context(|| format!("Failed to update project {}", id))?;

    let updated = store.project(id)?;
    println!("Updated project {}", updated);
    Ok(updated)
}

/// Delete a project; refused while it still has purchases
pub fn execute_delete_project(db_path: &Path, id: i64) -> Result<()> {
    let mut store = open_existing(db_path)?;
    store
        .delete_project(id)
        .with_context(|| format!("Failed to delete project {}", id))?;

    info!("✓ Project {} deleted", id);
    Ok(())
}

/// Declare an extra category or stage
///
/// Stages without an explicit id get the next `STAGE-<n>` id.
pub fn execute_declare(db_path: &Path, target: DeclareTarget) -> Result<()> {
    let store = open_existing(db_path)?;

    match target {
        DeclareTarget::Category(name) => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Category name cannot be empty");
            }
            store.add_category(name)?;
            info!("✓ Category declared: {}", name);
        }
        DeclareTarget::Stage { name, id } => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Stage name cannot be empty");
            }
            let id = match id {
                Some(id) => id,
                None => format!("STAGE-{}", store.stages()?.len() + 1),
            };
            store.add_stage(&id, name)?;
            info!("✓ Stage declared: {} ({})", name, id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::DEFAULT_STAGES;

    #[test]
    fn test_declare_requires_existing_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("missing.db");

        let result = execute_declare(&db_path, DeclareTarget::Category("Plumbing".to_string()));
        assert!(result.is_err());
        assert!(!db_path.exists());
    }

    #[test]
    fn test_declare_stage_assigns_next_id() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("expenses.db");
        execute_init(&db_path).unwrap();

        execute_declare(
            &db_path,
            DeclareTarget::Stage {
                name: "Landscaping".to_string(),
                id: None,
            },
        )
        .unwrap();

        let store = ExpenseStore::open(&db_path).unwrap();
        let stages = store.stages().unwrap();
        assert_eq!(stages.len(), DEFAULT_STAGES.len() + 1);
        assert_eq!(stages.last().map(String::as_str), Some("Landscaping"));
    }

    #[test]
    fn test_edit_project_keeps_unchanged_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("expenses.db");
        execute_init(&db_path).unwrap();
        let id = execute_add_project(&db_path, "Villa", Some("Kochi")).unwrap();

        let updated = execute_edit_project(&db_path, id, Some("Villa Phase 2"), None).unwrap();
        assert_eq!(updated.name, "Villa Phase 2");
        assert_eq!(updated.location.as_deref(), Some("Kochi"));

        let updated = execute_edit_project(&db_path, id, None, Some("Thrissur")).unwrap();
        assert_eq!(updated.name, "Villa Phase 2");
        assert_eq!(updated.location.as_deref(), Some("Thrissur"));
    }

    #[test]
    fn test_delete_unknown_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("expenses.db");
        execute_init(&db_path).unwrap();

        assert!(execute_delete_project(&db_path, 7).is_err());
    }
}
