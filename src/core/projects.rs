//! Project registry loaded once at startup.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::ComposeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub working_dir: String,
}

/// Read-only name → project mapping. Lookups are exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
    by_name: HashMap<String, usize>,
}

impl ProjectRegistry {
    /// Builds a registry from records in file order. A later record with the
    /// same name replaces the earlier one.
    #[must_use]
    pub fn from_projects(records: Vec<Project>) -> Self {
        let mut registry = Self::default();
        for project in records {
            if let Some(&idx) = registry.by_name.get(&project.name) {
                warn!(project = %project.name, "Duplicate project entry, keeping the last one");
                registry.projects[idx] = project;
            } else {
                registry
                    .by_name
                    .insert(project.name.clone(), registry.projects.len());
                registry.projects.push(project);
            }
        }
        registry
    }

    /// Loads the JSON project file (`[{"name": .., "working_dir": ..}]`).
    ///
    /// A missing file yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ComposeError> {
        let path = path.as_ref();
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Project config not found, starting with no projects");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ComposeError::ConfigError(format!(
                    "Failed to read project config {}: {e}",
                    path.display()
                )));
            }
        };

        let records: Vec<Project> = serde_json::from_str(&data).map_err(|e| {
            ComposeError::ConfigError(format!(
                "Failed to parse project config {}: {e}",
                path.display()
            ))
        })?;

        let registry = Self::from_projects(records);
        info!(path = %path.display(), count = registry.len(), "Loaded project config");
        Ok(registry)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Project> {
        self.by_name.get(name).map(|&idx| &self.projects[idx])
    }

    /// Projects in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
