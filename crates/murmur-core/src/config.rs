//! Explicit view configuration.
//!
//! The deployment identifier and backend credentials are resolved once, at
//! startup, into a [`ChatConfig`] that is handed to the view at construction.
//! Nothing downstream reads the process environment.

use crate::document::CollectionPath;

/// Deployment identifier used when none is configured.
pub const DEFAULT_DEPLOYMENT_ID: &str = "default-app-id";

/// Environment variable naming the deployment identifier.
pub const DEPLOYMENT_ID_VAR: &str = "STUDIO_APP_ID";

/// Environment variable naming the backend project.
pub const PROJECT_ID_VAR: &str = "STUDIO_PROJECT_ID";

/// Environment variable holding the backend API key.
pub const API_KEY_VAR: &str = "STUDIO_API_KEY";

/// Backend credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Backend project identifier.
    pub project_id: String,
    /// Client API key.
    pub api_key: String,
}

impl BackendConfig {
    /// Both fields are present and non-blank.
    pub fn is_complete(&self) -> bool {
        !self.project_id.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// Configuration for one chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Namespace partitioning data inside the shared backend.
    pub deployment_id: String,
    /// Backend credentials. `None` if the backend is not configured.
    pub backend: Option<BackendConfig>,
}

impl ChatConfig {
    /// Create a configuration for the given deployment.
    ///
    /// A blank deployment identifier falls back to [`DEFAULT_DEPLOYMENT_ID`].
    pub fn new(deployment_id: impl Into<String>, backend: Option<BackendConfig>) -> Self {
        let deployment_id = deployment_id.into();
        let deployment_id = if deployment_id.trim().is_empty() {
            DEFAULT_DEPLOYMENT_ID.to_string()
        } else {
            deployment_id
        };
        Self { deployment_id, backend }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let deployment_id = lookup(DEPLOYMENT_ID_VAR).unwrap_or_default();
        let backend = match (lookup(PROJECT_ID_VAR), lookup(API_KEY_VAR)) {
            (Some(project_id), Some(api_key)) => Some(BackendConfig { project_id, api_key }),
            _ => None,
        };

        Self::new(deployment_id, backend)
    }

    /// Backend handles can be created from this configuration.
    pub fn is_configured(&self) -> bool {
        self.backend.as_ref().is_some_and(BackendConfig::is_complete)
    }

    /// Collection holding the room's messages.
    pub fn collection_path(&self) -> CollectionPath {
        CollectionPath::messages(&self.deployment_id)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYMENT_ID, None)
    }
}
