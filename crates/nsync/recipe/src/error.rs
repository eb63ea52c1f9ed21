//! Recipe builder error types

use nsync_types::AppSourceError;
use thiserror::Error;

/// Reasons a desire-app request cannot become a recipe.
///
/// All are final for the request; retrying the same request fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("desired app missing both droplet_uri and docker_image; exactly one is required")]
    AppSourceMissing,

    #[error("desired app contains both droplet_uri and docker_image; exactly one is required")]
    MultipleAppSources,

    #[error("no lifecycle bundle defined for stack: {stack}")]
    NoStackBundle { stack: String },
}

impl From<AppSourceError> for RecipeError {
    fn from(err: AppSourceError) -> Self {
        match err {
            AppSourceError::Missing => RecipeError::AppSourceMissing,
            AppSourceError::Multiple => RecipeError::MultipleAppSources,
        }
    }
}

/// Builder configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid stack bundle mapping: {0}")]
    InvalidStackBundles(#[from] serde_json::Error),

    #[error("docker_bundle_path must not be empty")]
    EmptyDockerBundlePath,

    #[error("Invalid file server URL {url}: {reason}")]
    InvalidFileServerUrl { url: String, reason: String },
}

/// Result type for recipe building
pub type Result<T> = std::result::Result<T, RecipeError>;
