//! Configuration for the recipe builder

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Where lifecycle bundles live and which one each stack uses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeBuilderConfig {
    /// Stack name -> lifecycle bundle path on the file server
    #[serde(default)]
    pub stack_bundles: HashMap<String, String>,

    /// Lifecycle bundle used for every docker-image app
    #[serde(default)]
    pub docker_bundle_path: String,

    /// Base URL of the file server hosting the bundles
    #[serde(default)]
    pub file_server_url: String,
}

/// On-disk / environment shape; the stack mapping stays an unparsed string
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawConfig {
    #[serde(default)]
    stack_bundles: String,
    #[serde(default)]
    docker_bundle_path: String,
    #[serde(default)]
    file_server_url: String,
}

impl RecipeBuilderConfig {
    pub fn new(
        stack_bundles: HashMap<String, String>,
        docker_bundle_path: impl Into<String>,
        file_server_url: impl Into<String>,
    ) -> Self {
        Self {
            stack_bundles,
            docker_bundle_path: docker_bundle_path.into(),
            file_server_url: file_server_url.into(),
        }
    }

    /// Load configuration from file.
    ///
    /// `stack_bundles` is read as a JSON object string (file key
    /// `stack_bundles`, env `NSYNC_STACK_BUNDLES`) so stack names keep their
    /// case; the config crate lowercases table keys.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        // Add default configuration
        builder = builder.add_source(::config::Config::try_from(&RawConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::with_name(path).required(false));
        }

        // NSYNC_STACK_BUNDLES, NSYNC_DOCKER_BUNDLE_PATH, NSYNC_FILE_SERVER_URL
        builder = builder.add_source(
            ::config::Environment::with_prefix("NSYNC")
                .prefix_separator("_")
                .separator("__"),
        );

        let raw: RawConfig = builder.build()?.try_deserialize()?;
        let stack_bundles = if raw.stack_bundles.trim().is_empty() {
            HashMap::new()
        } else {
            parse_stack_bundles(&raw.stack_bundles)?
        };

        Ok(Self {
            stack_bundles,
            docker_bundle_path: raw.docker_bundle_path,
            file_server_url: raw.file_server_url,
        })
    }

    /// Replace the stack mapping with one given as a JSON object
    pub fn with_stack_bundles_json(mut self, json: &str) -> Result<Self, ConfigError> {
        self.stack_bundles = parse_stack_bundles(json)?;
        Ok(self)
    }

    /// Check the settings every build depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.docker_bundle_path.is_empty() {
            return Err(ConfigError::EmptyDockerBundlePath);
        }

        Url::parse(&self.file_server_url).map_err(|e| ConfigError::InvalidFileServerUrl {
            url: self.file_server_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

/// Parse a `{"stack": "bundle path"}` JSON object
pub fn parse_stack_bundles(json: &str) -> Result<HashMap<String, String>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}
