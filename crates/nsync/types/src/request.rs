//! Desire-app requests from the upstream catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single environment variable handed to the app process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Declaration of an app the catalog wants running.
///
/// Exactly one of `droplet_uri` and `docker_image_url` must be non-empty;
/// see [`DesireAppRequest::app_source`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesireAppRequest {
    pub process_guid: String,

    #[serde(default)]
    pub droplet_uri: String,

    #[serde(default, rename = "docker_image")]
    pub docker_image_url: String,

    #[serde(default)]
    pub stack: String,

    #[serde(default)]
    pub start_command: String,

    #[serde(default)]
    pub execution_metadata: String,

    #[serde(default)]
    pub environment: Vec<EnvironmentVariable>,

    #[serde(default)]
    pub memory_mb: i32,

    #[serde(default)]
    pub disk_mb: i32,

    /// Open file limit; 0 leaves the limit unset
    #[serde(default)]
    pub file_descriptors: u64,

    #[serde(default)]
    pub num_instances: u32,

    #[serde(default)]
    pub routes: Vec<String>,

    #[serde(default)]
    pub log_guid: String,
}

/// Where the app's bits come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppSource<'a> {
    /// A staged droplet built for a stack
    Droplet(&'a str),
    /// A container image reference
    DockerImage(&'a str),
}

/// Why a request has no usable app source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppSourceError {
    Missing,
    Multiple,
}

impl fmt::Display for AppSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppSourceError::Missing => write!(f, "neither droplet_uri nor docker_image is set"),
            AppSourceError::Multiple => write!(f, "both droplet_uri and docker_image are set"),
        }
    }
}

impl std::error::Error for AppSourceError {}

impl DesireAppRequest {
    pub fn new(process_guid: impl Into<String>) -> Self {
        Self {
            process_guid: process_guid.into(),
            ..Default::default()
        }
    }

    /// Resolve the single app source, missing is checked before multiple
    pub fn app_source(&self) -> Result<AppSource<'_>, AppSourceError> {
        match (self.droplet_uri.is_empty(), self.docker_image_url.is_empty()) {
            (true, true) => Err(AppSourceError::Missing),
            (false, false) => Err(AppSourceError::Multiple),
            (false, true) => Ok(AppSource::Droplet(&self.droplet_uri)),
            (true, false) => Ok(AppSource::DockerImage(&self.docker_image_url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_source_resolution() {
        let mut req = DesireAppRequest::new("guid");
        assert_eq!(req.app_source(), Err(AppSourceError::Missing));

        req.droplet_uri = "http://droplet".into();
        assert_eq!(req.app_source(), Ok(AppSource::Droplet("http://droplet")));

        req.docker_image_url = "user/repo".into();
        assert_eq!(req.app_source(), Err(AppSourceError::Multiple));

        req.droplet_uri.clear();
        assert_eq!(req.app_source(), Ok(AppSource::DockerImage("user/repo")));
    }

    #[test]
    fn test_deserialize_catalog_message() {
        let json = r#"{
            "process_guid": "app-guid-app-version",
            "docker_image": "user/repo:tag",
            "stack": "some-stack",
            "start_command": "./run",
            "environment": [{"name": "FOO", "value": "bar"}],
            "memory_mb": 128,
            "num_instances": 2,
            "routes": ["app.example.com"]
        }"#;

        let req: DesireAppRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.docker_image_url, "user/repo:tag");
        assert!(req.droplet_uri.is_empty());
        assert_eq!(req.environment, vec![EnvironmentVariable::new("FOO", "bar")]);
        assert_eq!(req.memory_mb, 128);
        assert_eq!(req.file_descriptors, 0);
        assert_eq!(req.num_instances, 2);
    }
}
