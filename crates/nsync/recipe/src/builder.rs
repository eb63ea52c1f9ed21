//! Desire-app request -> LRP recipe translation

use crate::config::RecipeBuilderConfig;
use crate::cpu::cpu_weight;
use crate::docker::root_fs_uri;
use crate::error::{RecipeError, Result};
use nsync_types::{
    Action, AppSource, DesireAppRequest, EnvironmentVariable, LogConfig, PortMapping, Recipe,
    ResourceLimits, RunAction,
};
use tracing::{debug, instrument};

/// Domain every app LRP is desired under
pub const LRP_DOMAIN: &str = "cf-apps";

/// Log source name attached to app output
pub const LOG_SOURCE_NAME: &str = "App";

/// Port the app is told to listen on
pub const APP_PORT: u16 = 8080;

/// File server route that serves static bundles
pub const STATIC_ROUTE: &str = "/v1/static/";

/// Where the lifecycle bundle is extracted inside the container
pub const LIFECYCLE_DIR: &str = "/tmp/circus";

const LAUNCHER_PATH: &str = "/tmp/circus/soldier";
const HEALTH_CHECK_PATH: &str = "/tmp/circus/spy";
const APP_DIR: &str = "/app";

/// Builds recipes from desire-app requests.
///
/// Holds nothing but its configuration, so one builder can serve any number
/// of concurrent callers.
#[derive(Debug, Clone)]
pub struct RecipeBuilder {
    config: RecipeBuilderConfig,
}

impl RecipeBuilder {
    pub fn new(config: RecipeBuilderConfig) -> Self {
        Self { config }
    }

    /// Translate one request.
    ///
    /// Checks, in order: some app source is set, only one is set, and a
    /// droplet's stack has a lifecycle bundle. The first failure is returned.
    #[instrument(name = "build_recipe", skip_all, fields(process_guid = %request.process_guid))]
    pub fn build(&self, request: &DesireAppRequest) -> Result<Recipe> {
        let source = request.app_source()?;

        let (bundle_path, root_fs_path, droplet_uri) = match source {
            AppSource::DockerImage(image) => {
                (self.config.docker_bundle_path.as_str(), root_fs_uri(image), None)
            }
            AppSource::Droplet(uri) => {
                let bundle = self.config.stack_bundles.get(&request.stack).ok_or_else(|| {
                    RecipeError::NoStackBundle {
                        stack: request.stack.clone(),
                    }
                })?;
                (bundle.as_str(), String::new(), Some(uri))
            }
        };

        let mut setup = vec![Action::download(self.bundle_url(bundle_path), LIFECYCLE_DIR)];
        if let Some(uri) = droplet_uri {
            setup.push(Action::cached_download(
                uri,
                ".",
                format!("droplets-{}", request.process_guid),
            ));
        }

        let recipe = Recipe {
            domain: LRP_DOMAIN.to_string(),
            process_guid: request.process_guid.clone(),
            instances: request.num_instances,
            routes: request.routes.clone(),
            cpu_weight: cpu_weight(request.memory_mb),
            memory_mb: request.memory_mb,
            disk_mb: request.disk_mb,
            ports: vec![PortMapping {
                container_port: APP_PORT,
            }],
            root_fs_path,
            stack: request.stack.clone(),
            log: LogConfig {
                guid: request.log_guid.clone(),
                source_name: LOG_SOURCE_NAME.to_string(),
            },
            setup: Action::serial(setup),
            action: launch_action(request).into(),
            monitor: health_check_action().into(),
        };

        debug!(
            cpu_weight = recipe.cpu_weight,
            docker = !recipe.root_fs_path.is_empty(),
            "Built recipe"
        );

        Ok(recipe)
    }

    fn bundle_url(&self, bundle_path: &str) -> String {
        join_url(&self.config.file_server_url, &[STATIC_ROUTE, bundle_path])
    }
}

fn launch_action(request: &DesireAppRequest) -> RunAction {
    let nofile = (request.file_descriptors != 0).then_some(request.file_descriptors);

    RunAction {
        path: LAUNCHER_PATH.to_string(),
        args: vec![
            APP_DIR.to_string(),
            request.start_command.clone(),
            request.execution_metadata.clone(),
        ],
        env: app_environment(&request.environment),
        resource_limits: ResourceLimits { nofile },
    }
}

fn health_check_action() -> RunAction {
    RunAction {
        path: HEALTH_CHECK_PATH.to_string(),
        args: vec![format!("-addr=:{APP_PORT}")],
        ..Default::default()
    }
}

/// The request's variables followed by the fixed port/host settings
fn app_environment(requested: &[EnvironmentVariable]) -> Vec<EnvironmentVariable> {
    let port = APP_PORT.to_string();

    let mut env = requested.to_vec();
    env.push(EnvironmentVariable::new("PORT", port.clone()));
    env.push(EnvironmentVariable::new("VCAP_APP_PORT", port));
    env.push(EnvironmentVariable::new("VCAP_APP_HOST", "0.0.0.0"));
    env
}

/// Join URL parts with exactly one `/` between them
fn join_url(base: &str, parts: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for part in parts {
        let part = part.trim_matches('/');
        if part.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(part);
    }
    url
}
