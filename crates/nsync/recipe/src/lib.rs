//! nsync Recipe Builder
//!
//! Compiles a catalog [`DesireAppRequest`](nsync_types::DesireAppRequest)
//! into a [`Recipe`](nsync_types::Recipe): a setup/run/monitor action tree
//! plus the scheduling metadata the scheduler needs.
//!
//! Building is pure. The builder holds only its configuration, performs no
//! I/O and can be shared freely across threads.
//!
//! ## Usage
//!
//! ```no_run
//! use nsync_recipe::{RecipeBuilder, RecipeBuilderConfig};
//! use nsync_types::DesireAppRequest;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RecipeBuilderConfig::load(Some("nsync.toml"))?;
//! config.validate()?;
//!
//! let builder = RecipeBuilder::new(config);
//! let mut request = DesireAppRequest::new("app-guid-app-version");
//! request.docker_image_url = "user/repo:tag".into();
//!
//! let recipe = builder.build(&request)?;
//! assert_eq!(recipe.root_fs_path, "docker:///user/repo#tag");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod builder;
pub mod config;
pub mod cpu;
pub mod docker;
pub mod error;

pub use builder::RecipeBuilder;
pub use config::{parse_stack_bundles, RecipeBuilderConfig};
pub use cpu::{cpu_weight, MAX_CPU_PROXY, MIN_CPU_PROXY};
pub use docker::{parse_repository_tag, root_fs_uri, DOCKER_SCHEME};
pub use error::{ConfigError, RecipeError, Result};
