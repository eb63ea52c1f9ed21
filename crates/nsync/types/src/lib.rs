//! nsync Types - Shared data model for the LRP synchronizer
//!
//! nsync keeps a scheduler's set of desired long-running processes (LRPs)
//! in step with the upstream app catalog, and translates catalog
//! desire-app messages into schedulable recipes.
//!
//! ## Key Concepts
//!
//! - **Fingerprint**: identity + version token of one desired app
//! - **ExistingWorkload**: an LRP the scheduler already knows about
//! - **DesireAppRequest**: a catalog declaration of an app to run
//! - **Action**: a node of the setup/run/monitor action tree
//! - **Recipe**: the fully built, schedulable LRP specification

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod action;
pub mod fingerprint;
pub mod recipe;
pub mod request;

pub use action::{Action, DownloadAction, ResourceLimits, RunAction, SerialAction};
pub use fingerprint::{ExistingWorkload, Fingerprint};
pub use recipe::{LogConfig, PortMapping, Recipe};
pub use request::{AppSource, AppSourceError, DesireAppRequest, EnvironmentVariable};
