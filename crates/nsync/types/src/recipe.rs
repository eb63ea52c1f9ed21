//! Built LRP recipes

use crate::action::Action;
use serde::{Deserialize, Serialize};

/// A fully built desired LRP, ready for the scheduler's upsert API.
///
/// Recipes are produced in one call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub domain: String,
    pub process_guid: String,
    pub instances: u32,
    pub routes: Vec<String>,

    /// Relative CPU share, always within 1..=100
    pub cpu_weight: u32,

    pub memory_mb: i32,
    pub disk_mb: i32,
    pub ports: Vec<PortMapping>,

    /// Root filesystem URI; empty selects the stack's default rootfs
    #[serde(default)]
    pub root_fs_path: String,

    pub stack: String,
    pub log: LogConfig,

    /// Always a [`Action::Serial`] of downloads
    pub setup: Action,
    /// Always a [`Action::Run`] of the app launcher
    pub action: Action,
    /// Always a [`Action::Run`] of the health probe
    pub monitor: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortMapping {
    pub container_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub guid: String,
    pub source_name: String,
}
