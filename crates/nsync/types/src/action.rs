//! Executor action tree
//!
//! Recipes describe container work as a small tree of actions. The set of
//! node kinds is closed: consumers match on [`Action`] exhaustively.

use crate::request::EnvironmentVariable;
use serde::{Deserialize, Serialize};

/// One node of an action tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Fetch an artifact into the container
    Download(DownloadAction),
    /// Run a process inside the container
    Run(RunAction),
    /// Run child actions one after another
    Serial(SerialAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadAction {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAction {
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: Vec<EnvironmentVariable>,
    #[serde(default)]
    pub resource_limits: ResourceLimits,
}

/// Process limits; `None` leaves the container default in place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nofile: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialAction {
    pub actions: Vec<Action>,
}

impl Action {
    pub fn download(from: impl Into<String>, to: impl Into<String>) -> Self {
        Action::Download(DownloadAction {
            from: from.into(),
            to: to.into(),
            cache_key: None,
        })
    }

    pub fn cached_download(
        from: impl Into<String>,
        to: impl Into<String>,
        cache_key: impl Into<String>,
    ) -> Self {
        Action::Download(DownloadAction {
            from: from.into(),
            to: to.into(),
            cache_key: Some(cache_key.into()),
        })
    }

    pub fn serial(actions: Vec<Action>) -> Self {
        Action::Serial(SerialAction { actions })
    }

    /// Direct children of this node
    pub fn children(&self) -> &[Action] {
        match self {
            Action::Serial(serial) => &serial.actions,
            Action::Download(_) | Action::Run(_) => &[],
        }
    }

    /// Visit every node depth first, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Action)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

impl From<RunAction> for Action {
    fn from(run: RunAction) -> Self {
        Action::Run(run)
    }
}
