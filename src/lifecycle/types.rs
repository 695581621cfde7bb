//! Lifecycle API payloads.

use std::collections::BTreeMap;

use serde::Deserialize;

/// `GET /resources`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub count: usize,
}

/// `POST /restart?resource=` and `POST /start?resource=`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// `POST /restart` without a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RestartAll {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Per-unit restart result.
    #[serde(default)]
    pub results: BTreeMap<String, bool>,
}

impl RestartAll {
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(name, _)| name.as_str())
    }
}

/// What [`super::sync_unit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Restarted,
    Started,
}

impl SyncAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restarted => "restarted",
            Self::Started => "started",
        }
    }
}
