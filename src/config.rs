use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::layout::LayoutConfig;
use crate::threads::ThreadConfig;

/// All tunables for one pipeline run. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub threads: ThreadConfig,
    pub layout: LayoutConfig,
}

impl GraphConfig {
    pub fn validate(&self) -> Result<(), GraphError> {
        self.threads.validate()?;
        self.layout.validate()
    }

    pub fn from_json(raw: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
    }
}
