//! Tab workspace configuration.
//!
//! An embedded default document plus an optional partial override. Fields
//! missing from the override keep their default values.

use serde::{Deserialize, Serialize};

/// Which neighbour becomes active when the active tab is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborPolicy {
    /// The tab before the closed one, else the tab after it.
    #[default]
    PreferPrevious,
    /// The tab after the closed one, else the tab before it.
    PreferNext,
}

/// How "close others" and "close all" treat tabs with unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkClosePolicy {
    /// Close every targeted tab, dirty or not.
    #[default]
    Unconditional,
    /// Leave dirty tabs open.
    KeepDirty,
}

/// What the "save" answer of the unsaved-changes dialog does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcomePolicy {
    /// Stopgap: "save" closes the tab exactly like "discard" and saves nothing.
    #[default]
    Discard,
    /// Run the save handler registered by the hosted module, close on success.
    Handler,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    pub neighbor_on_close: NeighborPolicy,
    pub bulk_close: BulkClosePolicy,
    pub save_outcome: SaveOutcomePolicy,
    pub title_max_chars: usize,
    pub strip_scroll_step: i32,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"{
    "neighbor_on_close": "prefer_previous",
    "bulk_close": "unconditional",
    "save_outcome": "discard",
    "title_max_chars": 28,
    "strip_scroll_step": 160
}"#;

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            neighbor_on_close: NeighborPolicy::default(),
            bulk_close: BulkClosePolicy::default(),
            save_outcome: SaveOutcomePolicy::default(),
            title_max_chars: 28,
            strip_scroll_step: 160,
        }
    }
}

impl TabsConfig {
    /// Parse the embedded default document.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_json(DEFAULT_CONFIG)
    }

    /// Parse a (possibly partial) JSON document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: TabsConfig = serde_json::from_str(json)?;
        if config.title_max_chars == 0 {
            anyhow::bail!("title_max_chars must be greater than zero");
        }
        if config.strip_scroll_step <= 0 {
            anyhow::bail!("strip_scroll_step must be positive");
        }
        Ok(config)
    }
}
