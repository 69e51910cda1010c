use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from arranger.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum recorded actions; oldest entries drop off once exceeded
    #[serde(default = "default_max_history")]
    pub max_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            max_size: default_max_history(),
        }
    }
}

fn default_max_history() -> usize {
    50
}

/// Constraints applied when validating bulk operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Constraints {
    /// Hard cap on the number of selected columns (None = unlimited)
    #[serde(default)]
    pub max_selections: Option<usize>,
    /// Permit bulk operations to move locked columns out of the selected pane
    #[serde(default)]
    pub allow_locked_columns: bool,
    /// Permit bulk operations to remove required columns
    #[serde(default)]
    pub allow_required_columns: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color overrides, e.g. highlight = "#FB4196"
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default)]
    pub show_key_hints: bool,
}
