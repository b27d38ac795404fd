//! Input limits enforced by the service layer.

use serde::{Deserialize, Serialize};

/// Length limits for user-supplied names and titles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum folder and tag name length, in characters.
    #[serde(default = "default_max_length")]
    pub max_name_length: usize,
    /// Maximum note title length, in characters.
    #[serde(default = "default_max_length")]
    pub max_title_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_length(),
            max_title_length: default_max_length(),
        }
    }
}

fn default_max_length() -> usize {
    255
}
