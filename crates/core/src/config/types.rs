use serde::{Deserialize, Serialize};

use crate::converter::ConverterConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Settings for hosts that convert many files at once
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Conversions allowed to run at the same time
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
    /// Per-file timeout in seconds (0 disables it)
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            timeout_secs: 0,
        }
    }
}

fn default_max_parallel() -> usize {
    4
}
