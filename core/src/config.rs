use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};

/// Batch limit imposed by the rider directory on "resolve ids" queries.
pub const DIRECTORY_BATCH_LIMIT: usize = 10;

/// Largest accepted grouping proximity: one week.
pub const MAX_PROXIMITY_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupingConfig {
    /// Rides whose starts (or ends) lie within this many minutes of each
    /// other are grouped even when their intervals do not overlap.
    /// Zero means strict interval overlap only.
    pub proximity_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryConfig {
    pub batch_size: usize,
    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,
}

fn default_unknown_label() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    pub grouping: GroupingConfig,
    pub directory: DirectoryConfig,
}

impl ReportConfig {
    /// Load from the data/ directory.
    /// In tests, use ReportConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/report_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ReportConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in tests.
    /// Strict overlap grouping so interval boundaries are easy to reason about.
    pub fn default_test() -> Self {
        Self {
            grouping: GroupingConfig { proximity_minutes: 0 },
            directory: DirectoryConfig {
                batch_size: DIRECTORY_BATCH_LIMIT,
                unknown_label: default_unknown_label(),
            },
        }
    }

    pub fn validate(&self) -> ReportResult<()> {
        self.grouping.validate()?;
        if self.directory.batch_size == 0 || self.directory.batch_size > DIRECTORY_BATCH_LIMIT {
            return Err(batch_size_error(self.directory.batch_size));
        }
        Ok(())
    }
}

impl GroupingConfig {
    pub fn validate(&self) -> ReportResult<()> {
        if !(0..=MAX_PROXIMITY_MINUTES).contains(&self.proximity_minutes) {
            return Err(ReportError::InvalidConfig {
                reason: format!(
                    "proximity_minutes must be in 0..={MAX_PROXIMITY_MINUTES}, got {}",
                    self.proximity_minutes
                ),
            });
        }
        Ok(())
    }
}

pub(crate) fn batch_size_error(batch_size: usize) -> ReportError {
    ReportError::InvalidConfig {
        reason: format!("directory batch_size must be in 1..={DIRECTORY_BATCH_LIMIT}, got {batch_size}"),
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            grouping: GroupingConfig { proximity_minutes: 30 },
            directory: DirectoryConfig {
                batch_size: DIRECTORY_BATCH_LIMIT,
                unknown_label: default_unknown_label(),
            },
        }
    }
}
