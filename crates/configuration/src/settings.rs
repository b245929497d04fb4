use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub analysis: AnalysisSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Where the dataset lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub path: PathBuf,
}

/// Tunables for the derived views.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Median half-life, in years, under which a skill domain is flagged on
    /// the category distribution.
    pub domain_threshold_years: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Table,
    /// The full aggregate structure as JSON.
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `info` or `analytics=debug`.
    pub filter: String,
}

// --- Default Implementations ---
// These allow a user to omit any section (or the whole file) and still get a
// working configuration.

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("skill_half_life_ai.csv"),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            domain_threshold_years: 5.0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.analysis.domain_threshold_years;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "analysis.domain_threshold_years must be a positive number, got {threshold}"
            )));
        }
        if self.data.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data.path must not be empty".to_string()));
        }
        Ok(())
    }
}
