use thiserror::Error;

/// Failures while assembling `Settings` from `config.toml` and `HALFLIFE__*`
/// environment variables.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("Cannot read halflife settings (config file or HALFLIFE__* environment): {0}")]
    Source(#[from] config::ConfigError),

    /// The settings parsed but a value is unusable.
    #[error("Invalid halflife setting: {0}")]
    Invalid(String),
}
