use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisSettings, DataSettings, LoggingSettings, OutputFormat, OutputSettings, Settings,
};

/// Loads the application configuration.
///
/// Values are layered: built-in defaults, then the TOML file, then environment
/// variables such as `HALFLIFE__DATA__PATH`. With `path` set the file must
/// exist; otherwise an optional `config.toml` in the working directory is used.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration file.");
            config::File::from(path).required(true)
        }
        None => config::File::with_name("config").required(false),
    };

    let builder = config::Config::builder().add_source(file).add_source(
        config::Environment::with_prefix("HALFLIFE")
            .separator("__")
            .try_parsing(true),
    );

    finish(builder)
}

/// Deserializes the layered sources into `Settings` and validates them.
fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
