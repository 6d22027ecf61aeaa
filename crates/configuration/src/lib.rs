// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    AlertsConfig, AnomalyRule, ApiConfig, AssetsConfig, Config, CorrelationConfig, MetricKind,
    SheetsConfig, StorageConfig, TelegramConfig,
};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, layers `MARKETDASH__`-prefixed environment variables
/// on top (which is where the API keys and tokens come from in deployment),
/// and deserializes the result into our strongly-typed `Config` struct.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        // Secrets such as MARKETDASH__API__FMP_API_KEY live in the environment.
        .add_source(config::Environment::with_prefix("MARKETDASH").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
