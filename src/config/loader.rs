//! Configuration loader
//!
//! `ConfigLoader` merges configuration sources in order of precedence and
//! validates the result.

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "PIZZA_CONFIG_DIR";

const CONFIG_FILE_ENV: &str = "PIZZA_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

const ENV_PREFIX: &str = "PIZZA";

/// Separator for nested keys: `PIZZA_DATABASE__URL` -> `database.url`
const ENV_SEPARATOR: &str = "__";

/// Loads layered configuration.
///
/// Sources, lowest priority first:
/// 1. `default.toml` (required)
/// 2. `{environment}.toml`
/// 3. `local.toml`
/// 4. `PIZZA_*` environment variables
///
/// In single-file mode only the given file is read before the environment.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Builds a loader from `PIZZA_CONFIG_DIR`, `PIZZA_CONFIG_FILE` and `PIZZA_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Fails when both `PIZZA_CONFIG_DIR` and `PIZZA_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_dir.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "PIZZA_CONFIG_DIR and PIZZA_CONFIG_FILE cannot both be set. \
                 Use PIZZA_CONFIG_DIR for layered configuration or \
                 PIZZA_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Layered loading from an explicit directory.
    pub fn from_dir(config_dir: impl Into<PathBuf>, environment: AppEnvironment) -> Self {
        Self {
            config_dir: config_dir.into(),
            config_file: None,
            environment,
        }
    }

    /// Single-file loading; the file replaces every layered source.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Overrides the environment used to pick `{environment}.toml`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Loads without validating, so CLI overrides can be applied first.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        self.build_config()?
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize configuration: {e}")))
    }

    /// Loads and validates the merged settings.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = match &self.config_file {
            Some(config_file) => Self::add_file_source(Config::builder(), config_file, true)?,
            None => self.build_layered_config(Config::builder())?,
        };

        Self::add_env_source(builder).build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = Self::add_file_source(builder, &self.config_dir.join("default.toml"), true)?;
        let env_file = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_file, false)?;
        Self::add_file_source(builder, &self.config_dir.join("local.toml"), false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }

    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}
