use std::path::{Path, PathBuf};

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Loads a config struct from an optional file and `APP_`-prefixed environment
/// variables, env taking precedence. Nested keys use `__`, e.g.
/// `APP_AUTH__JWT_SECRET`.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";
    /// Names an optional base config file (toml/yaml/json, by extension).
    const FILE_VAR: &'static str = "CONFIG_FILE";

    fn load_dotenv() {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn config_file() -> Option<PathBuf> {
        std::env::var_os(Self::FILE_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();

        let mut builder = config_rs::Config::builder();
        if let Some(path) = Self::config_file() {
            tracing::debug!(path = %path.display(), "loading base config file");
            builder = builder.add_source(config_rs::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("failed to read config sources")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
