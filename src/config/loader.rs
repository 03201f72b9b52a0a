use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::{Path, PathBuf};

use super::PushGateConfig;
use crate::error::{PushGateError, Result};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "PUSHGATE_";

impl PushGateConfig {
    /// Load configuration for the repository rooted at `repo_root`
    ///
    /// Priority, lowest first: embedded defaults, user config, repository
    /// config, `custom_config`, `PUSHGATE_` environment variables.
    pub fn load(repo_root: &Path, custom_config: Option<&Path>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));
        figment = Self::merge_any_format(figment, &Self::user_config_base_path());
        figment = Self::merge_any_format(figment, &repo_root.join("pushgate"));

        if let Some(path) = custom_config {
            if !path.is_file() {
                return Err(PushGateError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            tracing::trace!("CONFIG LOAD: Applying {}", path.display());
            figment = Self::merge_file(figment, path);
        }

        figment = figment.merge(Self::env_layer(ENV_PREFIX));

        let config: PushGateConfig = figment
            .extract()
            .map_err(|e| PushGateError::Config(e.to_string()))?;
        config.validate()?;

        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Merge `<base>.toml`, `<base>.json`, `<base>.yaml` and `<base>.yml`; missing files are skipped
    fn merge_any_format(figment: Figment, base: &Path) -> Figment {
        ["toml", "json", "yaml", "yml"]
            .into_iter()
            .map(|ext| base.with_extension(ext))
            .filter(|path| path.is_file())
            .fold(figment, |figment, path| Self::merge_file(figment, &path))
    }

    fn merge_file(figment: Figment, path: &Path) -> Figment {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => figment.merge(Json::file(path)),
            Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
            _ => figment.merge(Toml::file(path)),
        }
    }

    /// `<PREFIX>GATES__TEST__COMMAND` sets `gates.test.command`
    fn env_layer(prefix: &str) -> Env {
        Env::prefixed(prefix).split("__")
    }

    fn user_config_base_path() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".config/pushgate/config"),
            Err(_) => PathBuf::from("~/.config/pushgate/config"),
        }
    }
}
