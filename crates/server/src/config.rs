use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use workflow::{catalog::default_entries, CatalogError, ClassCatalog, ClassEntry};

pub const DEFAULT_CONFIG_PATH: &str = "assignment-bot.toml";

#[derive(Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub bot_token: Option<String>,
    pub classes: Vec<ClassEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            bot_token: None,
            classes: default_entries(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN not found; set it as an environment variable")]
    MissingBotToken,
    #[error("failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid class configuration")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind_addr: Option<String>,
    classes: Option<Vec<ClassEntry>>,
}

impl Settings {
    pub fn require_bot_token(&self) -> Result<&str, ConfigError> {
        self.bot_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingBotToken)
    }

    pub fn catalog(&self) -> Result<ClassCatalog, ConfigError> {
        Ok(ClassCatalog::new(self.classes.clone())?)
    }
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path` if it exists, then environment
/// overrides looked up through `env`.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileConfig =
                toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            if let Some(v) = file_cfg.bind_addr {
                settings.bind_addr = v;
            }
            if let Some(v) = file_cfg.classes {
                settings.classes = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Some(v) = env("BOT_TOKEN") {
        settings.bot_token = Some(v);
    }
    if let Some(v) = env("APP__BOT_TOKEN") {
        settings.bot_token = Some(v);
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
