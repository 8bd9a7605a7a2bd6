//! Configuration loader with multi-source merging

use super::file_config::{ConfigError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;
use tracing::debug;

const APP_DIR: &str = "stackgate";
const PROJECT_FILES: [&str; 2] = ["stackgate.toml", ".stackgate.toml"];

/// Prefix for structured overrides, e.g. `STACKGATE_API__SITE`
pub const ENV_PREFIX: &str = "STACKGATE_";

/// Unprefixed variables accepted for compatibility, with the key each sets
const LEGACY_ENV: [(&str, &str); 5] = [
    ("STACK_EXCHANGE_API_KEY", "api.api_key"),
    ("STACK_EXCHANGE_ACCESS_TOKEN", "api.access_token"),
    (
        "MAX_REQUESTS_PER_WINDOW",
        "rate_limit.max_requests_per_window",
    ),
    ("RATE_LIMIT_WINDOW_MS", "rate_limit.window_ms"),
    ("RETRY_AFTER_MS", "rate_limit.retry_after_ms"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from all sources
    ///
    /// Priority (highest to lowest):
    /// 1. `STACKGATE_<SECTION>__<KEY>` environment variables
    /// 2. Legacy variables (`STACK_EXCHANGE_API_KEY`, `RETRY_AFTER_MS`, ...)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./stackgate.toml` or `./.stackgate.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/stackgate/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        let config: FileConfig = Self::figment(config_path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the merged provider chain without extracting it
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                debug!("Loading global config {}", global_path.display());
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            debug!("Loading project config {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            debug!("Loading explicit config {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(legacy_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Defaults plus environment, for `--no-config`
    pub fn load_defaults() -> Result<FileConfig, ConfigError> {
        let config: FileConfig = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(legacy_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/stackgate/config.toml if set,
    /// otherwise falls back to ~/.config/stackgate/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    ///
    /// With `no_config` the file sources are left out, matching
    /// [`ConfigLoader::load_defaults`].
    pub fn print_config_sources(config_path: Option<&PathBuf>, no_config: bool) {
        eprintln!("Configuration sources (in priority order):");
        for line in Self::config_sources(config_path, no_config) {
            eprintln!("  {}", line);
        }
    }

    fn config_sources(config_path: Option<&PathBuf>, no_config: bool) -> Vec<String> {
        let mut lines = vec![format!("[ENV  ] {}<SECTION>__<KEY>", ENV_PREFIX)];
        for (name, key) in LEGACY_ENV {
            let marker = if std::env::var_os(name).is_some() {
                "SET  "
            } else {
                "     "
            };
            lines.push(format!("[{}] {} -> {}", marker, name, key));
        }

        if !no_config {
            if let Some(path) = config_path {
                let marker = if path.exists() { "FOUND" } else { "MISS " };
                lines.push(format!("[{}] Explicit: {}", marker, path.display()));
            }

            let project = match Self::project_config_path() {
                Some(path) => format!("[FOUND] Project: {}", path.display()),
                None => "[     ] Project: ./stackgate.toml or ./.stackgate.toml".to_string(),
            };
            lines.push(project);

            if let Some(path) = Self::global_config_path() {
                let marker = if path.exists() { "FOUND" } else { "     " };
                lines.push(format!("[{}] Global:  {}", marker, path.display()));
            }
        }

        lines.push("[     ] Default: built-in defaults".into());
        lines
    }
}

fn legacy_env() -> Env {
    let names: Vec<&str> = LEGACY_ENV.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| *path)
            .unwrap_or(key.as_str())
            .to_string()
            .into()
    })
}
