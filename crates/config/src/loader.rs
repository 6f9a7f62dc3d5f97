use std::path::{Path, PathBuf};

use {thiserror::Error, tracing::{debug, warn}};

use crate::{env_subst::substitute_env, schema::MagpieConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["magpie.toml", "magpie.yaml", "magpie.yml", "magpie.json"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("unsupported config format: .{0}")]
    UnsupportedFormat(String),
}

/// Load config from an explicit path (any supported format).
pub fn load_config(path: &Path) -> Result<MagpieConfig, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./magpie.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/magpie/magpie.{toml,yaml,yml,json}` (user-global)
///
/// Returns `MagpieConfig::default()` if no config file is found or the
/// found file fails to load.
pub fn discover_and_load() -> MagpieConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    MagpieConfig::default()
}

fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "magpie") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn parse_config(raw: &str, path: &Path) -> Result<MagpieConfig, LoadError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let parse_err = |message: String| LoadError::Parse {
        path: path.display().to_string(),
        message,
    };

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "json" => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
        _ => Err(LoadError::UnsupportedFormat(ext.to_string())),
    }
}
