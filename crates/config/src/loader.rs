use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use kizuna_common::{Error, Result};

use crate::{env_subst::substitute_env, schema::KizunaConfig};

/// Standard config file name.
const CONFIG_FILENAME: &str = "kizuna.toml";

/// Load config from the given path.
pub fn load_config(path: &Path) -> Result<KizunaConfig> {
    let raw = std::fs::read_to_string(path)?;
    let raw = substitute_env(&raw);
    toml::from_str(&raw)
        .map_err(|e| Error::message(format!("failed to parse {}: {e}", path.display())))
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./kizuna.toml` (project-local)
/// 2. `~/.config/kizuna/kizuna.toml` (user-global)
///
/// Returns `KizunaConfig::default()` if no config file is found.
#[must_use]
pub fn discover_and_load() -> KizunaConfig {
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
    KizunaConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    // User-global: ~/.config/kizuna/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "kizuna") {
        let candidate = dirs.config_dir().join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}
