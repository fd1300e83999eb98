//! Configuration loading and schema.
//!
//! Config file: `kizuna.toml`, searched in `./` then `~/.config/kizuna/`.
//! Supports `${ENV_VAR}` substitution in the raw file before parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::{
        ChatConfig, ImageConfig, KizunaConfig, PersonaStyle, ProviderEntry, ProvidersConfig,
        ServerConfig,
    },
};
