//! Backend adapters for the text-generation providers, plus the failure
//! classifier the dispatcher runs on their errors.

pub mod classify;
pub mod gemini;
pub mod groq;
pub mod model;

pub use {
    classify::{ErrorKind, classify_error},
    gemini::GeminiBackend,
    groq::GroqBackend,
    model::{ChatBackend, ModelTier},
};

use {
    kizuna_config::ProvidersConfig,
    secrecy::{ExposeSecret, Secret},
};

/// Shared HTTP client for all adapters.
///
/// Adapters reuse this client to share connection pools, DNS cache, and TLS
/// sessions across concurrent requests.
pub fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: std::sync::LazyLock<reqwest::Client> =
        std::sync::LazyLock::new(reqwest::Client::new);
    &CLIENT
}

/// Resolve an API key from config or environment, config first.
///
/// A missing key resolves to an empty secret rather than an error: the
/// provider rejects the call with an auth failure, which classifies as
/// `Unauthorized` and surfaces through the normal error path.
pub(crate) fn resolve_api_key(
    config: &ProvidersConfig,
    provider: &str,
    env_key: &str,
) -> Secret<String> {
    config
        .get(provider)
        .and_then(|e| e.api_key.clone())
        .or_else(|| {
            std::env::var(env_key)
                .ok()
                .filter(|k| !k.is_empty())
                .map(Secret::new)
        })
        .filter(|s| !s.expose_secret().trim().is_empty())
        .unwrap_or_else(|| Secret::new(String::new()))
}
