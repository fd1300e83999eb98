//! Config schema. Every section is `#[serde(default)]` so a partial file —
//! or no file at all — yields a runnable configuration.

use std::collections::HashMap;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KizunaConfig {
    pub server: ServerConfig,
    #[serde(flatten)]
    pub providers: ProvidersConfig,
    pub chat: ChatConfig,
    pub image: ImageConfig,
}

/// Gateway server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 7727,
        }
    }
}

/// Chat dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether a rate-limited primary tier may still try the fallback tier.
    /// Off by default: rate limits apply provider-wide, so the request
    /// degrades to an advisory reply instead of spending a second call.
    pub retry_rate_limited: bool,
    /// Persona variant sent as the system turn.
    pub persona: PersonaStyle,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            retry_rate_limited: false,
            persona: PersonaStyle::LongForm,
        }
    }
}

/// Persona prompt variant. Deployment-level; never switched per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaStyle {
    ShortForm,
    #[default]
    LongForm,
}

/// External image-generation endpoint used to materialise photo directives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Base endpoint; the URL-encoded prompt is appended as a path segment.
    pub endpoint: String,
    pub width: u32,
    pub height: u32,
    /// Ask the endpoint to skip its watermark overlay.
    pub nologo: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://image.pollinations.ai/prompt".into(),
            width: 512,
            height: 768,
            nologo: true,
        }
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Provider-specific settings keyed by provider name.
    /// Known keys: "groq", "gemini".
    #[serde(flatten)]
    pub providers: HashMap<String, ProviderEntry>,
}

impl ProvidersConfig {
    /// Check if a provider is enabled (defaults to true if not configured).
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.providers.get(name).is_none_or(|e| e.enabled)
    }

    /// Get the configured entry for a provider, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProviderEntry> {
        self.providers.get(name)
    }
}

/// Configuration for a single LLM provider.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEntry {
    /// Whether this provider is enabled. Defaults to true.
    pub enabled: bool,

    /// Override the API key (optional; env var still applies if unset).
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,

    /// Override the base URL.
    pub base_url: Option<String>,

    /// Ordered model tiers for this provider: first entry is the primary
    /// model, second the fallback. Empty means the built-in defaults.
    pub models: Vec<String>,
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .finish()
    }
}

impl Default for ProviderEntry {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: None,
            models: Vec::new(),
        }
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
