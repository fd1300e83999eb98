//! Gemini adapter — speaks the `generateContent` REST API.

use {async_trait::async_trait, secrecy::ExposeSecret};

use kizuna_config::ProvidersConfig;

use crate::{
    model::{ChatBackend, ModelTier},
    resolve_api_key, shared_http_client,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const MAX_OUTPUT_TOKENS: u32 = 8192;

fn default_tiers() -> Vec<ModelTier> {
    let mut primary = ModelTier::new("gemini-flash-latest");
    primary.max_tokens = Some(MAX_OUTPUT_TOKENS);
    let mut fallback = ModelTier::new("gemini-2.0-flash-lite");
    fallback.max_tokens = Some(MAX_OUTPUT_TOKENS);
    vec![primary, fallback]
}

pub struct GeminiBackend {
    api_key: secrecy::Secret<String>,
    base_url: String,
    tiers: Vec<ModelTier>,
    client: &'static reqwest::Client,
}

impl GeminiBackend {
    /// Build from config, falling back to `GEMINI_API_KEY` for the key and
    /// the built-in tier list when none is configured.
    #[must_use]
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let entry = config.get("gemini");

        let base_url = entry
            .and_then(|e| e.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let tiers = match entry.map(|e| e.models.as_slice()) {
            Some(models) if !models.is_empty() => models
                .iter()
                .map(|id| {
                    let mut tier = ModelTier::new(id.as_str());
                    tier.max_tokens = Some(MAX_OUTPUT_TOKENS);
                    tier
                })
                .collect(),
            _ => default_tiers(),
        };

        Self {
            api_key: resolve_api_key(config, "gemini", "GEMINI_API_KEY"),
            base_url: base_url.trim_end_matches('/').to_string(),
            tiers,
            client: shared_http_client(),
        }
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn tiers(&self) -> &[ModelTier] {
        &self.tiers
    }

    async fn invoke(
        &self,
        system_prompt: &str,
        message: &str,
        tier: &ModelTier,
    ) -> anyhow::Result<String> {
        let mut generation_config = serde_json::Map::new();
        if let Some(m) = tier.max_tokens {
            generation_config.insert("maxOutputTokens".into(), serde_json::json!(m));
        }
        if let Some(t) = tier.temperature {
            generation_config.insert("temperature".into(), serde_json::json!(t));
        }

        let body = serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": system_prompt }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": message }],
            }],
            "generationConfig": generation_config,
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, tier.id
        );

        let http_resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_resp.status();
        if !status.is_success() {
            let body_text = http_resp.text().await.unwrap_or_default();
            anyhow::bail!("gemini API error HTTP {status}: {body_text}");
        }

        let resp = http_resp.json::<serde_json::Value>().await?;

        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let texts: Vec<&str> = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        if texts.is_empty() {
            anyhow::bail!("gemini response contained no text parts");
        }

        Ok(texts.join(""))
    }
}
