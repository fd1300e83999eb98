//! Groq adapter — speaks the OpenAI-compatible Chat Completions API.

use {async_trait::async_trait, secrecy::ExposeSecret};

use kizuna_config::ProvidersConfig;

use crate::{
    model::{ChatBackend, ModelTier},
    resolve_api_key, shared_http_client,
};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Profile for short conversational turns: warm sampling, output capped to
/// chat-bubble length.
const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 400;

fn default_tiers() -> Vec<ModelTier> {
    vec![
        ModelTier::new("llama-3.3-70b-versatile").with_profile(TEMPERATURE, MAX_TOKENS),
        ModelTier::new("llama-3.1-8b-instant").with_profile(TEMPERATURE, MAX_TOKENS),
    ]
}

pub struct GroqBackend {
    api_key: secrecy::Secret<String>,
    base_url: String,
    tiers: Vec<ModelTier>,
    client: &'static reqwest::Client,
}

impl GroqBackend {
    /// Build from config, falling back to `GROQ_API_KEY` for the key and the
    /// built-in tier list when none is configured.
    #[must_use]
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let entry = config.get("groq");

        let base_url = entry
            .and_then(|e| e.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let tiers = match entry.map(|e| e.models.as_slice()) {
            Some(models) if !models.is_empty() => models
                .iter()
                .map(|id| ModelTier::new(id.as_str()).with_profile(TEMPERATURE, MAX_TOKENS))
                .collect(),
            _ => default_tiers(),
        };

        Self {
            api_key: resolve_api_key(config, "groq", "GROQ_API_KEY"),
            base_url: base_url.trim_end_matches('/').to_string(),
            tiers,
            client: shared_http_client(),
        }
    }
}

#[async_trait]
impl ChatBackend for GroqBackend {
    fn name(&self) -> &str {
        "groq"
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
        let mut body = serde_json::json!({
            "model": tier.id,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": message },
            ],
        });
        if let Some(t) = tier.temperature {
            body["temperature"] = serde_json::json!(t);
        }
        if let Some(m) = tier.max_tokens {
            body["max_tokens"] = serde_json::json!(m);
        }

        let http_resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_resp.status();
        if !status.is_success() {
            let body_text = http_resp.text().await.unwrap_or_default();
            anyhow::bail!("groq API error HTTP {status}: {body_text}");
        }

        let resp = http_resp.json::<serde_json::Value>().await?;
        let text = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("groq response missing message content"))?;

        Ok(text.to_string())
    }
}
