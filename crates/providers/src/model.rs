use async_trait::async_trait;

/// One model tier of a provider: an opaque model id plus an optional
/// generation profile. Tiers are static configuration, ordered by
/// preference — index 0 is the primary model, index 1 the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTier {
    pub id: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ModelTier {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_profile(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = Some(temperature);
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Uniform call contract over one text-generation provider.
///
/// One `invoke` is exactly one outbound call to one model tier. Adapters do
/// not retry, do not fall back, do not log, and hold no mutable state — the
/// dispatcher owns all of that. On success the generated text comes back
/// verbatim, system prompt neither stripped nor re-added.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Ordered model tiers. Never empty; at most the first two are used.
    fn tiers(&self) -> &[ModelTier];

    async fn invoke(
        &self,
        system_prompt: &str,
        message: &str,
        tier: &ModelTier,
    ) -> anyhow::Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_profile_builder() {
        let tier = ModelTier::new("llama-3.3-70b-versatile").with_profile(0.8, 400);
        assert_eq!(tier.id, "llama-3.3-70b-versatile");
        assert_eq!(tier.temperature, Some(0.8));
        assert_eq!(tier.max_tokens, Some(400));
    }

    #[test]
    fn tier_defaults_to_no_profile() {
        let tier = ModelTier::new("gemini-flash-latest");
        assert_eq!(tier.temperature, None);
        assert_eq!(tier.max_tokens, None);
    }
}
