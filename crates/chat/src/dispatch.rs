//! The fallback controller.
//!
//! One dispatch walks a fixed sequence: select a backend, attempt its
//! primary tier, classify a failure once, then either retry the fallback
//! tier, degrade to an in-persona advisory reply, or propagate a fatal.
//! Every request makes at most two outbound calls, and the second only
//! starts after the first has failed — never raced.
//!
//! Capacity failures (rate limits, missing model tiers) deliberately come
//! back as a normal reply instead of an error: the conversation stays alive
//! and the persona tells the user how to recover.

use std::sync::Arc;

use tracing::warn;

use {
    kizuna_common::{ChatOutcome, ChatRequest, ProviderChoice},
    kizuna_media::{ImageUrlBuilder, extract, render},
    kizuna_providers::{ChatBackend, ErrorKind, classify_error},
};

pub struct Dispatcher {
    /// Selection table. Adding a provider is one entry here plus its
    /// `ProviderChoice` variant.
    backends: Vec<(ProviderChoice, Arc<dyn ChatBackend>)>,
    system_prompt: &'static str,
    image_urls: ImageUrlBuilder,
    /// Whether a rate-limited primary may still try the fallback tier.
    retry_rate_limited: bool,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        backends: Vec<(ProviderChoice, Arc<dyn ChatBackend>)>,
        system_prompt: &'static str,
        image_urls: ImageUrlBuilder,
        retry_rate_limited: bool,
    ) -> Self {
        Self {
            backends,
            system_prompt,
            image_urls,
            retry_rate_limited,
        }
    }

    fn backend_for(&self, choice: ProviderChoice) -> Option<&Arc<dyn ChatBackend>> {
        self.backends
            .iter()
            .find(|(c, _)| *c == choice)
            .map(|(_, b)| b)
    }

    /// Run one request through the full sequence. The provider was resolved
    /// when the request was built; nothing switches providers mid-flight.
    pub async fn dispatch(&self, req: &ChatRequest) -> ChatOutcome {
        let Some(backend) = self.backend_for(req.provider) else {
            return ChatOutcome::Fatal(format!(
                "no backend registered for provider {}",
                req.provider
            ));
        };

        let Some(primary) = backend.tiers().first() else {
            return ChatOutcome::Fatal(format!("{} has no model tiers", backend.name()));
        };

        let err = match backend
            .invoke(self.system_prompt, &req.message, primary)
            .await
        {
            Ok(text) => return ChatOutcome::Reply(self.post_process(&text)),
            Err(err) => err,
        };

        // Classified exactly once per attempt; the kind alone decides the
        // next state.
        let kind = classify_error(&err);
        warn!(
            provider = backend.name(),
            tier = %primary.id,
            kind = ?kind,
            error = %err,
            "primary tier failed"
        );

        match kind {
            ErrorKind::NotFound => self.retry_fallback(backend, req).await,
            ErrorKind::RateLimited if self.retry_rate_limited => {
                self.retry_fallback(backend, req).await
            },
            ErrorKind::RateLimited => ChatOutcome::Reply(advisory_reply(req.provider)),
            ErrorKind::Unauthorized | ErrorKind::Unknown => ChatOutcome::Fatal(err.to_string()),
        }
    }

    /// The fallback tier is the last resort for a provider: success
    /// post-processes like any reply, any failure degrades to the advisory.
    async fn retry_fallback(&self, backend: &Arc<dyn ChatBackend>, req: &ChatRequest) -> ChatOutcome {
        let Some(fallback) = backend.tiers().get(1) else {
            return ChatOutcome::Reply(advisory_reply(req.provider));
        };

        match backend
            .invoke(self.system_prompt, &req.message, fallback)
            .await
        {
            Ok(text) => ChatOutcome::Reply(self.post_process(&text)),
            Err(err) => {
                warn!(
                    provider = backend.name(),
                    tier = %fallback.id,
                    error = %err,
                    "fallback tier failed"
                );
                ChatOutcome::Reply(advisory_reply(req.provider))
            },
        }
    }

    /// Rewrite an embedded photo directive into a renderable link. Reached
    /// only from a successful attempt.
    fn post_process(&self, text: &str) -> String {
        let directive = extract(text);
        render(text, directive.as_ref(), &self.image_urls)
    }
}

/// In-persona degradation text: tells the user which engine stalled and
/// which one to switch to. Returned as a normal reply, never as an error.
#[must_use]
pub fn advisory_reply(provider: ProviderChoice) -> String {
    format!(
        "\u{1F6AB} Senpai... my {provider} engine is not answering right now. \
\u{1F635} Switch me over to {} and I'll be right back with you. \u{2764}\u{FE0F}",
        provider.alternate()
    )
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use {
        async_trait::async_trait,
        kizuna_config::ImageConfig,
        kizuna_providers::{ChatBackend, ModelTier},
    };

    use super::*;

    /// A backend that pops scripted results, one per invoke, and counts
    /// calls.
    struct ScriptedBackend {
        name: &'static str,
        tiers: Vec<ModelTier>,
        script: Mutex<Vec<Result<String, String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(name: &'static str, tier_count: usize, script: Vec<Result<String, String>>) -> Self {
            let tiers = (0..tier_count)
                .map(|i| ModelTier::new(format!("{name}-tier-{i}")))
                .collect();
            Self {
                name,
                tiers,
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        fn name(&self) -> &str {
            self.name
        }

        fn tiers(&self) -> &[ModelTier] {
            &self.tiers
        }

        async fn invoke(
            &self,
            _system_prompt: &str,
            _message: &str,
            _tier: &ModelTier,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            assert!(!script.is_empty(), "backend invoked more than scripted");
            match script.remove(0) {
                Ok(text) => Ok(text),
                Err(msg) => Err(anyhow::anyhow!("{msg}")),
            }
        }
    }

    fn dispatcher_with(
        groq: Arc<ScriptedBackend>,
        gemini: Arc<ScriptedBackend>,
        retry_rate_limited: bool,
    ) -> Dispatcher {
        Dispatcher::new(
            vec![
                (ProviderChoice::Groq, groq as Arc<dyn ChatBackend>),
                (ProviderChoice::Gemini, gemini as Arc<dyn ChatBackend>),
            ],
            "test persona",
            ImageUrlBuilder::from_config(&ImageConfig::default()),
            retry_rate_limited,
        )
    }

    fn request(message: &str, raw_provider: Option<&str>) -> ChatRequest {
        ChatRequest::new(message, ProviderChoice::resolve(raw_provider))
    }

    #[tokio::test]
    async fn success_without_directive_passes_through() {
        let groq = Arc::new(ScriptedBackend::new("groq", 2, vec![Ok(
            "hola Senpai!".into()
        )]));
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![]));
        let d = dispatcher_with(Arc::clone(&groq), gemini, false);

        let outcome = d.dispatch(&request("hola", Some("groq"))).await;
        assert_eq!(outcome, ChatOutcome::Reply("hola Senpai!".into()));
        assert_eq!(groq.calls(), 1);
    }

    #[tokio::test]
    async fn absent_provider_selects_groq() {
        let groq = Arc::new(ScriptedBackend::new("groq", 2, vec![Ok("hi".into())]));
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![]));
        let d = dispatcher_with(Arc::clone(&groq), Arc::clone(&gemini), false);

        let outcome = d.dispatch(&request("hola", None)).await;
        assert!(matches!(outcome, ChatOutcome::Reply(_)));
        assert_eq!(groq.calls(), 1);
        assert_eq!(gemini.calls(), 0);
    }

    #[tokio::test]
    async fn rate_limited_never_retries() {
        let groq = Arc::new(ScriptedBackend::new("groq", 2, vec![Err(
            "groq API error HTTP 429: Quota exceeded".into(),
        )]));
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![]));
        let d = dispatcher_with(Arc::clone(&groq), gemini, false);

        let outcome = d.dispatch(&request("hola", Some("groq"))).await;
        assert_eq!(groq.calls(), 1);
        match outcome {
            ChatOutcome::Reply(text) => assert!(text.contains("gemini"), "{text}"),
            ChatOutcome::Fatal(e) => panic!("expected advisory reply, got fatal: {e}"),
        }
    }

    #[tokio::test]
    async fn not_found_retries_fallback_tier_once() {
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![
            Err("gemini API error HTTP 404 not found".into()),
            Ok("Mira [[PHOTO: cat]]".into()),
        ]));
        let groq = Arc::new(ScriptedBackend::new("groq", 2, vec![]));
        let d = dispatcher_with(groq, Arc::clone(&gemini), false);

        let outcome = d.dispatch(&request("foto?", Some("gemini"))).await;
        assert_eq!(gemini.calls(), 2);
        match outcome {
            ChatOutcome::Reply(text) => {
                assert!(text.starts_with("Mira ("), "{text}");
                assert!(!text.contains("[[PHOTO:"), "{text}");
                assert!(text.contains("cat"), "{text}");
            },
            ChatOutcome::Fatal(e) => panic!("unexpected fatal: {e}"),
        }
    }

    #[tokio::test]
    async fn not_found_without_fallback_tier_degrades() {
        let groq = Arc::new(ScriptedBackend::new("groq", 1, vec![Err(
            "HTTP 404 not found".into(),
        )]));
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![]));
        let d = dispatcher_with(Arc::clone(&groq), gemini, false);

        let outcome = d.dispatch(&request("hola", Some("groq"))).await;
        assert_eq!(groq.calls(), 1);
        assert_eq!(
            outcome,
            ChatOutcome::Reply(advisory_reply(ProviderChoice::Groq))
        );
    }

    #[tokio::test]
    async fn fallback_failure_degrades_to_advisory() {
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![
            Err("HTTP 404 not found".into()),
            Err("HTTP 503 overloaded".into()),
        ]));
        let groq = Arc::new(ScriptedBackend::new("groq", 2, vec![]));
        let d = dispatcher_with(groq, Arc::clone(&gemini), false);

        let outcome = d.dispatch(&request("hola", Some("gemini"))).await;
        assert_eq!(gemini.calls(), 2);
        assert_eq!(
            outcome,
            ChatOutcome::Reply(advisory_reply(ProviderChoice::Gemini))
        );
    }

    #[tokio::test]
    async fn unauthorized_is_fatal_with_raw_message() {
        let groq = Arc::new(ScriptedBackend::new("groq", 2, vec![Err(
            "groq API error HTTP 401: invalid key".into(),
        )]));
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![]));
        let d = dispatcher_with(Arc::clone(&groq), gemini, false);

        let outcome = d.dispatch(&request("hola", Some("groq"))).await;
        assert_eq!(groq.calls(), 1);
        match outcome {
            ChatOutcome::Fatal(msg) => assert!(msg.contains("invalid key"), "{msg}"),
            ChatOutcome::Reply(r) => panic!("expected fatal, got reply: {r}"),
        }
    }

    #[tokio::test]
    async fn unknown_is_fatal() {
        let groq = Arc::new(ScriptedBackend::new("groq", 2, vec![Err(
            "connection reset by peer".into(),
        )]));
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![]));
        let d = dispatcher_with(Arc::clone(&groq), gemini, false);

        let outcome = d.dispatch(&request("hola", Some("groq"))).await;
        assert_eq!(groq.calls(), 1);
        assert!(matches!(outcome, ChatOutcome::Fatal(_)));
    }

    #[tokio::test]
    async fn rate_limited_retries_when_toggled_on() {
        let gemini = Arc::new(ScriptedBackend::new("gemini", 2, vec![
            Err("HTTP 429 quota".into()),
            Ok("back online".into()),
        ]));
        let groq = Arc::new(ScriptedBackend::new("groq", 2, vec![]));
        let d = dispatcher_with(groq, Arc::clone(&gemini), true);

        let outcome = d.dispatch(&request("hola", Some("gemini"))).await;
        assert_eq!(gemini.calls(), 2);
        assert_eq!(outcome, ChatOutcome::Reply("back online".into()));
    }

    #[test]
    fn advisory_names_the_alternate_provider() {
        assert!(advisory_reply(ProviderChoice::Groq).contains("gemini"));
        assert!(advisory_reply(ProviderChoice::Gemini).contains("groq"));
    }
}
