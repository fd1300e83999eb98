use std::sync::Arc;

use {
    axum::{
        Router,
        routing::{get, post},
    },
    tower_http::cors::{Any, CorsLayer},
    tracing::{info, warn},
};

use {
    kizuna_chat::Dispatcher,
    kizuna_common::ProviderChoice,
    kizuna_config::KizunaConfig,
    kizuna_media::ImageUrlBuilder,
    kizuna_providers::{ChatBackend, GeminiBackend, GroqBackend},
};

use crate::{routes, state::AppState};

/// Build the gateway router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/api/chat", post(routes::chat_handler))
        .layer(cors)
        .with_state(state)
}

/// Wire backends, persona, and dispatcher from config.
#[must_use]
pub fn state_from_config(config: &KizunaConfig) -> AppState {
    let mut backends: Vec<(ProviderChoice, Arc<dyn ChatBackend>)> = Vec::new();

    if config.providers.is_enabled("groq") {
        backends.push((
            ProviderChoice::Groq,
            Arc::new(GroqBackend::from_config(&config.providers)),
        ));
    } else {
        warn!("groq provider disabled in config");
    }

    if config.providers.is_enabled("gemini") {
        backends.push((
            ProviderChoice::Gemini,
            Arc::new(GeminiBackend::from_config(&config.providers)),
        ));
    } else {
        warn!("gemini provider disabled in config");
    }

    let image_urls = ImageUrlBuilder::from_config(&config.image);
    let dispatcher = Dispatcher::new(
        backends,
        kizuna_persona::system_prompt(config.chat.persona),
        image_urls.clone(),
        config.chat.retry_rate_limited,
    );

    AppState {
        dispatcher: Arc::new(dispatcher),
        image_urls,
    }
}

/// Bind and serve until shutdown.
pub async fn run(config: KizunaConfig) -> anyhow::Result<()> {
    let app = build_app(state_from_config(&config));

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "kizuna gateway listening");

    axum::serve(listener, app).await?;
    Ok(())
}
