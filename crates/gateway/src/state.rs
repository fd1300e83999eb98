use std::sync::Arc;

use {kizuna_chat::Dispatcher, kizuna_media::ImageUrlBuilder};

/// Shared app state. Everything here is immutable after startup; requests
/// share it without coordination.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub image_urls: ImageUrlBuilder,
}
