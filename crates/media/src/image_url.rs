//! Builds the outbound image-generation URL. A pure string transform — the
//! fetch, if one ever happens, belongs to whoever renders the link.

use kizuna_config::ImageConfig;

#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    endpoint: String,
    width: u32,
    height: u32,
    nologo: bool,
}

impl ImageUrlBuilder {
    #[must_use]
    pub fn from_config(cfg: &ImageConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            width: cfg.width,
            height: cfg.height,
            nologo: cfg.nologo,
        }
    }

    /// URL for a generated image of `description` at the configured fixed
    /// dimensions. The description travels URL-encoded as a path segment.
    #[must_use]
    pub fn url_for(&self, description: &str) -> String {
        let mut url = format!(
            "{}/{}?width={}&height={}",
            self.endpoint,
            urlencoding::encode(description),
            self.width,
            self.height
        );
        if self.nologo {
            url.push_str("&nologo=true");
        }
        url
    }
}
