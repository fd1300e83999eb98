//! Extraction and rewrite of the `[[PHOTO: …]]` tag.
//!
//! The grammar is a plain text scan, not a parser: the tag opens with
//! `[[PHOTO:` and runs non-greedily to the first `]]`. No nesting, no
//! escaping. Only the first occurrence is honoured — if a backend emits two
//! tags the second stays verbatim in the reply. That single-match behaviour
//! is a documented limitation of the protocol, not something to widen here.

use crate::image_url::ImageUrlBuilder;

const TAG_OPEN: &str = "[[PHOTO:";
const TAG_CLOSE: &str = "]]";

/// One matched photo directive: the free-text description and the byte span
/// of the raw tag in the original reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualDirective {
    pub description: String,
    /// Byte offset of `[[` in the source text.
    pub start: usize,
    /// Byte offset one past the closing `]]`.
    pub end: usize,
}

/// Scan for the first well-formed directive. An unclosed tag is not a match.
#[must_use]
pub fn extract(text: &str) -> Option<VisualDirective> {
    let start = text.find(TAG_OPEN)?;
    let body_start = start + TAG_OPEN.len();
    let close = text[body_start..].find(TAG_CLOSE)?;
    let end = body_start + close + TAG_CLOSE.len();

    Some(VisualDirective {
        description: text[body_start..body_start + close].trim().to_string(),
        start,
        end,
    })
}

/// Replace the matched tag with a readable pointer to the generated image.
///
/// Exactly the recorded span is spliced out; every other byte of `text` is
/// preserved. With no directive the text passes through unchanged.
#[must_use]
pub fn render(text: &str, directive: Option<&VisualDirective>, urls: &ImageUrlBuilder) -> String {
    let Some(d) = directive else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len() + 96);
    out.push_str(&text[..d.start]);
    out.push_str(&format!(
        "(\u{1F4F8} sent you a photo: {})",
        urls.url_for(&d.description)
    ));
    out.push_str(&text[d.end..]);
    out
}
