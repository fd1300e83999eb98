//! Maps a raw backend failure onto the closed set of kinds the dispatcher
//! branches on. Pure and stable: same message, same kind, every time —
//! fallback behaviour has to be deterministic to be testable.

/// How a backend failure should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Requested model tier unavailable — retry once on the fallback tier.
    NotFound,
    /// 429 / quota exhausted — degrade to an advisory reply, no retry.
    RateLimited,
    /// Credential or permission problem — fatal.
    Unauthorized,
    /// Unclassified — treated conservatively as fatal.
    Unknown,
}

/// Classify an error by its textual message (case-insensitive markers).
#[must_use]
pub fn classify_error(err: &anyhow::Error) -> ErrorKind {
    classify_message(&err.to_string())
}

#[must_use]
pub fn classify_message(raw: &str) -> ErrorKind {
    let msg = raw.to_lowercase();

    if msg.contains("404") || msg.contains("not found") {
        return ErrorKind::NotFound;
    }

    if msg.contains("429") || msg.contains("quota") {
        return ErrorKind::RateLimited;
    }

    if msg.contains("401") || msg.contains("403") || msg.contains("unauthorized") {
        return ErrorKind::Unauthorized;
    }

    ErrorKind::Unknown
}
