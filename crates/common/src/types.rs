//! Plumbing types shared by the dispatcher, the gateway, and the CLI.

use serde::{Deserialize, Serialize};

/// Which text-generation provider a request should be routed to.
///
/// A tagged variant instead of raw strings so the selection table in the
/// dispatcher stays exhaustive — adding a provider means adding a variant
/// and one table entry, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderChoice {
    Groq,
    Gemini,
}

impl ProviderChoice {
    /// Resolve a raw preference string. Absent or unrecognised values fall
    /// back to Groq — the UI sends free-form strings and a typo should not
    /// reject the request.
    #[must_use]
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("gemini") => Self::Gemini,
            _ => Self::Groq,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Gemini => "gemini",
        }
    }

    /// The other provider — used by advisory replies that suggest switching.
    #[must_use]
    pub fn alternate(self) -> Self {
        match self {
            Self::Groq => Self::Gemini,
            Self::Gemini => Self::Groq,
        }
    }
}

impl std::fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound chat turn. Built per call, never persisted; conversation
/// history lives with the caller.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub provider: ProviderChoice,
}

impl ChatRequest {
    #[must_use]
    pub fn new(message: impl Into<String>, provider: ProviderChoice) -> Self {
        Self {
            message: message.into(),
            provider,
        }
    }
}

/// Terminal result of one dispatch. Exactly one variant per call: degraded
/// failures surface as a normal `Reply` (advisory text), only
/// unauthorized/unclassified failures become `Fatal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    Fatal(String),
}
