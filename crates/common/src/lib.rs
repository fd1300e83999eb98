//! Shared types and error definitions used across all kizuna crates.

pub mod error;
pub mod types;

pub use {
    error::{Error, Result},
    types::{ChatOutcome, ChatRequest, ProviderChoice},
};
