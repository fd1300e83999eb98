//! Chat dispatch: provider selection, tiered fallback, failure degradation,
//! and reply post-processing.

pub mod dispatch;
pub mod follow_up;

pub use {
    dispatch::{Dispatcher, advisory_reply},
    follow_up::{HabitEvent, follow_up_message},
};
