//! HTTP surface of the conversational gateway.

pub mod routes;
pub mod server;
pub mod state;

pub use {
    server::{build_app, run, state_from_config},
    state::AppState,
};
