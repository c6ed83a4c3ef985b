//! Sentiment proxy service
//!
//! Forwards `GET /api/sentiment?desc&limit` to the upstream ranked coin
//! list, injecting the bearer credential from the environment. Every
//! failure collapses to status 500 with a `{ error, code }` body.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod upstream;
