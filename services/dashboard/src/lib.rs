//! Crypto sentiment dashboard
//!
//! Fetches ranked sentiment metrics through the proxy endpoint, repairs
//! every record into a display-safe shape and substitutes a static sample
//! dataset, run through the same sort/limit semantics, when the live
//! source fails.
//!
//! # Architecture
//!
//! ```text
//!  QueryParams { sort_descending, limit }
//!        │
//!    ┌───▼────┐   Err(FetchError)   ┌────────────┐
//!    │ Source │ ──────────────────► │ SampleData │ reverse, truncate
//!    └───┬────┘                     └─────┬──────┘
//!        │ Ok(payload)                    │
//!    ┌───▼────────────────────────────────▼───┐
//!    │        normalize (repair + rank)       │
//!    └───────────────────┬────────────────────┘
//!                        │ ResultEnvelope { records, is_synthetic }
//!                 ┌──────▼───────┐
//!                 │DashboardState│ ← latest request generation wins
//!                 └──────┬───────┘
//!                   ┌────▼────┐
//!                   │  view   │ cards | table
//!                   └─────────┘
//! ```

pub mod config;
pub mod console;
pub mod pipeline;
pub mod sample;
pub mod source;
pub mod state;
pub mod view;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
