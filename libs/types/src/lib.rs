//! Types library for the crypto sentiment dashboard
//!
//! Shared by the proxy endpoint and the dashboard pipeline so both sides
//! agree on query parameters, record shapes and the failure taxonomy.
//!
//! # Modules
//! - `query`: Query parameters and the recognized limit tiers
//! - `record`: Raw upstream records, field repair, normalized records
//! - `envelope`: The result envelope handed to the presentation layer
//! - `wire`: Proxy endpoint request/response bodies
//! - `errors`: Fetch failure taxonomy

pub mod envelope;
pub mod errors;
pub mod query;
pub mod record;
pub mod wire;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::envelope::*;
    pub use crate::errors::*;
    pub use crate::query::*;
    pub use crate::record::*;
    pub use crate::wire::*;
}
