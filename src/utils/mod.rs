//! Utils Module - Shared Helpers
//!
//! Feature cache and the constants every model reads from.

pub mod cache;
pub mod constants;

pub use cache::*;
pub use constants::*;
