//! Providers Module - Pluggable Collaborators
//!
//! Feature sources and scan persistence, both behind async traits.

pub mod features;
pub mod persistence;

pub use features::*;
pub use persistence::*;
