//! Models Module - Data Structures & Configuration
//!
//! Feature schema, result types, engine configuration and error taxonomy.
//! Thresholds live here and in `utils::constants`, nowhere else.

pub mod config;
pub mod errors;
pub mod features;
pub mod types;

pub use config::*;
pub use errors::*;
pub use features::*;
pub use types::*;
