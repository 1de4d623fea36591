//! Core Module - Scoring Models & Scan Engine
//!
//! Four pure models read one feature snapshot; the engine wires them to the
//! provider, cache and store.

pub mod alpha;
pub mod engine;
pub mod pattern;
pub mod summarizer;
pub mod threat;
pub mod viral;

pub use alpha::*;
pub use engine::*;
pub use pattern::*;
pub use summarizer::*;
pub use threat::*;
pub use viral::*;
