//! VerminScan Library
//!
//! Token and wallet scan engine. One scan turns an `(address, network)` pair
//! into an [`Analysis`]:
//! - Threat: rug-pull and manipulation risk
//! - Alpha: upside and catalysts
//! - Viral: social momentum and time to breakout
//! - Patterns: transaction bucketing against known scam shapes
//!
//! plus a tone-aware narrative summary. Features come from a pluggable
//! [`FeatureProvider`] and are memoized in a short-lived [`FeatureCache`].

pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{
    AlphaModel, PatternModel, ScanEngine, SummaryInput, ThreatModel, ViralModel,
};
pub use models::{
    Analysis, AnalysisMetadata, AppError, AppResult, EngineConfig, ErrorCode, ErrorKind,
    FeatureSchema, Features, FieldError, FieldErrorCode, Network, ScanOptions, ScanOutcome,
    ScanStats, Tone, Visibility,
};
pub use providers::{
    FeatureOptions, FeatureProvider, MemoryScanStore, ScanRecord, ScanStore,
    SeededFeatureProvider, StoredScan,
};
pub use utils::{CacheStats, FeatureCache};
