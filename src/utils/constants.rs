//! Constants Module - Single Source of Truth
//!
//! Default thresholds, limits and fixed strings used across the engine.
//! Other modules reference these instead of repeating literals.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "VerminScan";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// ENGINE DEFAULTS
// ============================================

/// Default feature cache TTL (milliseconds)
pub const DEFAULT_CACHE_TTL_MS: u64 = 30_000;

/// Default provider timeout (milliseconds)
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 15_000;

/// Number of scoring models fanned out per scan
pub const MODEL_COUNT: usize = 4;

/// Address length bounds accepted by the engine
pub const MIN_ADDRESS_LEN: usize = 26;
pub const MAX_ADDRESS_LEN: usize = 128;

// ============================================
// THREAT MODEL
// ============================================

pub const THREAT_LOW_LIQUIDITY_RATIO: f64 = 0.01;
pub const THREAT_WHALE_CONCENTRATION_PCT: f64 = 80.0;
/// 24 hours
pub const THREAT_NEW_CONTRACT_SECS: u64 = 86_400;
pub const THREAT_BOT_ACTIVITY_RATIO: f64 = 0.7;

pub const THREAT_WEIGHT_LOW_LIQUIDITY: f64 = 0.4;
pub const THREAT_WEIGHT_WHALE: f64 = 0.3;
pub const THREAT_WEIGHT_NEW_CONTRACT: f64 = 0.2;
pub const THREAT_WEIGHT_BOT: f64 = 0.25;

pub const THREAT_BASE_CONFIDENCE: f64 = 0.35;
/// Share of a rule's weight added to confidence when it fires
pub const THREAT_CONFIDENCE_SHARE: f64 = 0.5;

// ============================================
// ALPHA MODEL
// ============================================

pub const ALPHA_VOLUME_SPIKE_24H: f64 = 10.0;
pub const ALPHA_SENTIMENT: f64 = 0.8;
pub const ALPHA_WHALE_ACCUMULATION: f64 = 0.7;
pub const ALPHA_DEV_COMMITS: u64 = 50;
pub const ALPHA_MARKET_CAP_GROWTH_7D: f64 = 2.0;
pub const ALPHA_MULTIPLIER_CAP: f64 = 1_000_000.0;

// ============================================
// VIRAL MODEL
// ============================================

pub const VIRAL_MENTION_GROWTH: f64 = 5.0;
pub const VIRAL_SEARCH_SPIKE: f64 = 3.0;
pub const VIRAL_NETWORK_VELOCITY: f64 = 0.8;
pub const VIRAL_FALLBACK_HRS: f64 = 72.0;

// ============================================
// PATTERN MODEL
// ============================================

pub const PATTERN_CONFIDENCE_THRESHOLD: f64 = 0.85;
pub const PATTERN_LARGE_VALUE: f64 = 1_000_000.0;
pub const PATTERN_MEDIUM_VALUE: f64 = 1_000.0;
pub const PATTERN_HIGH_GAS: u64 = 100_000;
pub const PATTERN_SCAM_LABEL: &str = "scam_pattern";
pub const PATTERN_SCAM_BUCKET: &str = "large_high_gas";

// ============================================
// SUMMARIZER
// ============================================

pub const CLINICAL_ALPHA_GATE: f64 = 0.4;
pub const CLINICAL_VIRAL_GATE: f64 = 0.4;
pub const VERMIN_ALPHA_GATE: f64 = 0.6;
pub const VERMIN_VIRAL_GATE: f64 = 0.5;

/// Closing line of every rendered summary
pub const DISCLAIMER: &str =
    "This report is for informational purposes only and is not financial advice.";

// ============================================
// ENVIRONMENT KEYS (host configuration only)
// ============================================

pub const ENV_CACHE_TTL_MS: &str = "VERMIN_CACHE_TTL_MS";
pub const ENV_TIMEOUT_MS: &str = "VERMIN_TIMEOUT_MS";
pub const ENV_TONE: &str = "VERMIN_TONE";
