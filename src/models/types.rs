//! Type definitions for the scan pipeline
//! Networks, request options, per-model results and the aggregate report

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{MAX_ADDRESS_LEN, MIN_ADDRESS_LEN};

/// Supported blockchain networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Solana,
    Ethereum,
    Base,
    Bsc,
    Polygon,
    Arbitrum,
    Optimism,
    Avalanche,
}

impl Network {
    pub const ALL: [Network; 8] = [
        Network::Solana,
        Network::Ethereum,
        Network::Base,
        Network::Bsc,
        Network::Polygon,
        Network::Arbitrum,
        Network::Optimism,
        Network::Avalanche,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Solana => "solana",
            Network::Ethereum => "ethereum",
            Network::Base => "base",
            Network::Bsc => "bsc",
            Network::Polygon => "polygon",
            Network::Arbitrum => "arbitrum",
            Network::Optimism => "optimism",
            Network::Avalanche => "avalanche",
        }
    }

    /// EVM chains use case-insensitive hex addresses
    pub fn is_evm(&self) -> bool {
        !matches!(self, Network::Solana)
    }

    /// Parse a network name, failing with a validation error
    pub fn parse(raw: &str) -> AppResult<Self> {
        let needle = raw.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|n| n.as_str() == needle)
            .ok_or_else(|| AppError::unsupported_network(raw))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validate an address and return its trimmed form.
///
/// Format checks beyond length belong to the provider; the engine only
/// rejects empty, whitespace-bearing or out-of-bounds identifiers.
pub fn validate_address(raw: &str) -> AppResult<&str> {
    let address = raw.trim();
    if address.is_empty() {
        return Err(AppError::invalid_address("Address is empty"));
    }
    if address.chars().any(char::is_whitespace) {
        return Err(AppError::invalid_address("Address contains whitespace"));
    }
    let len = address.chars().count();
    if len < MIN_ADDRESS_LEN {
        return Err(AppError::invalid_address(format!(
            "Address must be at least {} characters, got {}",
            MIN_ADDRESS_LEN, len
        )));
    }
    if len > MAX_ADDRESS_LEN {
        return Err(AppError::invalid_address(format!(
            "Address must be at most {} characters, got {}",
            MAX_ADDRESS_LEN, len
        )));
    }
    Ok(address)
}

/// Presentation style for the rendered summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Clinical,
    Vermin,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Clinical => "clinical",
            Tone::Vermin => "vermin",
        }
    }
}

impl FromStr for Tone {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clinical" => Ok(Tone::Clinical),
            "vermin" => Ok(Tone::Vermin),
            other => Err(AppError::config_invalid("tone", other)),
        }
    }
}

/// Whether a persisted scan may be listed publicly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Opaque hints forwarded to the feature provider
    pub feature_options: HashMap<String, serde_json::Value>,
    pub visibility: Option<Visibility>,
    /// Caller/user identifier recorded with a persisted scan
    pub scanned_by: Option<String>,
    /// Overrides the engine's default tone
    pub tone: Option<Tone>,
}

impl ScanOptions {
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn scanned_by(mut self, user: impl Into<String>) -> Self {
        self.scanned_by = Some(user.into());
        self
    }

    pub fn with_feature_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.feature_options.insert(key.into(), value);
        self
    }
}

// ============================================
// MODEL RESULTS
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatResult {
    /// Risk score in [0, 1]
    pub threat_score: f64,
    pub confidence: f64,
    /// Rules that fired, in firing order
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaResult {
    pub alpha_score: f64,
    /// Compounded upside multiplier, capped
    pub potential_multiplier: f64,
    pub confidence: f64,
    pub catalysts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralResult {
    pub viral_score: f64,
    /// Estimated hours until virality; always finite
    pub time_to_viral_hrs: f64,
    pub confidence: f64,
    pub signals: Vec<String>,
}

/// A known pattern matched against the transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub pattern: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternResult {
    pub known_patterns: Vec<PatternMatch>,
    pub novel_patterns: Vec<String>,
    /// Share of transactions in the scam bucket
    pub similarity: f64,
    /// Transaction count per bucket
    pub buckets: BTreeMap<String, usize>,
    pub risk_level: f64,
}

// ============================================
// AGGREGATE REPORT
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub processing_ms: u64,
    /// Mean of threat, alpha and viral confidence
    pub overall_confidence: f64,
    pub feature_count: usize,
    pub models_used: usize,
}

/// Complete report for one scan. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub address: String,
    pub network: Network,
    pub tone: Tone,
    pub threat: ThreatResult,
    pub alpha: AlphaResult,
    pub viral: ViralResult,
    pub patterns: PatternResult,
    pub summary: String,
    pub metadata: AnalysisMetadata,
}

/// What `ScanEngine::scan` hands back to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub analysis: Analysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted_id: Option<String>,
}

/// Statistics for monitoring
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanStats {
    pub total_scans: u64,
    pub completed: u64,
    pub failed: u64,
    pub timeouts: u64,
    pub cache_hits: u64,
    pub persistence_failures: u64,
    pub avg_latency_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse() {
        assert_eq!(Network::parse("Solana").unwrap(), Network::Solana);
        assert_eq!(" ethereum ".parse::<Network>().unwrap(), Network::Ethereum);
        let err = Network::parse("dogechain").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field_errors[0].path, "network");
    }

    #[test]
    fn test_network_evm() {
        assert!(!Network::Solana.is_evm());
        assert!(Network::Base.is_evm());
    }

    #[test]
    fn test_validate_address() {
        let addr = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
        assert_eq!(validate_address(&format!("  {}  ", addr)).unwrap(), addr);
        assert!(validate_address("").unwrap_err().is_validation());
        assert!(validate_address("0x1234").unwrap_err().is_validation());
        assert!(validate_address("0xdAC17F958D2ee523 a2206206994597C13D831ec7").is_err());
        assert!(validate_address(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_tone_parse() {
        assert_eq!("VERMIN".parse::<Tone>().unwrap(), Tone::Vermin);
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_viral_result_serializes_camel_case() {
        let result = ViralResult {
            viral_score: 0.0,
            time_to_viral_hrs: 72.0,
            confidence: 0.0,
            signals: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["timeToViralHrs"], 72.0);
    }
}
