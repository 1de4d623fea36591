//! Configuration module for the scan engine
//!
//! All defaults come from utils/constants.rs; nothing here reads the
//! environment unless a host explicitly calls `EngineConfig::from_env`.

use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::Tone;
use crate::utils::constants::*;

/// Threat model thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatThresholds {
    /// Liquidity ratio below this is "extremely low"
    pub low_liquidity_ratio: f64,
    /// Top-10% holder share (percent) above this is whale-dominated
    pub whale_concentration_pct: f64,
    /// Contracts younger than this (seconds) count as new
    pub new_contract_secs: u64,
    /// Bot-like activity ratio above this is suspicious
    pub bot_activity_ratio: f64,
}

impl Default for ThreatThresholds {
    fn default() -> Self {
        Self {
            low_liquidity_ratio: THREAT_LOW_LIQUIDITY_RATIO,
            whale_concentration_pct: THREAT_WHALE_CONCENTRATION_PCT,
            new_contract_secs: THREAT_NEW_CONTRACT_SECS,
            bot_activity_ratio: THREAT_BOT_ACTIVITY_RATIO,
        }
    }
}

/// Alpha model thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaThresholds {
    pub volume_spike_24h: f64,
    pub sentiment: f64,
    pub whale_accumulation: f64,
    pub dev_commits: u64,
    pub market_cap_growth_7d: f64,
    pub multiplier_cap: f64,
}

impl Default for AlphaThresholds {
    fn default() -> Self {
        Self {
            volume_spike_24h: ALPHA_VOLUME_SPIKE_24H,
            sentiment: ALPHA_SENTIMENT,
            whale_accumulation: ALPHA_WHALE_ACCUMULATION,
            dev_commits: ALPHA_DEV_COMMITS,
            market_cap_growth_7d: ALPHA_MARKET_CAP_GROWTH_7D,
            multiplier_cap: ALPHA_MULTIPLIER_CAP,
        }
    }
}

/// Viral model thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct ViralThresholds {
    pub mention_growth: f64,
    pub search_spike: f64,
    pub network_velocity: f64,
    /// Reported when no signal fires
    pub fallback_hrs: f64,
}

impl Default for ViralThresholds {
    fn default() -> Self {
        Self {
            mention_growth: VIRAL_MENTION_GROWTH,
            search_spike: VIRAL_SEARCH_SPIKE,
            network_velocity: VIRAL_NETWORK_VELOCITY,
            fallback_hrs: VIRAL_FALLBACK_HRS,
        }
    }
}

/// Pattern model thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct PatternThresholds {
    /// Share of large/high-gas transactions that flags a scam pattern
    pub confidence_threshold: f64,
    pub large_value: f64,
    pub medium_value: f64,
    pub high_gas: u64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            confidence_threshold: PATTERN_CONFIDENCE_THRESHOLD,
            large_value: PATTERN_LARGE_VALUE,
            medium_value: PATTERN_MEDIUM_VALUE,
            high_gas: PATTERN_HIGH_GAS,
        }
    }
}

/// Configuration for the scan engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum age of a cached feature bundle
    pub cache_ttl: Duration,
    /// Timeout for a single provider extraction
    pub provider_timeout: Duration,
    /// Tone used when the request does not pick one
    pub default_tone: Tone,
    pub threat: ThreatThresholds,
    pub alpha: AlphaThresholds,
    pub viral: ViralThresholds,
    pub pattern: PatternThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            default_tone: Tone::Clinical,
            threat: ThreatThresholds::default(),
            alpha: AlphaThresholds::default(),
            viral: ViralThresholds::default(),
            pattern: PatternThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `VERMIN_*` environment variables.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(ENV_CACHE_TTL_MS) {
            config.cache_ttl = Duration::from_millis(parse_millis(ENV_CACHE_TTL_MS, &raw)?);
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            let ms = parse_millis(ENV_TIMEOUT_MS, &raw)?;
            if ms == 0 {
                return Err(AppError::config_invalid(ENV_TIMEOUT_MS, &raw));
            }
            config.provider_timeout = Duration::from_millis(ms);
        }
        if let Ok(raw) = std::env::var(ENV_TONE) {
            config.default_tone = raw
                .parse()
                .map_err(|_| AppError::config_invalid(ENV_TONE, &raw))?;
        }

        info!(
            "⚙️ Engine config: cache TTL {}ms, provider timeout {}ms, tone {}",
            config.cache_ttl.as_millis(),
            config.provider_timeout.as_millis(),
            config.default_tone.as_str()
        );
        Ok(config)
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_default_tone(mut self, tone: Tone) -> Self {
        self.default_tone = tone;
        self
    }
}

fn parse_millis(key: &str, raw: &str) -> AppResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::config_invalid(key, raw))
}
