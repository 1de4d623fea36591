//! Threat Model
//!
//! Rule-based risk score. Each rule adds a fixed weight to the score and a
//! share of that weight to confidence; the indicator list names exactly the
//! rules that fired, in the order they were evaluated.
//!
//! Unknown (null) inputs never fire a rule: a missing liquidity figure is not
//! evidence of low liquidity.

use tracing::debug;

use crate::models::config::ThreatThresholds;
use crate::models::features::Features;
use crate::models::types::ThreatResult;
use crate::utils::constants::{
    THREAT_BASE_CONFIDENCE, THREAT_CONFIDENCE_SHARE, THREAT_WEIGHT_BOT, THREAT_WEIGHT_LOW_LIQUIDITY,
    THREAT_WEIGHT_NEW_CONTRACT, THREAT_WEIGHT_WHALE,
};

pub const INDICATOR_LOW_LIQUIDITY: &str = "Extremely low liquidity ratio";
pub const INDICATOR_WHALE: &str = "Top 10% of holders control most of the supply";
pub const INDICATOR_NEW_CONTRACT: &str = "Recently deployed contract";
pub const INDICATOR_BOT: &str = "Bot-like transaction activity";

#[derive(Debug, Clone, Default)]
pub struct ThreatModel {
    thresholds: ThreatThresholds,
}

impl ThreatModel {
    pub fn new(thresholds: ThreatThresholds) -> Self {
        Self { thresholds }
    }

    pub fn predict(&self, features: &Features) -> ThreatResult {
        let t = &self.thresholds;
        let mut score = 0.0;
        let mut confidence = THREAT_BASE_CONFIDENCE;
        let mut indicators = Vec::new();

        let mut fire = |weight: f64, indicator: &str| {
            score += weight;
            confidence += weight * THREAT_CONFIDENCE_SHARE;
            indicators.push(indicator.to_string());
        };

        if features
            .liquidity_ratio
            .is_some_and(|r| r < t.low_liquidity_ratio)
        {
            fire(THREAT_WEIGHT_LOW_LIQUIDITY, INDICATOR_LOW_LIQUIDITY);
        }

        if features.holder_distribution.top10_percent.unwrap_or(0.0) > t.whale_concentration_pct {
            fire(THREAT_WEIGHT_WHALE, INDICATOR_WHALE);
        }

        if features
            .contract_age_sec
            .is_some_and(|age| age < t.new_contract_secs)
        {
            fire(THREAT_WEIGHT_NEW_CONTRACT, INDICATOR_NEW_CONTRACT);
        }

        if features.transaction_patterns.bot_like_activity.unwrap_or(0.0) > t.bot_activity_ratio {
            fire(THREAT_WEIGHT_BOT, INDICATOR_BOT);
        }

        let result = ThreatResult {
            threat_score: score.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            indicators,
        };
        debug!(
            "🛡️ Threat score {:.2} (confidence {:.2}, {} indicators)",
            result.threat_score,
            result.confidence,
            result.indicators.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::features::{HolderDistribution, TransactionPatterns};

    fn risky() -> Features {
        Features {
            liquidity_ratio: Some(0.001),
            holder_distribution: HolderDistribution {
                top10_percent: Some(90.0),
                ..Default::default()
            },
            contract_age_sec: Some(3600),
            transaction_patterns: TransactionPatterns {
                bot_like_activity: Some(0.9),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_no_signal_scores_zero() {
        let result = ThreatModel::default().predict(&Features::default());
        assert_eq!(result.threat_score, 0.0);
        assert_eq!(result.confidence, THREAT_BASE_CONFIDENCE);
        assert!(result.indicators.is_empty());
    }

    #[test]
    fn test_all_rules_fire_and_clamp() {
        let result = ThreatModel::default().predict(&risky());
        assert_eq!(result.threat_score, 1.0);
        assert_eq!(
            result.indicators,
            vec![
                INDICATOR_LOW_LIQUIDITY,
                INDICATOR_WHALE,
                INDICATOR_NEW_CONTRACT,
                INDICATOR_BOT
            ]
        );
        assert!(result.confidence <= 1.0);
        assert!(result.confidence > THREAT_BASE_CONFIDENCE);
    }

    #[test]
    fn test_single_rule() {
        let features = Features {
            contract_age_sec: Some(60),
            liquidity_ratio: Some(0.5),
            ..Default::default()
        };
        let result = ThreatModel::default().predict(&features);
        assert!((result.threat_score - 0.2).abs() < 1e-9);
        assert!((result.confidence - 0.45).abs() < 1e-9);
        assert_eq!(result.indicators, vec![INDICATOR_NEW_CONTRACT]);
    }

    #[test]
    fn test_measured_zero_liquidity_fires() {
        let features = Features {
            liquidity_ratio: Some(0.0),
            ..Default::default()
        };
        let result = ThreatModel::default().predict(&features);
        assert_eq!(result.indicators, vec![INDICATOR_LOW_LIQUIDITY]);
    }

    #[test]
    fn test_threshold_override() {
        let model = ThreatModel::new(ThreatThresholds {
            bot_activity_ratio: 0.95,
            ..Default::default()
        });
        let result = model.predict(&risky());
        assert_eq!(result.indicators.len(), 3);
        assert!(!result.indicators.contains(&INDICATOR_BOT.to_string()));
    }
}
