//! Pattern-Recognition Model
//!
//! Buckets each transaction by value and gas, then measures how much of the
//! history sits in the large/high-gas bucket. A history dominated by that
//! bucket matches the known scam pattern.
//!
//! Novel-pattern detection has no defined algorithm yet and always reports
//! an empty list.

use std::collections::BTreeMap;
use tracing::debug;

use crate::models::config::PatternThresholds;
use crate::models::features::Transaction;
use crate::models::types::{PatternMatch, PatternResult};
use crate::utils::constants::{PATTERN_SCAM_BUCKET, PATTERN_SCAM_LABEL};

const KNOWN_PATTERN_WEIGHT: f64 = 0.3;
const NOVEL_PATTERN_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct PatternModel {
    thresholds: PatternThresholds,
}

impl PatternModel {
    pub fn new(thresholds: PatternThresholds) -> Self {
        Self { thresholds }
    }

    /// Coarse `{small,medium,large}_{normal,high}_gas` bucket for one transaction
    pub fn classify(&self, tx: &Transaction) -> String {
        let size = if tx.value > self.thresholds.large_value {
            "large"
        } else if tx.value > self.thresholds.medium_value {
            "medium"
        } else {
            "small"
        };
        let gas = if tx.gas_used > self.thresholds.high_gas {
            "high_gas"
        } else {
            "normal_gas"
        };
        format!("{}_{}", size, gas)
    }

    pub fn analyze(&self, transactions: &[Transaction]) -> PatternResult {
        let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
        for tx in transactions {
            *buckets.entry(self.classify(tx)).or_insert(0) += 1;
        }

        let similarity = if transactions.is_empty() {
            0.0
        } else {
            let hits = buckets.get(PATTERN_SCAM_BUCKET).copied().unwrap_or(0);
            hits as f64 / transactions.len() as f64
        };

        let mut known_patterns = Vec::new();
        if similarity > self.thresholds.confidence_threshold {
            known_patterns.push(PatternMatch {
                pattern: PATTERN_SCAM_LABEL.to_string(),
                similarity,
            });
        }
        let novel_patterns: Vec<String> = Vec::new();

        let risk_level = (known_patterns.len() as f64 * KNOWN_PATTERN_WEIGHT
            + novel_patterns.len() as f64 * NOVEL_PATTERN_WEIGHT)
            .clamp(0.0, 1.0);

        let result = PatternResult {
            known_patterns,
            novel_patterns,
            similarity,
            buckets,
            risk_level,
        };
        debug!(
            "🧬 Pattern risk {:.2} (similarity {:.2}, {} known, {} transactions)",
            result.risk_level,
            result.similarity,
            result.known_patterns.len(),
            transactions.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(value: f64, gas_used: u64) -> Transaction {
        Transaction {
            hash: format!("0x{:x}", gas_used),
            from: "from".to_string(),
            to: "to".to_string(),
            value,
            timestamp: 1_700_000_000,
            gas_used,
        }
    }

    #[test]
    fn test_classify() {
        let model = PatternModel::default();
        assert_eq!(model.classify(&tx(2_000_000.0, 200_000)), "large_high_gas");
        assert_eq!(model.classify(&tx(5_000.0, 21_000)), "medium_normal_gas");
        assert_eq!(model.classify(&tx(1_000.0, 100_000)), "small_normal_gas");
        assert_eq!(model.classify(&tx(1.0, 100_001)), "small_high_gas");
    }

    #[test]
    fn test_empty_history() {
        let result = PatternModel::default().analyze(&[]);
        assert_eq!(result.similarity, 0.0);
        assert_eq!(result.risk_level, 0.0);
        assert!(!result.risk_level.is_nan());
        assert!(result.known_patterns.is_empty());
        assert!(result.buckets.is_empty());
    }

    #[test]
    fn test_all_large_high_gas_matches_scam() {
        let history: Vec<_> = (0..10).map(|i| tx(2_000_000.0 + i as f64, 150_000)).collect();
        let result = PatternModel::default().analyze(&history);
        assert_eq!(result.similarity, 1.0);
        assert_eq!(result.known_patterns.len(), 1);
        assert_eq!(result.known_patterns[0].pattern, "scam_pattern");
        assert!((result.risk_level - 0.3).abs() < 1e-9);
        assert_eq!(result.buckets.get("large_high_gas"), Some(&10));
    }

    #[test]
    fn test_mixed_history_below_threshold() {
        let mut history: Vec<_> = (0..8).map(|_| tx(2_000_000.0, 150_000)).collect();
        history.push(tx(10.0, 21_000));
        history.push(tx(10.0, 21_000));
        let result = PatternModel::default().analyze(&history);
        assert!((result.similarity - 0.8).abs() < 1e-9);
        assert!(result.known_patterns.is_empty());
        assert!(result.novel_patterns.is_empty());
        assert_eq!(result.risk_level, 0.0);
    }
}
