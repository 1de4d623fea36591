//! Alpha (opportunity) Model
//!
//! Five independent triggers each add to the alpha score and compound the
//! potential multiplier. The multiplier is capped no matter how many
//! triggers compound.

use tracing::debug;

use crate::models::config::AlphaThresholds;
use crate::models::features::Features;
use crate::models::types::AlphaResult;

// Trigger weights: (score increment, multiplier factor)
const VOLUME: (f64, f64) = (0.3, 2.0);
const SENTIMENT: (f64, f64) = (0.25, 1.5);
const WHALE: (f64, f64) = (0.2, 3.0);
const DEVELOPER: (f64, f64) = (0.15, 1.2);
const MARKET_CAP_SCORE: f64 = 0.1;

// Confidence weights for the headline triggers
const CONF_VOLUME: f64 = 0.4;
const CONF_SENTIMENT: f64 = 0.35;
const CONF_WHALE: f64 = 0.25;

#[derive(Debug, Clone, Default)]
pub struct AlphaModel {
    thresholds: AlphaThresholds,
}

impl AlphaModel {
    pub fn new(thresholds: AlphaThresholds) -> Self {
        Self { thresholds }
    }

    pub fn predict(&self, features: &Features) -> AlphaResult {
        let t = &self.thresholds;
        let mut score = 0.0;
        let mut multiplier = 1.0_f64;
        let mut catalysts = Vec::new();

        let volume = features.volume_spike.ratio_24h.unwrap_or(0.0);
        let volume_hit = volume > t.volume_spike_24h;
        if volume_hit {
            score += VOLUME.0;
            multiplier *= VOLUME.1;
            catalysts.push(format!("Volume spike of {:.1}x in 24h", volume));
        }

        let sentiment = features.social_sentiment.unwrap_or(0.0);
        let sentiment_hit = sentiment > t.sentiment;
        if sentiment_hit {
            score += SENTIMENT.0;
            multiplier *= SENTIMENT.1;
            catalysts.push(format!("Strongly positive sentiment ({:.2})", sentiment));
        }

        let accumulation = features.whale_activity.accumulation_ratio.unwrap_or(0.0);
        let whale_hit = accumulation > t.whale_accumulation;
        if whale_hit {
            score += WHALE.0;
            multiplier *= WHALE.1;
            catalysts.push(format!("Whales accumulating ({:.0}% of flow)", accumulation * 100.0));
        }

        let commits = features.developer_activity.commits_30d.unwrap_or(0);
        if commits > t.dev_commits {
            score += DEVELOPER.0;
            multiplier *= DEVELOPER.1;
            catalysts.push(format!("Active development ({} commits)", commits));
        }

        let growth = features.market_cap_growth_7d.unwrap_or(0.0);
        if growth > t.market_cap_growth_7d {
            score += MARKET_CAP_SCORE;
            multiplier *= growth.max(1.0);
            catalysts.push(format!("Market cap up {:.1}x over 7 days", growth));
        }

        let confidence = CONF_VOLUME * f64::from(u8::from(volume_hit))
            + CONF_SENTIMENT * f64::from(u8::from(sentiment_hit))
            + CONF_WHALE * f64::from(u8::from(whale_hit));

        let result = AlphaResult {
            alpha_score: score.clamp(0.0, 1.0),
            potential_multiplier: multiplier.min(t.multiplier_cap),
            confidence: confidence.clamp(0.0, 1.0),
            catalysts,
        };
        debug!(
            "🧀 Alpha score {:.2} (multiplier {:.2}x, confidence {:.2}, {} catalysts)",
            result.alpha_score,
            result.potential_multiplier,
            result.confidence,
            result.catalysts.len()
        );
        result
    }
}
