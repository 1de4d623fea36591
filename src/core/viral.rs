//! Viral-Potential Model
//!
//! Each social trigger adds to the viral score and tightens the
//! time-to-viral estimate. The estimate only ever moves down; when nothing
//! fires the configured fallback is reported instead of infinity.

use tracing::debug;

use crate::models::config::ViralThresholds;
use crate::models::features::Features;
use crate::models::types::ViralResult;

const MENTION_SCORE: f64 = 0.4;
const INFLUENCER_SCORE: f64 = 0.3;
const SEARCH_SCORE: f64 = 0.2;
const NETWORK_SCORE: f64 = 0.1;

const MENTION_BASE_HRS: f64 = 72.0;
const MENTION_FLOOR_HRS: f64 = 6.0;
const INFLUENCER_HRS: f64 = 48.0;
const SEARCH_HRS: f64 = 24.0;
const NETWORK_HRS: f64 = 12.0;

const CONF_MENTION: f64 = 0.5;
const CONF_INFLUENCER: f64 = 0.3;
const CONF_SEARCH: f64 = 0.2;

#[derive(Debug, Clone, Default)]
pub struct ViralModel {
    thresholds: ViralThresholds,
}

impl ViralModel {
    pub fn new(thresholds: ViralThresholds) -> Self {
        Self { thresholds }
    }

    pub fn predict(&self, features: &Features) -> ViralResult {
        let t = &self.thresholds;
        let social = &features.social_signals;
        let mut score = 0.0;
        let mut hours = f64::INFINITY;
        let mut signals = Vec::new();

        let growth = social.mention_growth.unwrap_or(0.0);
        let mention_hit = growth > t.mention_growth;
        if mention_hit {
            score += MENTION_SCORE;
            hours = hours.min((MENTION_BASE_HRS - growth * 2.0).max(MENTION_FLOOR_HRS));
            signals.push(format!("Mentions growing {:.1}x", growth));
        }

        let influencers = social.big_follower_mentions.unwrap_or(0);
        let influencer_hit = influencers > 0;
        if influencer_hit {
            score += INFLUENCER_SCORE;
            hours = hours.min(INFLUENCER_HRS);
            signals.push(format!("{} large-account mentions", influencers));
        }

        let spike = social.search_trend_spike.unwrap_or(0.0);
        let search_hit = spike > t.search_spike;
        if search_hit {
            score += SEARCH_SCORE;
            hours = hours.min(SEARCH_HRS);
            signals.push(format!("Search interest up {:.1}x", spike));
        }

        let velocity = social.network_effect_velocity.unwrap_or(0.0);
        if velocity > t.network_velocity {
            score += NETWORK_SCORE;
            hours = hours.min(NETWORK_HRS);
            signals.push(format!("Network effect velocity {:.2}", velocity));
        }

        let confidence = CONF_MENTION * f64::from(u8::from(mention_hit))
            + CONF_INFLUENCER * f64::from(u8::from(influencer_hit))
            + CONF_SEARCH * f64::from(u8::from(search_hit));

        let result = ViralResult {
            viral_score: score.clamp(0.0, 1.0),
            time_to_viral_hrs: if hours.is_finite() { hours } else { t.fallback_hrs },
            confidence: confidence.clamp(0.0, 1.0),
            signals,
        };
        debug!(
            "📣 Viral score {:.2} (~{:.0}h, confidence {:.2}, {} signals)",
            result.viral_score,
            result.time_to_viral_hrs,
            result.confidence,
            result.signals.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::features::SocialSignals;

    fn social(signals: SocialSignals) -> Features {
        Features {
            social_signals: signals,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_signal_uses_fallback() {
        let result = ViralModel::default().predict(&Features::default());
        assert_eq!(result.viral_score, 0.0);
        assert_eq!(result.time_to_viral_hrs, 72.0);
        assert!(result.time_to_viral_hrs.is_finite());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_mention_growth_time_bound() {
        let result = ViralModel::default().predict(&social(SocialSignals {
            mention_growth: Some(10.0),
            ..Default::default()
        }));
        assert!((result.viral_score - 0.4).abs() < 1e-9);
        assert_eq!(result.time_to_viral_hrs, 52.0);
        assert!((result.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_mention_growth_floor() {
        let result = ViralModel::default().predict(&social(SocialSignals {
            mention_growth: Some(100.0),
            ..Default::default()
        }));
        assert_eq!(result.time_to_viral_hrs, 6.0);
    }

    #[test]
    fn test_all_triggers_take_minimum() {
        let result = ViralModel::default().predict(&social(SocialSignals {
            mention_growth: Some(6.0),
            big_follower_mentions: Some(3),
            search_trend_spike: Some(4.0),
            network_effect_velocity: Some(0.9),
            ..Default::default()
        }));
        assert!((result.viral_score - 1.0).abs() < 1e-9);
        assert_eq!(result.time_to_viral_hrs, 12.0);
        assert!((result.confidence - 1.0).abs() < 1e-9);
        assert_eq!(result.signals.len(), 4);
    }

    #[test]
    fn test_influencer_only() {
        let result = ViralModel::default().predict(&social(SocialSignals {
            big_follower_mentions: Some(1),
            ..Default::default()
        }));
        assert_eq!(result.time_to_viral_hrs, 48.0);
        assert!((result.confidence - 0.3).abs() < 1e-9);
    }
}
