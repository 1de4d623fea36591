//! Feature Providers
//!
//! The engine pulls feature bundles through [`FeatureProvider`]. A host
//! plugs in its indexing service here; absent one, [`SeededFeatureProvider`]
//! derives a reproducible bundle from a SHA-256 digest of the address.
//!
//! Whatever a provider returns is re-validated by the engine.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

use crate::models::errors::AppResult;
use crate::models::features::{
    CrossChainActivity, DeveloperActivity, Features, HolderDistribution, SocialSignals,
    Transaction, TransactionPatterns, VolumeSpike, WhaleActivity,
};
use crate::models::types::Network;
use crate::utils::cache::FeatureCache;

/// Opaque per-request hints for a provider
pub type FeatureOptions = HashMap<String, Value>;

/// Source of feature bundles.
///
/// Implementations may suspend on network I/O. The engine drops the returned
/// future when its timeout fires, which is the cancellation signal; an
/// implementation must not rely on running to completion.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    async fn extract(
        &self,
        address: &str,
        network: Network,
        options: &FeatureOptions,
    ) -> AppResult<Features>;

    /// Short name for logs
    fn name(&self) -> &'static str {
        "provider"
    }
}

/// Option key overriding how many synthetic transactions are generated
pub const OPT_TRANSACTION_COUNT: &str = "transactionCount";

const MAX_SYNTHETIC_TRANSACTIONS: u64 = 500;
/// Fixed epoch so generated timestamps never depend on the wall clock
const SYNTHETIC_EPOCH: u64 = 1_700_000_000;

/// Deterministic stand-in for a real indexer.
///
/// The same `(network, address)` always yields the same bundle. EVM
/// addresses are normalized the same way the cache normalizes them.
#[derive(Debug, Clone, Default)]
pub struct SeededFeatureProvider;

impl SeededFeatureProvider {
    pub fn new() -> Self {
        Self
    }

    /// 32-byte generator seed for an address
    pub fn seed(network: Network, address: &str) -> [u8; 32] {
        let digest = Sha256::digest(FeatureCache::key(network, address).as_bytes());
        digest.into()
    }

    pub fn generate(&self, network: Network, address: &str, options: &FeatureOptions) -> Features {
        let seed = Self::seed(network, address);
        let mut rng = StdRng::from_seed(seed);

        let top1 = rng.gen_range(1.0..40.0);
        let bot_like: f64 = rng.gen();
        let accumulation: f64 = rng.gen();

        let mut features = Features {
            // Cubed so very low liquidity stays rare
            liquidity_ratio: Some(rng.gen::<f64>().powi(3) * 0.5),
            holder_distribution: HolderDistribution {
                top1_percent: Some(top1),
                top10_percent: Some((top1 + rng.gen_range(10.0..60.0)).min(100.0)),
                unique_holders: Some(rng.gen_range(10..50_000)),
            },
            contract_age_sec: Some(rng.gen_range(600..31_536_000)),
            transaction_patterns: TransactionPatterns {
                bot_like_activity: Some(bot_like),
                human_like_activity: Some(1.0 - bot_like),
                suspicious_transfers: Some(rng.gen_range(0..25)),
            },
            cross_chain_activity: CrossChainActivity {
                bridged: Some(rng.gen_bool(0.3)),
                active_chains: Some(rng.gen_range(1..6)),
            },
            volume_spike: VolumeSpike {
                ratio_24h: Some(rng.gen_range(0.1..15.0)),
                ratio_7d: Some(rng.gen_range(0.5..5.0)),
            },
            social_sentiment: Some(rng.gen_range(-1.0..=1.0)),
            social_signals: SocialSignals {
                mentions_24h: Some(rng.gen_range(0..5_000)),
                mention_growth: Some(rng.gen_range(0.0..8.0)),
                big_follower_mentions: Some(if rng.gen_bool(0.25) { rng.gen_range(1..5) } else { 0 }),
                search_trend_spike: Some(rng.gen_range(0.0..5.0)),
                network_effect_velocity: Some(rng.gen()),
                meme_score: Some(rng.gen()),
            },
            whale_activity: WhaleActivity {
                accumulation_ratio: Some(accumulation),
                selling_ratio: Some((1.0 - accumulation) * rng.gen::<f64>()),
            },
            developer_activity: DeveloperActivity {
                commits_30d: Some(rng.gen_range(0..120)),
                contributors: Some(rng.gen_range(1..30)),
            },
            market_cap_growth_7d: Some(rng.gen_range(0.2..4.0)),
            transactions: Vec::new(),
        };

        let count = options
            .get(OPT_TRANSACTION_COUNT)
            .and_then(Value::as_u64)
            .map(|n| n.min(MAX_SYNTHETIC_TRANSACTIONS))
            .unwrap_or_else(|| rng.gen_range(5..=20));

        features.transactions = (0..count)
            .map(|i| synthetic_transaction(&mut rng, &seed, i))
            .collect();

        features
    }
}

fn random_address(rng: &mut StdRng) -> String {
    let bytes: [u8; 20] = rng.gen();
    format!("0x{}", hex::encode(bytes))
}

fn synthetic_transaction(rng: &mut StdRng, seed: &[u8; 32], index: u64) -> Transaction {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(index.to_be_bytes());
    let hash = format!("0x{}", hex::encode(hasher.finalize()));

    // Mostly small transfers with an occasional whale-sized one
    let value = if rng.gen_bool(0.15) {
        rng.gen_range(1_000_000.0..5_000_000.0)
    } else {
        rng.gen_range(0.0..50_000.0)
    };

    Transaction {
        hash,
        from: random_address(rng),
        to: random_address(rng),
        value,
        timestamp: SYNTHETIC_EPOCH + index * 60 + rng.gen_range(0..60),
        gas_used: rng.gen_range(21_000..250_000),
    }
}

#[async_trait]
impl FeatureProvider for SeededFeatureProvider {
    async fn extract(
        &self,
        address: &str,
        network: Network,
        options: &FeatureOptions,
    ) -> AppResult<Features> {
        debug!("🎲 Generating seeded features for {}:{}", network, address);
        Ok(self.generate(network, address, options))
    }

    fn name(&self) -> &'static str {
        "seeded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::features::FeatureSchema;

    const ADDR: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    #[test]
    fn test_same_address_same_bundle() {
        let provider = SeededFeatureProvider::new();
        let a = provider.generate(Network::Ethereum, ADDR, &FeatureOptions::new());
        let b = provider.generate(Network::Ethereum, ADDR, &FeatureOptions::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_evm_case_does_not_change_bundle() {
        let provider = SeededFeatureProvider::new();
        let a = provider.generate(Network::Ethereum, ADDR, &FeatureOptions::new());
        let b = provider.generate(Network::Ethereum, &ADDR.to_lowercase(), &FeatureOptions::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_network_changes_bundle() {
        let provider = SeededFeatureProvider::new();
        let a = provider.generate(Network::Ethereum, ADDR, &FeatureOptions::new());
        let b = provider.generate(Network::Base, ADDR, &FeatureOptions::new());
        assert_ne!(a, b);
    }

    #[test]
    fn test_generated_bundles_pass_schema() {
        let provider = SeededFeatureProvider::new();
        for i in 0..50 {
            let address = format!("So1111111111111111111111111111111111111{:04}", i);
            let features = provider.generate(Network::Solana, &address, &FeatureOptions::new());
            assert!(FeatureSchema::validate(&features).is_ok(), "{}", address);
            assert!((5..=20).contains(&features.transactions.len()));
        }
    }

    #[test]
    fn test_transaction_count_option() {
        let provider = SeededFeatureProvider::new();
        let mut options = FeatureOptions::new();
        options.insert(OPT_TRANSACTION_COUNT.to_string(), Value::from(3));
        let features = provider.generate(Network::Ethereum, ADDR, &options);
        assert_eq!(features.transactions.len(), 3);
        assert!(features.transactions[0].hash.starts_with("0x"));
        assert_eq!(features.transactions[0].hash.len(), 66);
    }

    #[tokio::test]
    async fn test_extract_is_deterministic() {
        let provider = SeededFeatureProvider::new();
        let a = provider.extract(ADDR, Network::Ethereum, &FeatureOptions::new()).await.unwrap();
        let b = provider.generate(Network::Ethereum, ADDR, &FeatureOptions::new());
        assert_eq!(a, b);
        assert_eq!(provider.name(), "seeded");
    }
}
