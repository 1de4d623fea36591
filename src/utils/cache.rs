//! Feature Cache
//!
//! Short-lived memoization of feature bundles keyed by `network:address`.
//! Backed by DashMap so concurrent scans never contend on a global lock.
//!
//! - One entry per key; a refresh replaces the entry, never merges
//! - An entry is served only while its age is strictly below the TTL
//! - EVM addresses are lowercased, Solana (base58) addresses kept verbatim
//! - No eviction beyond TTL; long-lived hosts call `cleanup_expired`

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::models::features::Features;
use crate::models::types::Network;
use crate::utils::constants::DEFAULT_CACHE_TTL_MS;

/// Cached bundle with its creation time
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub features: Arc<Features>,
    pub created_at: Instant,
}

impl CacheEntry {
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

#[derive(Clone)]
pub struct FeatureCache {
    store: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Default for FeatureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureCache {
    /// Cache with the default TTL (30s)
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_millis(DEFAULT_CACHE_TTL_MS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `network:address`, lowercasing hex addresses
    pub fn key(network: Network, address: &str) -> String {
        if network.is_evm() {
            format!("{}:{}", network, address.to_lowercase())
        } else {
            format!("{}:{}", network, address)
        }
    }

    /// Returns the bundle on a fresh HIT, `None` on MISS or expiry
    pub fn get(&self, network: Network, address: &str) -> Option<Arc<Features>> {
        let key = Self::key(network, address);

        // Read lock is released at the end of the closure
        let fresh = self.store.get(&key).and_then(|entry| {
            (!entry.is_expired(self.ttl))
                .then(|| (entry.features.clone(), entry.created_at.elapsed()))
        });

        if let Some((features, age)) = fresh {
            self.hits.fetch_add(1, Ordering::Relaxed);
            info!("✅ CACHE HIT: {} (age: {}ms)", key, age.as_millis());
            return Some(features);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Expiry is re-checked under the write lock so a concurrent refresh survives
        let ttl = self.ttl;
        if self
            .store
            .remove_if(&key, |_, entry| entry.is_expired(ttl))
            .is_some()
        {
            debug!("📭 CACHE MISS (expired): {}", key);
        } else {
            debug!("📭 CACHE MISS: {}", key);
        }
        None
    }

    /// Store a bundle, replacing any previous entry for the key
    pub fn insert(&self, network: Network, address: &str, features: Arc<Features>) {
        let key = Self::key(network, address);
        let entry = CacheEntry {
            features,
            created_at: Instant::now(),
        };
        self.store.insert(key.clone(), entry);
        info!("💾 CACHE SET: {} (TTL: {}ms)", key, self.ttl.as_millis());
    }

    pub fn invalidate(&self, network: Network, address: &str) {
        let key = Self::key(network, address);
        self.store.remove(&key);
        debug!("🗑️ CACHE INVALIDATE: {}", key);
    }

    /// Drop every expired entry, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        let ttl = self.ttl;
        self.store.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            info!("🧹 CACHE CLEANUP: {} expired entries removed", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_ms: self.ttl.as_millis() as u64,
        }
    }

    pub fn clear(&self) {
        self.store.clear();
        info!("🗑️ CACHE CLEARED");
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVM: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
    const SOL: &str = "So11111111111111111111111111111111111111112";

    fn bundle(liquidity: f64) -> Arc<Features> {
        Arc::new(Features {
            liquidity_ratio: Some(liquidity),
            ..Default::default()
        })
    }

    #[test]
    fn test_cache_set_get() {
        let cache = FeatureCache::new();
        cache.insert(Network::Ethereum, EVM, bundle(0.5));
        let hit = cache.get(Network::Ethereum, EVM).unwrap();
        assert_eq!(hit.liquidity_ratio, Some(0.5));
    }

    #[test]
    fn test_keys_are_per_network() {
        let cache = FeatureCache::new();
        cache.insert(Network::Ethereum, EVM, bundle(0.5));
        assert!(cache.get(Network::Base, EVM).is_none());
    }

    #[test]
    fn test_evm_address_normalization() {
        let cache = FeatureCache::new();
        cache.insert(Network::Ethereum, &EVM.to_uppercase().replacen("0X", "0x", 1), bundle(0.1));
        assert!(cache.get(Network::Ethereum, &EVM.to_lowercase()).is_some());
    }

    #[test]
    fn test_solana_address_is_case_sensitive() {
        let cache = FeatureCache::new();
        cache.insert(Network::Solana, SOL, bundle(0.1));
        assert!(cache.get(Network::Solana, SOL).is_some());
        assert!(cache.get(Network::Solana, &SOL.to_lowercase()).is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let cache = FeatureCache::new();
        cache.insert(Network::Solana, SOL, bundle(0.1));
        cache.insert(Network::Solana, SOL, bundle(0.9));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(Network::Solana, SOL).unwrap().liquidity_ratio, Some(0.9));
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = FeatureCache::with_ttl(Duration::ZERO);
        cache.insert(Network::Solana, SOL, bundle(0.1));
        assert!(cache.get(Network::Solana, SOL).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_miss_keeps_refreshed_entry() {
        let cache = FeatureCache::with_ttl(Duration::from_millis(30));
        cache.insert(Network::Solana, SOL, bundle(0.1));
        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get(Network::Solana, SOL).is_none());
        assert!(cache.is_empty());

        // A refresh after the expired lookup is served, and a miss on a
        // fresh entry never evicts it
        cache.insert(Network::Solana, SOL, bundle(0.7));
        assert!(cache.get(Network::Ethereum, EVM).is_none());
        assert_eq!(cache.get(Network::Solana, SOL).unwrap().liquidity_ratio, Some(0.7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_refresh_and_lookup() {
        let cache = FeatureCache::with_ttl(Duration::from_secs(60));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        cache.insert(Network::Solana, SOL, bundle(i as f64 / 10.0));
                        assert!(cache.get(Network::Solana, SOL).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().hits, 1_600);
    }

    #[test]
    fn test_cleanup_expired() {
        let cache = FeatureCache::with_ttl(Duration::ZERO);
        cache.insert(Network::Solana, SOL, bundle(0.1));
        cache.insert(Network::Ethereum, EVM, bundle(0.1));
        assert_eq!(cache.cleanup_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = FeatureCache::new();
        cache.insert(Network::Solana, SOL, bundle(0.1));
        cache.insert(Network::Ethereum, EVM, bundle(0.1));
        cache.invalidate(Network::Solana, SOL);
        assert!(cache.get(Network::Solana, SOL).is_none());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_stats() {
        let cache = FeatureCache::new();
        cache.insert(Network::Solana, SOL, bundle(0.1));
        cache.get(Network::Solana, SOL); // HIT
        cache.get(Network::Ethereum, EVM); // MISS

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.ttl_ms, 30_000);
    }
}
