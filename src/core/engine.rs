//! Scan Engine
//! Orchestrates one scan: validate, resolve features, fan out to the four
//! models, aggregate, summarize and optionally persist.
//!
//! Only feature resolution may suspend; it runs under the configured
//! timeout. The models all read the same `Arc<Features>` snapshot and run as
//! separate tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::core::alpha::AlphaModel;
use crate::core::pattern::PatternModel;
use crate::core::summarizer::{summarize, SummaryInput};
use crate::core::threat::ThreatModel;
use crate::core::viral::ViralModel;
use crate::models::config::EngineConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::features::{FeatureSchema, Features};
use crate::models::types::{
    validate_address, AlphaResult, Analysis, AnalysisMetadata, Network, PatternResult, ScanOptions,
    ScanOutcome, ScanStats, ThreatResult, ViralResult,
};
use crate::providers::features::{FeatureOptions, FeatureProvider};
use crate::providers::persistence::{ScanRecord, ScanStore};
use crate::utils::cache::FeatureCache;
use crate::utils::constants::MODEL_COUNT;

/// Thread-safe statistics
#[derive(Default)]
struct EngineStats {
    total_scans: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    timeouts: AtomicU64,
    cache_hits: AtomicU64,
    persistence_failures: AtomicU64,
    total_latency_ms: AtomicU64,
}

pub struct ScanEngine {
    config: EngineConfig,
    provider: Arc<dyn FeatureProvider>,
    cache: FeatureCache,
    store: Option<Arc<dyn ScanStore>>,
    threat: ThreatModel,
    alpha: AlphaModel,
    viral: ViralModel,
    pattern: PatternModel,
    stats: Arc<EngineStats>,
}

impl ScanEngine {
    /// Engine with its own cache sized by `config.cache_ttl`
    pub fn new(config: EngineConfig, provider: Arc<dyn FeatureProvider>) -> Self {
        let cache = FeatureCache::with_ttl(config.cache_ttl);
        Self {
            threat: ThreatModel::new(config.threat.clone()),
            alpha: AlphaModel::new(config.alpha.clone()),
            viral: ViralModel::new(config.viral.clone()),
            pattern: PatternModel::new(config.pattern.clone()),
            config,
            provider,
            cache,
            store: None,
            stats: Arc::new(EngineStats::default()),
        }
    }

    /// Share an existing cache (e.g. between engines in one process)
    pub fn with_cache(mut self, cache: FeatureCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ScanStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &FeatureCache {
        &self.cache
    }

    /// Run one scan.
    ///
    /// Fails with a validation error (bad address, non-conformant provider
    /// data) or a timeout error (provider too slow). No partial results.
    pub async fn scan(
        &self,
        address: &str,
        network: Network,
        options: ScanOptions,
    ) -> AppResult<ScanOutcome> {
        let start = Instant::now();
        self.stats.total_scans.fetch_add(1, Ordering::Relaxed);

        let result = self.run_scan(address, network, &options, start).await;

        match &result {
            Ok(outcome) => {
                self.stats.completed.fetch_add(1, Ordering::Relaxed);
                self.stats
                    .total_latency_ms
                    .fetch_add(outcome.analysis.metadata.processing_ms, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                if e.is_timeout() {
                    self.stats.timeouts.fetch_add(1, Ordering::Relaxed);
                }
                warn!("❌ Scan failed for {}:{}: {}", network, address, e);
            }
        }

        result
    }

    async fn run_scan(
        &self,
        address: &str,
        network: Network,
        options: &ScanOptions,
        start: Instant,
    ) -> AppResult<ScanOutcome> {
        let address = validate_address(address)?;

        let features = self
            .resolve_features(address, network, &options.feature_options)
            .await?;

        let (threat, alpha, viral, patterns) = self.score(features.clone()).await?;

        let overall_confidence = (threat.confidence + alpha.confidence + viral.confidence) / 3.0;

        let tone = options.tone.unwrap_or(self.config.default_tone);
        let summary = summarize(
            tone,
            &SummaryInput {
                address,
                network,
                threat: &threat,
                alpha: &alpha,
                viral: &viral,
            },
        );

        let analysis = Analysis {
            address: address.to_string(),
            network,
            tone,
            threat,
            alpha,
            viral,
            patterns,
            summary,
            metadata: AnalysisMetadata {
                processing_ms: start.elapsed().as_millis() as u64,
                overall_confidence,
                feature_count: features.key_count(),
                models_used: MODEL_COUNT,
            },
        };

        let persisted_id = self.persist(&analysis, options).await;

        info!(
            "🔍 Scan {}:{} | threat {:.2} | alpha {:.2} | viral {:.2} | patterns {:.2} | {}ms",
            network,
            address,
            analysis.threat.threat_score,
            analysis.alpha.alpha_score,
            analysis.viral.viral_score,
            analysis.patterns.risk_level,
            analysis.metadata.processing_ms
        );

        Ok(ScanOutcome {
            analysis,
            persisted_id,
        })
    }

    /// Cache first, then the provider under timeout. Provider output is
    /// validated before it is cached or scored.
    async fn resolve_features(
        &self,
        address: &str,
        network: Network,
        options: &FeatureOptions,
    ) -> AppResult<Arc<Features>> {
        if let Some(features) = self.cache.get(network, address) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(features);
        }

        let timeout = self.config.provider_timeout;
        let extraction = self.provider.extract(address, network, options);
        let features = match tokio::time::timeout(timeout, extraction).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "⏱️ Provider '{}' timed out after {}ms for {}:{}",
                    self.provider.name(),
                    timeout.as_millis(),
                    network,
                    address
                );
                return Err(AppError::timeout(timeout.as_millis() as u64));
            }
        };

        FeatureSchema::validate(&features)?;

        let features = Arc::new(features);
        self.cache.insert(network, address, features.clone());
        Ok(features)
    }

    /// Fan out to the four models over one immutable snapshot
    async fn score(
        &self,
        features: Arc<Features>,
    ) -> AppResult<(ThreatResult, AlphaResult, ViralResult, PatternResult)> {
        let threat = {
            let model = self.threat.clone();
            let features = features.clone();
            tokio::spawn(async move { model.predict(&features) })
        };
        let alpha = {
            let model = self.alpha.clone();
            let features = features.clone();
            tokio::spawn(async move { model.predict(&features) })
        };
        let viral = {
            let model = self.viral.clone();
            let features = features.clone();
            tokio::spawn(async move { model.predict(&features) })
        };
        let pattern = {
            let model = self.pattern.clone();
            tokio::spawn(async move { model.analyze(&features.transactions) })
        };

        Ok(tokio::try_join!(threat, alpha, viral, pattern)?)
    }

    /// Best effort: a failing store is logged and the scan still succeeds
    async fn persist(&self, analysis: &Analysis, options: &ScanOptions) -> Option<String> {
        let store = self.store.as_ref()?;
        let record = ScanRecord {
            address: &analysis.address,
            network: analysis.network,
            analysis,
            visibility: options.visibility,
            scanned_by: options.scanned_by.as_deref(),
        };

        match store.save_scan(record).await {
            Ok(id) => id,
            Err(e) => {
                self.stats.persistence_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "⚠️ Persisting scan {}:{} failed: {}",
                    analysis.network, analysis.address, e
                );
                None
            }
        }
    }

    /// Get current statistics
    pub fn stats(&self) -> ScanStats {
        let completed = self.stats.completed.load(Ordering::Relaxed);
        let total_latency = self.stats.total_latency_ms.load(Ordering::Relaxed);

        ScanStats {
            total_scans: self.stats.total_scans.load(Ordering::Relaxed),
            completed,
            failed: self.stats.failed.load(Ordering::Relaxed),
            timeouts: self.stats.timeouts.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            persistence_failures: self.stats.persistence_failures.load(Ordering::Relaxed),
            avg_latency_ms: if completed > 0 {
                total_latency as f64 / completed as f64
            } else {
                0.0
            },
        }
    }
}
