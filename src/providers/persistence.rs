//! Persistence Port
//!
//! Optional sink for completed scans. The engine hands over a borrowed
//! record and keeps nothing afterwards; storage is the host's business.
//! [`MemoryScanStore`] is a process-local implementation for tools and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::errors::AppResult;
use crate::models::types::{Analysis, Network, Visibility};

/// A completed scan plus its calling context
#[derive(Debug, Clone, Copy)]
pub struct ScanRecord<'a> {
    pub address: &'a str,
    pub network: Network,
    pub analysis: &'a Analysis,
    pub visibility: Option<Visibility>,
    pub scanned_by: Option<&'a str>,
}

#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Persist a scan, optionally returning the id it was stored under
    async fn save_scan(&self, record: ScanRecord<'_>) -> AppResult<Option<String>>;
}

/// Owned copy of a persisted scan
#[derive(Debug, Clone)]
pub struct StoredScan {
    pub id: String,
    pub address: String,
    pub network: Network,
    pub analysis: Analysis,
    pub visibility: Visibility,
    pub scanned_by: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct MemoryScanStore {
    scans: Arc<DashMap<String, StoredScan>>,
}

impl MemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<StoredScan> {
        self.scans.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Public scans, newest first
    pub fn public_scans(&self) -> Vec<StoredScan> {
        let mut scans: Vec<StoredScan> = self
            .scans
            .iter()
            .filter(|entry| entry.visibility == Visibility::Public)
            .map(|entry| entry.value().clone())
            .collect();
        scans.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        scans
    }
}

#[async_trait]
impl ScanStore for MemoryScanStore {
    async fn save_scan(&self, record: ScanRecord<'_>) -> AppResult<Option<String>> {
        let id = Uuid::new_v4().to_string();
        let stored = StoredScan {
            id: id.clone(),
            address: record.address.to_string(),
            network: record.network,
            analysis: record.analysis.clone(),
            visibility: record.visibility.unwrap_or_default(),
            scanned_by: record.scanned_by.map(str::to_string),
            saved_at: Utc::now(),
        };
        self.scans.insert(id.clone(), stored);
        info!("🗄️ Scan stored: {} ({}:{})", id, record.network, record.address);
        Ok(Some(id))
    }
}
