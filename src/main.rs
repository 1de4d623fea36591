//! VerminScan - one-shot scan from the command line
//!
//! Usage: `vermin_scan <address> [network] [tone]`
//!
//! Runs a scan with the seeded feature provider and the in-memory store and
//! prints the outcome as pretty JSON on stdout. Logs go to stderr.

use vermin_scan::{
    EngineConfig, MemoryScanStore, Network, ScanEngine, ScanOptions, SeededFeatureProvider, Tone,
    Visibility,
};
use vermin_scan::utils::constants::{APP_NAME, APP_VERSION};

use eyre::{bail, Result};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const USAGE: &str = "usage: vermin_scan <address> [network] [clinical|vermin]";

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG wins over the INFO default
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut args = std::env::args().skip(1);
    let Some(address) = args.next() else {
        bail!(USAGE);
    };
    let network = match args.next() {
        Some(raw) => Network::parse(&raw)?,
        None => Network::Ethereum,
    };
    let tone = args.next().map(|raw| raw.parse::<Tone>()).transpose()?;

    let config = EngineConfig::from_env()?;
    info!(
        "🐀 {} v{} | TTL {}ms | timeout {}ms | tone {}",
        APP_NAME,
        APP_VERSION,
        config.cache_ttl.as_millis(),
        config.provider_timeout.as_millis(),
        tone.unwrap_or(config.default_tone).as_str()
    );

    let store = Arc::new(MemoryScanStore::new());
    let engine = ScanEngine::new(config, Arc::new(SeededFeatureProvider::new()))
        .with_store(store.clone());

    let mut options = ScanOptions::default().with_visibility(Visibility::Private);
    if let Some(tone) = tone {
        options = options.with_tone(tone);
    }

    let outcome = match engine.scan(&address, network, options).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("❌ {} (HTTP {})", e, e.code.http_status());
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    let stats = engine.stats();
    info!(
        "📊 Scans: {} | cache hits: {} | stored: {} | avg {:.1}ms",
        stats.total_scans,
        stats.cache_hits,
        store.len(),
        stats.avg_latency_ms
    );

    Ok(())
}
