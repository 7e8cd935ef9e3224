//! Application context: extractors, diff engine and snapshot store wired
//! from one [`Config`].

use crate::config::Config;
use crate::error::CoreResult;
use docsnap_diff::{DiffEngine, ExtractorRegistry};
use docsnap_snapshot::SnapshotStore;
use docsnap_util::log::{LogConfig, LogLevel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Everything a front end needs to work with snapshots.
pub struct Context {
    config: Config,
    data_dir: PathBuf,
    store: SnapshotStore,
}

impl Context {
    /// Open with the default extractors (txt, md, markdown, docjson).
    pub async fn open(config: Config) -> CoreResult<Self> {
        Self::with_registry(config, ExtractorRegistry::with_defaults()).await
    }

    /// Open with a caller-provided extractor registry.
    pub async fn with_registry(config: Config, registry: ExtractorRegistry) -> CoreResult<Self> {
        let data_dir = config.resolved_data_dir()?;
        let engine = Arc::new(DiffEngine::new(Arc::new(registry), config.diff_config()));
        let store = SnapshotStore::open(&data_dir, engine, config.snapshot_config()).await?;

        debug!(
            data_dir = %data_dir.display(),
            extensions = ?store.registry().extensions(),
            "Opened context"
        );
        Ok(Self {
            config,
            data_dir,
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn engine(&self) -> &Arc<DiffEngine> {
        self.store.engine()
    }
}

impl Config {
    /// Logging setup for this config; `verbose` forces printing at debug level.
    pub fn log_config(&self, verbose: bool) -> LogConfig {
        let configured = self.log_level.map(LogLevel::from);
        LogConfig {
            print: verbose || configured.is_some(),
            level: if verbose {
                LogLevel::Debug
            } else {
                configured.unwrap_or(LogLevel::Warn)
            },
            include_location: false,
        }
    }
}
