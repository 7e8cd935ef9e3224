//! Strategy selection.

use crate::config::DiffConfig;
use crate::extract::ExtractorRegistry;
use crate::result::DiffResult;
use crate::strategy::{BoxedStrategy, DiffInput, ParagraphStrategy, TextStrategy};
use docsnap_util::TimingGuard;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Compares documents with the first strategy that supports them.
///
/// The engine never fails: a strategy error becomes a result whose `raw`
/// text explains what went wrong.
pub struct DiffEngine {
    registry: Arc<ExtractorRegistry>,
    strategies: Vec<BoxedStrategy>,
}

impl DiffEngine {
    /// Paragraph strategy first, text strategy as the catch-all.
    pub fn new(registry: Arc<ExtractorRegistry>, config: DiffConfig) -> Self {
        Self::with_strategies(
            registry,
            vec![
                Box::new(ParagraphStrategy::new(config.clone())),
                Box::new(TextStrategy::new(config)),
            ],
        )
    }

    /// Engine with an explicit, ordered strategy list.
    pub fn with_strategies(
        registry: Arc<ExtractorRegistry>,
        strategies: Vec<BoxedStrategy>,
    ) -> Self {
        Self {
            registry,
            strategies,
        }
    }

    pub fn registry(&self) -> &Arc<ExtractorRegistry> {
        &self.registry
    }

    /// Names of the strategies in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Compare two documents.
    pub fn compare(&self, path_a: &Path, path_b: &Path) -> DiffResult {
        let input = DiffInput {
            path_a,
            path_b,
            extractor_a: self.registry.for_path(path_a).map(|e| &**e),
            extractor_b: self.registry.for_path(path_b).map(|e| &**e),
        };

        let Some(strategy) = self
            .strategies
            .iter()
            .find(|s| s.supports(input.extractor_a, input.extractor_b))
        else {
            warn!(
                a = %path_a.display(),
                b = %path_b.display(),
                "No strategy supports this pair"
            );
            return DiffResult::from_raw("No diff algorithm available");
        };

        debug!(
            strategy = strategy.name(),
            a = %path_a.display(),
            b = %path_b.display(),
            "Comparing documents"
        );
        let _timing = TimingGuard::diff(strategy.name());

        match strategy.diff(&input) {
            Ok(result) => result,
            Err(e) => {
                warn!(strategy = strategy.name(), error = %e, "Comparison failed");
                DiffResult::from_raw(format!("Comparison failed ({}): {}", strategy.name(), e))
            }
        }
    }
}

impl std::fmt::Debug for DiffEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffEngine")
            .field("registry", &self.registry)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
