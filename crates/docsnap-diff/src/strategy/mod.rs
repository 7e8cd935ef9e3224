//! Diff strategies.
//!
//! A strategy declares whether it can handle a pair of extractors and then
//! computes a [`DiffResult`]. The engine tries strategies in order.

mod paragraph;
mod text;

pub use paragraph::ParagraphStrategy;
pub use text::TextStrategy;

use crate::error::DiffError;
use crate::extract::Extractor;
use crate::result::DiffResult;
use std::path::Path;

/// Two documents to compare, with their resolved extractors.
#[derive(Clone, Copy)]
pub struct DiffInput<'a> {
    pub path_a: &'a Path,
    pub path_b: &'a Path,
    pub extractor_a: Option<&'a dyn Extractor>,
    pub extractor_b: Option<&'a dyn Extractor>,
}

/// Algorithm turning two documents into a diff.
pub trait DiffStrategy: Send + Sync {
    /// Name used in logs and failure messages.
    fn name(&self) -> &str;

    /// Whether this strategy can compare documents read by these extractors.
    fn supports(&self, a: Option<&dyn Extractor>, b: Option<&dyn Extractor>) -> bool;

    /// Compare the two documents.
    fn diff(&self, input: &DiffInput<'_>) -> Result<DiffResult, DiffError>;
}

/// Shared strategy handle.
pub type BoxedStrategy = Box<dyn DiffStrategy>;
