//! Command handlers for the docsnap CLI.

pub mod diff;
pub mod merge;
pub mod snapshot;

pub use diff::*;
pub use merge::*;
pub use snapshot::*;
