//! Configuration and application context for docsnap.
//!
//! [`Config`] merges the global, environment and project layers;
//! [`Context`] turns a config into a ready [`docsnap_snapshot::SnapshotStore`].

pub mod config;
pub mod context;
pub mod error;

pub use config::Config;
pub use context::Context;
pub use error::{ConfigError, CoreError, CoreResult};
