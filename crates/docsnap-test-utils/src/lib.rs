//! Testing utilities and fixtures for docsnap.
//!
//! - **Fixtures**: temporary workspaces with documents in every format
//! - **Assertions**: file and text assertions with readable failures
//!
//! # Example Usage
//!
//! ```rust
//! use docsnap_test_utils::fixtures::TestDocs;
//!
//! let docs = TestDocs::new()
//!     .with_text("notes.txt", "first\nsecond\n")
//!     .with_markdown("readme.md", "# Title\n\nBody text.\n")
//!     .build();
//!
//! assert!(docs.file_exists("notes.txt"));
//! ```

pub mod assertions;
pub mod fixtures;

pub use fixtures::{BuiltTestDocs, TestDocs};
