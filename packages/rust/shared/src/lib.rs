//! Shared types, error model, and configuration for Bookstage.
//!
//! This crate is the foundation depended on by all other Bookstage crates.
//! It provides:
//! - [`BookstageError`] — the unified error type
//! - Domain types ([`ProjectVersion`], [`Manifest`])
//! - Configuration ([`BookConfig`], pinned-version resolution)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    BookConfig, SourceConfig, default_config_path, load_config_from, resolve_versions,
    write_default_config,
};
pub use error::{BookstageError, Result};
pub use types::{Manifest, ProjectVersion};
