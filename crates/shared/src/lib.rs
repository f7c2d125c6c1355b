//! Shared types, error model, and configuration for chm2docset.
//!
//! This crate is the foundation depended on by all other chm2docset crates.
//! It provides:
//! - [`DocsetError`] — the unified error type
//! - Domain types ([`IndexEntry`], [`BundleDescriptor`], fixed labels)
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ExtractorConfig, config_dir, config_file_path, load_config,
    load_config_from,
};
pub use error::{DocsetError, Result};
pub use types::{
    BUNDLE_ID_PREFIX, BundleDescriptor, GUIDE_ENTRY_TYPE, IndexEntry, WELCOME_PAGE,
    sanitize_identifier,
};
