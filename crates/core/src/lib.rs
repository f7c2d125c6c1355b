//! Core pipeline orchestration for chm2docset.
//!
//! This crate ties extraction, indexing, and storage together into the
//! end-to-end `convert` workflow, and owns the bundle-level pieces that
//! belong to no single stage: path layout and the descriptor file.

pub mod descriptor;
pub mod layout;
pub mod pipeline;
