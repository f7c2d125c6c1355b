//! Document indexing: encoding detection, title extraction, and the
//! content-root walk that populates the search index.
//!
//! This crate provides:
//! - [`encoding`] — bounded-prefix charset sniffing and best-effort transcoding
//! - [`title`] — `<title>` capture, entity unescaping, whitespace collapse
//! - [`walk`] — recursive traversal submitting (title, type, path) triples
//!   to the store's insertion batch

pub mod encoding;
pub mod title;
pub mod walk;

pub use encoding::{decode_header, resolve_encoding};
pub use title::extract_title;
pub use walk::{HEADER_READ_LIMIT, index_documents, scan_document};
