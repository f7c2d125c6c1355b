//! Core domain types for chm2docset bundles.

use std::sync::LazyLock;

use regex::Regex;

/// Category label recorded for every indexed page.
pub const GUIDE_ENTRY_TYPE: &str = "Guide";

/// Landing page the documentation browser opens first.
pub const WELCOME_PAGE: &str = "Welcome.htm";

/// Reverse-DNS namespace prefix for bundle identifiers.
pub const BUNDLE_ID_PREFIX: &str = "io.ngs.documentation.";

/// Characters allowed in a bundle identifier component; everything else is
/// stripped by [`sanitize_identifier`].
static UNSAFE_IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\^a-zA-Z0-9\-_]").expect("identifier pattern"));

// ---------------------------------------------------------------------------
// IndexEntry
// ---------------------------------------------------------------------------

/// One row of the search index: a (name, type, path) triple.
///
/// The triple is unique within a bundle; inserting a colliding entry is a
/// no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    /// Extracted, whitespace-normalized page title.
    pub name: String,
    /// Category label (always [`GUIDE_ENTRY_TYPE`] for help pages).
    pub entry_type: String,
    /// Document path relative to the content root, forward-slash separated.
    pub path: String,
}

impl IndexEntry {
    /// Build a guide entry for an indexed page.
    pub fn guide(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type: GUIDE_ENTRY_TYPE.into(),
            path: path.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// BundleDescriptor
// ---------------------------------------------------------------------------

/// Identity and display metadata rendered into the bundle descriptor file.
///
/// Created once per run and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDescriptor {
    /// Namespaced, sanitized bundle identifier.
    pub identifier: String,
    /// Human-readable bundle name (source base name, extension stripped).
    pub display_name: String,
    /// Platform family label supplied by the caller.
    pub platform_family: String,
}

impl BundleDescriptor {
    /// Build the descriptor for a source with the given base name.
    ///
    /// The identifier is [`BUNDLE_ID_PREFIX`] plus the sanitized base name;
    /// the display name keeps the base name verbatim.
    pub fn for_source(basename: &str, platform_family: &str) -> Self {
        Self {
            identifier: format!("{BUNDLE_ID_PREFIX}{}", sanitize_identifier(basename)),
            display_name: basename.to_string(),
            platform_family: platform_family.to_string(),
        }
    }
}

/// Strip every character outside letters, digits, hyphen, underscore, caret.
pub fn sanitize_identifier(component: &str) -> String {
    UNSAFE_IDENT_RE.replace_all(component, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_entry_carries_fixed_type() {
        let entry = IndexEntry::guide("Welcome", "Welcome.htm");
        assert_eq!(entry.entry_type, "Guide");
        assert_eq!(entry.name, "Welcome");
        assert_eq!(entry.path, "Welcome.htm");
    }

    #[test]
    fn sanitize_strips_spaces_and_punctuation() {
        assert_eq!(sanitize_identifier("Foo Bar"), "FooBar");
        assert_eq!(sanitize_identifier("C++ Reference (2nd ed.)"), "CReference2nded");
    }

    #[test]
    fn sanitize_keeps_allowed_characters() {
        assert_eq!(sanitize_identifier("my-docs_v2^beta"), "my-docs_v2^beta");
    }

    #[test]
    fn descriptor_for_source() {
        let descriptor = BundleDescriptor::for_source("Foo Bar", "macos");
        assert_eq!(descriptor.identifier, "io.ngs.documentation.FooBar");
        assert_eq!(descriptor.display_name, "Foo Bar");
        assert_eq!(descriptor.platform_family, "macos");
    }
}
