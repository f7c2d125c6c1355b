//! Bundle path arithmetic.
//!
//! One [`DocsetLayout`] value describes where every piece of a bundle
//! lives: the docset root, the extracted documents, the search index, and
//! the descriptor.

use std::path::{Path, PathBuf};

use tracing::debug;

use chm2docset_shared::{DocsetError, Result};

/// Derived path set for one docset bundle.
#[derive(Debug, Clone)]
pub struct DocsetLayout {
    docset_path: PathBuf,
    basename: String,
}

impl DocsetLayout {
    /// Derive the layout from a source container and an output path.
    ///
    /// When `output` itself ends in `.docset` it is used verbatim as the
    /// bundle root; otherwise the bundle becomes
    /// `<output>/<basename>.docset`.
    pub fn new(source: &Path, output: &Path) -> Result<Self> {
        let basename = source
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                DocsetError::validation(format!(
                    "source `{}` has no usable base name",
                    source.display()
                ))
            })?
            .to_string();

        let docset_path = if output
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docset"))
        {
            output.to_path_buf()
        } else {
            output.join(format!("{basename}.docset"))
        };

        Ok(Self {
            docset_path,
            basename,
        })
    }

    /// Source base name with the extension stripped.
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Bundle root directory.
    pub fn docset_path(&self) -> &Path {
        &self.docset_path
    }

    /// Directory holding the extracted pages and assets.
    pub fn documents_dir(&self) -> PathBuf {
        self.docset_path
            .join("Contents")
            .join("Resources")
            .join("Documents")
    }

    /// Embedded search-index file.
    pub fn index_path(&self) -> PathBuf {
        self.docset_path
            .join("Contents")
            .join("Resources")
            .join("docSet.dsidx")
    }

    /// Bundle descriptor file.
    pub fn plist_path(&self) -> PathBuf {
        self.docset_path.join("Contents").join("Info.plist")
    }

    /// Remove any pre-existing bundle at the docset root.
    pub fn clean(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.docset_path) {
            Ok(()) => {
                debug!(path = %self.docset_path.display(), "removed previous bundle");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DocsetError::io(&self.docset_path, e)),
        }
    }

    /// Create the bundle directory tree down to the documents directory.
    pub fn create_dirs(&self) -> Result<()> {
        let documents = self.documents_dir();
        std::fs::create_dir_all(&documents).map_err(|e| DocsetError::io(&documents, e))?;
        debug!(path = %self.docset_path.display(), "bundle directories created");
        Ok(())
    }
}
