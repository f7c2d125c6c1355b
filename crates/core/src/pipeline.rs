//! End-to-end `convert` pipeline: container → extract → index → descriptor.
//!
//! The pipeline is strictly sequential: clean destination → create
//! directories → run the external extractor (blocking) → walk and index the
//! content tree inside one store transaction → write the descriptor.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use chm2docset_extract::Extractor;
use chm2docset_indexer::index_documents;
use chm2docset_shared::{BundleDescriptor, DocsetError, Result};
use chm2docset_storage::IndexStore;

use crate::descriptor;
use crate::layout::DocsetLayout;

/// Configuration for the `convert` pipeline.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Source help container (.chm file).
    pub source: PathBuf,
    /// Output directory, or an explicit `.docset` bundle path.
    pub output: PathBuf,
    /// Platform family label recorded in the bundle descriptor.
    pub platform: String,
}

/// Result of the `convert` pipeline.
#[derive(Debug)]
pub struct ConvertResult {
    /// Path to the finished bundle.
    pub docset_path: PathBuf,
    /// Number of documents submitted to the search index.
    pub document_count: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a document has been submitted to the index.
    fn document_indexed(&self, path: &str, count: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ConvertResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn document_indexed(&self, _path: &str, _count: usize) {}
    fn done(&self, _result: &ConvertResult) {}
}

/// Run the full `convert` pipeline.
///
/// 1. Clean the destination and create the bundle directories
/// 2. Extract the container via the injected [`Extractor`]
/// 3. Create the index store and populate it in one transaction
/// 4. Write the bundle descriptor
#[instrument(skip_all, fields(source = %config.source.display()))]
pub async fn convert(
    config: &ConvertConfig,
    extractor: &dyn Extractor,
    progress: &dyn ProgressReporter,
) -> Result<ConvertResult> {
    let start = Instant::now();

    if !config.source.is_file() {
        return Err(DocsetError::validation(format!(
            "source `{}` is not a readable file",
            config.source.display()
        )));
    }

    let layout = DocsetLayout::new(&config.source, &config.output)?;
    info!(
        docset = %layout.docset_path().display(),
        extractor = extractor.name(),
        "starting docset build"
    );

    // --- Phase 1: bundle directory ---
    progress.phase("Preparing bundle directory");
    layout.clean()?;
    layout.create_dirs()?;

    // --- Phase 2: extraction ---
    progress.phase("Extracting source container");
    let documents = layout.documents_dir();
    extractor.extract(&config.source, &documents)?;

    // --- Phase 3: indexing, one transaction ---
    progress.phase("Indexing documents");
    let store = IndexStore::create(&layout.index_path()).await?;
    let batch = store.begin().await?;

    let walk = index_documents(&documents, &batch, &mut |path, count| {
        progress.document_indexed(path, count);
    })
    .await;

    let document_count = match walk {
        Ok(count) => count,
        Err(e) => {
            // Roll back before propagating so no partial index is persisted.
            if let Err(rollback) = batch.rollback().await {
                warn!(error = %rollback, "rollback after failed walk also failed");
            }
            return Err(e);
        }
    };
    batch.commit().await?;

    // --- Phase 4: descriptor ---
    progress.phase("Writing bundle descriptor");
    let bundle = BundleDescriptor::for_source(layout.basename(), &config.platform);
    descriptor::write(&bundle, &layout.plist_path())?;

    let result = ConvertResult {
        docset_path: layout.docset_path().to_path_buf(),
        document_count,
        elapsed: start.elapsed(),
    };
    progress.done(&result);

    info!(
        document_count = result.document_count,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "docset build complete"
    );

    Ok(result)
}
