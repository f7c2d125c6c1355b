//! Embedded search-index store (`docSet.dsidx`).
//!
//! The [`IndexStore`] struct wraps a libSQL database holding the single
//! `searchIndex` relation a documentation browser queries for lookup.
//!
//! **Lifecycle rules:**
//! - The store file is deleted and recreated fresh on every run
//! - All insertions for a run happen inside exactly one transaction
//!   ([`IndexStore::begin`] / [`IndexBatch::commit`]); readers observe
//!   either no populated store or the complete one, never a partial index

use std::path::Path;

use libsql::{Connection, Database, Transaction, params};
use tracing::{debug, info};

use chm2docset_shared::{DocsetError, IndexEntry, Result};

/// Search-index schema: an auto-assigned identity plus the unique
/// (name, type, path) triple documentation browsers expect.
const SCHEMA: &str = "\
CREATE TABLE searchIndex (
    id   INTEGER PRIMARY KEY,
    name TEXT,
    type TEXT,
    path TEXT
);
CREATE UNIQUE INDEX anchor ON searchIndex (name, type, path);
";

/// Primary store handle wrapping a libSQL database.
pub struct IndexStore {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

impl IndexStore {
    /// Create a fresh store at `path`, replacing any pre-existing one.
    ///
    /// Fails if the location is not writable.
    pub async fn create(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
        }

        // Remove the store and any WAL sidecars left by an interrupted run.
        remove_if_present(path)?;
        remove_if_present(&sidecar(path, "-wal"))?;
        remove_if_present(&sidecar(path, "-shm"))?;

        let store = Self::open(path, false).await?;
        store
            .conn
            .execute_batch(SCHEMA)
            .await
            .map_err(|e| DocsetError::Storage(format!("create schema: {e}")))?;

        info!(path = %path.display(), "index store created");
        Ok(store)
    }

    /// Open an existing store at `path` in read-only mode.
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        Self::open(path, true).await
    }

    async fn open(path: &Path, readonly: bool) -> Result<Self> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        Ok(Self { db, conn, readonly })
    }

    /// Start the run's single insertion transaction.
    pub async fn begin(&self) -> Result<IndexBatch> {
        if self.readonly {
            return Err(DocsetError::Storage(
                "store is opened in read-only mode".into(),
            ));
        }

        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| DocsetError::Storage(format!("begin transaction: {e}")))?;
        Ok(IndexBatch { tx })
    }

    /// Read back every stored entry, ordered by the unique triple.
    pub async fn entries(&self) -> Result<Vec<IndexEntry>> {
        let mut rows = self
            .conn
            .query(
                "SELECT name, type, path FROM searchIndex ORDER BY name, type, path",
                params![],
            )
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let mut entries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?
        {
            entries.push(IndexEntry {
                name: row
                    .get::<String>(0)
                    .map_err(|e| DocsetError::Storage(e.to_string()))?,
                entry_type: row
                    .get::<String>(1)
                    .map_err(|e| DocsetError::Storage(e.to_string()))?,
                path: row
                    .get::<String>(2)
                    .map_err(|e| DocsetError::Storage(e.to_string()))?,
            });
        }
        Ok(entries)
    }
}

/// One run's open insertion transaction.
///
/// Dropping a batch without [`commit`](IndexBatch::commit) leaves the store
/// unpopulated; the pipeline calls [`rollback`](IndexBatch::rollback)
/// explicitly before propagating a fatal error.
pub struct IndexBatch {
    tx: Transaction,
}

impl std::fmt::Debug for IndexBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBatch").finish_non_exhaustive()
    }
}

impl IndexBatch {
    /// Insert an entry unless the (name, type, path) triple already exists.
    ///
    /// A uniqueness collision is a no-op, not an error.
    pub async fn insert_if_absent(&self, entry: &IndexEntry) -> Result<()> {
        self.tx
            .execute(
                "INSERT OR IGNORE INTO searchIndex (name, type, path) VALUES (?1, ?2, ?3)",
                params![
                    entry.name.as_str(),
                    entry.entry_type.as_str(),
                    entry.path.as_str()
                ],
            )
            .await
            .map_err(|e| DocsetError::Storage(format!("insert {}: {e}", entry.path)))?;
        Ok(())
    }

    /// Commit the transaction, making the index visible to readers.
    pub async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DocsetError::Storage(format!("commit: {e}")))?;
        debug!("index batch committed");
        Ok(())
    }

    /// Roll the transaction back, discarding every insertion of this run.
    pub async fn rollback(self) -> Result<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DocsetError::Storage(format!("rollback: {e}")))?;
        debug!("index batch rolled back");
        Ok(())
    }
}

fn sidecar(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    name.into()
}

fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DocsetError::io(path, e)),
    }
}
