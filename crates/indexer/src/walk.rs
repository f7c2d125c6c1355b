//! Content-root traversal feeding the index store.

use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use chm2docset_shared::{IndexEntry, Result};
use chm2docset_storage::IndexBatch;

use crate::{encoding, title};

/// Per-document read cap. Covers standard HTML `<head>` sections without
/// reading whole files, so peak memory does not scale with document size.
pub const HEADER_READ_LIMIT: u64 = 64 * 1024;

/// Read a document's leading bytes, decode, and extract its title.
///
/// `Ok(None)` means the page has no usable title and is excluded.
pub fn scan_document(path: &Path) -> std::io::Result<Option<String>> {
    let file = std::fs::File::open(path)?;
    let mut header = Vec::new();
    file.take(HEADER_READ_LIMIT).read_to_end(&mut header)?;

    let text = encoding::decode_header(&header);
    Ok(title::extract_title(&text))
}

/// Walk `root` and submit one index entry per titled HTML document.
///
/// Unreadable documents and unreadable walk entries are logged as warnings
/// and skipped; the walk always runs to completion. Store failures are
/// fatal. Traversal order does not affect the final index contents since
/// insertion is keyed by the full (name, type, path) triple.
///
/// Returns the number of submitted entries.
pub async fn index_documents(
    root: &Path,
    batch: &IndexBatch,
    on_document: &mut (dyn FnMut(&str, usize) + Send),
) -> Result<usize> {
    let mut submitted = 0;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable walk entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_html(entry.path()) {
            continue;
        }

        let title = match scan_document(entry.path()) {
            Ok(Some(title)) => title,
            Ok(None) => {
                debug!(path = %entry.path().display(), "no title, excluding document");
                continue;
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping unreadable document");
                continue;
            }
        };

        let Some(rel_path) = relative_slash_path(root, entry.path()) else {
            warn!(path = %entry.path().display(), "skipping document outside content root");
            continue;
        };

        batch
            .insert_if_absent(&IndexEntry::guide(title, rel_path.clone()))
            .await?;
        submitted += 1;
        on_document(&rel_path, submitted);
    }

    debug!(submitted, "content walk complete");
    Ok(submitted)
}

/// True for paths with a case-insensitive `.htm`/`.html` extension.
fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("htm") || ext.eq_ignore_ascii_case("html"))
}

/// Path relative to `root`, forward-slash separated.
fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chm2docset_storage::IndexStore;

    // "はじめに" in Shift-JIS.
    const SJIS_HAJIMENI: &[u8] = &[0x82, 0xCD, 0x82, 0xB6, 0x82, 0xDF, 0x82, 0xC9];

    fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
        for (rel, content) in files {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, content).unwrap();
        }
    }

    async fn index_tree(root: &Path) -> Vec<IndexEntry> {
        let store_dir = tempfile::tempdir().unwrap();
        let store = IndexStore::create(&store_dir.path().join("docSet.dsidx"))
            .await
            .unwrap();
        let batch = store.begin().await.unwrap();
        index_documents(root, &batch, &mut |_, _| {}).await.unwrap();
        batch.commit().await.unwrap();
        store.entries().await.unwrap()
    }

    #[tokio::test]
    async fn mixed_tree_yields_expected_entries() {
        let root = tempfile::tempdir().unwrap();
        let mut intro = Vec::from(
            &b"<html><head><meta charset=\"Shift_JIS\"></head><title>"[..],
        );
        intro.extend_from_slice(SJIS_HAJIMENI);
        intro.extend_from_slice(b"</title></html>");

        write_tree(
            root.path(),
            &[
                ("Welcome.htm", b"<html><title>Welcome</title></html>"),
                ("Guide/intro.html", &intro),
                ("notes.txt", b"<title>Never scanned</title>"),
                ("Guide/untitled.html", b"<html><body>nothing</body></html>"),
            ],
        );

        let entries = index_tree(root.path()).await;
        assert_eq!(
            entries,
            vec![
                IndexEntry::guide("Welcome", "Welcome.htm"),
                IndexEntry::guide("はじめに", "Guide/intro.html"),
            ]
        );
    }

    #[tokio::test]
    async fn extension_match_is_case_insensitive() {
        let root = tempfile::tempdir().unwrap();
        write_tree(
            root.path(),
            &[("PAGE.HTM", b"<html><title>Shouting</title></html>")],
        );

        let entries = index_tree(root.path()).await;
        assert_eq!(entries, vec![IndexEntry::guide("Shouting", "PAGE.HTM")]);
    }

    #[tokio::test]
    async fn same_title_under_different_paths_keeps_both() {
        let root = tempfile::tempdir().unwrap();
        write_tree(
            root.path(),
            &[
                ("a/index.htm", b"<html><title>Overview</title></html>"),
                ("b/index.htm", b"<html><title>Overview</title></html>"),
            ],
        );

        let entries = index_tree(root.path()).await;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.name == "Overview"));
    }

    #[tokio::test]
    async fn reindexing_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        write_tree(
            root.path(),
            &[
                ("Welcome.htm", b"<html><title>Welcome</title></html>"),
                ("Guide/a.html", b"<html><title>A</title></html>"),
            ],
        );

        let first = index_tree(root.path()).await;
        let second = index_tree(root.path()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn progress_callback_sees_every_submission() {
        let root = tempfile::tempdir().unwrap();
        write_tree(
            root.path(),
            &[
                ("one.htm", b"<html><title>One</title></html>"),
                ("two.htm", b"<html><title>Two</title></html>"),
            ],
        );

        let store_dir = tempfile::tempdir().unwrap();
        let store = IndexStore::create(&store_dir.path().join("docSet.dsidx"))
            .await
            .unwrap();
        let batch = store.begin().await.unwrap();
        let mut seen = Vec::new();
        let count = index_documents(root.path(), &batch, &mut |path, n| {
            seen.push((path.to_string(), n));
        })
        .await
        .unwrap();
        batch.commit().await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen.last().unwrap().1, 2);
    }

    #[test]
    fn scan_document_propagates_read_errors() {
        let root = tempfile::tempdir().unwrap();
        assert!(scan_document(&root.path().join("absent.html")).is_err());
    }

    #[test]
    fn html_extension_filter() {
        assert!(is_html(Path::new("a/b/page.html")));
        assert!(is_html(Path::new("page.HTM")));
        assert!(!is_html(Path::new("notes.txt")));
        assert!(!is_html(Path::new("archive.html.bak")));
        assert!(!is_html(Path::new("no_extension")));
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/content");
        let nested = root.join("Guide").join("intro.html");
        assert_eq!(
            relative_slash_path(root, &nested).as_deref(),
            Some("Guide/intro.html")
        );
    }
}
