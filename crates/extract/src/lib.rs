//! External help-container extraction.
//!
//! Decompressing the source container is delegated to a platform-specific
//! external program. This crate provides:
//! - [`Extractor`] — the seam the pipeline drives, so the indexing core can
//!   be exercised in tests without a real external binary
//! - [`SystemExtractor`] — resolves the program from PATH and runs it as a
//!   blocking subprocess with inherited stdio

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use chm2docset_shared::{DocsetError, Result};

/// Default extraction program on Windows (argument order `-decompile <dest> <source>`).
#[cfg(windows)]
const DEFAULT_COMMAND: &str = "hh.exe";

/// Default extraction program elsewhere (argument order `<source> <dest>`).
#[cfg(not(windows))]
const DEFAULT_COMMAND: &str = "extract_chmLib";

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Turns a compressed help container into a flat directory of HTML/asset files.
///
/// Implementations must leave `destination` populated on success. The
/// pipeline only consumes that postcondition and the failure signal.
pub trait Extractor: Send + Sync {
    /// Extract `source` into `destination`.
    fn extract(&self, source: &Path, destination: &Path) -> Result<()>;

    /// Human-readable extractor name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// SystemExtractor
// ---------------------------------------------------------------------------

/// Runs the platform's external extraction program.
pub struct SystemExtractor {
    command: String,
}

impl SystemExtractor {
    /// Use the platform default extraction program.
    pub fn new() -> Self {
        Self {
            command: DEFAULT_COMMAND.into(),
        }
    }

    /// Use a specific program name or path instead of the platform default.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for SystemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for SystemExtractor {
    fn extract(&self, source: &Path, destination: &Path) -> Result<()> {
        // Resolve before spawning: a missing program is a configuration
        // error, distinct from the program itself failing.
        let program = find_program(&self.command).ok_or_else(|| DocsetError::MissingExtractor {
            name: self.command.clone(),
        })?;

        let args = invocation_args(source, destination);
        info!(program = %program.display(), "running extraction program");

        let status = Command::new(&program)
            .args(&args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| DocsetError::Extract(format!("failed to run `{}`: {e}", self.command)))?;

        if !status.success() {
            return Err(DocsetError::Extract(format!(
                "`{}` exited with status {}",
                self.command,
                status.code().unwrap_or(-1)
            )));
        }

        debug!(destination = %destination.display(), "extraction complete");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Argument order differs per platform: `hh.exe -decompile <dest> <source>`
/// on Windows, `extract_chmLib <source> <dest>` elsewhere.
fn invocation_args(source: &Path, destination: &Path) -> Vec<OsString> {
    if cfg!(windows) {
        vec![
            OsString::from("-decompile"),
            destination.as_os_str().to_os_string(),
            source.as_os_str().to_os_string(),
        ]
    } else {
        vec![
            source.as_os_str().to_os_string(),
            destination.as_os_str().to_os_string(),
        ]
    }
}

/// Resolve a program name against PATH, or check an explicit path directly.
fn find_program(command: &str) -> Option<PathBuf> {
    let as_path = Path::new(command);
    if as_path.components().count() > 1 {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    search_dirs(command, std::env::split_paths(&path_var))
}

/// Search an ordered list of directories for a file named `command`.
fn search_dirs(command: &str, dirs: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    dirs.into_iter()
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file())
}
