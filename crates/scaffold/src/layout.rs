// ABOUTME: Filesystem layout for generated extractors and the shared module registry.
// ABOUTME: Registry appends are unconditional and order-preserving, behind an injectable log.

//! Extractor filesystem layout.
//!
//! Generated code lives at `src/extractors/custom/<hostname>/` inside the
//! target parser checkout; `src/extractors/custom/mod.rs` is the shared
//! registry that declares every scaffolded module. Registry writes go
//! through the `RegistryLog` trait so tests can substitute an in-memory
//! log. Appends are unconditional and order-preserving with no dedup, so
//! two runs for the same hostname leave two identical lines.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;
use crate::urlinfo::module_ident;

/// Root-relative path of the shared registry file.
pub const REGISTRY_PATH: &str = "src/extractors/custom/mod.rs";

/// Returns the extractor directory for a hostname under the given root.
pub fn dir_for(root: &Path, hostname: &str) -> PathBuf {
    root.join("src").join("extractors").join("custom").join(hostname)
}

/// Creates a directory (and any missing parents) unless it already exists.
///
/// Idempotent: returns `true` when the directory was created, `false` when
/// it was already present.
pub fn ensure_dir(path: &Path) -> io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(path)?;
    Ok(true)
}

/// The single registry line declaring a scaffolded extractor module.
///
/// Extractor directories keep the literal hostname, so the declaration
/// needs an explicit path attribute next to the legal module identifier.
pub fn registry_line(hostname: &str) -> String {
    format!(
        "#[path = \"{}/mod.rs\"] pub mod {};\n",
        hostname,
        module_ident(hostname)
    )
}

/// Append-only sink for registry entries.
pub trait RegistryLog {
    /// Appends one entry. No existence check is performed: appending the
    /// same hostname twice produces two duplicate entries.
    fn append(&mut self, line: &str) -> Result<(), ScaffoldError>;
}

/// Registry log backed by the shared registry file.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    /// Creates a log appending to `<root>/src/extractors/custom/mod.rs`.
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(REGISTRY_PATH),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryLog for FileRegistry {
    fn append(&mut self, line: &str) -> Result<(), ScaffoldError> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| {
                ScaffoldError::io(
                    self.path.display().to_string(),
                    "RegisterExtractor",
                    Some(anyhow::anyhow!(e)),
                )
            })?;
        file.write_all(line.as_bytes()).map_err(|e| {
            ScaffoldError::io(
                self.path.display().to_string(),
                "RegisterExtractor",
                Some(anyhow::anyhow!(e)),
            )
        })
    }
}

/// In-memory registry log for tests.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    pub lines: Vec<String>,
}

impl RegistryLog for MemoryRegistry {
    fn append(&mut self, line: &str) -> Result<(), ScaffoldError> {
        self.lines.push(line.to_string());
        Ok(())
    }
}
