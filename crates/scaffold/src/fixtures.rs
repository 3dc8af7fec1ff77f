// ABOUTME: Fixture persistence: writes sanitized page snapshots under fixtures/<hostname>/.
// ABOUTME: Filenames are millisecond-epoch timestamps; records are write-once.

//! Fixture storage for captured pages.
//!
//! Each run captures at most one fixture, written synchronously to
//! `fixtures/<hostname>/<epoch-ms>.html`. Uniqueness relies on the clock:
//! two captures within the same millisecond would collide, which cannot
//! happen today (one fixture per run) but is a known limitation if batching
//! is ever added.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::ScaffoldError;

/// A captured fixture: where it went and what was written.
#[derive(Debug, Clone)]
pub struct FixtureRecord {
    pub hostname: String,
    /// Bare filename, e.g. `1724932800000.html`.
    pub filename: String,
    /// Full path under the scaffold root.
    pub path: PathBuf,
    pub html: String,
}

impl FixtureRecord {
    /// The root-relative path, suitable for printed instructions and
    /// generated test code.
    pub fn relative_path(&self) -> String {
        format!("fixtures/{}/{}", self.hostname, self.filename)
    }
}

/// Returns the fixture directory for a hostname under the given root.
pub fn fixture_dir(root: &Path, hostname: &str) -> PathBuf {
    root.join("fixtures").join(hostname)
}

/// Writes sanitized HTML as a new fixture for `hostname`.
///
/// Precondition: `fixtures/<hostname>` already exists. The orchestrator
/// creates it on the new-parser branch only; on the existing-parser branch
/// the directory is expected to remain from the run that scaffolded the
/// extractor. Missing directories surface as an Io error.
pub fn save(root: &Path, hostname: &str, html: &str) -> Result<FixtureRecord, ScaffoldError> {
    let filename = format!("{}.html", Utc::now().timestamp_millis());
    let path = fixture_dir(root, hostname).join(&filename);

    fs::write(&path, html).map_err(|e| {
        ScaffoldError::io(
            path.display().to_string(),
            "SaveFixture",
            Some(anyhow::anyhow!(e)),
        )
    })?;

    Ok(FixtureRecord {
        hostname: hostname.to_string(),
        filename,
        path,
        html: html.to_string(),
    })
}
