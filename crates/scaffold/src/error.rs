// ABOUTME: Error types for the scaffold tool including ErrorCode enum and ScaffoldError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of scaffold failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Io,
    Fetch,
    Extract,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Io => "I/O error",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Extract => "extraction error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for scaffold operations.
///
/// Only `InvalidUrl` is recoverable (the prompt asks again); every other
/// code terminates the run.
#[derive(Debug, thiserror::Error)]
pub struct ScaffoldError {
    pub code: ErrorCode,
    /// The URL or filesystem path the failing operation was working on.
    pub subject: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScaffoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scaffold: {} {}: {}", self.op, self.subject, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScaffoldError {
    /// Create an InvalidUrl error.
    pub fn invalid_url(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            subject: subject.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Io error.
    pub fn io(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Io,
            subject: subject.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Fetch error.
    pub fn fetch(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Fetch,
            subject: subject.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Extract error.
    pub fn extract(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Extract,
            subject: subject.into(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is an Extract error.
    pub fn is_extract(&self) -> bool {
        self.code == ErrorCode::Extract
    }
}
