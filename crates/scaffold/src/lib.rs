// ABOUTME: Main library entry point for the digests custom-extractor scaffolding tool.
// ABOUTME: Re-exports the public API: Scaffolder, ScaffolderBuilder, ScaffoldError, and collaborator types.

//! digests-scaffold - bootstraps site-specific custom extractors.
//!
//! Given an article URL, a scaffold run captures a sanitized fixture of the
//! page and either generates an extractor stub plus test stub for a new
//! hostname (registering the module in the shared registry) or, when an
//! extractor already exists, records the fixture alone.
//!
//! # Example
//!
//! ```no_run
//! use digests_scaffold::{Scaffolder, ScaffoldError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScaffoldError> {
//!     let mut scaffolder = Scaffolder::builder().root("../parser").build();
//!     let outcome = scaffolder.run("https://example.com/article").await?;
//!     println!("fixture saved to {}", outcome.fixture.relative_path());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod extract;
pub mod fetch;
pub mod fixtures;
pub mod layout;
pub mod progress;
pub mod sanitize;
pub mod scaffold;
pub mod templates;
pub mod urlinfo;

pub use crate::error::{ErrorCode, ScaffoldError};
pub use crate::extract::ExtractionResult;
pub use crate::fixtures::FixtureRecord;
pub use crate::layout::{FileRegistry, MemoryRegistry, RegistryLog};
pub use crate::progress::{ConsoleProgress, ProgressSink, SilentProgress};
pub use crate::scaffold::{
    ExtractorArtifactSet, Options, ScaffoldOutcome, ScaffoldRequest, Scaffolder, ScaffolderBuilder,
};
pub use crate::urlinfo::UrlInfo;
