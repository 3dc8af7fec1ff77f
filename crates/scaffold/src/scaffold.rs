// ABOUTME: The scaffold orchestrator: validate, fetch, sanitize, persist, extract, then branch.
// ABOUTME: New hostnames get generated extractor/test stubs and a registry entry; known ones get a fixture only.

//! The scaffold pipeline.
//!
//! One run moves through a fixed sequence of states: resolve the URL, check
//! whether an extractor directory already exists (recorded once, before any
//! creation), create directories on the new-parser branch, fetch the page,
//! sanitize it, persist the fixture, run the sample extraction, then either
//! generate extractor/test stubs plus a registry entry (new parser) or
//! report the fixture path for an existing one. Steps run strictly in
//! sequence; there is no retry, no cancellation, and no cleanup of the
//! fixture when a later step fails.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dom_query::Document;
use url::Url;

use crate::error::ScaffoldError;
use crate::extract::{self, ExtractionResult};
use crate::fetch::{self, FetchOptions};
use crate::fixtures::{self, FixtureRecord};
use crate::layout::{self, FileRegistry, RegistryLog};
use crate::progress::{confirm, confirm_async, ConsoleProgress, ProgressSink};
use crate::sanitize::{self, JUNK_TAGS};
use crate::templates;
use crate::urlinfo;

/// A validated scaffold request, immutable for the life of one run.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub url: String,
    pub hostname: String,
}

/// Files produced on the new-parser branch.
#[derive(Debug, Clone)]
pub struct ExtractorArtifactSet {
    pub extractor_path: PathBuf,
    pub test_path: PathBuf,
    pub registry_line: String,
}

/// Everything one run produced.
#[derive(Debug)]
pub struct ScaffoldOutcome {
    pub request: ScaffoldRequest,
    /// Whether this run took the new-parser branch. Recorded before any
    /// directory creation and never recomputed mid-run.
    pub new_parser: bool,
    pub fixture: FixtureRecord,
    pub sample: ExtractionResult,
    /// `None` on the existing-parser branch.
    pub artifacts: Option<ExtractorArtifactSet>,
}

/// Configuration options for a `Scaffolder`.
#[derive(Debug, Clone)]
pub struct Options {
    /// The target parser checkout the tool scaffolds into.
    pub root: PathBuf,
    pub allow_private_networks: bool,
    pub user_agent: String,
    pub timeout: Duration,
    /// Tags stripped from captured fixtures.
    pub junk_tags: Vec<String>,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            allow_private_networks: false,
            user_agent: "digests-scaffold/0.1".to_string(),
            timeout: Duration::from_secs(30),
            junk_tags: JUNK_TAGS.iter().map(|s| s.to_string()).collect(),
            http_client: None,
        }
    }
}

/// Builder for constructing Scaffolder instances with custom configuration.
pub struct ScaffolderBuilder {
    opts: Options,
    registry: Option<Box<dyn RegistryLog>>,
    progress: Option<Box<dyn ProgressSink>>,
}

impl ScaffolderBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
            registry: None,
            progress: None,
        }
    }

    /// Set the target parser checkout to scaffold into.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.opts.root = root.into();
        self
    }

    /// Allow or disallow fetching from private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Replace the fixture tag blocklist.
    pub fn junk_tags(mut self, tags: Vec<String>) -> Self {
        self.opts.junk_tags = tags;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Substitute the registry log (defaults to the shared registry file).
    pub fn registry(mut self, registry: Box<dyn RegistryLog>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Substitute the progress sink (defaults to console output).
    pub fn progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Build the Scaffolder with the configured options.
    pub fn build(self) -> Scaffolder {
        Scaffolder::new(self.opts, self.registry, self.progress)
    }
}

impl Default for ScaffolderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the end-to-end scaffold workflow.
pub struct Scaffolder {
    opts: Options,
    http_client: reqwest::Client,
    registry: Box<dyn RegistryLog>,
    progress: Box<dyn ProgressSink>,
}

impl Scaffolder {
    /// Create a new ScaffolderBuilder for configuring the scaffolder.
    pub fn builder() -> ScaffolderBuilder {
        ScaffolderBuilder::new()
    }

    fn new(
        opts: Options,
        registry: Option<Box<dyn RegistryLog>>,
        progress: Option<Box<dyn ProgressSink>>,
    ) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        let registry = registry.unwrap_or_else(|| Box::new(FileRegistry::new(&opts.root)));
        let progress = progress.unwrap_or_else(|| Box::new(ConsoleProgress));

        Self {
            opts,
            http_client,
            registry,
            progress,
        }
    }

    /// Runs the full pipeline for one URL.
    ///
    /// Returns `InvalidUrl` (recoverable at the prompt) when the URL lacks a
    /// hostname; every other failure is fatal and propagates to the caller.
    pub async fn run(&mut self, raw_url: &str) -> Result<ScaffoldOutcome, ScaffoldError> {
        // Resolving
        let info = urlinfo::resolve(raw_url)
            .ok_or_else(|| ScaffoldError::invalid_url(raw_url, "Resolve", None))?;
        let request = ScaffoldRequest {
            url: raw_url.to_string(),
            hostname: info.hostname,
        };
        let page_url = Url::parse(raw_url).map_err(|e| {
            ScaffoldError::invalid_url(raw_url, "Resolve", Some(anyhow::anyhow!(e)))
        })?;

        // CheckingExistence: recorded once, before any creation
        let dir = layout::dir_for(&self.opts.root, &request.hostname);
        let new_parser = !dir.exists();

        // DirCreation (new-parser branch only; the fixtures directory for an
        // existing parser is expected to remain from the scaffolding run)
        if new_parser {
            let progress = self.progress.as_ref();
            confirm(
                progress,
                &format!("Creating {} directory", request.hostname),
                || layout::ensure_dir(&dir),
            )
            .map_err(|e| {
                ScaffoldError::io(dir.display().to_string(), "CreateDir", Some(anyhow::anyhow!(e)))
            })?;

            let fdir = fixtures::fixture_dir(&self.opts.root, &request.hostname);
            confirm(progress, "Creating fixtures directory", || {
                layout::ensure_dir(&fdir)
            })
            .map_err(|e| {
                ScaffoldError::io(
                    fdir.display().to_string(),
                    "CreateDir",
                    Some(anyhow::anyhow!(e)),
                )
            })?;
        }

        // Fetching
        let fetch_opts = FetchOptions {
            allow_private_networks: self.opts.allow_private_networks,
        };
        let page = confirm_async(
            self.progress.as_ref(),
            "Fetching fixture",
            fetch::fetch(&self.http_client, raw_url, &fetch_opts),
        )
        .await?;
        let raw_html = page.text_utf8();

        // Sanitizing
        let sanitized = confirm(self.progress.as_ref(), "Sanitizing page", || {
            let doc = Document::from(raw_html.as_str());
            sanitize::sanitize(&doc, &page_url, &self.opts.junk_tags)
        });

        // Persisting
        let fixture = confirm(self.progress.as_ref(), "Saving fixture", || {
            fixtures::save(&self.opts.root, &request.hostname, &sanitized)
        })?;

        // Extracting: always awaited, its settlement triggers branch reporting
        let sample = confirm_async(
            self.progress.as_ref(),
            "Extracting sample fields",
            extract::extract(raw_url, &sanitized),
        )
        .await?;

        let artifacts = if new_parser {
            let progress = &self.progress;
            let registry = &mut self.registry;
            let artifacts = confirm(
                progress.as_ref(),
                "Generating extractor and tests",
                || generate(registry.as_mut(), &request, &dir, &fixture, &sample),
            )?;
            self.report_new_parser(&request);
            Some(artifacts)
        } else {
            self.report_existing_parser(&fixture);
            None
        };

        Ok(ScaffoldOutcome {
            request,
            new_parser,
            fixture,
            sample,
            artifacts,
        })
    }

    fn report_new_parser(&self, request: &ScaffoldRequest) {
        println!(
            "Your custom extractor has been set up. To get started building it, run\n\n    \
             cargo test {}\n",
            urlinfo::module_ident(&request.hostname)
        );
    }

    fn report_existing_parser(&self, fixture: &FixtureRecord) {
        println!(
            "It looks like you already have a custom extractor for this url.\n\
             The page you linked to has been added to {path}. Copy and paste\n\
             the following code to use that page in your tests:\n\n    \
             let html = std::fs::read_to_string(\"{path}\")?;\n",
            path = fixture.relative_path()
        );
    }
}

/// Writes the extractor stub, the test stub, and the registry entry.
fn generate(
    registry: &mut dyn RegistryLog,
    request: &ScaffoldRequest,
    dir: &Path,
    fixture: &FixtureRecord,
    sample: &ExtractionResult,
) -> Result<ExtractorArtifactSet, ScaffoldError> {
    let extractor_path = dir.join("mod.rs");
    let test_path = dir.join("tests.rs");

    let extractor_source = templates::render_extractor(&request.hostname);
    std::fs::write(&extractor_path, extractor_source).map_err(|e| {
        ScaffoldError::io(
            extractor_path.display().to_string(),
            "GenerateExtractor",
            Some(anyhow::anyhow!(e)),
        )
    })?;

    let test_source = templates::render_extractor_test(
        &fixture.relative_path(),
        &request.url,
        &request.hostname,
        sample,
    );
    std::fs::write(&test_path, test_source).map_err(|e| {
        ScaffoldError::io(
            test_path.display().to_string(),
            "GenerateExtractorTest",
            Some(anyhow::anyhow!(e)),
        )
    })?;

    let registry_line = layout::registry_line(&request.hostname);
    registry.append(&registry_line)?;

    Ok(ExtractorArtifactSet {
        extractor_path,
        test_path,
        registry_line,
    })
}
