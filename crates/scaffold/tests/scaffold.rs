// ABOUTME: End-to-end tests for the scaffold pipeline against a mock HTTP server.
// ABOUTME: Covers branch determinism, generated artifacts, sanitization, and registry behavior.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use digests_scaffold::{RegistryLog, ScaffoldError, Scaffolder, SilentProgress};

const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Breaking News</title>
    <meta name="author" content="Jane Writer">
    <script>window.tracker = true;</script>
</head>
<body>
<img src="//cdn.example.com/lead.png">
<a href="/related">related</a>
<article><p>Body text of the article goes here.</p></article>
</body>
</html>"#;

fn scaffolder(root: &Path) -> Scaffolder {
    Scaffolder::builder()
        .root(root)
        .allow_private_networks(true)
        .progress(Box::new(SilentProgress))
        .build()
}

fn mock_article(server: &MockServer) -> String {
    server.mock(|when, then| {
        when.method(GET).path("/article");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(ARTICLE_HTML);
    });
    server.url("/article")
}

#[tokio::test]
async fn new_parser_run_creates_full_scaffold() {
    let server = MockServer::start();
    let url = mock_article(&server);
    let root = TempDir::new().unwrap();

    let outcome = scaffolder(root.path())
        .run(&url)
        .await
        .expect("run should succeed");

    assert!(outcome.new_parser);
    let hostname = &outcome.request.hostname;
    assert_eq!(hostname, "127.0.0.1");

    // Fixture: exactly one timestamped capture
    let fixture_dir = root.path().join("fixtures").join(hostname);
    let fixtures: Vec<_> = fs::read_dir(&fixture_dir).unwrap().collect();
    assert_eq!(fixtures.len(), 1);
    assert!(outcome.fixture.path.exists());

    // Extractor stub and test stub
    let extractor_dir = root
        .path()
        .join("src")
        .join("extractors")
        .join("custom")
        .join(hostname);
    let extractor_source = fs::read_to_string(extractor_dir.join("mod.rs")).unwrap();
    assert!(extractor_source.contains(&format!("domain: \"{}\".to_string()", hostname)));

    let test_source = fs::read_to_string(extractor_dir.join("tests.rs")).unwrap();
    assert!(test_source.contains(&outcome.fixture.relative_path()));
    assert!(test_source.contains(&url));
    // Sample values captured at scaffold time are embedded
    assert!(test_source.contains("Jane Writer"));

    // Registry: exactly one line for this hostname
    let registry = fs::read_to_string(root.path().join("src/extractors/custom/mod.rs")).unwrap();
    let lines: Vec<&str> = registry.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], "#[path = \"127.0.0.1/mod.rs\"] pub mod _127_0_0_1;");

    let artifacts = outcome.artifacts.expect("new-parser branch has artifacts");
    assert_eq!(artifacts.extractor_path, extractor_dir.join("mod.rs"));
    assert_eq!(artifacts.test_path, extractor_dir.join("tests.rs"));
}

#[tokio::test]
async fn fixture_is_sanitized_before_persisting() {
    let server = MockServer::start();
    let url = mock_article(&server);
    let root = TempDir::new().unwrap();

    let outcome = scaffolder(root.path()).run(&url).await.unwrap();

    let fixture = fs::read_to_string(&outcome.fixture.path).unwrap();
    assert!(!fixture.contains("<script"), "script tags must be stripped");
    assert!(
        fixture.contains("http://cdn.example.com/lead.png"),
        "protocol-relative src must be prefixed with http:"
    );
    assert!(
        fixture.contains(&format!("{}/related", server.base_url())),
        "root-relative href must be absolutized, got: {}",
        fixture
    );
    assert!(fixture.contains("Body text of the article"));
}

#[tokio::test]
async fn existing_parser_run_records_fixture_only() {
    let server = MockServer::start();
    let url = mock_article(&server);
    let root = TempDir::new().unwrap();

    // Pre-existing extractor directory marks the hostname as known
    let extractor_dir = root.path().join("src/extractors/custom/127.0.0.1");
    fs::create_dir_all(&extractor_dir).unwrap();
    fs::create_dir_all(root.path().join("fixtures/127.0.0.1")).unwrap();

    let outcome = scaffolder(root.path()).run(&url).await.unwrap();

    assert!(!outcome.new_parser);
    assert!(outcome.artifacts.is_none());
    assert!(outcome.fixture.path.exists());

    // No generated files, no registry entry
    assert!(!extractor_dir.join("mod.rs").exists());
    assert!(!extractor_dir.join("tests.rs").exists());
    assert!(!root.path().join("src/extractors/custom/mod.rs").exists());
}

#[tokio::test]
async fn second_run_takes_existing_branch() {
    let server = MockServer::start();
    let url = mock_article(&server);
    let root = TempDir::new().unwrap();

    let first = scaffolder(root.path()).run(&url).await.unwrap();
    assert!(first.new_parser);

    // Fixture filenames are epoch milliseconds; keep the runs apart.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let second = scaffolder(root.path()).run(&url).await.unwrap();
    assert!(!second.new_parser);
    assert!(second.artifacts.is_none());

    // Two fixtures captured, one registry line
    let fixture_dir = root.path().join("fixtures/127.0.0.1");
    assert_eq!(fs::read_dir(&fixture_dir).unwrap().count(), 2);
    let registry = fs::read_to_string(root.path().join("src/extractors/custom/mod.rs")).unwrap();
    assert_eq!(registry.lines().count(), 1);
}

#[tokio::test]
async fn rescaffolding_appends_duplicate_registry_line() {
    let server = MockServer::start();
    let url = mock_article(&server);
    let root = TempDir::new().unwrap();

    scaffolder(root.path()).run(&url).await.unwrap();

    // Wipe the extractor directory but keep the registry: the next run is a
    // new-parser run again and must append unconditionally.
    fs::remove_dir_all(root.path().join("src/extractors/custom/127.0.0.1")).unwrap();
    scaffolder(root.path()).run(&url).await.unwrap();

    let registry = fs::read_to_string(root.path().join("src/extractors/custom/mod.rs")).unwrap();
    let lines: Vec<&str> = registry.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], lines[1]);
}

#[tokio::test]
async fn invalid_url_is_recoverable() {
    let root = TempDir::new().unwrap();

    let err = scaffolder(root.path())
        .run("not a url at all")
        .await
        .expect_err("should reject");
    assert!(err.is_invalid_url());

    // Nothing was created
    assert!(!root.path().join("fixtures").exists());
    assert!(!root.path().join("src").exists());
}

#[tokio::test]
async fn fetch_failure_is_fatal_but_leaves_created_dirs() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/article");
        then.status(500).body("boom");
    });
    let root = TempDir::new().unwrap();

    let err = scaffolder(root.path())
        .run(&server.url("/article"))
        .await
        .expect_err("should fail on 500");
    assert!(err.is_fetch());

    // Directories were created before the fetch; no compensating cleanup
    assert!(root.path().join("src/extractors/custom/127.0.0.1").exists());
    assert!(root.path().join("fixtures/127.0.0.1").exists());
    // ...but no fixture and no generated code
    assert_eq!(
        fs::read_dir(root.path().join("fixtures/127.0.0.1"))
            .unwrap()
            .count(),
        0
    );
    assert!(!root.path().join("src/extractors/custom/mod.rs").exists());
}

/// Registry log that shares its backing store with the test.
#[derive(Clone, Default)]
struct SharedRegistry {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RegistryLog for SharedRegistry {
    fn append(&mut self, line: &str) -> Result<(), ScaffoldError> {
        self.lines.borrow_mut().push(line.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn injected_registry_log_replaces_the_file() {
    let server = MockServer::start();
    let url = mock_article(&server);
    let root = TempDir::new().unwrap();

    let registry = SharedRegistry::default();
    let mut scaffolder = Scaffolder::builder()
        .root(root.path())
        .allow_private_networks(true)
        .progress(Box::new(SilentProgress))
        .registry(Box::new(registry.clone()))
        .build();

    scaffolder.run(&url).await.unwrap();

    assert_eq!(registry.lines.borrow().len(), 1);
    assert!(registry.lines.borrow()[0].contains("_127_0_0_1"));
    // The shared registry file was never touched
    assert!(!root.path().join("src/extractors/custom/mod.rs").exists());
}
