// ABOUTME: Pure string templates for generated extractor stubs and their test stubs.
// ABOUTME: No side effects; the orchestrator writes the rendered text to disk.

//! Code generation templates.
//!
//! `render_extractor` produces the per-hostname extractor module stub and
//! `render_extractor_test` a matching test stub seeded with the values the
//! sample extraction captured at scaffold time. Both are plain string
//! rendering; templates are data, not logic.

use crate::extract::ExtractionResult;

/// Renders the extractor module stub for a hostname.
///
/// The stub targets the parser's custom-extractor types; selector lists are
/// left empty for the developer to fill in.
pub fn render_extractor(hostname: &str) -> String {
    format!(
        r#"// Custom extractor for {hostname}.
//
// Fill in the selectors below, then iterate on the tests in tests.rs against
// the captured fixture until they pass.

use crate::extractors::custom::{{CustomExtractor, FieldExtractor, SelectorSpec}};

pub fn extractor() -> CustomExtractor {{
    CustomExtractor {{
        domain: "{hostname}".to_string(),
        title: Some(FieldExtractor {{
            // e.g. SelectorSpec::Css("h1.headline".to_string())
            selectors: vec![],
            ..Default::default()
        }}),
        author: Some(FieldExtractor {{
            selectors: vec![],
            ..Default::default()
        }}),
        date_published: Some(FieldExtractor {{
            selectors: vec![],
            ..Default::default()
        }}),
        lead_image_url: Some(FieldExtractor {{
            selectors: vec![],
            ..Default::default()
        }}),
        // Add a ContentExtractor with content selectors and clean rules
        content: None,
        ..Default::default()
    }}
}}

#[cfg(test)]
mod tests;
"#
    )
}

/// Renders the test module stub for a freshly scaffolded extractor.
///
/// The captured extraction sample is embedded as JSON so the developer can
/// turn it into assertions as selectors get filled in.
pub fn render_extractor_test(
    fixture_path: &str,
    url: &str,
    hostname: &str,
    result: &ExtractionResult,
) -> String {
    let sample = serde_json::to_string_pretty(result)
        .unwrap_or_else(|_| "{}".to_string())
        .lines()
        .map(|l| format!("// {}", l))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"// Regression test for the {hostname} extractor.
//
// The fixture below was captured from
//   {url}
// at scaffold time. The commented block is the sample the generic pass
// extracted from it; once the selectors in mod.rs are filled in, parse the
// fixture and assert each field against these values.
//
{sample}

use super::extractor;

#[test]
fn extracts_article_fields() {{
    let html = std::fs::read_to_string("{fixture_path}").expect("fixture should exist");
    assert!(!html.is_empty());

    let ext = extractor();
    assert_eq!(ext.domain, "{hostname}");

    // TODO: parse `html` with the filled-in extractor and assert the
    // captured sample values above.
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ExtractionResult {
        ExtractionResult {
            url: "https://example.com/article".to_string(),
            domain: "example.com".to_string(),
            title: Some("Sample Article".to_string()),
            author: Some("Jane Writer".to_string()),
            date_published: None,
            excerpt: None,
            word_count: 6,
        }
    }

    #[test]
    fn extractor_stub_names_the_domain() {
        let source = render_extractor("example.com");
        assert!(source.contains(r#"domain: "example.com".to_string()"#));
        assert!(source.contains("CustomExtractor"));
        assert!(source.contains("#[cfg(test)]\nmod tests;"));
    }

    #[test]
    fn test_stub_embeds_fixture_url_and_sample() {
        let source = render_extractor_test(
            "fixtures/example.com/1700000000000.html",
            "https://example.com/article",
            "example.com",
            &sample_result(),
        );
        assert!(source.contains("fixtures/example.com/1700000000000.html"));
        assert!(source.contains("https://example.com/article"));
        assert!(source.contains("Sample Article"));
        assert!(source.contains("Jane Writer"));
        assert!(source.contains("fn extracts_article_fields"));
    }
}
