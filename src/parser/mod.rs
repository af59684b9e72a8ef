//! Tolerant structural HTML parser
//!
//! The parser consumes a stream of HTML text and produces a canonical
//! extraction: the document title, the ordered sequence of visible body text
//! fragments, the count of structural anomalies that were tolerated, and
//! (when link collection is enabled) the candidate URLs discovered in body
//! anchors. Tokenization is delegated to html5ever; the structural rules
//! live in [`StructureParser`].

mod sink;
mod structure;

pub use structure::{Section, StructureParser, Tolerance, INVISIBLE_TAGS};

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{BufferQueue, Tokenizer, TokenizerOpts};

use crate::StructureError;
use sink::PageSink;

/// Canonical extraction from one HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// First text found inside `<title>` within the head
    pub title: Option<String>,

    /// Ordered non-blank text fragments from visible body elements
    pub content: Vec<String>,

    /// Structural anomalies tolerated during parsing
    pub problem_count: u32,

    /// Candidate link URLs from body anchors (empty unless collection is on)
    pub links: Vec<String>,
}

/// Parses an HTML document into its canonical extraction
///
/// Fails only when the configured tolerance makes a structural anomaly
/// fatal; every other malformation is counted in `problem_count`.
///
/// # Arguments
///
/// * `html` - The document text
/// * `network_location` - `host[:port]` of the owning page, used to resolve
///   root-relative hrefs
/// * `tolerance` - Structural tolerance level
/// * `collect_links` - Whether body anchors should be gathered for crawling
pub fn parse_page(
    html: &str,
    network_location: &str,
    tolerance: Tolerance,
    collect_links: bool,
) -> Result<ParsedPage, StructureError> {
    let sink = PageSink::new(tolerance, network_location, collect_links);
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from(html));

    let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    tokenizer.sink.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETLOC: &str = "example.com";

    fn parse(html: &str) -> ParsedPage {
        parse_page(html, NETLOC, Tolerance::Lenient, false).unwrap()
    }

    fn parse_with_links(html: &str) -> ParsedPage {
        parse_page(html, NETLOC, Tolerance::Lenient, true).unwrap()
    }

    #[test]
    fn test_extracts_title_and_content() {
        let html = r#"<html><head><title>Home</title></head>
            <body><h1>Welcome</h1><p>First paragraph.</p></body></html>"#;
        let parsed = parse(html);
        assert_eq!(parsed.title, Some("Home".to_string()));
        assert_eq!(
            parsed.content,
            vec!["Welcome".to_string(), "First paragraph.".to_string()]
        );
        assert_eq!(parsed.problem_count, 0);
    }

    #[test]
    fn test_reparse_is_deterministic() {
        let html = r#"<html><head><title>T</title></head>
            <body><p>one</p><div>two<span>three</span></div></body></html>"#;
        let first = parse(html);
        let second = parse(html);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invisible_content_is_excluded() {
        let html = r#"<html><head><title>T</title></head><body>
            <script>var hidden = "nope";</script>
            <style>body { color: red; }</style>
            <p>shown</p>
            </body></html>"#;
        let parsed = parse(html);
        assert_eq!(parsed.content, vec!["shown".to_string()]);
    }

    #[test]
    fn test_markup_inside_script_does_not_disturb_the_stack() {
        let html = r#"<html><head><title>T</title></head><body>
            <script>document.write("</div><p>");</script>
            <p>after</p>
            </body></html>"#;
        let parsed = parse(html);
        assert_eq!(parsed.content, vec!["after".to_string()]);
        assert_eq!(parsed.problem_count, 0);
    }

    #[test]
    fn test_entities_are_coalesced_into_one_fragment() {
        let html = r#"<html><head><title>T</title></head>
            <body><p>fish &amp; chips</p></body></html>"#;
        let parsed = parse(html);
        assert_eq!(parsed.content, vec!["fish & chips".to_string()]);
    }

    #[test]
    fn test_strict_rejects_unmatched_close() {
        let html = r#"<html><head></head><body><p>x</p></div></body></html>"#;
        let result = parse_page(html, NETLOC, Tolerance::Strict, false);
        assert!(matches!(
            result,
            Err(StructureError::MismatchedClose { .. })
        ));
    }

    #[test]
    fn test_lenient_counts_unmatched_close() {
        let html = r#"<html><head></head><body><p>x</p></div></body></html>"#;
        let parsed = parse(html);
        assert!(parsed.problem_count >= 1);
        assert_eq!(parsed.content, vec!["x".to_string()]);
    }

    #[test]
    fn test_self_closing_tag_leaves_stack_balanced() {
        let html = r#"<html><head><title>T</title></head>
            <body><p>before</p><br/><p>after</p></body></html>"#;
        let parsed = parse(html);
        assert_eq!(parsed.problem_count, 0);
        assert_eq!(
            parsed.content,
            vec!["before".to_string(), "after".to_string()]
        );
    }

    #[test]
    fn test_unclosed_tag_is_tolerated_by_auto_close() {
        // <br> without a slash stays open until </body> implicitly closes it
        let html = r#"<html><head><title>T</title></head>
            <body>first<br>second</body></html>"#;
        let parsed = parse_page(html, NETLOC, Tolerance::AutoClose, false).unwrap();
        assert_eq!(parsed.problem_count, 1);
        assert_eq!(
            parsed.content,
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn test_collects_eligible_links() {
        let html = r#"<html><head><title>T</title></head><body>
            <a href="http://other.com/page">absolute</a>
            <a href="/local">rooted</a>
            <a href="bare.com/x">schemeless</a>
            </body></html>"#;
        let parsed = parse_with_links(html);
        assert_eq!(
            parsed.links,
            vec![
                "http://other.com/page".to_string(),
                "http://example.com/local".to_string(),
                "http://bare.com/x".to_string(),
            ]
        );
    }

    #[test]
    fn test_skips_ineligible_hrefs() {
        let html = r##"<html><head><title>T</title></head><body>
            <a href="">blank</a>
            <a href="/">self</a>
            <a href="#section">fragment</a>
            <a>missing</a>
            </body></html>"##;
        let parsed = parse_with_links(html);
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_anchors_outside_body_are_not_collected() {
        let html = r#"<html><head><title>T</title>
            <a href="http://other.com/">stray</a></head>
            <body></body></html>"#;
        let parsed = parse_with_links(html);
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_links_not_collected_when_disabled() {
        let html = r#"<html><head><title>T</title></head><body>
            <a href="http://other.com/">link</a></body></html>"#;
        let parsed = parse(html);
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_first_disqualified_href_ends_the_scan() {
        // duplicate href attributes: only the first is ever considered
        let html = r##"<html><head><title>T</title></head><body>
            <a href="#" href="http://other.com/">dupe</a></body></html>"##;
        let parsed = parse_with_links(html);
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_misplaced_head_fatal_at_auto_close() {
        let html = r#"<html><head></head><body><head></head></body></html>"#;
        let result = parse_page(html, NETLOC, Tolerance::AutoClose, false);
        assert!(matches!(
            result,
            Err(StructureError::MisplacedSection { .. })
        ));
    }

    #[test]
    fn test_title_via_rcdata_keeps_entities() {
        let html = r#"<html><head><title>Fish &amp; Chips</title></head>
            <body></body></html>"#;
        let parsed = parse(html);
        assert_eq!(parsed.title, Some("Fish & Chips".to_string()));
    }
}
