//! Structural-validity state machine
//!
//! This module tracks document structure while a tokenizer walks the HTML:
//! which section (`<head>` or `<body>`) is open, the stack of currently open
//! tags, and a running count of structural anomalies. The configured
//! [`Tolerance`] decides which anomalies are fatal and which are merely
//! counted.

use crate::StructureError;

/// Body-level elements whose text content is not rendered to the user
pub const INVISIBLE_TAGS: &[&str] = &["script", "style", "meta", "link", "template", "iframe"];

/// The document section currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Head,
    Body,
}

impl Section {
    fn tag_name(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
        }
    }

    /// The ordinal this section is expected to open at (head first, body second)
    fn expected_ordinal(&self) -> u32 {
        match self {
            Self::Head => 1,
            Self::Body => 2,
        }
    }
}

/// Leniency level for structural anomalies
///
/// - `Strict`: any anomaly is fatal
/// - `AutoClose`: head/body misuse is fatal; mismatched or unclosed tags are
///   tolerated by implicitly closing down to the matching open tag
/// - `Lenient`: nothing is fatal, every anomaly is just counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tolerance {
    Strict,
    AutoClose,
    #[default]
    Lenient,
}

impl Tolerance {
    /// Maps a numeric level (0, 1, 2) to a tolerance
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Strict),
            1 => Some(Self::AutoClose),
            2 => Some(Self::Lenient),
            _ => None,
        }
    }

    fn section_anomaly_is_fatal(self) -> bool {
        !matches!(self, Self::Lenient)
    }

    fn mismatch_is_fatal(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Stateful structural parser fed by tag/text events
///
/// The caller drives it through [`open_tag`](Self::open_tag),
/// [`close_tag`](Self::close_tag) and [`text`](Self::text); any
/// standards-conformant tokenizer can supply the events.
#[derive(Debug)]
pub struct StructureParser {
    tolerance: Tolerance,
    section: Option<Section>,
    section_count: u32,
    tag_stack: Vec<String>,
    title: Option<String>,
    content: Vec<String>,
    problem_count: u32,
}

impl StructureParser {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            section: None,
            section_count: 0,
            tag_stack: Vec::new(),
            title: None,
            content: Vec::new(),
            problem_count: 0,
        }
    }

    /// The innermost currently open tag, if any
    pub fn current_tag(&self) -> Option<&str> {
        self.tag_stack.last().map(String::as_str)
    }

    pub fn in_body(&self) -> bool {
        self.section == Some(Section::Body)
    }

    pub fn problem_count(&self) -> u32 {
        self.problem_count
    }

    /// Handles an opening tag
    ///
    /// The tag is pushed onto the stack first; `<head>` and `<body>` then go
    /// through the section bookkeeping, which may fail at tolerances below
    /// `Lenient`.
    pub fn open_tag(&mut self, name: &str, line: u64) -> Result<(), StructureError> {
        self.tag_stack.push(name.to_string());
        match name {
            "head" => self.enter_section(Section::Head, line),
            "body" => self.enter_section(Section::Body, line),
            _ => Ok(()),
        }
    }

    fn enter_section(&mut self, section: Section, line: u64) -> Result<(), StructureError> {
        self.section_count += 1;
        if self.section.is_some() || self.section_count != section.expected_ordinal() {
            self.problem_count += 1;
            if self.tolerance.section_anomaly_is_fatal() {
                return Err(StructureError::MisplacedSection {
                    tag: section.tag_name().to_string(),
                    line,
                });
            }
        }
        self.section = Some(section);
        Ok(())
    }

    /// Handles a closing tag
    ///
    /// A close matching the innermost open tag pops it. A mismatched close is
    /// an anomaly: fatal at `Strict`; otherwise, when the tag is open further
    /// down the stack, everything above it is implicitly closed along with it,
    /// and when it is not open at all the close is ignored.
    pub fn close_tag(&mut self, name: &str, line: u64) -> Result<(), StructureError> {
        if self.current_tag() == Some(name) {
            self.tag_stack.pop();
            if is_section_tag(name) {
                self.section = None;
            }
            return Ok(());
        }

        self.problem_count += 1;
        if self.tolerance.mismatch_is_fatal() {
            return Err(StructureError::MismatchedClose {
                tag: name.to_string(),
                line,
            });
        }

        if let Some(position) = self.tag_stack.iter().rposition(|tag| tag == name) {
            let closed: Vec<String> = self.tag_stack.drain(position..).collect();
            if closed.iter().any(|tag| is_section_tag(tag)) {
                self.section = None;
            }
        }
        Ok(())
    }

    /// Handles coalesced character data
    ///
    /// Inside the head, text under a `<title>` becomes the title (last one
    /// wins). Inside the body, non-blank text under a visible tag is appended
    /// to the content sequence.
    pub fn text(&mut self, data: &str) {
        let trimmed = data.trim();
        if trimmed.is_empty() {
            return;
        }
        match self.section {
            Some(Section::Head) => {
                if self.current_tag() == Some("title") {
                    self.title = Some(trimmed.to_string());
                }
            }
            Some(Section::Body) => {
                let visible = self
                    .current_tag()
                    .map(|tag| !INVISIBLE_TAGS.contains(&tag))
                    .unwrap_or(true);
                if visible {
                    self.content.push(trimmed.to_string());
                }
            }
            None => {}
        }
    }

    /// Consumes the parser, yielding the extraction
    pub fn into_parts(self) -> (Option<String>, Vec<String>, u32) {
        (self.title, self.content, self.problem_count)
    }
}

fn is_section_tag(name: &str) -> bool {
    name == "head" || name == "body"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_clean_document(parser: &mut StructureParser) {
        parser.open_tag("html", 1).unwrap();
        parser.open_tag("head", 1).unwrap();
        parser.open_tag("title", 1).unwrap();
        parser.text("Home");
        parser.close_tag("title", 1).unwrap();
        parser.close_tag("head", 1).unwrap();
        parser.open_tag("body", 2).unwrap();
        parser.text("Hello");
        parser.close_tag("body", 2).unwrap();
        parser.close_tag("html", 2).unwrap();
    }

    #[test]
    fn test_clean_document_has_no_problems() {
        let mut parser = StructureParser::new(Tolerance::Strict);
        walk_clean_document(&mut parser);
        let (title, content, problems) = parser.into_parts();
        assert_eq!(title, Some("Home".to_string()));
        assert_eq!(content, vec!["Hello".to_string()]);
        assert_eq!(problems, 0);
    }

    #[test]
    fn test_duplicate_head_is_an_anomaly() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("head", 1).unwrap();
        parser.close_tag("head", 1).unwrap();
        parser.open_tag("head", 2).unwrap();
        assert_eq!(parser.problem_count(), 1);
    }

    #[test]
    fn test_duplicate_head_fatal_below_lenient() {
        let mut parser = StructureParser::new(Tolerance::AutoClose);
        parser.open_tag("head", 1).unwrap();
        parser.close_tag("head", 1).unwrap();
        let err = parser.open_tag("head", 2).unwrap_err();
        assert_eq!(
            err,
            StructureError::MisplacedSection {
                tag: "head".to_string(),
                line: 2
            }
        );
    }

    #[test]
    fn test_body_before_head_is_an_anomaly() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("body", 1).unwrap();
        assert_eq!(parser.problem_count(), 1);
        // the section still opens so body text is not lost
        assert!(parser.in_body());
    }

    #[test]
    fn test_nested_section_is_an_anomaly() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("head", 1).unwrap();
        parser.open_tag("body", 1).unwrap();
        assert_eq!(parser.problem_count(), 1);
    }

    #[test]
    fn test_mismatched_close_fatal_at_strict() {
        let mut parser = StructureParser::new(Tolerance::Strict);
        parser.open_tag("html", 1).unwrap();
        let err = parser.close_tag("div", 3).unwrap_err();
        assert_eq!(
            err,
            StructureError::MismatchedClose {
                tag: "div".to_string(),
                line: 3
            }
        );
    }

    #[test]
    fn test_mismatched_close_auto_closes_intermediates() {
        let mut parser = StructureParser::new(Tolerance::AutoClose);
        parser.open_tag("html", 1).unwrap();
        parser.open_tag("head", 1).unwrap();
        parser.close_tag("head", 1).unwrap();
        parser.open_tag("body", 1).unwrap();
        parser.open_tag("div", 2).unwrap();
        parser.open_tag("span", 2).unwrap();
        parser.close_tag("div", 3).unwrap();
        assert_eq!(parser.problem_count(), 1);
        assert_eq!(parser.current_tag(), Some("body"));
    }

    #[test]
    fn test_unknown_close_is_ignored() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("html", 1).unwrap();
        parser.close_tag("p", 2).unwrap();
        assert_eq!(parser.problem_count(), 1);
        assert_eq!(parser.current_tag(), Some("html"));
    }

    #[test]
    fn test_implicit_close_clears_section() {
        let mut parser = StructureParser::new(Tolerance::AutoClose);
        parser.open_tag("html", 1).unwrap();
        parser.open_tag("head", 1).unwrap();
        parser.close_tag("head", 1).unwrap();
        parser.open_tag("body", 1).unwrap();
        parser.open_tag("div", 2).unwrap();
        // closing html implicitly closes div and body
        parser.close_tag("html", 5).unwrap();
        assert!(!parser.in_body());
        assert_eq!(parser.current_tag(), None);
    }

    #[test]
    fn test_title_last_text_wins() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("head", 1).unwrap();
        parser.open_tag("title", 1).unwrap();
        parser.text("First");
        parser.text("Second");
        assert_eq!(parser.into_parts().0, Some("Second".to_string()));
    }

    #[test]
    fn test_title_outside_head_is_not_captured() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("head", 1).unwrap();
        parser.close_tag("head", 1).unwrap();
        parser.open_tag("body", 1).unwrap();
        parser.open_tag("title", 2).unwrap();
        parser.text("Stray");
        let (title, content, _) = parser.into_parts();
        assert_eq!(title, None);
        // body text under a visible tag is still content
        assert_eq!(content, vec!["Stray".to_string()]);
    }

    #[test]
    fn test_invisible_tag_suppresses_body_text() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("head", 1).unwrap();
        parser.close_tag("head", 1).unwrap();
        parser.open_tag("body", 1).unwrap();
        parser.open_tag("script", 2).unwrap();
        parser.text("var x = 1;");
        parser.close_tag("script", 2).unwrap();
        parser.text("visible");
        let (_, content, _) = parser.into_parts();
        assert_eq!(content, vec!["visible".to_string()]);
    }

    #[test]
    fn test_blank_text_is_skipped() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("head", 1).unwrap();
        parser.close_tag("head", 1).unwrap();
        parser.open_tag("body", 1).unwrap();
        parser.text("  \n\t ");
        assert!(parser.into_parts().1.is_empty());
    }

    #[test]
    fn test_text_outside_sections_is_dropped() {
        let mut parser = StructureParser::new(Tolerance::Lenient);
        parser.open_tag("html", 1).unwrap();
        parser.text("stray");
        assert!(parser.into_parts().1.is_empty());
    }

    #[test]
    fn test_tolerance_from_level() {
        assert_eq!(Tolerance::from_level(0), Some(Tolerance::Strict));
        assert_eq!(Tolerance::from_level(1), Some(Tolerance::AutoClose));
        assert_eq!(Tolerance::from_level(2), Some(Tolerance::Lenient));
        assert_eq!(Tolerance::from_level(3), None);
    }
}
