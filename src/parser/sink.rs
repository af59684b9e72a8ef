//! html5ever token sink driving the structural parser
//!
//! The sink translates tokenizer events into `open_tag`/`close_tag`/`text`
//! calls on [`StructureParser`], buffers character data so adjacent chunks
//! (split around entity references) are delivered as one fragment, switches
//! the tokenizer into the raw-text states for elements whose contents are
//! not markup, and collects candidate link URLs from body anchors.

use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{Tag, TagKind, Token, TokenSink, TokenSinkResult};

use super::structure::StructureParser;
use super::ParsedPage;
use crate::parser::Tolerance;
use crate::url::resolve_href;
use crate::StructureError;

pub struct PageSink {
    structure: StructureParser,
    pending_text: String,
    links: Vec<String>,
    collect_links: bool,
    network_location: String,
    error: Option<StructureError>,
}

impl PageSink {
    pub fn new(tolerance: Tolerance, network_location: &str, collect_links: bool) -> Self {
        Self {
            structure: StructureParser::new(tolerance),
            pending_text: String::new(),
            links: Vec::new(),
            collect_links,
            network_location: network_location.to_string(),
            error: None,
        }
    }

    /// Consumes the sink into the extraction, or the first fatal error
    pub fn finish(self) -> Result<ParsedPage, StructureError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let (title, content, problem_count) = self.structure.into_parts();
        Ok(ParsedPage {
            title,
            content,
            problem_count,
            links: self.links,
        })
    }

    fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// Delivers buffered text using the state in effect while it was collected
    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        if !self.failed() {
            self.structure.text(&text);
        }
    }

    fn handle_tag(&mut self, tag: Tag, line: u64) -> TokenSinkResult<()> {
        self.flush_text();
        if self.failed() {
            return TokenSinkResult::Continue;
        }
        let name: &str = &tag.name;
        match tag.kind {
            TagKind::StartTag => {
                if let Err(error) = self.structure.open_tag(name, line) {
                    self.error = Some(error);
                    return TokenSinkResult::Continue;
                }
                if name == "a" && self.collect_links && self.structure.in_body() {
                    self.collect_anchor(&tag);
                }
                if tag.self_closing {
                    // delivered as open immediately followed by close
                    if let Err(error) = self.structure.close_tag(name, line) {
                        self.error = Some(error);
                    }
                    return TokenSinkResult::Continue;
                }
                raw_state_for(name)
            }
            TagKind::EndTag => {
                if let Err(error) = self.structure.close_tag(name, line) {
                    self.error = Some(error);
                }
                TokenSinkResult::Continue
            }
        }
    }

    /// Scans an anchor's attributes for a followable link
    ///
    /// Only the first `href`-bearing attribute of a tag is considered.
    fn collect_anchor(&mut self, tag: &Tag) {
        let href = tag.attrs.iter().find(|attr| &*attr.name.local == "href");
        if let Some(attr) = href {
            if let Some(link) = resolve_href(&attr.value, &self.network_location) {
                self.links.push(link);
            }
        }
    }
}

impl TokenSink for PageSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => self.handle_tag(tag, line_number),
            Token::CharacterTokens(text) => {
                self.pending_text.push_str(&text);
                TokenSinkResult::Continue
            }
            Token::EOFToken => {
                self.flush_text();
                TokenSinkResult::Continue
            }
            Token::ParseError(message) => {
                tracing::trace!(line = line_number, "tokenizer error: {}", message);
                TokenSinkResult::Continue
            }
            Token::DoctypeToken(_) | Token::CommentToken(_) | Token::NullCharacterToken => {
                TokenSinkResult::Continue
            }
        }
    }
}

/// Tokenizer state switch for elements whose contents are not markup
fn raw_state_for(name: &str) -> TokenSinkResult<()> {
    match name {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        _ => TokenSinkResult::Continue,
    }
}
