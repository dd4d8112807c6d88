//! Content page parser.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::preamble::{extract_preamble, Preamble, PreambleError};

/// A parsed content page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Parsed preamble
    pub preamble: Preamble,

    /// Markdown body (without preamble)
    pub body: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Parse a content page.
///
/// Extracts the preamble and collects the headings of the body.
pub fn parse_page(source: &str) -> Result<Page, PreambleError> {
    let (preamble, body) = extract_preamble(source)?;

    let mut toc = Vec::new();
    // (level, explicit id, text)
    let mut current_heading: Option<(u8, Option<String>, String)> = None;

    for event in Parser::new_ext(body, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current_heading = Some((level as u8, id.map(|id| id.to_string()), String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, id, title)) = current_heading.take() {
                    let id = id.unwrap_or_else(|| slugify(&title));
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    Ok(Page {
        preamble,
        body: body.to_string(),
        toc,
    })
}

impl Page {
    /// Render the markdown body to HTML.
    ///
    /// Headings without an explicit id get the same slug as their TOC entry.
    pub fn body_html(&self) -> String {
        let mut events: Vec<Event<'_>> = Parser::new_ext(&self.body, markdown_options()).collect();

        for i in 0..events.len() {
            if !matches!(&events[i], Event::Start(Tag::Heading { id: None, .. })) {
                continue;
            }
            let slug = slugify(&heading_text(&events[i + 1..]));
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(slug));
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        html_output
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Text of a heading, given the events that follow its start tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::End(TagEnd::Heading(_)) => break,
            _ => {}
        }
    }
    text
}

/// Convert a heading to a URL-safe slug.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
