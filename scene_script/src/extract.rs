//! Passage extraction from a published Twine 2 HTML story.
//!
//! Twine stores every passage as a `<tw-passagedata name="…">` element whose
//! body is the HTML-escaped passage source. Only names and bodies are needed
//! here; story metadata is read for progress messages.

use scene_data::Passage;
use thiserror::Error;

const PASSAGE_OPEN: &str = "<tw-passagedata";
const PASSAGE_CLOSE: &str = "</tw-passagedata>";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("malformed <tw-passagedata> element at byte {0}")]
    MalformedPassage(usize),
    #[error("no <tw-passagedata> elements found")]
    NoPassages,
}

/// Passages of one story document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDocument {
    /// `name` attribute of `<tw-storydata>`, when present.
    pub title: Option<String>,
    pub passages: Vec<Passage>,
}

/// Pull every passage out of Twine HTML.
///
/// # Errors
/// Fails when a passage start tag never closes or when the document holds
/// no passages at all.
pub fn extract_story(html: &str) -> Result<StoryDocument, ExtractError> {
    let title = html.find("<tw-storydata").and_then(|start| {
        let tag_end = html[start..].find('>')?;
        extract_attr(&html[start..start + tag_end], "name")
    });

    let mut passages = Vec::new();
    let mut search_from = 0;
    while let Some(rel) = html[search_from..].find(PASSAGE_OPEN) {
        let abs_start = search_from + rel;
        let tag_end = html[abs_start..]
            .find('>')
            .ok_or(ExtractError::MalformedPassage(abs_start))?;
        let tag = &html[abs_start..abs_start + tag_end];
        let name = extract_attr(tag, "name").unwrap_or_default();

        // body runs up to the closing tag, or to the end of a truncated file
        let content_start = abs_start + tag_end + 1;
        let content_end = html[content_start..]
            .find(PASSAGE_CLOSE)
            .map_or(html.len(), |i| content_start + i);
        passages.push(Passage::new(name, decode_html_entities(&html[content_start..content_end])));

        search_from = (content_end + PASSAGE_CLOSE.len()).min(html.len());
    }

    if passages.is_empty() {
        return Err(ExtractError::NoPassages);
    }
    Ok(StoryDocument { title, passages })
}

/// Value of `attr_name="…"` or `attr_name='…'` inside a start tag.
fn extract_attr(tag: &str, attr_name: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let pattern = format!(" {attr_name}={quote}");
        if let Some(start) = tag.find(&pattern) {
            let value_start = start + pattern.len();
            if let Some(end) = tag[value_start..].find(quote) {
                return Some(decode_html_entities(&tag[value_start..value_start + end]));
            }
        }
    }
    None
}

fn decode_html_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}
