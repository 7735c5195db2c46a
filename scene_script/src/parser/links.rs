//! `[[…]]` links into choices.
//!
//! Accepted shapes:
//! - `[[Target]]`
//! - `[[Label->Target]]` and `[[Label|Target]]`
//! - any of the above followed by `][code]`, where the code may hold a
//!   `$estado.trama.<name> = value` (or `is value`) setter.

use log::debug;

use scene_data::{Choice, StateChange};

use super::helpers::spans;
use super::parse_assignment;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";
const CODE_SEPARATOR: &str = "][";

/// Output of the link pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkScan {
    /// One choice per link, in source order.
    pub choices: Vec<Choice>,
    /// Input text with every link span removed.
    pub text: String,
}

/// Collect every link as a choice and cut the spans out of the text.
///
/// A link whose setter cannot be read still becomes a choice, just without a
/// state change.
pub fn extract_links(text: &str) -> LinkScan {
    let mut scan = LinkScan::default();
    let mut copied = 0;
    for span in spans(text, OPEN, CLOSE) {
        scan.choices.push(parse_link(span.inner(text)));
        scan.text.push_str(&text[copied..span.start]);
        copied = span.end;
    }
    scan.text.push_str(&text[copied..]);
    scan
}

/// Turn the inside of one `[[…]]` span into a choice.
pub fn parse_link(content: &str) -> Choice {
    let (link_part, code) = match content.split_once(CODE_SEPARATOR) {
        Some((link_part, code)) => (link_part, Some(code.replace(']', ""))),
        None => (content, None),
    };
    let (label, target) = split_label_target(link_part);
    let state_change = code.as_deref().map(str::trim).and_then(read_setter);
    Choice {
        label,
        target,
        state_change,
    }
}

/// Split on whichever of `->` or `|` comes first.
fn split_label_target(part: &str) -> (String, String) {
    let split = match (part.find("->"), part.find('|')) {
        (Some(arrow), Some(pipe)) if pipe < arrow => Some((pipe, 1)),
        (Some(arrow), _) => Some((arrow, 2)),
        (None, Some(pipe)) => Some((pipe, 1)),
        (None, None) => None,
    };
    match split {
        Some((at, width)) => (part[..at].trim().to_string(), part[at + width..].trim().to_string()),
        None => {
            let whole = part.trim().to_string();
            (whole.clone(), whole)
        },
    }
}

fn read_setter(code: &str) -> Option<StateChange> {
    if code.is_empty() {
        return None;
    }
    match parse_assignment(code) {
        Ok(change) => Some(change),
        Err(e) => {
            debug!("link code {code:?} sets no story state: {e}");
            None
        },
    }
}
