//! `<<if>> … <<else>> … <</if>>` blocks.
//!
//! A recognized block is flattened into `{{IF:var=value}}`, `{{ELSE}}` and
//! `{{ENDIF}}` markers separated by paragraph breaks, so both branches reach
//! the renderer and the choice between them is made at display time.
//!
//! Blocks do not nest: the first `<</if>>` after a header closes it.

use log::debug;

use super::parse_if_header;
use crate::PARAGRAPH_BREAK;

const IF_OPEN: &str = "<<if";
const MACRO_CLOSE: &str = ">>";
const ELSE: &str = "<<else>>";
const END_IF: &str = "<</if>>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expansion {
    Recognized { rewrite: String, end: usize },
    PassThrough,
}

/// Rewrite every recognized conditional block as an inline marker sequence.
pub fn expand_conditionals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut from = 0;

    while let Some(rel) = text[from..].find(IF_OPEN) {
        let start = from + rel;
        match scan_block(text, start) {
            Expansion::Recognized { rewrite, end } => {
                out.push_str(&text[copied..start]);
                out.push_str(&rewrite);
                copied = end;
                from = end;
            },
            Expansion::PassThrough => from = start + IF_OPEN.len(),
        }
    }

    out.push_str(&text[copied..]);
    out
}

fn scan_block(text: &str, start: usize) -> Expansion {
    let header_start = start + "<<".len();
    let Some(header_len) = text[header_start..].find(MACRO_CLOSE) else {
        return Expansion::PassThrough;
    };
    let header_end = header_start + header_len;
    let header = match parse_if_header(&text[header_start..header_end]) {
        Ok(header) => header,
        Err(e) => {
            debug!("leaving conditional unexpanded: {e}");
            return Expansion::PassThrough;
        },
    };

    let body_start = header_end + MACRO_CLOSE.len();
    let Some(body_len) = text[body_start..].find(END_IF) else {
        debug!("conditional on '{}' has no {END_IF}", header.variable);
        return Expansion::PassThrough;
    };
    let body = &text[body_start..body_start + body_len];
    let (if_body, else_body) = match body.split_once(ELSE) {
        Some((if_body, else_body)) => (if_body, Some(else_body)),
        None => (body, None),
    };

    let mut rewrite = format!(
        "{{{{IF:{}={}}}}}{PARAGRAPH_BREAK}{}",
        header.variable,
        header.value,
        if_body.trim()
    );
    if let Some(else_body) = else_body {
        rewrite.push_str(PARAGRAPH_BREAK);
        rewrite.push_str("{{ELSE}}");
        rewrite.push_str(PARAGRAPH_BREAK);
        rewrite.push_str(else_body.trim());
    }
    rewrite.push_str(PARAGRAPH_BREAK);
    rewrite.push_str("{{ENDIF}}");

    Expansion::Recognized {
        rewrite,
        end: body_start + body_len + END_IF.len(),
    }
}
