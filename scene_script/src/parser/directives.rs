//! `{{TAG: content}}` directives.
//!
//! The tag set is closed ([`DirectiveTag`]); anything else between double
//! braces is literal text. Media, AI-context and routing directives are lifted
//! into their maps and cut out of the text, staging cues stay where they are.

use log::debug;

use scene_data::{AiMap, AiValue, Directive, DirectiveTag, MediaMap, MediaValue, RouterConfig};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Output of the directive pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveScan {
    pub media: MediaMap,
    pub ai: AiMap,
    /// Input text minus every extracted directive span.
    pub text: String,
}

/// What the scanner found at one `{{`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scanned {
    Recognized { directive: Directive, end: usize },
    PassThrough,
}

/// Where a recognized directive ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    Media(MediaValue),
    Ai(AiValue),
    Inline,
    Dropped,
}

/// Lift directives out of a raw passage body.
///
/// Repeated tags overwrite earlier ones. A `ROUTER` with fewer than four
/// fields is dropped, and its span still disappears from the text.
pub fn extract_directives(raw: &str) -> DirectiveScan {
    let mut scan = DirectiveScan::default();
    let mut copied = 0;
    let mut from = 0;

    while let Some(rel) = raw[from..].find(OPEN) {
        let start = from + rel;
        let (directive, end) = match scan_directive(raw, start) {
            Scanned::Recognized { directive, end } => (directive, end),
            Scanned::PassThrough => {
                // retry one byte later so `{{{IMG: x}}` still matches
                from = start + 1;
                continue;
            },
        };
        from = end;

        let key = directive.tag.name().to_string();
        match place(&directive) {
            Placement::Media(value) => {
                scan.media.insert(key, value);
            },
            Placement::Ai(value) => {
                scan.ai.insert(key, value);
            },
            Placement::Inline => continue,
            Placement::Dropped => {
                debug!("dropping {} directive with too few fields: {:?}", key, directive.content);
            },
        }
        scan.text.push_str(&raw[copied..start]);
        copied = end;
    }

    scan.text.push_str(&raw[copied..]);
    scan
}

fn scan_directive(raw: &str, start: usize) -> Scanned {
    let name_start = start + OPEN.len();
    let name_len = raw[name_start..]
        .bytes()
        .take_while(|b| b.is_ascii_uppercase() || *b == b'_')
        .count();
    let colon = name_start + name_len;
    if !raw[colon..].starts_with(':') {
        return Scanned::PassThrough;
    }
    let Some(tag) = DirectiveTag::from_name(&raw[name_start..colon]) else {
        return Scanned::PassThrough;
    };
    let body_start = colon + 1;
    let Some(close_rel) = raw[body_start..].find(CLOSE) else {
        return Scanned::PassThrough;
    };
    let body_end = body_start + close_rel;
    Scanned::Recognized {
        directive: Directive {
            tag,
            content: raw[body_start..body_end].trim().to_string(),
        },
        end: body_end + CLOSE.len(),
    }
}

fn place(directive: &Directive) -> Placement {
    match directive.tag {
        tag if tag.is_ai_context() => Placement::Ai(AiValue::Text(directive.content.clone())),
        DirectiveTag::Chars => Placement::Media(MediaValue::List(split_fields(&directive.content))),
        DirectiveTag::Router => parse_router(&directive.content).map_or(Placement::Dropped, |router| {
            Placement::Ai(AiValue::Router(router))
        }),
        tag if !tag.is_hidden() => Placement::Inline,
        _ => Placement::Media(MediaValue::Single(directive.content.clone())),
    }
}

fn split_fields(content: &str) -> Vec<String> {
    content.split(',').map(|field| field.trim().to_string()).collect()
}

/// `variable, value, targetTrue, targetFalse`; fields past the fourth are ignored.
fn parse_router(content: &str) -> Option<RouterConfig> {
    let mut fields = split_fields(content).into_iter();
    let (variable, value, target_true, target_false) =
        (fields.next()?, fields.next()?, fields.next()?, fields.next()?);
    Some(RouterConfig {
        variable,
        value,
        target_true,
        target_false,
    })
}
