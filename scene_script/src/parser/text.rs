//! Final clean-up of display text.

use super::helpers::strip_spans;
use crate::PARAGRAPH_BREAK;

/// Strip leftover `<<…>>` macros, unify line endings and mark paragraph breaks.
///
/// Runs of two or more consecutive newlines become one [`PARAGRAPH_BREAK`];
/// single newlines are kept. The whole text is trimmed last, so a blank-line
/// run at either end still leaves its marker.
pub fn normalize_text(text: &str) -> String {
    let text = strip_spans(text, "<<", ">>");
    let text = text.replace("\r\n", "\n");
    collapse_blank_lines(&text).trim().to_string()
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find("\n\n") {
        out.push_str(&rest[..at]);
        out.push_str(PARAGRAPH_BREAK);
        rest = rest[at..].trim_start_matches('\n');
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_lines_collapse_to_one_break() {
        assert_eq!(normalize_text("Un\n\nDous"), "Un{{BR}}Dous");
        assert_eq!(normalize_text("Un\n\n\n\nDous"), "Un{{BR}}Dous");
    }

    #[test]
    fn lines_with_only_spaces_are_not_blank() {
        assert_eq!(normalize_text("Un\n   \nDous"), "Un\n   \nDous");
        assert_eq!(normalize_text("Un\n\t\n\nDous"), "Un\n\t{{BR}}Dous");
    }

    #[test]
    fn single_newlines_survive() {
        assert_eq!(normalize_text("MANUELA: Ola\nCONCHA: Boas"), "MANUELA: Ola\nCONCHA: Boas");
    }

    #[test]
    fn crlf_is_normalized_before_collapsing() {
        assert_eq!(normalize_text("Un\r\n\r\nDous\r\nTres"), "Un{{BR}}Dous\nTres");
    }

    #[test]
    fn leftover_macros_are_removed() {
        assert_eq!(
            normalize_text("<<set $estado.trama.oro to 5>>Texto<<run Engine.play()>>"),
            "Texto"
        );
        assert_eq!(normalize_text("a <<if $x gt 1>>b<</if>> c"), "a b c");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_text("  \n Texto limpo \n"), "Texto limpo");
    }

    #[test]
    fn blank_runs_at_the_ends_keep_their_break() {
        assert_eq!(normalize_text("\n\nHola"), "{{BR}}Hola");
        assert_eq!(normalize_text("Hola\n\n"), "Hola{{BR}}");
        assert_eq!(normalize_text("  \n Texto limpo \n\n"), "Texto limpo {{BR}}");
    }

    #[test]
    fn trailing_spaces_before_a_single_newline_are_kept() {
        assert_eq!(normalize_text("a  \n  b"), "a  \n  b");
    }
}
