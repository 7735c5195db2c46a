//! Passage markup stages and the PEG sub-grammars they share.
//!
//! Each stage scans for its own span shape (`{{ }}`, `<<if>>`, `[[ ]]`,
//! `<< >>`) and hands the inside of a span to the Pest rules in
//! `grammar.pest` when the span carries structure. Nothing here fails a
//! passage: a span that does not fit its grammar passes through as text.

use pest::Parser;
use pest_derive::Parser as PestParser;

use scene_data::{StateChange, StateValue};

pub mod conditionals;
pub mod directives;
pub mod links;
pub mod text;

mod helpers;

pub use conditionals::expand_conditionals;
pub use directives::{DirectiveScan, extract_directives};
pub use links::{LinkScan, extract_links};
pub use text::normalize_text;

#[derive(PestParser)]
#[grammar = "src/grammar.pest"]
struct MarkupParser;

/// Why a span's inner text did not fit its sub-grammar.
///
/// Stages turn these into pass-through decisions; they are only surfaced in debug logs.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("parse error: {0}")]
    Pest(String),
    #[error("unexpected grammar shape: {0}")]
    Shape(&'static str),
}

/// `variable`/`value` pair taken from a recognized `<<if>>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondHeader {
    pub variable: String,
    pub value: String,
}

/// Parse the inside of `<<if $estado.trama.x is "v">>` (without the angle brackets).
///
/// # Errors
/// Returns an error when the header uses another operator, an unquoted
/// literal, or anything but a single story-state variable.
pub fn parse_if_header(header: &str) -> Result<CondHeader, GrammarError> {
    let mut pairs = MarkupParser::parse(Rule::if_header, header).map_err(|e| GrammarError::Pest(e.to_string()))?;
    let pair = pairs.next().ok_or(GrammarError::Shape("expected if header"))?;
    let mut variable = None;
    let mut value = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::state_var => variable = state_var_name(inner),
            Rule::cond_value => value = Some(inner.as_str().to_string()),
            _ => {},
        }
    }
    Ok(CondHeader {
        variable: variable.ok_or(GrammarError::Shape("if header without variable"))?,
        value: value.ok_or(GrammarError::Shape("if header without value"))?,
    })
}

/// Search a link's code segment for a story-state assignment.
///
/// # Errors
/// Returns an error when no `$estado.trama.<name> (=|is) <value>` setter is found.
pub fn parse_assignment(code: &str) -> Result<StateChange, GrammarError> {
    let mut pairs =
        MarkupParser::parse(Rule::code_segment, code).map_err(|e| GrammarError::Pest(e.to_string()))?;
    let segment = pairs.next().ok_or(GrammarError::Shape("expected code segment"))?;
    let assignment = segment
        .into_inner()
        .find(|p| p.as_rule() == Rule::assignment)
        .ok_or(GrammarError::Shape("expected assignment"))?;
    let mut variable = None;
    let mut value = None;
    for inner in assignment.into_inner() {
        match inner.as_rule() {
            Rule::state_var => variable = state_var_name(inner),
            Rule::assign_value => value = Some(StateValue::coerce(inner.as_str())),
            _ => {},
        }
    }
    Ok(StateChange {
        variable: variable.ok_or(GrammarError::Shape("assignment without variable"))?,
        value: value.ok_or(GrammarError::Shape("assignment without value"))?,
    })
}

fn state_var_name(pair: pest::iterators::Pair<Rule>) -> Option<String> {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_header_yields_variable_and_value() {
        let header = parse_if_header(r#"if $estado.trama.invitacion is "aceptada""#).expect("header parses");
        assert_eq!(
            header,
            CondHeader {
                variable: "invitacion".into(),
                value: "aceptada".into()
            }
        );
    }

    #[test]
    fn if_header_allows_spaces_in_value() {
        let header = parse_if_header(r#" if $estado.trama.humor is "moi mal" "#).expect("header parses");
        assert_eq!(header.value, "moi mal");
    }

    #[test]
    fn if_header_rejects_other_shapes() {
        assert!(parse_if_header(r#"if $estado.trama.oro > "5""#).is_err());
        assert!(parse_if_header("if $estado.trama.oro is 5").is_err());
        assert!(parse_if_header(r#"if $estado.trama.a is "x" and $estado.trama.b is "y""#).is_err());
        assert!(parse_if_header(r#"if $outro.a is "x""#).is_err());
        assert!(parse_if_header(r#"else"#).is_err());
    }

    #[test]
    fn assignment_accepts_is_and_equals() {
        let change = parse_assignment(r#"$estado.trama.oro is "50""#).expect("setter parses");
        assert_eq!(change.variable, "oro");
        assert_eq!(change.value, StateValue::Text("50".into()));

        let change = parse_assignment("$estado.trama.visto = true").expect("setter parses");
        assert_eq!(change.variable, "visto");
        assert_eq!(change.value, StateValue::Flag(true));

        let change = parse_assignment("$estado.trama.visto='False'").expect("setter parses");
        assert_eq!(change.value, StateValue::Flag(false));
    }

    #[test]
    fn assignment_is_found_after_leading_code() {
        let change = parse_assignment(r#"$outro = 1; $estado.trama.lugar = "a praza""#).expect("setter parses");
        assert_eq!(change.variable, "lugar");
        assert_eq!(change.value, StateValue::Text("a praza".into()));
    }

    #[test]
    fn assignment_without_setter_is_rejected() {
        assert!(parse_assignment("$outro.valor = 1").is_err());
        assert!(parse_assignment("").is_err());
    }
}
