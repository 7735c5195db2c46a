use std::fmt;

use crate::*;

/// Structural problem found in a compiled story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    KeyMismatch { key: String, id: String },
    ResidualMarkup { passage: String, markup: String },
    InvalidValue { passage: String, context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::KeyMismatch { key, id } => {
                write!(f, "story key '{key}' holds passage '{id}'")
            },
            ValidationError::ResidualMarkup { passage, markup } => {
                write!(f, "passage '{passage}' still shows {markup} in its text")
            },
            ValidationError::InvalidValue { passage, context } => {
                write!(f, "invalid value in passage '{passage}' ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Re-check the output invariants of a compiled story.
///
/// Link targets are not resolved against the story; dangling targets are the
/// presentation layer's business.
///
/// ```
/// use scene_data::{Choice, CompiledPassage, StoryDef, validate_story};
///
/// let mut story = StoryDef::new();
/// story.insert(
///     "Inicio".into(),
///     CompiledPassage {
///         id: "Inicio".into(),
///         text: "Bos días.".into(),
///         choices: vec![Choice {
///             label: "Saír".into(),
///             target: "Rúa".into(),
///             state_change: None,
///         }],
///         ..CompiledPassage::default()
///     },
/// );
/// assert!(validate_story(&story).is_empty());
/// ```
pub fn validate_story(story: &StoryDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (key, passage) in story {
        if key != &passage.id {
            errors.push(ValidationError::KeyMismatch {
                key: key.clone(),
                id: passage.id.clone(),
            });
        }
        check_text(passage, &mut errors);

        match passage.media.get(DirectiveTag::Chars.name()) {
            Some(MediaValue::Single(_)) => errors.push(ValidationError::InvalidValue {
                passage: passage.id.clone(),
                context: "CHARS must be a list".to_string(),
            }),
            Some(MediaValue::List(_)) | None => {},
        }
        if let Some(AiValue::Text(_)) = passage.ai.get(DirectiveTag::Router.name()) {
            errors.push(ValidationError::InvalidValue {
                passage: passage.id.clone(),
                context: "ROUTER must be structured".to_string(),
            });
        }

        for (idx, choice) in passage.choices.iter().enumerate() {
            if choice.target.trim().is_empty() {
                errors.push(ValidationError::InvalidValue {
                    passage: passage.id.clone(),
                    context: format!("choice #{} '{}' has an empty target", idx + 1, choice.label),
                });
            }
        }
    }

    errors
}

fn check_text(passage: &CompiledPassage, errors: &mut Vec<ValidationError>) {
    let text = passage.text.as_str();
    for tag in DirectiveTag::ALL.into_iter().filter(|t| t.is_hidden()) {
        let open = format!("{{{{{}:", tag.name());
        if has_span(text, &open, "}}") {
            errors.push(ValidationError::ResidualMarkup {
                passage: passage.id.clone(),
                markup: format!("a {} directive", tag.name()),
            });
        }
    }
    if has_span(text, "[[", "]]") {
        errors.push(ValidationError::ResidualMarkup {
            passage: passage.id.clone(),
            markup: "a [[link]]".to_string(),
        });
    }
    if has_span(text, "<<", ">>") {
        errors.push(ValidationError::ResidualMarkup {
            passage: passage.id.clone(),
            markup: "a <<macro>>".to_string(),
        });
    }
}

fn has_span(text: &str, open: &str, close: &str) -> bool {
    text.find(open)
        .is_some_and(|start| text[start + open.len()..].contains(close))
}
