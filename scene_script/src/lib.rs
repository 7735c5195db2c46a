//! scene_script: compiler from Twine passages to scene records
//!
//! One raw passage body goes through four fixed stages:
//! - directives: `{{IMG: aula}}`, `{{CHARS: manuela, concha}}`, `{{IA_CONTEXT: …}}`,
//!   `{{ROUTER: var, value, ifTrue, ifFalse}}` are lifted into the `media` and
//!   `ai` maps; staging cues (`SCENE_START`, `SHOW`, `HIDE`) stay in the text
//! - conditionals: `<<if $estado.trama.x is "v">>…<<else>>…<</if>>` becomes
//!   `{{IF:x=v}}`, `{{ELSE}}`, `{{ENDIF}}` markers
//! - links: `[[Label->Target][$estado.trama.x = "v"]]` becomes a choice
//! - text: leftover `<<macros>>` go, blank lines become [`PARAGRAPH_BREAK`]
//!
//! The result is a [`CompiledPassage`]. Markup that does not fit a stage's
//! grammar is left as text (or, for links, kept as a plain choice); compiling
//! never fails on content.
//!
//! The `extract`, `config` and `export` modules hold the command-line side:
//! reading a Twine HTML story, dropping reserved passages and writing the
//! aggregate JSON.

pub mod config;
pub mod export;
pub mod extract;
pub mod parser;

pub use parser::{
    CondHeader, DirectiveScan, GrammarError, LinkScan, expand_conditionals, extract_directives, extract_links,
    normalize_text, parse_assignment, parse_if_header,
};

use log::{debug, warn};
use scene_data::{CompiledPassage, Passage, StoryDef};
use thiserror::Error;

/// Token that separates dialogue units in compiled text.
pub const PARAGRAPH_BREAK: &str = "{{BR}}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("passage has no id")]
    MissingId,
}

/// A passage `compile_story` had to leave out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPassage {
    /// Position in the input sequence.
    pub index: usize,
    pub error: CompileError,
}

/// Result of compiling a batch of passages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryBuild {
    pub story: StoryDef,
    pub skipped: Vec<SkippedPassage>,
}

/// Compile one passage body into its scene record.
///
/// # Errors
/// Returns [`CompileError::MissingId`] when the passage id is blank. Content
/// never causes an error.
pub fn compile_passage(passage: &Passage) -> Result<CompiledPassage, CompileError> {
    if passage.id.trim().is_empty() {
        return Err(CompileError::MissingId);
    }

    let DirectiveScan { media, ai, text } = extract_directives(&passage.raw_text);
    let text = expand_conditionals(&text);
    let LinkScan { choices, text } = extract_links(&text);
    let text = normalize_text(&text);

    debug!(
        "compiled '{}': {} media, {} ai, {} choices",
        passage.id,
        media.len(),
        ai.len(),
        choices.len()
    );
    Ok(CompiledPassage {
        id: passage.id.clone(),
        text,
        media,
        ai,
        choices,
    })
}

/// Compile every passage; a failing passage is skipped without stopping the rest.
///
/// Reserved passage names are not filtered here. A repeated id replaces the
/// earlier record.
pub fn compile_story(passages: &[Passage]) -> StoryBuild {
    let mut build = StoryBuild::default();
    for (index, passage) in passages.iter().enumerate() {
        match compile_passage(passage) {
            Ok(compiled) => {
                if build.story.insert(compiled.id.clone(), compiled).is_some() {
                    warn!("passage '{}' appears more than once; keeping the last one", passage.id);
                }
            },
            Err(error) => {
                warn!("skipping passage #{index}: {error}");
                build.skipped.push(SkippedPassage { index, error });
            },
        }
    }
    build
}
