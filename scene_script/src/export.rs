//! Whole-story export: Twine HTML in, scene JSON out.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use scene_data::{StoryDef, validate_story};
use thiserror::Error;

use crate::config::Config;
use crate::extract::{ExtractError, extract_story};
use crate::{SkippedPassage, compile_story};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("story file '{}' not found", .0.display())]
    InputMissing(PathBuf),
    #[error("unable to read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("unable to write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("unable to serialize story: {0}")]
    Json(#[from] serde_json::Error),
}

/// What one export run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub story: StoryDef,
    /// Reserved passages left out before compiling.
    pub reserved: usize,
    pub skipped: Vec<SkippedPassage>,
    /// First compiled passage in document order and its number of choices.
    pub first_passage: Option<(String, usize)>,
}

/// Read the configured story, compile it and return the result without writing it.
///
/// # Errors
/// Fails when the input file is missing or unreadable, or holds no passages.
pub fn build_story(config: &Config) -> Result<ExportReport, ExportError> {
    let input = &config.paths.input;
    if !input.is_file() {
        return Err(ExportError::InputMissing(input.clone()));
    }
    let html = fs::read_to_string(input).map_err(|source| ExportError::Read {
        path: input.clone(),
        source,
    })?;
    let document = extract_story(&html)?;
    info!(
        "processing {} passages from '{}'",
        document.passages.len(),
        document.title.as_deref().unwrap_or("untitled story")
    );

    let (reserved, passages): (Vec<_>, Vec<_>) =
        document.passages.into_iter().partition(|p| config.is_reserved(&p.id));
    let build = compile_story(&passages);

    for finding in validate_story(&build.story) {
        warn!("{finding}");
    }

    let first_passage = passages
        .iter()
        .find_map(|p| build.story.get(&p.id))
        .map(|compiled| (compiled.id.clone(), compiled.choices.len()));

    Ok(ExportReport {
        story: build.story,
        reserved: reserved.len(),
        skipped: build.skipped,
        first_passage,
    })
}

/// Pretty-printed JSON document for the presentation layer.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn render_json(story: &StoryDef) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(story)?)
}

/// Write the story JSON, creating the parent directory when needed.
///
/// # Errors
/// Returns an error when the directory or file cannot be written.
pub fn write_story(story: &StoryDef, path: &Path) -> Result<(), ExportError> {
    let json = render_json(story)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| ExportError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
