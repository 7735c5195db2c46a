//! CLI entry point for scene_script.
//! Usage: cargo run -p scene_script -- compile contido/m68-master.html --out web-app/src/data/historia.json

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use scene_script::config::{CliSettings, Config};
use scene_script::export::{build_story, render_json, write_story};

/// Log filter used when `RUST_LOG` is unset; progress lines are `info!`.
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser)]
#[command(author, version, about = "Compile Twine stories into scene JSON.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every passage of a story into the scene JSON document.
    Compile(CompileArgs),
    /// Print the compiled record of a single passage.
    Show(ShowArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Published Twine HTML story (defaults to the configured input).
    input: Option<PathBuf>,
    /// Configuration file (defaults to ./scene_script.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct CompileArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Output JSON file (defaults to the configured output).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print the JSON instead of writing it.
    #[arg(long, conflicts_with = "out")]
    stdout: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Passage name.
    passage: String,
    #[command(flatten)]
    source: SourceArgs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();
    match Cli::parse().command {
        Commands::Compile(args) => run_compile(args),
        Commands::Show(args) => run_show(args),
    }
}

fn load_config(source: &SourceArgs, out: Option<PathBuf>) -> Result<Config> {
    let settings = CliSettings {
        input: source.input.clone(),
        output: out,
    };
    Config::load(source.config.as_deref(), &settings).context("while loading configuration")
}

fn run_compile(args: CompileArgs) -> Result<()> {
    let config = load_config(&args.source, args.out)?;
    let report = build_story(&config)
        .with_context(|| format!("while compiling '{}'", config.paths.input.display()))?;

    if args.stdout {
        println!("{}", render_json(&report.story)?);
    } else {
        write_story(&report.story, &config.paths.output)?;
        info!("story written to {}", config.paths.output.display());
    }

    info!(
        "{} passages compiled, {} reserved passages left out",
        report.story.len(),
        report.reserved
    );
    if !report.skipped.is_empty() {
        warn!("{} passages skipped", report.skipped.len());
    }
    match &report.first_passage {
        Some((name, choices)) => info!("first passage '{name}' has {choices} choices"),
        None => warn!("no passages were compiled"),
    }
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = load_config(&args.source, None)?;
    let report = build_story(&config)
        .with_context(|| format!("while compiling '{}'", config.paths.input.display()))?;
    let Some(passage) = report.story.get(&args.passage) else {
        bail!("no passage named '{}' in {}", args.passage, config.paths.input.display());
    };
    println!("{}", serde_json::to_string_pretty(passage)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn progress_is_logged_without_rust_log() {
        let env = env_logger::Env::new()
            .filter("SCENE_SCRIPT_LOG_NEVER_SET")
            .default_filter_or(DEFAULT_LOG_FILTER);
        let logger = env_logger::Builder::from_env(env).build();
        assert_eq!(logger.filter(), LevelFilter::Info);
    }

    #[test]
    fn stdout_conflicts_with_out() {
        let parsed = Cli::try_parse_from(["scene_script", "compile", "--stdout", "--out", "x.json"]);
        assert!(parsed.is_err());
    }
}
