//! Chalkboard - headless driver for the board session
//!
//! Replays a recorded or hand-written list of shell commands against a
//! session, printing the events a UI shell would receive, and writes the
//! resulting boards out as PNG files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chalkboard_analysis::RemoteAnalysis;
use chalkboard_config::ChalkboardConfig;
use chalkboard_ipc::{BoardId, Language, parse_script};
use chalkboard_session::BoardSession;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod haptics;
mod replay;

use haptics::LoggingHaptics;
use replay::Replay;

#[derive(Parser)]
#[command(name = "chalkboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chalkboard drawing core", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file (environment variables still apply on top)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSON array of shell commands against a fresh session
    Replay {
        /// Script file
        script: PathBuf,

        /// Directory to write one PNG per board into
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Only write this board
        #[arg(short, long)]
        board: Option<u64>,

        /// Fixed chalk texture seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print shell events as JSON lines
        #[arg(short, long)]
        events: bool,
    },

    /// Print the effective configuration
    Config,

    /// List UI languages and their analysis prompts
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = ChalkboardConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Replay {
            script,
            out,
            board,
            seed,
            events,
        } => cmd_replay(config, &script, out.as_deref(), board.map(BoardId), seed, events).await,
        Commands::Config => cmd_config(&config),
        Commands::Languages => cmd_languages(),
    }
}

async fn cmd_replay(
    mut config: ChalkboardConfig,
    script: &Path,
    out: Option<&Path>,
    board: Option<BoardId>,
    seed: Option<u64>,
    events: bool,
) -> Result<()> {
    if seed.is_some() {
        config.render.seed = seed;
    }

    let text = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let commands = parse_script(&text)
        .with_context(|| format!("invalid script {}", script.display()))?;
    info!("Replaying {} commands from {}", commands.len(), script.display());

    let mut session = BoardSession::with_haptics(&config, LoggingHaptics::default());
    let backend = RemoteAnalysis::new(&config.analysis)?;

    let mut replay = Replay::new(&mut session, backend);
    if events {
        replay = replay.with_events_out(std::io::stdout().lock());
    }
    let summary = replay.run(commands).await?;
    info!(
        "Restores: {} applied, {} superseded, {} failed; {} tiles repainted ({} bytes)",
        summary.restores_applied,
        summary.restores_superseded,
        summary.restores_failed,
        summary.tiles_repainted,
        summary.bytes_uploaded
    );
    if summary.analyses_dropped > 0 {
        info!("{} analyses dismissed before they finished", summary.analyses_dropped);
    }
    for text in &summary.analyses {
        println!("{text}");
    }

    if let Some(dir) = out {
        write_boards(&mut session, dir, board)?;
    }
    Ok(())
}

fn write_boards(session: &mut BoardSession, dir: &Path, only: Option<BoardId>) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let ids: Vec<BoardId> = match only {
        Some(id) => vec![id],
        None => session.boards().iter().map(|board| board.id).collect(),
    };
    for id in ids {
        let snapshot = session
            .export_board(id)
            .with_context(|| format!("failed to export board {id}"))?;
        let path = dir.join(format!("board-{id}.png"));
        fs::write(&path, snapshot.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote {} ({} bytes)", path.display(), snapshot.len());
    }
    Ok(())
}

fn cmd_config(config: &ChalkboardConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn cmd_languages() -> Result<()> {
    for language in Language::ALL {
        let strings = language.translation();
        println!("{}\t{}\t{}", language.code(), strings.native_name, strings.ai_prompt);
    }
    Ok(())
}
