use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use timeline::{
    apply_command, format_timecode, EngineConfig, KeyCommand, Timecode, TimelineCommand,
    TimelineEngine,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timeline-cli")]
#[command(about = "Timeline arrangement CLI - replay edit sessions headlessly")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded command script against a fresh engine
    Replay {
        /// JSON file holding an array of commands
        script: PathBuf,

        /// Engine config (JSON); defaults apply to missing fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the final clip list as JSON
        #[arg(long)]
        json: bool,

        /// Keep going after a rejected command
        #[arg(long)]
        keep_going: bool,

        /// Starting playhead as [HH:]MM:SS[.mmm]
        #[arg(long)]
        playhead: Option<String>,
    },

    /// Print the default engine config
    Config,

    /// List keyboard shortcuts
    Keys,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Replay {
            script,
            config,
            json,
            keep_going,
            playhead,
        } => replay_command(&script, config.as_deref(), json, keep_going, playhead.as_deref()),
        Commands::Config => config_command(),
        Commands::Keys => keys_command(),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&raw)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn replay_command(
    script: &Path,
    config: Option<&Path>,
    json: bool,
    keep_going: bool,
    playhead: Option<&str>,
) -> Result<()> {
    let config = load_config(config)?;
    let mut engine = TimelineEngine::new(config).context("engine config rejected")?;
    engine.set_seek_handler(|time| info!("Seek to {}", format_timecode(time)));
    if let Some(raw) = playhead {
        let timecode = Timecode::parse(raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid --playhead {raw:?}"))?;
        engine.set_playhead(timecode.to_seconds());
        info!("Playhead at {}", timecode);
    }

    let raw = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let commands: Vec<TimelineCommand> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid script {}", script.display()))?;

    info!("Replaying {} commands from {:?}", commands.len(), script);

    let mut rejected = 0usize;
    for (step, command) in commands.into_iter().enumerate() {
        debug!(step, ?command, "apply");
        match apply_command(&mut engine, command) {
            Ok(outcome) => debug!(step, ?outcome, "applied"),
            Err(err) if keep_going => {
                warn!("Step {} rejected: {}", step, err);
                rejected += 1;
            }
            Err(err) => return Err(err).with_context(|| format!("step {step} rejected")),
        }
    }

    info!(
        "Replay finished: {} clips, {} selected, history {}/{}, {} rejected",
        engine.clips().len(),
        engine.selection().count(),
        engine.history().index() + 1,
        engine.history().len(),
        rejected
    );

    for (index, label) in engine.history().labels().enumerate() {
        let marker = if index == engine.history_index() { ">" } else { " " };
        debug!("history {marker}{index:>3} {label}");
    }

    if json {
        let out = serde_json::to_string_pretty(engine.clips())?;
        println!("{out}");
        return Ok(());
    }

    for (index, clip) in engine.clips().iter().enumerate() {
        let marker = if engine.selection().is_selected(&clip.id) {
            "*"
        } else {
            " "
        };
        let name = if clip.display_name.is_empty() {
            clip.source.0.as_str()
        } else {
            clip.display_name.as_str()
        };
        println!(
            "{marker}{index:>3}  {:<6} {} - {}  {}",
            format!("{:?}", clip.media_kind).to_lowercase(),
            format_timecode(clip.start),
            format_timecode(clip.end),
            name
        );
    }
    Ok(())
}

fn config_command() -> Result<()> {
    let out = serde_json::to_string_pretty(&EngineConfig::default())?;
    println!("{out}");
    Ok(())
}

fn keys_command() -> Result<()> {
    for command in KeyCommand::all() {
        println!("{:<14} {}", command.shortcut(), command.description());
    }
    Ok(())
}
