//! Melodic Chrono CLI: check, play or render a rule file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use melodic_chrono::audio::{render_rules, write_wav, RenderSettings};
use melodic_chrono::config::{default_config_path, ChronoConfig};
use melodic_chrono::dsl::units::parse_timestamp;
use melodic_chrono::dsl::{CommandKind, SYNTAX_HELP};
use melodic_chrono::event::{format_elapsed, Chrono, PlayMode, RuleSet};

#[derive(Parser)]
#[command(name = "melodic-chrono")]
#[command(about = "A chronometer that plays notes from timing rules", version)]
struct Cli {
    /// Config file (default: ~/.melodic-chrono/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a rule file and list its commands
    Check {
        /// Rule file, one rule per line
        rules: PathBuf,
    },

    /// Run the chronometer in real time and print each note as it fires
    Run {
        rules: PathBuf,

        /// Delay between stacked notes, in ms
        #[arg(short, long)]
        delay: Option<u64>,

        /// Polling cadence, in ms
        #[arg(short, long)]
        tick: Option<u64>,

        /// Stop after this much elapsed time (e.g. 1m:30s)
        #[arg(short, long, value_parser = parse_length)]
        length: Option<u64>,
    },

    /// Render a rule file to a mono WAV file
    Render {
        rules: PathBuf,

        /// Output WAV file path
        output: PathBuf,

        /// Elapsed time to render (e.g. 30s or 1m:30s)
        #[arg(short, long, default_value = "30s", value_parser = parse_length)]
        length: u64,

        /// Delay between stacked notes, in ms
        #[arg(short, long)]
        delay: Option<u64>,

        /// Sample rate in Hz
        #[arg(short, long)]
        sample_rate: Option<u32>,
    },

    /// Print the rule syntax reference
    Syntax,
}

fn parse_length(s: &str) -> Result<u64, String> {
    parse_timestamp(s).map_err(|e| e.to_string())
}

fn load_config(path: Option<&Path>) -> Result<ChronoConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(ChronoConfig::load_from(p)?),
        None => {
            tracing::debug!(path = %default_config_path().display(), "loading config");
            Ok(ChronoConfig::load())
        }
    }
}

fn load_rules(path: &Path, delay_ms: u64) -> Result<RuleSet, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(RuleSet::compile(&text, delay_ms)?)
}

fn describe_mode(kind: CommandKind, mode: PlayMode) -> String {
    match (kind, mode) {
        (CommandKind::At, _) => "once".to_string(),
        (CommandKind::Every, PlayMode::Scale) => "scale".to_string(),
        (CommandKind::Every, PlayMode::Arpeggio) => "arpeggio".to_string(),
        (CommandKind::Every, PlayMode::Repeat { max }) => format!("repeat up to {max}"),
    }
}

fn check(path: &Path, config: &ChronoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rules = load_rules(path, config.inter_note_delay_ms)?;
    println!("{} rule(s) OK", rules.len());
    for (i, cmd) in rules.commands().iter().enumerate() {
        let notes: Vec<String> = cmd.notes().iter().map(|n| n.to_string()).collect();
        let when = match cmd.kind() {
            CommandKind::At => "at",
            CommandKind::Every => "every",
        };
        println!(
            "  {i}: {when} {} play {} ({})",
            format_elapsed(cmd.timestamp_ms()),
            notes.join(","),
            describe_mode(cmd.kind(), cmd.play_mode())
        );
    }
    Ok(())
}

fn run(
    mut rules: RuleSet,
    tick_ms: u64,
    length_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    let origin = Instant::now();
    let now_ms = || origin.elapsed().as_millis() as u64;
    let mut chrono = Chrono::new();
    chrono.start();

    println!("running, press Ctrl-C to stop");
    while running.load(Ordering::SeqCst) {
        if let Some(window) = chrono.tick(now_ms()) {
            for event in rules.notes_in(window) {
                println!(
                    "[{}] {} {:.2} Hz",
                    format_elapsed(window.end_ms.saturating_add(event.delay_ms)),
                    event.note,
                    event.note.frequency()
                );
            }
            if length_ms.is_some_and(|len| window.end_ms >= len) {
                break;
            }
        }
        thread::sleep(Duration::from_millis(tick_ms));
    }

    chrono.stop(now_ms());
    println!("stopped at {}", format_elapsed(chrono.elapsed(now_ms())));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { rules } => {
            if let Err(e) = check(&rules, &config) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Commands::Run {
            rules,
            delay,
            tick,
            length,
        } => {
            config.inter_note_delay_ms = delay.unwrap_or(config.inter_note_delay_ms);
            config.tick_ms = tick.unwrap_or(config.tick_ms);
            config.validate()?;
            let rules = load_rules(&rules, config.inter_note_delay_ms)?;
            run(rules, config.tick_ms, length)?;
        }
        Commands::Render {
            rules,
            output,
            length,
            delay,
            sample_rate,
        } => {
            config.inter_note_delay_ms = delay.unwrap_or(config.inter_note_delay_ms);
            config.sample_rate = sample_rate.unwrap_or(config.sample_rate);
            config.validate()?;
            let mut rules = load_rules(&rules, config.inter_note_delay_ms)?;
            let settings = RenderSettings {
                length_ms: length,
                tick_ms: config.tick_ms,
                note_duration_ms: config.note_duration_ms,
                sample_rate: config.sample_rate,
            };
            let samples = render_rules(&mut rules, &settings)?;
            write_wav(&output, &samples, settings.sample_rate)?;
            println!(
                "wrote {} ({}, {} Hz)",
                output.display(),
                format_elapsed(length),
                settings.sample_rate
            );
        }
        Commands::Syntax => print!("{SYNTAX_HELP}"),
    }

    Ok(())
}
