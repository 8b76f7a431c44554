//! quickbar CLI
//!
//! Replays keyboard scripts through the trigger detector, the dispatcher and
//! the top-frame overlay inside a simulated browser, and manages the
//! settings file the components read.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quickbar_cli::{Report, load_providers, open_settings_file, parse_script, replay, replay_settings};
use quickbar_core::config::{SEARCH_TARGET_TAB, Settings, SettingsStore, TRIGGER_KEY};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// quickbar - keyboard-triggered search overlay
#[derive(Parser)]
#[command(name = "quickbar")]
#[command(version, about, long_about = None)]
#[command(after_help = "\
Examples:
  quickbar run --script demo.jsonl              Replay a script with the demo providers
  quickbar run --script demo.jsonl --json       Print the outcome as JSON
  quickbar providers                            List the demo providers
  quickbar settings                             Show the stored settings
  quickbar settings triggerKey F2               Open the overlay with F2 only
  quickbar settings searchTargetTab current     Search in the current tab
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines script against a simulated browser
    Run {
        /// Script to replay
        #[arg(long, value_name = "FILE")]
        script: PathBuf,

        /// Settings file to read and watch (in-memory settings if omitted)
        #[arg(long, value_name = "PATH")]
        settings: Option<PathBuf>,

        /// JSON array of search providers (demo providers if omitted)
        #[arg(long, value_name = "FILE")]
        providers: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the search providers a replay would use
    Providers {
        /// JSON array of search providers
        #[arg(long, value_name = "FILE")]
        providers: Option<PathBuf>,
    },

    /// Show or change stored settings
    Settings {
        /// Settings file (defaults to the user config directory)
        #[arg(long, value_name = "PATH")]
        settings: Option<PathBuf>,

        /// Key to show or change
        key: Option<String>,

        /// New value
        value: Option<String>,
    },
}

/// Set up logging with file output for debugging.
/// In debug builds, defaults to debug level and logs to timestamped file.
/// In release builds, defaults to info level and logs to stderr.
fn setup_logging() {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quickbar={default_level}")));

    if cfg!(debug_assertions) {
        let temp_dir = std::env::temp_dir();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_filename = format!("quickbar-{timestamp}.log");
        let log_path = temp_dir.join(&log_filename);

        #[cfg(unix)]
        {
            let symlink_path = temp_dir.join("quickbar.log");
            let _ = std::fs::remove_file(&symlink_path);
            let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);
        }

        let file_appender = tracing_appender::rolling::never(&temp_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true);

        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .with(filter)
            .init();

        eprintln!("Logging to: {} (and stderr)", log_path.display());
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

fn print_report(report: &Report) {
    println!("Tabs:");
    for tab in &report.tabs {
        match tab.opener {
            Some(opener) => println!("  [{}] #{} {} (opened by #{})", tab.index, tab.id, tab.url, opener),
            None => println!("  [{}] #{} {}", tab.index, tab.id, tab.url),
        }
    }

    if report.searches.is_empty() {
        println!("No searches");
    } else {
        println!("Searches:");
        for search in &report.searches {
            println!(
                "  '{}' with {} in tab #{}",
                search.query, search.engine, search.tab_id
            );
        }
    }

    let overlay = &report.overlay;
    match (&overlay.input, &overlay.provider) {
        (Some(input), Some(provider)) => {
            println!("Overlay: {} ({provider}) input '{input}'", overlay.phase);
        }
        (Some(input), None) => println!("Overlay: {} input '{input}'", overlay.phase),
        _ => println!("Overlay: {}", overlay.phase),
    }
}

async fn run_script(
    script: PathBuf,
    settings: Option<PathBuf>,
    providers: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(&script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let steps = parse_script(&text)?;
    let providers = load_providers(providers.as_deref())?;
    let settings = replay_settings(settings.as_deref())?;

    info!(
        "Replaying {} steps from {} with {} providers",
        steps.len(),
        script.display(),
        providers.len()
    );
    let report = replay(&steps, providers, settings).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn list_providers(providers: Option<PathBuf>) -> Result<()> {
    let providers = load_providers(providers.as_deref())?;
    for provider in providers {
        let marker = if provider.is_default { "*" } else { " " };
        if provider.alias.is_empty() {
            println!("{marker} {}", provider.name);
        } else {
            println!("{marker} {} ({})", provider.name, provider.alias);
        }
    }
    Ok(())
}

fn manage_settings(path: Option<PathBuf>, key: Option<String>, value: Option<String>) -> Result<()> {
    let store = open_settings_file(path.as_deref())?;

    match (key, value) {
        (Some(key), Some(value)) => {
            store
                .set(&key, &value)
                .with_context(|| format!("Failed to store '{key}'"))?;
            println!("{key} = {value}");
        }
        (Some(key), None) => match store.get(&key) {
            Some(value) => println!("{value}"),
            None => println!("{key} is not set"),
        },
        (None, _) => {
            let settings = Settings::from_store(&*store);
            println!("Settings file: {}", store.path().display());
            println!("{TRIGGER_KEY}: {:?}", settings.trigger_rule);
            println!("{SEARCH_TARGET_TAB}: {}", settings.search_target_tab);
            for (key, value) in store.snapshot() {
                if key != TRIGGER_KEY && key != SEARCH_TARGET_TAB {
                    println!("{key}: {value}");
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging();

    match cli.command {
        Commands::Run {
            script,
            settings,
            providers,
            json,
        } => run_script(script, settings, providers, json).await,
        Commands::Providers { providers } => list_providers(providers),
        Commands::Settings {
            settings,
            key,
            value,
        } => manage_settings(settings, key, value),
    }
}
