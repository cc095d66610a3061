//! # fixture-cli
//!
//! Binary entry point for the instrumentation fixture harness.
//!
//! This crate provides:
//! - CLI argument parsing using `clap`
//! - Scenario selection by name and execution of the fixed lifecycle
//! - Exit-code mapping of the harness error taxonomy for the driver
//! - Lifecycle journal viewing via `fixture log`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fixture_core::{
    HarnessConfig, HarnessError, Journal, JournalHistory, PersistentStore, RecordingClient,
    ScenarioRegistry, ScenarioRunner, StepRecord,
};
use std::io::{IsTerminal, stdout};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Automatically detect if stdout is a TTY
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    /// Returns true if colors should be used based on mode and terminal detection.
    fn should_use_colors(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stdout().is_terminal(),
        }
    }
}

/// Output format for the log command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for programmatic access
    Json,
}

/// ANSI color codes for terminal output.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Fixture harness - scenario runner for instrumentation end-to-end tests
#[derive(Parser, Debug)]
#[command(name = "fixture", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to harness configuration file
    #[arg(short, long, default_value = "harness.yml", global = true)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output mode (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one scenario through the fixed lifecycle
    Run(RunArgs),

    /// List the registered scenario names
    List,

    /// View the lifecycle journal for debugging and assertions
    Log(LogArgs),
}

/// Arguments for the run subcommand.
#[derive(Parser, Debug)]
struct RunArgs {
    /// Scenario name to execute
    scenario: String,

    /// Keep persisted state from prior runs instead of clearing it
    #[arg(long)]
    preserve_state: bool,

    /// Override the collector base URL
    #[arg(long)]
    collector: Option<String>,

    /// Override the application identity namespace
    #[arg(long)]
    app_id: Option<String>,
}

/// Arguments for the log subcommand.
#[derive(Parser, Debug)]
struct LogArgs {
    /// Show only the last N records
    #[arg(long)]
    last: Option<usize>,

    /// Filter by scenario name
    #[arg(long)]
    scenario: Option<String>,

    /// Filter by lifecycle step (e.g., "clear_persistent_data")
    #[arg(long)]
    step: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Path to journal file (default: taken from harness config)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Clear the journal
    #[arg(long)]
    clear: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let code = match cli.command {
        Commands::Run(args) => match run_command(&cli.config, cli.color, args) {
            Ok(()) => 0,
            Err(e) => {
                error!("{e}");
                e.exit_code()
            }
        },
        Commands::List => {
            list_command(cli.color);
            0
        }
        Commands::Log(args) => match log_command(&cli.config, cli.color, args) {
            Ok(()) => 0,
            Err(e) => {
                error!("{e:#}");
                1
            }
        },
    };

    if code != 0 {
        std::process::exit(code);
    }
}

/// Loads the harness config, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<HarnessConfig, HarnessError> {
    if path.exists() {
        HarnessConfig::from_file(path)
    } else {
        warn!("config file {:?} not found, using defaults", path);
        Ok(HarnessConfig::default())
    }
}

fn run_command(config_path: &Path, color_mode: ColorMode, args: RunArgs) -> Result<(), HarnessError> {
    info!("fixture harness v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(config_path)?;

    // Apply CLI overrides (they take final precedence over the file).
    if let Some(collector) = args.collector {
        config.collector = collector;
    }
    if let Some(app_id) = args.app_id {
        config.app_id = Some(app_id);
    }

    for warning in config.validate() {
        eprintln!("{warning}");
    }

    let registry = ScenarioRegistry::builtin();
    let scenario = registry.create(&args.scenario)?;
    let name = scenario.name().to_string();

    let mut runner = ScenarioRunner::new(
        scenario,
        config.collector_address(),
        PersistentStore::new(&config.state_dir),
        RecordingClient::new(),
    )
    .with_journal(Journal::new(&config.journal_file));

    if let Some(app_id) = &config.app_id {
        runner = runner.with_app_id(app_id.clone());
    }

    runner.execute(!args.preserve_state)?;

    print_completion(&name, &runner.context().config.endpoint, color_mode.should_use_colors());
    Ok(())
}

fn list_command(color_mode: ColorMode) {
    let use_colors = color_mode.should_use_colors();
    let registry = ScenarioRegistry::builtin();

    for name in registry.names() {
        if use_colors {
            println!("{}•{} {name}", colors::CYAN, colors::RESET);
        } else {
            println!("{name}");
        }
    }
}

fn log_command(config_path: &Path, color_mode: ColorMode, args: LogArgs) -> Result<()> {
    let use_colors = color_mode.should_use_colors();

    let history = match args.file {
        Some(path) => JournalHistory::new(path),
        None => {
            let config = load_config(config_path).context("resolving journal path")?;
            JournalHistory::new(config.journal_file)
        }
    };

    // Handle clear command
    if args.clear {
        history.clear().context("failed to clear journal")?;
        if use_colors {
            println!("{}✓{} Journal cleared", colors::GREEN, colors::RESET);
        } else {
            println!("Journal cleared");
        }
        return Ok(());
    }

    if !history.exists() {
        if use_colors {
            println!(
                "{}No journal found.{} Run `fixture run <scenario>` to generate one.",
                colors::DIM,
                colors::RESET
            );
        } else {
            println!("No journal found. Run `fixture run <scenario>` to generate one.");
        }
        return Ok(());
    }

    // Read and filter records
    let mut records = if let Some(n) = args.last {
        history.read_last(n).context("failed to read journal")?
    } else if let Some(ref scenario) = args.scenario {
        history
            .filter_by_scenario(scenario)
            .context("failed to read journal")?
    } else if let Some(ref step) = args.step {
        history.filter_by_step(step).context("failed to read journal")?
    } else {
        history.read_all().context("failed to read journal")?
    };

    // Apply secondary filters (scenario + last, etc.)
    if args.last.is_some() {
        if let Some(ref scenario) = args.scenario {
            records.retain(|r| r.scenario == *scenario);
        }
        if let Some(ref step) = args.step {
            records.retain(|r| r.step == *step);
        }
    }

    if records.is_empty() {
        if use_colors {
            println!("{}No matching records found.{}", colors::DIM, colors::RESET);
        } else {
            println!("No matching records found.");
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&records)?;
            println!("{json}");
        }
        OutputFormat::Table => {
            print_log_table(&records, use_colors);
        }
    }

    Ok(())
}

fn print_completion(scenario: &str, endpoint: &str, use_colors: bool) {
    if use_colors {
        use colors::*;
        println!("\n{GREEN}{BOLD}✓{RESET} Scenario {BOLD}{scenario}{RESET} completed");
        println!("  Endpoint: {CYAN}{endpoint}{RESET}");
    } else {
        println!("\nScenario {scenario} completed");
        println!("  Endpoint: {endpoint}");
    }
}

fn print_log_table(records: &[StepRecord], use_colors: bool) {
    use colors::*;

    // Header
    if use_colors {
        println!("{BOLD}{DIM}  # │ Timestamp                 │ Scenario           │ Step                  │ Detail{RESET}");
        println!("{DIM}────┼───────────────────────────┼────────────────────┼───────────────────────┼─────────────────{RESET}");
    } else {
        println!("  # | Timestamp                 | Scenario           | Step                  | Detail");
        println!("----|---------------------------|--------------------|-----------------------|-----------------");
    }

    for (i, record) in records.iter().enumerate() {
        let step_color = get_step_color(&record.step);
        let detail_preview = if record.detail.len() > 40 {
            format!("{}...", &record.detail[..40].replace('\n', " "))
        } else {
            record.detail.replace('\n', " ")
        };

        if use_colors {
            println!(
                "{DIM}{:>3}{RESET} │ {:<25} │ {:<18} │ {step_color}{:<21}{RESET} │ {DIM}{}{RESET}",
                i + 1,
                truncate(&record.ts, 25),
                truncate(&record.scenario, 18),
                truncate(&record.step, 21),
                detail_preview
            );
        } else {
            println!(
                "{:>3} | {:<25} | {:<18} | {:<21} | {}",
                i + 1,
                truncate(&record.ts, 25),
                truncate(&record.scenario, 18),
                truncate(&record.step, 21),
                detail_preview
            );
        }
    }

    // Footer
    if use_colors {
        println!("\n{DIM}Total: {} records{RESET}", records.len());
    } else {
        println!("\nTotal: {} records", records.len());
    }
}

fn get_step_color(step: &str) -> &'static str {
    use colors::*;
    match step {
        "configure" => CYAN,
        "clear_persistent_data" => YELLOW,
        "start_instrumentation" => GREEN,
        "run" => MAGENTA,
        _ => BLUE,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}…", &s[..max_len - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::parse_from(["fixture", "run", "Noop", "--preserve-state"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.scenario, "Noop");
                assert!(args.preserve_state);
                assert!(args.collector.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_log_args_defaults() {
        let cli = Cli::parse_from(["fixture", "log"]);
        match cli.command {
            Commands::Log(args) => {
                assert_eq!(args.format, OutputFormat::Table);
                assert!(args.last.is_none());
                assert!(!args.clear);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("missing.yml")).unwrap();
        assert_eq!(config.collector, fixture_core::DEFAULT_COLLECTOR_URL);
    }

    #[test]
    fn test_load_config_rejects_malformed_yaml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("harness.yml");
        std::fs::write(&path, "collector: [not, a, string\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, HarnessError::Environment(_)));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer string", 8), "a longe…");
    }

    #[test]
    fn test_step_colors_are_distinct_for_lifecycle_steps() {
        let steps = [
            "configure",
            "clear_persistent_data",
            "start_instrumentation",
            "run",
        ];
        let mut seen = std::collections::HashSet::new();
        for step in steps {
            assert!(seen.insert(get_step_color(step)));
        }
    }
}
