mod format;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use threatscope::classify::ThreatAlarmType;
use threatscope::scenario::{ScenarioLoader, ScenarioRunner, ScenarioSpec};
use tracing_subscriber::EnvFilter;

/// Output format for scenario results
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output (default)
    #[default]
    Pretty,
    /// Machine-readable JSON
    Json,
    /// Test Anything Protocol v13
    Tap,
    /// JUnit XML
    Junit,
}

// Constants
const DEFAULT_SCENARIO_DIR: &str = "scenarios";
const SEPARATOR_WIDTH: usize = 60;

#[derive(Parser, Debug)]
#[command(name = "threatscope")]
#[command(about = "Threat-box state model scenario runner", long_about = None)]
struct Args {
    /// Path to scenario file or directory
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Recursively search directories for scenario files
    #[arg(short, long)]
    recursive: bool,

    /// Filter scenarios by tags (can be specified multiple times)
    #[arg(short = 't', long = "tag")]
    tags: Vec<String>,

    /// Verbose output: debug logging and every expectation failure
    #[arg(short, long)]
    verbose: bool,

    /// Stop each scenario at its first failed expectation, and stop the run
    /// after the first failing scenario
    #[arg(long)]
    fail_fast: bool,

    /// List discovered scenarios and exit
    #[arg(long)]
    list: bool,

    /// Print the alarm type table with display colors and exit
    #[arg(long)]
    types: bool,

    /// Output format for scenario results
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Generate shell completions and exit
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

fn print_types() {
    for ty in ThreatAlarmType::all() {
        let [r, g, b] = ty.color().map(|c| (c * 255.0).round() as u8);
        println!(
            "{} {:<12} ({:.2}, {:.2}, {:.2})",
            "■".truecolor(r, g, b),
            ty.name(),
            ty.color()[0],
            ty.color()[1],
            ty.color()[2]
        );
    }
}

fn load_scenarios(files: &[PathBuf]) -> Result<Vec<ScenarioSpec>> {
    files
        .iter()
        .map(|file| {
            ScenarioSpec::from_file(file)
                .with_context(|| format!("Failed to load scenario {}", file.display()))
        })
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if let Some(shell) = args.completions {
        clap_complete::generate(
            shell,
            &mut Args::command(),
            "threatscope",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    if args.types {
        print_types();
        return Ok(());
    }

    let root = args
        .path
        .clone()
        .unwrap_or_else(|| Path::new(DEFAULT_SCENARIO_DIR).to_path_buf());
    // The default directory is always searched recursively
    let recursive = args.recursive || args.path.is_none();

    let loader = ScenarioLoader::new(&root, recursive).with_context(|| {
        format!(
            "Failed to initialize scenario loader for path: {}",
            root.display()
        )
    })?;

    let files = if !args.tags.is_empty() {
        loader
            .collect_by_tags(&args.tags)
            .with_context(|| format!("Failed to collect scenarios by tags: {:?}", args.tags))?
    } else {
        loader
            .collect_all()
            .context("Failed to collect scenario files")?
    };

    if files.is_empty() {
        let location = if !args.tags.is_empty() {
            format!("with tags: {:?}", args.tags)
        } else {
            format!("at: {}", root.display())
        };
        eprintln!("{} No scenario files found {}", "Error:".red().bold(), location);
        std::process::exit(1);
    }

    let scenarios = load_scenarios(&files)?;

    // --list: print scenario names and exit
    if args.list {
        for scenario in &scenarios {
            let tags = if scenario.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", scenario.tags.join(", "))
            };
            println!(
                "{} ({} threats, {} steps, {} expectations){}",
                scenario.name,
                scenario.threats.len(),
                scenario.steps.len(),
                scenario.expectation_count(),
                tags.dimmed()
            );
        }
        return Ok(());
    }

    let mut runner = ScenarioRunner::new();
    runner.set_stop_on_failure(args.fail_fast);

    let start_time = Instant::now();
    let mut results = Vec::new();
    for scenario in &scenarios {
        let result = runner.run(scenario);
        let failed = !result.success;
        results.push(result);
        if args.fail_fast && failed {
            break;
        }
    }
    let elapsed = start_time.elapsed();

    match args.format {
        OutputFormat::Pretty => format::print_pretty(&results, elapsed, args.verbose, SEPARATOR_WIDTH),
        OutputFormat::Json => {
            format::print_json(&results, elapsed).context("Failed to serialize results")?
        }
        OutputFormat::Tap => format::print_tap(&results),
        OutputFormat::Junit => format::print_junit(&results, elapsed),
    }

    if results.iter().any(|r| !r.success) {
        std::process::exit(1);
    }

    Ok(())
}
