//! Amalgam CLI
//!
//! Entry point for the `amalgam` command-line tool.

use amalgam::{EffectiveConfig, EntryStatus, ExplainOutput, Merger};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "amalgam")]
#[command(about = "Merge manifest-listed source files into one file", version)]
struct Cli {
    /// Log each merged file
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the manifest's files into the output file (default)
    Merge {
        /// Manifest listing files to merge (default: Files.txt)
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,

        /// Output file, overwritten on each run (default: newMain.cpp)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Path to config file (default: amalgam.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Print the merge report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which lines of a file a merge would drop
    Explain {
        /// Source file to classify
        file: PathBuf,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,
    },

    /// Check that every manifest entry can be read, without writing output
    Verify {
        /// Manifest listing files to merge (default: Files.txt)
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,

        /// Path to config file (default: amalgam.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration with its sources
    Config {
        /// Path to config file (default: amalgam.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    amalgam::logging::init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Merge {
            manifest,
            output,
            config,
            json,
        }) => run_merge(manifest, output, config, json),
        None => run_merge(None, None, None, false),
        Some(Commands::Explain { file, human }) => run_explain(&file, human),
        Some(Commands::Verify { manifest, config, json }) => run_verify(manifest, config, json),
        Some(Commands::Config { config }) => run_config(config),
    }
}

fn load_config(config_path: Option<PathBuf>, manifest: Option<PathBuf>, output: Option<PathBuf>) -> EffectiveConfig {
    let result = EffectiveConfig::locate(config_path.as_deref(), Path::new(".")).and_then(|path| {
        EffectiveConfig::build(
            path.as_deref(),
            EffectiveConfig::cli_layer(manifest.as_deref(), output.as_deref()),
        )
    });

    match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    }
}

fn run_merge(manifest: Option<PathBuf>, output: Option<PathBuf>, config_path: Option<PathBuf>, json: bool) {
    let config = load_config(config_path, manifest, output);
    let merger = Merger::new(config.merge_config());

    let report = match merger.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{} -> {}", report.human_summary, report.output_path);
    }
}

fn run_explain(file: &Path, human: bool) {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            process::exit(1);
        }
    };

    let explanation = ExplainOutput::from_source(&file.to_string_lossy(), &source);

    if human {
        println!("{}", explanation.to_human());
    } else {
        match explanation.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_verify(manifest: Option<PathBuf>, config_path: Option<PathBuf>, json: bool) {
    let config = load_config(config_path, manifest, None);
    let merger = Merger::new(config.merge_config());

    let outcomes = match merger.verify() {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let unreadable = outcomes.iter().filter(|o| o.status.is_skipped()).count();

    if json {
        match serde_json::to_string_pretty(&outcomes) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!(
            "Manifest: {} ({} entries)\n",
            merger.config().manifest_path.display(),
            outcomes.len()
        );
        for outcome in &outcomes {
            match &outcome.status {
                EntryStatus::Merged | EntryStatus::Readable => println!(
                    "  ok       {} ({} lines, {} directives)",
                    outcome.path, outcome.lines_kept, outcome.directives_removed
                ),
                EntryStatus::NotFound => println!("  missing  {}", outcome.path),
                EntryStatus::Unreadable { error } => println!("  error    {}: {}", outcome.path, error),
            }
        }
    }

    if unreadable > 0 {
        process::exit(1);
    }
}

fn run_config(config_path: Option<PathBuf>) {
    let config = load_config(config_path, None, None);

    match config.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
