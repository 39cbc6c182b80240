//! Highlight search command line interface
//!
//! Interprets queries offline: nothing is fetched from the stats API.
//!
//! # Usage
//!
//! ```bash
//! # Show how a query is understood
//! highlight_cli interpret "Wembanyama fadeaways in the playoffs"
//!
//! # Same, as JSON
//! highlight_cli -o json interpret "Dejounte Murray floaters"
//!
//! # Show the loaded reference directory
//! highlight_cli directory
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use highlight_search::{EngineConfig, Explanation, SearchEngine};

#[derive(Parser)]
#[command(name = "highlight_cli")]
#[command(version)]
#[command(about = "Interpret free-text basketball highlight queries")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Engine configuration file (YAML)
    #[arg(long, short, global = true, env = "HIGHLIGHT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a query and show the searches it would run
    Interpret {
        /// Query text
        query: String,
    },

    /// Show reference directory statistics
    Directory,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = load_engine(cli.config.as_ref()).and_then(|engine| match &cli.command {
        Commands::Interpret { query } => cmd_interpret(&engine, query, cli.format),
        Commands::Directory => {
            println!("{}", engine.directory().stats());
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn load_engine(config_path: Option<&PathBuf>) -> anyhow::Result<SearchEngine> {
    let config = match config_path {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => EngineConfig::from_env()?,
    };
    Ok(SearchEngine::from_config(config)?)
}

fn cmd_interpret(engine: &SearchEngine, query: &str, format: OutputFormat) -> anyhow::Result<()> {
    let explanation = engine.explain(query);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&explanation)?);
        }
        OutputFormat::Pretty => print_pretty(query, &explanation),
    }

    Ok(())
}

fn print_pretty(query: &str, explanation: &Explanation) {
    let parsed = &explanation.parsed;

    println!("{} {}", "Query:".bold(), query);
    println!("{} {}", "Reformulated:".bold(), parsed.reformulated);
    println!();

    let field = |name: &str, value: String| println!("  {:<16} {}", name.cyan(), value);
    field("player", parsed.player_name.clone().unwrap_or_else(|| "-".to_string()));
    field("opponent", parsed.team_name.clone().unwrap_or_else(|| "-".to_string()));
    field("season type", parsed.season_type.to_string());
    field(
        "categories",
        parsed
            .context_measures
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    if !parsed.shot_specifiers.is_empty() {
        field("shots", parsed.shot_specifiers.join(", "));
    }
    if let Some(score) = parsed.score_specifier {
        field("score", format!("{score:?}"));
    }
    if let Some(clutch) = parsed.clutch_window {
        field("clutch", clutch.to_string());
    }
    if parsed.month != highlight_search::interpret::ANY_MONTH {
        field("month", parsed.month.clone());
    }
    println!();

    for interpretation in &explanation.interpretations {
        println!("{} {}", "OK".green(), interpretation);
    }
    if let Some(error) = &explanation.error {
        println!("{} {}", "!!".yellow(), error);
    }
}
