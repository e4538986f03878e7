use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskrank_core::{AnalyzeRequest, AnalyzeResult, Weights};
use taskrank_ingest::{BatchFormat, BatchSource, load_request};

mod config;
mod logging;
mod render;
mod server;
mod state;

use config::Config;
use logging::{LogOptions, init_logging};

#[derive(Parser, Debug)]
#[command(
    name = "taskrank",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKRANK_BUILD_SHA"), ")"),
    about = "Score and rank tasks by urgency, importance, effort and dependencies"
)]
struct Cli {
    /// Config file (default: ~/.taskrank/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct BatchArgs {
    /// Batch file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Input format (default: from file extension, JSON for stdin)
    #[arg(long)]
    format: Option<BatchFormat>,

    /// Custom weights as "urgency,importance,effort,dependencies"
    #[arg(long, value_parser = parse_weights)]
    weights: Option<Weights>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the raw JSON result
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank every task in a batch
    Analyze {
        #[command(flatten)]
        batch: BatchArgs,

        /// smart_balance, fastest_wins, high_impact or deadline_driven
        #[arg(short, long)]
        strategy: Option<String>,
    },

    /// Top few tasks under Smart Balance
    Suggest {
        #[command(flatten)]
        batch: BatchArgs,

        /// How many tasks to return (default: from config)
        #[arg(short, long, value_parser = parse_limit)]
        limit: Option<usize>,
    },

    /// List the built-in strategies
    Strategies {
        #[arg(long)]
        json: bool,
    },

    /// Serve the JSON API over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Pin "today" for every request
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
}

fn parse_weights(s: &str) -> Result<Weights, String> {
    Weights::parse_list(s).map_err(|e| e.to_string())
}

fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogOptions {
        verbose: cli.verbose,
        json: cli.log_json,
    });

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init { force } => {
                let path = match cli.config {
                    Some(p) => p,
                    None => config::config_path()?,
                };
                match config::init_config(&path, force)? {
                    Some(p) => println!("Wrote {}", p.display()),
                    None => println!("Config already exists: {} (use --force)", path.display()),
                }
            }
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Strategies { json } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let list = cfg.analyzer()?.list_strategies();
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                print!("{}", render::render_strategies(&list));
            }
        }

        Command::Analyze { batch, strategy } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let (request, today) = prepare(&cfg, &batch, strategy)?;
            let result = cfg.analyzer()?.analyze(&request, today);
            emit(&result, today, batch.json)?;
        }

        Command::Suggest { batch, limit } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let (request, today) = prepare(&cfg, &batch, None)?;
            let limit = limit.unwrap_or(cfg.scoring.suggest_limit);
            let result = cfg.analyzer()?.suggest(&request, today, limit);
            emit(&result, today, batch.json)?;
        }

        Command::Serve { host, port, date } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let host = host.unwrap_or_else(|| cfg.server.host.clone());
            let port = port.unwrap_or(cfg.server.port);
            server::start_server(&cfg, cfg.analyzer()?, &host, port, date).await?;
        }
    }

    Ok(())
}

/// Load the batch and settle strategy and evaluation date.
///
/// Strategy precedence: `--strategy`, then the batch's own, then config.
fn prepare(
    cfg: &Config,
    batch: &BatchArgs,
    strategy: Option<String>,
) -> Result<(AnalyzeRequest, NaiveDate)> {
    let source = BatchSource::from_arg(&batch.input);
    let mut request = load_request(&source, batch.format)?;

    if let Some(s) = strategy {
        request.strategy = Some(s);
    } else if request.strategy.is_none() {
        request.strategy = Some(cfg.default_strategy().key().to_string());
    }
    if let Some(w) = batch.weights {
        request.custom_weights = Some(w);
    }

    let today = match batch.date {
        Some(d) => d,
        None => taskrank_core::time::today_in(cfg.timezone()?, Utc::now()),
    };
    Ok((request, today))
}

fn emit(result: &AnalyzeResult, today: NaiveDate, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", render::render_result(result, today));
    }
    Ok(())
}
