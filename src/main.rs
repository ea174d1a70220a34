use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use ck_tools::config::Config;
use ck_tools::{list, ListError, SystemAccounts};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ck-list-sessions")]
#[command(author, about = "List ConsoleKit seats and sessions", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print version and exit
    #[arg(short = 'V', long)]
    version: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Read settings from FILE instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Connect to ADDRESS instead of the system bus
    #[arg(long, value_name = "ADDRESS")]
    address: Option<String>,
}

/// Logging goes to stderr; stdout carries only the report.
fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("ck_tools=debug,ck_list_sessions=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ck_tools={level},ck_list_sessions={level}"))
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().context("Failed to load default configuration")?,
    };

    if let Some(address) = &cli.address {
        config.bus.address = Some(address.clone());
        config.validate()?;
    }
    Ok(config)
}

fn print_version() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "ck-list-sessions".to_string());
    println!("{} {}", program, env!("CARGO_PKG_VERSION"));
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            // --help is not a failure; every parse error is.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if cli.version {
        print_version();
        return ExitCode::FAILURE;
    }

    let config = load_config(&cli);
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "warn".into());
    init_logging(cli.verbose, &level);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Using {:?}", config.bus);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = list::run(&config.bus, SystemAccounts, &mut out).and_then(|()| {
        out.flush()?;
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ ListError::Connect(_)) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
