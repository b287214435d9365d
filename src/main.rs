// hubgate command line.
// Prints authorized keys and members, and checks tokens read from stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hubgate::config::DEFAULT_CONFIG_PATH;
use hubgate::{Config, Gate, Logger};

#[derive(Parser, Debug)]
#[command(name = "hubgate", version, about = "GitHub membership as host identity")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log requests and cache decisions to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the public keys that may log in as LOGIN.
    Keys { login: String },
    /// Read a token from stdin and exit 0 if it belongs to LOGIN.
    Auth { login: String },
    /// Print the login of every authorized account.
    Members,
}

fn logger(enabled: bool) -> Logger {
    if !enabled {
        return Logger::noop();
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    Logger::new(subscriber)
}

fn read_token() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read token from stdin")?;
    // pam_exec passes the token NUL-terminated.
    Ok(line.trim_end_matches(['\n', '\r', '\0']).to_string())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let logger = logger(cli.verbose || config.syslog);
    let gate = Gate::with_logger(config, logger)?;

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Keys { login } => {
            let keys = gate.keys_for(&login)?;
            stdout.write_all(keys.as_bytes())?;
        }
        Command::Members => {
            for member in gate.members()? {
                writeln!(stdout, "{}", member.login)?;
            }
        }
        Command::Auth { login } => {
            let token = read_token()?;
            if !gate.authenticate(&login, &token).is_authorized() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("hubgate: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
