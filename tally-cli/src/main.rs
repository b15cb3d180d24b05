use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use log::debug;
use tally_ingest::{IngestError, JsonTokenSource, StatementParser};

mod config;
mod output;
mod state;

use config::{Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Extract transactions from statement text dumps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a token dump and print the extracted transactions
    Parse {
        /// JSON token dump (pages of positioned text fragments)
        tokens: PathBuf,

        /// Output format (defaults to [output].format in config.toml)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Override the same-line vertical tolerance
        #[arg(long)]
        tolerance: Option<f64>,

        /// Override the debit/credit column boundary (bank statements)
        #[arg(long)]
        credit_x: Option<f64>,
    },

    /// Print the statement format detected in a token dump
    Detect {
        tokens: PathBuf,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            tokens,
            format,
            output,
            tolerance,
            credit_x,
        } => {
            let mut cfg = config::load_config()?;
            if let Some(t) = tolerance {
                debug!("line tolerance overridden: {t}");
                cfg.parser.line_tolerance = t;
            }
            if let Some(x) = credit_x {
                debug!("credit column boundary overridden: {x}");
                cfg.parser.credit_column_x = x;
                cfg.parser.scale_columns_to_page = false;
            }
            let format = format.unwrap_or(cfg.output.format);
            parse(&tokens, &cfg, format, output.as_deref())?;
        }

        Command::Detect { tokens } => {
            let cfg = config::load_config()?;
            detect(&tokens, &cfg)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn open_source(path: &Path) -> Result<JsonTokenSource> {
    if !path.exists() {
        bail!("token dump not found: {}", path.display());
    }
    JsonTokenSource::from_path(path).with_context(|| format!("reading {}", path.display()))
}

fn parse(path: &Path, cfg: &Config, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let mut source = open_source(path)?;
    let parser = StatementParser::new(cfg.parser);

    let outcome = match parser.parse_source(&mut source, cfg.today()?) {
        Ok(outcome) => outcome,
        Err(IngestError::UnsupportedFormat) => {
            bail!(
                "Statement format not recognized in {}. Currently supporting Google Pay and HDFC Bank.",
                path.display()
            );
        }
        Err(e) => return Err(e).with_context(|| format!("parsing {}", path.display())),
    };

    if outcome.is_empty() {
        eprintln!(
            "No transactions found in {} ({} detected, {} rows without an amount).",
            path.display(),
            outcome.format.label(),
            outcome.report.rows_skipped
        );
        return Ok(());
    }

    match output {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("create {}", p.display()))?;
            let mut w = BufWriter::new(file);
            output::write_outcome(&outcome, format, &mut w)?;
            w.flush()?;
            println!("Wrote {} transactions to {}", outcome.transactions.len(), p.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            output::write_outcome(&outcome, format, &mut lock)?;
        }
    }

    Ok(())
}

fn detect(path: &Path, cfg: &Config) -> Result<()> {
    let mut source = open_source(path)?;
    match StatementParser::new(cfg.parser).detect_source(&mut source) {
        Ok(format) => println!("{} ({})", format.label(), format.tag()),
        Err(IngestError::UnsupportedFormat) => println!("unsupported"),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    }
    Ok(())
}
