use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use utrsync_reconcile::{HttpPlatform, Reconciler};

mod config;
mod staging;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "utrsync",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("UTRSYNC_BUILD_SHA"), ")"),
    about = "Approve platform deposits backed by a bank statement"
)]
struct Cli {
    /// Config file (default: ~/.utrsync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a statement and approve the pending deposits it backs
    Upload {
        /// Statement file (.csv, .xls, .xlsx or .pdf)
        file: PathBuf,

        /// Provider tag selecting token and remark
        #[arg(long)]
        provider: String,

        /// Fetch and match only; approve nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the records extracted from a statement as JSON
    Parse {
        file: PathBuf,
    },

    /// List configured providers and whether their token is set
    Providers,

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

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg_path = config::config_path(cli.config.as_deref())?;

    match cli.command {
        Command::Upload {
            file,
            provider,
            dry_run,
        } => {
            let cfg = config::load_config(&cfg_path)?;
            upload(&cfg, &file, &provider, dry_run).await?;
        }

        Command::Parse { file } => {
            let cfg = config::load_config(&cfg_path)?;
            let adapter = cfg.adapter_for(&upload_name(&file)?)?;
            let records = adapter
                .extract_file(&file)
                .with_context(|| format!("parsing {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Command::Providers => {
            let cfg = config::load_config(&cfg_path)?;
            let table = cfg.provider_table(config::env_token);
            for (tag, section) in &cfg.providers {
                let state = if table.resolve(tag).is_ok() { "set" } else { "missing" };
                println!(
                    "{tag}: remark={} token_env={} ({state})",
                    section.remark, section.token_env
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&cfg_path)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(&cfg_path)?;
                println!("# {}", cfg_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn upload_name(file: &Path) -> Result<String> {
    file.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("no file name in {}", file.display()))
}

async fn upload(cfg: &Config, file: &Path, provider: &str, dry_run: bool) -> Result<()> {
    // Rejected extensions never touch the disk.
    let adapter = cfg.adapter_for(&upload_name(file)?)?;

    let records = {
        let staged = staging::stage(file, adapter.key())?;
        adapter
            .extract_file(staged.path())
            .with_context(|| format!("parsing {}", file.display()))?
    };

    let platform = HttpPlatform::new(cfg.platform.base_url.as_str());
    let reconciler = Reconciler::new(platform, cfg.provider_table(config::env_token));

    if dry_run {
        let preview = reconciler.preview(&records, provider).await?;
        println!(
            "Dry run: {} of {} pending deposits for {} match the statement ({} records)",
            preview.matches.len(),
            preview.pending,
            preview.provider,
            records.len()
        );
        for m in &preview.matches {
            println!(
                "- request {} user {} utr {} amount {}",
                m.request.id, m.request.user_id, m.record.utr_number, m.request.amount
            );
        }
        return Ok(());
    }

    let report = reconciler.run(&records, provider).await?;
    println!("{}", report.summary());
    for failed in report.failures() {
        if let Err(e) = &failed.result {
            println!(
                "- request {} utr {}: {e}",
                failed.matched.request.id, failed.matched.record.utr_number
            );
        }
    }
    Ok(())
}
