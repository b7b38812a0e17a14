//! maven-repo-upload CLI
//!
//! Uploads every artifact of a local Maven repository to a remote artifact service

use anyhow::{Context, Result};
use clap::Parser;
use maven_repo_upload::{
    BatchUploadOptions, ConfigLoadOptions, ConfigLoader, FileConfig, HttpRepositoryClient,
    RepositoryScanner, UploadOrchestrator,
};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Upload a local Maven repository to a remote artifact service
#[derive(Parser)]
#[command(name = "maven-repo-upload")]
#[command(version)]
#[command(about = "Upload a local Maven repository to a remote artifact service", long_about = None)]
struct Cli {
    /// Local repository root (default: ~/.m2/repository)
    #[arg(short = 'p', long)]
    repo_path: Option<String>,

    /// Base URL of the artifact service
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Organization name (multi-tenant deployments only)
    #[arg(short = 'e', long)]
    organization: Option<String>,

    /// Personal access token
    #[arg(short = 'k', long)]
    token: Option<String>,

    /// Target repository id
    #[arg(short = 'r', long)]
    repo_id: Option<String>,

    /// Number of concurrent workers (default: available CPUs)
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Configuration file (default: ./.maven-repo-upload.yaml)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Abort when the target repository cannot be verified
    #[arg(long)]
    strict_repo_check: bool,

    /// Skip versions already present remotely
    #[arg(long)]
    skip_existing: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    /// Command-line layer of the configuration; unset flags stay `None`
    fn config_layer(&self) -> FileConfig {
        FileConfig {
            repo_path: self.repo_path.clone(),
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            organization: self.organization.clone(),
            repo_id: self.repo_id.clone(),
            workers: self.workers,
            strict_repository_check: self.strict_repo_check.then_some(true),
            skip_existing: self.skip_existing.then_some(true),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "aborted");
            eprintln!("\n❌ Error");
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let options = ConfigLoadOptions::from_process(cli.config.clone(), cli.config_layer());
    let config = ConfigLoader::load(options)
        .await
        .context("invalid configuration")?;

    println!("\n📦 maven-repo-upload\n");

    let scanner = RepositoryScanner::new(config.workers);
    let scan = scanner
        .scan(&config.repo_path)
        .await
        .context("repository scan failed")?;
    println!(
        "Found {} artifacts in {}",
        scan.descriptors.len(),
        scan.root.display()
    );
    if !scan.skipped.is_empty() {
        println!("Skipped {} entries (see log)", scan.skipped.len());
    }

    let client = HttpRepositoryClient::connect(&config)
        .await
        .context("cannot use target repository")?;

    let orchestrator = UploadOrchestrator::new(
        Arc::new(client),
        BatchUploadOptions {
            workers: config.workers,
            skip_existing: config.skip_existing,
        },
    );
    let report = orchestrator.upload_all(scan.descriptors).await;

    println!("\n✅ Upload finished");
    for line in report.summary_lines() {
        println!("  {}", line);
    }

    Ok(0)
}
