//! kubecpu - Rewrites kubeReserved.cpu in a GKE kubelet-config.yaml.
//!
//! The reserved CPU is recomputed from the number of logical CPUs on the
//! host (or `--cpus`) and written back to the same file.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kubelet_cpu_reserve::{KubeletConfig, MilliCpu};

const DEFAULT_CONFIG: &str = "/home/kubernetes/kubelet-config.yaml";

#[derive(Debug, Parser)]
#[command(name = "kubecpu", version, about = "Rewrite kubeReserved.cpu in a GKE kubelet config")]
struct Cli {
    /// Path to the kubelet-config.yaml file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Logical CPU count to compute for (default: CPUs on this host)
    #[arg(long)]
    cpus: Option<u64>,

    /// Print the updated file to stdout instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Summary output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Summary of one rewrite.
#[derive(Debug, Serialize)]
struct Summary {
    config: PathBuf,
    cpus: u64,
    previous: Option<String>,
    reserved: String,
    allocatable: Option<String>,
    written: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    if let Err(e) = run(&cli, &mut stdout.lock()) {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli, output: &mut dyn Write) -> Result<()> {
    let cpus = match cli.cpus {
        Some(cpus) => cpus,
        None => num_cpus::get() as u64,
    };

    let data = fs::read(&cli.config)
        .with_context(|| format!("failed to read {}", cli.config.display()))?;
    let mut config = KubeletConfig::deserialize(&data)
        .with_context(|| format!("failed to parse {}", cli.config.display()))?;

    let previous = config.get_reserved_cpu().ok().map(str::to_string);
    let reserved = config
        .compute_reserved_cpu(cpus)
        .context("failed to compute kubeReserved.cpu")?;
    config
        .set_reserved_cpu(&reserved)
        .context("failed to set kubeReserved.cpu")?;
    let updated = config
        .serialize()
        .context("failed to serialize kubelet config")?;

    let allocatable = reserved
        .parse::<MilliCpu>()
        .ok()
        .and_then(|r| MilliCpu::from_cores(cpus).checked_sub(r))
        .map(|a| a.to_string());

    if cli.dry_run {
        output.write_all(&updated)?;
        info!(cpus, %reserved, "dry run, not writing {}", cli.config.display());
        return Ok(());
    }

    let written = updated != data;
    if written {
        fs::write(&cli.config, &updated)
            .with_context(|| format!("failed to write {}", cli.config.display()))?;
        info!(cpus, %reserved, "updated {}", cli.config.display());
    } else {
        info!(cpus, %reserved, "{} already up to date", cli.config.display());
    }

    let summary = Summary {
        config: cli.config.clone(),
        cpus,
        previous,
        reserved,
        allocatable,
        written,
    };
    print_summary(&summary, cli.format, output)
}

fn print_summary(summary: &Summary, format: Format, output: &mut dyn Write) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *output, summary)?;
            writeln!(output)?;
        }
        Format::Text => {
            writeln!(output, "config:      {}", summary.config.display())?;
            writeln!(output, "cpus:        {}", summary.cpus)?;
            writeln!(
                output,
                "previous:    {}",
                summary.previous.as_deref().unwrap_or("<unset>")
            )?;
            writeln!(output, "reserved:    {}", summary.reserved)?;
            if let Some(allocatable) = &summary.allocatable {
                writeln!(output, "allocatable: {}", allocatable)?;
            }
            writeln!(output, "written:     {}", summary.written)?;
        }
    }
    Ok(())
}
