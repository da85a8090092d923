use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use invoicer::config::{SETTINGS_ENV, Settings};
use invoicer::core::{
    InvoiceSummary, artifact_stem, compose, resolve_invoice, write_artifact,
};
use invoicer::template::read_template;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "invoicer", version, about = "Number and render an invoice from a YAML template")]
struct Cli {
    /// Invoice template (YAML)
    template_file: PathBuf,

    /// Settings file (default: ~/.config/invoicer.yml)
    #[arg(short = 'c', long = "config", env = SETTINGS_ENV)]
    config: Option<PathBuf>,

    /// Resolve the number and print the summary without writing the PDF
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.template_file.exists() {
        anyhow::bail!("template file {} does not exist", cli.template_file.display());
    }

    let settings_path = match cli.config {
        Some(path) => path,
        None => Settings::default_path().context("cannot locate the home directory")?,
    };
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    let mut invoice = read_template(&cli.template_file)?;

    let ledger = settings.ledger();
    let number = resolve_invoice(&mut invoice, &ledger)?;
    let _reservation = if cli.dry_run {
        None
    } else {
        Some(ledger.reserve(number)?)
    };

    let layout = settings.layout();
    println!("{}", InvoiceSummary::new(&invoice, layout.format())?);

    let blocks = compose(&invoice, &layout)?;
    if cli.dry_run {
        tracing::info!(number, blocks = blocks.len(), "dry run, nothing written");
        return Ok(());
    }

    let stem = artifact_stem(number, &invoice.customer().name);
    let renderer = settings.renderer().title(format!("Invoice {number}"));
    let path = write_artifact(&settings.output_directory, &stem, &renderer, &blocks)?;
    println!("Written {}", path.display());
    Ok(())
}
