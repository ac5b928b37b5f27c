//! `tochki-report`: build a checkpoint pass report from a spreadsheet log.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use checkpoint_report::{
    SpecReportLayout, SpecReportOptions, build_default_output_path, process_file_with_options,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tochki-report")]
#[command(
    author,
    version,
    about = "Aggregate checkpoint passes per vehicle model into a styled xlsx report"
)]
struct Cli {
    /// Source spreadsheet log (xlsx, xlsm, xls, ods)
    source: PathBuf,

    /// Report path (default: next to the source); an existing file is never overwritten
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plain layout without group and declared-total columns
    #[arg(long)]
    ungrouped: bool,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if !cli.source.is_file() {
        bail!("Source file not found: {}", cli.source.display());
    }

    let path_dest = cli
        .output
        .unwrap_or_else(|| build_default_output_path(&cli.source));
    tracing::debug!(dest = %path_dest.display(), "resolved report destination");
    let options = SpecReportOptions {
        layout: if cli.ungrouped {
            SpecReportLayout::ungrouped()
        } else {
            SpecReportLayout::grouped()
        },
        ..Default::default()
    };

    let report = process_file_with_options(&cli.source, &path_dest, &options)
        .with_context(|| format!("Failed to build report from {}", cli.source.display()))?;

    println!("{}", report.path_file_out.display());
    Ok(())
}
