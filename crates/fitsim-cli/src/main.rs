use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fitsim_cli::commands::calc::{handle_calc, CalcOptions};
use fitsim_cli::commands::items::handle_items;
use fitsim_cli::config::{load_catalog, OutputFormat};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fitting simulation utilities")]
struct Cli {
    /// Item catalog to load instead of the configured one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog items.
    Items {
        /// Only show items whose name contains this text.
        #[arg(long)]
        search: Option<String>,
    },
    /// Calculate a stored fit and print its modified attributes.
    Calc {
        /// Fit record (JSON) to calculate.
        #[arg(long)]
        fit: PathBuf,
        /// Fit records whose projectable modules and drones target the fit.
        #[arg(long = "project")]
        project: Vec<PathBuf>,
        /// Restrict output to these attributes.
        #[arg(long = "attr")]
        attributes: Vec<String>,
        /// Only print attributes whose value was modified.
        #[arg(long)]
        changed: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Command::Items { search } => handle_items(&catalog, search.as_deref(), cli.format),
        Command::Calc {
            fit,
            project,
            attributes,
            changed,
        } => handle_calc(
            &catalog,
            &CalcOptions {
                fit,
                projected: project,
                attributes,
                changed_only: changed,
                format: cli.format,
            },
        ),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
