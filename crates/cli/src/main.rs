// qmerge: consolidate quote extracts into one dataset and split it back out.

mod exit_codes;
mod logging;
mod merge;
mod schema;
mod settings;
mod split;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use exit_codes::{io_exit_code, recon_exit_code, EXIT_CONFIG, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use quotemerge_io::IoError;
use quotemerge_recon::{MappingPolicy, OutputFormat, ReconError};

#[derive(Parser)]
#[command(name = "qmerge")]
#[command(about = "Consolidate quote extracts into one dataset, then split it by group key")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/quotemerge/quotemerge.toml)
    #[arg(long, global = true, env = "QUOTEMERGE_CONFIG")]
    config: Option<PathBuf>,

    /// More log output (debug)
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings and errors only
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile input tables to the canonical schema and write one dataset
    #[command(after_help = "\
Examples:
  qmerge merge quotes/*.xlsx -o consolidated.xlsx
  qmerge merge a.xlsx b.csv -o all.csv --mapping by-name
  qmerge merge quotes/*.xlsx -o all.xlsx --json > summary.json")]
    Merge {
        /// Input tables (xlsx, xls, xlsm, xlsb, ods, csv, tsv)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (.xlsx, .csv or .tsv)
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Column mapping policy (overrides config)
        #[arg(long, value_enum)]
        mapping: Option<MappingArg>,

        /// Disable per-source row banding on xlsx output
        #[arg(long)]
        no_banding: bool,

        /// Print a JSON summary to stdout
        #[arg(long)]
        json: bool,
    },

    /// Split a consolidated dataset into one file per group key
    #[command(after_help = "\
Examples:
  qmerge split consolidated.xlsx -d outdir
  qmerge split consolidated.xlsx -d outdir --key 'Cotação' --format csv
  qmerge split consolidated.xlsx -d outdir --flat")]
    Split {
        /// Consolidated dataset to split
        input: PathBuf,

        /// Destination directory
        #[arg(long = "dest", short = 'd', default_value = "outdir")]
        dest: PathBuf,

        /// Group key column (overrides config; matched case-insensitively)
        #[arg(long)]
        key: Option<String>,

        /// Artifact format (overrides config)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Write artifacts directly into the destination directory
        /// instead of a subdirectory named after the input
        #[arg(long)]
        flat: bool,

        /// Print a JSON summary to stdout
        #[arg(long)]
        json: bool,
    },

    /// Show the canonical schema and the resolved settings
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MappingArg {
    Auto,
    #[value(alias = "by_name")]
    ByName,
}

impl From<MappingArg> for MappingPolicy {
    fn from(arg: MappingArg) -> Self {
        match arg {
            MappingArg::Auto => MappingPolicy::Auto,
            MappingArg::ByName => MappingPolicy::ByName,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nrecon:   quotemerge-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nrecon:   quotemerge-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::Verbosity::from_flags(cli.verbose, cli.quiet));

    let result = settings::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Merge {
            inputs,
            output,
            mapping,
            no_banding,
            json,
        } => merge::cmd_merge(config, inputs, output, mapping.map(Into::into), no_banding, json),
        Commands::Split {
            input,
            dest,
            key,
            format,
            flat,
            json,
        } => split::cmd_split(config, input, dest, key, format.map(Into::into), flat, json),
        Commands::Schema { json } => schema::cmd_schema(&config, json),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    /// Create error from a pipeline error with proper exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::NothingToConsolidate { skipped, .. } if *skipped > 0 => {
                Some("rerun with -v to see why each input was skipped".to_string())
            }
            ReconError::EmptyDataset => {
                Some("the input has a header row but no data rows".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Create error from a file I/O error with proper exit code.
    pub fn file(err: IoError) -> Self {
        let code = io_exit_code(&err);
        let hint = match &err {
            IoError::UnsupportedFormat { .. } => {
                Some("supported extensions: xlsx, xls, xlsm, xlsb, ods, csv, tsv (write: xlsx, csv, tsv)".to_string())
            }
            IoError::ArtifactNameClash { .. } => {
                Some("keys differing only by '/' or '\\' cannot be written side by side".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
