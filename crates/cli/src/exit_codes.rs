//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts rely on these values; do not renumber them.
//!
//! | Code | Description                                              |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad args, unsupported output extension)     |
//! | 3    | Invalid config file                                      |
//! | 4    | Structural error (group key column missing)              |
//! | 5    | Empty input (no sources, no rows, header-only dataset)   |
//! | 6    | I/O error (unreadable input, failed write)               |
//!
//! A source that cannot be read during `merge` is skipped, not an error;
//! exit 5 is returned only when no source contributed any rows.

use quotemerge_io::IoError;
use quotemerge_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 3;

/// Designated key column absent from the dataset header.
pub const EXIT_STRUCTURAL: u8 = 4;

/// Nothing to do: no sources, no surviving rows, or no data rows to split.
pub const EXIT_EMPTY_INPUT: u8 = 5;

/// File could not be read or written.
pub const EXIT_IO: u8 = 6;

pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::NoSources
        | ReconError::NothingToConsolidate { .. }
        | ReconError::EmptyDataset => EXIT_EMPTY_INPUT,
        ReconError::MissingKeyColumn(_) => EXIT_STRUCTURAL,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) | ReconError::Schema(_) => {
            EXIT_CONFIG
        }
    }
}

pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::UnsupportedFormat { .. } => EXIT_USAGE,
        IoError::Open { .. } | IoError::Read { .. } | IoError::Write { .. } => EXIT_IO,
        IoError::ArtifactNameClash { .. } => EXIT_ERROR,
    }
}
