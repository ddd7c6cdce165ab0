use std::fmt;

use quotemerge_core::CoreError;

#[derive(Debug)]
pub enum ReconError {
    /// No sources were supplied to the consolidator.
    NoSources,
    /// Every source was unreadable or contained only empty rows.
    NothingToConsolidate { sources: usize, skipped: usize },
    /// The designated group key column is absent from the dataset header.
    MissingKeyColumn(String),
    /// The dataset to split has a header but no data rows.
    EmptyDataset,
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank provenance field, clash with schema, etc.).
    ConfigValidation(String),
    /// Invalid canonical schema.
    Schema(CoreError),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSources => write!(f, "no source tables supplied"),
            Self::NothingToConsolidate { sources, skipped } => write!(
                f,
                "no table with data found ({sources} source(s), {skipped} unreadable)"
            ),
            Self::MissingKeyColumn(column) => write!(f, "column '{column}' not found"),
            Self::EmptyDataset => write!(f, "dataset has no data rows"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Schema(e) => write!(f, "invalid schema: {e}"),
        }
    }
}

impl std::error::Error for ReconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for ReconError {
    fn from(e: CoreError) -> Self {
        Self::Schema(e)
    }
}
