// File I/O operations

pub mod atomic;
pub mod banding;
pub mod csv;
pub mod error;
pub mod split;
pub mod xlsx;

use std::path::Path;

use quotemerge_core::Table;
use quotemerge_recon::model::{Consolidation, Source};

pub use banding::Banding;
pub use error::IoError;
pub use split::write_split;

/// File formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// xlsx, xlsm, xlsb, xls, ods (read); xlsx (write)
    Spreadsheet,
    Csv,
    Tsv,
}

impl TableFormat {
    pub fn detect(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(IoError::UnsupportedFormat {
                path: path.display().to_string(),
                extension: ext,
            }),
        }
    }
}

/// Read a table, first row as header.
pub fn read_table(path: &Path) -> Result<Table, IoError> {
    match TableFormat::detect(path)? {
        TableFormat::Spreadsheet => xlsx::import(path),
        TableFormat::Csv => csv::import(path),
        TableFormat::Tsv => csv::import_tsv(path),
    }
}

/// Read `path` as a consolidation source identified by its file name.
/// Read failures are kept on the source, not raised.
pub fn load_source(path: &Path) -> Source {
    let id = source_id(path);
    match read_table(path) {
        Ok(table) => Source::loaded(id, table),
        Err(e) => Source::failed(id, e.to_string()),
    }
}

/// Provenance identifier for a file input: its base name.
pub fn source_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Write `table` to `path` atomically; format follows the extension.
pub fn write_table(table: &Table, path: &Path) -> Result<(), IoError> {
    match writable_format(path)? {
        TableFormat::Spreadsheet => xlsx::export(table, path, &xlsx::SheetStyle::default()),
        TableFormat::Csv => csv::export(table, path),
        TableFormat::Tsv => csv::export_tsv(table, path),
    }
}

/// Persist a consolidated dataset. On xlsx output the header row is frozen
/// and, when `banding` is set, each source block gets an alternating fill.
pub fn write_consolidated(
    consolidation: &Consolidation,
    path: &Path,
    banding: bool,
) -> Result<(), IoError> {
    let table = consolidation.to_table();
    match writable_format(path)? {
        TableFormat::Spreadsheet => {
            let style = xlsx::SheetStyle {
                banding: banding.then(|| Banding::from_blocks(&consolidation.blocks)),
                freeze_header: true,
            };
            xlsx::export(&table, path, &style)
        }
        TableFormat::Csv => csv::export(&table, path),
        TableFormat::Tsv => csv::export_tsv(&table, path),
    }
}

/// Format `path` would be written in; spreadsheets must be `.xlsx`.
pub fn writable_format(path: &Path) -> Result<TableFormat, IoError> {
    let format = TableFormat::detect(path)?;
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    if format == TableFormat::Spreadsheet && !is_xlsx {
        return Err(IoError::UnsupportedFormat {
            path: path.display().to_string(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        });
    }
    Ok(format)
}
