// Excel import (xlsx, xlsm, xlsb, xls, ods) and xlsx export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Color, DocProperties, ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use quotemerge_core::{CellValue, Table};

use crate::atomic::write_atomic;
use crate::banding::Banding;
use crate::error::IoError;

/// Import the first worksheet of a workbook. The first row of the used range
/// is the header; columns left of the used range are kept as blank columns so
/// positions line up with the sheet's A, B, C...
pub fn import(path: &Path) -> Result<Table, IoError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| IoError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IoError::Read {
            path: path.display().to_string(),
            message: "workbook contains no sheets".to_string(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::Read {
            path: path.display().to_string(),
            message: format!("failed to read sheet '{}': {}", sheet_name, e),
        })?;

    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Ok(Table::default());
    }

    // Range start offset (data may not begin at A1)
    let (_, data_start_col) = range.start().unwrap_or((0, 0));
    let lead = data_start_col as usize;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => std::iter::repeat(String::new())
            .take(lead)
            .chain(header.iter().map(|cell| convert_cell(cell).display().trim().to_string()))
            .collect(),
        None => return Ok(Table::default()),
    };

    let body: Vec<Vec<CellValue>> = rows
        .map(|row| {
            std::iter::repeat(CellValue::Empty)
                .take(lead)
                .chain(row.iter().map(convert_cell))
                .collect()
        })
        .collect();

    debug!(path = %path.display(), sheet = %sheet_name, rows = body.len(), cols = headers.len(), "imported worksheet");
    Ok(Table::new(headers, body))
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial number (1900 date system), kept numeric so it round-trips
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_text(s),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}

/// Presentation applied on export. Never changes cell values.
#[derive(Debug, Clone, Default)]
pub struct SheetStyle {
    pub banding: Option<Banding>,
    pub freeze_header: bool,
}

/// Write `table` as a single-sheet xlsx workbook.
///
/// Document properties carry a fixed creation date, so identical tables
/// produce byte-identical files.
pub fn export(table: &Table, path: &Path, style: &SheetStyle) -> Result<(), IoError> {
    let write_err = |e: XlsxError| IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1).map_err(write_err)?;
    let properties = DocProperties::new().set_creation_datetime(&created);
    workbook.set_properties(&properties);

    let worksheet = workbook.add_worksheet();
    write_sheet(worksheet, table, style).map_err(write_err)?;

    let buffer = workbook.save_to_buffer().map_err(write_err)?;

    write_atomic(path, |tmp| {
        std::fs::write(tmp, &buffer).map_err(|e| IoError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })
}

fn write_sheet(worksheet: &mut Worksheet, table: &Table, style: &SheetStyle) -> Result<(), XlsxError> {
    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    let width = table.width();
    for (idx, row) in table.rows.iter().enumerate() {
        let row32 = (idx + 1) as u32;
        let fill = style
            .banding
            .as_ref()
            .and_then(|b| b.color_for_row(idx))
            .map(|rgb| Format::new().set_background_color(Color::RGB(rgb)));

        for col in 0..width {
            let col16 = col as u16;
            let cell = row.get(col).unwrap_or(&CellValue::Empty);
            match (cell, &fill) {
                (CellValue::Empty, Some(format)) => {
                    worksheet.write_blank(row32, col16, format)?;
                }
                (CellValue::Empty, None) => {}
                (CellValue::Text(s), Some(format)) => {
                    worksheet.write_string_with_format(row32, col16, s, format)?;
                }
                (CellValue::Text(s), None) => {
                    worksheet.write_string(row32, col16, s)?;
                }
                (CellValue::Number(n), Some(format)) => {
                    worksheet.write_number_with_format(row32, col16, *n, format)?;
                }
                (CellValue::Number(n), None) => {
                    worksheet.write_number(row32, col16, *n)?;
                }
                (CellValue::Bool(b), Some(format)) => {
                    worksheet.write_boolean_with_format(row32, col16, *b, format)?;
                }
                (CellValue::Bool(b), None) => {
                    worksheet.write_boolean(row32, col16, *b)?;
                }
            }
        }
    }

    if style.freeze_header {
        worksheet.set_freeze_panes(1, 0)?;
    }

    Ok(())
}
