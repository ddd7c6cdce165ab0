// CSV/TSV import/export

use std::io::Read;
use std::path::Path;

use quotemerge_core::{CellValue, Table};

use crate::atomic::write_atomic;
use crate::error::IoError;

pub fn import(path: &Path) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter).map_err(|message| read_err(path, message))
}

pub fn import_tsv(path: &Path) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, b'\t').map_err(|message| read_err(path, message))
}

fn read_err(path: &Path, message: String) -> IoError {
    IoError::Read {
        path: path.display().to_string(),
        message,
    }
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Consistent lines times field count; wider wins ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let open_err = |e: std::io::Error| IoError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(open_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(open_err)?;

    // Strip a UTF-8 BOM, common on Excel-exported CSVs
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        bytes.drain(..3);
    }

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Cells stay text: no number inference, so codes like CEP keep leading zeros.
fn import_from_string(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(header) => header
            .map_err(|e| e.to_string())?
            .iter()
            .map(str::to_string)
            .collect(),
        None => return Ok(Table::default()),
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    // The header row defines the columns; trailing delimiters add none.
    Ok(Table::with_header_width(headers, rows))
}

pub fn export(table: &Table, path: &Path) -> Result<(), IoError> {
    export_with_delimiter(table, path, b',')
}

pub fn export_tsv(table: &Table, path: &Path) -> Result<(), IoError> {
    export_with_delimiter(table, path, b'\t')
}

fn export_with_delimiter(table: &Table, path: &Path, delimiter: u8) -> Result<(), IoError> {
    write_atomic(path, |tmp| {
        let write_err = |message: String| IoError::Write {
            path: path.display().to_string(),
            message,
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(tmp)
            .map_err(|e| write_err(e.to_string()))?;

        writer
            .write_record(&table.headers)
            .map_err(|e| write_err(e.to_string()))?;
        for row in &table.rows {
            let record: Vec<String> = row.iter().map(CellValue::display).collect();
            writer
                .write_record(&record)
                .map_err(|e| write_err(e.to_string()))?;
        }

        writer.flush().map_err(|e| write_err(e.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sniff_prefers_semicolon_for_excel_exports() {
        let content = "Codigo;Produto;Velocidade\n1;Link;100\n2;Link;200\n";
        assert_eq!(sniff_delimiter(content), b';');
        assert_eq!(sniff_delimiter("a,b\n1,2\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn import_keeps_text_and_pads_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("q.csv");
        fs::write(&path, "CEP - A,Produto\n01310100\n02000000,Link\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers, vec!["CEP - A", "Produto"]);
        assert_eq!(
            table.rows,
            vec![
                vec![CellValue::Text("01310100".into()), CellValue::Empty],
                vec![CellValue::Text("02000000".into()), CellValue::Text("Link".into())],
            ]
        );
    }

    #[test]
    fn trailing_delimiter_adds_no_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("export.csv");
        fs::write(&path, "name,id\nx,1,\ny,2,,\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers, vec!["name", "id"]);
        assert_eq!(table.width(), 2);
        assert_eq!(
            table.rows[1],
            vec![CellValue::Text("y".into()), CellValue::Text("2".into())]
        );
    }

    #[test]
    fn import_decodes_windows_1252() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Município" in Windows-1252
        let mut bytes = b"Munic".to_vec();
        bytes.push(0xED);
        bytes.extend_from_slice(b"pio,UF\nS\xE3o Paulo,SP\n");
        fs::write(&path, bytes).unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers[0], "Município");
        assert_eq!(table.rows[0][0], CellValue::Text("São Paulo".into()));
    }

    #[test]
    fn import_strips_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}Codigo,Produto\n1,x\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers[0], "Codigo");
    }

    #[test]
    fn empty_file_is_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.width(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn export_writes_header_and_display_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::Number(12.0), CellValue::Empty]],
        );

        export(&table, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n12,\n");
    }
}
