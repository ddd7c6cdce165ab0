use crate::cell::CellValue;

/// A rectangular table: one header row plus untyped body rows.
///
/// Raw source extracts, the persisted consolidated dataset and every output
/// artifact share this shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding ragged rows (and a short header) to a single width.
    pub fn new(mut headers: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(headers.len());

        headers.resize(width, String::new());
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }

        Self { headers, rows }
    }

    /// Build a table whose width is fixed by the header: short rows are
    /// padded with `Empty`, cells past the last header are discarded.
    pub fn with_header_width(headers: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Keep only the first `limit` columns.
    pub fn truncate_columns(&mut self, limit: usize) {
        if self.headers.len() <= limit {
            return;
        }
        self.headers.truncate(limit);
        for row in &mut self.rows {
            row.truncate(limit);
        }
    }

    /// Trimmed, case-insensitive header lookup. First match wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_uppercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_uppercase() == wanted)
    }
}
