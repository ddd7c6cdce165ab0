use quotemerge_core::CellValue;
use serde::Serialize;

/// Decides which rows take part in grouping and under which key.
///
/// The key is the cell's display text with surrounding whitespace trimmed.
/// Rows whose key is null or blank are unassigned entries: they are dropped
/// without error and only counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyFilterStats {
    pub kept: usize,
    pub dropped: usize,
}

impl KeyFilter {
    pub fn key_of(&self, cell: &CellValue) -> Option<String> {
        if cell.is_null() {
            return None;
        }
        let key = cell.display().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// Resolve the key of every row in `rows` from column `key_col`.
    ///
    /// Returns `(key, row index)` for kept rows in input order.
    pub fn partition(
        &self,
        rows: &[Vec<CellValue>],
        key_col: usize,
    ) -> (Vec<(String, usize)>, KeyFilterStats) {
        let mut stats = KeyFilterStats::default();
        let mut kept = Vec::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let key = row.get(key_col).and_then(|cell| self.key_of(cell));
            match key {
                Some(key) => {
                    stats.kept += 1;
                    kept.push((key, idx));
                }
                None => stats.dropped += 1,
            }
        }

        (kept, stats)
    }
}
