use quotemerge_core::{CellValue, Record, Schema, Table};
use serde::Serialize;

use crate::key_filter::KeyFilterStats;
use crate::mapper::MappingStrategy;

// ---------------------------------------------------------------------------
// Consolidation input
// ---------------------------------------------------------------------------

/// One input extract as handed to the consolidator.
///
/// Read failures are carried rather than raised so that one corrupt file
/// does not abort the run.
#[derive(Debug, Clone)]
pub struct Source {
    /// Provenance identifier (the file's base name for file inputs).
    pub id: String,
    pub table: Result<Table, String>,
}

impl Source {
    pub fn loaded(id: impl Into<String>, table: Table) -> Self {
        Self { id: id.into(), table: Ok(table) }
    }

    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { id: id.into(), table: Err(reason.into()) }
    }
}

// ---------------------------------------------------------------------------
// Consolidation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRecord {
    pub source: String,
    pub record: Record,
}

/// A contiguous run of consolidated rows from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBlock {
    pub source: String,
    /// Index of the block's first row in the dataset (0 = first data row).
    pub start: usize,
    pub rows: usize,
    pub strategy: MappingStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSource {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Consolidation {
    pub schema: Schema,
    pub provenance_field: String,
    pub records: Vec<TaggedRecord>,
    /// One entry per source that contributed rows, in dataset order.
    pub blocks: Vec<SourceBlock>,
    pub skipped: Vec<SkippedSource>,
    /// Fully-empty rows removed across all sources.
    pub dropped_empty_rows: usize,
}

impl Consolidation {
    /// Persisted form: canonical fields followed by the provenance column.
    pub fn to_table(&self) -> Table {
        let mut headers = self.schema.names().to_vec();
        headers.push(self.provenance_field.clone());

        let rows = self
            .records
            .iter()
            .map(|tagged| {
                let mut row = tagged.record.values().to_vec();
                row.push(CellValue::Text(tagged.source.clone()));
                row
            })
            .collect();

        Table { headers, rows }
    }

    pub fn summary(&self) -> ConsolidationSummary {
        ConsolidationSummary {
            rows: self.records.len(),
            sources: self.blocks.clone(),
            skipped: self.skipped.clone(),
            dropped_empty_rows: self.dropped_empty_rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationSummary {
    pub rows: usize,
    pub sources: Vec<SourceBlock>,
    pub skipped: Vec<SkippedSource>,
    pub dropped_empty_rows: usize,
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// Rows sharing one trimmed group key, key column removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Group {
    /// Artifact file name: the key plus `extension`.
    ///
    /// Path separators and NUL are replaced with `_` and dot-only keys are
    /// rewritten, so the artifact always lands inside its directory.
    pub fn file_name(&self, extension: &str) -> String {
        let mut stem: String = self
            .key
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '_',
                c => c,
            })
            .collect();
        if stem.chars().all(|c| c == '.') {
            stem = stem.replace('.', "_");
        }
        format!("{stem}.{extension}")
    }
}

#[derive(Debug, Clone)]
pub struct SplitPlan {
    /// Dataset header without the key column.
    pub headers: Vec<String>,
    /// Ascending by key.
    pub groups: Vec<Group>,
    pub stats: KeyFilterStats,
}

impl SplitPlan {
    pub fn group_table(&self, group: &Group) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: group.rows.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub key: String,
    pub file_name: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SplitSummary {
    pub directory: String,
    pub artifacts: Vec<ArtifactSummary>,
    /// Rows excluded for an empty or null key.
    pub dropped_rows: usize,
}

impl SplitSummary {
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    pub fn total_rows(&self) -> usize {
        self.artifacts.iter().map(|a| a.rows).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(key: &str) -> Group {
        Group { key: key.into(), rows: Vec::new() }
    }

    #[test]
    fn file_name_appends_extension() {
        assert_eq!(group("COT-001").file_name("xlsx"), "COT-001.xlsx");
        assert_eq!(group("q 1.xlsx").file_name("csv"), "q 1.xlsx.csv");
    }

    #[test]
    fn file_name_cannot_escape_directory() {
        assert_eq!(group("../etc/passwd").file_name("csv"), ".._etc_passwd.csv");
        assert_eq!(group("..").file_name("csv"), "__.csv");
        assert_eq!(group("a\\b").file_name("xlsx"), "a_b.xlsx");
    }

    #[test]
    fn summary_totals() {
        let summary = SplitSummary {
            directory: "out".into(),
            artifacts: vec![
                ArtifactSummary { key: "a".into(), file_name: "a.csv".into(), rows: 2 },
                ArtifactSummary { key: "b".into(), file_name: "b.csv".into(), rows: 3 },
            ],
            dropped_rows: 1,
        };
        assert_eq!(summary.artifact_count(), 2);
        assert_eq!(summary.total_rows(), 5);
    }
}
