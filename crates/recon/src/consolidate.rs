use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::ReconError;
use crate::model::{Consolidation, SkippedSource, Source, SourceBlock, TaggedRecord};
use crate::reconcile::reconcile;

/// Merge `sources` into one provenance-tagged dataset.
///
/// Sources are processed in order and each source's rows stay contiguous.
/// Unreadable sources are recorded in `skipped`; the call only fails when the
/// list is empty or no source contributes a single non-empty row.
pub fn consolidate(
    sources: Vec<Source>,
    config: &PipelineConfig,
) -> Result<Consolidation, ReconError> {
    if sources.is_empty() {
        return Err(ReconError::NoSources);
    }

    let schema = &config.schema;
    let source_count = sources.len();
    let mut records: Vec<TaggedRecord> = Vec::new();
    let mut blocks: Vec<SourceBlock> = Vec::new();
    let mut skipped: Vec<SkippedSource> = Vec::new();
    let mut dropped_empty_rows = 0;

    for source in sources {
        let mut table = match source.table {
            Ok(table) => table,
            Err(reason) => {
                warn!(source = %source.id, %reason, "skipping unreadable source");
                skipped.push(SkippedSource { source: source.id, reason });
                continue;
            }
        };

        // Columns past the canonical width are outside the reading window.
        table.truncate_columns(schema.len());

        let reconciled = reconcile(&table, schema, config.mapping);
        if !reconciled.missing_fields.is_empty() {
            debug!(
                source = %source.id,
                missing = ?reconciled.missing_fields,
                "canonical fields absent from source, filled with nulls"
            );
        }
        if !reconciled.dropped_columns.is_empty() {
            debug!(source = %source.id, dropped = ?reconciled.dropped_columns, "dropped unmatched columns");
        }

        let start = records.len();
        let input_rows = reconciled.records.len();
        for record in reconciled.records {
            if record.is_all_null() {
                dropped_empty_rows += 1;
                continue;
            }
            records.push(TaggedRecord {
                source: source.id.clone(),
                record,
            });
        }

        let kept = records.len() - start;
        info!(
            source = %source.id,
            strategy = %reconciled.strategy,
            rows = kept,
            empty = input_rows - kept,
            "reconciled source"
        );

        if kept == 0 {
            continue;
        }
        blocks.push(SourceBlock {
            source: source.id,
            start,
            rows: kept,
            strategy: reconciled.strategy,
        });
    }

    if records.is_empty() {
        return Err(ReconError::NothingToConsolidate {
            sources: source_count,
            skipped: skipped.len(),
        });
    }

    Ok(Consolidation {
        schema: schema.clone(),
        provenance_field: config.provenance_field.clone(),
        records,
        blocks,
        skipped,
        dropped_empty_rows,
    })
}
