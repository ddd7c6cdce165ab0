// qmerge merge: consolidate input tables into one dataset

use std::path::{Path, PathBuf};

use quotemerge_io::{load_source, write_consolidated, writable_format};
use quotemerge_recon::{consolidate, MappingPolicy, PipelineConfig};
use serde_json::json;

use crate::CliError;

pub fn cmd_merge(
    mut config: PipelineConfig,
    inputs: Vec<PathBuf>,
    output: PathBuf,
    mapping: Option<MappingPolicy>,
    no_banding: bool,
    json: bool,
) -> Result<(), CliError> {
    if let Some(mapping) = mapping {
        config.mapping = mapping;
    }
    if no_banding {
        config.output.banding = false;
    }

    // Fail on a bad output path before reading anything.
    writable_format(&output).map_err(CliError::file)?;
    if inputs.iter().any(|input| same_file(input, &output)) {
        return Err(CliError::usage(format!(
            "output {} is also an input",
            output.display()
        ))
        .with_hint("choose a different output path"));
    }

    tracing::info!(inputs = inputs.len(), mapping = ?config.mapping, "consolidating");
    let sources = inputs.iter().map(|path| load_source(path)).collect();
    let consolidation = consolidate(sources, &config).map_err(CliError::recon)?;

    write_consolidated(&consolidation, &output, config.output.banding).map_err(CliError::file)?;

    let summary = consolidation.summary();
    if json {
        let body = json!({
            "output": output.display().to_string(),
            "rows": summary.rows,
            "sources": summary.sources,
            "skipped": summary.skipped,
            "dropped_empty_rows": summary.dropped_empty_rows,
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| CliError::io(format!("cannot encode summary: {}", e)))?;
        println!("{}", text);
    } else {
        for block in &summary.sources {
            eprintln!("  {}: {} rows ({})", block.source, block.rows, block.strategy);
        }
        for skipped in &summary.skipped {
            eprintln!("  {}: skipped ({})", skipped.source, skipped.reason);
        }
        eprintln!(
            "consolidated {} rows from {} of {} inputs into {}",
            summary.rows,
            summary.sources.len(),
            inputs.len(),
            output.display()
        );
    }
    Ok(())
}

/// Resolved comparison when both paths exist, literal otherwise.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
