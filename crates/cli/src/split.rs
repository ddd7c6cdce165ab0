// qmerge split: one artifact per group key

use std::path::{Path, PathBuf};

use quotemerge_io::{read_table, write_split};
use quotemerge_recon::{split, KeyFilter, OutputFormat, PipelineConfig, ReconError};
use serde_json::json;

use crate::CliError;

pub fn cmd_split(
    config: PipelineConfig,
    input: PathBuf,
    dest: PathBuf,
    key: Option<String>,
    format: Option<OutputFormat>,
    flat: bool,
    json: bool,
) -> Result<(), CliError> {
    let key = key.unwrap_or(config.key_field);
    let format = format.unwrap_or(config.output.format);
    if key.trim().is_empty() {
        return Err(CliError::usage("group key column must not be blank"));
    }

    let table = read_table(&input).map_err(CliError::file)?;
    let plan = split(&table, &key, &KeyFilter).map_err(|e| match e {
        ReconError::MissingKeyColumn(_) => {
            let available = table.headers.join(", ");
            CliError::recon(e).with_hint(format!("available columns: {}", available))
        }
        other => CliError::recon(other),
    })?;

    let dir = artifact_dir(&input, &dest, flat);
    let summary = write_split(&plan, &dir, format).map_err(CliError::file)?;

    if json {
        let body = json!({
            "input": input.display().to_string(),
            "key": key,
            "format": format.extension(),
            "directory": summary.directory,
            "artifacts": summary.artifacts,
            "dropped_rows": summary.dropped_rows,
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| CliError::io(format!("cannot encode summary: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    let prefix = if flat { String::new() } else { format!("{}/", stem_of(&input)) };
    for artifact in &summary.artifacts {
        eprintln!("generated: {}{} ({} rows)", prefix, artifact.file_name, artifact.rows);
    }
    if summary.dropped_rows > 0 {
        eprintln!("skipped {} rows with an empty '{}'", summary.dropped_rows, key);
    }
    eprintln!(
        "{} files generated in {}",
        summary.artifact_count(),
        absolute(&dir).display()
    );
    Ok(())
}

/// `dest/<input stem>/`, or `dest` itself when `flat`.
fn artifact_dir(input: &Path, dest: &Path, flat: bool) -> PathBuf {
    if flat {
        dest.to_path_buf()
    } else {
        dest.join(stem_of(input))
    }
}

fn stem_of(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "split".to_string())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
