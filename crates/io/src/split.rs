use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quotemerge_recon::model::{ArtifactSummary, SplitPlan, SplitSummary};
use quotemerge_recon::OutputFormat;
use tracing::{debug, info};

use crate::error::IoError;

/// Write one artifact per group of `plan` into `dir`, in group order.
///
/// File names are checked for clashes (ignoring case) before anything is
/// written. Every artifact is first written to a staging directory inside
/// `dir` and only moved into place once all of them exist, so a failed run
/// leaves no artifacts behind. `dir` is created if missing.
pub fn write_split(plan: &SplitPlan, dir: &Path, format: OutputFormat) -> Result<SplitSummary, IoError> {
    let ext = format.extension();
    check_name_clashes(plan, ext)?;

    let mut summary = SplitSummary {
        directory: dir.display().to_string(),
        artifacts: Vec::new(),
        dropped_rows: plan.stats.dropped,
    };
    if plan.groups.is_empty() {
        return Ok(summary);
    }

    let created = !dir.exists();
    std::fs::create_dir_all(dir).map_err(|e| write_err(dir, e))?;

    let staging = dir.join(format!(".qmerge-staging-{}", std::process::id()));
    let result = stage(plan, &staging, ext).and_then(|artifacts| publish(&staging, dir, artifacts));
    let _ = std::fs::remove_dir_all(&staging);

    match result {
        Ok(artifacts) => {
            summary.artifacts = artifacts;
            Ok(summary)
        }
        Err(e) => {
            if created {
                let _ = std::fs::remove_dir(dir);
            }
            Err(e)
        }
    }
}

/// Two keys may not share an artifact name, compared case-insensitively
/// since `A.xlsx` and `a.xlsx` are one file on Windows and macOS.
fn check_name_clashes(plan: &SplitPlan, ext: &str) -> Result<(), IoError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for group in &plan.groups {
        let file_name = group.file_name(ext);
        if let Some(other) = seen.insert(file_name.to_lowercase(), &group.key) {
            return Err(IoError::ArtifactNameClash {
                file_name,
                keys: (other.to_string(), group.key.clone()),
            });
        }
    }
    Ok(())
}

fn stage(plan: &SplitPlan, staging: &Path, ext: &str) -> Result<Vec<ArtifactSummary>, IoError> {
    if staging.exists() {
        std::fs::remove_dir_all(staging).map_err(|e| write_err(staging, e))?;
    }
    std::fs::create_dir(staging).map_err(|e| write_err(staging, e))?;

    let mut artifacts = Vec::with_capacity(plan.groups.len());
    for group in &plan.groups {
        let file_name = group.file_name(ext);
        crate::write_table(&plan.group_table(group), &staging.join(&file_name))?;
        debug!(artifact = %file_name, rows = group.rows.len(), "staged artifact");
        artifacts.push(ArtifactSummary {
            key: group.key.clone(),
            file_name,
            rows: group.rows.len(),
        });
    }
    Ok(artifacts)
}

/// Move staged artifacts into `dir`; on failure, remove the ones already moved.
fn publish(
    staging: &Path,
    dir: &Path,
    artifacts: Vec<ArtifactSummary>,
) -> Result<Vec<ArtifactSummary>, IoError> {
    let mut published: Vec<PathBuf> = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        let target = dir.join(&artifact.file_name);
        if let Err(e) = std::fs::rename(staging.join(&artifact.file_name), &target) {
            for path in &published {
                let _ = std::fs::remove_file(path);
            }
            return Err(write_err(&target, e));
        }
        info!(artifact = %target.display(), rows = artifact.rows, "wrote artifact");
        published.push(target);
    }
    Ok(artifacts)
}

fn write_err(path: &Path, e: std::io::Error) -> IoError {
    IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotemerge_core::CellValue;
    use quotemerge_recon::model::Group;
    use quotemerge_recon::KeyFilterStats;
    use tempfile::tempdir;

    fn plan(keys: &[&str]) -> SplitPlan {
        SplitPlan {
            headers: vec!["id".into()],
            groups: keys
                .iter()
                .map(|k| Group {
                    key: k.to_string(),
                    rows: vec![vec![CellValue::Text(format!("{k}-row"))]],
                })
                .collect(),
            stats: KeyFilterStats { kept: keys.len(), dropped: 2 },
        }
    }

    #[test]
    fn writes_one_file_per_group() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/out");

        let summary = write_split(&plan(&["a", "b"]), &out, OutputFormat::Csv).unwrap();

        assert_eq!(summary.artifact_count(), 2);
        assert_eq!(summary.total_rows(), 2);
        assert_eq!(summary.dropped_rows, 2);
        assert_eq!(
            std::fs::read_to_string(out.join("a.csv")).unwrap(),
            "id\na-row\n"
        );
        assert!(out.join("b.csv").exists());
    }

    #[test]
    fn name_clash_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        let err = write_split(&plan(&["a/b", "a_b"]), &out, OutputFormat::Csv).unwrap_err();

        assert!(matches!(err, IoError::ArtifactNameClash { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn no_groups_creates_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        let summary = write_split(&plan(&[]), &out, OutputFormat::Xlsx).unwrap();
        assert_eq!(summary.artifact_count(), 0);
        assert!(!out.exists());
    }

    #[test]
    fn keys_differing_only_by_case_clash() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        let err = write_split(&plan(&["A", "a"]), &out, OutputFormat::Csv).unwrap_err();

        assert!(matches!(err, IoError::ArtifactNameClash { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn failed_write_leaves_no_artifacts() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        // Second artifact name exceeds the file name limit.
        let long_key = "b".repeat(300);

        let err = write_split(&plan(&["a", &long_key]), &out, OutputFormat::Csv).unwrap_err();

        assert!(matches!(err, IoError::Write { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn failed_write_keeps_existing_directory_clean() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("keep.txt"), "x").unwrap();
        let long_key = "b".repeat(300);

        assert!(write_split(&plan(&["a", &long_key]), &out, OutputFormat::Csv).is_err());

        let mut left: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["keep.txt"]);
    }

    #[test]
    fn rerun_overwrites_in_place() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        write_split(&plan(&["a"]), &out, OutputFormat::Csv).unwrap();
        write_split(&plan(&["a"]), &out, OutputFormat::Csv).unwrap();

        let entries: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(std::fs::read_to_string(out.join("a.csv")).unwrap(), "id\na-row\n");
    }
}
