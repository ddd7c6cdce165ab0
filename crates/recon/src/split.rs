use std::collections::BTreeMap;

use quotemerge_core::{CellValue, Table};
use tracing::info;

use crate::error::ReconError;
use crate::key_filter::KeyFilter;
use crate::model::{Group, SplitPlan};

/// Partition `table` by `key_field` into groups with the key column removed.
///
/// Groups come out in ascending key order; rows keep their relative order.
/// Fails before producing anything when the key column is missing or the
/// table has no data rows.
pub fn split(table: &Table, key_field: &str, filter: &KeyFilter) -> Result<SplitPlan, ReconError> {
    let key_col = table
        .column_index(key_field)
        .ok_or_else(|| ReconError::MissingKeyColumn(key_field.trim().to_string()))?;

    if table.rows.is_empty() {
        return Err(ReconError::EmptyDataset);
    }

    let headers: Vec<String> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(col, _)| *col != key_col)
        .map(|(_, h)| h.trim().to_string())
        .collect();

    let (kept, stats) = filter.partition(&table.rows, key_col);

    let mut grouped: BTreeMap<String, Vec<Vec<CellValue>>> = BTreeMap::new();
    for (key, idx) in kept {
        let row = &table.rows[idx];
        let stripped = row
            .iter()
            .enumerate()
            .filter(|(col, _)| *col != key_col)
            .map(|(_, cell)| cell.clone())
            .collect();
        grouped.entry(key).or_default().push(stripped);
    }

    if stats.dropped > 0 {
        info!(dropped = stats.dropped, "rows without a group key excluded");
    }

    Ok(SplitPlan {
        headers,
        groups: grouped
            .into_iter()
            .map(|(key, rows)| Group { key, rows })
            .collect(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from_text(s)
    }

    fn dataset() -> Table {
        Table::new(
            vec!["id".into(), "Cotação".into(), "name".into()],
            vec![
                vec![text("1"), text("b.xlsx"), text("x")],
                vec![text("2"), text("a.xlsx"), text("y")],
                vec![text("3"), text(""), text("z")],
                vec![text("4"), text(" b.xlsx "), text("w")],
            ],
        )
    }

    #[test]
    fn groups_sorted_and_key_removed() {
        let plan = split(&dataset(), "Cotação", &KeyFilter).unwrap();

        assert_eq!(plan.headers, vec!["id", "name"]);
        let keys: Vec<&str> = plan.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["a.xlsx", "b.xlsx"]);

        let b = &plan.groups[1];
        assert_eq!(b.rows, vec![vec![text("1"), text("x")], vec![text("4"), text("w")]]);
        assert_eq!(plan.stats.dropped, 1);
    }

    #[test]
    fn key_lookup_ignores_case() {
        let plan = split(&dataset(), "COTAÇÃO", &KeyFilter).unwrap();
        assert_eq!(plan.groups.len(), 2);
    }

    #[test]
    fn missing_key_column_is_fatal() {
        let err = split(&dataset(), "Grupo", &KeyFilter).unwrap_err();
        assert!(matches!(err, ReconError::MissingKeyColumn(ref c) if c == "Grupo"));
        assert_eq!(err.to_string(), "column 'Grupo' not found");
    }

    #[test]
    fn header_only_table_is_fatal() {
        let table = Table::new(vec!["Cotação".into()], vec![]);
        let err = split(&table, "Cotação", &KeyFilter).unwrap_err();
        assert!(matches!(err, ReconError::EmptyDataset));
    }

    #[test]
    fn all_keys_blank_yields_no_groups() {
        let table = Table::new(
            vec!["k".into(), "v".into()],
            vec![vec![CellValue::Empty, text("1")]],
        );
        let plan = split(&table, "k", &KeyFilter).unwrap();
        assert!(plan.groups.is_empty());
        assert_eq!(plan.stats.dropped, 1);
    }
}
