use quotemerge_core::{CellValue, Record, Schema, Table};

use crate::mapper::{MappingPolicy, MappingStrategy};

/// A source table mapped onto the canonical schema.
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Same count and order as the source rows; nothing is filtered here.
    pub records: Vec<Record>,
    pub strategy: MappingStrategy,
    /// Canonical fields filled with the null sentinel.
    pub missing_fields: Vec<String>,
    /// Source headers that were dropped.
    pub dropped_columns: Vec<String>,
}

/// Map `table` onto `schema`. Output always has exactly the canonical
/// fields, in canonical order, one record per input row.
pub fn reconcile(table: &Table, schema: &Schema, policy: MappingPolicy) -> Reconciled {
    let headers: Vec<String> = table.headers.iter().map(|h| h.trim().to_string()).collect();
    let (map, strategy) = policy.resolve(&headers, schema);

    let records = table
        .rows
        .iter()
        .map(|row| {
            Record::from_fn(schema, |id| match map.source_of(id) {
                Some(col) => row.get(col).cloned().unwrap_or(CellValue::Empty),
                None => CellValue::Empty,
            })
        })
        .collect();

    Reconciled {
        records,
        strategy,
        missing_fields: map.missing(schema).into_iter().map(str::to_string).collect(),
        dropped_columns: map
            .unused(headers.len())
            .into_iter()
            .map(|col| headers[col].clone())
            .collect(),
    }
}
