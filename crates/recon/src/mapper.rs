//! Column mapping strategies.
//!
//! A [`ColumnMapper`] decides, for each canonical field, which source column
//! (if any) it is read from. [`MappingPolicy`] picks the mappers to try, in
//! order; the first one that applies wins.

use quotemerge_core::{FieldId, Schema};
use serde::{Deserialize, Serialize};

/// Source column index per canonical field. `None` = null sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    sources: Vec<Option<usize>>,
}

impl ColumnMap {
    pub fn source_of(&self, id: FieldId) -> Option<usize> {
        self.sources[id.index()]
    }

    /// Number of canonical fields backed by a source column.
    pub fn matched(&self) -> usize {
        self.sources.iter().filter(|s| s.is_some()).count()
    }

    /// Canonical fields the source did not provide.
    pub fn missing<'a>(&self, schema: &'a Schema) -> Vec<&'a str> {
        schema
            .field_ids()
            .filter(|id| self.sources[id.index()].is_none())
            .map(|id| schema.name(id))
            .collect()
    }

    /// Source columns no canonical field reads from.
    pub fn unused(&self, source_width: usize) -> Vec<usize> {
        (0..source_width)
            .filter(|col| !self.sources.contains(&Some(*col)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    Positional,
    ByName,
}

impl std::fmt::Display for MappingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positional => write!(f, "positional"),
            Self::ByName => write!(f, "by_name"),
        }
    }
}

pub trait ColumnMapper {
    fn strategy(&self) -> MappingStrategy;

    /// Map trimmed source headers onto `schema`, or `None` if this strategy
    /// does not apply to the table.
    fn map(&self, headers: &[String], schema: &Schema) -> Option<ColumnMap>;
}

/// Trusts column order when the source is exactly as wide as the schema,
/// whatever its header text says.
pub struct PositionalMapper;

impl ColumnMapper for PositionalMapper {
    fn strategy(&self) -> MappingStrategy {
        MappingStrategy::Positional
    }

    fn map(&self, headers: &[String], schema: &Schema) -> Option<ColumnMap> {
        if headers.len() != schema.len() {
            return None;
        }
        Some(ColumnMap {
            sources: (0..schema.len()).map(Some).collect(),
        })
    }
}

/// Matches trimmed header text exactly against canonical names.
/// On duplicate headers the leftmost column wins.
pub struct NameMapper;

impl ColumnMapper for NameMapper {
    fn strategy(&self) -> MappingStrategy {
        MappingStrategy::ByName
    }

    fn map(&self, headers: &[String], schema: &Schema) -> Option<ColumnMap> {
        let sources = schema
            .names()
            .iter()
            .map(|field| headers.iter().position(|h| h.trim() == field))
            .collect();
        Some(ColumnMap { sources })
    }
}

const AUTO_CHAIN: &[&dyn ColumnMapper] = &[&PositionalMapper, &NameMapper];
const BY_NAME_CHAIN: &[&dyn ColumnMapper] = &[&NameMapper];

/// Which mappers reconciliation may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingPolicy {
    /// Positional when the width matches the schema exactly, otherwise by name.
    #[default]
    Auto,
    /// Name matching only; relabeled headers become nulls.
    ByName,
}

impl MappingPolicy {
    pub fn mappers(&self) -> &'static [&'static dyn ColumnMapper] {
        match self {
            Self::Auto => AUTO_CHAIN,
            Self::ByName => BY_NAME_CHAIN,
        }
    }

    /// Run the mapper chain. The chain always ends in [`NameMapper`], which
    /// applies to every table.
    pub fn resolve(&self, headers: &[String], schema: &Schema) -> (ColumnMap, MappingStrategy) {
        for mapper in self.mappers() {
            if let Some(map) = mapper.map(headers, schema) {
                return (map, mapper.strategy());
            }
        }
        let map = NameMapper.map(headers, schema).unwrap_or(ColumnMap {
            sources: vec![None; schema.len()],
        });
        (map, MappingStrategy::ByName)
    }
}
