use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;

/// Field names of the quoting portal extract (columns A through AG), in order.
pub const QUOTE_PORTAL_FIELDS: [&str; 33] = [
    "Codigo",
    "Produto",
    "Velocidade",
    "UF - A",
    "Município - A",
    "Endereço - A",
    "CEP - A",
    "Latitude - A",
    "Longitude - A",
    "UF - B",
    "Município - B",
    "Endereço - B",
    "CEP - B",
    "Latitude - B",
    "Longitude - B",
    "Prazo",
    "Unidade de Medida",
    "SLA",
    "Interface",
    "Tipo de Conector",
    "Tipo de Proteção",
    "Prazo de ativação",
    "Mensalidade 12 Meses líquido",
    "Taxa de instalação líquida 12 meses",
    "Mensalidade 24 Meses líquido",
    "Taxa de instalação líquida 24 meses",
    "Mensalidade 36 Meses líquido",
    "Taxa de instalação líquida 36 meses",
    "Mensalidade 48 Meses líquido",
    "Taxa de instalação líquida 48 meses",
    "Mensalidade 60 Meses líquido",
    "Taxa de instalação líquida 60 meses",
    "Observações",
];

/// Column appended to consolidated output naming the source extract of each row.
pub const QUOTE_PORTAL_PROVENANCE: &str = "Cotação";

/// Index of a field within one [`Schema`].
///
/// Only handed out by the schema itself, so a `FieldId` is always in range
/// for records built against that schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The canonical, ordered field set every reconciled table conforms to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Build a schema from field names. Names are trimmed; blanks and
    /// duplicates are rejected.
    pub fn new<I, S>(fields: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<String> = fields
            .into_iter()
            .map(|f| f.as_ref().trim().to_string())
            .collect();

        if fields.is_empty() {
            return Err(CoreError::EmptySchema);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for (position, name) in fields.iter().enumerate() {
            if name.is_empty() {
                return Err(CoreError::BlankField { position });
            }
            if !seen.insert(name.as_str()) {
                return Err(CoreError::DuplicateField(name.clone()));
            }
        }

        Ok(Self { fields })
    }

    /// The 33-column quoting portal layout.
    pub fn quote_portal() -> Self {
        Self {
            fields: QUOTE_PORTAL_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.fields
    }

    pub fn name(&self, id: FieldId) -> &str {
        &self.fields[id.0]
    }

    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> {
        (0..self.fields.len()).map(FieldId)
    }

    /// Exact lookup on the trimmed name.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        let name = name.trim();
        self.fields.iter().position(|f| f == name).map(FieldId)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field_id(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_schema_has_33_unique_fields() {
        let schema = Schema::quote_portal();
        assert_eq!(schema.len(), 33);
        assert!(Schema::new(QUOTE_PORTAL_FIELDS).is_ok());
        assert_eq!(schema.names()[0], "Codigo");
        assert_eq!(schema.names()[32], "Observações");
    }

    #[test]
    fn names_are_trimmed() {
        let schema = Schema::new(["  id ", "name"]).unwrap();
        assert_eq!(schema.names(), &["id".to_string(), "name".to_string()]);
        assert_eq!(schema.field_id(" id").map(FieldId::index), Some(0));
    }

    #[test]
    fn rejects_empty_blank_and_duplicate() {
        assert_eq!(Schema::new(Vec::<String>::new()), Err(CoreError::EmptySchema));
        assert_eq!(
            Schema::new(["a", "  "]),
            Err(CoreError::BlankField { position: 1 })
        );
        assert_eq!(
            Schema::new(["a", "b", " a"]),
            Err(CoreError::DuplicateField("a".into()))
        );
    }

    #[test]
    fn field_lookup_is_case_sensitive() {
        let schema = Schema::new(["Produto"]).unwrap();
        assert!(schema.contains("Produto"));
        assert!(!schema.contains("produto"));
    }
}
