use quotemerge_core::schema::QUOTE_PORTAL_PROVENANCE;
use quotemerge_core::Schema;
use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::mapper::MappingPolicy;

// ---------------------------------------------------------------------------
// Resolved config
// ---------------------------------------------------------------------------

/// Settings shared by both pipeline stages.
///
/// The canonical schema travels inside the config so that tests (and
/// operators) can run either stage against an alternate layout.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub schema: Schema,
    /// Column appended to consolidated output naming each row's source.
    pub provenance_field: String,
    pub mapping: MappingPolicy,
    /// Column the splitter groups by. Defaults to the provenance field.
    pub key_field: String,
    pub output: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema: Schema::quote_portal(),
            provenance_field: QUOTE_PORTAL_PROVENANCE.to_string(),
            mapping: MappingPolicy::default(),
            key_field: QUOTE_PORTAL_PROVENANCE.to_string(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Alternate fills per source block on consolidated xlsx output.
    #[serde(default = "default_banding")]
    pub banding: bool,
}

fn default_banding() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Xlsx,
            banding: true,
        }
    }
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    schema: Option<Vec<String>>,
    #[serde(default)]
    provenance_field: Option<String>,
    #[serde(default)]
    mapping: MappingPolicy,
    #[serde(default)]
    key_field: Option<String>,
    #[serde(default)]
    output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl PipelineConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let file: ConfigFile =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;

        let schema = match file.schema {
            Some(fields) => Schema::new(fields)?,
            None => Schema::quote_portal(),
        };
        let provenance_field = file
            .provenance_field
            .map(|f| f.trim().to_string())
            .unwrap_or_else(|| QUOTE_PORTAL_PROVENANCE.to_string());
        let key_field = file
            .key_field
            .map(|f| f.trim().to_string())
            .unwrap_or_else(|| provenance_field.clone());

        let config = Self {
            schema,
            provenance_field,
            mapping: file.mapping,
            key_field,
            output: file.output,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.provenance_field.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "provenance_field must not be blank".into(),
            ));
        }

        // Provenance is appended after the canonical fields; a clash would
        // produce two columns with one name.
        if self.schema.contains(&self.provenance_field) {
            return Err(ReconError::ConfigValidation(format!(
                "provenance_field '{}' is also a schema field",
                self.provenance_field
            )));
        }

        if self.key_field.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "key_field must not be blank".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_portal_defaults() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config.schema.len(), 33);
        assert_eq!(config.provenance_field, "Cotação");
        assert_eq!(config.key_field, "Cotação");
        assert_eq!(config.mapping, MappingPolicy::Auto);
        assert_eq!(config.output.format, OutputFormat::Xlsx);
        assert!(config.output.banding);
    }

    #[test]
    fn parse_custom_schema() {
        let input = r#"
schema = ["id", "name", "price"]
provenance_field = "source"
mapping = "by_name"

[output]
format = "csv"
banding = false
"#;
        let config = PipelineConfig::from_toml(input).unwrap();
        assert_eq!(config.schema.names(), &["id", "name", "price"]);
        assert_eq!(config.provenance_field, "source");
        assert_eq!(config.key_field, "source", "key defaults to provenance");
        assert_eq!(config.mapping, MappingPolicy::ByName);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(!config.output.banding);
    }

    #[test]
    fn explicit_key_field() {
        let config = PipelineConfig::from_toml(r#"key_field = " Produto ""#).unwrap();
        assert_eq!(config.key_field, "Produto");
    }

    #[test]
    fn reject_provenance_clash() {
        let input = r#"
schema = ["id", "source"]
provenance_field = "source"
"#;
        let err = PipelineConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("also a schema field"));
    }

    #[test]
    fn reject_duplicate_schema_field() {
        let err = PipelineConfig::from_toml(r#"schema = ["a", "a "]"#).unwrap_err();
        assert!(matches!(err, ReconError::Schema(_)));
    }

    #[test]
    fn reject_unknown_mapping() {
        let err = PipelineConfig::from_toml(r#"mapping = "fuzzy""#).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_unknown_key() {
        let err = PipelineConfig::from_toml(r#"schemas = ["a"]"#).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_blank_key_field() {
        let err = PipelineConfig::from_toml(r#"key_field = "  ""#).unwrap_err();
        assert!(err.to_string().contains("key_field"));
    }
}
