use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Schema has no fields.
    EmptySchema,
    /// A schema field name is blank after trimming.
    BlankField { position: usize },
    /// Two schema fields trim to the same name.
    DuplicateField(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySchema => write!(f, "schema must contain at least one field"),
            Self::BlankField { position } => {
                write!(f, "schema field #{} has a blank name", position + 1)
            }
            Self::DuplicateField(name) => write!(f, "schema field '{name}' appears more than once"),
        }
    }
}

impl std::error::Error for CoreError {}
