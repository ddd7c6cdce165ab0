use serde::{Deserialize, Serialize};

/// One untyped cell as read from a source extract.
///
/// `Empty` doubles as the null sentinel for canonical fields a source did not
/// provide.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Text cell, or `Empty` when the input has no characters at all.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// Null for emptiness checks: no value, or text that is blank after trimming.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Bool(_) => false,
        }
    }

    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                // Integers print without decimals
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from_text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_null() {
        assert!(CellValue::Empty.is_null());
        assert!(CellValue::Text("   ".into()).is_null());
        assert!(!CellValue::Text(" x ".into()).is_null());
        assert!(!CellValue::Number(0.0).is_null());
        assert!(!CellValue::Bool(false).is_null());
    }

    #[test]
    fn whole_numbers_display_without_decimals() {
        assert_eq!(CellValue::Number(12.0).display(), "12");
        assert_eq!(CellValue::Number(-3.0).display(), "-3");
        assert_eq!(CellValue::Number(1.25).display(), "1.25");
        assert_eq!(CellValue::Bool(true).display(), "TRUE");
    }

    #[test]
    fn from_text_keeps_whitespace() {
        assert_eq!(CellValue::from_text(""), CellValue::Empty);
        assert_eq!(CellValue::from_text(" a "), CellValue::Text(" a ".into()));
    }
}
