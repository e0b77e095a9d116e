//! Cell value types

use std::fmt;

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// String value
    String(String),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value as plain text.
    ///
    /// Numbers use the shortest representation that round-trips, so `1000.0`
    /// renders as `1000` and `0.1` as `0.1`.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rendering() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::Number(1000.0).to_text(), "1000");
        assert_eq!(CellValue::Number(1234.56).to_text(), "1234.56");
        assert_eq!(CellValue::Number(-0.5).to_text(), "-0.5");
        assert_eq!(CellValue::Boolean(true).to_text(), "TRUE");
        assert_eq!(CellValue::string("Acme").to_text(), "Acme");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CellValue::from(42i64), CellValue::Number(42.0));
        assert_eq!(CellValue::from("x").as_string(), Some("x"));
        assert_eq!(CellValue::from(false).as_bool(), Some(false));
        assert_eq!(CellValue::from(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::from("2.5").as_number(), None);
    }
}
