//! Cell styling types
//!
//! Only number formats are modelled: a [`Style`] wraps a [`NumberFormat`].

mod number_format;

pub use number_format::NumberFormat;

/// Cell style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Number format
    pub number_format: NumberFormat,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number format
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    /// Set a custom number format string
    pub fn number_format<S: Into<String>>(self, format: S) -> Self {
        self.with_number_format(NumberFormat::Custom(format.into()))
    }

    /// Check if this is the default style
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
