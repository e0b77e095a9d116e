//! Reader and writer options

/// Options for reading typed values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Thousands separator removed before decimal parsing (default: comma)
    pub thousands_separator: char,
    /// `chrono` formats tried in order when parsing dates
    pub date_formats: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            thousands_separator: ',',
            date_formats: vec!["%Y-%m-%d".to_string(), "%m/%d/%Y".to_string()],
        }
    }
}

/// Options for writing typed values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// `chrono` format of the date text stored in date cells
    pub date_format: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}
