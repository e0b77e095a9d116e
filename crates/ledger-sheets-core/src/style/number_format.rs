//! Number format types

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::cell::CellValue;

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

impl NumberFormat {
    /// Highest built-in format ID
    pub const MAX_BUILTIN_ID: u32 = 49;

    /// 1 - 0
    pub const ID_NUMBER_INT: u32 = 1;
    /// 2 - 0.00
    pub const ID_NUMBER_DEC2: u32 = 2;
    /// 9 - 0%
    pub const ID_PERCENT_INT: u32 = 9;
    /// 15 - d-mmm-yy
    pub const ID_DATE_MEDIUM: u32 = 15;

    /// Create a built-in format by ID
    pub fn from_id(id: u32) -> Self {
        if id == 0 {
            NumberFormat::General
        } else {
            NumberFormat::BuiltIn(id)
        }
    }

    /// Numeric ID used in the styles part, if this is not a custom format
    pub fn builtin_id(&self) -> Option<u32> {
        match self {
            NumberFormat::General => Some(0),
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(_) => None,
        }
    }

    /// Get the format string
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => Self::builtin_format_string(*id),
            NumberFormat::Custom(s) => s,
        }
    }

    fn builtin_format_string(id: u32) -> &'static str {
        match id {
            1 => "0",
            2 => "0.00",
            3 => "#,##0",
            4 => "#,##0.00",
            5 => "$#,##0_);($#,##0)",
            6 => "$#,##0_);[Red]($#,##0)",
            7 => "$#,##0.00_);($#,##0.00)",
            8 => "$#,##0.00_);[Red]($#,##0.00)",
            9 => "0%",
            10 => "0.00%",
            11 => "0.00E+00",
            12 => "# ?/?",
            13 => "# ??/??",
            14 => "mm-dd-yy",
            15 => "d-mmm-yy",
            16 => "d-mmm",
            17 => "mmm-yy",
            18 => "h:mm AM/PM",
            19 => "h:mm:ss AM/PM",
            20 => "h:mm",
            21 => "h:mm:ss",
            22 => "m/d/yy h:mm",
            37 => "#,##0 ;(#,##0)",
            38 => "#,##0 ;[Red](#,##0)",
            39 => "#,##0.00;(#,##0.00)",
            40 => "#,##0.00;[Red](#,##0.00)",
            45 => "mm:ss",
            46 => "[h]:mm:ss",
            47 => "mmss.0",
            48 => "##0.0E+0",
            49 => "@",
            _ => "General",
        }
    }

    /// Check if this is a date/time format
    pub fn is_date_format(&self) -> bool {
        let parts = date_parts(self.format_string());
        parts.date || parts.time
    }

    /// Text shown for `value` under this format.
    ///
    /// Numbers under a date or time format are serial day numbers and render
    /// as ISO dates (`2024-01-05`), times (`13:30:00`) or both, depending on
    /// the parts the format shows. Everything else renders as
    /// [`CellValue::to_text`].
    pub fn render(&self, value: &CellValue) -> String {
        if let CellValue::Number(serial) = value {
            let parts = date_parts(self.format_string());
            if parts.date || parts.time {
                if let Some(datetime) = serial_to_datetime(*serial) {
                    let pattern = match (parts.date, parts.time) {
                        (true, true) => "%Y-%m-%d %H:%M:%S",
                        (false, true) => "%H:%M:%S",
                        _ => "%Y-%m-%d",
                    };
                    return datetime.format(pattern).to_string();
                }
            }
        }
        value.to_text()
    }
}

/// Date and time components shown by a format code
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DateParts {
    date: bool,
    time: bool,
}

// Quoted literals, bracketed sections and escaped characters are skipped.
// `m` is a month unless hours or seconds appear in the same code.
fn date_parts(code: &str) -> DateParts {
    let mut parts = DateParts::default();
    let mut month_or_minute = false;
    let mut chars = code.chars();

    while let Some(c) = chars.next() {
        match c.to_ascii_lowercase() {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '[' => {
                for b in chars.by_ref() {
                    if b == ']' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            'y' | 'd' => parts.date = true,
            'h' | 's' => parts.time = true,
            'm' => month_or_minute = true,
            _ => {}
        }
    }

    if month_or_minute && !parts.time {
        parts.date = true;
    }
    parts
}

/// First serial past 9999-12-31
const SERIAL_LIMIT: f64 = 2_958_466.0;

/// Convert a serial day number of the 1900 date system.
///
/// Serials from 61 on count from 1899-12-30; smaller ones count from
/// 1899-12-31 because the 1900 system includes a nonexistent 1900-02-29.
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..SERIAL_LIMIT).contains(&serial) {
        return None;
    }

    let epoch = if serial < 61.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let days = serial.trunc() as i64;
    let millis = (serial.fract() * 86_400_000.0).round() as i64;

    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::milliseconds(millis))
}
