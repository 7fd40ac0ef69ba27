/// Display formatting for stat values.
///
/// Every formatter renders a missing value as `PLACEHOLDER` rather than `0`
/// or `NaN`.
use crate::column::{CellFormat, CellValue};

/// Text shown for missing values.
pub const PLACEHOLDER: &str = "-";

/// Seconds as `M:SS`; minutes are unbounded.
///
/// Fractional seconds are rounded to the nearest whole second first.
///
/// ```
/// use stattable::format::format_time_value;
///
/// assert_eq!(format_time_value(Some(1264.2)), "21:04");
/// assert_eq!(format_time_value(Some(59.0)), "0:59");
/// assert_eq!(format_time_value(None), "-");
/// ```
pub fn format_time_value(seconds: Option<f64>) -> String {
    match seconds.filter(|s| s.is_finite()) {
        Some(s) => {
            let total = s.round() as i64;
            format!("{}:{:02}", total.div_euclid(60), total.rem_euclid(60))
        }
        None => PLACEHOLDER.to_string(),
    }
}

/// One decimal, e.g. `52.3`.
pub fn format_percent(value: Option<f64>) -> String {
    format_decimal(value, 1)
}

/// Three decimals with the leading zero stripped, e.g. `.921`.
pub fn format_save_percentage(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let text = format!("{:.3}", v);
            match text.strip_prefix('0') {
                Some(rest) => rest.to_string(),
                None => text,
            }
        }
        None => PLACEHOLDER.to_string(),
    }
}

/// Explicit `+` for positive values; zero and negatives render as-is.
pub fn format_signed(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) if v > 0.0 => format!("+{}", v),
        Some(v) => format!("{}", v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Fixed number of decimals.
pub fn format_decimal(value: Option<f64>, decimals: u8) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.*}", usize::from(decimals), v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Number as-is: whole numbers without a decimal point.
pub fn format_number(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}", v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Render a cell according to its column's format.
pub fn format_cell(value: CellValue<'_>, format: CellFormat) -> String {
    if let CellValue::Text(s) = value {
        return s.to_string();
    }
    let number = value.as_f64();
    match format {
        CellFormat::Text | CellFormat::Integer => format_number(number),
        CellFormat::Signed => format_signed(number),
        CellFormat::Percent => format_percent(number),
        CellFormat::SavePercentage => format_save_percentage(number),
        CellFormat::Time => format_time_value(number),
        CellFormat::Decimal(n) => format_decimal(number, n),
    }
}
