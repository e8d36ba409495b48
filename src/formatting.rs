use serde::Serialize;

/// Display rule for a numeric standings/results column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellFormat {
    /// `+3`, `0`, `-2`
    SignedInt,
    /// `+1.2`, `0.0`, `-0.4`
    SignedOneDecimal,
    OneDecimal,
    /// Value already scaled to percent: `54.3%`
    Percent,
}

impl CellFormat {
    pub fn apply(self, value: f64) -> String {
        match self {
            CellFormat::SignedInt => plus_int(value),
            CellFormat::SignedOneDecimal => plus_one_decimal(value),
            CellFormat::OneDecimal => format!("{value:.1}"),
            CellFormat::Percent => format!("{value:.1}%"),
        }
    }

    /// Formats a raw cell; text that is not a number is returned untouched.
    pub fn apply_raw(self, raw: &str) -> String {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => self.apply(value),
            _ => raw.to_string(),
        }
    }
}

pub fn plus_int(value: f64) -> String {
    let v = value.trunc() as i64;
    if v > 0 { format!("+{v}") } else { format!("{v}") }
}

pub fn plus_one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid "-0.0" for values that round to zero from below.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded > 0.0 {
        format!("+{rounded:.1}")
    } else {
        format!("{rounded:.1}")
    }
}
