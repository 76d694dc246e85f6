// 💱 Currency Parsing - BRL formatted strings to numbers
// Catalog values look like "R$ 1.234,56"; output is plain "1234.56"

use serde::{Deserialize, Serialize};

/// Currency prefix used by the catalog
pub const CURRENCY_PREFIX: &str = "R$";

// ============================================================================
// PARSE MODE
// ============================================================================

/// How strictly a catalog value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Strip one "R$ " and swap one decimal comma. Thousands separators mis-parse.
    Legacy,

    /// Accepts thousands separators, optional whitespace after the prefix
    #[default]
    Lenient,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Legacy => "legacy",
            ParseMode::Lenient => "lenient",
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a currency-formatted catalog value
///
/// Returns `None` for empty, non-numeric, non-finite or negative input.
/// The caller decides what a missing price means (the engine zeroes it).
///
/// # Examples:
/// ```
/// use parts_pricing::currency::{parse_currency, ParseMode};
///
/// assert_eq!(parse_currency("R$ 12,50", ParseMode::Lenient), Some(12.5));
/// assert_eq!(parse_currency("R$ 1.234,56", ParseMode::Lenient), Some(1234.56));
/// assert_eq!(parse_currency("R$ 1.250", ParseMode::Lenient), Some(1250.0));
/// assert_eq!(parse_currency("R$ 1.234,56", ParseMode::Legacy), None);
/// ```
pub fn parse_currency(raw: &str, mode: ParseMode) -> Option<f64> {
    let normalized = match mode {
        ParseMode::Legacy => normalize_legacy(raw),
        ParseMode::Lenient => normalize_lenient(raw)?,
    };

    if normalized.is_empty() {
        return None;
    }

    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    Some(value)
}

fn normalize_legacy(raw: &str) -> String {
    raw.replacen("R$ ", "", 1).replacen(',', ".", 1)
}

fn normalize_lenient(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix(CURRENCY_PREFIX)
        .map(str::trim_start)
        .unwrap_or(trimmed);

    if body.is_empty() {
        return None;
    }

    // Only digits and separators survive; anything else is not a price
    if !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    if body.matches(',').count() > 1 {
        return None;
    }

    if body.contains(',') {
        // "1.234,56": dots group thousands, comma is the decimal point
        return Some(body.replace('.', "").replace(',', "."));
    }

    // No comma: a dot can only be a thousands separator ("1.250", "1.234.567")
    let mut groups = body.split('.');
    let lead = groups.next().unwrap_or_default();
    if !lead.is_empty() && lead.len() <= 3 && groups.clone().all(|g| g.len() == 3) {
        return Some(body.replace('.', ""));
    }

    if body.contains('.') {
        return None;
    }

    Some(body.to_string())
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Round to cents, half away from zero
pub fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format a money value with exactly two digits and no grouping
pub fn format_money(value: f64) -> String {
    format!("{:.2}", round_cents(value))
}

/// Same as `format_money` with the display prefix, e.g. "R$ 202.50"
pub fn format_display(value: f64) -> String {
    format!("{} {}", CURRENCY_PREFIX, format_money(value))
}

/// serde helper: serialize an f64 as a two-digit money string
pub fn serialize_money<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_money(*value))
}

/// serde helper for optional money fields
pub fn serialize_optional_money<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(v) => serializer.serialize_str(&format_money(*v)),
        None => serializer.serialize_none(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_simple_values() {
        assert_eq!(parse_currency("R$ 100,00", ParseMode::Lenient), Some(100.0));
        assert_eq!(parse_currency("R$100,5", ParseMode::Lenient), Some(100.5));
        assert_eq!(parse_currency("  R$   7,25 ", ParseMode::Lenient), Some(7.25));
        assert_eq!(parse_currency("42", ParseMode::Lenient), Some(42.0));
    }

    #[test]
    fn test_lenient_dots_without_comma_are_grouping() {
        assert_eq!(parse_currency("R$ 1.250", ParseMode::Lenient), Some(1250.0));
        assert_eq!(parse_currency("R$ 1.234.567", ParseMode::Lenient), Some(1234567.0));
        assert_eq!(parse_currency("R$ 250.000", ParseMode::Lenient), Some(250000.0));
    }

    #[test]
    fn test_lenient_rejects_ambiguous_dots() {
        assert_eq!(parse_currency("42.10", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ 1.25", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ 1234.567", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ .250", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ 1..250", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ 1.250.", ParseMode::Lenient), None);
    }

    #[test]
    fn test_lenient_thousands_separator() {
        assert_eq!(parse_currency("R$ 1.234,56", ParseMode::Lenient), Some(1234.56));
        assert_eq!(parse_currency("R$ 12.345.678,00", ParseMode::Lenient), Some(12345678.0));
    }

    #[test]
    fn test_lenient_rejects_garbage() {
        assert_eq!(parse_currency("", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ ", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ abc", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ 12,3,4", ParseMode::Lenient), None);
        assert_eq!(parse_currency("R$ -5,00", ParseMode::Lenient), None);
        assert_eq!(parse_currency("US$ 5,00", ParseMode::Lenient), None);
    }

    #[test]
    fn test_legacy_matches_narrow_behavior() {
        assert_eq!(parse_currency("R$ 100,00", ParseMode::Legacy), Some(100.0));
        assert_eq!(parse_currency("R$ 0,99", ParseMode::Legacy), Some(0.99));
        // "1.234.56" is not a number: the known thousands-separator limitation
        assert_eq!(parse_currency("R$ 1.234,56", ParseMode::Legacy), None);
        assert_eq!(parse_currency("", ParseMode::Legacy), None);
        assert_eq!(parse_currency("inf", ParseMode::Legacy), None);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(202.5), "202.50");
        assert_eq!(format_money(2.675_000_1), "2.68");
        assert_eq!(format_money(-0.001), "0.00");
        assert_eq!(format_money(1234567.891), "1234567.89");
        assert_eq!(format_display(250.0), "R$ 250.00");
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(-0.125), -0.13);
        assert_eq!(round_cents(67.5), 67.5);
    }

    #[test]
    fn test_parse_mode_serde() {
        let mode: ParseMode = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(mode, ParseMode::Legacy);
        assert_eq!(ParseMode::default().as_str(), "lenient");
    }
}
