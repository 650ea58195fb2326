use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DisplayConfig;

fn round_half_away(value: f64, dp: u32) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn group_int_digits(int_part: &str, separator: char) -> String {
    // Insert a separator every 3 digits, preserving any leading zeros.
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(separator);
        }
    }
    out
}

/// Render `|value|` with exactly `dp` decimals using Brazilian separators
/// (`.` thousands, `,` decimals).
fn render_abs(value: Decimal, dp: u32, grouping: bool) -> String {
    let fixed = format!("{:.*}", dp as usize, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let int_part = if grouping {
        group_int_digits(int_part, '.')
    } else {
        int_part.to_string()
    };
    match frac_part {
        Some(f) if !f.is_empty() => format!("{int_part},{f}"),
        _ => int_part,
    }
}

/// Format a currency value for display using the configured symbol,
/// precision and grouping. Missing and non-finite values render as zero.
pub fn format_currency_display(value: Option<f64>, display: &DisplayConfig) -> String {
    let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    let rounded = round_half_away(value, display.currency_decimals);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if let Some(sym) = display.currency_symbol.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(sym);
        out.push(' ');
    }
    out.push_str(&render_abs(
        rounded,
        display.currency_decimals,
        display.currency_grouping,
    ));
    out
}

/// `"R$ 1.234,56"`; `None` renders as `"R$ 0,00"`.
pub fn format_brl(value: Option<f64>) -> String {
    format_currency_display(value, &DisplayConfig::default())
}

/// `"12,5%"` with `decimals` places; `None` renders as zero.
pub fn format_percent(value: Option<f64>, decimals: u32) -> String {
    let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    let rounded = round_half_away(value, decimals);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}%", render_abs(rounded, decimals, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_brl_groups_and_uses_comma_decimals() {
        assert_eq!(format_brl(Some(1234.56)), "R$ 1.234,56");
        assert_eq!(format_brl(Some(1_234_567.5)), "R$ 1.234.567,50");
        assert_eq!(format_brl(Some(0.5)), "R$ 0,50");
    }

    #[test]
    fn format_brl_missing_is_zero() {
        assert_eq!(format_brl(None), "R$ 0,00");
        assert_eq!(format_brl(Some(f64::NAN)), "R$ 0,00");
    }

    #[test]
    fn format_brl_negative_sign_precedes_symbol() {
        assert_eq!(format_brl(Some(-1234.5)), "-R$ 1.234,50");
    }

    #[test]
    fn format_brl_rounds_half_away_from_zero() {
        assert_eq!(format_brl(Some(2.125)), "R$ 2,13");
        assert_eq!(format_brl(Some(-0.001)), "R$ 0,00");
    }

    #[test]
    fn format_currency_display_respects_config() {
        let display = DisplayConfig {
            currency_symbol: None,
            currency_decimals: 0,
            currency_grouping: false,
        };
        assert_eq!(format_currency_display(Some(98765.4), &display), "98765");
    }

    #[test]
    fn format_percent_uses_comma() {
        assert_eq!(format_percent(Some(12.345), 1), "12,3%");
        assert_eq!(format_percent(Some(-3.0), 2), "-3,00%");
        assert_eq!(format_percent(None, 1), "0,0%");
    }
}
