//! Value formatting for text regions

use inkdash_types::{FieldValue, PLACEHOLDER};

/// Substitute `value` for the first `{}` in `template`, or append it when the
/// template has no slot
pub fn apply_template(template: &str, value: &str) -> String {
    if template.is_empty() {
        return value.to_string();
    }
    match template.find("{}") {
        Some(pos) => format!("{}{}{}", &template[..pos], value, &template[pos + 2..]),
        None => format!("{}{}", template, value),
    }
}

/// Format a number with fixed decimals, optional `,` thousands grouping and
/// optional explicit `+` sign
pub fn format_number(value: f64, decimals: u8, grouping: bool, signed: bool) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let formatted = format!("{:.*}", decimals as usize, value.abs());
    // Rounding can turn a tiny negative into zero; keep the sign off then
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let negative = value.is_sign_negative() && !is_zero;

    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    } else if signed {
        out.push('+');
    }
    if grouping {
        out.push_str(&group_thousands(int_part));
    } else {
        out.push_str(int_part);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Plain text rendering of any value; unavailable values become the placeholder
pub fn value_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(n) => {
            if n.fract() == 0.0 {
                format_number(*n, 0, false, false)
            } else {
                format_number(*n, 1, false, false)
            }
        }
        FieldValue::Text(s) | FieldValue::Icon(s) => s.clone(),
        FieldValue::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        FieldValue::List(items) => items.join(", "),
        FieldValue::Unavailable => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_template() {
        assert_eq!(apply_template("{}°C", "21.5"), "21.5°C");
        assert_eq!(apply_template("BTC ({}%)", "+1.2"), "BTC (+1.2%)");
        assert_eq!(apply_template("", "x"), "x");
        assert_eq!(apply_template("Temp ", "x"), "Temp x");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(21.46, 1, false, false), "21.5");
        assert_eq!(format_number(67432.0, 0, true, false), "67,432");
        assert_eq!(format_number(1234567.891, 2, true, false), "1,234,567.89");
        assert_eq!(format_number(999.0, 0, true, false), "999");
        assert_eq!(format_number(-1234.0, 0, true, false), "-1,234");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_number(1.26, 1, false, true), "+1.3");
        assert_eq!(format_number(-0.8, 1, false, true), "-0.8");
        assert_eq!(format_number(0.0, 1, false, true), "+0.0");
        assert_eq!(format_number(-0.01, 1, false, true), "+0.0");
    }

    #[test]
    fn test_non_finite_is_placeholder() {
        assert_eq!(format_number(f64::NAN, 1, false, false), "--");
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&FieldValue::Number(12.0)), "12");
        assert_eq!(value_text(&FieldValue::Text("Sunny".into())), "Sunny");
        assert_eq!(
            value_text(&FieldValue::List(vec!["a".into(), "b".into()])),
            "a, b"
        );
        assert_eq!(value_text(&FieldValue::Unavailable), "--");
    }
}
