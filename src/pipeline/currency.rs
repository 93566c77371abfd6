//! Fixed-locale currency rendering.
//!
//! The dashboard renders every monetary figure the same way: en-US grouping,
//! `$` symbol, whole units only. Keeping the formatter here (rather than
//! delegating to platform locale data) makes the output reproducible in
//! tests on any machine.

/// Format an amount as whole US dollars: `1234567.89` -> `"$1,234,568"`.
///
/// Rounds half away from zero, like the dashboard's number formatter.
/// Non-finite inputs render as `"$0"`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }

    let negative = amount < 0.0;
    let units = amount.abs().round() as u64;
    let grouped = group_thousands(units);

    if negative && units > 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, b) in bytes.iter().enumerate() {
        let remaining = bytes.len() - i;
        if i > 0 && remaining % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(5.0), "$5");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(250_000.0), "$250,000");
        assert_eq!(format_currency(3_000_000.0), "$3,000,000");
        assert_eq!(format_currency(1_234_567_890.0), "$1,234,567,890");
    }

    #[test]
    fn test_rounds_to_whole_units_half_away_from_zero() {
        assert_eq!(format_currency(1_234_567.89), "$1,234,568");
        assert_eq!(format_currency(0.5), "$1");
        assert_eq!(format_currency(2.4), "$2");
        assert_eq!(format_currency(999.5), "$1,000");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_currency(-1_234.5), "-$1,235");
        assert_eq!(format_currency(-0.2), "$0");
    }

    #[test]
    fn test_non_finite_inputs() {
        assert_eq!(format_currency(f64::NAN), "$0");
        assert_eq!(format_currency(f64::INFINITY), "$0");
        assert_eq!(format_currency(f64::NEG_INFINITY), "$0");
    }
}
