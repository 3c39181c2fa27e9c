//! Display formatting for whole-unit amounts.

const HUNDRED_MILLION: u64 = 100_000_000;

/// Formats an amount for summaries.
///
/// Amounts of one hundred million or more are shown in units of 億 with two
/// decimals; anything smaller is a grouped whole number.
pub fn format_amount(amount: u64, symbol: &str) -> String {
    if amount >= HUNDRED_MILLION {
        return format!("{}{:.2}億", symbol, amount as f64 / HUNDRED_MILLION as f64);
    }
    format!("{}{}", symbol, group_digits(&amount.to_string(), ','))
}

pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(0, "$"), "$0");
        assert_eq!(format_amount(999, "$"), "$999");
        assert_eq!(format_amount(1_234_567, "$"), "$1,234,567");
        assert_eq!(format_amount(99_999_999, "NT$"), "NT$99,999,999");
    }

    #[test]
    fn large_amounts_use_hundred_million_unit() {
        assert_eq!(format_amount(100_000_000, "$"), "$1.00億");
        assert_eq!(format_amount(256_000_000, "$"), "$2.56億");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(12.345), "12.3%");
        assert_eq!(format_percent(-4.0), "-4.0%");
    }
}
