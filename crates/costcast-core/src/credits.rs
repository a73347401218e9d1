//! Dollar → credit conversion and display strings.

/// Credits for a dollar amount at `conversion_rate` credits per dollar.
pub fn to_credits(dollars: f64, conversion_rate: f64) -> f64 {
    dollars * conversion_rate
}

/// `$1.234`: three decimals, matching the calculator's cost cells.
pub fn format_usd(dollars: f64) -> String {
    format!("${dollars:.3}")
}

/// `12,345.68 credits`.
pub fn format_credits(dollars: f64, conversion_rate: f64) -> String {
    format!("{} credits", group_thousands(to_credits(dollars, conversion_rate), 2))
}

/// Whole number with thousands separators, for user and action counts.
pub fn format_count(value: f64) -> String {
    group_thousands(value, 0)
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_scale_by_rate() {
        assert_eq!(to_credits(1.5, 200.0), 300.0);
        assert_eq!(to_credits(0.0, 200.0), 0.0);
    }

    #[test]
    fn formats_match_report_style() {
        assert_eq!(format_usd(0.077), "$0.077");
        assert_eq!(format_usd(1234.5), "$1234.500");
        assert_eq!(format_credits(61.728, 200.0), "12,345.60 credits");
        assert_eq!(format_count(1_234_567.4), "1,234,567");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(-1000.0), "-1,000");
    }
}
