//! Minor-unit currency formatting.

/// Format an amount in cents as dollars, e.g. `150` -> `"$1.50"`.
///
/// ```rust
/// assert_eq!(vendsim::money::format_cents(20), "$0.20");
/// assert_eq!(vendsim::money::format_cents(1005), "$10.05");
/// ```
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_cents(0), "$0.00");
    }

    #[test]
    fn pads_single_digit_cents() {
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(110), "$1.10");
    }

    #[test]
    fn formats_whole_dollars() {
        assert_eq!(format_cents(300), "$3.00");
    }
}
