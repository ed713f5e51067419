//! Small pure helpers shared across the crate.

/// Splits `0..total` into half-open `(start, end)` ranges of at most
/// `batch_size` items, for paginated factory enumeration. A zero batch size
/// is treated as one.
pub fn batch_ranges(total: u64, batch_size: u64) -> Vec<(u64, u64)> {
    let batch_size = batch_size.max(1);
    let mut ranges = Vec::new();
    let mut start = 0u64;
    while start < total {
        let end = (start + batch_size).min(total);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Formats a raw integer token amount into a human-readable decimal string
/// with the given display precision. The input is the amount in base units
/// as a decimal string; a non-numeric input renders as `"0"`.
///
/// `format_token_amount("1500000", 6, 2)` is `"1.50"`.
pub fn format_token_amount(raw: &str, decimals: u8, display_decimals: usize) -> String {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return "0".to_string();
    }
    let stripped = raw.trim_start_matches('0');
    let raw = if stripped.is_empty() { "0" } else { stripped };

    let decimals = decimals as usize;
    let padded = if raw.len() <= decimals {
        format!("{raw:0>width$}", width = decimals + 1)
    } else {
        raw.to_string()
    };
    let split = padded.len() - decimals;
    let whole = &padded[..split];
    let frac = &padded[split..];

    if display_decimals == 0 {
        return whole.to_string();
    }
    let mut frac = frac.to_string();
    if frac.len() < display_decimals {
        frac.push_str(&"0".repeat(display_decimals - frac.len()));
    } else {
        frac.truncate(display_decimals);
    }
    format!("{whole}.{frac}")
}

/// Parses a human-readable decimal amount back into base units, truncating
/// any precision beyond `decimals`. Non-numeric input parses as `"0"`.
///
/// `parse_token_amount("1.5", 6)` is `"1500000"`.
pub fn parse_token_amount(amount: &str, decimals: u8) -> String {
    let amount = amount.trim();
    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return "0".to_string();
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return "0".to_string();
    }

    let decimals = decimals as usize;
    let mut frac = frac.to_string();
    if frac.len() < decimals {
        frac.push_str(&"0".repeat(decimals - frac.len()));
    } else {
        frac.truncate(decimals);
    }

    let combined = format!("{whole}{frac}");
    let trimmed = combined.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_cover_the_range_exactly() {
        assert_eq!(batch_ranges(23, 10), vec![(0, 10), (10, 20), (20, 23)]);
        assert_eq!(batch_ranges(10, 10), vec![(0, 10)]);
        assert_eq!(batch_ranges(0, 10), Vec::<(u64, u64)>::new());
        assert_eq!(batch_ranges(3, 10), vec![(0, 3)]);
    }

    #[test]
    fn zero_batch_size_does_not_loop_forever() {
        assert_eq!(batch_ranges(2, 0), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn formats_base_units_for_display() {
        assert_eq!(format_token_amount("1500000", 6, 2), "1.50");
        assert_eq!(format_token_amount("1500000", 6, 4), "1.5000");
        assert_eq!(format_token_amount("123", 6, 4), "0.0001");
        assert_eq!(format_token_amount("1000000000000000000", 18, 2), "1.00");
        assert_eq!(format_token_amount("0", 18, 2), "0.00");
        assert_eq!(format_token_amount("1500000", 6, 0), "1");
    }

    #[test]
    fn format_rejects_non_numeric_input() {
        assert_eq!(format_token_amount("abc", 6, 2), "0");
        assert_eq!(format_token_amount("", 6, 2), "0");
        assert_eq!(format_token_amount("-5", 6, 2), "0");
        assert_eq!(format_token_amount("1.5", 6, 2), "0");
    }

    #[test]
    fn parses_display_amounts_into_base_units() {
        assert_eq!(parse_token_amount("1.5", 6), "1500000");
        assert_eq!(parse_token_amount("1", 18), "1000000000000000000");
        assert_eq!(parse_token_amount("0.000001", 6), "1");
        assert_eq!(parse_token_amount("0", 6), "0");
        // Precision beyond the token's decimals is truncated.
        assert_eq!(parse_token_amount("1.23456789", 6), "1234567");
    }

    #[test]
    fn parse_rejects_non_numeric_input() {
        assert_eq!(parse_token_amount("abc", 6), "0");
        assert_eq!(parse_token_amount("", 6), "0");
        assert_eq!(parse_token_amount("1.2.3", 6), "0");
        assert_eq!(parse_token_amount("-1", 6), "0");
    }
}
