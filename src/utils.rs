/// Parses free-text cell input into a number.
///
/// Everything except ASCII digits, `-`, `.` and `,` is dropped, the first `,`
/// becomes a decimal point, and the longest numeric prefix is read. Input with
/// no readable number yields `0.0`.
pub fn parse_cell_value(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '.' | ','))
        .collect();
    let cleaned = cleaned.replacen(',', ".", 1);

    if cleaned.is_empty() {
        return 0.0;
    }

    let prefix = numeric_prefix(&cleaned);
    prefix.parse::<f64>().unwrap_or(0.0)
}

/// Longest prefix of the form `-?digits(.digits)?` that holds at least one
/// digit. Returns an empty string when there is none.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut digits = 0;

    if bytes.first() == Some(&b'-') {
        end = 1;
    }

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        ""
    } else {
        &s[..end]
    }
}

/// Tolerant comparison for derived sums.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}
