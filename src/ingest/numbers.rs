//! Lenient numeric coercion for spreadsheet text.
//!
//! Mirrors how browsers read numbers out of form data: the longest
//! numeric prefix wins and trailing units are ignored (`"1200 DH"`).

/// Thin and regular spaces used as thousand separators.
fn strip_group_separators(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect()
}

/// Length of the leading `[+-]?digits` run, or 0 when there are no digits.
fn integer_prefix_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == start { 0 } else { i }
}

/// Parse the leading float literal of `s`. Non-finite results are rejected.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let cleaned = strip_group_separators(s);
    let bytes = cleaned.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let exp = integer_prefix_len(&bytes[i + 1..]);
        if exp > 0 {
            i += 1 + exp;
        }
    }
    cleaned[..i]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse the leading base-10 integer of `s`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let cleaned = strip_group_separators(s);
    let len = integer_prefix_len(cleaned.as_bytes());
    if len == 0 {
        return None;
    }
    cleaned[..len].parse().ok()
}
