//! Limit handling for list operations
//!
//! A limit keeps a leading slice of the collection. `None` and `0` mean
//! "everything"; a negative limit drops that many records from the end.

/// Parse a query or path value the lenient way: optional leading whitespace
/// and sign, then the leading run of decimal digits. `"3abc"` is 3, `"abc"`
/// is `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    // Overlong digit runs saturate rather than fail.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Number of leading records a limit keeps out of `len`.
pub fn limit_len(len: usize, limit: Option<i64>) -> usize {
    match limit {
        None | Some(0) => len,
        Some(n) if n > 0 => len.min(usize::try_from(n).unwrap_or(usize::MAX)),
        Some(n) => len.saturating_sub(usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX)),
    }
}

/// Truncate `items` to the leading slice selected by `limit`.
pub fn apply_limit<T>(mut items: Vec<T>, limit: Option<i64>) -> Vec<T> {
    let keep = limit_len(items.len(), limit);
    items.truncate(keep);
    items
}
