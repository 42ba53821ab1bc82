//! Time expression grammar used by timeline flags
//!
//! Accepted forms:
//! - plain seconds: `90`, `90.5`
//! - `MM:SS[.fraction]`: `01:30`, `1:30.250`
//! - `HH:MM:SS[.fraction]`: `00:01:30`, `1:02:30.5`
//!
//! Offsets (`-itsoffset`) may additionally carry a leading sign.

/// Parse an unsigned time expression to seconds
pub fn parse_time_expression(expr: &str) -> Option<f64> {
    let parts: Vec<&str> = expr.split(':').collect();
    match parts.as_slice() {
        [seconds] => parse_seconds_field(seconds, false),
        [minutes, seconds] => {
            let minutes = parse_integer_field(minutes, Some(2))?;
            let seconds = parse_seconds_field(seconds, true)?;
            Some(minutes as f64 * 60.0 + seconds)
        }
        [hours, minutes, seconds] => {
            let hours = parse_integer_field(hours, None)?;
            let minutes = parse_integer_field(minutes, Some(2))?;
            if minutes >= 60 || parts[1].len() != 2 {
                return None;
            }
            let seconds = parse_seconds_field(seconds, true)?;
            Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
        }
        _ => None,
    }
}

/// Parse a time expression with an optional leading `+` or `-`
pub fn parse_signed_time_expression(expr: &str) -> Option<f64> {
    if let Some(rest) = expr.strip_prefix('-') {
        parse_time_expression(rest).map(|v| -v)
    } else if let Some(rest) = expr.strip_prefix('+') {
        parse_time_expression(rest)
    } else {
        parse_time_expression(expr)
    }
}

pub fn is_time_expression(expr: &str) -> bool {
    parse_time_expression(expr.trim()).is_some()
}

pub fn is_signed_time_expression(expr: &str) -> bool {
    parse_signed_time_expression(expr.trim()).is_some()
}

/// Digits only, optionally capped in width
fn parse_integer_field(field: &str, max_width: Option<usize>) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if max_width.is_some_and(|w| field.len() > w) {
        return None;
    }
    field.parse().ok()
}

/// `digits[.digits]`; a component seconds field must be two digits below 60
fn parse_seconds_field(field: &str, component: bool) -> Option<f64> {
    let (whole, fraction) = match field.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (field, None),
    };
    let whole_value = parse_integer_field(whole, None)?;
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    if component && (whole.len() != 2 || whole_value >= 60) {
        return None;
    }
    let seconds: f64 = field.parse().ok()?;
    Some(seconds)
}
