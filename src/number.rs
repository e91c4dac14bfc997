use std::num::IntErrorKind;

/// Normalize a count such as `"1,234"`, `"2.5k"` or `"3M"` to an integer.
///
/// Never fails: empty or non-numeric input yields 0, and values beyond `u64`
/// saturate.
pub fn parse_count(text: &str) -> u64 {
    let lowered = text.trim().to_lowercase();
    let (body, multiplier) = split_multiplier(&lowered);

    let residue: String = body.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();

    if residue.contains('.') {
        return match residue.parse::<f64>() {
            // `as` truncates toward zero and saturates at the bounds
            Ok(value) => (value * multiplier as f64) as u64,
            Err(_) => 0,
        };
    }

    match residue.parse::<u64>() {
        Ok(value) => value.saturating_mul(multiplier),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
        Err(_) => 0,
    }
}

fn split_multiplier(token: &str) -> (&str, u64) {
    if let Some(rest) = token.strip_suffix('k') {
        (rest, 1_000)
    } else if let Some(rest) = token.strip_suffix('m') {
        (rest, 1_000_000)
    } else if let Some(rest) = token.strip_suffix('b') {
        (rest, 1_000_000_000)
    } else {
        (token, 1)
    }
}
