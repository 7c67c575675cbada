//! Duration arguments: `90`, `30s`, `5m`, `2h`, `7d`

/// Parse a duration into seconds. Plain numbers are seconds.
pub fn parse_duration(input: &str) -> Option<u64> {
    let input = input.trim().to_ascii_lowercase();
    let (digits, unit) = match input.char_indices().last()? {
        (idx, c) if c.is_ascii_alphabetic() => (&input[..idx], Some(c)),
        _ => (input.as_str(), None),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;

    let multiplier = match unit {
        None | Some('s') => 1,
        Some('m') => 60,
        Some('h') => 3600,
        Some('d') => 86_400,
        Some(_) => return None,
    };
    value.checked_mul(multiplier)
}
