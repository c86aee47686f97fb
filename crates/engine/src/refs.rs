//! Cell reference helpers: column letters and A1-style notation.

/// Convert a 0-based column index to spreadsheet letters: 0 -> A, 25 -> Z,
/// 26 -> AA. Bijective base-26 with no zero digit.
pub fn column_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col + 1; // 1-indexed for calculation
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

/// Format a 0-based position as an A1 reference: (2, 1) -> "B3".
pub fn cell_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_letters(col), row + 1)
}

/// Parse an A1 reference back to a 0-based position: "B3" -> (2, 1).
/// Returns `None` for anything that is not letters followed by digits.
pub fn parse_reference(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.trim();
    let split = reference.find(|ch: char| ch.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}
