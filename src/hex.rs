//! Hexadecimal encoding for `Bytes` wire forms (`spec.md` §4.1, §4.3).

/// Decodes hex digits, ignoring any embedded whitespace. Returns `None` on
/// an odd digit count or a non-hex-digit character.
pub fn decode(s: &str) -> Option<Vec<u8>> {
  let mut digits = s.chars().filter(|c| !c.is_whitespace());
  let mut out = Vec::with_capacity(s.len() / 2);
  loop {
    let hi = match digits.next() {
      Some(c) => c,
      None => break,
    };
    let lo = digits.next()?;
    let hi = hi.to_digit(16)?;
    let lo = lo.to_digit(16)?;
    out.push(((hi << 4) | lo) as u8);
  }
  Some(out)
}

/// Encodes `bytes` as uppercase hexadecimal, with no separators.
pub fn encode(bytes: &[u8]) -> String {
  let mut out = String::with_capacity(bytes.len() * 2);
  for byte in bytes {
    out.push_str(&format!("{:02X}", byte));
  }
  out
}
