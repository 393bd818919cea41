/// Truncate a string to at most `max_chars` characters.
///
/// Bounds are counted in characters, not bytes, so multi-byte text is
/// never split mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_than_limit() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_truncate_at_limit() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // "crédito" is 8 bytes but 7 chars
        assert_eq!(truncate_chars("crédito", 4), "créd");
        assert_eq!(truncate_chars("crédito", 7), "crédito");
    }
}
