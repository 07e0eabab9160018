//! Shared utility functions

/// Truncate a string to a maximum length, appending "..." if truncated.
/// Handles multi-byte characters by finding a valid char boundary.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let suffix = "...";
    let target = max_len.saturating_sub(suffix.len());
    let mut end = target;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &s[..end], suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_str("title", 10), "title");
    }

    #[test]
    fn long_strings_are_truncated_with_ellipsis() {
        assert_eq!(truncate_str("a very long page title", 10), "a very ...");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "ăăăăăăăăăă";
        let out = truncate_str(s, 8);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 8);
    }
}
