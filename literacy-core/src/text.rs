//! Small text helpers shared across the pipeline

/// Clip to at most `limit` bytes without splitting a character
pub fn clip_to_boundary(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
