use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `text` in terminal cells, ignoring ANSI escapes.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi_escapes::strip_str(text).as_str())
}

/// Visible characters of `text` paired with their cell widths. Zero-width
/// characters are dropped.
pub fn visible_chars(text: &str) -> Vec<(char, usize)> {
    strip_ansi_escapes::strip_str(text)
        .chars()
        .filter_map(|ch| match UnicodeWidthChar::width(ch) {
            Some(0) | None => None,
            Some(w) => Some((ch, w)),
        })
        .collect()
}
