//! Plain-text table helpers.

/// Truncate to `max_len` characters, ending in "..." when cut.
///
/// # Examples
///
/// ```rust
/// use flamelab_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Sodium", 10), "Sodium");
/// assert_eq!(truncate_string("Yellow-orange", 8), "Yello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// A horizontal rule `width` characters wide.
pub fn separator(width: usize) -> String {
    "-".repeat(width)
}

/// Render a colour as `#rrggbb`.
pub fn hex_color(color: flamelab_core::Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// `yes` or `-`, for flag columns.
pub fn flag(value: bool) -> &'static str {
    if value { "yes" } else { "-" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamelab_core::Rgb;

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_string("Ca·Ba mixture", 6), "Ca·...");
        assert_eq!(truncate_string("abc", 3), "abc");
    }

    #[test]
    fn colors_render_as_hex() {
        assert_eq!(hex_color(Rgb::new(255, 128, 0)), "#ff8000");
    }

    #[test]
    fn separator_has_requested_width() {
        assert_eq!(separator(4), "----");
        assert_eq!(flag(false), "-");
    }
}
