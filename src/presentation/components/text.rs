use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cuts `value` to `max_width` terminal columns, ending with `…` when clipped.
pub(crate) fn truncate(value: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(value) <= max_width {
        return value.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in value.chars() {
        let width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + width > max_width - 1 {
            break;
        }
        out.push(ch);
        used += width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_pass_through() {
        assert_eq!(truncate("Flour", 10), "Flour");
        assert_eq!(truncate("Flour", 5), "Flour");
    }

    #[test]
    fn long_values_end_with_ellipsis() {
        assert_eq!(truncate("Carrot cake", 7), "Carrot…");
        assert_eq!(truncate("Carrot cake", 1), "…");
        assert_eq!(truncate("Carrot cake", 0), "");
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(truncate("蛋糕蛋糕", 5), "蛋糕…");
    }
}
