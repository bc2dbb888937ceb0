//! Tab labels - display form of tab titles.

/// Shorten `title` to at most `max_chars` characters, ending with an ellipsis.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut short: String = title.chars().take(keep).collect();
    short.push('…');
    short
}

/// Tooltip text: the full title, flagged when there are unsaved changes.
pub fn tab_tooltip(title: &str, is_dirty: bool) -> String {
    if is_dirty {
        format!("{title} (unsaved changes)")
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Samples", 28), "Samples");
        assert_eq!(truncate_title("Destroy request #88", 10), "Destroy r…");
        assert_eq!(truncate_title("Проба №12", 5), "Проб…");
    }

    #[test]
    fn test_tab_tooltip() {
        assert_eq!(tab_tooltip("Samples", false), "Samples");
        assert_eq!(tab_tooltip("Samples", true), "Samples (unsaved changes)");
    }
}
