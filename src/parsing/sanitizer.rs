/// Strips one leading and one trailing triple-backtick fence from raw model
/// output, tolerating an optional language tag on the opening fence.
/// Generators are told not to fence their JSON; they do it anyway.
pub fn clean(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag (e.g. "json") up to the first newline. A
        // fence with no newline after the tag is treated as tag-only.
        text = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => "",
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim().to_string()
}

/// Normalizes one extracted natural-language field (question, answer,
/// explanation, option): newlines and exotic Unicode spaces become ordinary
/// spaces, whitespace runs collapse to one space, remaining control
/// characters are dropped, and the result is trimmed. Idempotent.
pub fn clean_field_text(s: &str) -> String {
    let mapped: String = s
        .chars()
        .filter_map(|c| {
            if is_space_like(c) {
                Some(' ')
            } else if c.is_control() {
                None
            } else {
                Some(c)
            }
        })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_space_like(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\t'
            | '\u{00A0}' // no-break space
            | '\u{1680}'
            | '\u{2000}'..='\u{200D}' // en/em spaces through zero-width joiner
            | '\u{2028}' | '\u{2029}'
            | '\u{202F}' | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}' // zero-width no-break space / BOM
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_fence_with_language_tag() {
        let raw = "```json\n{\"questions\": []}\n```";
        assert_eq!(clean(raw), "{\"questions\": []}");
    }

    #[test]
    fn clean_strips_fence_without_language_tag() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(clean(raw), "{\"a\": 1}");
    }

    #[test]
    fn clean_strips_at_most_one_fence_per_side() {
        let raw = "```json\n```json\n{}\n```\n```";
        let once = clean(raw);
        assert!(once.starts_with("```json"));
        assert!(once.ends_with("```"));
    }

    #[test]
    fn clean_leaves_unfenced_text_alone() {
        assert_eq!(clean("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(clean("plain prose"), "plain prose");
    }

    #[test]
    fn clean_field_text_normalizes_exotic_whitespace() {
        assert_eq!(clean_field_text("A\u{00A0}B\nC\u{01}"), "A B C");
        assert_eq!(clean_field_text("a\u{200B}b"), "a b");
        assert_eq!(clean_field_text("  spaced \t out \r\n text  "), "spaced out text");
    }

    #[test]
    fn clean_field_text_is_idempotent() {
        let inputs = [
            "A\u{00A0}B\nC\u{01}",
            "already clean",
            "  lots\n\nof\u{2003}gaps  ",
            "",
        ];
        for input in inputs {
            let once = clean_field_text(input);
            assert_eq!(clean_field_text(&once), once);
        }
    }

    #[test]
    fn clean_field_text_drops_control_characters() {
        assert_eq!(clean_field_text("a\u{07}b\u{1B}c"), "abc");
    }
}
