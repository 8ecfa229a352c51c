//! Caption wrapping on word boundaries.

/// Characters allowed per dedication line.
pub const MESSAGE_MAX_CHARS: usize = 60;
/// Dedication lines kept; the rest is dropped.
pub const MESSAGE_MAX_LINES: usize = 2;

/// Width of a string in pixels for the active font.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn text_width(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Greedy wrap by character count, keeping at most `max_lines` lines.
///
/// Words are never split; a single word longer than `max_chars` occupies
/// a line of its own. Lines past `max_lines` are silently discarded.
pub fn wrap_by_chars(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines = pack_words(text, |line, word| {
        line.chars().count() + 1 + word.chars().count() <= max_chars
    });
    lines.truncate(max_lines);
    lines
}

/// Wrap for the dedication message.
pub fn wrap_message(text: &str) -> Vec<String> {
    wrap_by_chars(text, MESSAGE_MAX_CHARS, MESSAGE_MAX_LINES)
}

/// Greedy wrap by rendered width. Every line is kept.
pub fn wrap_by_width(text: &str, max_width: f32, measure: &dyn TextMeasure) -> Vec<String> {
    pack_words(text, |line, word| {
        let candidate = format!("{} {}", line, word);
        measure.text_width(&candidate) <= max_width
    })
}

fn pack_words<F>(text: &str, fits: F) -> Vec<String>
where
    F: Fn(&str, &str) -> bool,
{
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();
    for word in words {
        if fits(&current, word) {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap_message("").is_empty());
        assert!(wrap_message("   ").is_empty());
    }

    #[test]
    fn test_short_message_is_one_line() {
        assert_eq!(wrap_message("Para ti, con amor"), vec!["Para ti, con amor"]);
    }

    #[test]
    fn test_exact_budget_fits_on_one_line() {
        let text = format!("{} {}", "a".repeat(29), "b".repeat(30));
        assert_eq!(text.len(), 60);
        assert_eq!(wrap_message(&text), vec![text.clone()]);
    }

    #[test]
    fn test_one_over_budget_breaks() {
        let text = format!("{} {}", "a".repeat(30), "b".repeat(30));
        let lines = wrap_message(&text);
        assert_eq!(lines, vec!["a".repeat(30), "b".repeat(30)]);
    }

    #[test]
    fn test_130_char_message_keeps_two_lines() {
        // 18 six-letter words and one four-letter word
        let mut text = vec!["abcdef"; 18].join(" ");
        text.push_str(" abcd");
        let words: Vec<&str> = text.split(' ').collect();
        assert_eq!(text.chars().count(), 130);

        let lines = wrap_message(&text);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() <= 60));

        // The 17th word onward would have started a third line
        let kept: usize = lines.iter().map(|l| l.split(' ').count()).sum();
        assert_eq!(kept, 16);
        assert!(kept < words.len());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 'ñ' is two bytes; 30 + 1 + 29 chars fit in 60
        let text = format!("{} {}", "ñ".repeat(30), "o".repeat(29));
        assert_eq!(wrap_message(&text).len(), 1);
    }

    #[test]
    fn test_overlong_word_gets_own_line() {
        let long = "x".repeat(70);
        let lines = wrap_by_chars(&format!("hi {} there", long), 60, 5);
        assert_eq!(lines, vec!["hi".to_string(), long, "there".to_string()]);
    }

    #[test]
    fn test_repeated_whitespace_collapses() {
        assert_eq!(wrap_message("hola   mundo\n estrellas"), vec!["hola mundo estrellas"]);
    }

    #[test]
    fn test_wrap_by_width_keeps_every_line() {
        // Fixed 10px advance per character
        let measure = |s: &str| s.chars().count() as f32 * 10.0;
        let lines = wrap_by_width("uno dos tres cuatro cinco seis", 100.0, &measure);
        assert_eq!(lines, vec!["uno dos", "tres", "cuatro", "cinco seis"]);
    }

    #[test]
    fn test_wrap_by_width_first_word_never_dropped() {
        let measure = |s: &str| s.chars().count() as f32 * 10.0;
        let lines = wrap_by_width("constelaciones", 50.0, &measure);
        assert_eq!(lines, vec!["constelaciones"]);
    }

    proptest! {
        #[test]
        fn prop_lines_respect_budgets(words in proptest::collection::vec("[a-zA-Z]{1,12}", 0..60)) {
            let text = words.join(" ");
            let lines = wrap_message(&text);
            prop_assert!(lines.len() <= MESSAGE_MAX_LINES);
            for line in &lines {
                prop_assert!(line.chars().count() <= MESSAGE_MAX_CHARS);
                // Every emitted word is a whole input word
                for w in line.split(' ') {
                    prop_assert!(words.iter().any(|orig| orig == w));
                }
            }
        }

        #[test]
        fn prop_single_line_is_stable(words in proptest::collection::vec("[a-z]{1,8}", 1..20)) {
            let text = words.join(" ");
            let lines = wrap_message(&text);
            if lines.len() == 1 {
                prop_assert_eq!(wrap_message(&lines[0]), lines.clone());
            }
            for line in &lines {
                prop_assert_eq!(wrap_message(line), vec![line.clone()]);
            }
        }
    }
}
