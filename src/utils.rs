//! Text helpers shared by caption producers.

/// Normalize caption casing and terminal punctuation.
///
/// A caption starting with a lowercase letter is capitalized (first letter
/// uppercased, the rest lowercased). Statements gain a trailing `.` and
/// questions a trailing `?` when missing.
pub fn format_text_case_and_punctuation(text: &str, is_question: bool) -> String {
    let mut formatted = match text.chars().next() {
        Some(first) if first.is_lowercase() => {
            let mut capitalized: String = first.to_uppercase().collect();
            capitalized.push_str(&text[first.len_utf8()..].to_lowercase());
            capitalized
        }
        _ => text.to_string(),
    };
    let terminal = if is_question { '?' } else { '.' };
    if !formatted.ends_with(terminal) {
        formatted.push(terminal);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_statements_are_capitalized_and_terminated() {
        assert_eq!(
            format_text_case_and_punctuation("two players CELEBRATE", false),
            "Two players celebrate."
        );
        assert_eq!(
            format_text_case_and_punctuation("already done.", false),
            "Already done."
        );
    }

    #[test]
    fn uppercase_text_keeps_its_casing() {
        assert_eq!(
            format_text_case_and_punctuation("Messi SCORES", false),
            "Messi SCORES."
        );
    }

    #[test]
    fn questions_gain_question_marks() {
        assert_eq!(
            format_text_case_and_punctuation("who scored", true),
            "Who scored?"
        );
        assert_eq!(format_text_case_and_punctuation("Who scored?", true), "Who scored?");
    }

    #[test]
    fn empty_and_non_ascii_inputs() {
        assert_eq!(format_text_case_and_punctuation("", false), ".");
        assert_eq!(format_text_case_and_punctuation("élan VITAL", false), "Élan vital.");
    }
}
