// src/ui/dialogue_panel/wrap.rs
//
// Word wrapping for the dialogue panel body.

/// Wraps `text` at `columns` characters and keeps only the last `max_lines` lines.
///
/// Words longer than a line are split. Explicit newlines start a new line.
pub fn wrap_dialogue_text(text: &str, columns: usize, max_lines: usize) -> String {
    let columns = columns.max(1);
    let mut lines: Vec<String> = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut width = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            if width > 0 && width + 1 + word.len() > columns {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }

            while word.len() > columns {
                if width > 0 {
                    lines.push(std::mem::take(&mut current));
                    width = 0;
                }
                let rest = word.split_off(columns);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            if word.is_empty() {
                continue;
            }
            if width > 0 {
                current.push(' ');
                width += 1;
            }
            width += word.len();
            current.extend(word);
        }

        lines.push(current);
    }

    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let wrapped = wrap_dialogue_text("the quick brown fox jumps", 10, 5);
        assert_eq!(wrapped, "the quick\nbrown fox\njumps");
    }

    #[test]
    fn keeps_most_recent_lines() {
        let wrapped = wrap_dialogue_text("aa bb cc dd ee", 2, 2);
        assert_eq!(wrapped, "dd\nee");
    }

    #[test]
    fn splits_overlong_words() {
        let wrapped = wrap_dialogue_text("abcdefgh ij", 3, 10);
        assert_eq!(wrapped, "abc\ndef\ngh\nij");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let wrapped = wrap_dialogue_text("héllo wörld", 5, 5);
        assert_eq!(wrapped, "héllo\nwörld");
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(wrap_dialogue_text("", 62, 5), "");
    }
}
