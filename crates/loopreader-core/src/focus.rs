//! Optimal recognition point of a word.

/// A word split around the letter the eye should fixate on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FocusParts<'a> {
    pub prefix: &'a str,
    pub focus: &'a str,
    pub suffix: &'a str,
}

impl FocusParts<'_> {
    pub const EMPTY: FocusParts<'static> = FocusParts {
        prefix: "",
        focus: "",
        suffix: "",
    };
}

/// Char index of the focus letter for a word of `char_count` chars.
pub fn focus_char_index(char_count: usize) -> usize {
    match char_count {
        0 | 1 => 0,
        2..=5 => 1,
        // floor(n / 2.5)
        n => (n * 2) / 5,
    }
}

pub fn focus_point(word: &str) -> FocusParts<'_> {
    let char_count = word.chars().count();
    if char_count == 0 {
        return FocusParts::EMPTY;
    }

    let pos = focus_char_index(char_count);
    let mut boundaries = word
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(core::iter::once(word.len()))
        .skip(pos);
    let focus_start = boundaries.next().unwrap_or(word.len());
    let focus_end = boundaries.next().unwrap_or(word.len());

    FocusParts {
        prefix: &word[..focus_start],
        focus: &word[focus_start..focus_end],
        suffix: &word[focus_end..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts<'a>(prefix: &'a str, focus: &'a str, suffix: &'a str) -> FocusParts<'a> {
        FocusParts {
            prefix,
            focus,
            suffix,
        }
    }

    #[test]
    fn literal_cases() {
        assert_eq!(focus_point("a"), parts("", "a", ""));
        assert_eq!(focus_point("cat"), parts("c", "a", "t"));
        assert_eq!(focus_point("reading"), parts("re", "a", "ding"));
    }

    #[test]
    fn empty_word_has_no_parts() {
        assert_eq!(focus_point(""), FocusParts::EMPTY);
    }

    #[test]
    fn length_bands() {
        assert_eq!(focus_char_index(2), 1);
        assert_eq!(focus_char_index(5), 1);
        assert_eq!(focus_char_index(6), 2);
        assert_eq!(focus_char_index(10), 4);
        assert_eq!(focus_char_index(13), 5);
    }

    #[test]
    fn multibyte_words_split_on_char_boundaries() {
        let split = focus_point("señorita");
        assert_eq!(split, parts("señ", "o", "rita"));
        assert_eq!(
            [split.prefix, split.focus, split.suffix].concat(),
            "señorita"
        );
        assert_eq!(focus_point("mañana"), parts("ma", "ñ", "ana"));
    }
}
