//! Greedy word wrapping for card labels and LaTeX paragraphs.
//!
//! Line breaking follows the usual "text wrap" rules: whitespace, em-dashes
//! and hyphens inside compound words are break points.

/// Column width of the card labels drawn by the graph viewer.
pub const TITLE_WRAP_WIDTH: usize = 17;

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tabs expand to 8-column stops, every other ASCII whitespace becomes a space.
fn expand_whitespace(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut column = 0usize;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = 8 - column % 8;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            '\x0b' | '\x0c' => {
                out.push(' ');
                column += 1;
            }
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

fn letter_at(text: &[char], i: usize) -> bool {
    text.get(i).copied().is_some_and(is_letter)
}

/// `text[at..]` is a run of two or more hyphens followed by a word character.
fn dash_run(text: &[char], at: usize) -> Option<usize> {
    let run = text[at..].iter().take_while(|&&c| c == '-').count();
    (run >= 2 && text.get(at + run).copied().is_some_and(is_word)).then_some(run)
}

/// The hyphen at `i` sits inside a compound word and may end a line.
fn breakable_hyphen(text: &[char], i: usize) -> bool {
    if text.get(i) != Some(&'-') {
        return false;
    }
    let before = (i >= 2 && letter_at(text, i - 2) && letter_at(text, i - 1))
        || (i >= 3 && letter_at(text, i - 3) && text[i - 2] == '-' && letter_at(text, i - 1));
    let after = letter_at(text, i + 1)
        && (letter_at(text, i + 2) || (text.get(i + 2) == Some(&'-') && letter_at(text, i + 3)));
    before && after
}

/// Space runs, em-dashes, and words cut after their inner hyphens.
fn chunks(text: &[char]) -> Vec<String> {
    let mut out = vec![];
    let mut start = 0;
    while start < text.len() {
        let end = if text[start] == ' ' {
            start + text[start..].iter().take_while(|&&c| c == ' ').count()
        } else if let Some(run) = (start > 0 && letter_at(text, start - 1))
            .then(|| dash_run(text, start))
            .flatten()
        {
            start + run
        } else {
            let mut end = start + 1;
            loop {
                if breakable_hyphen(text, end) {
                    break end + 1;
                }
                if end == text.len() || text[end] == ' ' {
                    break end;
                }
                if letter_at(text, end - 1) && dash_run(text, end).is_some() {
                    break end;
                }
                end += 1;
            }
        };
        out.push(text[start..end].iter().collect());
        start = end;
    }
    out
}

fn is_blank(chunk: &str) -> bool {
    chunk.trim().is_empty()
}

/// Split `text` into lines of at most `width` characters.
///
/// Lines break between words or after the hyphen of a compound word
/// (`gaz-à-effet-de-serre`). Spacing inside a line is kept as written; a
/// space run at a line break is dropped. A word longer than `width` is cut,
/// at its last fitting hyphen when it has one, its first piece filling what
/// is left of the current line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut pending: Vec<String> = chunks(&expand_whitespace(text));
    pending.reverse();
    let mut lines = vec![];

    while !pending.is_empty() {
        if !lines.is_empty() && pending.last().is_some_and(|c| is_blank(c)) {
            pending.pop();
        }

        let mut line: Vec<String> = vec![];
        let mut len = 0usize;
        while let Some(chunk) = pending.last() {
            let chunk_len = chunk.chars().count();
            if len + chunk_len > width {
                break;
            }
            len += chunk_len;
            line.extend(pending.pop());
        }

        if let Some(chunk) = pending.last_mut() {
            if chunk.chars().count() > width {
                let room = width - len;
                let chars: Vec<char> = chunk.chars().collect();
                let mut cut = room;
                if let Some(hyphen) = chars[..room].iter().rposition(|&c| c == '-') {
                    if hyphen > 0 && chars[..hyphen].iter().any(|&c| c != '-') {
                        cut = hyphen + 1;
                    }
                }
                line.push(chars[..cut].iter().collect());
                *chunk = chars[cut..].iter().collect();
            }
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }
        let joined = line.concat();
        if !joined.is_empty() {
            lines.push(joined);
        }
    }
    lines
}

/// `wrap` joined with newlines.
pub fn fill(text: &str, width: usize) -> String {
    wrap(text, width).join("\n")
}

/// Card title as shown on the fixed-size graph labels.
pub fn wrap_title(title: &str) -> String {
    fill(title, TITLE_WRAP_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_title_is_untouched() {
        assert_eq!(wrap_title("Hello"), "Hello");
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_title("Combustion of fossil fuels"),
            "Combustion of\nfossil fuels"
        );
    }

    #[test]
    fn lines_never_exceed_width() {
        let text = "Déforestation et changement d'affectation des sols tropicaux";
        for line in wrap(text, TITLE_WRAP_WIDTH) {
            assert!(line.chars().count() <= TITLE_WRAP_WIDTH, "{line}");
        }
    }

    #[test]
    fn long_word_is_cut_and_fills_current_line() {
        assert_eq!(wrap("ab cdefghij", 5), vec!["ab cd", "efghi", "j"]);
    }

    #[test]
    fn compound_words_break_after_hyphens() {
        assert_eq!(wrap_title("Gaz-à-effet-de-serre"), "Gaz-à-effet-de-\nserre");
        assert_eq!(
            wrap("Risque de sous-alimentation", 15),
            vec!["Risque de sous-", "alimentation"]
        );
    }

    #[test]
    fn long_word_is_cut_at_its_last_fitting_hyphen() {
        assert_eq!(wrap("abc-1234567", 6), vec!["abc-", "123456", "7"]);
    }

    #[test]
    fn leading_hyphens_are_not_break_points() {
        assert_eq!(wrap("--abcdef", 4), vec!["--ab", "cdef"]);
    }

    #[test]
    fn inner_spacing_is_kept_and_edges_dropped() {
        assert_eq!(wrap("a  b", 10), vec!["a  b"]);
        assert_eq!(wrap("abc   def", 4), vec!["abc", "def"]);
        assert_eq!(wrap("a\nb", 10), vec!["a b"]);
    }

    #[test]
    fn digits_around_a_hyphen_do_not_break() {
        assert_eq!(wrap("1990-2020 data", 9), vec!["1990-2020", "data"]);
    }

    #[test]
    fn empty_text_gives_no_lines() {
        assert!(wrap("   ", 10).is_empty());
        assert_eq!(fill("", 10), "");
    }
}
