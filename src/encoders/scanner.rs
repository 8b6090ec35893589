//! Quote-aware, boundary-aware search for column names in script text.
//!
//! This is a heuristic, not a tokenizer. Quote tracking is a plain toggle per
//! delimiter and does not understand escapes, so a quote escaped inside a
//! string literal ends that literal as far as the scanner is concerned.

/// Characters that may be part of an identifier in the target script language.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Tracks whether the scan position is inside a quoted run.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct QuoteState {
    delimiter: Option<char>,
}

impl QuoteState {
    pub(crate) fn in_string(&self) -> bool {
        self.delimiter.is_some()
    }

    /// Feeds one character that was not consumed by a match.
    pub(crate) fn advance(&mut self, c: char) {
        match self.delimiter {
            None if is_quote(c) => self.delimiter = Some(c),
            Some(delim) if c == delim => self.delimiter = None,
            _ => {}
        }
    }
}

/// Returns all byte offsets where `name` starts outside quoted runs.
///
/// This is the standalone query form of the scan. The substitution engine
/// walks the text itself with the same [`QuoteState`] rules, because it
/// rewrites the text as it goes and offsets shift after every replacement.
/// A position where `name` matches is recorded and not considered as a quote
/// character, as in the replacement scan.
pub fn find_occurrences(text: &str, name: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    if name.is_empty() {
        return positions;
    }

    let mut quotes = QuoteState::default();
    for (pos, c) in text.char_indices() {
        if !quotes.in_string() && text[pos..].starts_with(name) {
            positions.push(pos);
        } else {
            quotes.advance(c);
        }
    }

    positions
}

/// Decides whether a literal match at `pos` is a free identifier.
///
/// The match must not be glued to identifier characters on either side, so
/// searching for `E` never hits the `E` in `TRUE`. With a non-empty
/// `mandatory_prefix` the match is only free when that exact prefix sits
/// directly in front of it (and is itself free on its left), as in
/// `data.score`.
///
/// A name followed, across spaces or tabs, by `(` is in call position and is
/// not free: a column called `mean` must not rewrite `mean(x)`.
pub fn is_free_occurrence(text: &str, pos: usize, name_len: usize, mandatory_prefix: &str) -> bool {
    let start_free = if mandatory_prefix.is_empty() {
        preceded_by_boundary(text, pos)
    } else {
        has_free_prefix(text, pos, mandatory_prefix)
    };

    start_free && end_is_free(text, pos + name_len)
}

fn preceded_by_boundary(text: &str, pos: usize) -> bool {
    match text[..pos].chars().next_back() {
        Some(c) => !is_name_char(c),
        None => true,
    }
}

fn has_free_prefix(text: &str, pos: usize, prefix: &str) -> bool {
    text[..pos].ends_with(prefix) && preceded_by_boundary(text, pos - prefix.len())
}

fn end_is_free(text: &str, end: usize) -> bool {
    let rest = &text[end..];
    match rest.chars().next() {
        None => true,
        Some(c) if is_name_char(c) => false,
        Some(_) => {
            // Skip blanks and see whether a call parenthesis follows
            rest.chars().find(|c| *c != ' ' && *c != '\t') != Some('(')
        }
    }
}
