//! Parenthesis- and quote-aware text primitives.
//!
//! Everything the extractor and the analyzer know about "structure" comes
//! from these helpers: top-level splitting, balanced span lookup, statement
//! boundaries, comment stripping and string-literal masking. All functions
//! are pure linear scans over the input and never fail; unbalanced input
//! yields a best-effort result.

/// Quote delimiters recognized while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
    Backtick
}

impl Quote {
    fn opening(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            '`' => Some(Self::Backtick),
            _ => None
        }
    }

    /// Character that closes this quote
    pub fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
            Self::Backtick => '`'
        }
    }
}

/// How a backslash inside a quoted literal is read.
///
/// Standard SQL (and PostgreSQL, SQLite, SQL Server, Oracle) only knows the
/// doubled quote, so `'C:\'` is a complete literal. MySQL also treats `\`
/// as an escape character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escapes {
    #[default]
    Standard,
    Backslash
}

impl Escapes {
    /// Escape convention under which the literals of `text` close.
    ///
    /// Standard escaping wins unless it leaves a quote open and backslash
    /// escaping does not.
    pub fn detect(text: &str) -> Self {
        if unclosed_quote(text, Self::Standard).is_some()
            && unclosed_quote(text, Self::Backslash).is_none()
        {
            Self::Backslash
        } else {
            Self::Standard
        }
    }
}

fn unclosed_quote(text: &str, escapes: Escapes) -> Option<Quote> {
    let mut tracker = QuoteTracker::new(escapes);
    for c in text.chars() {
        tracker.feed(c);
    }
    tracker.quote
}

/// Tracks whether the scanner is inside a quoted run.
#[derive(Debug, Default)]
struct QuoteTracker {
    quote:   Option<Quote>,
    escapes: Escapes,
    escaped: bool
}

impl QuoteTracker {
    fn new(escapes: Escapes) -> Self {
        Self {
            escapes,
            ..Default::default()
        }
    }

    /// Feed one character; returns `true` when the character belongs to a
    /// quoted run (including its delimiters).
    fn feed(&mut self, c: char) -> bool {
        match self.quote {
            Some(q) => {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\'
                    && self.escapes == Escapes::Backslash
                    && q != Quote::Backtick
                {
                    self.escaped = true;
                } else if c == q.as_char() {
                    self.quote = None;
                }
                true
            }
            None => match Quote::opening(c) {
                Some(q) => {
                    self.quote = Some(q);
                    true
                }
                None => false
            }
        }
    }
}

/// Split `text` on `delimiter` at parenthesis depth zero.
///
/// Delimiters inside parentheses or quotes never split. Segments are
/// trimmed and empty trailing segments are dropped. A stray `)` does not
/// drive the depth below zero; an unclosed `(` swallows the rest of the
/// input into the last segment.
///
/// ```
/// use sql_review::schema::splitter::split;
///
/// assert_eq!(split("a, b(1,2), c", ','), vec!["a", "b(1,2)", "c"]);
/// ```
pub fn split(text: &str, delimiter: char) -> Vec<String> {
    let mut segments = Vec::new();
    let mut tracker = QuoteTracker::new(Escapes::detect(text));
    let mut depth: u32 = 0;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if tracker.feed(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if c == delimiter && depth == 0 => {
                segments.push(text[start..idx].trim().to_string());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    segments.push(text[start..].trim().to_string());
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

/// Find the `)` balancing the `(` at byte offset `open_at`.
///
/// Returns `(open_at, close)` byte offsets, or `None` when `open_at` is not
/// an opening parenthesis or the span never closes. Literals are read with
/// standard escaping first and with backslash escapes when that fails.
pub fn find_balanced_span(text: &str, open_at: usize) -> Option<(usize, usize)> {
    if text.as_bytes().get(open_at) != Some(&b'(') {
        return None;
    }
    balanced_span(text, open_at, Escapes::Standard)
        .or_else(|| balanced_span(text, open_at, Escapes::Backslash))
}

fn balanced_span(text: &str, open_at: usize, escapes: Escapes) -> Option<(usize, usize)> {
    let mut tracker = QuoteTracker::new(escapes);
    let mut depth: u32 = 0;
    for (idx, c) in text[open_at..].char_indices() {
        if tracker.feed(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open_at, open_at + idx));
                }
            }
            _ => {}
        }
    }
    None
}

/// Replace the content of single-quoted string literals with spaces.
///
/// Quote characters stay in place and byte offsets are preserved, so
/// matches found in the masked text can be mapped back to the original.
pub fn mask_quoted(text: &str) -> String {
    let backslash = Escapes::detect(text) == Escapes::Backslash;
    let mut out = String::with_capacity(text.len());
    let mut inside = false;
    let mut escaped = false;
    for c in text.chars() {
        if inside {
            if escaped {
                escaped = false;
            } else if backslash && c == '\\' {
                escaped = true;
            } else if c == '\'' {
                inside = false;
                out.push(c);
                continue;
            }
            push_blank(&mut out, c);
        } else {
            if c == '\'' {
                inside = true;
            }
            out.push(c);
        }
    }
    out
}

/// Blank out `--`, `/* */` and line-leading `#` comments.
///
/// Newlines survive so line numbers stay valid; other comment characters
/// become spaces of the same byte width.
pub fn strip_comments(text: &str) -> String {
    strip_comments_with(text, false)
}

/// Like [`strip_comments`]; with `hash_anywhere` every `#` outside quotes
/// opens a comment, as in MySQL.
pub fn strip_comments_with(text: &str, hash_anywhere: bool) -> String {
    let standard = strip_comments_in(text, Escapes::Standard, hash_anywhere);
    if unclosed_quote(&standard, Escapes::Standard).is_none() {
        return standard;
    }
    let backslash = strip_comments_in(text, Escapes::Backslash, hash_anywhere);
    if unclosed_quote(&backslash, Escapes::Backslash).is_none() {
        backslash
    } else {
        standard
    }
}

fn strip_comments_in(text: &str, escapes: Escapes, hash_anywhere: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut tracker = QuoteTracker::new(escapes);
    let mut chars = text.chars().peekable();
    let mut line_start = true;
    while let Some(c) = chars.next() {
        if tracker.feed(c) {
            out.push(c);
            line_start = false;
            continue;
        }
        let next = chars.peek().copied();
        if (c == '-' && next == Some('-')) || (c == '#' && (line_start || hash_anywhere)) {
            push_blank(&mut out, c);
            while let Some(&n) = chars.peek() {
                if n == '\n' {
                    break;
                }
                push_blank(&mut out, n);
                chars.next();
            }
            continue;
        }
        if c == '/' && next == Some('*') {
            push_blank(&mut out, c);
            chars.next();
            out.push(' ');
            let mut prev = '\0';
            for n in chars.by_ref() {
                if n == '\n' {
                    out.push('\n');
                } else {
                    push_blank(&mut out, n);
                }
                if prev == '*' && n == '/' {
                    break;
                }
                prev = n;
            }
            continue;
        }
        out.push(c);
        if c == '\n' {
            line_start = true;
        } else if !c.is_whitespace() {
            line_start = false;
        }
    }
    out
}

/// A statement located inside a larger document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementSpan<'a> {
    /// Byte offset of the first non-blank character
    pub offset: usize,
    /// Statement text without the terminating `;`, trimmed
    pub text:   &'a str
}

/// Split a comment-free document into statements on `;` outside quotes.
///
/// Parentheses are ignored on purpose: an unbalanced statement must not
/// swallow the statements that follow it.
pub fn split_statements(text: &str) -> Vec<StatementSpan<'_>> {
    let mut spans = Vec::new();
    let mut tracker = QuoteTracker::new(Escapes::detect(text));
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if tracker.feed(c) {
            continue;
        }
        if c == ';' {
            push_statement(text, start, idx, &mut spans);
            start = idx + 1;
        }
    }
    push_statement(text, start, text.len(), &mut spans);
    spans
}

fn push_statement<'a>(text: &'a str, start: usize, end: usize, spans: &mut Vec<StatementSpan<'a>>) {
    let raw = &text[start..end];
    let trimmed = raw.trim_start();
    let offset = start + (raw.len() - trimmed.len());
    let trimmed = trimmed.trim_end();
    if !trimmed.is_empty() {
        spans.push(StatementSpan {
            offset,
            text: trimmed
        });
    }
}

/// Structural balance of a text fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    /// `(` count minus `)` count outside quotes
    pub depth:          i32,
    /// Lowest depth reached; negative means a `)` closed nothing
    pub min_depth:      i32,
    /// Quote left open at end of input
    pub unclosed_quote: Option<Quote>
}

impl Balance {
    pub fn is_balanced(&self) -> bool {
        self.depth == 0 && self.min_depth == 0 && self.unclosed_quote.is_none()
    }
}

/// Count parentheses and quotes of `text`.
pub fn balance(text: &str) -> Balance {
    let mut tracker = QuoteTracker::new(Escapes::detect(text));
    let mut result = Balance::default();
    for c in text.chars() {
        if tracker.feed(c) {
            continue;
        }
        match c {
            '(' => result.depth += 1,
            ')' => {
                result.depth -= 1;
                result.min_depth = result.min_depth.min(result.depth);
            }
            _ => {}
        }
    }
    result.unclosed_quote = tracker.quote;
    result
}

/// 1-based line number of byte `offset` in `text`.
pub fn line_at(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

fn push_blank(out: &mut String, c: char) {
    for _ in 0..c.len_utf8() {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_parens() {
        assert_eq!(split("a, b(1,2), c", ','), vec!["a", "b(1,2)", "c"]);
    }

    #[test]
    fn test_split_respects_quotes() {
        let parts = split("note VARCHAR(10) DEFAULT 'a,b', id INT", ',');
        assert_eq!(parts, vec!["note VARCHAR(10) DEFAULT 'a,b'", "id INT"]);
    }

    #[test]
    fn test_split_drops_trailing_empty_segments() {
        assert_eq!(split("a, b,  ,", ','), vec!["a", "b"]);
        assert!(split("   ", ',').is_empty());
    }

    #[test]
    fn test_split_keeps_inner_empty_segment() {
        assert_eq!(split("a,,b", ','), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_unbalanced_keeps_last_segment() {
        assert_eq!(split("a, b(1, 2", ','), vec!["a", "b(1, 2"]);
    }

    #[test]
    fn test_split_stray_close_paren() {
        assert_eq!(split("a), b", ','), vec!["a)", "b"]);
    }

    #[test]
    fn test_split_custom_delimiter() {
        assert_eq!(split("x;y(1;2);z", ';'), vec!["x", "y(1;2)", "z"]);
    }

    #[test]
    fn test_find_balanced_span_nested() {
        let text = "CREATE TABLE t (a DECIMAL(10,2), b INT) ENGINE=InnoDB";
        let open = text.find('(').unwrap();
        let (start, end) = find_balanced_span(text, open).unwrap();
        assert_eq!(&text[start + 1..end], "a DECIMAL(10,2), b INT");
    }

    #[test]
    fn test_find_balanced_span_ignores_quoted_paren() {
        let text = "(a VARCHAR(5) DEFAULT ')', b INT)";
        let (_, end) = find_balanced_span(text, 0).unwrap();
        assert_eq!(end, text.len() - 1);
    }

    #[test]
    fn test_find_balanced_span_unclosed() {
        assert_eq!(find_balanced_span("(a INT, b INT", 0), None);
        assert_eq!(find_balanced_span("a INT", 0), None);
    }

    #[test]
    fn test_mask_quoted_preserves_offsets() {
        let text = "WHERE name = 'DROP TABLE' AND x = 1";
        let masked = mask_quoted(text);
        assert_eq!(masked.len(), text.len());
        assert!(!masked.contains("DROP"));
        assert!(masked.contains("AND x = 1"));
    }

    #[test]
    fn test_mask_quoted_multibyte() {
        let text = "SET a = 'héllo' WHERE";
        let masked = mask_quoted(text);
        assert_eq!(masked.len(), text.len());
        assert!(masked.ends_with("' WHERE"));
    }

    #[test]
    fn test_strip_comments_line_and_block() {
        let text = "SELECT 1; -- DROP TABLE x\n/* DELETE\nFROM y; */ SELECT 2;";
        let stripped = strip_comments(text);
        assert_eq!(stripped.len(), text.len());
        assert!(!stripped.contains("DROP"));
        assert!(!stripped.contains("DELETE"));
        assert_eq!(stripped.lines().count(), 3);
        assert!(stripped.contains("SELECT 2;"));
    }

    #[test]
    fn test_strip_comments_keeps_quoted_dashes() {
        let text = "SELECT '--not a comment' FROM t";
        assert_eq!(strip_comments(text), text);
    }

    #[test]
    fn test_strip_comments_hash_only_at_line_start() {
        let text = "# mysql comment\nSELECT * FROM #temp";
        let stripped = strip_comments(text);
        assert!(!stripped.contains("mysql"));
        assert!(stripped.contains("#temp"));
    }

    #[test]
    fn test_strip_comments_hash_anywhere() {
        let text = "SELECT 1 # it's a note\nSELECT '#' FROM t";
        let stripped = strip_comments_with(text, true);
        assert!(!stripped.contains("note"));
        assert!(stripped.contains("SELECT '#' FROM t"));
        assert!(strip_comments(text).contains("note"));
    }

    #[test]
    fn test_backslash_is_literal_by_default() {
        let text = "(id INT, path TEXT DEFAULT 'C:\\', size INT)";
        let (_, end) = find_balanced_span(text, 0).unwrap();
        assert_eq!(end, text.len() - 1);
        assert_eq!(split(&text[1..end], ',').len(), 3);
        assert!(balance("SELECT 'C:\\' FROM t").is_balanced());
        assert_eq!(Escapes::detect("'C:\\'"), Escapes::Standard);
    }

    #[test]
    fn test_backslash_escapes_when_needed() {
        let text = "(note TEXT DEFAULT 'it\\'s', id INT)";
        let (_, end) = find_balanced_span(text, 0).unwrap();
        assert_eq!(end, text.len() - 1);
        assert_eq!(Escapes::detect("'it\\'s'"), Escapes::Backslash);
        assert!(balance("SELECT 'it\\'s' FROM t").is_balanced());
        assert_eq!(mask_quoted("x = 'it\\'s' AND y"), "x = '     ' AND y");
    }

    #[test]
    fn test_doubled_quote() {
        assert!(balance("SELECT 'it''s' FROM t").is_balanced());
        assert_eq!(split("a DEFAULT 'x,''y', b", ',').len(), 2);
    }

    #[test]
    fn test_split_statements_offsets() {
        let text = "SELECT 1;\n  SELECT ';' ;\n\n;";
        let spans = split_statements(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "SELECT 1");
        assert_eq!(spans[1].text, "SELECT ';'");
        assert_eq!(line_at(text, spans[1].offset), 2);
    }

    #[test]
    fn test_balance() {
        assert!(balance("f(a, (b))").is_balanced());
        assert_eq!(balance("f((a)").depth, 1);
        assert_eq!(balance("a)(").min_depth, -1);
        assert_eq!(balance("x = 'open").unclosed_quote, Some(Quote::Single));
    }
}
