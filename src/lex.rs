//! Line Lexer: splits one physical Smali line into an EOL comment and a
//! sequence of whitespace-separated fields, without ever failing — semantic
//! errors surface later, in the statement parser.

/// Strip a single trailing `\r`, `\n`, or `\r\n` from a physical line.
pub fn strip_newline(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}

/// Split off a trailing EOL comment: the greatest-match of
/// `\s*(?:#.*)?$`. When the line contains a `#`, the comment starts at the
/// first `#` (scanning left to right, without regard to quoting — this is a
/// faithful quirk of the format, not a bug) together with any whitespace
/// immediately preceding it. When there is no `#`, only trailing whitespace
/// (if any) is split off, leaving an empty comment.
pub fn split_eol_comment(line: &str) -> (&str, &str) {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    if let Some(hash_pos) = chars.iter().position(|(_, c)| *c == '#') {
        let mut start = hash_pos;
        while start > 0 && chars[start - 1].1.is_whitespace() {
            start -= 1;
        }
        let split_at = chars.get(start).map_or(line.len(), |(b, _)| *b);
        return (&line[..split_at], &line[split_at..]);
    }
    let trimmed = line.trim_end_matches(char::is_whitespace);
    (trimmed, &line[trimmed.len()..])
}

/// Find the byte index of the first occurrence of `target` that is not
/// inside a balanced, backslash-escaped double-quoted string.
pub fn find_top_level(s: &str, target: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, c) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        if c == '"' {
            in_quotes = true;
        } else if c == target {
            return Some(idx);
        }
    }
    None
}

/// Split a line body on runs of the space character, treating a balanced
/// double-quoted (backslash-escaped) span as non-separating.
pub fn split_fields(s: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for c in s.chars() {
        if in_quotes {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        if c == '"' {
            in_quotes = true;
            current.push(c);
        } else if c == ' ' {
            if !current.is_empty() {
                fields.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        fields.push(current);
    }
    fields
}

/// A one-item-lookahead cursor over a line's fields.
#[derive(Debug, Clone)]
pub struct FieldCursor {
    fields: std::collections::VecDeque<String>,
}

impl FieldCursor {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields: fields.into(),
        }
    }

    /// Consume and return the next field.
    pub fn next(&mut self) -> Option<String> {
        self.fields.pop_front()
    }

    /// Look at the next field without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.fields.front().map(String::as_str)
    }

    /// True once every field has been consumed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
