#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub statements: Vec<String>,
    pub remainder: String,
    pub in_string: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Normal,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

/// Splits a stream of input text into semicolon-terminated statements,
/// tracking quotes and `--`/`/* */` comments so a `;` inside either is not
/// mistaken for a statement terminator.
pub fn split_statements(input: &str) -> SplitResult {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = ParserState::Normal;
    let mut statement_start = 0;
    let mut iter = input.char_indices().peekable();

    while let Some((idx, ch)) = iter.next() {
        match state {
            ParserState::Normal => match ch {
                '\'' => {
                    current.push(ch);
                    state = ParserState::SingleQuote;
                }
                '"' => {
                    current.push(ch);
                    state = ParserState::DoubleQuote;
                }
                '-' => {
                    if let Some((_, next)) = iter.peek()
                        && *next == '-'
                    {
                        iter.next();
                        state = ParserState::LineComment;
                        continue;
                    }
                    current.push(ch);
                }
                '/' => {
                    if let Some((_, next)) = iter.peek()
                        && *next == '*'
                    {
                        iter.next();
                        state = ParserState::BlockComment;
                        continue;
                    }
                    current.push(ch);
                }
                ';' => {
                    let statement = current.trim();
                    if !statement.is_empty() {
                        statements.push(statement.to_string());
                    }
                    current.clear();
                    statement_start = idx + ch.len_utf8();
                }
                _ => current.push(ch),
            },
            ParserState::SingleQuote => {
                if ch == '\'' {
                    if let Some((_, next)) = iter.peek()
                        && *next == '\''
                    {
                        current.push(ch);
                        current.push(*next);
                        iter.next();
                        continue;
                    }
                    current.push(ch);
                    state = ParserState::Normal;
                } else {
                    current.push(ch);
                }
            }
            ParserState::DoubleQuote => {
                if ch == '"' {
                    if let Some((_, next)) = iter.peek()
                        && *next == '"'
                    {
                        current.push(ch);
                        current.push(*next);
                        iter.next();
                        continue;
                    }
                    current.push(ch);
                    state = ParserState::Normal;
                } else {
                    current.push(ch);
                }
            }
            ParserState::LineComment => {
                if ch == '\n' {
                    current.push(ch);
                    state = ParserState::Normal;
                }
            }
            ParserState::BlockComment => {
                if ch == '*'
                    && let Some((_, next)) = iter.peek()
                    && *next == '/'
                {
                    iter.next();
                    push_space_if_needed(&mut current);
                    state = ParserState::Normal;
                }
            }
        }
    }

    let remainder_raw = &input[statement_start..];
    let final_state = if state == ParserState::LineComment {
        ParserState::Normal
    } else {
        state
    };
    let needs_remainder = !current.trim().is_empty()
        || matches!(
            final_state,
            ParserState::SingleQuote | ParserState::DoubleQuote | ParserState::BlockComment
        );
    let remainder = if !needs_remainder {
        String::new()
    } else if final_state == ParserState::BlockComment {
        remainder_raw.to_string()
    } else {
        current.to_string()
    };

    SplitResult {
        statements,
        remainder,
        in_string: matches!(
            final_state,
            ParserState::SingleQuote | ParserState::DoubleQuote | ParserState::BlockComment
        ),
    }
}

fn push_space_if_needed(current: &mut String) {
    let needs_space = current
        .chars()
        .last()
        .map(|ch| !ch.is_whitespace())
        .unwrap_or(false);
    if needs_space {
        current.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_multiple_statements() {
        let result = split_statements("CREATE DATABASE d; USE d;");
        assert_eq!(result.statements, vec!["CREATE DATABASE d", "USE d"]);
        assert!(result.remainder.is_empty());
    }

    #[test]
    fn ignores_semicolons_in_strings() {
        let result = split_statements("INSERT t VALUES (\"a; b\");");
        assert_eq!(result.statements, vec!["INSERT t VALUES (\"a; b\")"]);
        assert!(result.remainder.is_empty());
    }

    #[test]
    fn keeps_incomplete_statement() {
        let result = split_statements("SELECT * FROM t");
        assert!(result.statements.is_empty());
        assert_eq!(result.remainder, "SELECT * FROM t");
        assert!(!result.in_string);
    }

    #[test]
    fn tracks_open_string() {
        let result = split_statements("INSERT t VALUES (\"unterminated");
        assert!(result.statements.is_empty());
        assert!(result.in_string);
    }

    #[test]
    fn line_comment_after_statement() {
        let result = split_statements("EXIT; -- comment;");
        assert_eq!(result.statements, vec!["EXIT"]);
        assert!(result.remainder.is_empty());
    }

    #[test]
    fn block_comment_with_semicolon() {
        let result = split_statements("SHOW TABLES /* comment; */; EXIT;");
        assert_eq!(result.statements, vec!["SHOW TABLES", "EXIT"]);
        assert!(result.remainder.is_empty());
    }
}
