use thiserror::Error;

use storage::{Domain, is_valid_identifier};

/// Errors raised while turning one semicolon-delimited statement into a
/// [`Command`]. Every variant's message is the diagnostic line printed for
/// that rejection (spec §7: "syntax error ... reported, command skipped").
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("{0}")]
    Syntax(String),
}

fn syntax(message: impl Into<String>) -> CommandError {
    CommandError::Syntax(message.into())
}

/// A literal as it appears in `VALUES (...)` or `SET col = ...`, already
/// lifted out of its textual form.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i32),
    Float(f64),
    Text(String),
}

impl Literal {
    /// Recovers the literal's raw textual form, for re-parsing against the
    /// target attribute's declared domain rather than this literal's own
    /// lexical shape (spec §3: domain-aware parsing, not syntax-driven).
    pub fn raw_text(&self) -> String {
        match self {
            Literal::Integer(n) => n.to_string(),
            Literal::Float(n) => n.to_string(),
            Literal::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDef {
    pub name: String,
    pub domain: Domain,
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DescribeTarget {
    Table(String),
    All,
}

/// A parsed `SELECT colList FROM tableList (WHERE condition)?` body. The
/// condition is kept as raw source text — it is parsed by `query` against
/// whichever schema (single-table or combined join schema) the executor
/// resolves at execution time.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub columns: Vec<String>,
    pub tables: Vec<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateDatabase(String),
    Use(String),
    CreateTable {
        name: String,
        attributes: Vec<AttributeDef>,
    },
    Describe(DescribeTarget),
    Insert {
        table: String,
        values: Vec<Literal>,
    },
    Update {
        table: String,
        assignments: Vec<(String, Literal)>,
        condition: Option<String>,
    },
    Delete {
        table: String,
        condition: Option<String>,
    },
    Select(SelectStatement),
    Let {
        table: String,
        key: String,
        select: SelectStatement,
    },
    Rename {
        table: String,
        names: Vec<String>,
    },
    ShowDatabases,
    ShowTables,
    ShowRecords(String),
    Input {
        file: String,
        output: Option<String>,
    },
    Exit,
}

const MAX_INSERT_TEXT_LEN: usize = 30;

/// Parses one already-semicolon-delimited statement into a [`Command`].
pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let chars: Vec<char> = input.trim().chars().collect();
    if chars.is_empty() {
        return Err(syntax("empty command"));
    }
    let mut cursor = Cursor::new(&chars);
    let keyword = cursor.take_word().ok_or_else(|| syntax("expected a command keyword"))?;
    let rest = cursor.remainder();

    match keyword.to_ascii_uppercase().as_str() {
        "CREATE" => parse_create(rest),
        "USE" => {
            let mut cursor = Cursor::new(rest);
            let name = cursor
                .take_word()
                .ok_or_else(|| syntax("expected a database name after USE"))?;
            cursor.expect_eof()?;
            Ok(Command::Use(name))
        }
        "DESCRIBE" => parse_describe(rest),
        "INSERT" => parse_insert(rest),
        "UPDATE" => parse_update(rest),
        "DELETE" => parse_delete(rest),
        "SELECT" => Ok(Command::Select(parse_select_body(rest)?)),
        "LET" => parse_let(rest),
        "RENAME" => parse_rename(rest),
        "SHOW" => parse_show(rest),
        "INPUT" => parse_input(rest),
        "EXIT" => {
            let mut cursor = Cursor::new(rest);
            cursor.expect_eof()?;
            Ok(Command::Exit)
        }
        other => Err(syntax(format!("unknown command '{}'", other))),
    }
}

fn parse_create(rest: &[char]) -> Result<Command, CommandError> {
    let mut cursor = Cursor::new(rest);
    let kind = cursor
        .take_word()
        .ok_or_else(|| syntax("expected DATABASE or TABLE after CREATE"))?;
    match kind.to_ascii_uppercase().as_str() {
        "DATABASE" => {
            let name = cursor
                .take_word()
                .ok_or_else(|| syntax("expected a database name"))?;
            cursor.expect_eof()?;
            require_identifier(&name)?;
            Ok(Command::CreateDatabase(name))
        }
        "TABLE" => {
            let name = cursor
                .take_word()
                .ok_or_else(|| syntax("expected a table name"))?;
            require_identifier(&name)?;
            cursor.expect_char('(')?;
            let mut attributes = Vec::new();
            loop {
                let attr_name = cursor
                    .take_word()
                    .ok_or_else(|| syntax("expected an attribute name"))?;
                require_identifier(&attr_name)?;
                let domain_word = cursor
                    .take_word()
                    .ok_or_else(|| syntax("expected an attribute domain"))?;
                let domain = Domain::from_keyword(&domain_word)
                    .ok_or_else(|| syntax(format!("unknown domain '{}'", domain_word)))?;
                let mut primary_key = false;
                if let Some(peeked) = cursor.peek_word() {
                    if peeked.eq_ignore_ascii_case("PRIMARY") {
                        cursor.take_word();
                        let key_word = cursor
                            .take_word()
                            .ok_or_else(|| syntax("expected KEY after PRIMARY"))?;
                        if !key_word.eq_ignore_ascii_case("KEY") {
                            return Err(syntax("expected KEY after PRIMARY"));
                        }
                        primary_key = true;
                    }
                }
                attributes.push(AttributeDef {
                    name: attr_name,
                    domain,
                    primary_key,
                });
                if cursor.try_char(',') {
                    continue;
                }
                break;
            }
            cursor.expect_char(')')?;
            cursor.expect_eof()?;
            Ok(Command::CreateTable { name, attributes })
        }
        other => Err(syntax(format!("expected DATABASE or TABLE, found '{}'", other))),
    }
}

fn parse_describe(rest: &[char]) -> Result<Command, CommandError> {
    let mut cursor = Cursor::new(rest);
    let word = cursor
        .take_word()
        .ok_or_else(|| syntax("expected a table name or ALL after DESCRIBE"))?;
    cursor.expect_eof()?;
    if word.eq_ignore_ascii_case("ALL") {
        Ok(Command::Describe(DescribeTarget::All))
    } else {
        Ok(Command::Describe(DescribeTarget::Table(word)))
    }
}

fn parse_insert(rest: &[char]) -> Result<Command, CommandError> {
    let mut cursor = Cursor::new(rest);
    let table = cursor
        .take_word()
        .ok_or_else(|| syntax("expected a table name after INSERT"))?;
    if table.eq_ignore_ascii_case("INTO") {
        return Err(syntax(
            "'INSERT INTO' is not supported; use 'INSERT <table> VALUES (...)'",
        ));
    }
    let values_word = cursor
        .take_word()
        .ok_or_else(|| syntax("expected VALUES after the table name"))?;
    if !values_word.eq_ignore_ascii_case("VALUES") {
        return Err(syntax(format!("expected VALUES, found '{}'", values_word)));
    }
    cursor.expect_char('(')?;
    let mut values = Vec::new();
    loop {
        values.push(cursor.take_literal(MAX_INSERT_TEXT_LEN)?);
        if cursor.try_char(',') {
            continue;
        }
        break;
    }
    cursor.expect_char(')')?;
    cursor.expect_eof()?;
    Ok(Command::Insert { table, values })
}

fn parse_update(rest: &[char]) -> Result<Command, CommandError> {
    let mut head = Cursor::new(rest);
    let table = head
        .take_word()
        .ok_or_else(|| syntax("expected a table name after UPDATE"))?;
    let set_word = head
        .take_word()
        .ok_or_else(|| syntax("expected SET after the table name"))?;
    if !set_word.eq_ignore_ascii_case("SET") {
        return Err(syntax(format!("expected SET, found '{}'", set_word)));
    }
    let tail = head.remainder();
    let (assignment_chars, condition) = split_where(tail);

    let mut cursor = Cursor::new(assignment_chars);
    let mut assignments = Vec::new();
    loop {
        let column = cursor
            .take_word()
            .ok_or_else(|| syntax("expected a column name in SET clause"))?;
        cursor.expect_char('=')?;
        let literal = cursor.take_literal(MAX_INSERT_TEXT_LEN)?;
        assignments.push((column, literal));
        if cursor.try_char(',') {
            continue;
        }
        break;
    }
    cursor.expect_eof()?;

    Ok(Command::Update {
        table,
        assignments,
        condition,
    })
}

fn parse_delete(rest: &[char]) -> Result<Command, CommandError> {
    let (head, condition) = split_where(rest);
    let mut cursor = Cursor::new(head);
    let table = cursor
        .take_word()
        .ok_or_else(|| syntax("expected a table name after DELETE"))?;
    cursor.expect_eof()?;
    Ok(Command::Delete { table, condition })
}

fn parse_select_body(rest: &[char]) -> Result<SelectStatement, CommandError> {
    let from_pos = find_top_level_keyword(rest, "FROM")
        .ok_or_else(|| syntax("expected FROM in SELECT"))?;
    let columns_text = &rest[..from_pos];
    let after_from = &rest[from_pos + 4..];
    let (tables_text, condition) = split_where(after_from);

    let columns = split_top_level_commas(columns_text)
        .into_iter()
        .map(|word_chars| {
            let text = collect_trim(word_chars);
            if text.is_empty() {
                Err(syntax("expected a column name"))
            } else {
                Ok(text)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if columns.is_empty() {
        return Err(syntax("expected at least one column in SELECT"));
    }

    let tables = split_top_level_commas(tables_text)
        .into_iter()
        .map(|word_chars| {
            let text = collect_trim(word_chars);
            if text.is_empty() {
                Err(syntax("expected a table name"))
            } else {
                Ok(text)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if tables.is_empty() {
        return Err(syntax("expected at least one table in FROM"));
    }

    Ok(SelectStatement {
        columns,
        tables,
        condition,
    })
}

fn parse_let(rest: &[char]) -> Result<Command, CommandError> {
    let mut cursor = Cursor::new(rest);
    let table = cursor
        .take_word()
        .ok_or_else(|| syntax("expected a table name after LET"))?;
    let key_word = cursor
        .take_word()
        .ok_or_else(|| syntax("expected KEY after the table name"))?;
    if !key_word.eq_ignore_ascii_case("KEY") {
        return Err(syntax(format!("expected KEY, found '{}'", key_word)));
    }
    let key = cursor
        .take_word()
        .ok_or_else(|| syntax("expected the key attribute name"))?;

    cursor.skip_ws();
    if !cursor.try_char('<') {
        return Err(syntax("expected '<' before the inner SELECT"));
    }
    let inner = cursor.remainder();
    let last_gt = inner.iter().rposition(|&c| c == '>');
    let Some(last_gt) = last_gt else {
        return Err(syntax("expected a closing '>' after the inner SELECT"));
    };
    let inner_body = &inner[..last_gt];
    let trailing = collect_trim(&inner[last_gt + 1..]);
    if !trailing.is_empty() {
        return Err(syntax(format!("unexpected input after '>': '{}'", trailing)));
    }

    let mut inner_cursor = Cursor::new(inner_body);
    let select_word = inner_cursor
        .take_word()
        .ok_or_else(|| syntax("expected SELECT inside '<...>'"))?;
    if !select_word.eq_ignore_ascii_case("SELECT") {
        return Err(syntax(format!("expected SELECT, found '{}'", select_word)));
    }
    let select = parse_select_body(inner_cursor.remainder())?;

    Ok(Command::Let { table, key, select })
}

fn parse_rename(rest: &[char]) -> Result<Command, CommandError> {
    let mut cursor = Cursor::new(rest);
    let table = cursor
        .take_word()
        .ok_or_else(|| syntax("expected a table name after RENAME"))?;
    cursor.expect_char('(')?;
    let mut names = Vec::new();
    loop {
        let name = cursor
            .take_word()
            .ok_or_else(|| syntax("expected an attribute name"))?;
        require_identifier(&name)?;
        names.push(name);
        if cursor.try_char(',') {
            continue;
        }
        break;
    }
    cursor.expect_char(')')?;
    cursor.expect_eof()?;
    Ok(Command::Rename { table, names })
}

fn parse_show(rest: &[char]) -> Result<Command, CommandError> {
    let mut cursor = Cursor::new(rest);
    let word = cursor
        .take_word()
        .ok_or_else(|| syntax("expected DATABASES, TABLES, or RECORDS after SHOW"))?;
    match word.to_ascii_uppercase().as_str() {
        "DATABASES" => {
            cursor.expect_eof()?;
            Ok(Command::ShowDatabases)
        }
        "TABLES" => {
            cursor.expect_eof()?;
            Ok(Command::ShowTables)
        }
        "RECORDS" => {
            let table = cursor
                .take_word()
                .ok_or_else(|| syntax("expected a table name after RECORDS"))?;
            cursor.expect_eof()?;
            Ok(Command::ShowRecords(table))
        }
        other => Err(syntax(format!(
            "expected DATABASES, TABLES, or RECORDS, found '{}'",
            other
        ))),
    }
}

fn parse_input(rest: &[char]) -> Result<Command, CommandError> {
    let mut cursor = Cursor::new(rest);
    let file = cursor
        .take_path()
        .ok_or_else(|| syntax("expected a filename after INPUT"))?;
    let output = if let Some(word) = cursor.peek_word() {
        if word.eq_ignore_ascii_case("OUTPUT") {
            cursor.take_word();
            Some(
                cursor
                    .take_path()
                    .ok_or_else(|| syntax("expected a filename after OUTPUT"))?,
            )
        } else {
            None
        }
    } else {
        None
    };
    cursor.expect_eof()?;
    Ok(Command::Input { file, output })
}

fn require_identifier(name: &str) -> Result<(), CommandError> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(syntax(format!(
            "'{}' is not a valid identifier (leading letter, up to 19 alphanumeric characters)",
            name
        )))
    }
}

fn collect_trim(chars: &[char]) -> String {
    chars.iter().collect::<String>().trim().to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Splits `chars` on the first top-level `WHERE`, returning the clause text
/// before it and the trimmed condition text after it (or `None` when absent).
fn split_where(chars: &[char]) -> (&[char], Option<String>) {
    match find_top_level_keyword(chars, "WHERE") {
        Some(pos) => (&chars[..pos], Some(collect_trim(&chars[pos + 5..]))),
        None => (chars, None),
    }
}

/// Finds the start index of `keyword` as a standalone word at paren depth 0
/// and outside quoted text — the same depth/quote tracking discipline the
/// statement splitter in [`crate::sql`] uses for `;`.
fn find_top_level_keyword(chars: &[char], keyword: &str) -> Option<usize> {
    let kw: Vec<char> = keyword.chars().collect();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                i += 1;
                continue;
            }
            '(' => {
                depth += 1;
                i += 1;
                continue;
            }
            ')' => {
                depth -= 1;
                i += 1;
                continue;
            }
            _ => {}
        }
        if depth == 0 && i + kw.len() <= chars.len() {
            let matches = chars[i..i + kw.len()]
                .iter()
                .zip(kw.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b));
            let before_ok = i == 0 || !is_word_char(chars[i - 1]);
            let after_ok = i + kw.len() == chars.len() || !is_word_char(chars[i + kw.len()]);
            if matches && before_ok && after_ok {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Splits `chars` on top-level commas (outside quotes/parens).
fn split_top_level_commas(chars: &[char]) -> Vec<&[char]> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
        } else {
            match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => {
                    parts.push(&chars[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        i += 1;
    }
    parts.push(&chars[start..]);
    parts
}

struct Cursor<'a> {
    chars: &'a [char],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(chars: &'a [char]) -> Self {
        Self { chars, pos: 0 }
    }

    fn remainder(&self) -> &'a [char] {
        &self.chars[self.pos..]
    }

    fn skip_ws(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.pos).copied()
    }

    /// Takes a run of letters/digits/underscore/dot starting at the cursor.
    fn take_word(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.chars.len() && is_word_char(self.chars[self.pos]) {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(self.chars[start..self.pos].iter().collect())
        }
    }

    fn peek_word(&mut self) -> Option<String> {
        let saved = self.pos;
        let word = self.take_word();
        self.pos = saved;
        word
    }

    /// Takes a bare path-like token (no whitespace) or a quoted string.
    fn take_path(&mut self) -> Option<String> {
        self.skip_ws();
        if self.peek() == Some('\'') || self.peek() == Some('"') {
            return self.take_quoted().ok();
        }
        let start = self.pos;
        while self.pos < self.chars.len() && !self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(self.chars[start..self.pos].iter().collect())
        }
    }

    fn take_quoted(&mut self) -> Result<String, CommandError> {
        self.skip_ws();
        let quote = self.chars.get(self.pos).copied();
        let Some(quote) = quote.filter(|c| *c == '\'' || *c == '"') else {
            return Err(syntax("expected a quoted string"));
        };
        self.pos += 1;
        let start = self.pos;
        while self.pos < self.chars.len() && self.chars[self.pos] != quote {
            self.pos += 1;
        }
        if self.pos >= self.chars.len() {
            return Err(syntax("unterminated string literal"));
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.pos += 1;
        Ok(text)
    }

    fn expect_char(&mut self, expected: char) -> Result<(), CommandError> {
        self.skip_ws();
        match self.chars.get(self.pos) {
            Some(&c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(&c) => Err(syntax(format!("expected '{}', found '{}'", expected, c))),
            None => Err(syntax(format!("expected '{}', found end of input", expected))),
        }
    }

    fn try_char(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.chars.get(self.pos) == Some(&expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_eof(&mut self) -> Result<(), CommandError> {
        self.skip_ws();
        if self.pos == self.chars.len() {
            Ok(())
        } else {
            let remainder: String = self.chars[self.pos..].iter().collect();
            Err(syntax(format!("unexpected trailing input: '{}'", remainder.trim())))
        }
    }

    fn take_literal(&mut self, max_text_len: usize) -> Result<Literal, CommandError> {
        self.skip_ws();
        match self.chars.get(self.pos) {
            Some('\'') | Some('"') => {
                let text = self.take_quoted()?;
                if text.chars().count() > max_text_len {
                    return Err(syntax(format!(
                        "text literal exceeds maximum length of {} characters",
                        max_text_len
                    )));
                }
                Ok(Literal::Text(text))
            }
            Some(c) if c.is_ascii_digit() || *c == '-' => self.take_number(),
            Some(c) => Err(syntax(format!("expected a literal, found '{}'", c))),
            None => Err(syntax("expected a literal, found end of input")),
        }
    }

    /// Strict numeric grammar: `-?[0-9]+(\.[0-9]{1,2})?`.
    fn take_number(&mut self) -> Result<Literal, CommandError> {
        let start = self.pos;
        if self.chars.get(self.pos) == Some(&'-') {
            self.pos += 1;
        }
        let int_start = self.pos;
        while self.pos < self.chars.len() && self.chars[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos == int_start {
            let text: String = self.chars[start..self.pos].iter().collect();
            return Err(syntax(format!("malformed numeric literal '{}'", text)));
        }
        let mut is_float = false;
        if self.chars.get(self.pos) == Some(&'.') {
            let dot = self.pos;
            self.pos += 1;
            let frac_start = self.pos;
            while self.pos < self.chars.len() && self.chars[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            let frac_len = self.pos - frac_start;
            if frac_len == 0 || frac_len > 2 {
                let text: String = self.chars[start..self.pos].iter().collect();
                return Err(syntax(format!(
                    "malformed numeric literal '{}' (expected 1-2 fractional digits)",
                    text
                )));
            }
            is_float = true;
            let _ = dot;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            text.parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| syntax(format!("malformed numeric literal '{}'", text)))
        } else {
            text.parse::<i32>()
                .map(Literal::Integer)
                .map_err(|_| syntax(format!("integer literal '{}' out of range", text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_database() {
        let cmd = parse_command("CREATE DATABASE shop").unwrap();
        assert_eq!(cmd, Command::CreateDatabase("shop".to_string()));
    }

    #[test]
    fn parses_create_table_with_primary_key() {
        let cmd = parse_command("CREATE TABLE t (id INTEGER PRIMARY KEY, n TEXT)").unwrap();
        match cmd {
            Command::CreateTable { name, attributes } => {
                assert_eq!(name, "t");
                assert_eq!(attributes.len(), 2);
                assert!(attributes[0].primary_key);
                assert!(!attributes[1].primary_key);
            }
            _ => panic!("expected CreateTable"),
        }
    }

    #[test]
    fn rejects_lone_primary_without_key() {
        let err = parse_command("CREATE TABLE t (id INTEGER PRIMARY)").unwrap_err();
        assert!(matches!(err, CommandError::Syntax(msg) if msg.contains("KEY")));
    }

    #[test]
    fn rejects_insert_into() {
        let err = parse_command("INSERT INTO t VALUES (1)").unwrap_err();
        assert!(matches!(err, CommandError::Syntax(_)));
    }

    #[test]
    fn parses_insert_values() {
        let cmd = parse_command("INSERT t VALUES (3, \"c\")").unwrap();
        match cmd {
            Command::Insert { table, values } => {
                assert_eq!(table, "t");
                assert_eq!(values, vec![Literal::Integer(3), Literal::Text("c".to_string())]);
            }
            _ => panic!("expected Insert"),
        }
    }

    #[test]
    fn parses_select_with_where() {
        let cmd = parse_command("SELECT id, n FROM t WHERE id >= 2 AND n != \"c\"").unwrap();
        match cmd {
            Command::Select(select) => {
                assert_eq!(select.columns, vec!["id", "n"]);
                assert_eq!(select.tables, vec!["t"]);
                assert_eq!(select.condition.as_deref(), Some("id >= 2 AND n != \"c\""));
            }
            _ => panic!("expected Select"),
        }
    }

    #[test]
    fn parses_multi_table_select() {
        let cmd = parse_command("SELECT a.x, b.y FROM a, b WHERE a.x < b.y").unwrap();
        match cmd {
            Command::Select(select) => {
                assert_eq!(select.tables, vec!["a", "b"]);
                assert_eq!(select.condition.as_deref(), Some("a.x < b.y"));
            }
            _ => panic!("expected Select"),
        }
    }

    #[test]
    fn parses_delete_without_where() {
        let cmd = parse_command("DELETE t").unwrap();
        assert_eq!(
            cmd,
            Command::Delete {
                table: "t".to_string(),
                condition: None
            }
        );
    }

    #[test]
    fn parses_let_with_angle_brackets() {
        let cmd = parse_command("LET r KEY id <SELECT id, n FROM t WHERE id > 1>").unwrap();
        match cmd {
            Command::Let { table, key, select } => {
                assert_eq!(table, "r");
                assert_eq!(key, "id");
                assert_eq!(select.condition.as_deref(), Some("id > 1"));
            }
            _ => panic!("expected Let"),
        }
    }

    #[test]
    fn rejects_let_without_angle_bracket() {
        let err = parse_command("LET r KEY id SELECT id FROM t").unwrap_err();
        assert!(matches!(err, CommandError::Syntax(msg) if msg.contains('<')));
    }

    #[test]
    fn rejects_three_fractional_digits_literal() {
        let err = parse_command("INSERT t VALUES (1.234)").unwrap_err();
        assert!(matches!(err, CommandError::Syntax(_)));
    }

    #[test]
    fn rejects_overlong_insert_text() {
        let long = "x".repeat(31);
        let stmt = format!("INSERT t VALUES (\"{}\")", long);
        let err = parse_command(&stmt).unwrap_err();
        assert!(matches!(err, CommandError::Syntax(_)));
    }

    #[test]
    fn parses_show_records() {
        let cmd = parse_command("SHOW RECORDS t").unwrap();
        assert_eq!(cmd, Command::ShowRecords("t".to_string()));
    }

    #[test]
    fn literal_raw_text_recovers_unquoted_form() {
        assert_eq!(Literal::Integer(5).raw_text(), "5");
        assert_eq!(Literal::Float(5.0).raw_text(), "5");
        assert_eq!(Literal::Text("x".to_string()).raw_text(), "x");
    }
}
