use std::fmt;

use storage::Value;

/// What a command produces for the REPL/batch runner to show the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A `SELECT`/`LET`-style projected result set: tab-separated header,
    /// one `N.`-prefixed row per tuple (spec §4.4/§6), or `Nothing found.`
    /// when empty.
    Rows {
        headers: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    /// Free-form human-readable text for `SHOW`/`DESCRIBE` (one line each).
    Lines(Vec<String>),
    /// A single status or diagnostic line.
    Message(String),
}

impl Output {
    pub fn message(text: impl Into<String>) -> Self {
        Output::Message(text.into())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Rows { headers, rows } => {
                writeln!(f, "{}", headers.join("\t"))?;
                if rows.is_empty() {
                    write!(f, "Nothing found.")
                } else {
                    let lines: Vec<String> = rows
                        .iter()
                        .enumerate()
                        .map(|(idx, row)| {
                            let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                            format!("{}. {}", idx + 1, values.join("\t"))
                        })
                        .collect();
                    write!(f, "{}", lines.join("\n"))
                }
            }
            Output::Lines(lines) => write!(f, "{}", lines.join("\n")),
            Output::Message(message) => write!(f, "{}", message),
        }
    }
}

pub fn print_output(output: &Output) {
    println!("{}", output);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ordered_rows() {
        let output = Output::Rows {
            headers: vec!["id".to_string(), "n".to_string()],
            rows: vec![
                vec![Value::Integer(1), Value::Text("a".into())],
                vec![Value::Integer(2), Value::Text("b".into())],
            ],
        };
        let text = output.to_string();
        assert!(text.starts_with("id\tn\n1. 1\ta\n2. 2\tb"));
    }

    #[test]
    fn empty_rows_print_nothing_found() {
        let output = Output::Rows {
            headers: vec!["id".to_string()],
            rows: vec![],
        };
        assert_eq!(output.to_string(), "id\nNothing found.");
    }
}
