use std::fs;

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::engine::{Engine, EngineOutcome};
use crate::history::resolve_history_path;
use crate::printer::print_output;
use crate::sql::split_statements;

const PRIMARY_PROMPT: &str = "db> ";
const CONTINUATION_PROMPT: &str = "  -> ";

/// Runs the interactive line-editing loop: read lines until a full
/// `;`-terminated statement accumulates (spec §6: "a command may span
/// multiple input lines"), dispatch each to the engine, print its output.
/// Returns the process exit code `EXIT` decided on (spec §6: 0 normally,
/// nonzero when the snapshot could not be written).
pub fn run_repl(engine: &mut Engine) -> Result<i32> {
    let history_path = resolve_history_path();
    if let Some(parent) = history_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("create history directory")?;
    }

    let mut editor = DefaultEditor::new().context("initialize line editor")?;
    let _ = editor.load_history(&history_path);

    let mut buffer = String::new();
    let mut exit_code = 0;

    loop {
        let prompt = if buffer.trim().is_empty() {
            PRIMARY_PROMPT
        } else {
            CONTINUATION_PROMPT
        };
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        if buffer.is_empty() && line.trim().is_empty() {
            continue;
        }

        buffer.push_str(&line);
        buffer.push('\n');

        let input = buffer.clone();
        let split = split_statements(&buffer);
        let mut should_exit = false;

        for statement in split.statements {
            match engine.execute(&statement) {
                EngineOutcome::Output(output) => print_output(&output),
                EngineOutcome::Exit { snapshot_saved } => {
                    println!("Goodbye.");
                    exit_code = if snapshot_saved { 0 } else { 1 };
                    should_exit = true;
                    break;
                }
            }
        }

        if should_exit {
            let _ = editor.save_history(&history_path);
            return Ok(exit_code);
        }

        if split.remainder.is_empty() && !split.in_string {
            if !input.trim().is_empty() {
                let _ = editor.add_history_entry(input.trim());
            }
            buffer.clear();
        } else {
            buffer = split.remainder;
        }
    }

    let _ = editor.save_history(&history_path);
    Ok(exit_code)
}

/// Runs every non-empty line of `script` through the engine in order,
/// stopping early if `EXIT` is encountered (spec §4.4's `INPUT` semantics,
/// reused here to let a `--script` flag seed a session before dropping to
/// the interactive prompt).
pub fn run_script(engine: &mut Engine, script: &str) -> Result<Option<i32>> {
    let split = split_statements(script);
    for statement in split.statements {
        match engine.execute(&statement) {
            EngineOutcome::Output(output) => print_output(&output),
            EngineOutcome::Exit { snapshot_saved } => {
                println!("Goodbye.");
                return Ok(Some(if snapshot_saved { 0 } else { 1 }));
            }
        }
    }
    Ok(None)
}
