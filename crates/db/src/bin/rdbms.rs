use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use db::engine::Engine;
use db::repl::{run_repl, run_script};

/// Interactive SQL-flavored database engine (spec §1/§6).
#[derive(Parser, Debug)]
#[command(name = "rdbms", about = "Single-process SQL-flavored database engine")]
struct Args {
    /// Path to the persisted catalog snapshot (spec §4.5).
    #[arg(long, value_name = "PATH", default_value = "dbms_state.ser")]
    db: PathBuf,

    /// Run every command in this file before dropping to the interactive
    /// prompt, as though it had been passed to `INPUT` (spec §4.4).
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut engine = Engine::new(args.db.clone());

    if let Some(script_path) = &args.script {
        let contents = std::fs::read_to_string(script_path)
            .with_context(|| format!("read script file {}", script_path.display()))?;
        if let Some(code) = run_script(&mut engine, &contents)? {
            std::process::exit(code);
        }
    }

    let code = run_repl(&mut engine)?;
    std::process::exit(code);
}
