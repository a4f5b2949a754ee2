pub mod command;

use std::path::PathBuf;

use crate::{
    core::{lookup::Strategy, symbols::SymbolTable},
    prelude::{Config, FdResult},
};
use rustyline::error::ReadlineError;

use self::command::default_actions;

pub type InteractiveCallback<'a> = dyn FnMut(&str) -> FdResult<()> + 'a;

pub fn default_interactive_callback(s: &str) -> FdResult<()> {
    print!("{}", s);
    Ok(())
}

/// State shared by all commands of one interactive session
pub struct Session {
    pub table: SymbolTable,
    pub map: PathBuf,
    pub strategy: Strategy,
}

pub fn command_line(cfg: &Config, table: SymbolTable, map: PathBuf) -> FdResult<()> {
    let mut rl = rustyline::DefaultEditor::new()
        .map_err(|err| anyhow::anyhow!("Unable to init interactive mode: {}", err))?;
    let mut session = Session {
        table,
        map,
        strategy: cfg.strategy,
    };
    let readline = || -> rustyline::Result<String> {
        let line = rl.readline(">> ")?;
        rl.add_history_entry(line.as_str())?;
        Ok(line)
    };
    run_session(readline, &mut session, &mut default_interactive_callback)
}

/// Evaluates lines until quit, Ctrl-C or Ctrl-D.
/// Command errors are reported and the session goes on; input errors end it.
pub fn run_session(
    mut readline: impl FnMut() -> rustyline::Result<String>,
    session: &mut Session,
    f: &mut InteractiveCallback,
) -> FdResult<()> {
    let actions = default_actions();
    loop {
        match readline() {
            Ok(line) => {
                let result = actions
                    .eval(&line)
                    .and_then(|cmd| cmd.execute(&mut *f, &mut *session, &actions));
                match result {
                    Ok(true) => {}
                    Ok(false) => return Ok(()),
                    Err(err) => eprintln!("{}", err),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(err) => return Err(anyhow::anyhow!("Readline error: {}", err).into()),
        }
    }
}
