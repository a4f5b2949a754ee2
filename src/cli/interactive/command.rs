use crate::{
    core::{lookup::Strategy, symbols::parse_address, Address},
    prelude::{Error, FdResult},
};

use super::{InteractiveCallback, Session};

pub fn default_actions() -> ActionList {
    ActionList {
        actions: vec![
            Action::new(
                "?",
                vec![Param::with_default("command", "")],
                help_parser,
                "Display help",
            ),
            Action::new("q", vec![], exit_parser, "Quit the program"),
            Action::new(
                "r",
                vec![Param::new("address")],
                resolve_parser,
                "Resolve an address to symbol+offset",
            ),
            Action::new(
                "s",
                vec![Param::new("strategy")],
                strategy_parser,
                "Set the lookup strategy (nearest, last-match)",
            ),
            Action::new("n", vec![], info_parser, "Show the loaded map"),
        ],
    }
}

/// Command syntax:
/// An action name followed by its parameters, split by shell rules.
/// A lone token that is not an action is resolved as an address:
/// r c0001500
/// c0001500
pub struct ActionList {
    actions: Vec<Action>,
}

impl ActionList {
    pub fn eval(&self, input: &str) -> FdResult<Commands> {
        let words = shell_words::split(input).map_err(anyhow::Error::from)?;
        let mut split = words.iter().map(String::as_str);
        let cmd = match split.next() {
            Some(cmd) => cmd,
            None => return Ok(Commands::None),
        };
        let args: Vec<&str> = split.collect();

        match self.actions.iter().find(|x| x.name == cmd) {
            Some(action) => action.eval(&args),
            None if args.is_empty() => parse_address(cmd)
                .map(Commands::Resolve)
                .map_err(|_| Error::UnknownCommand(cmd.into())),
            None => Err(Error::UnknownCommand(cmd.into())),
        }
    }

    fn help(&self, f: &mut InteractiveCallback, cmd: &str) -> FdResult<()> {
        let mut printed = false;
        for action in &self.actions {
            if action.name.starts_with(cmd) {
                printed = true;
                action.help(f)?;
            }
        }
        if printed {
            Ok(())
        } else {
            Err(Error::UnknownCommand(cmd.into()))
        }
    }
}

#[derive(Default)]
pub struct Param {
    name: String,
    default_value: Option<String>,
}

impl Param {
    fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            default_value: None,
        }
    }

    fn with_default(name: &str, default_value: &str) -> Self {
        Self {
            name: name.into(),
            default_value: Some(default_value.into()),
        }
    }
}

type CommandParser = fn(&[&str], &[Param]) -> FdResult<Commands>;

pub struct Action {
    help: String,
    name: String,
    params: Vec<Param>,
    parser: CommandParser,
}

impl Action {
    fn new(name: &str, params: Vec<Param>, parser: CommandParser, help: &str) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            params,
            parser,
        }
    }

    fn eval(&self, args: &[&str]) -> FdResult<Commands> {
        (self.parser)(args, &self.params)
    }

    fn help(&self, f: &mut InteractiveCallback) -> FdResult<()> {
        f(&self.name)?;
        self.params.iter().try_for_each(|x| {
            if let Some(default_value) = &x.default_value {
                f(&format!(" [{}='{}']", x.name, default_value))
            } else {
                f(&format!(" [{}]", x.name))
            }
        })?;
        f(&format!(" {}\n", self.help))?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Commands {
    None,
    Exit,
    Help(String),
    Resolve(Address),
    Strategy(Strategy),
    Info,
}

impl Commands {
    /// Runs the command. Returns false once the session should end.
    pub fn execute(
        &self,
        f: &mut InteractiveCallback,
        session: &mut Session,
        actions: &ActionList,
    ) -> FdResult<bool> {
        match self {
            Commands::None => (),
            Commands::Exit => return Ok(false),
            Commands::Help(cmd) => actions.help(f, cmd)?,
            Commands::Resolve(target) => {
                let lookup = session.table.lookup(*target, session.strategy);
                f(&format!("{}\n", lookup))?;
            }
            Commands::Strategy(strategy) => session.strategy = *strategy,
            Commands::Info => f(&format!(
                "{} symbols from {} ({})\n",
                session.table.len(),
                session.map.display(),
                session.strategy
            ))?,
        }
        Ok(true)
    }
}

/* Command parsers */

fn get_arg_or(args: &[&str], params: &[Param], index: usize) -> FdResult<String> {
    let param = params.get(index).ok_or(Error::InsufficientArguments)?;
    match (args.get(index), &param.default_value) {
        (Some(arg), _) => Ok(arg.to_string()),
        (None, Some(def)) => Ok(def.into()),
        (None, None) => Err(Error::InsufficientArguments),
    }
}

fn has_too_many_args(args: &[&str], params: &[Param]) -> FdResult<()> {
    if args.len() > params.len() {
        Err(Error::TooManyArguments)
    } else {
        Ok(())
    }
}

fn help_parser(args: &[&str], params: &[Param]) -> FdResult<Commands> {
    has_too_many_args(args, params)?;

    let cmd = get_arg_or(args, params, 0)?;

    Ok(Commands::Help(cmd))
}

fn exit_parser(args: &[&str], params: &[Param]) -> FdResult<Commands> {
    has_too_many_args(args, params)?;
    Ok(Commands::Exit)
}

fn resolve_parser(args: &[&str], params: &[Param]) -> FdResult<Commands> {
    has_too_many_args(args, params)?;
    let address = get_arg_or(args, params, 0)?;
    Ok(Commands::Resolve(parse_address(&address)?))
}

fn strategy_parser(args: &[&str], params: &[Param]) -> FdResult<Commands> {
    has_too_many_args(args, params)?;
    let strategy = get_arg_or(args, params, 0)?;
    Ok(Commands::Strategy(Strategy::try_from(strategy.as_str())?))
}

fn info_parser(args: &[&str], params: &[Param]) -> FdResult<Commands> {
    has_too_many_args(args, params)?;
    Ok(Commands::Info)
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;
    use crate::core::symbols::SymbolTable;

    fn session() -> Session {
        Session {
            table: SymbolTable::from_lines(["0x00002000 handler", "0x00001000 kmain"]),
            map: PathBuf::from("kernel.map"),
            strategy: Strategy::Nearest,
        }
    }

    fn exec(input: &str, session: &mut Session) -> FdResult<(bool, String)> {
        let actions = default_actions();
        let mut out = String::new();
        let cmd = actions.eval(input)?;
        let mut f = |s: &str| -> FdResult<()> {
            out.push_str(s);
            Ok(())
        };
        let keep_going = cmd.execute(&mut f, session, &actions)?;
        Ok((keep_going, out))
    }

    #[test]
    fn it_should_eval_commands() {
        let actions = default_actions();
        assert_eq!(actions.eval("").unwrap(), Commands::None);
        assert_eq!(actions.eval("   ").unwrap(), Commands::None);
        assert_eq!(actions.eval("q").unwrap(), Commands::Exit);
        assert_eq!(actions.eval("?").unwrap(), Commands::Help("".into()));
        assert_eq!(actions.eval("? r").unwrap(), Commands::Help("r".into()));
        assert_eq!(
            actions.eval("r 0x1500").unwrap(),
            Commands::Resolve(0x1500)
        );
        assert_eq!(actions.eval("c0001500").unwrap(), Commands::Resolve(0xc000_1500));
        assert_eq!(
            actions.eval("s 'last-match'").unwrap(),
            Commands::Strategy(Strategy::LastMatch)
        );
        assert_eq!(actions.eval("n").unwrap(), Commands::Info);
    }

    #[test]
    fn it_should_reject_bad_commands() {
        let actions = default_actions();
        assert!(matches!(
            actions.eval("frobnicate"),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(
            actions.eval("zz 10"),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(
            actions.eval("r"),
            Err(Error::InsufficientArguments)
        ));
        assert!(matches!(
            actions.eval("q now"),
            Err(Error::TooManyArguments)
        ));
        assert!(matches!(
            actions.eval("r xyz"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            actions.eval("s closest"),
            Err(Error::UnknownStrategy(_))
        ));
        assert!(matches!(actions.eval("r 'unterminated"), Err(Error::Other(_))));
    }

    #[test]
    fn it_should_resolve_and_switch_strategy() {
        let mut session = session();
        assert_eq!(
            exec("r 2500", &mut session).unwrap(),
            (true, "Address 0x2500 is in <handler+0x500>\n".into())
        );
        exec("s last-match", &mut session).unwrap();
        assert_eq!(session.strategy, Strategy::LastMatch);
        assert_eq!(
            exec("2500", &mut session).unwrap(),
            (true, "Address 0x2500 is in <kmain+0x1500>\n".into())
        );
        assert_eq!(
            exec("r 0x10", &mut session).unwrap(),
            (true, "Address 0x10 not found in map.\n".into())
        );
    }

    #[test]
    fn it_should_print_info_and_help() {
        let mut session = session();
        assert_eq!(
            exec("n", &mut session).unwrap(),
            (true, "2 symbols from kernel.map (nearest)\n".into())
        );
        assert_eq!(
            exec("? r", &mut session).unwrap(),
            (true, "r [address] Resolve an address to symbol+offset\n".into())
        );
        let (_, help) = exec("?", &mut session).unwrap();
        assert_eq!(help.lines().count(), 5);
        assert!(matches!(
            exec("? x", &mut session),
            Err(Error::UnknownCommand(_))
        ));
    }

    #[test]
    fn it_should_stop_on_exit() {
        let mut session = session();
        assert_eq!(exec("q", &mut session).unwrap(), (false, String::new()));
    }
}
