pub mod interactive;

use crate::{
    core::{
        config::generate_completion,
        error::FdResult,
        symbols::{parse_address, SymbolTable},
    },
    prelude::Config,
};
use log::{debug, info, LevelFilter};
use std::io::prelude::*;

pub const USAGE: &str = "Usage: addr2sym <hex_address>";

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(feature = "log")]
fn init_logger(cfg: &Config) -> FdResult<()> {
    simple_logger::SimpleLogger::new()
        .with_level(level_filter(cfg.verbose))
        .init()
        .map_err(|err| anyhow::anyhow!("Unable to init logger: {}", err))?;
    Ok(())
}

#[cfg(not(feature = "log"))]
fn init_logger(_cfg: &Config) -> FdResult<()> {
    Ok(())
}

pub fn init(cfg: &Config) -> FdResult<()> {
    if let Some(shell) = cfg.completions {
        generate_completion(shell);
        std::process::exit(0);
    }

    init_logger(cfg)?;
    run(cfg, &mut std::io::stdout().lock())
}

/// Resolves every address in `cfg` against the configured map.
/// Report lines go to `output`.
pub fn run(cfg: &Config, output: &mut dyn Write) -> FdResult<()> {
    if cfg.addresses.is_empty() && !cfg.interactive && !cfg.dump() {
        writeln!(output, "{}", USAGE)?;
        return Ok(());
    }

    // reject bad input before touching the map
    let targets = cfg
        .addresses
        .iter()
        .map(|a| parse_address(a))
        .collect::<FdResult<Vec<_>>>()?;

    let path = cfg.map_path();
    let table = SymbolTable::load(&path)?;
    info!(
        "{} symbols from {}, strategy {}",
        table.len(),
        path.display(),
        cfg.strategy
    );

    if cfg.dump() {
        dump_symbols(&table, output)?;
    }

    for target in targets {
        let lookup = table.lookup(target, cfg.strategy);
        debug!("0x{:x} -> {:?}", target, lookup.hit);
        writeln!(output, "{}", lookup)?;
    }
    output.flush()?;

    if cfg.interactive {
        interactive::command_line(cfg, table, path)?;
    }
    Ok(())
}

fn dump_symbols(table: &SymbolTable, output: &mut dyn Write) -> FdResult<()> {
    let data = ron::ser::to_string_pretty(table, ron::ser::PrettyConfig::default())?;
    writeln!(output, "{}", data)?;
    Ok(())
}
