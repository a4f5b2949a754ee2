use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use lazy_static::lazy_static;
use log::{debug, trace, warn};
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    error::{Error, FdResult},
    Address,
};

lazy_static! {
    /// `0x` followed by 8 to 16 hex digits, whitespace, then an identifier.
    /// Not anchored, the pair may sit anywhere in a map line.
    static ref MAP_LINE: Regex =
        Regex::new(r"0x([0-9a-fA-F]{8,16})\s+([A-Za-z_][A-Za-z0-9_]*)")
            .expect("Invalid map line pattern");
}

/// A named address taken from a linker map
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    address: Address,
    name: String,
}

impl Symbol {
    pub fn new(address: Address, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extracts the first address/name pair in a map line.
    /// Lines without one yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = MAP_LINE.captures(line)?;
        // at most 16 hex digits, always fits
        let address = Address::from_str_radix(&caps[1], 16).ok()?;
        Some(Self::new(address, &caps[2]))
    }
}

/// All symbols of one map file in the order they were encountered.
/// Duplicate addresses are kept as-is.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Reads a map file. Any open or read failure is reported as
    /// [`Error::FileAccess`] and no table is produced.
    pub fn load(path: &Path) -> FdResult<Self> {
        let access = |source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(access)?;
        let table = Self::from_reader(BufReader::new(file)).map_err(access)?;
        debug!("Loaded {} symbols from {}", table.len(), path.display());
        Ok(table)
    }

    /// Reads map lines from `reader`. A lone `\r` also ends a line.
    pub fn from_reader(reader: impl BufRead) -> std::io::Result<Self> {
        let mut symbols = Vec::new();
        let mut seen = HashSet::new();
        let mut number = 0;
        for line in reader.lines() {
            let line = line?;
            for piece in line.split('\r') {
                number += 1;
                match Symbol::parse_line(piece) {
                    Some(sym) => {
                        if !seen.insert(sym.address) {
                            warn!(
                                "Duplicate address 0x{:x} ({}) on line {}",
                                sym.address, sym.name, number
                            );
                        }
                        symbols.push(sym);
                    }
                    None => trace!("Skipping line {}", number),
                }
            }
        }
        Ok(Self { symbols })
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            symbols: lines
                .into_iter()
                .flat_map(|line| line.split('\r'))
                .filter_map(Symbol::parse_line)
                .collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parses a base-16 address with or without a `0x` prefix.
/// `_` may separate digits.
pub fn parse_address(input: &str) -> FdResult<Address> {
    let invalid = || Error::InvalidAddress(input.into());
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty()
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.chars().all(|c| c.is_ascii_hexdigit() || c == '_')
    {
        return Err(invalid());
    }
    // a separator may follow the prefix but not start a bare number
    if digits.len() == trimmed.len() && digits.starts_with('_') {
        return Err(invalid());
    }

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    Address::from_str_radix(&digits, 16).map_err(|_| invalid())
}
