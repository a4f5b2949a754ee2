use std::fmt::Display;

#[cfg(feature = "cli")]
use clap::ValueEnum;
use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    error::Error,
    symbols::{Symbol, SymbolTable},
    Address,
};

/// How a target address is attributed to a symbol
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, PartialEq, Eq, Copy, Clone, Debug)]
pub enum Strategy {
    /// The highest address not above the target.
    /// Ties go to the first symbol in file order.
    #[default]
    Nearest,
    /// Legacy scan: the last symbol in file order at or below the target,
    /// frozen once an exact hit is seen. A target of 0 never matches.
    /// Unlike the legacy scan, which used the name `Unknown` as its
    /// not-found marker, a symbol named `Unknown` is reported as a hit.
    LastMatch,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Nearest => write!(f, "nearest"),
            Strategy::LastMatch => write!(f, "last-match"),
        }
    }
}

impl TryFrom<&str> for Strategy {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "nearest" => Ok(Self::Nearest),
            "last-match" => Ok(Self::LastMatch),
            _ => Err(Error::UnknownStrategy(value.into())),
        }
    }
}

/// The symbol a target was attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    pub symbol: &'a Symbol,
    pub offset: Address,
}

/// Outcome of one query. `hit` is `None` when no symbol precedes the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup<'a> {
    pub target: Address,
    pub hit: Option<Hit<'a>>,
}

impl<'a> Lookup<'a> {
    pub fn is_found(&self) -> bool {
        self.hit.is_some()
    }
}

impl SymbolTable {
    pub fn lookup(&self, target: Address, strategy: Strategy) -> Lookup<'_> {
        let symbol = match strategy {
            Strategy::Nearest => self.nearest(target),
            Strategy::LastMatch => self.last_match(target),
        };
        Lookup {
            target,
            hit: symbol.map(|symbol| Hit {
                symbol,
                offset: target - symbol.address(),
            }),
        }
    }

    fn nearest(&self, target: Address) -> Option<&Symbol> {
        self.iter()
            .filter(|s| s.address() <= target)
            .fold(None, |best: Option<&Symbol>, s| match best {
                Some(b) if b.address() >= s.address() => Some(b),
                _ => Some(s),
            })
    }

    fn last_match(&self, target: Address) -> Option<&Symbol> {
        let mut best = None;
        let mut best_address: Address = 0;
        for s in self.iter() {
            // compares the target, not the candidate, against the running best
            if s.address() <= target && target > best_address {
                trace!("{} at 0x{:x} replaces best", s.name(), s.address());
                best_address = s.address();
                best = Some(s);
            }
        }
        best
    }
}
