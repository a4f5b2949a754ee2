use std::path::PathBuf;

use super::lookup::Strategy;
#[cfg(feature = "cli")]
use clap::{CommandFactory, Parser};
#[cfg(feature = "cli")]
use clap_complete::{generate, Generator, Shell};

/// Where the kernel build leaves its linker map, relative to the tool directory
pub const DEFAULT_MAP_PATH: &str = "../build/kernel/kernel.map";

#[derive(Debug)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(author, version, about, long_about = None))]
pub struct Config {
    // hex addresses to resolve, with or without 0x
    pub addresses: Vec<String>,

    // linker map to read symbols from
    #[cfg_attr(feature = "cli", arg(long, short, default_value = DEFAULT_MAP_PATH))]
    pub map: PathBuf,

    #[cfg_attr(feature = "cli", arg(long, short, default_value_t))]
    pub strategy: Strategy,

    // print the parsed symbol table as ron
    #[cfg(feature = "serde")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub dump: bool,

    #[cfg_attr(feature = "cli", arg(long, short))]
    pub interactive: bool,

    #[cfg_attr(feature = "cli", arg(short, long, action = clap::ArgAction::Count))]
    pub verbose: u8,

    #[cfg_attr(feature = "cli", clap(long, value_name = "SHELL"))]
    #[cfg(feature = "cli")]
    pub completions: Option<Shell>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            map: PathBuf::from(DEFAULT_MAP_PATH),
            strategy: Strategy::default(),
            #[cfg(feature = "serde")]
            dump: false,
            interactive: false,
            verbose: 0,
            #[cfg(feature = "cli")]
            completions: None,
        }
    }
}

impl Config {
    #[cfg(feature = "cli")]
    pub fn new() -> Self {
        Self::parse()
    }

    #[cfg(not(feature = "cli"))]
    pub fn new() -> Self {
        Default::default()
    }

    /// The map path with a leading `~` expanded
    #[cfg(feature = "cli")]
    pub fn map_path(&self) -> PathBuf {
        match self.map.to_str() {
            Some(map) => PathBuf::from(shellexpand::tilde(map).into_owned()),
            None => self.map.clone(),
        }
    }

    #[cfg(not(feature = "cli"))]
    pub fn map_path(&self) -> PathBuf {
        self.map.clone()
    }

    #[cfg(feature = "serde")]
    pub fn dump(&self) -> bool {
        self.dump
    }

    #[cfg(not(feature = "serde"))]
    pub fn dump(&self) -> bool {
        false
    }
}

#[cfg(feature = "cli")]
pub fn generate_completion<G: Generator>(gen: G) {
    generate(
        gen,
        &mut Config::command(),
        Config::command().get_name(),
        &mut std::io::stdout(),
    );
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_should_default_to_build_map() {
        let cfg = Config::default();
        assert_eq!(cfg.map, PathBuf::from(DEFAULT_MAP_PATH));
        assert_eq!(cfg.strategy, Strategy::Nearest);
        assert!(cfg.addresses.is_empty());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn it_should_parse_args() {
        let cfg = Config::parse_from([
            "addr2sym",
            "--map",
            "/tmp/kernel.map",
            "-s",
            "last-match",
            "-vv",
            "0xc0001500",
            "c0002000",
        ]);
        assert_eq!(cfg.map, PathBuf::from("/tmp/kernel.map"));
        assert_eq!(cfg.strategy, Strategy::LastMatch);
        assert_eq!(cfg.verbose, 2);
        assert_eq!(cfg.addresses, vec!["0xc0001500", "c0002000"]);
        assert!(!cfg.interactive);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn it_should_parse_without_address() {
        let cfg = Config::parse_from(["addr2sym"]);
        assert!(cfg.addresses.is_empty());
        assert_eq!(cfg.map, PathBuf::from(DEFAULT_MAP_PATH));
        assert_eq!(cfg.strategy, Strategy::Nearest);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn it_should_keep_absolute_map_path() {
        let cfg = Config {
            map: PathBuf::from("/abs/kernel.map"),
            ..Default::default()
        };
        assert_eq!(cfg.map_path(), PathBuf::from("/abs/kernel.map"));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn it_should_expand_home_in_map_path() {
        let cfg = Config {
            map: PathBuf::from("~/k.map"),
            ..Default::default()
        };
        let home = PathBuf::from(shellexpand::tilde("~").into_owned());
        assert_eq!(cfg.map_path(), home.join("k.map"));
    }

    #[cfg(all(feature = "cli", unix))]
    #[test]
    fn it_should_keep_non_utf8_map_path() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let map = PathBuf::from(OsStr::from_bytes(b"~/k\xff.map"));
        let cfg = Config {
            map: map.clone(),
            ..Default::default()
        };
        assert_eq!(cfg.map_path(), map);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn it_should_build_valid_command() {
        Config::command().debug_assert();
    }
}
