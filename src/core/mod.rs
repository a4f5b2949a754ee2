pub mod config;
pub mod error;
pub mod lookup;
pub mod report;
pub mod symbols;

pub type Address = u64;
