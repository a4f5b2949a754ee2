use std::fmt::Display;

use super::lookup::Lookup;

/// One report line per query, lowercase hex without padding
impl<'a> Display for Lookup<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.hit {
            Some(hit) => write!(
                f,
                "Address 0x{:x} is in <{}+0x{:x}>",
                self.target,
                hit.symbol.name(),
                hit.offset
            ),
            None => write!(f, "Address 0x{:x} not found in map.", self.target),
        }
    }
}
