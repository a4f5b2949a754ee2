pub use crate::core::config::*;
pub use crate::core::error::*;
pub use crate::core::lookup::*;
pub use crate::core::symbols::*;
pub use crate::core::Address;
