//! Built-in transform strategies.

mod caps;
mod prefix;
mod symbol;

pub use caps::{CapsModerationStrategy, uppercase_percent};
pub use prefix::PrefixStrategy;
pub use symbol::SymbolStrategy;
