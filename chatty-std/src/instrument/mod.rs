//! Observability wrappers for strategies.

mod logging;
mod span;

pub use logging::LoggingStrategy;
pub use span::TracingStrategy;
