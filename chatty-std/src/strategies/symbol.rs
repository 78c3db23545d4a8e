//! Trigger symbol stripping.

use chatty_core::{Phase, RawContext, Strategy, TransformResult};

/// Removes the selected chat's trigger symbol from the message.
///
/// `"! hello"` written to a chat with symbol `!` becomes `"hello"`. A message
/// that is empty once the symbol is gone is cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolStrategy;

impl SymbolStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy<RawContext> for SymbolStrategy {
    fn phase(&self) -> Phase {
        Phase::Early
    }

    async fn handle(&self, context: RawContext) -> TransformResult<RawContext> {
        let symbol = context.chat.symbol();
        if symbol.is_empty() {
            return TransformResult::pass(context);
        }
        let Some(stripped) = context.message.strip_prefix(symbol) else {
            return TransformResult::pass(context);
        };

        let stripped = stripped.trim_start().to_owned();
        let cancel = stripped.is_empty();
        let builder = TransformResult::builder(context).with_message(stripped);
        if cancel {
            builder.with_cancelled().build()
        } else {
            builder.build()
        }
    }
}
