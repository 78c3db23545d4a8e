//! Final message construction.

use chatty_core::{Component, MESSAGE_PLACEHOLDER, PLAYER_PLACEHOLDER, RichContext};

/// Builds the rendered chat line from a rich context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentRenderer;

impl ComponentRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Substitute the first `{player}` with the sender's name and the first
    /// `{message}` with the message body.
    ///
    /// The template is scanned once; substituted text is never rescanned.
    pub fn construct(&self, context: &RichContext) -> Component {
        let player = Component::text(context.sender.name.as_str());
        context
            .format
            .substitute_first(&[
                (PLAYER_PLACEHOLDER, &player),
                (MESSAGE_PLACEHOLDER, &context.message),
            ])
            .compact()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{legacy::LegacySerializer, testing::rich_context};
    use chatty_core::{NamedColor, Span, Style};

    #[test]
    fn substitutes_player_and_message() {
        let context = rich_context("Steve", "{player}: {message}", "hi");
        let rendered = ComponentRenderer::new().construct(&context);
        assert_eq!(rendered.plain_text(), "Steve: hi");
    }

    #[test]
    fn message_is_not_resubstituted() {
        let context = rich_context("Steve", "{player}: {message}", "I am {player}");
        let rendered = ComponentRenderer::new().construct(&context);
        assert_eq!(rendered.plain_text(), "Steve: I am {player}");
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let context = rich_context("Steve", "{player} {player} {message}", "hi");
        let rendered = ComponentRenderer::new().construct(&context);
        assert_eq!(rendered.plain_text(), "Steve {player} hi");
    }

    #[test]
    fn output_is_compacted_and_styled() {
        let mut context = rich_context("Steve", "", "hi");
        context.format = LegacySerializer::ampersand().deserialize("&7{player}&7: &f{message}");
        let rendered = ComponentRenderer::new().construct(&context);

        assert_eq!(
            rendered.spans(),
            &[
                Span::new("Steve: ", Style::color(NamedColor::Gray)),
                Span::new("hi", Style::color(NamedColor::White)),
            ]
        );
    }
}
