//! Rich text model.
//!
//! A [`Component`] is a flat run of styled [`Span`]s. It is deliberately
//! small: enough to express the legacy color and decoration codes game
//! clients understand, and to substitute placeholders inside templates.

use std::fmt;

/// The sixteen named colors of the legacy chat palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    /// All colors, ordered by legacy code `0`..`f`.
    pub const ALL: [NamedColor; 16] = [
        Self::Black,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::DarkAqua,
        Self::DarkRed,
        Self::DarkPurple,
        Self::Gold,
        Self::Gray,
        Self::DarkGray,
        Self::Blue,
        Self::Green,
        Self::Aqua,
        Self::Red,
        Self::LightPurple,
        Self::Yellow,
        Self::White,
    ];

    /// Look up a color by its legacy code character (case-insensitive).
    pub fn from_code(code: char) -> Option<Self> {
        let index = code.to_ascii_lowercase().to_digit(16)?;
        Self::ALL.get(index as usize).copied()
    }

    /// The legacy code character for this color.
    pub fn code(self) -> char {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(15);
        char::from_digit(index as u32, 16).unwrap_or('f')
    }
}

/// Text decorations and color. `None` means "inherit".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub color: Option<NamedColor>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underlined: Option<bool>,
    pub strikethrough: Option<bool>,
    pub obfuscated: Option<bool>,
}

impl Style {
    /// A style that only sets a color.
    pub fn color(color: NamedColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    /// Fill every unset field of `self` from `parent`.
    pub fn merge(self, parent: Style) -> Style {
        Style {
            color: self.color.or(parent.color),
            bold: self.bold.or(parent.bold),
            italic: self.italic.or(parent.italic),
            underlined: self.underlined.or(parent.underlined),
            strikethrough: self.strikethrough.or(parent.strikethrough),
            obfuscated: self.obfuscated.or(parent.obfuscated),
        }
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Rendered rich text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Component {
    spans: Vec<Span>,
}

impl Component {
    /// An empty component.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Unstyled text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::styled(text, Style::default())
    }

    /// Text with a single style.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            spans: vec![Span::new(text, style)],
        }
    }

    /// Build a component from spans, kept as given.
    pub fn from_spans(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Append a span.
    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Append every span of `other`.
    pub fn append(mut self, other: Component) -> Self {
        self.spans.extend(other.spans);
        self
    }

    /// Whether the component renders no text.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    /// Concatenated text with all styling dropped.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Drop empty spans and merge adjacent spans with equal style.
    pub fn compact(self) -> Self {
        let mut spans: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in self.spans {
            if span.text.is_empty() {
                continue;
            }
            match spans.last_mut() {
                Some(last) if last.style == span.style => last.text.push_str(&span.text),
                _ => spans.push(span),
            }
        }
        Self { spans }
    }

    /// Replace the first occurrence of `token` with `replacement`.
    pub fn replace_first(&self, token: &str, replacement: &Component) -> Component {
        self.substitute_first(&[(token, replacement)])
    }

    /// Replace the first occurrence of each token in a single scan.
    ///
    /// Inserted components are never rescanned, so a replacement that
    /// itself contains a token is emitted verbatim. Unset style fields of
    /// an inserted span inherit from the span the token was found in.
    /// Tokens split across differently styled spans are not matched.
    pub fn substitute_first(&self, replacements: &[(&str, &Component)]) -> Component {
        let mut pending: Vec<(&str, &Component)> = replacements
            .iter()
            .copied()
            .filter(|(token, _)| !token.is_empty())
            .collect();
        let mut out = Vec::with_capacity(self.spans.len() + pending.len());

        for span in &self.spans {
            let mut rest = span.text.as_str();
            loop {
                let hit = pending
                    .iter()
                    .enumerate()
                    .filter_map(|(index, (token, _))| rest.find(token).map(|pos| (pos, index)))
                    .min_by_key(|(pos, _)| *pos);
                let Some((pos, index)) = hit else {
                    break;
                };
                let (token, replacement) = pending.remove(index);
                if pos > 0 {
                    out.push(Span::new(&rest[..pos], span.style));
                }
                out.extend(
                    replacement
                        .spans
                        .iter()
                        .map(|inner| Span::new(inner.text.clone(), inner.style.merge(span.style))),
                );
                rest = &rest[pos + token.len()..];
            }
            if !rest.is_empty() {
                out.push(Span::new(rest, span.style));
            }
        }

        Component { spans: out }
    }
}

impl From<&str> for Component {
    fn from(text: &str) -> Self {
        Component::text(text)
    }
}

impl From<String> for Component {
    fn from(text: String) -> Self {
        Component::text(text)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_codes_round_trip() {
        for color in NamedColor::ALL {
            assert_eq!(NamedColor::from_code(color.code()), Some(color));
        }
        assert_eq!(NamedColor::from_code('A'), Some(NamedColor::Green));
        assert_eq!(NamedColor::from_code('z'), None);
    }

    #[test]
    fn compact_merges_equal_styles() {
        let red = Style::color(NamedColor::Red);
        let component = Component::from_spans(vec![
            Span::new("a", red),
            Span::new("", Style::default()),
            Span::new("b", red),
            Span::new("c", Style::default()),
        ])
        .compact();

        assert_eq!(
            component.spans(),
            &[Span::new("ab", red), Span::new("c", Style::default())]
        );
    }

    #[test]
    fn substitution_inherits_enclosing_style() {
        let gray = Style::color(NamedColor::Gray);
        let template = Component::styled("<{player}>", gray);
        let name = Component::text("Steve");

        let out = template.replace_first("{player}", &name).compact();
        assert_eq!(out.spans(), &[Span::new("<Steve>", gray)]);
    }

    #[test]
    fn substitution_only_touches_first_occurrence() {
        let template = Component::text("{x} and {x}");
        let out = template.replace_first("{x}", &Component::text("y"));
        assert_eq!(out.plain_text(), "y and {x}");
    }

    #[test]
    fn substitution_does_not_rescan_inserted_text() {
        let template = Component::text("{a}|{b}");
        let a = Component::text("{b}");
        let b = Component::text("B");
        let out = template.substitute_first(&[("{a}", &a), ("{b}", &b)]);
        assert_eq!(out.plain_text(), "{b}|B");
    }
}
