//! Legacy color-code text codec.
//!
//! Configuration text uses `&` codes (`&aHello`), the host's wire format
//! uses `§` codes. Both follow the same rules:
//!
//! | Code | Effect |
//! |------|--------|
//! | `0`-`9`, `a`-`f` | set color, reset decorations |
//! | `k` | obfuscated |
//! | `l` | bold |
//! | `m` | strikethrough |
//! | `n` | underlined |
//! | `o` | italic |
//! | `r` | reset |
//!
//! Unknown codes are kept as literal text.

use chatty_core::{Component, LegacyEncoder, NamedColor, Span, Style};

/// Code character used in configuration files.
pub const AMPERSAND_CHAR: char = '&';

/// Code character understood by game clients.
pub const SECTION_CHAR: char = '§';

/// Converts between legacy strings and [`Component`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySerializer {
    code: char,
}

impl LegacySerializer {
    pub const fn new(code: char) -> Self {
        Self { code }
    }

    /// `&`-coded text, as written in configuration.
    pub const fn ampersand() -> Self {
        Self::new(AMPERSAND_CHAR)
    }

    /// `§`-coded text, as sent to clients.
    pub const fn section() -> Self {
        Self::new(SECTION_CHAR)
    }

    pub const fn code(&self) -> char {
        self.code
    }

    /// Parse legacy text into a component.
    pub fn deserialize(&self, input: &str) -> Component {
        let mut component = Component::empty();
        let mut style = Style::default();
        let mut text = String::new();
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            if c != self.code {
                text.push(c);
                continue;
            }
            let Some(next) = chars.peek().copied() else {
                text.push(c);
                continue;
            };
            let Some(updated) = apply_code(style, next) else {
                text.push(c);
                continue;
            };
            chars.next();
            if updated != style {
                if !text.is_empty() {
                    component.push(Span::new(std::mem::take(&mut text), style));
                }
                style = updated;
            }
        }
        if !text.is_empty() {
            component.push(Span::new(text, style));
        }

        component
    }

    /// Flatten a component into legacy text.
    pub fn serialize(&self, component: &Component) -> String {
        let mut out = String::new();
        let mut current = Style::default();

        for span in component.spans() {
            if span.text.is_empty() {
                continue;
            }
            if span.style != current {
                if let Some(color) = span.style.color {
                    out.push(self.code);
                    out.push(color.code());
                } else if !current.is_empty() {
                    out.push(self.code);
                    out.push('r');
                }
                for (enabled, code) in decorations(&span.style) {
                    if enabled {
                        out.push(self.code);
                        out.push(code);
                    }
                }
                current = span.style;
            }
            out.push_str(&span.text);
        }

        out
    }
}

impl Default for LegacySerializer {
    fn default() -> Self {
        Self::section()
    }
}

impl LegacyEncoder for LegacySerializer {
    fn encode(&self, component: &Component) -> String {
        self.serialize(component)
    }
}

fn apply_code(style: Style, code: char) -> Option<Style> {
    let code = code.to_ascii_lowercase();
    if let Some(color) = NamedColor::from_code(code) {
        return Some(Style::color(color));
    }
    let mut style = style;
    match code {
        'k' => style.obfuscated = Some(true),
        'l' => style.bold = Some(true),
        'm' => style.strikethrough = Some(true),
        'n' => style.underlined = Some(true),
        'o' => style.italic = Some(true),
        'r' => style = Style::default(),
        _ => return None,
    }
    Some(style)
}

fn decorations(style: &Style) -> [(bool, char); 5] {
    [
        (style.obfuscated == Some(true), 'k'),
        (style.bold == Some(true), 'l'),
        (style.strikethrough == Some(true), 'm'),
        (style.underlined == Some(true), 'n'),
        (style.italic == Some(true), 'o'),
    ]
}
