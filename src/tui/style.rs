//! Styled cells: the atomic units of a frame.

use crossterm::style::Color;

/// Text attributes applied to a run of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    /// Unstyled text.
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            dim: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    pub fn patch(self, other: Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            bold: self.bold || other.bold,
            dim: self.dim || other.dim,
        }
    }
}

/// Glyph stored in the trailing column of a double-width character.
pub(crate) const CONTINUATION: char = '\0';

/// One character position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    /// Whitespace with no style.
    pub const fn blank() -> Self {
        Self::new(' ', Style::new())
    }

    /// Placeholder for the second column of a wide glyph.
    pub(crate) const fn continuation(style: Style) -> Self {
        Self::new(CONTINUATION, style)
    }

    /// Whether this cell is covered by the wide glyph to its left.
    pub fn is_continuation(&self) -> bool {
        self.ch == CONTINUATION
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}
