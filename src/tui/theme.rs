//! Theme module
//!
//! One palette for every widget, exposed as semantic styles.

use super::style::Style;
use crossterm::style::Color;

/// Theme colors
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Regular text
    pub fg: Color,
    /// Interactive elements, cursor, spinner
    pub accent: Color,
    /// Success marks
    pub success: Color,
    /// Warnings and empty-state notices
    pub warning: Color,
    /// Errors and failure marks
    pub error: Color,
    /// Hints and de-emphasized text
    pub hint: Color,
    /// Table and panel borders
    pub border: Color,
    /// Banner text
    pub banner: Color,
    /// Tree branch labels and table cells
    pub label: Color,
    /// Tree leaves
    pub leaf: Color,
}

impl Default for Theme {
    fn default() -> Self {
        THEME
    }
}

impl Theme {
    /// Plain text
    pub fn normal(&self) -> Style {
        Style::new().fg(self.fg)
    }

    /// Prompt and title text
    pub fn title(&self) -> Style {
        Style::new().fg(self.fg).bold()
    }

    /// Row under the cursor
    pub fn cursor(&self) -> Style {
        Style::new().fg(self.accent).bold()
    }

    /// Spinner glyph and progress bar fill
    pub fn progress(&self) -> Style {
        Style::new().fg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::new().fg(self.border)
    }

    pub fn hint(&self) -> Style {
        Style::new().fg(self.hint).dim()
    }

    pub fn success(&self) -> Style {
        Style::new().fg(self.success).bold()
    }

    pub fn warning(&self) -> Style {
        Style::new().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::new().fg(self.error).bold()
    }

    pub fn banner(&self) -> Style {
        Style::new().fg(self.banner).bold()
    }

    pub fn label(&self) -> Style {
        Style::new().fg(self.label)
    }

    pub fn leaf(&self) -> Style {
        Style::new().fg(self.leaf)
    }
}

/// Global theme instance
pub static THEME: Theme = Theme {
    fg: Color::White,
    accent: Color::Cyan,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
    hint: Color::Grey,
    border: Color::DarkGrey,
    banner: Color::Magenta,
    label: Color::Cyan,
    leaf: Color::Green,
};

/// Global theme reference
pub fn theme() -> &'static Theme {
    &THEME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_styles_have_expected_colors() {
        assert_eq!(theme().success().fg, Some(Color::Green));
        assert_eq!(theme().warning().fg, Some(Color::Yellow));
        assert_eq!(theme().error().fg, Some(Color::Red));
        assert_eq!(theme().banner().fg, Some(Color::Magenta));
    }

    #[test]
    fn status_marks_are_bold() {
        assert!(theme().success().bold);
        assert!(theme().error().bold);
        assert!(theme().hint().dim);
    }
}
