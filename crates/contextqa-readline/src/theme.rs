//! Terminal color palettes.
//!
//! Both themes drive the same screens; only colors and the banner differ.

use colored::{ColoredString, Colorize};
use contextqa_core::config::ThemeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    theme: ThemeName,
}

impl Palette {
    pub fn new(theme: ThemeName) -> Self {
        Self { theme }
    }

    pub fn banner(&self) -> ColoredString {
        match self.theme {
            ThemeName::Crimson => "=== ContextQA ===".bright_red().bold(),
            ThemeName::Ember => "~~~ ContextQA ~~~".truecolor(255, 140, 0).bold(),
        }
    }

    /// Label and color for echoed user turns.
    pub fn user(&self, text: &str) -> ColoredString {
        match self.theme {
            ThemeName::Crimson => text.green(),
            ThemeName::Ember => text.bright_yellow(),
        }
    }

    pub fn assistant_label(&self) -> ColoredString {
        match self.theme {
            ThemeName::Crimson => "[assistant]".bright_red(),
            ThemeName::Ember => "[assistant]".truecolor(255, 140, 0),
        }
    }

    pub fn heading(&self, text: &str) -> ColoredString {
        match self.theme {
            ThemeName::Crimson => text.red().bold().underline(),
            ThemeName::Ember => text.truecolor(255, 170, 60).bold().underline(),
        }
    }

    /// Inline math spans.
    pub fn math(&self, text: &str) -> ColoredString {
        match self.theme {
            ThemeName::Crimson => text.bright_magenta(),
            ThemeName::Ember => text.truecolor(255, 200, 120),
        }
    }

    pub fn link(&self, text: &str) -> ColoredString {
        text.bright_blue().underline()
    }

    pub fn notice(&self, text: &str) -> ColoredString {
        text.bright_black()
    }

    pub fn success(&self, text: &str) -> ColoredString {
        text.bright_green()
    }

    pub fn error(&self, text: &str) -> ColoredString {
        match self.theme {
            ThemeName::Crimson => text.red(),
            ThemeName::Ember => text.bright_red(),
        }
    }
}
