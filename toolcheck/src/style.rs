//! Terminal styles.
use std::io::IsTerminal;
use anstyle::AnsiColor;
use anstyle::Color;
use anstyle::Style;

/// Styles.
pub struct Styles {
    /// Section heading style.
    pub heading: Style,
    /// Label style.
    pub label: Style,
    /// Full support style.
    pub full: Style,
    /// Partial support style.
    pub partial: Style,
    /// No support style.
    pub none: Style,
}

impl Styles {

    /// Colored styles when stdout is a terminal, plain otherwise.
    pub fn new() -> Self {
        let dumb = Ok("dumb") == std::env::var("TERM").as_deref();
        let no_color = std::env::var_os("NO_COLOR").is_some();

        if dumb || no_color || !std::io::stdout().is_terminal() {
            Self::plain()
        } else {
            Self::colored()
        }
    }

    /// Styles with ANSI colors.
    pub fn colored() -> Self {
        let color = |c: AnsiColor| Style::new().bold().fg_color(Some(Color::Ansi(c)));

        Self {
            heading: Style::new().bold().underline(),
            label: Style::new().bold(),
            full: color(AnsiColor::Green),
            partial: color(AnsiColor::Yellow),
            none: color(AnsiColor::Red),
        }
    }

    /// Styles without any escape sequences.
    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            label: Style::new(),
            full: Style::new(),
            partial: Style::new(),
            none: Style::new(),
        }
    }
}
