use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Terminal styles; plain when stdout is not a terminal.
#[derive(Debug, Clone)]
pub struct Theme {
    pub heading: Style,
    pub class: Style,
    pub function: Style,
    pub constructor: Style,
    pub error: Style,
    pub warn: Style,
    pub muted: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if console::Term::stdout().is_term() && console::colors_enabled() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            class: Style::new().magenta().bold(),
            function: Style::new().green(),
            constructor: Style::new().yellow(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            muted: Style::new().bright_black(),
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            class: Style::new(),
            function: Style::new(),
            constructor: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            muted: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
