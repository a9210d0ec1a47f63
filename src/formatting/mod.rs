use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto, // Detect based on terminal
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }

    /// Resolve the mode from NO_COLOR, CLICOLOR and CLICOLOR_FORCE.
    pub fn from_env() -> Self {
        resolve(
            env::var("NO_COLOR").ok().as_deref(),
            env::var("CLICOLOR").ok().as_deref(),
            env::var("CLICOLOR_FORCE").ok().as_deref(),
        )
    }

    /// Make `colored` follow this mode and report whether color is on.
    pub fn apply(&self) -> bool {
        let enabled = self.should_use_color();
        colored::control::set_override(enabled);
        enabled
    }
}

fn resolve(no_color: Option<&str>, clicolor: Option<&str>, force: Option<&str>) -> ColorMode {
    // per no-color.org, any value disables color
    let mut mode = ColorMode::Auto;
    if no_color.is_some() || clicolor == Some("0") {
        mode = ColorMode::Never;
    }
    if force == Some("1") {
        mode = ColorMode::Always;
    }
    mode
}
