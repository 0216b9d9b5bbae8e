use std::fmt;

pub const RESET: &str = "\x1b[0m";
pub const FG_RED: &str = "\x1b[31m";
pub const FG_GREEN: &str = "\x1b[32m";
pub const FG_YELLOW: &str = "\x1b[33m";

/// The four fixed levels a line can be written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Plain,
    #[default]
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Plain,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// Escape sequence opening a colored span. Plain has none.
    pub fn color(self) -> &'static str {
        match self {
            Severity::Plain => "",
            Severity::Info => FG_GREEN,
            Severity::Warning => FG_YELLOW,
            Severity::Error => FG_RED,
        }
    }

    /// Plain output is written as is, every other level closes with a reset.
    pub fn needs_reset(self) -> bool {
        self != Severity::Plain
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Plain => "plain",
            Severity::Info => "log",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
