//! CLI styling utilities
//!
//! Provides semantic styling via the [`Stylize`] trait with automatic
//! terminal color support detection (delegated to `owo-colors`).
//!
//! Everything decorated goes to stderr; stdout only ever carries the bare
//! pull request URL, so styles detect color support against stderr.
//!
//! | Method       | Color  | Semantic Use                      |
//! |--------------|--------|-----------------------------------|
//! | `.accent()`  | Cyan   | Branches, PR numbers              |
//! | `.error()`   | Red    | Failures, error messages          |
//! | `.warn()`    | Yellow | Retries, metadata failures        |
//! | `.muted()`   | Dim    | Phases, dry-run notes             |

use std::fmt::{self, Display};
use std::sync::OnceLock;

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream, Style};

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const ERROR: Style = Style::new().red();
const WARN: Style = Style::new().yellow();
const MUTED: Style = Style::new().dimmed();

/// A value with semantic styling applied.
///
/// Color support detection is handled by `owo-colors` (respects `NO_COLOR`,
/// `CLICOLOR`, `CLICOLOR_FORCE`, and TTY detection).
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
}

impl<T> Styled<T> {
    const fn new(value: T, style: Style) -> Self {
        Self { value, style }
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(Stream::Stderr, |v| v.style(self.style))
        )
    }
}

/// Extension trait for semantic terminal styling.
pub trait Stylize: Display {
    /// Cyan, for branches and PR numbers
    fn accent(&self) -> Styled<&Self> {
        Styled::new(self, ACCENT)
    }

    /// Red, for failures
    fn error(&self) -> Styled<&Self> {
        Styled::new(self, ERROR)
    }

    /// Yellow, for things that need attention
    fn warn(&self) -> Styled<&Self> {
        Styled::new(self, WARN)
    }

    /// Dim, for secondary information
    fn muted(&self) -> Styled<&Self> {
        Styled::new(self, MUTED)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Success checkmark
pub const CHECK: &str = "✓";

/// Error/failure cross
pub const CROSS: &str = "✗";

/// Arrow for steps/actions
pub const ARROW: &str = "→";

/// Green checkmark for success states.
#[inline]
pub const fn check() -> Styled<&'static str> {
    Styled::new(CHECK, SUCCESS)
}

/// Red cross for error/failure states.
#[inline]
pub const fn cross() -> Styled<&'static str> {
    Styled::new(CROSS, ERROR)
}

/// Cyan arrow for action steps.
#[inline]
pub const fn arrow() -> Styled<&'static str> {
    Styled::new(ARROW, ACCENT)
}

/// Clickable OSC 8 hyperlink showing the URL itself, for stderr.
///
/// Falls back to plain URL text in terminals that don't support hyperlinks.
pub fn hyperlink_url(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stderr) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}

/// Default spinner style - cyan dots.
///
/// Template validated once on first call via `OnceLock`.
pub fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("hardcoded spinner template is valid")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        })
        .clone()
}
