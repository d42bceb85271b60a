//! Terminal styling for draftpress output
//!
//! | Method        | Color  | Used for                              |
//! |---------------|--------|---------------------------------------|
//! | `.accent()`   | Cyan   | paths, branch names, PR numbers       |
//! | `.success()`  | Green  | completed stages                      |
//! | `.error()`    | Red    | failures (stderr)                     |
//! | `.warn()`     | Yellow | missing or malformed config (stderr)  |
//! | `.muted()`    | Dim    | SHAs, hints                           |
//! | `.emphasis()` | Bold   | section headers                       |
//!
//! Color detection (`NO_COLOR`, `CLICOLOR_FORCE`, TTY) is left to
//! `owo-colors`.

use draftpress::site::ConfigFile;
use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Style};
use std::fmt::{self, Display};
use std::sync::OnceLock;

pub use owo_colors::Stream;

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const ERROR: Style = Style::new().red();
const WARN: Style = Style::new().yellow();
const MUTED: Style = Style::new().dimmed();
const EMPHASIS: Style = Style::new().bold();

/// A value rendered with a style when the target stream supports color
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, style: Style, stream: Stream) -> Self {
        Self {
            value,
            style,
            stream,
        }
    }

    /// Detect color support on stderr instead
    #[must_use]
    pub const fn for_stderr(mut self) -> Self {
        self.stream = Stream::Stderr;
        self
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |v| v.style(self.style))
        )
    }
}

/// Semantic styles for any [`Display`] value
pub trait Stylize: Display {
    /// Cyan
    fn accent(&self) -> Styled<&Self> {
        Styled::new(self, ACCENT, Stream::Stdout)
    }

    /// Green
    fn success(&self) -> Styled<&Self> {
        Styled::new(self, SUCCESS, Stream::Stdout)
    }

    /// Red, for stderr
    fn error(&self) -> Styled<&Self> {
        Styled::new(self, ERROR, Stream::Stderr)
    }

    /// Yellow, for stderr
    fn warn(&self) -> Styled<&Self> {
        Styled::new(self, WARN, Stream::Stderr)
    }

    /// Dim
    fn muted(&self) -> Styled<&Self> {
        Styled::new(self, MUTED, Stream::Stdout)
    }

    /// Bold
    fn emphasis(&self) -> Styled<&Self> {
        Styled::new(self, EMPHASIS, Stream::Stdout)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Success checkmark
pub const CHECK: &str = "✓";
/// Failure cross
pub const CROSS: &str = "✗";
/// List bullet
pub const BULLET: &str = "○";

/// Green checkmark
pub const fn check() -> Styled<&'static str> {
    Styled::new(CHECK, SUCCESS, Stream::Stdout)
}

/// Red cross on stderr
pub const fn cross() -> Styled<&'static str> {
    Styled::new(CROSS, ERROR, Stream::Stderr)
}

/// Dim bullet
pub const fn bullet() -> Styled<&'static str> {
    Styled::new(BULLET, MUTED, Stream::Stdout)
}

/// `"s"` unless `n == 1`
pub const fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// First seven characters of a SHA
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// `#12` in the accent color
pub fn pr_label(number: u64) -> Styled<String> {
    Styled::new(format!("#{number}"), ACCENT, Stream::Stdout)
}

/// Status column for a config file
pub fn config_badge(file: &ConfigFile) -> String {
    match file {
        ConfigFile::Parsed { .. } => check().to_string(),
        ConfigFile::Malformed { .. } => Styled::new("malformed", WARN, Stream::Stdout).to_string(),
        ConfigFile::Absent => Styled::new("missing", MUTED, Stream::Stdout).to_string(),
    }
}

const fn to_hyperlink_stream(stream: Stream) -> supports_hyperlinks::Stream {
    match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    }
}

/// OSC 8 link showing the URL, or the bare URL where unsupported
pub fn hyperlink_url(stream: Stream, url: &str) -> String {
    if supports_hyperlinks::on(to_hyperlink_stream(stream)) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}

/// Cyan dot spinner
pub fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        })
        .clone()
}
