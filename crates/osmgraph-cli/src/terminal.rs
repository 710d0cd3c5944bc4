//! Terminal styling helpers.
//!
//! Text output uses a handful of ANSI colors for headings and figures. Color
//! is dropped when the environment asks for it (`NO_COLOR`, `TERM=dumb`), so
//! output piped into other tools stays plain.

/// ANSI escape codes used by the text renderer.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for headings.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details such as coordinates.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for vertex ids.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for distances.
    pub const GREEN: &str = "\x1b[32m";
    /// Orange (256-color) for warnings such as skipped segments.
    pub const ORANGE: &str = "\x1b[38;5;208m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub heading: &'static str,
    pub muted: &'static str,
    pub id: &'static str,
    pub distance: &'static str,
    pub warning: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            heading: colors::WHITE_BOLD,
            muted: colors::GRAY,
            id: colors::CYAN,
            distance: colors::GREEN,
            warning: colors::ORANGE,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            heading: "",
            muted: "",
            id: "",
            distance: "",
            warning: "",
        }
    }

    /// Pick [`ColorPalette::colored`] or [`ColorPalette::plain`] from the
    /// environment.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Honours the `NO_COLOR` convention (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a whole number with thousand separators (commas).
///
/// ```
/// # use osmgraph_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Render a distance in meters with two decimals and grouped thousands,
/// e.g. `1,234.50 m`.
#[must_use]
pub fn format_meters(meters: f64) -> String {
    let rounded = (meters.abs() * 100.0).round();
    let whole = (rounded / 100.0).trunc() as u64;
    let cents = (rounded % 100.0) as u64;
    let sign = if meters < 0.0 && rounded > 0.0 { "-" } else { "" };
    format!("{sign}{}.{cents:02} m", format_with_separators(whole))
}
