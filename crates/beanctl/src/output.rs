//! Output formatting - ASCII-only terminal output
//!
//! Colors are applied only when the painter is enabled, so the same render
//! functions serve terminals, pipes and tests.

use bean_common::{ColorMode, RiskLevel, Severity};
use owo_colors::OwoColorize;

/// Horizontal rule between report entries
pub const THIN_SEPARATOR: &str = "----------------------------------------";

/// Width of the confidence bar, in characters
const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Resolve a color mode against the current stdout
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Always => Self::new(true),
            ColorMode::Never => Self::new(false),
            ColorMode::Auto => Self::new(console::colors_enabled()),
        }
    }

    pub fn is_color(&self) -> bool {
        self.color
    }

    /// Section header, e.g. `[POTENTIAL PESTS]`
    pub fn section(&self, title: &str) -> String {
        let text = format!("[{}]", title);
        if self.color {
            text.bold().to_string()
        } else {
            text
        }
    }

    pub fn name(&self, text: &str) -> String {
        if self.color {
            text.bright_cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Low green, Moderate yellow, High red
    pub fn risk(&self, risk: RiskLevel) -> String {
        let text = risk.as_str();
        if !self.color {
            return text.to_string();
        }
        match risk {
            RiskLevel::Low => text.green().to_string(),
            RiskLevel::Moderate => text.yellow().to_string(),
            RiskLevel::High => text.red().to_string(),
        }
    }

    pub fn severity(&self, severity: Severity) -> String {
        let text = severity.as_str();
        if !self.color {
            return text.to_string();
        }
        match severity {
            Severity::Low => text.green().to_string(),
            Severity::Moderate => text.yellow().to_string(),
            Severity::High => text.bright_red().to_string(),
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Textual progress bar for a 0-100 confidence, e.g. `[#####...............]`
pub fn confidence_bar(confidence: f64) -> String {
    let clamped = confidence.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bar() {
        assert_eq!(confidence_bar(0.0), format!("[{}]", ".".repeat(20)));
        assert_eq!(confidence_bar(100.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(confidence_bar(75.0), format!("[{}{}]", "#".repeat(15), ".".repeat(5)));
        assert_eq!(confidence_bar(250.0), confidence_bar(100.0));
    }

    #[test]
    fn test_plain_painter_adds_no_escapes() {
        let painter = Painter::plain();
        assert_eq!(painter.risk(RiskLevel::High), "High");
        assert_eq!(painter.section("PESTS"), "[PESTS]");
        assert!(!painter.is_color());
        assert_eq!(painter.error("[ERROR]"), "[ERROR]");
    }

    #[test]
    fn test_color_painter_adds_escapes() {
        let painter = Painter::new(true);
        let high = painter.risk(RiskLevel::High);
        assert!(high.contains("High"));
        assert!(high.contains('\u{1b}'));
        assert!(painter.error("[ERROR]").contains('\u{1b}'));
    }

    #[test]
    fn test_for_mode_forced() {
        assert!(Painter::for_mode(ColorMode::Always).is_color());
        assert!(!Painter::for_mode(ColorMode::Never).is_color());
    }
}
