//! Clinical palette for the prediction client.
//!
//! Each risk tier gets its own hue so the badge reads at a glance; the
//! diagnosis badge inverts text on the benign or malignant colour.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{DiagnosisLabel, RiskTier};

/// Palette and preset styles shared by every view.
pub struct MedicalTheme;

impl MedicalTheme {
    /// Borders of the focused panel
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136);
    /// Key hints, headings, the selected row
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191);
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184);

    /// Benign diagnosis, Low Risk
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129);
    /// Moderate Risk, warning alerts
    pub const WARNING: Color = Color::Rgb(251, 191, 36);
    /// Malignant diagnosis, High Risk, invalid fields
    pub const DANGER: Color = Color::Rgb(244, 63, 94);
    /// Critical Risk only
    pub const CRITICAL: Color = Color::Rgb(190, 18, 60);
    /// Importance bars, the in-flight spinner
    pub const INFO: Color = Color::Rgb(59, 130, 246);

    /// Text on the diagnosis badge
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42);
    /// Details modal
    pub const BG_SURFACE: Color = Color::Rgb(30, 41, 59);

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252);
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184);
    /// Range placeholders and the disclaimer
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139);

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Panel titles and section headings
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Label of the measurement being edited
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn modal() -> Style {
        Style::default().bg(Self::BG_SURFACE).fg(Self::TEXT_PRIMARY)
    }

    /// `[Enter]`, `[Esc]` and friends in footers
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Submit control while a request is in flight
    #[must_use]
    pub fn disabled() -> Style {
        Style::default()
            .fg(Self::TEXT_MUTED)
            .add_modifier(Modifier::DIM)
    }

    /// Badge colour for a risk tier; Critical is also bold.
    #[must_use]
    pub fn risk_tier(tier: RiskTier) -> Style {
        match tier {
            RiskTier::Low => Self::success(),
            RiskTier::Moderate => Self::warning(),
            RiskTier::High => Self::danger(),
            RiskTier::Critical => Style::default()
                .fg(Self::CRITICAL)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Inverted badge for the diagnosis label.
    #[must_use]
    pub fn diagnosis(label: DiagnosisLabel) -> Style {
        let color = if label.is_malignant() {
            Self::DANGER
        } else {
            Self::SUCCESS
        };
        Style::default()
            .fg(Self::BG_DARK)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    }
}

/// Braille spinner frames shown while a request is in flight
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tiers_have_distinct_styles() {
        let styles = [RiskTier::Low, RiskTier::Moderate, RiskTier::High, RiskTier::Critical]
            .map(MedicalTheme::risk_tier);
        for (i, a) in styles.iter().enumerate() {
            for b in &styles[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
