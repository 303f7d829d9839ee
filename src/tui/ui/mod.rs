//! UI module: View components for the TUI.

pub mod details;
pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

/// Severity of a transient alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Danger,
    Warning,
    Info,
}

/// Message shown in the alert region until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Danger,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            message: message.into(),
        }
    }
}

pub fn render_alert(f: &mut Frame, area: Rect, alert: &Alert) {
    let (icon, style) = match alert.kind {
        AlertKind::Danger => ("! ", MedicalTheme::danger()),
        AlertKind::Warning => ("! ", MedicalTheme::warning()),
        AlertKind::Info => ("i ", MedicalTheme::info()),
    };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(icon, style),
        Span::styled(alert.message.as_str(), style),
        Span::styled("  [Esc] ", MedicalTheme::key_hint()),
        Span::styled("Dismiss", MedicalTheme::key_desc()),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(style))
    .wrap(Wrap { trim: true });

    f.render_widget(content, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Predictions are decision support only and do not replace diagnosis by a qualified clinician.",
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Measurements are validated locally; the prediction service has the final say on acceptable input.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// A rectangle of at most `width` x `height`, centered in `area`.
#[must_use]
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
