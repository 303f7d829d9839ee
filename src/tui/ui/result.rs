//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::PredictionResponse;
use crate::tui::styles::MedicalTheme;

/// Render the prediction result
///
/// `submitting` carries the spinner frame while a new request is in flight.
pub fn render_result(f: &mut Frame, area: Rect, response: &PredictionResponse, submitting: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    render_result_content(f, chunks[1], response);
    render_result_footer(f, chunks[2], submitting);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Prediction Result", MedicalTheme::title()),
        Span::styled(" │ Breast Tumor Classification", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_result_content(f: &mut Frame, area: Rect, response: &PredictionResponse) {
    let block = Block::default()
        .title(Span::styled(" Diagnosis ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Diagnosis + confidence
            Constraint::Length(2), // Risk tier
            Constraint::Length(3), // Probability
            Constraint::Min(0),    // Advisory
        ])
        .margin(1)
        .split(inner);

    let tier = response.risk_tier();
    let risk_style = MedicalTheme::risk_tier(tier);

    let diagnosis = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {} ", response.prediction),
            MedicalTheme::diagnosis(response.prediction),
        )),
        Line::from(""),
        Line::from(Span::styled(response.confidence_label(), MedicalTheme::text())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(diagnosis, chunks[0]);

    let risk = Paragraph::new(Line::from(Span::styled(
        tier.label(),
        risk_style.add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(risk, chunks[1]);

    let percent = (response.probability * 100.0).round().clamp(0.0, 100.0) as u16;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Malignancy Probability ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(risk_style)
        .percent(percent)
        .label(format!("{:.1}%", response.probability * 100.0));
    f.render_widget(gauge, chunks[2]);

    let advisory_style = if response.prediction.is_malignant() {
        MedicalTheme::danger()
    } else {
        MedicalTheme::success()
    };
    let advisory = Paragraph::new(Line::from(Span::styled(
        response.prediction.advisory(),
        advisory_style,
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(advisory, chunks[3]);
}

fn render_result_footer(f: &mut Frame, area: Rect, submitting: Option<&str>) {
    let mut spans = vec![
        Span::styled("[D] ", MedicalTheme::key_hint()),
        Span::styled("Detailed Analysis ", MedicalTheme::key_desc()),
        Span::styled("[N] ", MedicalTheme::key_hint()),
        Span::styled("New Prediction ", MedicalTheme::key_desc()),
    ];
    match submitting {
        Some(spinner) => spans.extend([
            Span::styled("[Ctrl+S] Resubmit ", MedicalTheme::disabled()),
            Span::styled(format!("{spinner} Analyzing... "), MedicalTheme::info()),
        ]),
        None => spans.extend([
            Span::styled("[Ctrl+S] ", MedicalTheme::key_hint()),
            Span::styled("Resubmit ", MedicalTheme::key_desc()),
        ]),
    }
    spans.extend([
        Span::styled("[Ctrl+Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);
    let content = Line::from(spans);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
