//! Detailed analysis modal: feature importances and recommendations.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::domain::{display_label, FeatureSchema, PredictionResponse, CLINICAL_RECOMMENDATIONS};
use crate::tui::styles::MedicalTheme;

use super::centered_rect;

const LABEL_WIDTH: usize = 24;
const VALUE_WIDTH: usize = 8;

/// One row of the importance chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceBar {
    pub label: String,
    pub weight: f64,
    /// Filled cells, relative to the largest weight shown
    pub length: usize,
}

impl ImportanceBar {
    /// `40.0%`
    #[must_use]
    pub fn value_label(&self) -> String {
        format!("{:.1}%", self.weight * 100.0)
    }
}

/// Scale ranked importances into bars at most `width` cells long.
#[must_use]
pub fn importance_bars(ranked: &[(&'static str, f64)], width: usize) -> Vec<ImportanceBar> {
    let max = ranked.iter().map(|(_, w)| *w).fold(0.0_f64, f64::max);

    ranked
        .iter()
        .map(|&(name, weight)| {
            let length = if max > 0.0 {
                ((weight / max) * width as f64).round() as usize
            } else {
                0
            };
            ImportanceBar {
                label: display_label(name),
                weight,
                length: length.min(width),
            }
        })
        .collect()
}

/// Render the details modal over `area`.
pub fn render_details(f: &mut Frame, area: Rect, response: &PredictionResponse, schema: &FeatureSchema) {
    let ranked = response.top_importances(schema);
    let height = (ranked.len() + CLINICAL_RECOMMENDATIONS.len() + 10) as u16;
    let popup = centered_rect(area, 80, height);

    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(" Detailed Analysis ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused())
        .style(MedicalTheme::modal());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let bar_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + VALUE_WIDTH + 2);

    let mut lines = vec![
        Line::from(Span::styled("Feature Importance Analysis", MedicalTheme::subtitle())),
        Line::from(Span::styled(
            "These are the features that most influenced the prediction:",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
    ];

    lines.extend(importance_bars(&ranked, bar_width).into_iter().map(|bar| {
        Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$} ", bar.label), MedicalTheme::text()),
            Span::styled("█".repeat(bar.length), MedicalTheme::info()),
            Span::raw(" ".repeat(bar_width - bar.length + 1)),
            Span::styled(format!("{:>VALUE_WIDTH$}", bar.value_label()), MedicalTheme::text_secondary()),
        ])
    }));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Clinical Recommendations", MedicalTheme::subtitle())));
    lines.extend(
        CLINICAL_RECOMMENDATIONS
            .iter()
            .map(|item| Line::from(vec![Span::styled("• ", MedicalTheme::focused()), Span::raw(*item)])),
    );

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Close", MedicalTheme::key_desc()),
    ]));
    f.render_widget(footer, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiagnosisLabel;
    use crate::tui::ui::tests::render_to_string;

    #[test]
    fn test_bars_are_relative_to_largest_weight() {
        let bars = importance_bars(&[("worst_area", 0.4), ("mean_radius", 0.1), ("mean_texture", 0.0)], 40);

        assert_eq!(bars[0].length, 40);
        assert_eq!(bars[1].length, 10);
        assert_eq!(bars[2].length, 0);
        assert_eq!(bars[0].label, "Worst Area");
        assert_eq!(bars[0].value_label(), "40.0%");
    }

    #[test]
    fn test_all_zero_weights_draw_empty_bars() {
        let bars = importance_bars(&[("worst_area", 0.0)], 40);
        assert_eq!(bars[0].length, 0);
        assert_eq!(bars[0].value_label(), "0.0%");
    }

    #[test]
    fn test_modal_lists_top_ten_known_features() {
        let schema = FeatureSchema::default();
        let mut importances: Vec<(String, f64)> = schema
            .names()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i as f64 / 100.0))
            .collect();
        importances.insert(0, ("not_a_feature".to_string(), 0.99));

        let response = PredictionResponse {
            prediction: DiagnosisLabel::Malignant,
            probability: 0.8,
            feature_importances: Some(importances),
        };

        let text = render_to_string(120, 40, |f| {
            let area = f.area();
            render_details(f, area, &response, &schema)
        });
        assert!(text.contains("Feature Importance Analysis"));
        assert!(text.contains("Worst Fractal Dimension"));
        assert!(text.contains("29.0%"));
        assert!(text.contains("20.0%"));
        assert!(!text.contains("19.0%"));
        assert!(!text.contains("Not A Feature"));
        assert!(text.contains("Clinical Recommendations"));
        assert!(text.contains("Review family history of breast cancer"));
    }
}
