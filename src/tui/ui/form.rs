//! Measurement input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::domain::{FeatureSchema, FeatureSpec, FieldMarks, FormState};
use crate::tui::styles::MedicalTheme;

/// Input granularity, shown as a precision hint only.
pub const STEP: f64 = 0.0001;

/// One labelled numeric input bound to a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: String,
    pub hint: String,
    pub min: f64,
    pub max: f64,
}

impl FormField {
    fn from_spec(spec: &FeatureSpec) -> Self {
        Self {
            name: spec.name,
            label: spec.label(),
            hint: spec.hint(),
            min: spec.min,
            max: spec.max,
        }
    }

    /// `6.981 – 28.11`
    #[must_use]
    pub fn range(&self) -> String {
        format!("{} – {}", self.min, self.max)
    }
}

/// Field layout built from the schema, plus the focused row.
#[derive(Debug, Clone, Default)]
pub struct FormView {
    fields: Vec<FormField>,
    selected: usize,
}

impl FormView {
    /// Build one input per schema feature.
    #[must_use]
    pub fn build(schema: &FeatureSchema) -> Self {
        let mut view = Self::default();
        view.rebuild(schema);
        view
    }

    /// Replace every field with a fresh set from `schema`.
    pub fn rebuild(&mut self, schema: &FeatureSchema) {
        self.fields = schema.iter().map(FormField::from_spec).collect();
        self.selected = self.selected.min(self.fields.len().saturating_sub(1));
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_field(&self) -> Option<&FormField> {
        self.fields.get(self.selected)
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.selected = (self.selected + 1) % self.fields.len();
        }
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.fields.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.fields.len() {
            self.selected = index;
        }
    }

    /// Characters a numeric input accepts.
    #[must_use]
    pub fn accepts(c: char) -> bool {
        c.is_ascii_digit() || c == '.' || c == '-'
    }
}

/// Render the measurement form
pub fn render_form(
    f: &mut Frame,
    area: Rect,
    view: &FormView,
    form: &FormState,
    marks: &FieldMarks,
    submitting: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_form_header(f, chunks[0], view, marks);
    render_form_fields(f, chunks[1], view, form, marks);
    render_form_footer(f, chunks[2], submitting);
}

fn render_form_header(f: &mut Frame, area: Rect, view: &FormView, marks: &FieldMarks) {
    let mut spans = vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Tumor Feature Entry", MedicalTheme::title()),
        Span::styled(
            format!(" │ {} cytology measurements, step {STEP}", view.fields().len()),
            MedicalTheme::text_secondary(),
        ),
    ];
    if marks.count() > 0 {
        spans.push(Span::styled(
            format!(" │ {} invalid", marks.count()),
            MedicalTheme::danger(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, view: &FormView, form: &FormState, marks: &FieldMarks) {
    let rows = view.fields().iter().enumerate().map(|(i, field)| {
        let value = form.value_at(i).unwrap_or_default();
        let is_selected = i == view.selected();
        let error = marks.message(field.name);

        let label_style = match (error.is_some(), is_selected) {
            (true, _) => MedicalTheme::danger(),
            (false, true) => MedicalTheme::focused(),
            (false, false) => MedicalTheme::text_secondary(),
        };

        let mut value_spans = if value.is_empty() {
            vec![Span::styled(field.range(), MedicalTheme::text_muted())]
        } else {
            vec![Span::styled(value.to_string(), MedicalTheme::text())]
        };
        if is_selected {
            value_spans.push(Span::styled("▌", MedicalTheme::cursor()));
        }

        let info = match error {
            Some(message) => Span::styled(format!("! {message}"), MedicalTheme::danger()),
            None => Span::styled(field.hint.clone(), MedicalTheme::text_muted()),
        };

        Row::new(vec![
            Cell::from(Span::styled(field.label.clone(), label_style)),
            Cell::from(Line::from(value_spans)),
            Cell::from(info),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(18),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(vec!["Measurement", "Value", "Description"])
            .style(MedicalTheme::subtitle())
            .bottom_margin(1),
    )
    .row_highlight_style(MedicalTheme::focused())
    .highlight_symbol("▶ ")
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );

    let mut state = TableState::default().with_selected(Some(view.selected()));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_form_footer(f: &mut Frame, area: Rect, submitting: Option<&str>) {
    let submit = match submitting {
        Some(spinner) => vec![
            Span::styled("[Enter] Predict ", MedicalTheme::disabled()),
            Span::styled(format!("{spinner} Analyzing... "), MedicalTheme::info()),
        ],
        None => vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
        ],
    };

    let mut spans = vec![
        Span::styled("[↑↓] ", MedicalTheme::key_hint()),
        Span::styled("Navigate ", MedicalTheme::key_desc()),
    ];
    spans.extend(submit);
    spans.extend([
        Span::styled("[Del] ", MedicalTheme::key_hint()),
        Span::styled("Clear ", MedicalTheme::key_desc()),
        Span::styled("[S] ", MedicalTheme::key_hint()),
        Span::styled("Sample Data ", MedicalTheme::key_desc()),
        Span::styled("[Ctrl+Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SchemaVariant, Validator};
    use crate::tui::ui::tests::render_to_string;

    #[test]
    fn test_build_is_idempotent_and_last_call_wins() {
        let full = FeatureSchema::default();
        let mut view = FormView::build(&full);
        assert_eq!(view.fields().len(), 30);

        let first = view.fields().to_vec();
        view.rebuild(&full);
        assert_eq!(view.fields(), first.as_slice());

        view.select(29);
        view.rebuild(&FeatureSchema::new(SchemaVariant::Compact));
        assert_eq!(view.fields().len(), 19);
        assert_eq!(view.selected(), 18);
    }

    #[test]
    fn test_fields_carry_labels_and_bounds() {
        let view = FormView::build(&FeatureSchema::default());
        let field = &view.fields()[0];
        assert_eq!(field.name, "mean_radius");
        assert_eq!(field.label, "Mean Radius");
        assert_eq!(field.range(), "6.981 – 28.11");
        assert!(field.hint.ends_with("[μm]"));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut view = FormView::build(&FeatureSchema::default());
        view.prev_field();
        assert_eq!(view.selected(), 29);
        view.next_field();
        assert_eq!(view.selected(), 0);
    }

    #[test]
    fn test_numeric_filter() {
        assert!("-0.123456789".chars().all(FormView::accepts));
        assert!(!FormView::accepts('e'));
        assert!(!FormView::accepts(' '));
    }

    #[test]
    fn test_render_shows_invalid_marks() {
        let schema = FeatureSchema::default();
        let view = FormView::build(&schema);
        let mut form = FormState::new(&schema);
        form.set("mean_radius", "4");

        let mut marks = FieldMarks::default();
        Validator::new(&schema).validate_field("mean_radius", "4", &mut marks);

        let text = render_to_string(120, 20, |f| {
            let area = f.area();
            render_form(f, area, &view, &form, &marks, None)
        });
        assert!(text.contains("Mean Radius"));
        assert!(text.contains("! Value must be between 6.981 and 28.11"));
        assert!(text.contains("1 invalid"));
        assert!(text.contains("[Enter] Predict"));
    }

    #[test]
    fn test_render_disables_submit_while_submitting() {
        let schema = FeatureSchema::default();
        let view = FormView::build(&schema);
        let form = FormState::new(&schema);

        let text = render_to_string(120, 20, |f| {
            let area = f.area();
            render_form(f, area, &view, &form, &FieldMarks::default(), Some("⠋"))
        });
        assert!(text.contains("Analyzing..."));
    }
}
