//! Field and whole-form validation against schema bounds.
//!
//! Bounds are soft: they catch typos before the request is sent, while the
//! prediction service stays the authority on acceptable input.

use std::collections::HashMap;

use super::form::{FeatureValues, FormState};
use super::schema::{FeatureSchema, FeatureSpec};

/// Why a raw field value was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid number")]
    NotANumber,

    #[error("Value must be between {min} and {max}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    fn failed(error: &ValidationError) -> Self {
        Self {
            valid: false,
            message: Some(error.to_string()),
        }
    }
}

/// Parse a raw value and check it against the feature's bounds.
///
/// # Errors
/// `NotANumber` when the trimmed text is not a finite decimal,
/// `OutOfRange` when strictly outside `[min, max]`.
pub fn check_value(spec: &FeatureSpec, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber)?;

    // `parse` accepts "NaN" and "inf"
    if !value.is_finite() {
        return Err(ValidationError::NotANumber);
    }

    if value < spec.min || value > spec.max {
        return Err(ValidationError::OutOfRange {
            value,
            min: spec.min,
            max: spec.max,
        });
    }

    Ok(value)
}

/// Visible invalid marks, keyed by feature name.
#[derive(Debug, Clone, Default)]
pub struct FieldMarks {
    marks: HashMap<&'static str, String>,
}

impl FieldMarks {
    pub fn mark(&mut self, name: &'static str, message: String) {
        self.marks.insert(name, message);
    }

    pub fn clear(&mut self, name: &str) {
        self.marks.remove(name);
    }

    pub fn clear_all(&mut self) {
        self.marks.clear();
    }

    #[must_use]
    pub fn message(&self, name: &str) -> Option<&str> {
        self.marks.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_marked(&self, name: &str) -> bool {
        self.marks.contains_key(name)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.marks.len()
    }
}

/// Validates form fields against a schema.
pub struct Validator<'a> {
    schema: &'a FeatureSchema,
}

impl<'a> Validator<'a> {
    #[must_use]
    pub fn new(schema: &'a FeatureSchema) -> Self {
        Self { schema }
    }

    /// Validate one field and update its mark.
    pub fn validate_field(&self, name: &str, raw: &str, marks: &mut FieldMarks) -> ValidationResult {
        let Some(spec) = self.schema.get(name) else {
            return ValidationResult::failed(&ValidationError::UnknownFeature(name.to_string()));
        };

        match check_value(spec, raw) {
            Ok(_) => {
                marks.clear(spec.name);
                ValidationResult::ok()
            }
            Err(e) => {
                let result = ValidationResult::failed(&e);
                marks.mark(spec.name, e.to_string());
                result
            }
        }
    }

    /// Validate every field, marking all failures.
    ///
    /// Does not stop at the first invalid field.
    pub fn validate_form(&self, form: &FormState, marks: &mut FieldMarks) -> bool {
        let mut all_valid = true;
        for spec in self.schema.iter() {
            let raw = form.get(spec.name).unwrap_or_default();
            if !self.validate_field(spec.name, raw, marks).valid {
                all_valid = false;
            }
        }
        all_valid
    }

    /// Parse every field into wire values.
    ///
    /// # Errors
    /// Returns the first failing field and its error.
    pub fn collect(&self, form: &FormState) -> Result<FeatureValues, (&'static str, ValidationError)> {
        let mut values = Vec::with_capacity(self.schema.len());
        for spec in self.schema.iter() {
            let raw = form.get(spec.name).unwrap_or_default();
            let value = check_value(spec, raw).map_err(|e| (spec.name, e))?;
            values.push((spec.wire, value));
        }
        Ok(FeatureValues::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::default()
    }

    #[test]
    fn test_bounds_are_inclusive_for_every_feature() {
        let schema = schema();
        let validator = Validator::new(&schema);
        let mut marks = FieldMarks::default();

        for spec in schema.iter() {
            let eps = (spec.max - spec.min).abs().max(1.0) * 1e-6;

            for ok in [spec.min, spec.max, (spec.min + spec.max) / 2.0] {
                let result = validator.validate_field(spec.name, &ok.to_string(), &mut marks);
                assert!(result.valid, "{} rejected {ok}", spec.name);
            }

            for bad in [spec.min - eps, spec.max + eps] {
                let result = validator.validate_field(spec.name, &bad.to_string(), &mut marks);
                assert!(!result.valid, "{} accepted {bad}", spec.name);
                assert!(result
                    .message
                    .as_deref()
                    .is_some_and(|m| m.starts_with("Value must be between")));
            }
        }
    }

    #[test]
    fn test_non_numeric_input_is_rejected() {
        let schema = schema();
        let spec = schema.get("mean_radius").expect("Should exist");

        for raw in ["", "   ", "-", ".", "1.2.3", "abc", "12abc", "NaN", "inf", "-infinity"] {
            assert_eq!(
                check_value(spec, raw),
                Err(ValidationError::NotANumber),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let schema = schema();
        let spec = schema.get("mean_radius").expect("Should exist");
        assert_eq!(check_value(spec, " 14.2 "), Ok(14.2));
    }

    #[test]
    fn test_messages_match_form_copy() {
        let schema = schema();
        let spec = schema.get("mean_area").expect("Should exist");
        let err = check_value(spec, "9000").unwrap_err();
        assert_eq!(err.to_string(), "Value must be between 143.5 and 2501");
        assert_eq!(ValidationError::NotANumber.to_string(), "Please enter a valid number");
    }

    #[test]
    fn test_marks_follow_field_state() {
        let schema = schema();
        let validator = Validator::new(&schema);
        let mut marks = FieldMarks::default();

        validator.validate_field("mean_radius", "abc", &mut marks);
        assert_eq!(marks.message("mean_radius"), Some("Please enter a valid number"));

        validator.validate_field("mean_radius", "14", &mut marks);
        assert!(!marks.is_marked("mean_radius"));
    }

    #[test]
    fn test_unknown_feature_is_invalid() {
        let schema = schema();
        let validator = Validator::new(&schema);
        let mut marks = FieldMarks::default();

        let result = validator.validate_field("tumor_weight", "1", &mut marks);
        assert!(!result.valid);
        assert_eq!(marks.count(), 0);
    }

    #[test]
    fn test_validate_form_marks_every_invalid_field() {
        let schema = schema();
        let validator = Validator::new(&schema);
        let mut marks = FieldMarks::default();
        let mut form = FormState::new(&schema);
        form.load_sample();

        assert!(validator.validate_form(&form, &mut marks));
        assert_eq!(marks.count(), 0);

        form.set("mean_radius", "abc");
        form.set("worst_area", "99999");
        assert!(!validator.validate_form(&form, &mut marks));
        assert_eq!(marks.count(), 2);
        assert!(marks.is_marked("mean_radius"));
        assert!(marks.is_marked("worst_area"));
    }

    #[test]
    fn test_collect_returns_values_in_schema_order() {
        let schema = schema();
        let validator = Validator::new(&schema);
        let mut form = FormState::new(&schema);
        form.load_sample();

        let values = validator.collect(&form).expect("Sample should be valid");
        assert_eq!(values.len(), schema.len());
        assert_eq!(values.get("mean_radius"), Some(14.13));
        assert_eq!(
            values.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            schema.names().collect::<Vec<_>>()
        );

        form.set("mean_texture", "");
        let (name, err) = validator.collect(&form).unwrap_err();
        assert_eq!(name, "mean_texture");
        assert_eq!(err, ValidationError::NotANumber);
    }

    #[test]
    fn test_compact_values_use_reduced_model_keys() {
        let schema = FeatureSchema::new(crate::domain::SchemaVariant::Compact);
        let mut form = FormState::new(&schema);
        form.load_sample();

        let values = Validator::new(&schema).collect(&form).expect("Sample should be valid");
        assert_eq!(values.len(), 19);
        assert_eq!(values.get("worst radius"), Some(16.27));

        let body = serde_json::to_string(&values).expect("Should serialize");
        assert!(body.starts_with(r#"{"worst radius":16.27,"worst perimeter":107.3"#));
        assert!(!body.contains("worst_radius"));
    }
}
