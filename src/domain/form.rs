//! Raw form values keyed by feature name.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::schema::FeatureSchema;

/// Live mapping of feature name to the raw text the user entered.
///
/// Holds exactly one entry per schema feature, in schema order.
/// Entries are overwritten, never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    entries: Vec<(&'static str, String)>,
}

impl FormState {
    /// Create an empty form for the schema.
    #[must_use]
    pub fn new(schema: &FeatureSchema) -> Self {
        Self {
            entries: schema.names().map(|name| (name, String::new())).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw value for a feature, `None` if the feature is unknown.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Raw value by schema position.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(_, v)| v.as_str())
    }

    /// Overwrite a feature's raw value.
    ///
    /// Returns `false` (and changes nothing) for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => false,
        }
    }

    /// Mutable access to a value by schema position (keystroke editing).
    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut String> {
        self.entries.get_mut(index).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }

    /// Apply a saved snapshot, ignoring names the schema does not know.
    ///
    /// Returns how many fields were restored.
    pub fn restore(&mut self, snapshot: &BTreeMap<String, String>) -> usize {
        let mut restored = 0;
        for (name, value) in snapshot {
            if self.set(name, value.clone()) {
                restored += 1;
            }
        }
        restored
    }

    /// Copy of every raw value keyed by name.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(n, v)| ((*n).to_string(), v.clone()))
            .collect()
    }
}

/// Parsed feature values ready for the wire, in schema order.
///
/// Keyed by each feature's wire key; serializes as `{key: number, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureValues(Vec<(&'static str, f64)>);

impl FeatureValues {
    #[must_use]
    pub fn new(values: Vec<(&'static str, f64)>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, f64)> {
        self.0.iter()
    }
}

impl Serialize for FeatureValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A typical benign case from the WDBC dataset, for exercising the form.
pub const SAMPLE_CASE: [(&str, &str); 30] = [
    ("mean_radius", "14.13"),
    ("mean_texture", "19.29"),
    ("mean_perimeter", "91.97"),
    ("mean_area", "654.9"),
    ("mean_smoothness", "0.09636"),
    ("mean_compactness", "0.1043"),
    ("mean_concavity", "0.0888"),
    ("mean_concave_points", "0.04892"),
    ("mean_symmetry", "0.1812"),
    ("mean_fractal_dimension", "0.0628"),
    ("radius_error", "0.4052"),
    ("texture_error", "1.217"),
    ("perimeter_error", "2.866"),
    ("area_error", "40.34"),
    ("smoothness_error", "0.007041"),
    ("compactness_error", "0.02548"),
    ("concavity_error", "0.03189"),
    ("concave_points_error", "0.0118"),
    ("symmetry_error", "0.02054"),
    ("fractal_dimension_error", "0.003795"),
    ("worst_radius", "16.27"),
    ("worst_texture", "25.68"),
    ("worst_perimeter", "107.3"),
    ("worst_area", "880.6"),
    ("worst_smoothness", "0.1324"),
    ("worst_compactness", "0.2543"),
    ("worst_concavity", "0.2722"),
    ("worst_concave_points", "0.1146"),
    ("worst_symmetry", "0.2901"),
    ("worst_fractal_dimension", "0.08395"),
];

impl FormState {
    /// Fill every field from [`SAMPLE_CASE`].
    pub fn load_sample(&mut self) {
        for (name, value) in SAMPLE_CASE {
            self.set(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::SchemaVariant;

    #[test]
    fn test_new_form_has_one_empty_entry_per_feature() {
        let schema = FeatureSchema::default();
        let form = FormState::new(&schema);
        assert_eq!(form.len(), schema.len());
        assert!(form.iter().all(|(_, v)| v.is_empty()));
        assert_eq!(
            form.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            schema.names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_set_ignores_unknown_names() {
        let mut form = FormState::new(&FeatureSchema::default());
        assert!(form.set("mean_radius", "12.5"));
        assert!(!form.set("tumor_weight", "3"));
        assert_eq!(form.get("mean_radius"), Some("12.5"));
        assert_eq!(form.get("tumor_weight"), None);
        assert_eq!(form.len(), 30);
    }

    #[test]
    fn test_restore_skips_unknown_keys() {
        let mut form = FormState::new(&FeatureSchema::new(SchemaVariant::Compact));
        let mut snapshot = BTreeMap::new();
        snapshot.insert("worst_radius".to_string(), "20.1".to_string());
        snapshot.insert("mean_texture".to_string(), "18".to_string()); // not in compact
        snapshot.insert("bogus".to_string(), "1".to_string());

        assert_eq!(form.restore(&snapshot), 1);
        assert_eq!(form.get("worst_radius"), Some("20.1"));
        assert_eq!(form.get("mean_texture"), None);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let schema = FeatureSchema::default();
        let mut form = FormState::new(&schema);
        form.load_sample();
        form.set("mean_area", "not yet");

        let mut fresh = FormState::new(&schema);
        fresh.restore(&form.snapshot());
        assert_eq!(fresh, form);
    }

    #[test]
    fn test_sample_case_covers_full_schema() {
        let schema = FeatureSchema::default();
        for (name, _) in SAMPLE_CASE {
            assert!(schema.contains(name), "{name} missing from schema");
        }
    }

    #[test]
    fn test_feature_values_serialize_in_order() {
        let values = FeatureValues::new(vec![("worst_radius", 20.5), ("mean_radius", 14.0)]);
        let json = serde_json::to_string(&values).expect("Should serialize");
        assert_eq!(json, r#"{"worst_radius":20.5,"mean_radius":14.0}"#);
        assert_eq!(values.get("mean_radius"), Some(14.0));
    }
}
