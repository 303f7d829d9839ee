//! Feature schema for breast-tumour cytology measurements.
//!
//! Based on the Wisconsin Diagnostic Breast Cancer (WDBC) features: ten
//! nucleus measurements, each reported as mean, standard error and worst value.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One numeric measurement accepted by the prediction service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpec {
    /// Stable identifier, used for form state and snapshots
    pub name: &'static str,
    /// Key sent to and returned by the prediction service
    pub wire: &'static str,
    pub description: &'static str,
    /// Soft lower bound (inclusive)
    pub min: f64,
    /// Soft upper bound (inclusive)
    pub max: f64,
    pub unit: Option<&'static str>,
}

impl FeatureSpec {
    const fn new(
        name: &'static str,
        description: &'static str,
        min: f64,
        max: f64,
        unit: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            wire: name,
            description,
            min,
            max,
            unit,
        }
    }

    /// Human-readable label for the feature.
    #[must_use]
    pub fn label(&self) -> String {
        display_label(self.name)
    }

    /// Description followed by the unit, if any.
    #[must_use]
    pub fn hint(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} [{}]", self.description, unit),
            None => self.description.to_string(),
        }
    }
}

const UM: Option<&str> = Some("μm");
const UM2: Option<&str> = Some("μm²");

/// All 30 WDBC features, in display order.
const FULL_FEATURES: [FeatureSpec; 30] = [
    FeatureSpec::new("mean_radius", "Mean radius of tumor cells (microns)", 6.981, 28.11, UM),
    FeatureSpec::new("mean_texture", "Mean texture (standard deviation of gray-scale values)", 9.71, 39.28, None),
    FeatureSpec::new("mean_perimeter", "Mean perimeter of tumor cells (microns)", 43.79, 188.5, UM),
    FeatureSpec::new("mean_area", "Mean area of tumor cells (square microns)", 143.5, 2501.0, UM2),
    FeatureSpec::new("mean_smoothness", "Mean local variation in radius lengths", 0.05263, 0.1634, None),
    FeatureSpec::new("mean_compactness", "Mean compactness (perimeter² / area - 1.0)", 0.01938, 0.3454, None),
    FeatureSpec::new("mean_concavity", "Mean severity of concave portions of contour", 0.0, 0.4268, None),
    FeatureSpec::new("mean_concave_points", "Mean number of concave portions of contour", 0.0, 0.2012, None),
    FeatureSpec::new("mean_symmetry", "Mean symmetry of tumor cell", 0.106, 0.304, None),
    FeatureSpec::new("mean_fractal_dimension", "Mean 'coastline approximation' - fractal dimension", 0.04996, 0.09744, None),
    FeatureSpec::new("radius_error", "Standard error of radius measurements", 0.1115, 2.873, UM),
    FeatureSpec::new("texture_error", "Standard error of texture measurements", 0.3602, 4.885, None),
    FeatureSpec::new("perimeter_error", "Standard error of perimeter measurements", 0.757, 21.98, UM),
    FeatureSpec::new("area_error", "Standard error of area measurements", 6.802, 542.2, UM2),
    FeatureSpec::new("smoothness_error", "Standard error of smoothness measurements", 0.001713, 0.03113, None),
    FeatureSpec::new("compactness_error", "Standard error of compactness measurements", 0.002252, 0.1354, None),
    FeatureSpec::new("concavity_error", "Standard error of concavity measurements", 0.0, 0.396, None),
    FeatureSpec::new("concave_points_error", "Standard error of concave points measurements", 0.0, 0.05279, None),
    FeatureSpec::new("symmetry_error", "Standard error of symmetry measurements", 0.007882, 0.07895, None),
    FeatureSpec::new("fractal_dimension_error", "Standard error of fractal dimension measurements", 0.0008948, 0.02984, None),
    FeatureSpec::new("worst_radius", "Largest radius measurement", 7.93, 36.04, UM),
    FeatureSpec::new("worst_texture", "Most severe texture measurement", 12.02, 49.54, None),
    FeatureSpec::new("worst_perimeter", "Largest perimeter measurement", 50.41, 251.2, UM),
    FeatureSpec::new("worst_area", "Largest area measurement", 185.2, 4254.0, UM2),
    FeatureSpec::new("worst_smoothness", "Most severe smoothness measurement", 0.07117, 0.2226, None),
    FeatureSpec::new("worst_compactness", "Most severe compactness measurement", 0.02729, 1.058, None),
    FeatureSpec::new("worst_concavity", "Most severe concavity measurement", 0.0, 1.252, None),
    FeatureSpec::new("worst_concave_points", "Largest number of concave points", 0.0, 0.291, None),
    FeatureSpec::new("worst_symmetry", "Most asymmetric measurement", 0.1565, 0.6638, None),
    FeatureSpec::new("worst_fractal_dimension", "Highest fractal dimension measurement", 0.05504, 0.2075, None),
];

/// Features consumed by the reduced model, in the model's training order,
/// with the space-separated keys that model was trained on.
const COMPACT_ORDER: [(&str, &str); 19] = [
    ("worst_radius", "worst radius"),
    ("worst_perimeter", "worst perimeter"),
    ("worst_concave_points", "worst concave points"),
    ("mean_concave_points", "mean concave points"),
    ("worst_area", "worst area"),
    ("worst_compactness", "worst compactness"),
    ("mean_radius", "mean radius"),
    ("texture_error", "texture error"),
    ("worst_texture", "worst texture"),
    ("area_error", "area error"),
    ("mean_smoothness", "mean smoothness"),
    ("mean_symmetry", "mean symmetry"),
    ("worst_smoothness", "worst smoothness"),
    ("worst_symmetry", "worst symmetry"),
    ("mean_concavity", "mean concavity"),
    ("worst_concavity", "worst concavity"),
    ("compactness_error", "compactness error"),
    ("concavity_error", "concavity error"),
    ("fractal_dimension_error", "fractal dimension error"),
];

/// Which feature set the form collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// All 30 WDBC features
    #[default]
    Full,
    /// The 19 features of the reduced model
    Compact,
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown schema variant: {other}")),
        }
    }
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Ordered, immutable set of feature specifications.
///
/// Order is the on-screen order and the wire order. Full uses the
/// underscore names on the wire; Compact uses the reduced model's keys.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    variant: SchemaVariant,
    specs: Vec<FeatureSpec>,
}

impl FeatureSchema {
    /// Build the schema for a variant.
    #[must_use]
    pub fn new(variant: SchemaVariant) -> Self {
        let specs = match variant {
            SchemaVariant::Full => FULL_FEATURES.to_vec(),
            SchemaVariant::Compact => COMPACT_ORDER
                .iter()
                .filter_map(|&(name, wire)| {
                    FULL_FEATURES
                        .iter()
                        .find(|s| s.name == name)
                        .map(|spec| FeatureSpec { wire, ..*spec })
                })
                .collect(),
        };
        Self { variant, specs }
    }

    #[must_use]
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.specs.iter()
    }

    /// Feature names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|s| s.name)
    }

    /// Look up a feature by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Look up a feature by the key the prediction service uses.
    #[must_use]
    pub fn get_by_wire(&self, wire: &str) -> Option<&FeatureSpec> {
        self.specs.iter().find(|s| s.wire == wire)
    }

    /// Position of a feature in schema order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new(SchemaVariant::Full)
    }
}

/// Turn `mean_concave_points` into `Mean Concave Points`.
#[must_use]
pub fn display_label(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_full_schema_has_thirty_unique_features() {
        let schema = FeatureSchema::new(SchemaVariant::Full);
        assert_eq!(schema.len(), 30);

        let names: HashSet<_> = schema.names().collect();
        assert_eq!(names.len(), 30);
    }

    #[test]
    fn test_compact_schema_follows_model_order() {
        let schema = FeatureSchema::new(SchemaVariant::Compact);
        assert_eq!(schema.len(), COMPACT_ORDER.len());
        assert_eq!(
            schema.names().collect::<Vec<_>>(),
            COMPACT_ORDER.iter().map(|(name, _)| *name).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_wire_keys_per_variant() {
        let full = FeatureSchema::new(SchemaVariant::Full);
        assert!(full.iter().all(|s| s.wire == s.name));

        let compact = FeatureSchema::new(SchemaVariant::Compact);
        let radius = compact.get("worst_radius").expect("Should exist");
        assert_eq!(radius.wire, "worst radius");
        assert_eq!(
            compact.get_by_wire("fractal dimension error").map(|s| s.name),
            Some("fractal_dimension_error")
        );
        assert!(compact.get_by_wire("worst_radius").is_none());
    }

    #[test]
    fn test_variants_agree_on_bounds() {
        let full = FeatureSchema::new(SchemaVariant::Full);
        let compact = FeatureSchema::new(SchemaVariant::Compact);
        for spec in compact.iter() {
            let twin = full.get(spec.name).expect("Should exist in full schema");
            assert_eq!((twin.min, twin.max, twin.unit), (spec.min, spec.max, spec.unit));
        }
    }

    #[test]
    fn test_bounds_are_ordered() {
        for spec in FeatureSchema::default().iter() {
            assert!(spec.min <= spec.max, "{} has inverted bounds", spec.name);
            assert!(spec.min.is_finite() && spec.max.is_finite());
        }
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("mean_radius"), "Mean Radius");
        assert_eq!(display_label("fractal_dimension_error"), "Fractal Dimension Error");
        assert_eq!(display_label("area"), "Area");
    }

    #[test]
    fn test_hint_includes_unit() {
        let schema = FeatureSchema::default();
        let radius = schema.get("mean_radius").expect("Should exist");
        assert!(radius.hint().ends_with("[μm]"));

        let texture = schema.get("mean_texture").expect("Should exist");
        assert_eq!(texture.hint(), texture.description);
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("FULL".parse::<SchemaVariant>(), Ok(SchemaVariant::Full));
        assert_eq!(" compact ".parse::<SchemaVariant>(), Ok(SchemaVariant::Compact));
        assert!("other".parse::<SchemaVariant>().is_err());
    }
}
