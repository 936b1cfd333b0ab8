//! Replay primitive for one-hot encoding.

use crate::feature::TransformPrimitive;

/// Applies one-hot encoding for one specific category value.
///
/// With `value = Some(v)`, the output is 1 exactly where the input equals `v`.
/// With `value = None`, the primitive is the is-missing indicator: the output
/// is 1 exactly for null inputs — an unseen non-null category never sets it.
#[derive(Clone, Debug, PartialEq)]
pub struct OneHotEnc {
    value: Option<String>,
}

impl OneHotEnc {
    pub const NAME: &'static str = "one_hot_enc";

    /// Build the indicator for one category value, or the is-missing
    /// indicator when `value` is `None`.
    pub fn new(value: Option<String>) -> Self {
        Self { value }
    }

    /// The category value this primitive indicates, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl TransformPrimitive for OneHotEnc {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn generate_name(&self, base_feature_names: &[&str]) -> String {
        match &self.value {
            Some(v) => format!("{} = {}", base_feature_names[0], v),
            None => format!("{} is null", base_feature_names[0]),
        }
    }

    fn transform(&self, values: &[Option<&str>]) -> Vec<Vec<f64>> {
        let column = values
            .iter()
            .map(|value| match (&self.value, value) {
                (Some(v), Some(raw)) if raw == v => 1.0,
                (None, None) => 1.0,
                _ => 0.0,
            })
            .collect();
        vec![column]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
