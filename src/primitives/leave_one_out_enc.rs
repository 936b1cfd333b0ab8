//! Replay primitive for leave-one-out encoding.

use crate::encoder::Encoder;
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::TransformPrimitive;
use crate::mapping::{ColumnMapping, ColumnRef, LeaveOneOutMapping};

/// Applies a fitted leave-one-out aggregate table to raw values.
///
/// Replay is the out-of-sample path: there is no leakage concern away from the
/// training rows, so each value resolves to the plain per-category
/// `sum / count` ratio, with the global target mean for unseen and missing
/// values.
#[derive(Clone, Debug)]
pub struct LeaveOneOutEnc {
    mapping: LeaveOneOutMapping,
}

impl LeaveOneOutEnc {
    pub const NAME: &'static str = "leave_one_out_enc";

    /// Capture the frozen aggregates of one encoded column from a fitted encoder.
    pub fn new(
        fitted_encoder: &Encoder,
        category: impl Into<ColumnRef>,
    ) -> FeatureEncodingResult<Self> {
        match fitted_encoder.get_mapping(category)? {
            ColumnMapping::LeaveOneOut(mapping) => Ok(Self::from_mapping(mapping)),
            _ => Err(FeatureEncodingError::MethodMismatch(
                "must be a leave-one-out encoder".into(),
            )),
        }
    }

    /// Build directly from a frozen aggregate table.
    pub fn from_mapping(mapping: LeaveOneOutMapping) -> Self {
        Self { mapping }
    }

    /// The frozen aggregate table.
    pub fn mapping(&self) -> &LeaveOneOutMapping {
        &self.mapping
    }
}

impl TransformPrimitive for LeaveOneOutEnc {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn generate_name(&self, base_feature_names: &[&str]) -> String {
        format!(
            "{}_{}",
            base_feature_names[0].to_uppercase(),
            "leave_one_out"
        )
    }

    fn transform(&self, values: &[Option<&str>]) -> Vec<Vec<f64>> {
        vec![values
            .iter()
            .map(|value| self.mapping.out_of_sample(*value))
            .collect()]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
