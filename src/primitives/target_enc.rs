//! Replay primitive for target encoding.

use crate::encoder::Encoder;
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::TransformPrimitive;
use crate::mapping::{ordinal_code, ColumnMapping, ColumnRef, OrdinalMapping, TargetMapping};

/// Applies a fitted target-statistic mapping, composed with its ordinal
/// sub-mapping, to raw values. Unseen and missing values resolve to the
/// global prior.
#[derive(Clone, Debug)]
pub struct TargetEnc {
    mapping: TargetMapping,
    mapping_ord: OrdinalMapping,
}

impl TargetEnc {
    pub const NAME: &'static str = "target_enc";

    /// Capture the frozen mappings of one encoded column from a fitted encoder.
    pub fn new(
        fitted_encoder: &Encoder,
        category: impl Into<ColumnRef>,
    ) -> FeatureEncodingResult<Self> {
        match fitted_encoder.get_mapping(category)? {
            ColumnMapping::Target { target, ordinal } => Ok(Self::from_mappings(target, ordinal)),
            _ => Err(FeatureEncodingError::MethodMismatch(
                "must be a target encoder".into(),
            )),
        }
    }

    /// Build directly from frozen mappings.
    pub fn from_mappings(mapping: TargetMapping, mapping_ord: OrdinalMapping) -> Self {
        Self {
            mapping,
            mapping_ord,
        }
    }

    /// The frozen statistic table.
    pub fn mapping(&self) -> &TargetMapping {
        &self.mapping
    }

    /// The frozen ordinal sub-mapping.
    pub fn mapping_ord(&self) -> &OrdinalMapping {
        &self.mapping_ord
    }
}

impl TransformPrimitive for TargetEnc {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn generate_name(&self, base_feature_names: &[&str]) -> String {
        format!("{}_{}", base_feature_names[0].to_uppercase(), "target")
    }

    fn transform(&self, values: &[Option<&str>]) -> Vec<Vec<f64>> {
        // Reserved codes (-1 unseen, -2 missing) are absent from the table and
        // resolve to the prior.
        vec![values
            .iter()
            .map(|value| self.mapping.value(ordinal_code(&self.mapping_ord, *value)))
            .collect()]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
