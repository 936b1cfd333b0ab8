//! Replay primitive for binary encoding.

use crate::encoder::Encoder;
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::TransformPrimitive;
use crate::mapping::{ordinal_code, BinaryMapping, ColumnMapping, ColumnRef, OrdinalMapping};

/// Applies a fitted binary digit table, composed with its ordinal sub-mapping,
/// to raw values.
///
/// The output is column-major with one column per digit, most significant
/// first; unseen and missing values expand to all-zero digits.
#[derive(Clone, Debug)]
pub struct BinaryEnc {
    mapping: BinaryMapping,
    mapping_ord: OrdinalMapping,
}

impl BinaryEnc {
    pub const NAME: &'static str = "binary_enc";

    /// Capture the frozen mappings of one encoded column from a fitted encoder.
    pub fn new(
        fitted_encoder: &Encoder,
        category: impl Into<ColumnRef>,
    ) -> FeatureEncodingResult<Self> {
        match fitted_encoder.get_mapping(category)? {
            ColumnMapping::Binary { binary, ordinal } => Ok(Self::from_mappings(binary, ordinal)),
            _ => Err(FeatureEncodingError::MethodMismatch(
                "must be a binary encoder".into(),
            )),
        }
    }

    /// Build directly from frozen mappings.
    pub fn from_mappings(mapping: BinaryMapping, mapping_ord: OrdinalMapping) -> Self {
        Self {
            mapping,
            mapping_ord,
        }
    }

    /// The frozen digit table.
    pub fn mapping(&self) -> &BinaryMapping {
        &self.mapping
    }

    /// The frozen ordinal sub-mapping.
    pub fn mapping_ord(&self) -> &OrdinalMapping {
        &self.mapping_ord
    }
}

impl TransformPrimitive for BinaryEnc {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn number_output_features(&self) -> usize {
        self.mapping.n_bits()
    }

    fn generate_name(&self, base_feature_names: &[&str]) -> String {
        format!("{}_{}", base_feature_names[0].to_uppercase(), "binary")
    }

    fn transform(&self, values: &[Option<&str>]) -> Vec<Vec<f64>> {
        let n_bits = self.mapping.n_bits();
        let mut columns = vec![Vec::with_capacity(values.len()); n_bits];
        for value in values {
            let code = ordinal_code(&self.mapping_ord, *value);
            let digits = self.mapping.digits(code);
            for (bit, digit) in digits.into_iter().enumerate() {
                columns[bit].push(digit as f64);
            }
        }
        columns
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
