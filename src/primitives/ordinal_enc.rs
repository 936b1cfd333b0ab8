//! Replay primitive for ordinal encoding.

use crate::encoder::Encoder;
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::TransformPrimitive;
use crate::mapping::{ordinal_code, ColumnMapping, ColumnRef, OrdinalMapping};

/// Applies a fitted ordinal mapping to raw values.
///
/// ### Example
///
/// ```rust,no_run
/// # use feature_encoding::encoder::Encoder;
/// # use feature_encoding::feature::TransformPrimitive;
/// use feature_encoding::primitives::OrdinalEnc;
/// # fn demo(enc: &Encoder) -> feature_encoding::exceptions::FeatureEncodingResult<()> {
/// let encoder = OrdinalEnc::new(enc, "product_id")?;
/// let encoded = encoder.transform(&[Some("car"), Some("toothpaste"), Some("coke zero"), Some("coke zero")]);
/// assert_eq!(encoded, vec![vec![2.0, 3.0, 1.0, 1.0]]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct OrdinalEnc {
    mapping: OrdinalMapping,
}

impl OrdinalEnc {
    pub const NAME: &'static str = "ordinal_enc";

    /// Capture the frozen mapping of one encoded column from a fitted encoder.
    pub fn new(
        fitted_encoder: &Encoder,
        category: impl Into<ColumnRef>,
    ) -> FeatureEncodingResult<Self> {
        match fitted_encoder.get_mapping(category)? {
            ColumnMapping::Ordinal(mapping) => Ok(Self::from_mapping(mapping)),
            _ => Err(FeatureEncodingError::MethodMismatch(
                "must be an ordinal encoder".into(),
            )),
        }
    }

    /// Build directly from a frozen mapping.
    pub fn from_mapping(mapping: OrdinalMapping) -> Self {
        Self { mapping }
    }

    /// The frozen mapping.
    pub fn mapping(&self) -> &OrdinalMapping {
        &self.mapping
    }
}

impl TransformPrimitive for OrdinalEnc {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn generate_name(&self, base_feature_names: &[&str]) -> String {
        format!("{}_{}", base_feature_names[0].to_uppercase(), "ordinal")
    }

    fn transform(&self, values: &[Option<&str>]) -> Vec<Vec<f64>> {
        vec![values
            .iter()
            .map(|value| ordinal_code(&self.mapping, *value) as f64)
            .collect()]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
