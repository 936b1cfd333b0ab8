//! Replay primitive for hashing encoding.

use crate::encoder::Encoder;
use crate::encoders::HashMethod;
use crate::exceptions::FeatureEncodingResult;
use crate::feature::TransformPrimitive;

/// Applies hashing encoding to raw values.
///
/// No frozen mapping exists: the primitive carries the hash method name and
/// component count, and reconstructs an equivalent bucketing function at
/// apply time. The output schema is therefore stable even for categories the
/// fit data never contained. Nulls hash as the empty string, matching the
/// batch transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashingEnc {
    hash_method: HashMethod,
    n_components: usize,
}

impl HashingEnc {
    pub const NAME: &'static str = "hashing_enc";

    /// Capture the hash parameters from a fitted encoder.
    pub fn new(fitted_encoder: &Encoder) -> FeatureEncodingResult<Self> {
        Ok(Self::from_parameters(
            fitted_encoder.get_hash_method()?,
            fitted_encoder.get_n_components()?,
        ))
    }

    /// Build directly from hash parameters.
    pub fn from_parameters(hash_method: HashMethod, n_components: usize) -> Self {
        Self {
            hash_method,
            n_components,
        }
    }

    /// The hash method in use.
    pub fn hash_method(&self) -> HashMethod {
        self.hash_method
    }

    /// The number of output components.
    pub fn n_components(&self) -> usize {
        self.n_components
    }
}

impl TransformPrimitive for HashingEnc {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn number_output_features(&self) -> usize {
        self.n_components
    }

    fn generate_name(&self, base_feature_names: &[&str]) -> String {
        format!("{}_{}", base_feature_names[0].to_uppercase(), "hashing")
    }

    fn transform(&self, values: &[Option<&str>]) -> Vec<Vec<f64>> {
        let mut columns = vec![vec![0.0; values.len()]; self.n_components];
        for (row, value) in values.iter().enumerate() {
            let bucket = self.hash_method.bucket(value.unwrap_or(""), self.n_components);
            columns[bucket][row] = 1.0;
        }
        columns
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
