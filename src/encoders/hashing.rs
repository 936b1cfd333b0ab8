//! Hashing encoding: a named hash function reduced modulo a fixed component count.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use arrow::array::{Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use async_trait::async_trait;
use datafusion::logical_expr::{Case as DFCase, ColumnarValue, Expr, ScalarUDF, Volatility};
use datafusion::prelude::*;
use tracing::debug;

use crate::encoders::{resolve_encode_columns, select_with_features, CategoryEncoder};
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::Feature;
use crate::primitives::HashingEnc;

/// Default number of output components per hashed column.
pub const DEFAULT_N_COMPONENTS: usize = 8;

/// Closed registry of hash methods usable by the hashing encoder.
///
/// Both members are deterministic across processes, which the replay contract
/// requires: a primitive carrying only the method name and component count
/// must reconstruct the exact bucketing at apply time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashMethod {
    /// `ahash` with its fixed default keys.
    AHash,
    /// SipHash via the standard library's `DefaultHasher` with fixed keys.
    SipHash,
}

impl HashMethod {
    /// Look up a hash method by name. Unknown names fail with a configuration
    /// error listing the valid set.
    pub fn from_name(name: &str) -> FeatureEncodingResult<Self> {
        match name {
            "ahash" => Ok(HashMethod::AHash),
            "siphash" => Ok(HashMethod::SipHash),
            _ => Err(FeatureEncodingError::InvalidParameter(format!(
                "'{}' is not a supported hash method. Supported methods are: ahash, siphash",
                name
            ))),
        }
    }

    /// Registry name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            HashMethod::AHash => "ahash",
            HashMethod::SipHash => "siphash",
        }
    }

    /// Hash a value into one of `n_components` buckets.
    pub fn bucket(&self, value: &str, n_components: usize) -> usize {
        let hashed = match self {
            HashMethod::AHash => {
                let mut hasher = ahash::AHasher::default();
                value.hash(&mut hasher);
                hasher.finish()
            }
            HashMethod::SipHash => {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                value.hash(&mut hasher);
                hasher.finish()
            }
        };
        (hashed % n_components as u64) as usize
    }
}

impl Default for HashMethod {
    fn default() -> Self {
        HashMethod::AHash
    }
}

/// Maps each categorical value to several columns using a named hash function.
///
/// No fitted mapping exists: the output schema is fixed by `n_components`
/// regardless of training cardinality, so unseen categories hash like any
/// other value. Nulls hash as the empty string.
pub struct HashingEncoder {
    cols: Option<Vec<String>>,
    fitted_cols: Vec<String>,
    hash_method: HashMethod,
    n_components: usize,
}

impl HashingEncoder {
    /// Create a new HashingEncoder with the default hash method and component count.
    pub fn new(cols: Option<Vec<String>>) -> Self {
        Self {
            cols,
            fitted_cols: Vec::new(),
            hash_method: HashMethod::default(),
            n_components: DEFAULT_N_COMPONENTS,
        }
    }

    /// Override the hash method.
    pub fn with_hash_method(mut self, hash_method: HashMethod) -> Self {
        self.hash_method = hash_method;
        self
    }

    /// Override the number of output components.
    pub fn with_n_components(mut self, n_components: usize) -> Self {
        self.n_components = n_components;
        self
    }

    /// The hash method in use.
    pub fn hash_method(&self) -> HashMethod {
        self.hash_method
    }

    /// The configured number of output components.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Names of the encoded columns, in encode order.
    pub fn encoded_columns(&self) -> Vec<String> {
        self.fitted_cols.clone()
    }

    /// Scalar UDF computing the bucket index of a string column. Shared with
    /// the replay primitive through [`HashMethod::bucket`], so the lazy batch
    /// transform and standalone replay agree bit for bit.
    fn bucket_udf(&self) -> ScalarUDF {
        let method = self.hash_method;
        let n_components = self.n_components;
        let fun = Arc::new(
            move |args: &[ColumnarValue]| -> datafusion::error::Result<ColumnarValue> {
                let arrays = ColumnarValue::values_to_arrays(args)?;
                let input = arrays[0]
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| {
                        datafusion::error::DataFusionError::Plan(
                            "Expected Utf8 array for hashed column".into(),
                        )
                    })?;
                let buckets: Int64Array = (0..input.len())
                    .map(|i| {
                        let value = if input.is_null(i) { "" } else { input.value(i) };
                        Some(method.bucket(value, n_components) as i64)
                    })
                    .collect();
                Ok(ColumnarValue::Array(Arc::new(buckets)))
            },
        );
        create_udf(
            "hash_bucket",
            vec![DataType::Utf8],
            DataType::Int64,
            Volatility::Immutable,
            fun,
        )
    }
}

#[async_trait]
impl CategoryEncoder for HashingEncoder {
    fn method_name(&self) -> &'static str {
        "hashing"
    }

    async fn fit(&mut self, df: &DataFrame, _target: Option<&str>) -> FeatureEncodingResult<()> {
        if self.n_components == 0 {
            return Err(FeatureEncodingError::InvalidParameter(
                "n_components must be at least 1".into(),
            ));
        }
        self.fitted_cols = resolve_encode_columns(df, self.cols.as_deref())?;
        debug!(
            columns = self.fitted_cols.len(),
            hash_method = self.hash_method.name(),
            n_components = self.n_components,
            "fitted hashing encoder"
        );
        Ok(())
    }

    fn transform(&self, df: DataFrame, features: &[Feature]) -> FeatureEncodingResult<DataFrame> {
        let udf = self.bucket_udf();
        select_with_features(df, features, |feature| {
            let encoded = feature
                .primitive()
                .is_some_and(|p| p.name() == HashingEnc::NAME);
            if !encoded || !self.fitted_cols.iter().any(|c| c == feature.base_column()) {
                return Ok(None);
            }
            let bucket = udf.call(vec![col(feature.base_column())]);
            let names = feature.feature_names();
            let exprs = (0..self.n_components)
                .map(|component| {
                    Expr::Case(DFCase {
                        expr: None,
                        when_then_expr: vec![(
                            Box::new(bucket.clone().eq(lit(component as i64))),
                            Box::new(lit(1_i64)),
                        )],
                        else_expr: Some(Box::new(lit(0_i64))),
                    })
                    .alias(&names[component])
                })
                .collect();
            Ok(Some(exprs))
        })
    }

    fn encode_features_list(&self, features: &[Feature]) -> FeatureEncodingResult<Vec<Feature>> {
        let mut feature_list = Vec::with_capacity(features.len());
        for feature in features {
            if feature.is_identity() && self.fitted_cols.iter().any(|c| c == feature.name()) {
                let primitive =
                    HashingEnc::from_parameters(self.hash_method, self.n_components);
                feature_list.push(Feature::transformed(feature, Arc::new(primitive)));
            } else {
                feature_list.push(feature.clone());
            }
        }
        Ok(feature_list)
    }
}
