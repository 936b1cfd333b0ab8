//! ## Encoder Facade
//!
//! The [`Encoder`] selects an encoding strategy — by name from a closed
//! registry, or by pre-configured adapter instance — and owns the
//! fit/transform lifecycle together with the rewritten list of output
//! features. All strategy dispatch is a single match over the
//! [`EncoderMethod`] tag.
//!
//! ### Example
//!
//! ```rust,no_run
//! use feature_encoding::encoder::Encoder;
//! use feature_encoding::feature::Feature;
//! # use datafusion::prelude::DataFrame;
//! # async fn demo(df: DataFrame) -> feature_encoding::exceptions::FeatureEncodingResult<()> {
//! let features = vec![Feature::new("product_id"), Feature::new("value")];
//! let mut enc = Encoder::new("binary", Some(vec!["product_id".into()]))?;
//! let encoded = enc.fit_transform(&df, &features, None).await?;
//! let (digit_table, ordinal) = match enc.get_mapping("product_id")? {
//!     feature_encoding::mapping::ColumnMapping::Binary { binary, ordinal } => (binary, ordinal),
//!     _ => unreachable!(),
//! };
//! # let _ = (encoded, digit_table, ordinal);
//! # Ok(())
//! # }
//! ```

use datafusion::prelude::*;
use tracing::debug;

use crate::encoders::{
    BinaryEncoder, CategoryEncoder, HashMethod, HashingEncoder, LeaveOneOutEncoder, OneHotEncoder,
    OrdinalEncoder, TargetEncoder,
};
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::Feature;
use crate::mapping::{ColumnMapping, ColumnRef};

/// Registry of encoder method names accepted by [`Encoder::new`].
pub const METHOD_NAMES: [&str; 6] = [
    "ordinal",
    "one_hot",
    "binary",
    "hashing",
    "target",
    "leave_one_out",
];

/// Closed set of encoding strategies, each variant carrying its adapter.
pub enum EncoderMethod {
    Ordinal(OrdinalEncoder),
    OneHot(OneHotEncoder),
    Binary(BinaryEncoder),
    Hashing(HashingEncoder),
    Target(TargetEncoder),
    LeaveOneOut(LeaveOneOutEncoder),
}

impl EncoderMethod {
    /// Build an adapter with default parameters from a registry name.
    pub fn from_name(name: &str, to_encode: Option<Vec<String>>) -> FeatureEncodingResult<Self> {
        match name {
            "ordinal" => Ok(EncoderMethod::Ordinal(OrdinalEncoder::new(to_encode))),
            "one_hot" => Ok(EncoderMethod::OneHot(OneHotEncoder::new(to_encode))),
            "binary" => Ok(EncoderMethod::Binary(BinaryEncoder::new(to_encode))),
            "hashing" => Ok(EncoderMethod::Hashing(HashingEncoder::new(to_encode))),
            "target" => Ok(EncoderMethod::Target(TargetEncoder::new(to_encode))),
            "leave_one_out" => Ok(EncoderMethod::LeaveOneOut(LeaveOneOutEncoder::new(
                to_encode,
            ))),
            _ => Err(FeatureEncodingError::UnknownMethod {
                name: name.to_string(),
                valid: METHOD_NAMES.join(", "),
            }),
        }
    }

    /// Registry name of the strategy.
    pub fn name(&self) -> &'static str {
        self.as_encoder().method_name()
    }

    fn as_encoder(&self) -> &dyn CategoryEncoder {
        match self {
            EncoderMethod::Ordinal(adapter) => adapter,
            EncoderMethod::OneHot(adapter) => adapter,
            EncoderMethod::Binary(adapter) => adapter,
            EncoderMethod::Hashing(adapter) => adapter,
            EncoderMethod::Target(adapter) => adapter,
            EncoderMethod::LeaveOneOut(adapter) => adapter,
        }
    }

    fn as_encoder_mut(&mut self) -> &mut dyn CategoryEncoder {
        match self {
            EncoderMethod::Ordinal(adapter) => adapter,
            EncoderMethod::OneHot(adapter) => adapter,
            EncoderMethod::Binary(adapter) => adapter,
            EncoderMethod::Hashing(adapter) => adapter,
            EncoderMethod::Target(adapter) => adapter,
            EncoderMethod::LeaveOneOut(adapter) => adapter,
        }
    }
}

/// Encodes specified columns of categorical values and rewrites the feature
/// list accordingly.
///
/// The facade is fit once; after fitting, `transform` may be called repeatedly
/// and concurrently from multiple readers, since the frozen mappings are
/// read-only.
pub struct Encoder {
    method: EncoderMethod,
    features: Vec<Feature>,
    fitted: bool,
}

impl Encoder {
    /// Create an encoder for the named strategy. `to_encode` restricts
    /// encoding to the listed columns; `None` encodes every string-typed
    /// column of the fit data. Unknown names fail with a configuration error
    /// naming the valid set.
    pub fn new(method: &str, to_encode: Option<Vec<String>>) -> FeatureEncodingResult<Self> {
        Ok(Self::from_method(EncoderMethod::from_name(
            method, to_encode,
        )?))
    }

    /// Create an encoder from a pre-configured adapter instance.
    pub fn from_method(method: EncoderMethod) -> Self {
        Self {
            method,
            features: Vec::new(),
            fitted: false,
        }
    }

    /// Registry name of the selected strategy.
    pub fn method_name(&self) -> &'static str {
        self.method.name()
    }

    /// The selected strategy and its adapter.
    pub fn method(&self) -> &EncoderMethod {
        &self.method
    }

    /// Fit the selected adapter to the data and rewrite the feature list.
    /// Supervised strategies (target, leave-one-out) require `target` to name
    /// a numeric column of `df`.
    pub async fn fit(
        &mut self,
        df: &DataFrame,
        features: &[Feature],
        target: Option<&str>,
    ) -> FeatureEncodingResult<()> {
        debug!(method = self.method_name(), "fitting encoder");
        self.method.as_encoder_mut().fit(df, target).await?;
        self.features = self.method.as_encoder().encode_features_list(features)?;
        self.fitted = true;
        Ok(())
    }

    /// Encode a DataFrame using the frozen mappings. Output columns are named
    /// and ordered per [`Encoder::get_features`]; inputs expanded into several
    /// outputs appear contiguously at the original input's position.
    pub fn transform(&self, df: DataFrame) -> FeatureEncodingResult<DataFrame> {
        if !self.fitted {
            return Err(FeatureEncodingError::FitNotCalled);
        }
        self.method.as_encoder().transform(df, &self.features)
    }

    /// Fit, then transform. For leave-one-out encoding the two steps fuse
    /// into the leakage-free in-sample path, where each training row's own
    /// label is excluded from its own code.
    pub async fn fit_transform(
        &mut self,
        df: &DataFrame,
        features: &[Feature],
        target: Option<&str>,
    ) -> FeatureEncodingResult<DataFrame> {
        self.fit(df, features, target).await?;
        match &self.method {
            EncoderMethod::LeaveOneOut(adapter) => {
                adapter.transform_training(df.clone(), &self.features)
            }
            _ => self.transform(df.clone()),
        }
    }

    /// The feature list as rewritten by the last fit, in output order.
    pub fn get_features(&self) -> &[Feature] {
        &self.features
    }

    /// The frozen mapping for one encoded column, addressed by name or by
    /// position among the encoded columns. Strategies composed with an
    /// ordinal sub-encoding return that sub-mapping alongside. The hashing
    /// strategy has no mapping.
    pub fn get_mapping(&self, column: impl Into<ColumnRef>) -> FeatureEncodingResult<ColumnMapping> {
        if !self.fitted {
            return Err(FeatureEncodingError::FitNotCalled);
        }
        match &self.method {
            EncoderMethod::Ordinal(adapter) => Ok(ColumnMapping::Ordinal(
                adapter.get_mapping(column)?.clone(),
            )),
            EncoderMethod::OneHot(adapter) => {
                Ok(ColumnMapping::OneHot(adapter.get_mapping(column)?.clone()))
            }
            EncoderMethod::Binary(adapter) => {
                let (binary, ordinal) = adapter.get_mapping(column)?;
                Ok(ColumnMapping::Binary {
                    binary: binary.clone(),
                    ordinal: ordinal.clone(),
                })
            }
            EncoderMethod::Target(adapter) => {
                let (target, ordinal) = adapter.get_mapping(column)?;
                Ok(ColumnMapping::Target {
                    target: target.clone(),
                    ordinal: ordinal.clone(),
                })
            }
            EncoderMethod::LeaveOneOut(adapter) => Ok(ColumnMapping::LeaveOneOut(
                adapter.get_mapping(column)?.clone(),
            )),
            EncoderMethod::Hashing(_) => Err(FeatureEncodingError::MethodMismatch(
                "the hashing encoder has no frozen mapping; use get_hash_method and get_n_components"
                    .into(),
            )),
        }
    }

    /// The hash method of a hashing encoder. Fails on any other strategy.
    pub fn get_hash_method(&self) -> FeatureEncodingResult<HashMethod> {
        match &self.method {
            EncoderMethod::Hashing(adapter) => Ok(adapter.hash_method()),
            _ => Err(FeatureEncodingError::MethodMismatch(
                "must be a hashing encoder".into(),
            )),
        }
    }

    /// The number of output components of a hashing encoder. Fails on any
    /// other strategy.
    pub fn get_n_components(&self) -> FeatureEncodingResult<usize> {
        match &self.method {
            EncoderMethod::Hashing(adapter) => Ok(adapter.n_components()),
            _ => Err(FeatureEncodingError::MethodMismatch(
                "must be a hashing encoder".into(),
            )),
        }
    }
}
