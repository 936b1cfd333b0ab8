//! # Feature Encoding
//!
//! Feature Encoding is a library of categorical-variable encoders that represent
//! encoded columns as named, composable *features* rather than anonymous dataframe
//! columns. It is built on top of [Apache DataFusion](https://datafusion.apache.org/)
//! and [Apache Arrow](https://arrow.apache.org/).
//!
//! The library is organized in three layers:
//!
//! - [`encoder::Encoder`]: the facade. Selects an encoding strategy by name (from a
//!   closed registry) or by adapter instance, owns the fit/transform lifecycle, and
//!   owns the rewritten list of output features.
//! - [`encoders`]: one adapter per strategy (ordinal, one-hot, binary, hashing,
//!   target, leave-one-out), each exposing the same
//!   `fit / transform / encode_features_list / get_mapping` contract.
//! - [`primitives`]: mapping-replay primitives. Each is an immutable function object
//!   built from a frozen mapping captured at fit time, and can re-encode fresh raw
//!   values without access to the original dataframe.
//!
//! Fitting is asynchronous (it executes DataFusion queries to collect category
//! statistics); transforming is synchronous and lazy, rewriting the DataFrame's
//! logical plan with `CASE WHEN` expressions derived from the frozen mappings.
//!
//! ### Example
//!
//! ```rust,no_run
//! use feature_encoding::encoder::Encoder;
//! use feature_encoding::feature::Feature;
//! # use datafusion::prelude::DataFrame;
//! # async fn demo(df: DataFrame) -> feature_encoding::exceptions::FeatureEncodingResult<()> {
//! let features = vec![Feature::new("product_id"), Feature::new("value")];
//! let mut enc = Encoder::new("ordinal", Some(vec!["product_id".into()]))?;
//! enc.fit(&df, &features, None).await?;
//! let encoded = enc.transform(df)?;
//! let replay = enc.get_features();
//! # let _ = (encoded, replay);
//! # Ok(())
//! # }
//! ```

pub mod encoder;
pub mod encoders;
pub mod exceptions;
pub mod feature;
pub mod logging;
pub mod mapping;
pub mod primitives;
