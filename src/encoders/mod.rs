//! # Per-Method Encoder Adapters
//!
//! One adapter per encoding strategy, each normalizing its encoding math to a
//! common contract:
//!
//! - **OrdinalEncoder:** Maps each categorical value to one integer code, in first-seen order.
//! - **OneHotEncoder:** Expands each categorical column into indicator features for its
//!   top-N most frequent categories, plus an is-missing indicator when the fit data had nulls.
//! - **BinaryEncoder:** Composes an internal ordinal encoding with a fixed-width binary
//!   digit expansion of the code.
//! - **HashingEncoder:** Maps each value through a named hash function reduced modulo a
//!   configured number of output components.
//! - **TargetEncoder:** Maps each category to a smoothed average of a supervised target.
//! - **LeaveOneOutEncoder:** Like target encoding, but each training row's own label is
//!   excluded from its own code.
//!
//! Every adapter exposes an asynchronous `fit` (which collects category statistics from
//! a training DataFrame), a lazy synchronous `transform` (which rewrites the DataFrame's
//! logical plan with expressions derived from the frozen mappings), and
//! `encode_features_list` (which rewrites a feature list, wrapping each qualifying input
//! feature with a mapping-replay primitive). Errors from underlying DataFusion operations
//! are wrapped in the library's error type.

use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::Feature;
use crate::mapping::OrdinalMapping;
use arrow::array::Array;
use async_trait::async_trait;
use datafusion::common::DFSchema;
use datafusion::logical_expr::{col, Case as DFCase, Expr};
use datafusion::prelude::*;

pub mod binary;
pub mod hashing;
pub mod leave_one_out;
pub mod one_hot;
pub mod ordinal;
pub mod target;

pub use binary::BinaryEncoder;
pub use hashing::{HashMethod, HashingEncoder, DEFAULT_N_COMPONENTS};
pub use leave_one_out::LeaveOneOutEncoder;
pub use one_hot::{OneHotEncoder, DEFAULT_TOP_N};
pub use ordinal::OrdinalEncoder;
pub use target::TargetEncoder;

/// Common contract implemented by every per-method adapter.
///
/// An adapter is fit once; after fitting, `transform` may be called repeatedly
/// (the frozen mappings are read-only) and `encode_features_list` rewrites an
/// input feature list into the encoded output list.
#[async_trait]
pub trait CategoryEncoder {
    /// Registry name of the strategy this adapter implements.
    fn method_name(&self) -> &'static str;

    /// Learn the frozen mapping(s) from the training DataFrame. Supervised
    /// strategies require `target` to name a numeric column.
    async fn fit(&mut self, df: &DataFrame, target: Option<&str>) -> FeatureEncodingResult<()>;

    /// Apply the frozen mappings to a DataFrame, producing output columns named
    /// and ordered per the encoded feature list.
    fn transform(&self, df: DataFrame, features: &[Feature]) -> FeatureEncodingResult<DataFrame>;

    /// Rewrite a feature list, replacing each qualifying input feature with the
    /// feature(s) produced by its mapping-replay primitive. Expanded outputs
    /// appear contiguously at the original input's position.
    fn encode_features_list(&self, features: &[Feature]) -> FeatureEncodingResult<Vec<Feature>>;
}

/// Validates that a column exists in the DataFrame schema.
pub(crate) fn ensure_column(schema: &DFSchema, name: &str) -> FeatureEncodingResult<()> {
    if schema.field_with_name(None, name).is_err() {
        return Err(FeatureEncodingError::MissingColumn(format!(
            "Column '{}' not found in DataFrame",
            name
        )));
    }
    Ok(())
}

/// Validates that every column in `target_cols` exists in the DataFrame.
pub(crate) fn validate_columns(df: &DataFrame, target_cols: &[String]) -> FeatureEncodingResult<()> {
    for col_name in target_cols {
        ensure_column(df.schema(), col_name)?;
    }
    Ok(())
}

/// Resolve the set of columns an adapter encodes: the configured subset when
/// one was given (validated against the schema), otherwise every string-typed
/// column of the fit DataFrame, in schema order.
pub(crate) fn resolve_encode_columns(
    df: &DataFrame,
    configured: Option<&[String]>,
) -> FeatureEncodingResult<Vec<String>> {
    match configured {
        Some(cols) => {
            validate_columns(df, cols)?;
            Ok(cols.to_vec())
        }
        None => Ok(df
            .schema()
            .fields()
            .iter()
            .filter(|field| {
                matches!(
                    field.data_type(),
                    arrow::datatypes::DataType::Utf8
                        | arrow::datatypes::DataType::LargeUtf8
                        | arrow::datatypes::DataType::Utf8View
                )
            })
            .map(|field| field.name().to_string())
            .collect()),
    }
}

/// Collect a string column's values in row order. `None` marks a null entry.
pub(crate) async fn collect_string_column(
    df: &DataFrame,
    col_name: &str,
) -> FeatureEncodingResult<Vec<Option<String>>> {
    let batches = df
        .clone()
        .select(vec![col(col_name)])?
        .collect()
        .await
        .map_err(FeatureEncodingError::from)?;
    let mut values = Vec::new();
    for batch in batches {
        let array = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow::array::StringArray>()
            .ok_or_else(|| {
                FeatureEncodingError::DataFusionError(datafusion::error::DataFusionError::Plan(
                    format!("Expected Utf8 array for column {}", col_name),
                ))
            })?;
        for i in 0..array.len() {
            if array.is_null(i) {
                values.push(None);
            } else {
                values.push(Some(array.value(i).to_string()));
            }
        }
    }
    Ok(values)
}

/// Collect a string column together with a numeric target column, in row
/// order. The target must be a numeric column; it is cast to `Float64`.
pub(crate) async fn collect_string_and_target(
    df: &DataFrame,
    col_name: &str,
    target: &str,
) -> FeatureEncodingResult<Vec<(Option<String>, Option<f64>)>> {
    ensure_column(df.schema(), target)?;
    let target_type = df.schema().field_with_name(None, target)?.data_type();
    if !target_type.is_numeric() {
        return Err(FeatureEncodingError::InvalidParameter(format!(
            "target column '{}' must be numeric, found {}",
            target, target_type
        )));
    }
    let batches = df
        .clone()
        .select(vec![
            col(col_name),
            cast(col(target), arrow::datatypes::DataType::Float64),
        ])?
        .collect()
        .await
        .map_err(FeatureEncodingError::from)?;
    let mut pairs = Vec::new();
    for batch in batches {
        let cat_array = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow::array::StringArray>()
            .ok_or_else(|| {
                FeatureEncodingError::DataFusionError(datafusion::error::DataFusionError::Plan(
                    format!("Expected Utf8 array for column {}", col_name),
                ))
            })?;
        let target_array = batch
            .column(1)
            .as_any()
            .downcast_ref::<arrow::array::Float64Array>()
            .ok_or_else(|| {
                FeatureEncodingError::DataFusionError(datafusion::error::DataFusionError::Plan(
                    "Expected Float64 array".into(),
                ))
            })?;
        for i in 0..batch.num_rows() {
            let cat = if cat_array.is_null(i) {
                None
            } else {
                Some(cat_array.value(i).to_string())
            };
            let y = if target_array.is_null(i) {
                None
            } else {
                Some(target_array.value(i))
            };
            pairs.push((cat, y));
        }
    }
    Ok(pairs)
}

/// Assign first-seen ordinal codes, starting at 1. Null entries carry no code;
/// they resolve through the reserved missing code at lookup time.
pub(crate) fn first_seen_codes(values: &[Option<String>]) -> OrdinalMapping {
    let mut mapping = OrdinalMapping::new();
    let mut next = 1_i64;
    for value in values.iter().flatten() {
        if !mapping.contains_key(value) {
            mapping.insert(value.clone(), next);
            next += 1;
        }
    }
    mapping
}

/// Helper to build a CASE WHEN expression given a mapping from category strings to values.
/// For each pair, the expression generated is:
/// `WHEN <col> = lit(<category>) THEN lit(<encoded_value>)`
/// If provided, `missing` handles null inputs as the first branch, and `default`
/// is used as the ELSE branch.
pub(crate) fn build_case_expr<T: Clone + 'static + datafusion::logical_expr::Literal>(
    col_name: &str,
    mapping: &[(String, T)],
    missing: Option<Expr>,
    default: Option<Expr>,
) -> Expr {
    let mut when_then_expr: Vec<(Box<Expr>, Box<Expr>)> = Vec::new();
    if let Some(missing_expr) = missing {
        when_then_expr.push((Box::new(col(col_name).is_null()), Box::new(missing_expr)));
    }
    for (cat, val) in mapping {
        when_then_expr.push((
            Box::new(col(col_name).eq(lit(cat.clone()))),
            Box::new(lit(val.clone())),
        ));
    }
    Expr::Case(DFCase {
        expr: None,
        when_then_expr,
        else_expr: default.map(Box::new),
    })
}

/// Walk the encoded feature list and build the output projection: encoded
/// features contribute the expressions returned by `encode` (one per output
/// column), identity features pass through unchanged. Base columns are
/// validated against the DataFrame schema.
pub(crate) fn select_with_features<F>(
    df: DataFrame,
    features: &[Feature],
    mut encode: F,
) -> FeatureEncodingResult<DataFrame>
where
    F: FnMut(&Feature) -> FeatureEncodingResult<Option<Vec<Expr>>>,
{
    let mut exprs: Vec<Expr> = Vec::new();
    for feature in features {
        match encode(feature)? {
            Some(list) => {
                ensure_column(df.schema(), feature.base_column())?;
                exprs.extend(list);
            }
            None => {
                ensure_column(df.schema(), feature.name())?;
                exprs.push(col(feature.name()));
            }
        }
    }
    df.select(exprs).map_err(FeatureEncodingError::from)
}
