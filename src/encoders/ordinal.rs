//! Ordinal encoding: each distinct category becomes one integer code.

use std::sync::Arc;

use async_trait::async_trait;
use datafusion::prelude::*;
use indexmap::IndexMap;
use tracing::debug;

use crate::encoders::{
    build_case_expr, collect_string_column, first_seen_codes, resolve_encode_columns,
    select_with_features, CategoryEncoder,
};
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::Feature;
use crate::mapping::{ColumnRef, OrdinalMapping, MISSING_CODE, UNKNOWN_CODE};
use crate::primitives::OrdinalEnc;

/// Maps each categorical value to one column using ordinal encoding.
///
/// Codes are assigned in first-seen order starting at 1. Values unseen at fit
/// time resolve to [`UNKNOWN_CODE`] and nulls to [`MISSING_CODE`].
pub struct OrdinalEncoder {
    cols: Option<Vec<String>>,
    /// Frozen mapping per encoded column, in encode order.
    mapping: IndexMap<String, OrdinalMapping>,
}

impl OrdinalEncoder {
    /// Create a new OrdinalEncoder. `cols` restricts encoding to the named
    /// columns; `None` encodes every string-typed column of the fit data.
    pub fn new(cols: Option<Vec<String>>) -> Self {
        Self {
            cols,
            mapping: IndexMap::new(),
        }
    }

    /// Names of the encoded columns, in encode order.
    pub fn encoded_columns(&self) -> Vec<String> {
        self.mapping.keys().cloned().collect()
    }

    /// The frozen mapping for one encoded column, addressed by name or by
    /// position among the encoded columns.
    pub fn get_mapping(&self, column: impl Into<ColumnRef>) -> FeatureEncodingResult<&OrdinalMapping> {
        let cols = self.encoded_columns();
        let name = column.into().resolve(&cols).ok_or_else(|| {
            FeatureEncodingError::InvalidParameter("no mapping for the requested column".into())
        })?;
        Ok(&self.mapping[name])
    }
}

#[async_trait]
impl CategoryEncoder for OrdinalEncoder {
    fn method_name(&self) -> &'static str {
        "ordinal"
    }

    async fn fit(&mut self, df: &DataFrame, _target: Option<&str>) -> FeatureEncodingResult<()> {
        self.mapping.clear();
        for col_name in resolve_encode_columns(df, self.cols.as_deref())? {
            let values = collect_string_column(df, &col_name).await?;
            let mapping = first_seen_codes(&values);
            debug!(column = %col_name, categories = mapping.len(), "fitted ordinal mapping");
            self.mapping.insert(col_name, mapping);
        }
        Ok(())
    }

    fn transform(&self, df: DataFrame, features: &[Feature]) -> FeatureEncodingResult<DataFrame> {
        select_with_features(df, features, |feature| {
            let encoded = feature
                .primitive()
                .is_some_and(|p| p.name() == OrdinalEnc::NAME);
            match self.mapping.get(feature.base_column()) {
                Some(mapping) if encoded => {
                    let pairs: Vec<(String, i64)> =
                        mapping.iter().map(|(k, &v)| (k.clone(), v)).collect();
                    Ok(Some(vec![build_case_expr(
                        feature.base_column(),
                        &pairs,
                        Some(lit(MISSING_CODE)),
                        Some(lit(UNKNOWN_CODE)),
                    )
                    .alias(feature.name())]))
                }
                _ => Ok(None),
            }
        })
    }

    fn encode_features_list(&self, features: &[Feature]) -> FeatureEncodingResult<Vec<Feature>> {
        let mut feature_list = Vec::with_capacity(features.len());
        for feature in features {
            if feature.is_identity() && self.mapping.contains_key(feature.name()) {
                let primitive = OrdinalEnc::from_mapping(self.mapping[feature.name()].clone());
                feature_list.push(Feature::transformed(feature, Arc::new(primitive)));
            } else {
                feature_list.push(feature.clone());
            }
        }
        Ok(feature_list)
    }
}
