//! One-hot encoding over the top-N most frequent categories per column.

use std::sync::Arc;

use async_trait::async_trait;
use datafusion::logical_expr::{Case as DFCase, Expr};
use datafusion::prelude::*;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::encoders::{
    collect_string_column, resolve_encode_columns, select_with_features, CategoryEncoder,
};
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::Feature;
use crate::mapping::{ColumnRef, OneHotMapping};
use crate::primitives::OneHotEnc;

/// Default number of most-frequent categories retained per column.
pub const DEFAULT_TOP_N: usize = 10;

/// Expands each categorical column into indicator features, one per retained
/// category plus an is-missing indicator when the fit data contained nulls.
///
/// Category retention is limited to the `top_n` most frequent values of the
/// fit data (ties break in first-seen order). The is-missing indicator fires
/// only for genuine nulls; an unseen non-null category yields an all-zero row.
pub struct OneHotEncoder {
    cols: Option<Vec<String>>,
    top_n: usize,
    /// Retained categories and missing-flag state per encoded column.
    mapping: IndexMap<String, OneHotMapping>,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder with the default top-N cutoff.
    pub fn new(cols: Option<Vec<String>>) -> Self {
        Self {
            cols,
            top_n: DEFAULT_TOP_N,
            mapping: IndexMap::new(),
        }
    }

    /// Override the number of categories retained per column.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Names of the encoded columns, in encode order.
    pub fn encoded_columns(&self) -> Vec<String> {
        self.mapping.keys().cloned().collect()
    }

    /// The frozen mapping for one encoded column.
    pub fn get_mapping(&self, column: impl Into<ColumnRef>) -> FeatureEncodingResult<&OneHotMapping> {
        let cols = self.encoded_columns();
        let name = column.into().resolve(&cols).ok_or_else(|| {
            FeatureEncodingError::InvalidParameter("no mapping for the requested column".into())
        })?;
        Ok(&self.mapping[name])
    }

    fn indicator_expr(col_name: &str, value: Option<&str>, alias: &str) -> Expr {
        let when = match value {
            Some(v) => col(col_name).eq(lit(v.to_string())),
            None => col(col_name).is_null(),
        };
        Expr::Case(DFCase {
            expr: None,
            when_then_expr: vec![(Box::new(when), Box::new(lit(1_i32)))],
            else_expr: Some(Box::new(lit(0_i32))),
        })
        .alias(alias)
    }
}

#[async_trait]
impl CategoryEncoder for OneHotEncoder {
    fn method_name(&self) -> &'static str {
        "one_hot"
    }

    async fn fit(&mut self, df: &DataFrame, _target: Option<&str>) -> FeatureEncodingResult<()> {
        self.mapping.clear();
        for col_name in resolve_encode_columns(df, self.cols.as_deref())? {
            let values = collect_string_column(df, &col_name).await?;
            let mut counts: IndexMap<String, u64> = IndexMap::new();
            let mut has_missing = false;
            for value in &values {
                match value {
                    Some(v) => *counts.entry(v.clone()).or_insert(0) += 1,
                    None => has_missing = true,
                }
            }
            // Stable sort keeps first-seen order among equally frequent values.
            let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            let categories: Vec<String> = ranked
                .into_iter()
                .take(self.top_n)
                .map(|(cat, _)| cat)
                .collect();
            debug!(
                column = %col_name,
                retained = categories.len(),
                has_missing,
                "fitted one-hot mapping"
            );
            self.mapping.insert(
                col_name,
                OneHotMapping {
                    categories,
                    has_missing,
                },
            );
        }
        Ok(())
    }

    fn transform(&self, df: DataFrame, features: &[Feature]) -> FeatureEncodingResult<DataFrame> {
        select_with_features(df, features, |feature| {
            let primitive = match feature.primitive() {
                Some(p) if p.name() == OneHotEnc::NAME => p,
                _ => return Ok(None),
            };
            if !self.mapping.contains_key(feature.base_column()) {
                return Ok(None);
            }
            let enc = primitive
                .as_any()
                .downcast_ref::<OneHotEnc>()
                .ok_or_else(|| {
                    FeatureEncodingError::InvalidParameter(
                        "one-hot feature carries a foreign primitive".into(),
                    )
                })?;
            Ok(Some(vec![Self::indicator_expr(
                feature.base_column(),
                enc.value(),
                feature.name(),
            )]))
        })
    }

    fn encode_features_list(&self, features: &[Feature]) -> FeatureEncodingResult<Vec<Feature>> {
        let mut feature_list = Vec::new();
        for feature in features {
            match self.mapping.get(feature.name()) {
                Some(mapping) => {
                    if feature.number_output_features() > 1 {
                        warn!(
                            feature = %feature.name(),
                            "one-hot encoding is not well-defined over a multi-output input; \
                             proceeding against its base column"
                        );
                    }
                    for cat in &mapping.categories {
                        let primitive = OneHotEnc::new(Some(cat.clone()));
                        feature_list.push(Feature::transformed(feature, Arc::new(primitive)));
                    }
                    if mapping.has_missing {
                        let primitive = OneHotEnc::new(None);
                        feature_list.push(Feature::transformed(feature, Arc::new(primitive)));
                    }
                }
                None => feature_list.push(feature.clone()),
            }
        }
        Ok(feature_list)
    }
}
