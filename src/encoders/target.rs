//! Target encoding: each category becomes a smoothed average of a supervised target.

use std::sync::Arc;

use async_trait::async_trait;
use datafusion::prelude::*;
use indexmap::IndexMap;
use tracing::debug;

use crate::encoders::{
    build_case_expr, collect_string_and_target, resolve_encode_columns, select_with_features,
    CategoryEncoder,
};
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::Feature;
use crate::mapping::{ColumnRef, OrdinalMapping, TargetMapping};
use crate::primitives::TargetEnc;

/// Maps each categorical value to one column using target encoding.
///
/// Each category's code blends the category's target mean with the global
/// prior through a logistic smoothing weight: categories observed often sit
/// close to their own mean, rare ones close to the prior. Unseen and missing
/// values resolve to the prior. Composes an internal ordinal sub-encoding;
/// the primary mapping is keyed by ordinal code.
pub struct TargetEncoder {
    cols: Option<Vec<String>>,
    smoothing: f64,
    min_samples_leaf: f64,
    ordinal: IndexMap<String, OrdinalMapping>,
    mapping: IndexMap<String, TargetMapping>,
}

impl TargetEncoder {
    /// Create a new TargetEncoder with the default smoothing parameters.
    pub fn new(cols: Option<Vec<String>>) -> Self {
        Self {
            cols,
            smoothing: 1.0,
            min_samples_leaf: 1.0,
            ordinal: IndexMap::new(),
            mapping: IndexMap::new(),
        }
    }

    /// Override the smoothing bandwidth.
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Override the observation count at which the smoothing weight is 0.5.
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: f64) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Names of the encoded columns, in encode order.
    pub fn encoded_columns(&self) -> Vec<String> {
        self.mapping.keys().cloned().collect()
    }

    /// The frozen statistic table and ordinal sub-mapping for one encoded column.
    pub fn get_mapping(
        &self,
        column: impl Into<ColumnRef>,
    ) -> FeatureEncodingResult<(&TargetMapping, &OrdinalMapping)> {
        let cols = self.encoded_columns();
        let name = column.into().resolve(&cols).ok_or_else(|| {
            FeatureEncodingError::InvalidParameter("no mapping for the requested column".into())
        })?;
        Ok((&self.mapping[name], &self.ordinal[name]))
    }

    fn smoothing_weight(&self, count: u64) -> f64 {
        1.0 / (1.0 + (-(count as f64 - self.min_samples_leaf) / self.smoothing).exp())
    }
}

#[async_trait]
impl CategoryEncoder for TargetEncoder {
    fn method_name(&self) -> &'static str {
        "target"
    }

    async fn fit(&mut self, df: &DataFrame, target: Option<&str>) -> FeatureEncodingResult<()> {
        let target =
            target.ok_or_else(|| FeatureEncodingError::MissingTarget(self.method_name().into()))?;
        self.ordinal.clear();
        self.mapping.clear();
        for col_name in resolve_encode_columns(df, self.cols.as_deref())? {
            let pairs = collect_string_and_target(df, &col_name, target).await?;

            let mut ordinal = OrdinalMapping::new();
            let mut stats: IndexMap<i64, (f64, u64)> = IndexMap::new();
            let mut total_sum = 0.0;
            let mut total_count = 0_u64;
            let mut next_code = 1_i64;
            for (value, label) in &pairs {
                let Some(y) = label else { continue };
                total_sum += y;
                total_count += 1;
                let Some(v) = value else { continue };
                let code = *ordinal.entry(v.clone()).or_insert_with(|| {
                    let code = next_code;
                    next_code += 1;
                    code
                });
                let entry = stats.entry(code).or_insert((0.0, 0));
                entry.0 += y;
                entry.1 += 1;
            }
            if total_count == 0 {
                return Err(FeatureEncodingError::InvalidParameter(format!(
                    "cannot fit a target encoder on '{}': no labelled rows",
                    col_name
                )));
            }

            let prior = total_sum / total_count as f64;
            let values: IndexMap<i64, f64> = stats
                .into_iter()
                .map(|(code, (sum, count))| {
                    let weight = self.smoothing_weight(count);
                    let mean = sum / count as f64;
                    (code, prior * (1.0 - weight) + mean * weight)
                })
                .collect();
            debug!(column = %col_name, categories = ordinal.len(), prior, "fitted target mapping");
            self.ordinal.insert(col_name.clone(), ordinal);
            self.mapping.insert(col_name, TargetMapping { values, prior });
        }
        Ok(())
    }

    fn transform(&self, df: DataFrame, features: &[Feature]) -> FeatureEncodingResult<DataFrame> {
        select_with_features(df, features, |feature| {
            let encoded = feature
                .primitive()
                .is_some_and(|p| p.name() == TargetEnc::NAME);
            let (mapping, ordinal) = match (
                self.mapping.get(feature.base_column()),
                self.ordinal.get(feature.base_column()),
            ) {
                (Some(m), Some(o)) if encoded => (m, o),
                _ => return Ok(None),
            };
            let pairs: Vec<(String, f64)> = ordinal
                .iter()
                .map(|(cat, &code)| (cat.clone(), mapping.value(code)))
                .collect();
            Ok(Some(vec![build_case_expr(
                feature.base_column(),
                &pairs,
                Some(lit(mapping.prior)),
                Some(lit(mapping.prior)),
            )
            .alias(feature.name())]))
        })
    }

    fn encode_features_list(&self, features: &[Feature]) -> FeatureEncodingResult<Vec<Feature>> {
        let mut feature_list = Vec::with_capacity(features.len());
        for feature in features {
            if feature.is_identity() && self.mapping.contains_key(feature.name()) {
                let primitive = TargetEnc::from_mappings(
                    self.mapping[feature.name()].clone(),
                    self.ordinal[feature.name()].clone(),
                );
                feature_list.push(Feature::transformed(feature, Arc::new(primitive)));
            } else {
                feature_list.push(feature.clone());
            }
        }
        Ok(feature_list)
    }
}
