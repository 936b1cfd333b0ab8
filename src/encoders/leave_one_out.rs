//! Leave-one-out encoding: target statistics that exclude each training row's own label.

use std::sync::Arc;

use arrow::datatypes::DataType;
use async_trait::async_trait;
use datafusion::logical_expr::{Case as DFCase, Expr};
use datafusion::prelude::*;
use indexmap::IndexMap;
use tracing::debug;

use crate::encoders::{
    build_case_expr, collect_string_and_target, ensure_column, resolve_encode_columns,
    select_with_features, CategoryEncoder,
};
use crate::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use crate::feature::Feature;
use crate::mapping::{CategoryStats, ColumnRef, LeaveOneOutMapping};
use crate::primitives::LeaveOneOutEnc;

/// Maps each categorical value to one column using leave-one-out encoding.
///
/// Fitting stores a per-category running sum and count plus the global target
/// mean. Out-of-sample transforms use the plain `sum / count` ratio with the
/// global mean for unseen or missing values. The in-sample path
/// ([`LeaveOneOutEncoder::transform_training`]) excludes each row's own label
/// from its own code; a category observed only once falls back to the global
/// mean.
pub struct LeaveOneOutEncoder {
    cols: Option<Vec<String>>,
    target: Option<String>,
    mapping: IndexMap<String, LeaveOneOutMapping>,
}

impl LeaveOneOutEncoder {
    /// Create a new LeaveOneOutEncoder. `cols` restricts encoding to the named
    /// columns; `None` encodes every string-typed column of the fit data.
    pub fn new(cols: Option<Vec<String>>) -> Self {
        Self {
            cols,
            target: None,
            mapping: IndexMap::new(),
        }
    }

    /// Names of the encoded columns, in encode order.
    pub fn encoded_columns(&self) -> Vec<String> {
        self.mapping.keys().cloned().collect()
    }

    /// The frozen per-category aggregates for one encoded column.
    pub fn get_mapping(
        &self,
        column: impl Into<ColumnRef>,
    ) -> FeatureEncodingResult<&LeaveOneOutMapping> {
        let cols = self.encoded_columns();
        let name = column.into().resolve(&cols).ok_or_else(|| {
            FeatureEncodingError::InvalidParameter("no mapping for the requested column".into())
        })?;
        Ok(&self.mapping[name])
    }

    /// In-sample transform over the fit data: each row's own label is excluded
    /// from its own code, preventing leakage. Requires the target column the
    /// encoder was fit with to be present in `df`.
    pub fn transform_training(
        &self,
        df: DataFrame,
        features: &[Feature],
    ) -> FeatureEncodingResult<DataFrame> {
        let target = self
            .target
            .clone()
            .ok_or(FeatureEncodingError::FitNotCalled)?;
        ensure_column(df.schema(), &target)?;
        let own_label = cast(col(&target), DataType::Float64);
        select_with_features(df, features, |feature| {
            let mapping = match self.encoded_mapping(feature) {
                Some(m) => m,
                None => return Ok(None),
            };
            let mut when_then_expr: Vec<(Box<Expr>, Box<Expr>)> = vec![(
                Box::new(col(feature.base_column()).is_null()),
                Box::new(lit(mapping.global_mean)),
            )];
            for (cat, stats) in &mapping.stats {
                let code = if stats.count > 1 {
                    (lit(stats.sum) - own_label.clone()) / lit((stats.count - 1) as f64)
                } else {
                    lit(mapping.global_mean)
                };
                when_then_expr.push((
                    Box::new(col(feature.base_column()).eq(lit(cat.clone()))),
                    Box::new(code),
                ));
            }
            Ok(Some(vec![Expr::Case(DFCase {
                expr: None,
                when_then_expr,
                else_expr: Some(Box::new(lit(mapping.global_mean))),
            })
            .alias(feature.name())]))
        })
    }

    fn encoded_mapping(&self, feature: &Feature) -> Option<&LeaveOneOutMapping> {
        let encoded = feature
            .primitive()
            .is_some_and(|p| p.name() == LeaveOneOutEnc::NAME);
        if encoded {
            self.mapping.get(feature.base_column())
        } else {
            None
        }
    }
}

#[async_trait]
impl CategoryEncoder for LeaveOneOutEncoder {
    fn method_name(&self) -> &'static str {
        "leave_one_out"
    }

    async fn fit(&mut self, df: &DataFrame, target: Option<&str>) -> FeatureEncodingResult<()> {
        let target =
            target.ok_or_else(|| FeatureEncodingError::MissingTarget(self.method_name().into()))?;
        self.mapping.clear();
        for col_name in resolve_encode_columns(df, self.cols.as_deref())? {
            let pairs = collect_string_and_target(df, &col_name, target).await?;

            let mut stats: IndexMap<String, CategoryStats> = IndexMap::new();
            let mut total_sum = 0.0;
            let mut total_count = 0_u64;
            for (value, label) in &pairs {
                let Some(y) = label else { continue };
                total_sum += y;
                total_count += 1;
                let Some(v) = value else { continue };
                let entry = stats
                    .entry(v.clone())
                    .or_insert(CategoryStats { sum: 0.0, count: 0 });
                entry.sum += y;
                entry.count += 1;
            }
            if total_count == 0 {
                return Err(FeatureEncodingError::InvalidParameter(format!(
                    "cannot fit a leave-one-out encoder on '{}': no labelled rows",
                    col_name
                )));
            }
            let global_mean = total_sum / total_count as f64;
            debug!(column = %col_name, categories = stats.len(), global_mean, "fitted leave-one-out mapping");
            self.mapping
                .insert(col_name, LeaveOneOutMapping { stats, global_mean });
        }
        self.target = Some(target.to_string());
        Ok(())
    }

    fn transform(&self, df: DataFrame, features: &[Feature]) -> FeatureEncodingResult<DataFrame> {
        select_with_features(df, features, |feature| {
            let mapping = match self.encoded_mapping(feature) {
                Some(m) => m,
                None => return Ok(None),
            };
            let pairs: Vec<(String, f64)> = mapping
                .stats
                .iter()
                .map(|(cat, stats)| (cat.clone(), stats.sum / stats.count as f64))
                .collect();
            Ok(Some(vec![build_case_expr(
                feature.base_column(),
                &pairs,
                Some(lit(mapping.global_mean)),
                Some(lit(mapping.global_mean)),
            )
            .alias(feature.name())]))
        })
    }

    fn encode_features_list(&self, features: &[Feature]) -> FeatureEncodingResult<Vec<Feature>> {
        let mut feature_list = Vec::with_capacity(features.len());
        for feature in features {
            if feature.is_identity() && self.mapping.contains_key(feature.name()) {
                let primitive =
                    LeaveOneOutEnc::from_mapping(self.mapping[feature.name()].clone());
                feature_list.push(Feature::transformed(feature, Arc::new(primitive)));
            } else {
                feature_list.push(feature.clone());
            }
        }
        Ok(feature_list)
    }
}
