//! Binary encoding: an ordinal sub-encoding expanded into fixed-width binary digits.

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
use crate::mapping::{BinaryMapping, ColumnRef, OrdinalMapping};
use crate::primitives::BinaryEnc;

/// Maps each categorical value to several columns using binary encoding.
///
/// Internally composes a first-seen ordinal encoding (category to integer
/// code) with a fixed-width binary digit expansion of that code, most
/// significant digit first. The output arity is the bit length of the highest
/// ordinal code and stays constant across subsequent transforms. Unseen and
/// missing values expand to all-zero digits.
pub struct BinaryEncoder {
    cols: Option<Vec<String>>,
    ordinal: IndexMap<String, OrdinalMapping>,
    binary: IndexMap<String, BinaryMapping>,
}

impl BinaryEncoder {
    /// Create a new BinaryEncoder. `cols` restricts encoding to the named
    /// columns; `None` encodes every string-typed column of the fit data.
    pub fn new(cols: Option<Vec<String>>) -> Self {
        Self {
            cols,
            ordinal: IndexMap::new(),
            binary: IndexMap::new(),
        }
    }

    /// Names of the encoded columns, in encode order.
    pub fn encoded_columns(&self) -> Vec<String> {
        self.binary.keys().cloned().collect()
    }

    /// The frozen digit table and ordinal sub-mapping for one encoded column.
    pub fn get_mapping(
        &self,
        column: impl Into<ColumnRef>,
    ) -> FeatureEncodingResult<(&BinaryMapping, &OrdinalMapping)> {
        let cols = self.encoded_columns();
        let name = column.into().resolve(&cols).ok_or_else(|| {
            FeatureEncodingError::InvalidParameter("no mapping for the requested column".into())
        })?;
        Ok((&self.binary[name], &self.ordinal[name]))
    }
}

#[async_trait]
impl CategoryEncoder for BinaryEncoder {
    fn method_name(&self) -> &'static str {
        "binary"
    }

    async fn fit(&mut self, df: &DataFrame, _target: Option<&str>) -> FeatureEncodingResult<()> {
        self.ordinal.clear();
        self.binary.clear();
        for col_name in resolve_encode_columns(df, self.cols.as_deref())? {
            let values = collect_string_column(df, &col_name).await?;
            let ordinal = first_seen_codes(&values);
            let binary = BinaryMapping::from_cardinality(ordinal.len());
            debug!(
                column = %col_name,
                categories = ordinal.len(),
                n_bits = binary.n_bits(),
                "fitted binary mapping"
            );
            self.ordinal.insert(col_name.clone(), ordinal);
            self.binary.insert(col_name, binary);
        }
        Ok(())
    }

    fn transform(&self, df: DataFrame, features: &[Feature]) -> FeatureEncodingResult<DataFrame> {
        select_with_features(df, features, |feature| {
            let encoded = feature
                .primitive()
                .is_some_and(|p| p.name() == BinaryEnc::NAME);
            let (ordinal, binary) = match (
                self.ordinal.get(feature.base_column()),
                self.binary.get(feature.base_column()),
            ) {
                (Some(o), Some(b)) if encoded => (o, b),
                _ => return Ok(None),
            };
            let names = feature.feature_names();
            let exprs = (0..binary.n_bits())
                .map(|bit| {
                    let pairs: Vec<(String, i64)> = ordinal
                        .iter()
                        .map(|(cat, &code)| (cat.clone(), binary.digits(code)[bit] as i64))
                        .collect();
                    build_case_expr(
                        feature.base_column(),
                        &pairs,
                        Some(lit(0_i64)),
                        Some(lit(0_i64)),
                    )
                    .alias(&names[bit])
                })
                .collect();
            Ok(Some(exprs))
        })
    }

    fn encode_features_list(&self, features: &[Feature]) -> FeatureEncodingResult<Vec<Feature>> {
        let mut feature_list = Vec::with_capacity(features.len());
        for feature in features {
            if feature.is_identity() && self.binary.contains_key(feature.name()) {
                let primitive = BinaryEnc::from_mappings(
                    self.binary[feature.name()].clone(),
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
