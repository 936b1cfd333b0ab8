//! ## Feature Handles and the Transform Primitive Contract
//!
//! This module provides the host-framework-facing surface of the library:
//!
//! - The [`TransformPrimitive`] trait is the contract every mapping-replay primitive
//!   implements: a stable primitive name, an output arity, a name-generation rule,
//!   and a pure `transform` over raw categorical values.
//! - The [`Feature`] struct is a named handle to a column-producing computation.
//!   An *identity* feature names a raw dataframe column; an *encoded* feature wraps
//!   exactly one base feature together with a replay primitive.
//!
//! Encoded features with more than one output column expand their names as
//! `NAME__0 .. NAME__{n-1}`, and equality between features is structural (base
//! column, primitive name, output arity) rather than based on incidental name
//! strings.

use std::fmt;
use std::sync::Arc;

/// Contract for mapping-replay primitives.
///
/// A primitive is immutable once constructed: it captures a frozen mapping (or
/// frozen parameters) and replays it against arbitrary sequences of raw
/// categorical values. `transform` returns the encoded output column-major:
/// one inner `Vec<f64>` per output column, each of the input's length.
pub trait TransformPrimitive: fmt::Debug + Send + Sync {
    /// Stable name of the primitive (e.g. `"ordinal_enc"`).
    fn name(&self) -> &'static str;

    /// Number of output columns this primitive produces. Defaults to one.
    fn number_output_features(&self) -> usize {
        1
    }

    /// Combine the upstream feature's name with the strategy's short tag.
    fn generate_name(&self, base_feature_names: &[&str]) -> String;

    /// Apply the frozen mapping to a sequence of raw values. `None` marks a
    /// missing (null) input value.
    fn transform(&self, values: &[Option<&str>]) -> Vec<Vec<f64>>;

    /// Downcasting hook for adapters that need to recover a primitive's
    /// frozen parameters from a feature list.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// A named, orderable handle to a column-producing computation.
#[derive(Clone, Debug)]
pub struct Feature {
    name: String,
    base: Option<String>,
    primitive: Option<Arc<dyn TransformPrimitive>>,
}

impl Feature {
    /// Create an identity feature for a raw dataframe column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            primitive: None,
        }
    }

    /// Create an encoded feature by wrapping a base feature with a replay
    /// primitive. The new feature's name is produced by the primitive's
    /// name-generation rule.
    pub fn transformed(base: &Feature, primitive: Arc<dyn TransformPrimitive>) -> Self {
        let name = primitive.generate_name(&[base.name()]);
        Self {
            name,
            base: Some(base.base_column().to_string()),
            primitive: Some(primitive),
        }
    }

    /// The feature's own name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw dataframe column this feature ultimately reads.
    pub fn base_column(&self) -> &str {
        self.base.as_deref().unwrap_or(&self.name)
    }

    /// Number of output columns this feature produces.
    pub fn number_output_features(&self) -> usize {
        self.primitive
            .as_ref()
            .map_or(1, |p| p.number_output_features())
    }

    /// The flat list of output column names. Multi-output features expand as
    /// `NAME__0 .. NAME__{n-1}`.
    pub fn feature_names(&self) -> Vec<String> {
        let n = self.number_output_features();
        if n == 1 {
            vec![self.name.clone()]
        } else {
            (0..n).map(|i| format!("{}__{}", self.name, i)).collect()
        }
    }

    /// The replay primitive backing this feature, if it is an encoded feature.
    pub fn primitive(&self) -> Option<&Arc<dyn TransformPrimitive>> {
        self.primitive.as_ref()
    }

    /// True if this feature is a plain reference to a raw column.
    pub fn is_identity(&self) -> bool {
        self.primitive.is_none()
    }
}

impl PartialEq for Feature {
    /// Structural identity: same base column, same primitive (by name), and
    /// same output arity. Name strings are derived and not compared directly
    /// except for identity features, where the name is the identity.
    fn eq(&self, other: &Self) -> bool {
        self.base_column() == other.base_column()
            && self.name == other.name
            && self.number_output_features() == other.number_output_features()
            && self.primitive.as_ref().map(|p| p.name())
                == other.primitive.as_ref().map(|p| p.name())
    }
}

impl Eq for Feature {}
