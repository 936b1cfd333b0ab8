//! ## Frozen Category Mappings
//!
//! This module defines the frozen mapping data captured by the per-method adapters
//! at fit time and replayed by the primitives at transform time. A mapping is an
//! ordered association from a raw categorical value to one or more numeric codes;
//! every value seen during fit has exactly one entry, and lookups for absent values
//! resolve through an explicit, strategy-specific fallback.
//!
//! Adapters own the mapping data they produce; primitives copy it on construction,
//! so a primitive stays valid after the adapter that produced it is discarded.

use indexmap::IndexMap;

/// Ordinal code assigned to values never seen at fit time.
pub const UNKNOWN_CODE: i64 = -1;

/// Ordinal code assigned to missing (null) values.
pub const MISSING_CODE: i64 = -2;

/// Ordered mapping from category value to ordinal code. Codes start at 1 in
/// first-seen order.
pub type OrdinalMapping = IndexMap<String, i64>;

/// Look up a value's ordinal code, resolving missing and unseen values to the
/// reserved fallback codes.
pub fn ordinal_code(mapping: &OrdinalMapping, value: Option<&str>) -> i64 {
    match value {
        None => MISSING_CODE,
        Some(v) => mapping.get(v).copied().unwrap_or(UNKNOWN_CODE),
    }
}

/// Fixed-width binary digit expansion of a set of ordinal codes.
///
/// The digit table maps each ordinal code to its digits, most-significant bit
/// first. Codes absent from the table (unseen or missing values) expand to
/// all-zero digits.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryMapping {
    n_bits: usize,
    codes: IndexMap<i64, Vec<u8>>,
}

impl BinaryMapping {
    /// Build the digit table for ordinal codes `1..=n_categories`. The width is
    /// the bit length of the highest code, with a minimum of one digit.
    pub fn from_cardinality(n_categories: usize) -> Self {
        let n_bits = bit_width(n_categories as u64);
        let codes = (1..=n_categories as i64)
            .map(|code| (code, to_digits(code as u64, n_bits)))
            .collect();
        Self { n_bits, codes }
    }

    /// Output arity of the expansion.
    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    /// Digits for one ordinal code, most-significant first. Codes outside the
    /// table resolve to all zeros.
    pub fn digits(&self, code: i64) -> Vec<u8> {
        self.codes
            .get(&code)
            .cloned()
            .unwrap_or_else(|| vec![0; self.n_bits])
    }

    /// The full digit table in code order.
    pub fn table(&self) -> &IndexMap<i64, Vec<u8>> {
        &self.codes
    }
}

/// Number of binary digits needed to represent `n`, with a minimum of one.
pub(crate) fn bit_width(n: u64) -> usize {
    if n == 0 {
        1
    } else {
        (64 - n.leading_zeros()) as usize
    }
}

fn to_digits(code: u64, n_bits: usize) -> Vec<u8> {
    (0..n_bits)
        .rev()
        .map(|bit| ((code >> bit) & 1) as u8)
        .collect()
}

/// Categories retained by a one-hot encoding of a single column, ranked by
/// descending fit-time frequency, plus whether the fit data contained nulls.
#[derive(Clone, Debug, PartialEq)]
pub struct OneHotMapping {
    pub categories: Vec<String>,
    pub has_missing: bool,
}

/// Smoothed target statistic per ordinal code, with the global prior used as
/// the fallback for unseen and missing values.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetMapping {
    pub values: IndexMap<i64, f64>,
    pub prior: f64,
}

impl TargetMapping {
    /// Statistic for one ordinal code, falling back to the prior.
    pub fn value(&self, code: i64) -> f64 {
        self.values.get(&code).copied().unwrap_or(self.prior)
    }
}

/// Per-category target sum and observation count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryStats {
    pub sum: f64,
    pub count: u64,
}

/// Per-category running aggregates for leave-one-out encoding, with the global
/// target mean as the fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct LeaveOneOutMapping {
    pub stats: IndexMap<String, CategoryStats>,
    pub global_mean: f64,
}

impl LeaveOneOutMapping {
    /// Out-of-sample code for a value: the plain `sum / count` ratio, with the
    /// global mean when the value is unseen or missing.
    pub fn out_of_sample(&self, value: Option<&str>) -> f64 {
        match value.and_then(|v| self.stats.get(v)) {
            Some(s) if s.count > 0 => s.sum / s.count as f64,
            _ => self.global_mean,
        }
    }

    /// In-sample code for a row: the category aggregate with the row's own
    /// label excluded. A category observed only once falls back to the global
    /// mean.
    pub fn leave_one_out(&self, value: Option<&str>, own_label: f64) -> f64 {
        match value.and_then(|v| self.stats.get(v)) {
            Some(s) if s.count > 1 => (s.sum - own_label) / (s.count - 1) as f64,
            _ => self.global_mean,
        }
    }
}

/// Frozen mapping for one encoded column, as returned by the facade's
/// `get_mapping`. Strategies composed with an internal ordinal sub-encoding
/// (binary, target) return that sub-mapping alongside their primary mapping.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnMapping {
    Ordinal(OrdinalMapping),
    OneHot(OneHotMapping),
    Binary {
        binary: BinaryMapping,
        ordinal: OrdinalMapping,
    },
    Target {
        target: TargetMapping,
        ordinal: OrdinalMapping,
    },
    LeaveOneOut(LeaveOneOutMapping),
}

/// Addresses an encoded column either by name or by its position among the
/// encoded columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl ColumnRef {
    /// Resolve the reference against the ordered list of encoded columns.
    pub fn resolve<'a>(&self, cols: &'a [String]) -> Option<&'a str> {
        match self {
            ColumnRef::Name(name) => cols.iter().find(|c| *c == name).map(|c| c.as_str()),
            ColumnRef::Index(i) => cols.get(*i).map(|c| c.as_str()),
        }
    }
}
