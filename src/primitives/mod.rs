//! # Mapping-Replay Primitives
//!
//! One primitive per encoding strategy. Each is a small, immutable function
//! object: construction captures a frozen mapping (or frozen parameters) from
//! a fitted encoder, and [`crate::feature::TransformPrimitive::transform`]
//! replays that exact mapping against fresh raw values — no access to the
//! fit-time dataframe, no re-fitting.
//!
//! Primitives can be built two ways: from a fitted [`crate::encoder::Encoder`]
//! and a column reference (mirroring how a downstream consumer would re-encode
//! out-of-sample data), or directly from frozen mapping data (how the adapters
//! build them during `encode_features_list`).

pub mod binary_enc;
pub mod hashing_enc;
pub mod leave_one_out_enc;
pub mod one_hot_enc;
pub mod ordinal_enc;
pub mod target_enc;

pub use binary_enc::BinaryEnc;
pub use hashing_enc::HashingEnc;
pub use leave_one_out_enc::LeaveOneOutEnc;
pub use one_hot_enc::OneHotEnc;
pub use ordinal_enc::OrdinalEnc;
pub use target_enc::TargetEnc;
