//! Core definitions (errors, results and validation macros), relied upon by all fielddata-* crates.

pub mod error;
pub mod result;

pub use result::Result;

/// Identifier of a document within a single index segment, in `[0, max_doc)`.
pub type DocId = u32;

/// Index into a field's value buffer. Ordinal `0` is reserved for "no value".
pub type Ordinal = u32;

/// The ordinal that never denotes a real value.
pub const NULL_ORDINAL: Ordinal = 0;
