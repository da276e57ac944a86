//! The read contract shared by all loaded field data.

use std::fmt;

use fielddata_common::{DocId, Result};
use serde::{Deserialize, Serialize};

/// The value type a field data instance was loaded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDataType {
    /// Latitude/longitude pairs indexed as `"<lat>,<lon>"` terms.
    GeoPoint,
}

impl FieldDataType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldDataType::GeoPoint => "geo_point",
        }
    }
}

impl fmt::Display for FieldDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-document access to the values of one field in one segment.
///
/// Implementations are immutable once loaded and are shared between threads
/// (`Send + Sync`). Document identifiers are in `[0, max_doc)`; accessors
/// panic for identifiers outside of that range, as slice indexing does.
pub trait FieldData: Send + Sync {
    /// The decoded value type.
    type Value: Copy;

    fn field_name(&self) -> &str;

    fn field_type(&self) -> FieldDataType;

    /// Number of document slots of the segment the field was loaded from.
    fn max_doc(&self) -> DocId;

    /// Whether any document carries more than one value.
    fn is_multi_valued(&self) -> bool;

    fn has_value(&self, doc: DocId) -> bool;

    /// The first (for single-valued fields, the only) value of `doc`.
    fn value(&self, doc: DocId) -> Option<Self::Value>;

    /// Number of distinct values loaded for the field.
    fn value_count(&self) -> usize;

    /// String form of the first value of `doc`.
    ///
    /// Fails with `MissingValue` if the document has no value.
    fn string_value(&self, doc: DocId) -> Result<String>;

    /// Calls `f` with the string form of every distinct value of the field,
    /// in ordinal order.
    ///
    /// The `&str` is only valid for the duration of the call.
    fn for_each_string_value(&self, f: &mut dyn FnMut(&str));

    /// Approximate heap bytes held by the loaded field.
    fn memory_size(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(FieldDataType::GeoPoint.to_string(), "geo_point");
        let json = serde_json::to_string(&FieldDataType::GeoPoint).unwrap();
        assert_eq!(json, "\"geo_point\"");
    }
}
