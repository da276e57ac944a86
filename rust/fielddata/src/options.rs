//! Field data loading options.

use std::path::Path;

use fielddata_common::{Result, error::Error};
use fielddata_geo::geohash;
use fielddata_index::SegmentReader;
use serde::{Deserialize, Serialize};

use crate::geo_point::{GeoPointCollector, GeoPointFieldData};
use crate::loader;

/// Largest accepted `expected_terms`; ordinals are 32-bit.
pub const MAX_EXPECTED_TERMS: usize = u32::MAX as usize;

/// Options for loading geo-point field data.
///
/// Built with setters, or read from JSON where every key is optional:
///
/// ```json
/// { "geohash_precision": 8, "expected_terms": 100000, "validate_coordinates": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldDataOptions {
    /// Length of the geohash strings produced by `string_value` and string
    /// iteration.
    pub(crate) geohash_precision: usize,
    /// Capacity hint for the value buffer.
    pub(crate) expected_terms: Option<usize>,
    /// Reject terms whose coordinates lie outside `[-90, 90] x [-180, 180]`.
    pub(crate) validate_coordinates: bool,
}

impl Default for FieldDataOptions {
    fn default() -> Self {
        FieldDataOptions {
            geohash_precision: geohash::DEFAULT_PRECISION,
            expected_terms: None,
            validate_coordinates: false,
        }
    }
}

impl FieldDataOptions {
    pub fn new() -> FieldDataOptions {
        Self::default()
    }

    /// Sets the geohash length, `1..=12`.
    pub fn geohash_precision(mut self, precision: usize) -> Self {
        self.geohash_precision = precision;
        self
    }

    /// Sets the expected number of distinct terms of the field, at most
    /// [`MAX_EXPECTED_TERMS`].
    pub fn expected_terms(mut self, expected_terms: usize) -> Self {
        self.expected_terms = Some(expected_terms);
        self
    }

    /// Enables coordinate range validation while decoding terms.
    pub fn validate_coordinates(mut self, validate: bool) -> Self {
        self.validate_coordinates = validate;
        self
    }

    /// Parses options from a JSON object and validates them.
    pub fn from_json(json: &str) -> Result<FieldDataOptions> {
        let options: FieldDataOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file and validates them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<FieldDataOptions> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::io(path.display().to_string(), e))?;
        Self::from_json(&json)
    }

    /// Checks the settings, failing with `Config` on the first invalid one.
    pub fn validate(&self) -> Result<()> {
        if !(1..=geohash::MAX_PRECISION).contains(&self.geohash_precision) {
            return Err(Error::config(
                "geohash_precision",
                format!(
                    "{} is not in 1..={}",
                    self.geohash_precision,
                    geohash::MAX_PRECISION
                ),
            ));
        }
        if let Some(expected_terms) = self.expected_terms {
            if expected_terms > MAX_EXPECTED_TERMS {
                return Err(Error::config(
                    "expected_terms",
                    format!("{expected_terms} exceeds {MAX_EXPECTED_TERMS}"),
                ));
            }
        }
        Ok(())
    }

    /// Loads `field` of `reader` as geo-point field data.
    pub fn load_geo_points<R>(&self, reader: &R, field: &str) -> Result<GeoPointFieldData>
    where
        R: SegmentReader + ?Sized,
    {
        self.validate()?;
        loader::uninvert(reader, field, GeoPointCollector::new(self))
    }
}
