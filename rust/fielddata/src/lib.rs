//! Field data: per-document values of an indexed field, built by uninverting
//! the field's terms in one index segment.
//!
//! # Overview
//!
//! - [`FieldDataOptions::load_geo_points`] (or [`GeoPointFieldData::load`])
//!   walks the `"<lat>,<lon>"` terms of a geo-point field and produces a
//!   [`GeoPointFieldData`].
//! - [`GeoPointFieldData`] answers per-document point, latitude, longitude and
//!   geohash queries, and iterates the distinct points of the field.
//! - [`Ordinals`] is the document-to-value mapping, stored in a single- or a
//!   multi-valued layout depending on the data.
//! - [`FieldDataCache`] keeps loaded field data per `(segment, field)`.
//!
//! # Example
//!
//! ```
//! use fielddata::{FieldData, GeoPointFieldData};
//! use fielddata_index::MemorySegment;
//!
//! let mut builder = MemorySegment::builder();
//! builder.add_document([("location", "10.0,20.0")]);
//! builder.add_document([]);
//! let segment = builder.build();
//!
//! let data = GeoPointFieldData::load(&segment, "location").unwrap();
//! assert_eq!(data.lat_value(0), Some(10.0));
//! assert!(!data.has_value(1));
//! assert_eq!(data.string_value(0).unwrap(), "s3y0zh7w1z0g");
//! ```

pub mod buffer;
pub mod cache;
pub mod field_data;
pub mod geo_point;
pub mod loader;
pub mod options;
pub mod ordinals;
pub mod scratch;

pub use buffer::{CoordinateBuffer, Coordinates};
pub use cache::FieldDataCache;
pub use field_data::{FieldData, FieldDataType};
pub use geo_point::{GeoPointCollector, GeoPointDocValues, GeoPointFieldData, PointValues};
pub use loader::{ValueCollector, uninvert};
pub use options::{FieldDataOptions, MAX_EXPECTED_TERMS};
pub use ordinals::{MultiOrdinals, Ordinals, SingleOrdinals};
pub use scratch::{Scratch, with_scratch};

pub use fielddata_geo::GeoPoint;
