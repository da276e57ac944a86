//! Geo-point field data.
//!
//! [`GeoPointFieldData`] is what a geo-point field of one segment looks like
//! after it has been uninverted: a frozen coordinate buffer plus the ordinal
//! layout mapping documents to positions in it.

use fielddata_common::{DocId, Ordinal, Result, error::Error};
use fielddata_geo::{GeoPoint, geohash, parse_term_checked};
use fielddata_index::SegmentReader;

use crate::buffer::{CoordinateBuffer, Coordinates};
use crate::field_data::{FieldData, FieldDataType};
use crate::loader::ValueCollector;
use crate::options::FieldDataOptions;
use crate::ordinals::Ordinals;
use crate::scratch::with_scratch;

/// Loaded geo-point values of one field in one segment.
///
/// Single- and multi-valued fields share this type; the layout chosen by the
/// loader is visible through [`is_multi_valued`](FieldData::is_multi_valued)
/// and [`ordinals`](Self::ordinals). For a single-valued field,
/// [`values`](Self::values) yields at most one point.
///
/// # Panics
///
/// Per-document accessors panic for `doc >= max_doc`.
#[derive(Debug, Clone)]
pub struct GeoPointFieldData {
    field: String,
    coordinates: Coordinates,
    ordinals: Ordinals,
    geohash_precision: usize,
}

impl GeoPointFieldData {
    /// Combines a frozen coordinate buffer with its ordinal layout.
    ///
    /// Fails with `OutOfRangeOrdinal` if the layout references a position the
    /// buffer does not hold.
    pub fn new(
        field: impl Into<String>,
        coordinates: Coordinates,
        ordinals: Ordinals,
        geohash_precision: usize,
    ) -> Result<GeoPointFieldData> {
        ordinals.validate(coordinates.value_count())?;
        Ok(GeoPointFieldData {
            field: field.into(),
            coordinates,
            ordinals,
            geohash_precision,
        })
    }

    /// Loads `field` of `reader` with default options.
    pub fn load<R>(reader: &R, field: &str) -> Result<GeoPointFieldData>
    where
        R: SegmentReader + ?Sized,
    {
        FieldDataOptions::default().load_geo_points(reader, field)
    }

    /// The first (for single-valued fields, the only) point of `doc`.
    #[inline]
    pub fn value(&self, doc: DocId) -> Option<GeoPoint> {
        self.ordinals
            .first(doc)
            .map(|ordinal| self.coordinates.point(ordinal))
    }

    /// All points of `doc`, in load order.
    #[inline]
    pub fn values(&self, doc: DocId) -> PointValues<'_> {
        PointValues {
            ordinals: self.ordinals.ordinals(doc).iter(),
            coordinates: &self.coordinates,
        }
    }

    #[inline]
    pub fn lat_value(&self, doc: DocId) -> Option<f64> {
        self.ordinals
            .first(doc)
            .map(|ordinal| self.coordinates.lat(ordinal))
    }

    #[inline]
    pub fn lon_value(&self, doc: DocId) -> Option<f64> {
        self.ordinals
            .first(doc)
            .map(|ordinal| self.coordinates.lon(ordinal))
    }

    /// Latitudes of all points of `doc`.
    pub fn lat_values(&self, doc: DocId) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.ordinals
            .ordinals(doc)
            .iter()
            .map(|&ordinal| self.coordinates.lat(ordinal))
    }

    /// Longitudes of all points of `doc`.
    pub fn lon_values(&self, doc: DocId) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.ordinals
            .ordinals(doc)
            .iter()
            .map(|&ordinal| self.coordinates.lon(ordinal))
    }

    /// Geohash of the first point of `doc` at the configured precision.
    ///
    /// Fails with `MissingValue` if the document has no point; callers are
    /// expected to check [`has_value`](FieldData::has_value) first.
    pub fn string_value(&self, doc: DocId) -> Result<String> {
        let point = self
            .value(doc)
            .ok_or_else(|| Error::missing_value(&self.field, doc))?;
        Ok(geohash::encode_with_precision(
            point.lat,
            point.lon,
            self.geohash_precision,
        ))
    }

    /// Per-document view over `doc`.
    pub fn doc(&self, doc: DocId) -> GeoPointDocValues<'_> {
        GeoPointDocValues {
            ordinals: self.ordinals.ordinals(doc),
            data: self,
            doc,
        }
    }

    /// Calls `f(lat, lon)` for every distinct point of the field, in ordinal
    /// order.
    ///
    /// This visits the value buffer, not the documents: a point shared by
    /// many documents is visited once.
    pub fn for_each_value<F>(&self, mut f: F)
    where
        F: FnMut(f64, f64),
    {
        let lats = self.coordinates.lat_values();
        let lons = self.coordinates.lon_values();
        for (&lat, &lon) in lats.iter().zip(lons) {
            f(lat, lon);
        }
    }

    /// Calls `f` with the geohash of every distinct point, in ordinal order.
    ///
    /// The geohash is written into the calling thread's scratch buffer; the
    /// `&str` is valid only until `f` returns.
    pub fn for_each_geohash<F>(&self, mut f: F)
    where
        F: FnMut(&str),
    {
        let lats = self.coordinates.lat_values();
        let lons = self.coordinates.lon_values();
        with_scratch(|scratch| {
            for (&lat, &lon) in lats.iter().zip(lons) {
                scratch.geohash.clear();
                geohash::encode_into(&mut scratch.geohash, lat, lon, self.geohash_precision);
                f(&scratch.geohash);
            }
        });
    }

    /// Calls `f` with every distinct point, in ordinal order, through the
    /// calling thread's scratch point.
    ///
    /// The referenced point is overwritten before the next call; copy it
    /// (`*point`) to keep it.
    pub fn for_each_point<F>(&self, mut f: F)
    where
        F: FnMut(&GeoPoint),
    {
        let lats = self.coordinates.lat_values();
        let lons = self.coordinates.lon_values();
        with_scratch(|scratch| {
            for (&lat, &lon) in lats.iter().zip(lons) {
                scratch.point.reset(lat, lon);
                f(&scratch.point);
            }
        });
    }

    /// Iterates over every distinct point by value, in ordinal order.
    pub fn unique_values(&self) -> impl ExactSizeIterator<Item = GeoPoint> + '_ {
        self.coordinates.points()
    }

    pub fn ordinals(&self) -> &Ordinals {
        &self.ordinals
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn geohash_precision(&self) -> usize {
        self.geohash_precision
    }
}

impl FieldData for GeoPointFieldData {
    type Value = GeoPoint;

    fn field_name(&self) -> &str {
        &self.field
    }

    fn field_type(&self) -> FieldDataType {
        FieldDataType::GeoPoint
    }

    fn max_doc(&self) -> DocId {
        self.ordinals.max_doc()
    }

    fn is_multi_valued(&self) -> bool {
        self.ordinals.is_multi_valued()
    }

    fn has_value(&self, doc: DocId) -> bool {
        self.ordinals.has_value(doc)
    }

    fn value(&self, doc: DocId) -> Option<GeoPoint> {
        GeoPointFieldData::value(self, doc)
    }

    fn value_count(&self) -> usize {
        self.coordinates.value_count()
    }

    fn string_value(&self, doc: DocId) -> Result<String> {
        GeoPointFieldData::string_value(self, doc)
    }

    fn for_each_string_value(&self, f: &mut dyn FnMut(&str)) {
        self.for_each_geohash(f)
    }

    fn memory_size(&self) -> usize {
        self.coordinates.memory_size() + self.ordinals.memory_size()
    }
}

/// Points of one document, by value.
#[derive(Debug, Clone)]
pub struct PointValues<'a> {
    ordinals: std::slice::Iter<'a, Ordinal>,
    coordinates: &'a Coordinates,
}

impl Iterator for PointValues<'_> {
    type Item = GeoPoint;

    #[inline]
    fn next(&mut self) -> Option<GeoPoint> {
        self.ordinals
            .next()
            .map(|&ordinal| self.coordinates.point(ordinal))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ordinals.size_hint()
    }
}

impl ExactSizeIterator for PointValues<'_> {}

/// The values of a single document of a [`GeoPointFieldData`].
#[derive(Debug, Clone, Copy)]
pub struct GeoPointDocValues<'a> {
    data: &'a GeoPointFieldData,
    ordinals: &'a [Ordinal],
    doc: DocId,
}

impl<'a> GeoPointDocValues<'a> {
    pub fn doc(&self) -> DocId {
        self.doc
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    /// Number of points of the document.
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn value(&self) -> Option<GeoPoint> {
        self.ordinals
            .first()
            .map(|&ordinal| self.data.coordinates.point(ordinal))
    }

    pub fn values(&self) -> PointValues<'a> {
        PointValues {
            ordinals: self.ordinals.iter(),
            coordinates: &self.data.coordinates,
        }
    }

    /// Geohash of the first point, `None` if the document has no point.
    pub fn geohash(&self) -> Option<String> {
        self.value().map(|point| {
            geohash::encode_with_precision(point.lat, point.lon, self.data.geohash_precision)
        })
    }
}

/// [`ValueCollector`] decoding `"<lat>,<lon>"` terms into a [`CoordinateBuffer`].
#[derive(Debug)]
pub struct GeoPointCollector {
    buffer: CoordinateBuffer,
    validate_coordinates: bool,
    geohash_precision: usize,
}

impl GeoPointCollector {
    /// Upper bound on the coordinates reserved up front; the buffer grows
    /// past it on demand.
    pub const MAX_RESERVED_TERMS: usize = 1 << 20;

    pub fn new(options: &FieldDataOptions) -> GeoPointCollector {
        let reserved = options
            .expected_terms
            .unwrap_or(0)
            .min(Self::MAX_RESERVED_TERMS);
        GeoPointCollector {
            buffer: CoordinateBuffer::with_capacity(reserved),
            validate_coordinates: options.validate_coordinates,
            geohash_precision: options.geohash_precision,
        }
    }
}

impl ValueCollector for GeoPointCollector {
    type Output = GeoPointFieldData;

    fn collect_term(&mut self, term: &str) -> Result<()> {
        let point = parse_term_checked(term, self.validate_coordinates)?;
        self.buffer.append(point.lat, point.lon);
        Ok(())
    }

    fn value_count(&self) -> usize {
        self.buffer.value_count()
    }

    fn build(self, field: &str, ordinals: Ordinals) -> Result<GeoPointFieldData> {
        GeoPointFieldData::new(
            field,
            self.buffer.finalize(),
            ordinals,
            self.geohash_precision,
        )
    }
}
