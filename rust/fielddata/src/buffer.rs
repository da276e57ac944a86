//! Decoded coordinate storage shared by all documents of a field.

use fielddata_common::{NULL_ORDINAL, Ordinal};
use fielddata_geo::GeoPoint;

/// Append-only buffer of decoded coordinates, filled in term order while a
/// field is loaded.
///
/// Latitudes and longitudes are kept in two parallel arrays. Position `0` is
/// reserved for the `(0.0, 0.0)` sentinel that stands for "no value", so the
/// first appended coordinate receives ordinal `1`. Growth is amortized
/// doubling, which bounds the total copying cost of a load to `O(n)`.
#[derive(Debug, Clone)]
pub struct CoordinateBuffer {
    lat: Vec<f64>,
    lon: Vec<f64>,
}

impl Default for CoordinateBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateBuffer {
    /// Creates a buffer holding only the sentinel.
    pub fn new() -> CoordinateBuffer {
        Self::with_capacity(0)
    }

    /// Creates a buffer with room for `capacity` coordinates besides the sentinel.
    pub fn with_capacity(capacity: usize) -> CoordinateBuffer {
        let mut lat = Vec::with_capacity(capacity.saturating_add(1));
        let mut lon = Vec::with_capacity(capacity.saturating_add(1));
        lat.push(0.0);
        lon.push(0.0);
        CoordinateBuffer { lat, lon }
    }

    /// Appends a coordinate and returns the ordinal assigned to it.
    #[inline]
    pub fn append(&mut self, lat: f64, lon: f64) -> Ordinal {
        let ordinal = self.lat.len() as Ordinal;
        self.lat.push(lat);
        self.lon.push(lon);
        ordinal
    }

    /// Number of slots, including the sentinel.
    #[inline]
    pub fn len(&self) -> usize {
        self.lat.len()
    }

    /// Always `false`: the sentinel occupies slot `0`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    /// Number of appended coordinates, excluding the sentinel.
    #[inline]
    pub fn value_count(&self) -> usize {
        self.lat.len() - 1
    }

    /// Slots allocated per coordinate axis, including the sentinel.
    pub fn capacity(&self) -> usize {
        self.lat.capacity()
    }

    /// Freezes the buffer into the immutable arrays owned by a field data cache.
    pub fn finalize(self) -> Coordinates {
        Coordinates {
            lat: self.lat.into_boxed_slice(),
            lon: self.lon.into_boxed_slice(),
        }
    }
}

/// The frozen coordinate arrays of a loaded field.
///
/// Never mutated after construction, so a `&Coordinates` can be read from any
/// number of threads without synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    lat: Box<[f64]>,
    lon: Box<[f64]>,
}

impl Coordinates {
    /// Number of slots, including the sentinel at ordinal `0`.
    #[inline]
    pub fn len(&self) -> usize {
        self.lat.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    /// Number of real values (ordinals `1..len`).
    #[inline]
    pub fn value_count(&self) -> usize {
        self.lat.len().saturating_sub(1)
    }

    /// Returns `true` if `ordinal` names a real value.
    #[inline]
    pub fn contains(&self, ordinal: Ordinal) -> bool {
        ordinal != NULL_ORDINAL && (ordinal as usize) < self.lat.len()
    }

    /// Returns the point stored at `ordinal`.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal >= len()`.
    #[inline]
    pub fn point(&self, ordinal: Ordinal) -> GeoPoint {
        let i = ordinal as usize;
        GeoPoint::new(self.lat[i], self.lon[i])
    }

    #[inline]
    pub fn lat(&self, ordinal: Ordinal) -> f64 {
        self.lat[ordinal as usize]
    }

    #[inline]
    pub fn lon(&self, ordinal: Ordinal) -> f64 {
        self.lon[ordinal as usize]
    }

    /// Latitudes of the real values, in ordinal order.
    pub fn lat_values(&self) -> &[f64] {
        self.lat.get(1..).unwrap_or_default()
    }

    /// Longitudes of the real values, in ordinal order.
    pub fn lon_values(&self) -> &[f64] {
        self.lon.get(1..).unwrap_or_default()
    }

    /// Iterates over the real values, in ordinal order.
    pub fn points(&self) -> impl ExactSizeIterator<Item = GeoPoint> + '_ {
        self.lat_values()
            .iter()
            .zip(self.lon_values())
            .map(|(&lat, &lon)| GeoPoint::new(lat, lon))
    }

    /// Heap bytes held by both arrays.
    pub fn memory_size(&self) -> usize {
        (self.lat.len() + self.lon.len()) * std::mem::size_of::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_reserved() {
        let buffer = CoordinateBuffer::new();
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.value_count(), 0);

        let coords = buffer.finalize();
        assert_eq!(coords.point(0), GeoPoint::new(0.0, 0.0));
        assert!(!coords.contains(0));
        assert_eq!(coords.points().count(), 0);
    }

    #[test]
    fn test_append_assigns_increasing_ordinals() {
        let mut buffer = CoordinateBuffer::with_capacity(2);
        assert_eq!(buffer.append(10.0, 20.0), 1);
        assert_eq!(buffer.append(30.0, 40.0), 2);
        assert_eq!(buffer.append(-1.0, -2.0), 3);
        assert_eq!(buffer.value_count(), 3);

        let coords = buffer.finalize();
        assert_eq!(coords.len(), 4);
        assert!(coords.contains(3));
        assert!(!coords.contains(4));
        assert_eq!(coords.point(2), GeoPoint::new(30.0, 40.0));
        assert_eq!(coords.lat_values(), &[10.0, 30.0, -1.0]);
        assert_eq!(coords.lon_values(), &[20.0, 40.0, -2.0]);
        assert_eq!(
            coords.points().collect::<Vec<_>>(),
            [
                GeoPoint::new(10.0, 20.0),
                GeoPoint::new(30.0, 40.0),
                GeoPoint::new(-1.0, -2.0)
            ]
        );
        assert_eq!(coords.memory_size(), 8 * 8);
    }

    #[test]
    fn test_growth_past_initial_capacity() {
        let mut buffer = CoordinateBuffer::new();
        for i in 0..10_000 {
            assert_eq!(buffer.append(i as f64, -(i as f64)), i as u32 + 1);
        }
        let coords = buffer.finalize();
        assert_eq!(coords.value_count(), 10_000);
        assert_eq!(coords.lon(10_000), -9999.0);
    }
}
