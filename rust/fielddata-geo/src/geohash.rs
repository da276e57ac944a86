//! Geohash encoding of latitude/longitude pairs.
//!
//! A geohash interleaves the bits of a binary subdivision of the longitude
//! range `[-180, 180]` and the latitude range `[-90, 90]`, starting with
//! longitude, and writes every 5 bits as one character of the geohash base-32
//! alphabet. Each added character narrows the cell by a factor of 32, so
//! prefixes of a geohash name enclosing cells.
//!
//! A coordinate sets its bit only when it is strictly greater than the
//! midpoint of the current interval; a point exactly on a cell boundary falls
//! into the lower cell.

use fielddata_common::{Result, error::Error};

use crate::GeoPoint;

/// Precision used when none is given (about 3.7cm x 1.9cm cells).
pub const DEFAULT_PRECISION: usize = 12;

/// The largest precision whose cells are still distinguishable with `f64`
/// coordinates in the way indexes use them.
pub const MAX_PRECISION: usize = 12;

const BASE_32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

const BITS: [u8; 5] = [16, 8, 4, 2, 1];

/// Encodes a point at [`DEFAULT_PRECISION`].
pub fn encode(lat: f64, lon: f64) -> String {
    encode_with_precision(lat, lon, DEFAULT_PRECISION)
}

/// Encodes a point into a geohash of `precision` characters.
pub fn encode_with_precision(lat: f64, lon: f64, precision: usize) -> String {
    let mut geohash = String::with_capacity(precision);
    encode_into(&mut geohash, lat, lon, precision);
    geohash
}

/// Appends the geohash of a point to `out`, reusing its allocation.
pub fn encode_into(out: &mut String, lat: f64, lon: f64, precision: usize) {
    let mut lat_interval = (-90.0f64, 90.0f64);
    let mut lon_interval = (-180.0f64, 180.0f64);
    let mut is_even = true;
    let mut bit = 0;
    let mut ch = 0u8;
    let mut written = 0;
    while written < precision {
        if is_even {
            let mid = (lon_interval.0 + lon_interval.1) / 2.0;
            if lon > mid {
                ch |= BITS[bit];
                lon_interval.0 = mid;
            } else {
                lon_interval.1 = mid;
            }
        } else {
            let mid = (lat_interval.0 + lat_interval.1) / 2.0;
            if lat > mid {
                ch |= BITS[bit];
                lat_interval.0 = mid;
            } else {
                lat_interval.1 = mid;
            }
        }
        is_even = !is_even;
        if bit < 4 {
            bit += 1;
        } else {
            out.push(BASE_32[ch as usize] as char);
            written += 1;
            bit = 0;
            ch = 0;
        }
    }
}

/// Bounds of the cell named by a geohash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeohashCell {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeohashCell {
    /// Returns the center of the cell.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Returns `true` if the point lies within the cell (bounds inclusive).
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }
}

/// Decodes a geohash to the center of its cell.
pub fn decode(geohash: &str) -> Result<GeoPoint> {
    decode_cell(geohash).map(|cell| cell.center())
}

/// Decodes a geohash to the bounds of its cell.
///
/// Fails with `InvalidArgument` for an empty geohash or one containing a
/// character outside the geohash alphabet (`a`, `i`, `l` and `o` are not
/// part of it). Decoding is case-sensitive.
pub fn decode_cell(geohash: &str) -> Result<GeohashCell> {
    if geohash.is_empty() {
        return Err(Error::invalid_arg("geohash", "empty geohash"));
    }
    let mut lat_interval = (-90.0f64, 90.0f64);
    let mut lon_interval = (-180.0f64, 180.0f64);
    let mut is_even = true;
    for c in geohash.bytes() {
        let cd = decode_char(c).ok_or_else(|| {
            Error::invalid_arg(
                "geohash",
                format!("invalid character '{}' in '{geohash}'", c as char),
            )
        })?;
        for mask in BITS {
            let set = cd & mask != 0;
            let interval = if is_even {
                &mut lon_interval
            } else {
                &mut lat_interval
            };
            let mid = (interval.0 + interval.1) / 2.0;
            if set {
                interval.0 = mid;
            } else {
                interval.1 = mid;
            }
            is_even = !is_even;
        }
    }
    Ok(GeohashCell {
        min_lat: lat_interval.0,
        max_lat: lat_interval.1,
        min_lon: lon_interval.0,
        max_lon: lon_interval.1,
    })
}

fn decode_char(c: u8) -> Option<u8> {
    BASE_32.iter().position(|&b| b == c).map(|pos| pos as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_geohashes() {
        assert_eq!(encode_with_precision(57.64911, 10.40744, 11), "u4pruydqqvj");
        assert_eq!(encode_with_precision(42.6, -5.6, 5), "ezs42");
        assert_eq!(encode(0.0, 0.0), "7zzzzzzzzzzz");
    }

    #[test]
    fn test_default_precision() {
        let hash = encode(10.0, 20.0);
        assert_eq!(hash.len(), DEFAULT_PRECISION);
        assert_eq!(hash, encode(10.0, 20.0));
        assert!(hash.starts_with(&encode_with_precision(10.0, 20.0, 4)));
    }

    #[test]
    fn test_encode_into_appends() {
        let mut buf = String::from(">");
        encode_into(&mut buf, 42.6, -5.6, 5);
        assert_eq!(buf, ">ezs42");
        buf.clear();
        encode_into(&mut buf, 42.6, -5.6, 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_contains_encoded_point() {
        let mut rng = fastrand::Rng::with_seed(5);
        for precision in 1..=MAX_PRECISION {
            for _ in 0..200 {
                let point = GeoPoint::new(rng.f64() * 180.0 - 90.0, rng.f64() * 360.0 - 180.0);
                let hash = encode_with_precision(point.lat, point.lon, precision);
                let cell = decode_cell(&hash).unwrap();
                assert!(cell.contains(point), "{hash} {cell:?} {point:?}");
                assert_eq!(
                    encode_with_precision(cell.center().lat, cell.center().lon, precision),
                    hash
                );
            }
        }
    }

    #[test]
    fn test_decode_known_cell() {
        let center = decode("ezs42").unwrap();
        assert!((center.lat - 42.605).abs() < 0.03);
        assert!((center.lon - -5.603).abs() < 0.03);
    }

    #[test]
    fn test_decode_rejects_invalid_input() {
        assert!(decode("").is_err());
        assert!(decode("ezs4a").is_err());
        assert!(decode("EZS42").is_err());
    }
}
