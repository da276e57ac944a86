//! Codec between geo-point index terms and [`GeoPoint`] values.
//!
//! A geo-point is indexed as the term `"<lat>,<lon>"`, both halves written as
//! decimal floating-point literals. Decoding splits on the first comma.

use fielddata_common::{Result, error::Error};

use crate::GeoPoint;

/// Decodes an indexed term into a point.
///
/// Surrounding ASCII whitespace of either half is ignored. Fails with
/// `MalformedTerm` when the term has no comma, when either half is not a
/// floating-point literal, or when either half is not finite.
pub fn parse_term(term: &str) -> Result<GeoPoint> {
    let Some((lat, lon)) = term.split_once(',') else {
        return Err(Error::malformed_term(term, "expected '<lat>,<lon>'"));
    };
    let lat = parse_coordinate(term, "latitude", lat)?;
    let lon = parse_coordinate(term, "longitude", lon)?;
    Ok(GeoPoint::new(lat, lon))
}

/// Decodes an indexed term, rejecting coordinates outside of
/// `[-90, 90] x [-180, 180]` when `validate_range` is set.
pub fn parse_term_checked(term: &str, validate_range: bool) -> Result<GeoPoint> {
    let point = parse_term(term)?;
    if validate_range && !point.is_in_range() {
        return Err(Error::malformed_term(term, "coordinates out of range"));
    }
    Ok(point)
}

/// Encodes a point into its indexed term form.
///
/// Coordinates use the shortest representation that parses back to the same
/// `f64`, so `parse_term(&format_term(p)) == Ok(p)` for finite points.
pub fn format_term(point: GeoPoint) -> String {
    point.to_string()
}

fn parse_coordinate(term: &str, name: &str, text: &str) -> Result<f64> {
    let value: f64 = text
        .trim_ascii()
        .parse()
        .map_err(|e| Error::malformed_term(term, format!("invalid {name} '{text}': {e}")))?;
    if !value.is_finite() {
        return Err(Error::malformed_term(
            term,
            format!("{name} '{text}' is not finite"),
        ));
    }
    Ok(value)
}
