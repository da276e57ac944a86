//! Geographic point values as stored in an inverted index.
//!
//! Geo-point fields are indexed as `"<lat>,<lon>"` terms. This crate holds the
//! value type ([`GeoPoint`]), the term codec that maps between the indexed
//! term form and points ([`term`]), and the geohash codec used for compact
//! string views of a point ([`geohash`]).

pub mod geohash;
pub mod point;
pub mod term;

pub use point::GeoPoint;
pub use term::{format_term, parse_term, parse_term_checked};
