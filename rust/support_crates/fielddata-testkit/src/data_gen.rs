//! Random geo-point segments for property-style tests.
//!
//! A generated segment comes with the points each document must load as, so
//! a test can compare loaded field data against an independent model instead
//! of hard-coded values.

use std::collections::BTreeSet;

use fielddata_common::DocId;
use fielddata_geo::{GeoPoint, format_term, parse_term};
use fielddata_index::{MemorySegment, SegmentReader};

/// Shape of a generated segment.
#[derive(Debug, Clone)]
pub struct GeoSegmentShape {
    /// Field the points are indexed under.
    pub field: String,
    /// Number of documents.
    pub docs: u32,
    /// Upper bound of points per document (inclusive).
    pub max_values_per_doc: usize,
    /// Size of the point palette documents draw from. Smaller palettes make
    /// documents share values.
    pub palette_size: usize,
    /// Probability of a document carrying no point at all.
    pub missing_ratio: f64,
    pub seed: u64,
}

impl Default for GeoSegmentShape {
    fn default() -> Self {
        GeoSegmentShape {
            field: "location".to_string(),
            docs: 100,
            max_values_per_doc: 1,
            palette_size: 50,
            missing_ratio: 0.2,
            seed: 0x5eed,
        }
    }
}

impl GeoSegmentShape {
    pub fn single_valued(docs: u32, seed: u64) -> GeoSegmentShape {
        GeoSegmentShape {
            docs,
            seed,
            ..Default::default()
        }
    }

    pub fn multi_valued(docs: u32, max_values_per_doc: usize, seed: u64) -> GeoSegmentShape {
        GeoSegmentShape {
            docs,
            max_values_per_doc,
            seed,
            ..Default::default()
        }
    }
}

/// A generated segment and its expected contents.
#[derive(Debug)]
pub struct GeneratedSegment {
    pub segment: MemorySegment,
    pub field: String,
    /// Points of every document, in the order the loader yields them
    /// (ascending term order, duplicates removed).
    pub expected: Vec<Vec<GeoPoint>>,
    /// Distinct terms of the field in ascending byte order; the `n`-th term
    /// has ordinal `n + 1`.
    pub terms: Vec<String>,
}

impl GeneratedSegment {
    pub fn max_doc(&self) -> DocId {
        self.segment.max_doc()
    }

    /// Whether any document carries more than one distinct point.
    pub fn is_multi_valued(&self) -> bool {
        self.expected.iter().any(|points| points.len() > 1)
    }

    /// Distinct points of the field in ordinal order.
    pub fn unique_points(&self) -> Vec<GeoPoint> {
        self.terms.iter().map(|term| point_of(term)).collect()
    }
}

/// Generates a segment according to `shape`.
pub fn generate_geo_segment(shape: &GeoSegmentShape) -> GeneratedSegment {
    assert_ne!(shape.palette_size, 0);
    let mut rng = fastrand::Rng::with_seed(shape.seed);
    let palette = generate_palette(&mut rng, shape.palette_size);

    let mut builder = MemorySegment::builder();
    let mut expected = Vec::with_capacity(shape.docs as usize);
    let mut used = BTreeSet::new();
    for _ in 0..shape.docs {
        let mut doc_terms = BTreeSet::new();
        if rng.f64() >= shape.missing_ratio && shape.max_values_per_doc > 0 {
            let count = rng.usize(1..=shape.max_values_per_doc);
            for _ in 0..count {
                doc_terms.insert(palette[rng.usize(..palette.len())].as_str());
            }
        }
        builder.add_document(doc_terms.iter().map(|&term| (shape.field.as_str(), term)));
        expected.push(doc_terms.iter().map(|term| point_of(term)).collect());
        used.extend(doc_terms.into_iter().map(str::to_string));
    }

    GeneratedSegment {
        segment: builder.build(),
        field: shape.field.clone(),
        expected,
        terms: used.into_iter().collect(),
    }
}

/// Distinct terms of random in-range points with millidegree resolution.
fn generate_palette(rng: &mut fastrand::Rng, size: usize) -> Vec<String> {
    let mut terms = BTreeSet::new();
    while terms.len() < size {
        let lat = rng.i32(-90_000..=90_000) as f64 / 1000.0;
        let lon = rng.i32(-180_000..=180_000) as f64 / 1000.0;
        terms.insert(format_term(GeoPoint::new(lat, lon)));
    }
    let mut terms: Vec<String> = terms.into_iter().collect();
    rng.shuffle(&mut terms);
    terms
}

fn point_of(term: &str) -> GeoPoint {
    parse_term(term).expect("generated terms are well-formed")
}
