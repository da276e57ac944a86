//! Uninverting a field: from term postings to per-document values.
//!
//! An inverted index answers "which documents contain term `t`". Sorting,
//! scoring and faceting need the opposite, "which values does document `d`
//! carry". [`uninvert`] walks the term dictionary of one field in order,
//! hands every term to a [`ValueCollector`] that decodes and stores its value,
//! and records the term's ordinal for every document in its posting list.
//!
//! # Algorithm
//!
//! 1. Ordinal `0` is reserved by the collector as the "no value" sentinel.
//! 2. Terms are enumerated in the segment's natural (ascending byte) order;
//!    the `n`-th term receives ordinal `n`.
//! 3. Each term is decoded by the collector. A decoding failure aborts the
//!    whole load.
//! 4. Each posting records `(doc, ordinal)`. A document's first ordinal goes
//!    into a per-document array, later ones into a side list of pairs.
//! 5. If no document occurred more than once the single-valued layout is
//!    produced, otherwise the multi-valued one (see [`Ordinals`]).
//! 6. The collector freezes its values and builds the final cache.
//!
//! The load is all-or-nothing: on any error nothing is returned and the
//! partially built arrays are dropped.

use fielddata_common::{DocId, Ordinal, Result, error::Error};
use fielddata_index::SegmentReader;
use log::{debug, warn};

use crate::ordinals::{Ordinals, OrdinalsBuilder};

/// The value-type specific half of a field load.
///
/// A collector decodes terms into its own value buffer and, once all terms
/// are seen, combines that buffer with the ordinal layout into the loaded
/// field data.
pub trait ValueCollector {
    /// The field data produced by this collector.
    type Output;

    /// Decodes `term` and appends its value.
    ///
    /// Called once per term, in term order; the value appended for the
    /// `n`-th call must be retrievable with ordinal `n`.
    fn collect_term(&mut self, term: &str) -> Result<()>;

    /// Number of values appended so far (excluding the sentinel).
    fn value_count(&self) -> usize;

    /// Builds the loaded field data for `field`.
    fn build(self, field: &str, ordinals: Ordinals) -> Result<Self::Output>;
}

/// Loads `field` of `reader`, decoding terms with `collector`.
///
/// # Errors
///
/// - any error of the collector (for example `MalformedTerm`),
/// - `DocOutOfRange` if a posting names a document `>= max_doc`,
/// - `OutOfRangeOrdinal` if the collector did not append exactly one value
///   per term,
/// - any error raised by the reader while enumerating terms or postings.
pub fn uninvert<R, C>(reader: &R, field: &str, mut collector: C) -> Result<C::Output>
where
    R: SegmentReader + ?Sized,
    C: ValueCollector,
{
    let max_doc = reader.max_doc();
    let segment = reader.segment_id();
    debug!("loading field data for '{field}' in {segment} (max_doc = {max_doc})");

    let mut builder = OrdinalsBuilder::new(max_doc);
    let mut term_count: Ordinal = 0;
    for entry in reader.field_terms(field)? {
        let entry = entry?;
        if let Err(e) = collector.collect_term(&entry.term) {
            warn!("aborting field data load for '{field}' in {segment}: {e}");
            return Err(e);
        }
        term_count = term_count
            .checked_add(1)
            .ok_or_else(|| Error::invalid_operation("too many terms for ordinal space"))?;
        for doc in entry.docs {
            let doc: DocId = doc?;
            if doc >= max_doc {
                return Err(Error::doc_out_of_range(doc, max_doc));
            }
            builder.add(doc, term_count);
        }
    }

    let value_count = collector.value_count();
    if value_count != term_count as usize {
        return Err(Error::out_of_range_ordinal(term_count, value_count + 1));
    }

    let postings = builder.postings();
    let ordinals = builder.build();
    debug!(
        "loaded field data for '{field}' in {segment}: {term_count} terms, \
         {postings} postings, {} layout",
        if ordinals.is_multi_valued() {
            "multi-valued"
        } else {
            "single-valued"
        }
    );
    collector.build(field, ordinals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fielddata_common::error::ErrorKind;
    use fielddata_index::MemorySegment;

    /// Collects integer terms, to exercise the loader apart from geo points.
    #[derive(Default)]
    struct IntCollector {
        values: Vec<i64>,
    }

    impl ValueCollector for IntCollector {
        type Output = (Vec<i64>, Ordinals);

        fn collect_term(&mut self, term: &str) -> Result<()> {
            let value = term
                .parse()
                .map_err(|_| Error::malformed_term(term, "not an integer"))?;
            self.values.push(value);
            Ok(())
        }

        fn value_count(&self) -> usize {
            self.values.len()
        }

        fn build(self, _field: &str, ordinals: Ordinals) -> Result<Self::Output> {
            ordinals.validate(self.values.len())?;
            Ok((self.values, ordinals))
        }
    }

    /// Appends nothing, breaking the one-value-per-term contract.
    struct DroppingCollector;

    impl ValueCollector for DroppingCollector {
        type Output = Ordinals;

        fn collect_term(&mut self, _term: &str) -> Result<()> {
            Ok(())
        }

        fn value_count(&self) -> usize {
            0
        }

        fn build(self, _field: &str, ordinals: Ordinals) -> Result<Ordinals> {
            Ok(ordinals)
        }
    }

    #[test]
    fn test_ordinals_follow_term_order() {
        let mut builder = MemorySegment::builder();
        builder.add_document([("n", "7")]);
        builder.add_document([("n", "3")]);
        builder.add_document([]);
        let segment = builder.build();

        let (values, ordinals) = uninvert(&segment, "n", IntCollector::default()).unwrap();
        // "3" < "7" in byte order.
        assert_eq!(values, [3, 7]);
        assert!(!ordinals.is_multi_valued());
        assert_eq!(ordinals.first(0), Some(2));
        assert_eq!(ordinals.first(1), Some(1));
        assert_eq!(ordinals.first(2), None);
    }

    #[test]
    fn test_multi_valued_documents() {
        let mut builder = MemorySegment::builder();
        builder.add_document([("n", "1"), ("n", "2")]);
        builder.add_document([("n", "2")]);
        let segment = builder.build();

        let (_, ordinals) = uninvert(&segment, "n", IntCollector::default()).unwrap();
        assert!(ordinals.is_multi_valued());
        assert_eq!(ordinals.ordinals(0), &[1, 2]);
        assert_eq!(ordinals.ordinals(1), &[2]);
    }

    #[test]
    fn test_decoding_failure_aborts_load() {
        let mut builder = MemorySegment::builder();
        builder.add_document([("n", "1")]);
        builder.add_document([("n", "x")]);
        let segment = builder.build();

        let err = uninvert(&segment, "n", IntCollector::default()).unwrap_err();
        assert!(err.is_malformed_term());
    }

    #[test]
    fn test_collector_contract_violation() {
        let mut builder = MemorySegment::builder();
        builder.add_document([("n", "1")]);
        let segment = builder.build();

        let err = uninvert(&segment, "n", DroppingCollector).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::OutOfRangeOrdinal { ordinal: 1, .. }));
    }

    #[test]
    fn test_missing_field_loads_empty() {
        let mut builder = MemorySegment::builder();
        builder.add_empty_documents(2);
        let segment = builder.build();

        let (values, ordinals) = uninvert(&segment, "n", IntCollector::default()).unwrap();
        assert!(values.is_empty());
        assert_eq!(ordinals.max_doc(), 2);
        assert!(!ordinals.has_value(0));
        assert!(!ordinals.has_value(1));
    }
}
