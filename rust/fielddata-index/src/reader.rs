//! Segment reader contract consumed by the field data loader.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use fielddata_common::{DocId, Result};

/// Process-unique identity of an index segment.
///
/// Two readers over the same immutable segment report the same id; a merged
/// or reopened segment gets a fresh one. Caches use it as part of their key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(u64);

impl SegmentId {
    /// Wraps an externally assigned segment identifier.
    pub const fn new(id: u64) -> SegmentId {
        SegmentId(id)
    }

    /// Allocates an identifier that no other call in this process returns.
    pub fn next() -> SegmentId {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SegmentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment#{}", self.0)
    }
}

/// Document identifiers of one term, ascending and without duplicates.
///
/// Items are fallible so that readers backed by storage can surface I/O
/// failures in the middle of a posting list.
pub type Postings<'a> = Box<dyn Iterator<Item = Result<DocId>> + 'a>;

/// Terms of one field in ascending byte order.
pub type TermsIter<'a> = Box<dyn Iterator<Item = Result<TermPostings<'a>>> + 'a>;

/// A single term of a field together with its posting list.
pub struct TermPostings<'a> {
    /// The indexed term text.
    pub term: Cow<'a, str>,
    /// Documents the term was indexed for.
    pub docs: Postings<'a>,
}

impl<'a> TermPostings<'a> {
    pub fn new(term: impl Into<Cow<'a, str>>, docs: Postings<'a>) -> TermPostings<'a> {
        TermPostings {
            term: term.into(),
            docs,
        }
    }
}

impl fmt::Debug for TermPostings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermPostings")
            .field("term", &self.term)
            .finish_non_exhaustive()
    }
}

/// Read access to one immutable segment of an inverted index.
///
/// # Ordering
///
/// [`field_terms`](Self::field_terms) must yield terms in ascending byte
/// (lexicographic) order and each posting list in ascending document order.
/// Field data ordinals are assigned in the order terms are produced, so a
/// reader that is not deterministic produces caches that differ between loads.
///
/// # Thread Safety
///
/// Readers are shared between query threads and must be `Send + Sync`. A
/// single call to `field_terms` is consumed by one thread.
pub trait SegmentReader: Send + Sync {
    /// Returns the identity of the underlying segment.
    fn segment_id(&self) -> SegmentId;

    /// Returns the number of document slots in the segment; valid document
    /// identifiers are `0..max_doc`.
    fn max_doc(&self) -> DocId;

    /// Enumerates the terms of `field`.
    ///
    /// A field that does not exist in the segment yields no terms.
    fn field_terms(&self, field: &str) -> Result<TermsIter<'_>>;
}

impl<R: SegmentReader + ?Sized> SegmentReader for &R {
    fn segment_id(&self) -> SegmentId {
        (**self).segment_id()
    }

    fn max_doc(&self) -> DocId {
        (**self).max_doc()
    }

    fn field_terms(&self, field: &str) -> Result<TermsIter<'_>> {
        (**self).field_terms(field)
    }
}

impl<R: SegmentReader + ?Sized> SegmentReader for std::sync::Arc<R> {
    fn segment_id(&self) -> SegmentId {
        (**self).segment_id()
    }

    fn max_doc(&self) -> DocId {
        (**self).max_doc()
    }

    fn field_terms(&self, field: &str) -> Result<TermsIter<'_>> {
        (**self).field_terms(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_ids_are_unique() {
        let a = SegmentId::next();
        let b = SegmentId::next();
        assert_ne!(a, b);
        assert!(b > a);
        assert_eq!(SegmentId::new(42).to_string(), "segment#42");
    }
}
