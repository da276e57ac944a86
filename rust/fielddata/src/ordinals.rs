//! Per-document ordinal layouts.
//!
//! A loaded field maps every document of the segment to the ordinals of its
//! values in the field's value buffer. Two layouts exist and the loader picks
//! one per field and segment:
//!
//! - [`SingleOrdinals`] when no document has more than one value: one ordinal
//!   per document, `0` meaning "no value".
//! - [`MultiOrdinals`] otherwise: a compact list of ordinals per document,
//!   empty meaning "no value".
//!
//! Both layouts answer [`Ordinals::ordinals`] with a slice, so accessors are
//! written once against `&[Ordinal]`.

use fielddata_common::{DocId, NULL_ORDINAL, Ordinal, Result, error::Error};

/// The ordinal layout chosen for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ordinals {
    Single(SingleOrdinals),
    Multi(MultiOrdinals),
}

impl Ordinals {
    /// Number of document slots.
    #[inline]
    pub fn max_doc(&self) -> DocId {
        match self {
            Ordinals::Single(single) => single.max_doc(),
            Ordinals::Multi(multi) => multi.max_doc(),
        }
    }

    #[inline]
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Ordinals::Multi(_))
    }

    /// Ordinals of `doc`, in the order their terms were loaded.
    ///
    /// # Panics
    ///
    /// Panics if `doc >= max_doc()`.
    #[inline]
    pub fn ordinals(&self, doc: DocId) -> &[Ordinal] {
        match self {
            Ordinals::Single(single) => single.ordinals(doc),
            Ordinals::Multi(multi) => multi.ordinals(doc),
        }
    }

    /// The first ordinal of `doc`, or `None` if the document has no value.
    #[inline]
    pub fn first(&self, doc: DocId) -> Option<Ordinal> {
        match self {
            Ordinals::Single(single) => single.get(doc),
            Ordinals::Multi(multi) => multi.ordinals(doc).first().copied(),
        }
    }

    #[inline]
    pub fn has_value(&self, doc: DocId) -> bool {
        self.first(doc).is_some()
    }

    /// Number of documents with at least one value.
    pub fn docs_with_value(&self) -> usize {
        match self {
            Ordinals::Single(single) => single.order.iter().filter(|&&o| o != NULL_ORDINAL).count(),
            Ordinals::Multi(multi) => multi
                .offsets
                .windows(2)
                .filter(|w| w[1] > w[0])
                .count(),
        }
    }

    /// The largest ordinal referenced by any document, `0` if none.
    pub fn max_ordinal(&self) -> Ordinal {
        let all = match self {
            Ordinals::Single(single) => &single.order[..],
            Ordinals::Multi(multi) => &multi.ordinals[..],
        };
        all.iter().copied().max().unwrap_or(NULL_ORDINAL)
    }

    /// Checks that every referenced ordinal names a real value of a buffer
    /// holding `value_count` values (ordinals `1..=value_count`).
    ///
    /// Fails with `OutOfRangeOrdinal` otherwise. A failure means the layout
    /// and the value buffer were not built together.
    pub fn validate(&self, value_count: usize) -> Result<()> {
        if let Ordinals::Multi(multi) = self {
            if let Some(&zero) = multi.ordinals.iter().find(|&&o| o == NULL_ORDINAL) {
                return Err(Error::out_of_range_ordinal(zero, value_count + 1));
            }
        }
        let max = self.max_ordinal();
        if max as usize > value_count {
            return Err(Error::out_of_range_ordinal(max, value_count + 1));
        }
        Ok(())
    }

    /// Heap bytes held by the layout.
    pub fn memory_size(&self) -> usize {
        match self {
            Ordinals::Single(single) => single.order.len() * std::mem::size_of::<Ordinal>(),
            Ordinals::Multi(multi) => {
                multi.offsets.len() * std::mem::size_of::<u64>()
                    + multi.ordinals.len() * std::mem::size_of::<Ordinal>()
            }
        }
    }
}

/// One ordinal per document; `0` marks a document without a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleOrdinals {
    order: Box<[Ordinal]>,
}

impl SingleOrdinals {
    /// Wraps `order[doc] = ordinal`; the length is the segment's `max_doc`.
    pub fn new(order: Vec<Ordinal>) -> SingleOrdinals {
        SingleOrdinals {
            order: order.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn max_doc(&self) -> DocId {
        self.order.len() as DocId
    }

    #[inline]
    pub fn get(&self, doc: DocId) -> Option<Ordinal> {
        match self.order[doc as usize] {
            NULL_ORDINAL => None,
            ordinal => Some(ordinal),
        }
    }

    #[inline]
    pub fn ordinals(&self, doc: DocId) -> &[Ordinal] {
        let ordinal = &self.order[doc as usize];
        if *ordinal == NULL_ORDINAL {
            &[]
        } else {
            std::slice::from_ref(ordinal)
        }
    }

    /// The raw `order` array, `0` for absent documents.
    pub fn as_slice(&self) -> &[Ordinal] {
        &self.order
    }
}

/// A list of ordinals per document, stored as offsets into one flat array.
///
/// Document `d` owns `ordinals[offsets[d]..offsets[d + 1]]`; `offsets` has
/// `max_doc + 1` entries and starts at `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiOrdinals {
    offsets: Box<[u64]>,
    ordinals: Box<[Ordinal]>,
}

impl MultiOrdinals {
    /// Builds the layout from one ordinal list per document.
    pub fn from_lists<I, L>(lists: I) -> MultiOrdinals
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[Ordinal]>,
    {
        let mut offsets = vec![0u64];
        let mut ordinals = Vec::new();
        for list in lists {
            ordinals.extend_from_slice(list.as_ref());
            offsets.push(ordinals.len() as u64);
        }
        MultiOrdinals {
            offsets: offsets.into_boxed_slice(),
            ordinals: ordinals.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn max_doc(&self) -> DocId {
        (self.offsets.len() - 1) as DocId
    }

    #[inline]
    pub fn ordinals(&self, doc: DocId) -> &[Ordinal] {
        let d = doc as usize;
        let start = self.offsets[d] as usize;
        let end = self.offsets[d + 1] as usize;
        &self.ordinals[start..end]
    }

    /// Total number of (document, value) pairs.
    pub fn total_ordinals(&self) -> usize {
        self.ordinals.len()
    }
}

/// Accumulates `(document, ordinal)` postings in a single pass and chooses
/// the layout once all terms are seen.
///
/// The first ordinal of each document is stored in `first`, which becomes the
/// single-valued array as is. Every further ordinal is appended to `extra` as
/// a `(doc, ordinal)` pair, so the transient state grows with the number of
/// postings and not with `max_doc` times the largest per-document count.
pub(crate) struct OrdinalsBuilder {
    first: Vec<Ordinal>,
    extra: Vec<(DocId, Ordinal)>,
    postings: usize,
}

impl OrdinalsBuilder {
    pub fn new(max_doc: DocId) -> OrdinalsBuilder {
        OrdinalsBuilder {
            first: vec![NULL_ORDINAL; max_doc as usize],
            extra: Vec::new(),
            postings: 0,
        }
    }

    /// Records that `doc` carries the value at `ordinal`.
    ///
    /// The caller has checked `doc < max_doc`; `ordinal` is never `0`.
    #[inline]
    pub fn add(&mut self, doc: DocId, ordinal: Ordinal) {
        let slot = &mut self.first[doc as usize];
        if *slot == NULL_ORDINAL {
            *slot = ordinal;
        } else {
            self.extra.push((doc, ordinal));
        }
        self.postings += 1;
    }

    /// Number of postings added so far.
    pub fn postings(&self) -> usize {
        self.postings
    }

    /// Bytes currently held by the builder.
    pub fn transient_size(&self) -> usize {
        self.first.capacity() * std::mem::size_of::<Ordinal>()
            + self.extra.capacity() * std::mem::size_of::<(DocId, Ordinal)>()
    }

    pub fn build(self) -> Ordinals {
        let OrdinalsBuilder {
            first,
            mut extra,
            postings,
        } = self;
        if extra.is_empty() {
            return Ordinals::Single(SingleOrdinals::new(first));
        }

        // Stable: a document's extra ordinals stay in the order they were added.
        extra.sort_by_key(|&(doc, _)| doc);

        let mut offsets = Vec::with_capacity(first.len() + 1);
        let mut ordinals = Vec::with_capacity(postings);
        offsets.push(0u64);
        let mut rest = extra.as_slice();
        for (d, &ordinal) in first.iter().enumerate() {
            if ordinal != NULL_ORDINAL {
                ordinals.push(ordinal);
            }
            let count = rest
                .iter()
                .take_while(|&&(doc, _)| doc as usize == d)
                .count();
            ordinals.extend(rest[..count].iter().map(|&(_, ordinal)| ordinal));
            rest = &rest[count..];
            offsets.push(ordinals.len() as u64);
        }
        Ordinals::Multi(MultiOrdinals {
            offsets: offsets.into_boxed_slice(),
            ordinals: ordinals.into_boxed_slice(),
        })
    }
}
