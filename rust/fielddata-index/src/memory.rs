//! In-memory inverted index segment.

use std::borrow::Cow;
use std::collections::BTreeMap;

use ahash::AHashMap;
use fielddata_common::{DocId, Result};

use crate::reader::{Postings, SegmentId, SegmentReader, TermPostings, TermsIter};

/// Posting lists of one field, keyed by term. `BTreeMap<String, _>` orders
/// keys by their UTF-8 bytes, which is the order readers must produce.
type FieldPostings = BTreeMap<String, Vec<DocId>>;

/// Accumulates documents and their `(field, term)` pairs into a
/// [`MemorySegment`].
///
/// Documents are numbered in the order they are added, starting at `0`.
/// Adding the same term twice for one document records it once, mirroring
/// how an inverted index stores a posting per (term, document).
#[derive(Debug, Default)]
pub struct MemorySegmentBuilder {
    fields: AHashMap<String, FieldPostings>,
    max_doc: DocId,
}

impl MemorySegmentBuilder {
    pub fn new() -> MemorySegmentBuilder {
        Self::default()
    }

    /// Returns the number of documents added so far.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// Adds a document carrying the given `(field, term)` pairs and returns its id.
    pub fn add_document<'t, I>(&mut self, terms: I) -> DocId
    where
        I: IntoIterator<Item = (&'t str, &'t str)>,
    {
        let doc = self.max_doc;
        self.max_doc += 1;
        for (field, term) in terms {
            self.insert(field, term, doc);
        }
        doc
    }

    /// Adds `count` documents without any indexed terms.
    pub fn add_empty_documents(&mut self, count: u32) {
        self.max_doc += count;
    }

    /// Records `term` for an already added document.
    ///
    /// # Panics
    ///
    /// Panics if `doc` has not been added yet.
    pub fn add_term(&mut self, field: &str, term: &str, doc: DocId) {
        assert!(
            doc < self.max_doc,
            "document {doc} was not added (max_doc = {})",
            self.max_doc
        );
        self.insert(field, term, doc);
    }

    fn insert(&mut self, field: &str, term: &str, doc: DocId) {
        let postings = self
            .fields
            .entry(field.to_string())
            .or_default()
            .entry(term.to_string())
            .or_default();
        match postings.last() {
            Some(&last) if last == doc => {}
            Some(&last) if last < doc => postings.push(doc),
            None => postings.push(doc),
            Some(_) => {
                if let Err(pos) = postings.binary_search(&doc) {
                    postings.insert(pos, doc);
                }
            }
        }
    }

    /// Freezes the accumulated postings into a segment with a fresh [`SegmentId`].
    pub fn build(self) -> MemorySegment {
        MemorySegment {
            id: SegmentId::next(),
            fields: self.fields,
            max_doc: self.max_doc,
        }
    }
}

/// An immutable segment whose term dictionary and postings live in memory.
#[derive(Debug)]
pub struct MemorySegment {
    id: SegmentId,
    fields: AHashMap<String, FieldPostings>,
    max_doc: DocId,
}

impl MemorySegment {
    pub fn builder() -> MemorySegmentBuilder {
        MemorySegmentBuilder::new()
    }

    /// Returns `true` if any document indexed a term for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the number of distinct terms of `field`.
    pub fn term_count(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, |terms| terms.len())
    }

    /// Returns the number of documents `term` was indexed for in `field`.
    pub fn doc_freq(&self, field: &str, term: &str) -> usize {
        self.fields
            .get(field)
            .and_then(|terms| terms.get(term))
            .map_or(0, |docs| docs.len())
    }
}

impl SegmentReader for MemorySegment {
    fn segment_id(&self) -> SegmentId {
        self.id
    }

    fn max_doc(&self) -> DocId {
        self.max_doc
    }

    fn field_terms(&self, field: &str) -> Result<TermsIter<'_>> {
        let Some(terms) = self.fields.get(field) else {
            return Ok(Box::new(std::iter::empty()));
        };
        Ok(Box::new(
            terms
                .iter()
                .map(|(term, docs)| term_postings(term, docs)),
        ))
    }
}

fn term_postings<'a>(term: &'a str, docs: &'a [DocId]) -> Result<TermPostings<'a>> {
    let docs: Postings<'a> = Box::new(docs.iter().map(|&doc| Ok(doc)));
    Ok(TermPostings::new(Cow::Borrowed(term), docs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(segment: &MemorySegment, field: &str) -> Vec<(String, Vec<DocId>)> {
        segment
            .field_terms(field)
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                let docs = entry.docs.map(|doc| doc.unwrap()).collect();
                (entry.term.into_owned(), docs)
            })
            .collect()
    }

    #[test]
    fn test_terms_are_sorted_by_bytes() {
        let mut builder = MemorySegment::builder();
        builder.add_document([("f", "b"), ("f", "a")]);
        builder.add_document([("f", "B"), ("f", "a")]);
        let segment = builder.build();

        let terms = collect(&segment, "f");
        let names: Vec<_> = terms.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(names, ["B", "a", "b"]);
        assert_eq!(terms[1].1, [0, 1]);
        assert_eq!(segment.max_doc(), 2);
    }

    #[test]
    fn test_postings_are_deduplicated_and_ordered() {
        let mut builder = MemorySegment::builder();
        builder.add_empty_documents(3);
        builder.add_term("f", "x", 2);
        builder.add_term("f", "x", 0);
        builder.add_term("f", "x", 2);
        builder.add_term("f", "x", 1);
        let segment = builder.build();

        assert_eq!(collect(&segment, "f"), [("x".to_string(), vec![0, 1, 2])]);
        assert_eq!(segment.doc_freq("f", "x"), 3);
        assert_eq!(segment.term_count("f"), 1);
    }

    #[test]
    fn test_missing_field_yields_no_terms() {
        let mut builder = MemorySegment::builder();
        builder.add_document([("f", "x")]);
        let segment = builder.build();
        assert!(!segment.has_field("g"));
        assert!(collect(&segment, "g").is_empty());
    }

    #[test]
    #[should_panic]
    fn test_add_term_for_unknown_document() {
        let mut builder = MemorySegment::builder();
        builder.add_term("f", "x", 0);
    }
}
