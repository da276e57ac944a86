//! Segment readers with scripted, possibly inconsistent contents.

use fielddata_common::{DocId, Result, error::Error};
use fielddata_index::{SegmentId, SegmentReader, TermPostings, TermsIter};

/// A reader that yields exactly the terms and postings it was given.
///
/// Unlike `MemorySegment`, nothing is checked or normalized: postings may
/// name documents beyond `max_doc`, and enumeration can be made to fail.
#[derive(Debug, Clone)]
pub struct ScriptedSegment {
    id: SegmentId,
    max_doc: DocId,
    field: String,
    terms: Vec<(String, Vec<DocId>)>,
    fail_at_term: Option<usize>,
}

impl ScriptedSegment {
    pub fn new(field: &str, max_doc: DocId) -> ScriptedSegment {
        ScriptedSegment {
            id: SegmentId::next(),
            max_doc,
            field: field.to_string(),
            terms: Vec::new(),
            fail_at_term: None,
        }
    }

    /// Appends a term; terms are yielded in the order they are added.
    pub fn term(mut self, term: &str, docs: &[DocId]) -> Self {
        self.terms.push((term.to_string(), docs.to_vec()));
        self
    }

    /// Makes enumeration fail with an I/O error in place of the `index`-th
    /// term.
    pub fn fail_at_term(mut self, index: usize) -> Self {
        self.fail_at_term = Some(index);
        self
    }
}

impl SegmentReader for ScriptedSegment {
    fn segment_id(&self) -> SegmentId {
        self.id
    }

    fn max_doc(&self) -> DocId {
        self.max_doc
    }

    fn field_terms(&self, field: &str) -> Result<TermsIter<'_>> {
        if field != self.field {
            return Ok(Box::new(std::iter::empty()));
        }
        let fail_at = self.fail_at_term;
        Ok(Box::new(self.terms.iter().enumerate().map(
            move |(index, (term, docs))| {
                if Some(index) == fail_at {
                    return Err(Error::io(
                        "scripted segment",
                        std::io::Error::other("injected fault"),
                    ));
                }
                let docs = docs.iter().copied().map(Ok::<DocId, Error>);
                Ok(TermPostings::new(term.as_str(), Box::new(docs)))
            },
        )))
    }
}
