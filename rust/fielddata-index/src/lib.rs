//! Index segment access for field data loading.
//!
//! This crate defines the narrow view of an inverted index that field data
//! construction depends on: a segment exposes its document count and, for one
//! field at a time, its terms in ascending byte order together with the
//! documents each term was indexed for.
//!
//! # Overview
//!
//! - [`SegmentReader`]: the trait an index segment implements to be uninverted.
//! - [`TermPostings`]: one term of a field and its posting list.
//! - [`MemorySegment`]: a self-contained in-memory segment, built with
//!   [`MemorySegmentBuilder`], used by tests and by embedders that keep small
//!   indexes resident.
//!
//! Segments are immutable. A segment that is replaced (after a merge or a
//! reopen) gets a new [`SegmentId`], which is what caches key on.

pub mod memory;
pub mod reader;

pub use memory::{MemorySegment, MemorySegmentBuilder};
pub use reader::{Postings, SegmentId, SegmentReader, TermPostings, TermsIter};
