use std::sync::Arc;

use fielddata_index::{MemorySegment, SegmentReader};

fn terms_of(reader: &dyn SegmentReader, field: &str) -> Vec<(String, Vec<u32>)> {
    reader
        .field_terms(field)
        .expect("field_terms")
        .map(|entry| {
            let entry = entry.expect("term entry");
            let docs = entry
                .docs
                .collect::<fielddata_common::Result<Vec<_>>>()
                .expect("postings");
            (entry.term.into_owned(), docs)
        })
        .collect()
}

#[test]
fn test_shared_reader_enumerates_fields_independently() {
    let mut builder = MemorySegment::builder();
    builder.add_document([("location", "10.0,20.0"), ("tag", "home")]);
    builder.add_empty_documents(1);
    builder.add_document([("location", "30.0,40.0"), ("location", "10.0,20.0")]);
    let reader: Arc<dyn SegmentReader> = Arc::new(builder.build());

    assert_eq!(reader.max_doc(), 3);
    assert_eq!(
        terms_of(reader.as_ref(), "location"),
        [
            ("10.0,20.0".to_string(), vec![0, 2]),
            ("30.0,40.0".to_string(), vec![2]),
        ]
    );
    assert_eq!(terms_of(reader.as_ref(), "tag"), [("home".to_string(), vec![0])]);

    // Enumeration is repeatable and does not consume the segment.
    assert_eq!(terms_of(reader.as_ref(), "location").len(), 2);
}

#[test]
fn test_rebuilt_segment_gets_new_identity() {
    let first = MemorySegment::builder().build();
    let second = MemorySegment::builder().build();
    assert_ne!(first.segment_id(), second.segment_id());
    assert_eq!(first.max_doc(), 0);
}
