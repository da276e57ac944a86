use std::time::Duration;

use fielddata_common::error::ErrorKind;
use fielddata_mlt::{MoreLikeThisRequest, Scroll, SearchType};

fn full_request() -> MoreLikeThisRequest {
    MoreLikeThisRequest::new("twitter")
        .with_doc_type("tweet")
        .with_id("1")
        .with_fields(["text", "user"])
        .with_percent_terms_to_match(0.5)
        .with_min_term_freq(2)
        .with_max_query_terms(25)
        .with_stop_words(["the", "a"])
        .with_min_doc_freq(5)
        .with_max_doc_freq(1000)
        .with_min_word_len(3)
        .with_max_word_len(20)
        .with_boost_terms(true)
        .with_boost_terms_factor(1.5)
        .with_search_type(SearchType::DfsQueryAndFetch)
        .with_search_query_hint("hint")
        .with_search_indices(["twitter", "archive"])
        .with_search_types(Vec::<String>::new())
        .with_search_scroll(Scroll::new(Duration::from_secs(90)))
        .with_search_source(r#"{"size":10}"#)
}

#[test]
fn test_every_field_survives_write_and_read() {
    let request = full_request();
    let bytes = request.to_bytes().unwrap();
    let decoded = MoreLikeThisRequest::from_slice(&bytes).unwrap();
    assert_eq!(decoded, request);
    assert_eq!(decoded.search_types(), Some(&[][..]));
    assert_eq!(decoded.search_source(), Some(&br#"{"size":10}"#[..]));
    assert_eq!(
        decoded.search_scroll().and_then(|scroll| scroll.keep_alive),
        Some(Duration::from_secs(90))
    );
}

#[test]
fn test_header_layout() {
    let request = MoreLikeThisRequest::new("i").with_doc_type("t").with_id("1");
    let bytes = request.to_bytes().unwrap();

    #[rustfmt::skip]
    let expected: &[u8] = &[
        0, 1, b'i',
        0, 1, b't',
        0, 1, b'1',
        0, 0, 0, 0,                         // fields: all
        0xbf, 0x80, 0, 0,                   // percent_terms_to_match: -1.0
        0xff, 0xff, 0xff, 0xff,             // min_term_freq
        0xff, 0xff, 0xff, 0xff,             // max_query_terms
        0, 0, 0, 0,                         // stop_words
        0xff, 0xff, 0xff, 0xff,             // min_doc_freq
        0xff, 0xff, 0xff, 0xff,             // max_doc_freq
        0xff, 0xff, 0xff, 0xff,             // min_word_len
        0xff, 0xff, 0xff, 0xff,             // max_word_len
        0,                                  // boost_terms: absent
        0xbf, 0x80, 0, 0,                   // boost_terms_factor
        1,                                  // query_then_fetch
        0,                                  // search_query_hint: absent
        0xff, 0xff, 0xff, 0xff,             // search_indices: absent
        0xff, 0xff, 0xff, 0xff,             // search_types: absent
        0,                                  // search_scroll: absent
        0, 0, 0, 0,                         // search_source
    ];
    assert_eq!(bytes, expected);
}

#[test]
fn test_optional_sections_layout() {
    let request = MoreLikeThisRequest::new("i")
        .with_doc_type("t")
        .with_id("1")
        .with_boost_terms(false)
        .with_search_indices(Vec::<String>::new())
        .with_search_source(vec![7u8, 8]);
    let bytes = request.to_bytes().unwrap();

    // boost_terms: present, false.
    assert_eq!(&bytes[45..47], &[1, 0]);
    // search_indices: empty array, distinct from absent.
    assert_eq!(&bytes[53..57], &[0, 0, 0, 0]);
    assert_eq!(&bytes[bytes.len() - 6..], &[0, 0, 0, 2, 7, 8]);
}

#[test]
fn test_non_ascii_identifiers() {
    let request = MoreLikeThisRequest::new("índice")
        .with_doc_type("typ\0e")
        .with_id("😀");
    let bytes = request.to_bytes().unwrap();
    // 'í' takes two bytes.
    assert_eq!(&bytes[..3], &[0, 7, 0xc3]);
    assert_eq!(MoreLikeThisRequest::from_slice(&bytes).unwrap(), request);
}

#[test]
fn test_unknown_search_type_is_rejected() {
    let request = MoreLikeThisRequest::new("i").with_doc_type("t").with_id("1");
    let mut bytes = request.to_bytes().unwrap();
    bytes[50] = 9;
    let err = MoreLikeThisRequest::from_slice(&bytes).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::InvalidFormat { element, .. } if element == "search_type"
    ));
}

#[test]
fn test_truncated_input_fails() {
    let bytes = full_request().to_bytes().unwrap();
    for len in [0, 3, bytes.len() / 2, bytes.len() - 1] {
        assert!(MoreLikeThisRequest::from_slice(&bytes[..len]).is_err());
    }
}

#[test]
fn test_random_requests_round_trip() {
    let mut rng = fastrand::Rng::with_seed(17);
    let word = |rng: &mut fastrand::Rng| -> String {
        (0..rng.usize(1..8)).map(|_| rng.alphanumeric()).collect()
    };
    for _ in 0..50 {
        let mut request = MoreLikeThisRequest::new(word(&mut rng))
            .with_doc_type(word(&mut rng))
            .with_id(word(&mut rng));
        if rng.bool() {
            let fields: Vec<String> = (0..rng.usize(1..4)).map(|_| word(&mut rng)).collect();
            request = request.with_fields(fields);
        }
        if rng.bool() {
            request = request.with_min_term_freq(rng.i32(0..100));
        }
        if rng.bool() {
            request = request.with_boost_terms(rng.bool());
        }
        if rng.bool() {
            let types: Vec<String> = (0..rng.usize(0..3)).map(|_| word(&mut rng)).collect();
            request = request.with_search_types(types);
        }
        if rng.bool() {
            let keep_alive = Duration::from_millis(rng.u64(1..1_000_000));
            request = request.with_search_scroll(Scroll::new(keep_alive));
        }
        let bytes = request.to_bytes().unwrap();
        assert_eq!(MoreLikeThisRequest::from_slice(&bytes).unwrap(), request);
    }
}

#[test]
fn test_negative_source_length_is_rejected() {
    let request = MoreLikeThisRequest::new("i").with_doc_type("t").with_id("1");
    let mut bytes = request.to_bytes().unwrap();
    let len = bytes.len();
    bytes[len - 4..].copy_from_slice(&(-5i32).to_be_bytes());
    let err = MoreLikeThisRequest::from_slice(&bytes).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::InvalidFormat { element, message }
            if element == "search_source" && message == "negative length -5"
    ));
}
