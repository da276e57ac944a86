//! The "more like this" request.
//!
//! A more-like-this request names one stored document (`index`, `type`,
//! `id`) and asks for documents similar to it. The tuning parameters shape
//! the generated similarity query; the `search_*` parameters describe the
//! search that executes it.
//!
//! Numeric tuning parameters are unset by default and travel as `-1` on the
//! wire, leaving the choice to the executing node.

use std::io::{Read, Write};

use byteorder::{BE, ReadBytesExt, WriteBytesExt};
use fielddata_common::{Result, error::Error, verify_data};
use log::trace;

use crate::search::{Scroll, SearchType};
use crate::wire;

const UNSET: i32 = -1;

/// Wire value of an absent `search_indices` / `search_types` array.
const ABSENT_ARRAY: i32 = -1;

/// Wire value of an absent `fields` / `stop_words` array or `search_source`.
const EMPTY: i32 = 0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoreLikeThisRequest {
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    fields: Option<Vec<String>>,
    percent_terms_to_match: Option<f32>,
    min_term_freq: Option<i32>,
    max_query_terms: Option<i32>,
    stop_words: Option<Vec<String>>,
    min_doc_freq: Option<i32>,
    max_doc_freq: Option<i32>,
    min_word_len: Option<i32>,
    max_word_len: Option<i32>,
    boost_terms: Option<bool>,
    boost_terms_factor: Option<f32>,
    search_type: SearchType,
    search_query_hint: Option<String>,
    search_indices: Option<Vec<String>>,
    search_types: Option<Vec<String>>,
    search_scroll: Option<Scroll>,
    search_source: Option<Vec<u8>>,
}

impl MoreLikeThisRequest {
    /// A request against `index`; `doc_type` and `id` must still be set.
    pub fn new(index: impl Into<String>) -> MoreLikeThisRequest {
        MoreLikeThisRequest {
            index: Some(index.into()),
            ..Default::default()
        }
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn doc_type(&self) -> Option<&str> {
        self.doc_type.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Fields the similarity is computed on; `None` means all fields.
    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn percent_terms_to_match(&self) -> Option<f32> {
        self.percent_terms_to_match
    }

    pub fn min_term_freq(&self) -> Option<i32> {
        self.min_term_freq
    }

    pub fn max_query_terms(&self) -> Option<i32> {
        self.max_query_terms
    }

    pub fn stop_words(&self) -> Option<&[String]> {
        self.stop_words.as_deref()
    }

    pub fn min_doc_freq(&self) -> Option<i32> {
        self.min_doc_freq
    }

    pub fn max_doc_freq(&self) -> Option<i32> {
        self.max_doc_freq
    }

    pub fn min_word_len(&self) -> Option<i32> {
        self.min_word_len
    }

    pub fn max_word_len(&self) -> Option<i32> {
        self.max_word_len
    }

    pub fn boost_terms(&self) -> Option<bool> {
        self.boost_terms
    }

    pub fn boost_terms_factor(&self) -> Option<f32> {
        self.boost_terms_factor
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    pub fn search_query_hint(&self) -> Option<&str> {
        self.search_query_hint.as_deref()
    }

    pub fn search_indices(&self) -> Option<&[String]> {
        self.search_indices.as_deref()
    }

    pub fn search_types(&self) -> Option<&[String]> {
        self.search_types.as_deref()
    }

    pub fn search_scroll(&self) -> Option<&Scroll> {
        self.search_scroll.as_ref()
    }

    /// Raw source of the follow-up search.
    pub fn search_source(&self) -> Option<&[u8]> {
        self.search_source.as_deref()
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Restricts the similarity to `fields`. An empty list means all fields.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = non_empty(fields);
        self
    }

    pub fn with_percent_terms_to_match(mut self, percent: f32) -> Self {
        self.percent_terms_to_match = Some(percent);
        self
    }

    pub fn with_min_term_freq(mut self, min_term_freq: i32) -> Self {
        self.min_term_freq = Some(min_term_freq);
        self
    }

    pub fn with_max_query_terms(mut self, max_query_terms: i32) -> Self {
        self.max_query_terms = Some(max_query_terms);
        self
    }

    /// Words ignored when building the similarity query.
    pub fn with_stop_words<I, S>(mut self, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = non_empty(stop_words);
        self
    }

    pub fn with_min_doc_freq(mut self, min_doc_freq: i32) -> Self {
        self.min_doc_freq = Some(min_doc_freq);
        self
    }

    pub fn with_max_doc_freq(mut self, max_doc_freq: i32) -> Self {
        self.max_doc_freq = Some(max_doc_freq);
        self
    }

    pub fn with_min_word_len(mut self, min_word_len: i32) -> Self {
        self.min_word_len = Some(min_word_len);
        self
    }

    pub fn with_max_word_len(mut self, max_word_len: i32) -> Self {
        self.max_word_len = Some(max_word_len);
        self
    }

    pub fn with_boost_terms(mut self, boost_terms: bool) -> Self {
        self.boost_terms = Some(boost_terms);
        self
    }

    pub fn with_boost_terms_factor(mut self, factor: f32) -> Self {
        self.boost_terms_factor = Some(factor);
        self
    }

    pub fn with_search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn with_search_query_hint(mut self, hint: impl Into<String>) -> Self {
        self.search_query_hint = Some(hint.into());
        self
    }

    pub fn with_search_indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_indices = Some(indices.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_search_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_search_scroll(mut self, scroll: Scroll) -> Self {
        self.search_scroll = Some(scroll);
        self
    }

    /// Sets the follow-up search source. An empty source is the same as none.
    pub fn with_search_source(mut self, source: impl Into<Vec<u8>>) -> Self {
        let source = source.into();
        self.search_source = (!source.is_empty()).then_some(source);
        self
    }

    /// Messages for every missing required parameter, in parameter order.
    pub fn validation_errors(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        if self.index.is_none() {
            errors.push("index is missing");
        }
        if self.doc_type.is_none() {
            errors.push("type is missing");
        }
        if self.id.is_none() {
            errors.push("id is missing");
        }
        errors
    }

    /// Fails with `InvalidArgument` listing every missing required parameter.
    pub fn validate(&self) -> Result<()> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_arg("request", errors.join("; ")))
        }
    }

    /// Serializes the request. Invalid requests are refused.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.validate()?;
        wire::write_utf(w, self.index.as_deref().unwrap_or_default())?;
        wire::write_utf(w, self.doc_type.as_deref().unwrap_or_default())?;
        wire::write_utf(w, self.id.as_deref().unwrap_or_default())?;
        wire::write_strings(w, self.fields.as_deref(), EMPTY)?;

        w.write_f32::<BE>(self.percent_terms_to_match.unwrap_or(UNSET as f32))?;
        w.write_i32::<BE>(self.min_term_freq.unwrap_or(UNSET))?;
        w.write_i32::<BE>(self.max_query_terms.unwrap_or(UNSET))?;
        wire::write_strings(w, self.stop_words.as_deref(), EMPTY)?;
        w.write_i32::<BE>(self.min_doc_freq.unwrap_or(UNSET))?;
        w.write_i32::<BE>(self.max_doc_freq.unwrap_or(UNSET))?;
        w.write_i32::<BE>(self.min_word_len.unwrap_or(UNSET))?;
        w.write_i32::<BE>(self.max_word_len.unwrap_or(UNSET))?;
        match self.boost_terms {
            None => wire::write_bool(w, false)?,
            Some(boost_terms) => {
                wire::write_bool(w, true)?;
                wire::write_bool(w, boost_terms)?;
            }
        }
        w.write_f32::<BE>(self.boost_terms_factor.unwrap_or(UNSET as f32))?;

        w.write_u8(self.search_type.id())?;
        match &self.search_query_hint {
            None => wire::write_bool(w, false)?,
            Some(hint) => {
                wire::write_bool(w, true)?;
                wire::write_utf(w, hint)?;
            }
        }
        wire::write_strings(w, self.search_indices.as_deref(), ABSENT_ARRAY)?;
        wire::write_strings(w, self.search_types.as_deref(), ABSENT_ARRAY)?;
        match &self.search_scroll {
            None => wire::write_bool(w, false)?,
            Some(scroll) => {
                wire::write_bool(w, true)?;
                scroll.write_to(w)?;
            }
        }
        match &self.search_source {
            None => w.write_i32::<BE>(EMPTY)?,
            Some(source) => {
                wire::write_len(w, source.len())?;
                w.write_all(source)?;
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        trace!("encoded more-like-this request into {} bytes", out.len());
        Ok(out)
    }

    /// Deserializes a request written by [`write_to`](Self::write_to).
    pub fn read_from<R: Read + ?Sized>(r: &mut R) -> Result<MoreLikeThisRequest> {
        let index = wire::read_utf(r)?;
        let doc_type = wire::read_utf(r)?;
        let id = wire::read_utf(r)?;
        let fields = wire::read_strings(r, "fields", EMPTY)?;

        let percent_terms_to_match = unset_f32(r.read_f32::<BE>()?);
        let min_term_freq = unset_i32(r.read_i32::<BE>()?);
        let max_query_terms = unset_i32(r.read_i32::<BE>()?);
        let stop_words = wire::read_strings(r, "stop_words", EMPTY)?;
        let min_doc_freq = unset_i32(r.read_i32::<BE>()?);
        let max_doc_freq = unset_i32(r.read_i32::<BE>()?);
        let min_word_len = unset_i32(r.read_i32::<BE>()?);
        let max_word_len = unset_i32(r.read_i32::<BE>()?);
        let boost_terms = if wire::read_bool(r)? {
            Some(wire::read_bool(r)?)
        } else {
            None
        };
        let boost_terms_factor = unset_f32(r.read_f32::<BE>()?);

        let search_type = SearchType::from_id(r.read_u8()?)?;
        let search_query_hint = if wire::read_bool(r)? {
            Some(wire::read_utf(r)?)
        } else {
            None
        };
        let search_indices = wire::read_strings(r, "search_indices", ABSENT_ARRAY)?;
        let search_types = wire::read_strings(r, "search_types", ABSENT_ARRAY)?;
        let search_scroll = if wire::read_bool(r)? {
            Some(Scroll::read_from(r)?)
        } else {
            None
        };
        let search_source = match r.read_i32::<BE>()? {
            EMPTY => None,
            len => {
                verify_data!(search_source, len > 0, "negative length {len}");
                Some(wire::read_bytes(r, "search_source", len as usize)?)
            }
        };

        Ok(MoreLikeThisRequest {
            index: Some(index),
            doc_type: Some(doc_type),
            id: Some(id),
            // An empty list and "all fields" share the zero count.
            fields: fields.filter(|fields| !fields.is_empty()),
            percent_terms_to_match,
            min_term_freq,
            max_query_terms,
            stop_words: stop_words.filter(|words| !words.is_empty()),
            min_doc_freq,
            max_doc_freq,
            min_word_len,
            max_word_len,
            boost_terms,
            boost_terms_factor,
            search_type,
            search_query_hint,
            search_indices,
            search_types,
            search_scroll,
            search_source,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<MoreLikeThisRequest> {
        let mut r = bytes;
        let request = Self::read_from(&mut r)?;
        if !r.is_empty() {
            return Err(Error::invalid_format(
                "more_like_this",
                format!("{} trailing bytes", r.len()),
            ));
        }
        Ok(request)
    }
}

fn non_empty<I, S>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    (!values.is_empty()).then_some(values)
}

fn unset_i32(value: i32) -> Option<i32> {
    (value != UNSET).then_some(value)
}

fn unset_f32(value: f32) -> Option<f32> {
    (value != UNSET as f32).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let request = MoreLikeThisRequest::default();
        assert_eq!(
            request.validation_errors(),
            ["index is missing", "type is missing", "id is missing"]
        );

        let request = MoreLikeThisRequest::new("twitter").with_id("1");
        assert_eq!(request.validation_errors(), ["type is missing"]);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("type is missing"));
        assert!(request.to_bytes().is_err());

        assert!(request.with_doc_type("tweet").validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let request = MoreLikeThisRequest::new("twitter");
        assert_eq!(request.search_type(), SearchType::QueryThenFetch);
        assert_eq!(request.min_term_freq(), None);
        assert_eq!(request.fields(), None);
        assert_eq!(
            MoreLikeThisRequest::new("i").with_fields(Vec::<String>::new()).fields(),
            None
        );
    }

    #[test]
    fn test_minimal_round_trip() {
        let request = MoreLikeThisRequest::new("i").with_doc_type("t").with_id("1");
        let bytes = request.to_bytes().unwrap();
        assert_eq!(MoreLikeThisRequest::from_slice(&bytes).unwrap(), request);
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let request = MoreLikeThisRequest::new("i").with_doc_type("t").with_id("1");
        let mut bytes = request.to_bytes().unwrap();
        bytes.push(0);
        assert!(MoreLikeThisRequest::from_slice(&bytes).is_err());
    }
}
