//! The "more like this" request and its binary wire format.
//!
//! The encoding is the big-endian `DataOutput` layout: `i32`/`i64`/`f32`
//! numbers, one-byte booleans and `u16`-prefixed modified UTF-8 strings (see
//! [`wire`]). Requests are written with [`MoreLikeThisRequest::write_to`] and
//! read back with [`MoreLikeThisRequest::read_from`].

pub mod request;
pub mod search;
pub mod wire;

pub use request::MoreLikeThisRequest;
pub use search::{Scroll, SearchType};
