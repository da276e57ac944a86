//! Test utilities for the fielddata crates.
//!
//! - [`data_gen`]: random geo-point segments together with the points every
//!   document is expected to load as.
//! - [`faults`]: segment readers that misbehave in controlled ways.
//! - [`files`]: temporary files holding test fixtures.

pub mod data_gen;
pub mod faults;
pub mod files;
