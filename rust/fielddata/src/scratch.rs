//! Per-thread scratch values for allocation-free iteration.
//!
//! Whole-field iteration runs on hot paths (aggregations over every value of
//! a field), where materializing a fresh geohash `String` per value would
//! dominate. Each thread owns one [`Scratch`], created on first use, that
//! iteration overwrites before every callback.
//!
//! Access goes through [`with_scratch`], which lends `&mut Scratch` to a
//! closure; the borrow cannot outlive the closure, so a callback can never
//! keep a scratch value past the point where the next write replaces it. If
//! the thread's scratch is already lent out (a callback that starts another
//! iteration on the same thread) the inner call gets a fresh, temporary
//! scratch instead.

use std::cell::RefCell;

use fielddata_geo::GeoPoint;

/// Reusable per-thread values handed to iteration callbacks.
#[derive(Debug, Default)]
pub struct Scratch {
    /// Point overwritten before each point callback.
    pub point: GeoPoint,
    /// Buffer receiving the geohash of the current value.
    pub geohash: String,
}

impl Scratch {
    pub fn new() -> Scratch {
        Scratch {
            point: GeoPoint::default(),
            geohash: String::with_capacity(fielddata_geo::geohash::MAX_PRECISION),
        }
    }
}

thread_local! {
    static SCRATCH: RefCell<Scratch> = RefCell::new(Scratch::new());
}

/// Runs `f` with the calling thread's scratch values.
pub fn with_scratch<F, R>(f: F) -> R
where
    F: FnOnce(&mut Scratch) -> R,
{
    SCRATCH.with(|cell| match cell.try_borrow_mut() {
        Ok(mut scratch) => f(&mut scratch),
        Err(_) => f(&mut Scratch::new()),
    })
}
