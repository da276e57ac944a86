//! The follow-up search a more-like-this request runs.

use std::fmt;
use std::io::{Read, Write};
use std::time::Duration;

use byteorder::{BE, ReadBytesExt, WriteBytesExt};
use fielddata_common::{Result, error::Error};

use crate::wire;

/// How the follow-up search distributes query and fetch phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchType {
    DfsQueryThenFetch,
    #[default]
    QueryThenFetch,
    DfsQueryAndFetch,
    QueryAndFetch,
}

impl SearchType {
    /// The one-byte wire id.
    pub fn id(&self) -> u8 {
        match self {
            SearchType::DfsQueryThenFetch => 0,
            SearchType::QueryThenFetch => 1,
            SearchType::DfsQueryAndFetch => 2,
            SearchType::QueryAndFetch => 3,
        }
    }

    pub fn from_id(id: u8) -> Result<SearchType> {
        match id {
            0 => Ok(SearchType::DfsQueryThenFetch),
            1 => Ok(SearchType::QueryThenFetch),
            2 => Ok(SearchType::DfsQueryAndFetch),
            3 => Ok(SearchType::QueryAndFetch),
            _ => Err(Error::invalid_format(
                "search_type",
                format!("unknown search type id {id}"),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchType::DfsQueryThenFetch => "dfs_query_then_fetch",
            SearchType::QueryThenFetch => "query_then_fetch",
            SearchType::DfsQueryAndFetch => "dfs_query_and_fetch",
            SearchType::QueryAndFetch => "query_and_fetch",
        }
    }

    /// Parses the REST name of a search type.
    pub fn from_name(name: &str) -> Result<SearchType> {
        [
            SearchType::DfsQueryThenFetch,
            SearchType::QueryThenFetch,
            SearchType::DfsQueryAndFetch,
            SearchType::QueryAndFetch,
        ]
        .into_iter()
        .find(|search_type| search_type.name() == name)
        .ok_or_else(|| Error::invalid_arg("search_type", format!("unknown search type '{name}'")))
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit of a serialized duration, by its ordinal on the wire.
const TIME_UNITS: [(u8, u128); 7] = [
    (0, 1),                      // nanoseconds
    (1, 1_000),                  // microseconds
    (2, 1_000_000),              // milliseconds
    (3, 1_000_000_000),          // seconds
    (4, 60_000_000_000),         // minutes
    (5, 3_600_000_000_000),      // hours
    (6, 86_400_000_000_000),     // days
];

const MILLISECONDS: u8 = 2;

/// Scroll context of the follow-up search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scroll {
    /// How long the scroll context is kept between requests.
    pub keep_alive: Option<Duration>,
}

impl Scroll {
    pub fn new(keep_alive: Duration) -> Scroll {
        Scroll {
            keep_alive: Some(keep_alive),
        }
    }

    /// Writes the keep-alive as a presence flag, an `i64` count of
    /// milliseconds and the milliseconds unit ordinal.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        match self.keep_alive {
            None => wire::write_bool(w, false)?,
            Some(keep_alive) => {
                let millis = i64::try_from(keep_alive.as_millis()).map_err(|_| {
                    Error::invalid_arg("keep_alive", "does not fit in i64 milliseconds")
                })?;
                wire::write_bool(w, true)?;
                w.write_i64::<BE>(millis)?;
                w.write_u8(MILLISECONDS)?;
            }
        }
        Ok(())
    }

    /// Reads a keep-alive in any unit from nanoseconds to days.
    pub fn read_from<R: Read + ?Sized>(r: &mut R) -> Result<Scroll> {
        if !wire::read_bool(r)? {
            return Ok(Scroll::default());
        }
        let duration = r.read_i64::<BE>()?;
        let unit = r.read_u8()?;
        let duration = u128::try_from(duration).map_err(|_| {
            Error::invalid_format("keep_alive", format!("negative duration {duration}"))
        })?;
        let (_, nanos_per_unit) = TIME_UNITS
            .iter()
            .find(|(ordinal, _)| *ordinal == unit)
            .ok_or_else(|| {
                Error::invalid_format("keep_alive", format!("unknown time unit {unit}"))
            })?;
        let nanos = duration
            .checked_mul(*nanos_per_unit)
            .and_then(|nanos| u64::try_from(nanos).ok())
            .ok_or_else(|| Error::invalid_format("keep_alive", "duration overflow"))?;
        Ok(Scroll {
            keep_alive: Some(Duration::from_nanos(nanos)),
        })
    }
}
