use chrono::{DateTime, Utc};
use thiserror::Error;

/// Crate-specific error enum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// [chrono::ParseError]
    #[error(transparent)]
    ChronoParse(#[from] chrono::ParseError),

    /// Invalid bounding box.
    #[error("invalid bbox ({0}): {1}")]
    InvalidBbox(String, &'static str),

    /// This value is not a recognized boolean.
    #[error("invalid boolean: {0}")]
    InvalidBoolean(String),

    /// The limit is outside the accepted range.
    #[error("limit must be between 1 and {max}, got {0}", max = crate::MAX_LIMIT)]
    InvalidLimit(u64),

    /// The leaf parameter cannot be combined with a sub-selection flag.
    #[error("leaf cannot be combined with {0}=true")]
    LeafConflict(&'static str),

    /// The leaf instants are not strictly ascending.
    #[error("leaf instants are not strictly ascending")]
    LeafNotAscending,

    /// [mf::Error]
    #[error(transparent)]
    Mf(#[from] mf::Error),

    /// [std::num::ParseFloatError]
    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// [std::num::ParseIntError]
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// A datetime interval's start is after its end.
    #[error("start is after end: {0}/{1}")]
    StartIsAfterEnd(DateTime<Utc>, DateTime<Utc>),
}
