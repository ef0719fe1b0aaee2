use thiserror::Error;

/// Error enum for crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [chrono::ParseError]
    #[error(transparent)]
    ChronoParse(#[from] chrono::ParseError),

    /// The coordinates of a trajectory mix 2D and 3D positions.
    #[error("inconsistent coordinate dimensions")]
    InconsistentDimensions,

    /// This vector is not a valid bounding box.
    #[error("invalid bbox: {0:?}")]
    InvalidBbox(Vec<f64>),

    /// A position is not an array of two or three numbers.
    #[error("invalid position: {0}")]
    InvalidPosition(serde_json::Value),

    /// This value is not a valid instant.
    #[error("invalid instant: {0}")]
    InvalidInstant(String),

    /// A period's lower bound is after its upper bound.
    #[error("invalid period: {lower} is after {upper}")]
    InvalidPeriod {
        /// The lower bound.
        lower: chrono::DateTime<chrono::Utc>,

        /// The upper bound.
        upper: chrono::DateTime<chrono::Utc>,
    },

    /// A temporal sequence's `datetimes` and value arrays disagree in length.
    #[error("datetimes and {0} have different lengths")]
    LengthMismatch(&'static str),

    /// Returned when there is not a required member on an MF-JSON object.
    #[error("no \"{0}\" member in the MF-JSON object")]
    MissingMember(String),

    /// A temporal sequence's datetimes are not strictly ascending.
    #[error("datetimes are not strictly ascending")]
    NotAscending,

    /// This is not a JSON object.
    #[error("json value is not an object")]
    NotAnObject,

    /// A temporal sequence has no samples.
    #[error("empty temporal sequence")]
    EmptySequence,

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// This temporal geometry type is not a moving point.
    #[error("unsupported temporal geometry type: {0}")]
    UnsupportedGeometryType(String),

    /// This interpolation name is not recognized in either dialect.
    #[error("unsupported interpolation: {0}")]
    UnsupportedInterpolation(String),
}
