use thiserror::Error;

/// A crate-specific error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A generic backend error.
    #[error("backend error: {0}")]
    Backend(String),

    /// [bb8::RunError]
    #[cfg(feature = "mobilitydb")]
    #[error(transparent)]
    Bb8TokioPostgresRun(#[from] bb8::RunError<tokio_postgres::Error>),

    /// A memory backend error.
    #[error("memory backend error: {0}")]
    MemoryBackend(String),

    /// [mf::Error]
    #[error(transparent)]
    Mf(#[from] mf::Error),

    /// [mf_api::Error]
    #[error(transparent)]
    MfApi(#[from] mf_api::Error),

    /// [mobdb::Error]
    #[cfg(feature = "mobilitydb")]
    #[error(transparent)]
    Mobdb(#[from] mobdb::Error),

    /// A submitted value sequence overlaps an existing one in time.
    #[error("temporal property \"{0}\" already has a sequence overlapping the submitted datetimes")]
    OverlappingSequence(String),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [serde_urlencoded::ser::Error]
    #[error(transparent)]
    SerdeUrlencodedSer(#[from] serde_urlencoded::ser::Error),

    /// [tokio_postgres::Error]
    #[cfg(feature = "mobilitydb")]
    #[error(transparent)]
    TokioPostgres(#[from] tokio_postgres::Error),

    /// [url::ParseError]
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}
