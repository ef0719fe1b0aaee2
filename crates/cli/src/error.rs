use thiserror::Error;

/// A crate-specific error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// [mf_server::Error]
    #[error(transparent)]
    MfServer(#[from] mf_server::Error),

    /// [toml::de::Error]
    #[error(transparent)]
    TomlDe(#[from] Box<toml::de::Error>),
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::TomlDe(Box::new(error))
    }
}
