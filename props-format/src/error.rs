use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("key must not be empty or whitespace")]
    InvalidKey,

    #[error("key not found: `{key}`")]
    KeyNotFound { key: String },

    #[error("property set has no backing file")]
    Uninitialized,

    #[error("I/O failure on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "json")]
    #[error("invalid JSON property file `{}`", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }

    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Error::InvalidKey)
    }

    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }
}
