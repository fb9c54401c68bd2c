use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot handle path `{}`", .path.display())]
    InvalidPath { path: PathBuf },

    #[error("Cannot load property file `{}`", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: props_format::Error,
    },

    #[error("Cannot store property file `{}`", .path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: props_format::Error,
    },

    #[error("Cannot read key `{key}`")]
    Get {
        key: String,
        #[source]
        source: props_format::Error,
    },

    #[error("Cannot set key `{key}`")]
    Set {
        key: String,
        #[source]
        source: props_format::Error,
    },

    #[error("Cannot remove key `{key}`")]
    Remove {
        key: String,
        #[source]
        source: props_format::Error,
    },
}
