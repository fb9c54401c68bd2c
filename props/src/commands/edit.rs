use std::path::PathBuf;

use super::Options;
use crate::error::{Error, Result};

pub fn set(path: PathBuf, key: String, value: String, options: Options) -> Result<()> {
    let mut props = super::load(&path, &options, true)?;

    // Properties keep duplicates, so replacing a value means dropping the
    // existing entries first.
    while props.contains_key(&key) {
        props
            .remove(&key)
            .map_err(|source| Error::Set { key: key.clone(), source })?;
    }
    props
        .put(key.clone(), value)
        .map_err(|source| Error::Set { key, source })?;

    super::store(&props, options.format, &options)
}

pub fn remove(path: PathBuf, key: String, options: Options) -> Result<()> {
    let mut props = super::load(&path, &options, false)?;

    let removed = props
        .remove(&key)
        .map_err(|source| Error::Remove { key: key.clone(), source })?;

    match removed {
        Some(_) => super::store(&props, options.format, &options),
        None => {
            tracing::info!(%key, "key not present, nothing to remove");
            Ok(())
        }
    }
}
