use std::path::PathBuf;

use super::Options;
use crate::error::{Error, Result};

pub fn run(path: PathBuf, key: String, options: Options) -> Result<()> {
    let props = super::load(&path, &options, false)?;
    let value = props
        .get(&key)
        .map_err(|source| Error::Get { key: key.clone(), source })?;

    println!("{}", value);
    Ok(())
}
