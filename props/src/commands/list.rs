use std::path::PathBuf;

use super::Options;
use crate::error::Result;

pub fn run(path: PathBuf, values: bool, options: Options) -> Result<()> {
    let props = super::load(&path, &options, false)?;

    if values {
        for pair in props.iter() {
            println!("{}", pair);
        }
    } else {
        for key in props.keys() {
            println!("{}", key);
        }
    }

    Ok(())
}
