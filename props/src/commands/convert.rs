use std::path::PathBuf;

use super::{Format, Options};
use crate::error::Result;

pub fn run(path: PathBuf, dest: PathBuf, to: Format, options: Options) -> Result<()> {
    let mut props = super::load(&path, &options, false)?;
    let target = super::locate(&dest)?;

    props.set_directory(target.directory());
    props.set_file_name(target.file_name());

    if dest.exists() {
        tracing::warn!(path = %dest.display(), "overwriting existing file");
    }

    super::store(&props, to, &options)?;
    tracing::info!(
        from = %path.display(),
        to = %dest.display(),
        count = props.len(),
        "converted property file"
    );

    Ok(())
}
