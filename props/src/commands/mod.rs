use std::path::Path;

use props_format::json::{JsonParser, JsonStore};
use props_format::{LineParser, LineStore, Parser, Properties, Store};

use crate::error::{Error, Result};

pub mod convert;
pub mod edit;
pub mod get;
pub mod list;

pub use convert::run as convert;
pub use edit::remove;
pub use edit::set;
pub use get::run as get;
pub use list::run as list;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Properties,
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub format: Format,
    pub unescape: bool,
    pub atomic: bool,
}

impl Options {
    fn parser(&self) -> Box<dyn Parser> {
        match self.format {
            Format::Properties if self.unescape => Box::new(LineParser::unescaping()),
            Format::Properties => Box::new(LineParser::new()),
            Format::Json => Box::new(JsonParser::new()),
        }
    }

    fn store(&self, format: Format) -> Box<dyn Store> {
        match format {
            Format::Properties => Box::new(
                LineStore::new()
                    .with_atomic(self.atomic)
                    .with_symmetric(self.unescape),
            ),
            Format::Json => Box::new(JsonStore::pretty()),
        }
    }
}

fn locate(path: &Path) -> Result<Properties> {
    let file_name = path
        .file_name()
        .and_then(|x| x.to_str())
        .ok_or_else(|| Error::InvalidPath {
            path: path.to_path_buf(),
        })?;
    let directory = path.parent().unwrap_or_else(|| Path::new("."));

    Ok(Properties::new(directory, file_name))
}

/// Loads the file at `path`. With `allow_missing`, a file that does not
/// exist yet yields an empty set that will be created on store.
fn load(path: &Path, options: &Options, allow_missing: bool) -> Result<Properties> {
    let mut props = locate(path)?;

    if allow_missing && !path.exists() {
        tracing::debug!(path = %path.display(), "starting from an empty property set");
        return Ok(props);
    }

    let parser = options.parser();
    props.load(&*parser).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(props)
}

fn store(props: &Properties, format: Format, options: &Options) -> Result<()> {
    let store = options.store(format);

    // The handle is closed as soon as it is dropped here.
    props.store(&*store).map_err(|source| Error::Store {
        path: props
            .path()
            .unwrap_or_else(|_| props.directory().to_path_buf()),
        source,
    })?;

    Ok(())
}
