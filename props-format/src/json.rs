//! A JSON encoding of a property set: an array of `{"key": .., "value": ..}`
//! objects kept in order, so duplicate keys survive a round-trip.

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Pair, Parser, Properties, Result, Store};

#[derive(Debug, Serialize, Deserialize)]
struct Entry<'a> {
    key: Cow<'a, str>,
    value: Cow<'a, str>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore {
    pretty: bool,
}

impl JsonParser {
    pub fn new() -> JsonParser {
        JsonParser
    }

    /// Entries with a blank key are skipped, like lines with a blank key in
    /// a `.properties` file.
    pub fn parse_reader<R: Read>(&self, reader: R) -> serde_json::Result<Vec<Pair>> {
        let entries: Vec<Entry<'static>> = serde_json::from_reader(reader)?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| match Pair::new(entry.key, entry.value) {
                Ok(pair) => Some(pair),
                Err(_) => {
                    tracing::trace!("skipped entry with blank key");
                    None
                }
            })
            .collect())
    }
}

impl JsonStore {
    pub fn new() -> JsonStore {
        JsonStore::default()
    }

    pub fn pretty() -> JsonStore {
        JsonStore { pretty: true }
    }

    pub fn write_to<'a, W, I>(&self, writer: W, pairs: I) -> std::io::Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'a Pair>,
    {
        let entries = pairs
            .into_iter()
            .map(|pair| Entry {
                key: Cow::Borrowed(pair.key()),
                value: Cow::Borrowed(pair.value()),
            })
            .collect::<Vec<_>>();

        let mut writer = BufWriter::new(writer);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &entries)?;
        } else {
            serde_json::to_writer(&mut writer, &entries)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

fn json_error(path: &Path, source: serde_json::Error) -> Error {
    if source.is_io() {
        Error::Io {
            path: path.to_path_buf(),
            source: source.into(),
        }
    } else {
        Error::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Parser for JsonParser {
    fn parse(&self, directory: &Path, file_name: &str) -> Result<Vec<Pair>> {
        let path = directory.join(file_name);
        let file = File::open(&path).map_err(Error::io(&path))?;
        let pairs = self
            .parse_reader(BufReader::new(file))
            .map_err(|e| json_error(&path, e))?;

        tracing::debug!(path = %path.display(), count = pairs.len(), "parsed JSON property file");
        Ok(pairs)
    }
}

impl Store for JsonStore {
    fn store(&self, properties: &Properties) -> Result<File> {
        let path = properties.path()?;
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(Error::io(&path))?;

        self.write_to(&mut file, properties)
            .map_err(Error::io(&path))?;

        tracing::debug!(path = %path.display(), count = properties.len(), "stored JSON property file");
        Ok(file)
    }
}
