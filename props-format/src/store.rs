use std::fs::{File, OpenOptions, Permissions};
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::escape::{escape, escape_symmetric};
use crate::{Error, Pair, Properties, Result};

/// Persists a property set to the file it points at.
///
/// The returned handle has been fully written and flushed. It is owned by the
/// caller and closed when dropped.
pub trait Store {
    fn store(&self, properties: &Properties) -> Result<File>;
}

impl<S: Store + ?Sized> Store for &S {
    fn store(&self, properties: &Properties) -> Result<File> {
        (**self).store(properties)
    }
}

/// Writes one `escapedKey=escapedValue\n` line per pair, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineStore {
    atomic: bool,
    symmetric: bool,
}

impl LineStore {
    pub fn new() -> LineStore {
        LineStore::default()
    }

    /// Writes to a temporary file next to the target and renames it over the
    /// target once everything has been flushed to disk.
    pub fn atomic() -> LineStore {
        LineStore::new().with_atomic(true)
    }

    /// Also escapes backslashes, so that [`crate::LineParser::unescaping`]
    /// reads back exactly what was stored.
    pub fn symmetric() -> LineStore {
        LineStore::new().with_symmetric(true)
    }

    pub fn with_atomic(mut self, atomic: bool) -> LineStore {
        self.atomic = atomic;
        self
    }

    pub fn with_symmetric(mut self, symmetric: bool) -> LineStore {
        self.symmetric = symmetric;
        self
    }

    #[inline(always)]
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    #[inline(always)]
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Writes `pairs` as escaped property lines and flushes `writer`.
    pub fn write_to<'a, W, I>(&self, writer: W, pairs: I) -> std::io::Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'a Pair>,
    {
        let encode: fn(&str, bool) -> String = if self.symmetric {
            escape_symmetric
        } else {
            escape
        };
        let mut writer = BufWriter::new(writer);

        for pair in pairs {
            let line = format!("{}={}\n", encode(&pair.key, true), encode(&pair.value, false));
            tracing::trace!(line = line.trim_end(), "writing line");
            writer.write_all(line.as_bytes())?;
        }

        writer.flush()
    }

    fn store_in_place(&self, properties: &Properties, path: &Path) -> Result<File> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(Error::io(path))?;

        self.write_to(&mut file, properties).map_err(Error::io(path))?;
        Ok(file)
    }

    fn store_atomic(&self, properties: &Properties, path: &Path) -> Result<File> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir).map_err(Error::io(dir))?;

        self.write_to(temp.as_file_mut(), properties)
            .map_err(Error::io(temp.path()))?;

        // The temporary file is owner-only; the target keeps its own mode.
        let permissions = match std::fs::metadata(path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => default_permissions(),
        };
        if let Some(permissions) = permissions {
            temp.as_file()
                .set_permissions(permissions)
                .map_err(Error::io(temp.path()))?;
        }
        temp.as_file().sync_all().map_err(Error::io(temp.path()))?;

        temp.persist(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e.error,
        })
    }
}

impl Store for LineStore {
    fn store(&self, properties: &Properties) -> Result<File> {
        let path = properties.path()?;

        let file = if self.atomic {
            self.store_atomic(properties, &path)?
        } else {
            self.store_in_place(properties, &path)?
        };

        tracing::debug!(
            path = %path.display(),
            count = properties.len(),
            atomic = self.atomic,
            symmetric = self.symmetric,
            "stored property file"
        );
        Ok(file)
    }
}

/// Writes `pairs` the way the default [`LineStore`] does.
pub fn write_pairs<'a, W, I>(writer: W, pairs: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Pair>,
{
    LineStore::new().write_to(writer, pairs)
}

/// Mode for a file created by an atomic store, matching what an in-place
/// store gets under the usual umask.
#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(pairs: &[Pair]) -> String {
        let mut out = vec![];
        write_pairs(&mut out, pairs).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_one_line_per_pair() {
        let pairs = vec![
            Pair::new("key1", "value1").unwrap(),
            Pair::new("key2", "").unwrap(),
        ];
        assert_eq!(render(&pairs), "key1=value1\nkey2=\n");
    }

    #[test]
    fn escapes_keys_and_values() {
        let pairs = vec![
            Pair::new("a key", " \tsecret # not a comment").unwrap(),
            Pair::new("url", "http://x?a=b").unwrap(),
        ];
        assert_eq!(
            render(&pairs),
            "a\\ key=\\ \\tsecret \\# not a comment\nurl=http\\://x?a\\=b\n"
        );
    }

    #[test]
    fn symmetric_store_escapes_backslashes() {
        let pairs = vec![Pair::new(r"k\", r"C:\dir\").unwrap()];
        assert_eq!(render(&pairs), "k\\=C\\:\\dir\\\n");

        let mut out = vec![];
        LineStore::symmetric().write_to(&mut out, &pairs).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "k\\\\=C\\:\\\\dir\\\\\n"
        );
    }

    #[test]
    fn options_combine() {
        let store = LineStore::symmetric().with_atomic(true);
        assert!(store.is_atomic());
        assert!(store.is_symmetric());
        assert!(!LineStore::atomic().is_symmetric());
    }

    #[test]
    fn uninitialized_set_cannot_be_stored() {
        let props = Properties::default();
        assert!(matches!(
            LineStore::new().store(&props),
            Err(Error::Uninitialized)
        ));
    }
}
