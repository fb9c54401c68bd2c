use std::fs::File;
use std::path::{Component, Path, PathBuf};

use crate::pair::is_blank;
use crate::{Error, LineParser, LineStore, Pair, Parser, Result, Store};

/// An ordered set of property pairs bound to a file on disk.
///
/// Pairs keep insertion (or file) order and duplicate keys are allowed:
/// [`Properties::put`] always appends, [`Properties::get`] and
/// [`Properties::remove`] act on the first matching entry.
///
/// A default-constructed set has no file name. It can be filled and queried,
/// but loading or storing it fails with [`Error::Uninitialized`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    file_name: String,
    directory: PathBuf,
    values: Vec<Pair>,
}

impl Properties {
    /// Creates an empty set for `directory/file_name`. Nothing is checked on
    /// disk until the set is loaded or stored.
    pub fn new<P: AsRef<Path>, S: Into<String>>(directory: P, file_name: S) -> Properties {
        Properties {
            file_name: file_name.into(),
            directory: clean(directory.as_ref()),
            values: vec![],
        }
    }

    #[inline(always)]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name<S: Into<String>>(&mut self, file_name: S) {
        self.file_name = file_name.into();
    }

    #[inline(always)]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Cleaned lexically, the same way as in [`Properties::new`].
    pub fn set_directory<P: AsRef<Path>>(&mut self, directory: P) {
        self.directory = clean(directory.as_ref());
    }

    /// The full path of the backing file.
    pub fn path(&self) -> Result<PathBuf> {
        if self.file_name.is_empty() {
            return Err(Error::Uninitialized);
        }
        Ok(self.directory.join(&self.file_name))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline(always)]
    pub fn values(&self) -> &[Pair] {
        &self.values
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.values.iter()
    }

    /// Appends a pair, even if `key` is already present.
    pub fn put<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Result<()> {
        let pair = Pair::new(key, value)?;
        self.values.push(pair);
        Ok(())
    }

    /// Returns the value of the first entry for `key`.
    pub fn get(&self, key: &str) -> Result<&str> {
        if is_blank(key) {
            return Err(Error::InvalidKey);
        }

        self.position(key)
            .map(|index| self.values[index].value())
            .ok_or_else(|| Error::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes the first entry for `key`. Removing an absent key succeeds and
    /// returns `None`.
    pub fn remove(&mut self, key: &str) -> Result<Option<Pair>> {
        if is_blank(key) {
            return Err(Error::InvalidKey);
        }

        Ok(self.position(key).map(|index| self.values.remove(index)))
    }

    /// All keys in order, duplicates included.
    pub fn keys(&self) -> Vec<&str> {
        self.values.iter().map(Pair::key).collect()
    }

    /// Replaces every pair with what `parser` reads from the backing file and
    /// returns the new length. On failure the set is left untouched.
    pub fn load<P: Parser>(&mut self, parser: P) -> Result<usize> {
        if self.file_name.is_empty() {
            return Err(Error::Uninitialized);
        }

        self.values = parser.parse(&self.directory, &self.file_name)?;
        Ok(self.values.len())
    }

    pub fn default_load(&mut self) -> Result<usize> {
        self.load(LineParser::default())
    }

    /// Writes the set with `store`, handing back the open, flushed file.
    pub fn store<S: Store>(&self, store: S) -> Result<File> {
        if self.file_name.is_empty() {
            return Err(Error::Uninitialized);
        }

        store.store(self)
    }

    pub fn default_store(&self) -> Result<File> {
        self.store(LineStore::default())
    }

    #[inline(always)]
    fn position(&self, key: &str) -> Option<usize> {
        self.values.iter().position(|pair| pair.key == key)
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Lexically normalises a directory: drops `.`, folds `..` into its parent
/// where possible and turns an empty path into `.`.
fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = vec![];

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            c => out.push(c),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
