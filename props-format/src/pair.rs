use std::fmt;

use crate::{Error, Result};

/// A single `key=value` entry of a property set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    /// Never empty after trimming whitespace.
    pub(crate) key: String,

    /// May be empty.
    pub(crate) value: String,
}

impl Pair {
    /// Fails with [`Error::InvalidKey`] if `key` is empty or only whitespace.
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Result<Pair> {
        let key = key.into();
        if is_blank(&key) {
            return Err(Error::InvalidKey);
        }

        Ok(Pair {
            key,
            value: value.into(),
        })
    }

    #[inline(always)]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline(always)]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline(always)]
    pub fn into_inner(self) -> (String, String) {
        (self.key, self.value)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[inline(always)]
pub(crate) fn is_blank(key: &str) -> bool {
    key.trim().is_empty()
}
