//! Reading and writing Java-style `.properties` files.
//!
//! A [`Properties`] set is loaded and stored through the [`Parser`] and
//! [`Store`] strategies. [`LineParser`] and [`LineStore`] implement the plain
//! `key=value` format; the `json` feature adds [`json::JsonParser`] and
//! [`json::JsonStore`].

mod error;
pub mod escape;
mod pair;
mod parse;
mod properties;
mod store;

#[cfg(feature = "json")]
pub mod json;

pub use error::{Error, Result};
pub use escape::{escape, escape_symmetric, unescape};
pub use pair::Pair;
pub use parse::{LineParser, Parser};
pub use properties::Properties;
pub use store::{write_pairs, LineStore, Store};
