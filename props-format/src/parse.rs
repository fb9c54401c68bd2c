use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::escape::unescape;
use crate::{Error, Pair, Result};

/// Reads the pairs of a property file found at `directory/file_name`.
///
/// Implementations must either return every pair in file order or fail as a
/// whole; a partial result is never handed back.
pub trait Parser {
    fn parse(&self, directory: &Path, file_name: &str) -> Result<Vec<Pair>>;
}

impl<P: Parser + ?Sized> Parser for &P {
    fn parse(&self, directory: &Path, file_name: &str) -> Result<Vec<Pair>> {
        (**self).parse(directory, file_name)
    }
}

/// The line-oriented `key=value` parser.
///
/// Lines without an unescaped `=` or with a blank key are skipped. Keys and
/// values are trimmed and every `"` is removed from the value. By default
/// escape sequences are left as written; see [`LineParser::unescaping`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser {
    unescape: bool,
}

impl LineParser {
    pub fn new() -> LineParser {
        LineParser::default()
    }

    /// A parser that also decodes escape sequences. It is the exact inverse
    /// of [`crate::LineStore::symmetric`] for values without `"`. Files from
    /// the default store lose any backslash that is not part of an escape.
    pub fn unescaping() -> LineParser {
        LineParser { unescape: true }
    }

    #[inline(always)]
    pub fn is_unescaping(&self) -> bool {
        self.unescape
    }

    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> std::io::Result<Vec<Pair>> {
        let mut pairs = vec![];
        let mut line = String::new();
        let mut line_no = 0usize;

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;

            let text = line.strip_suffix('\n').unwrap_or(line.as_str());
            let text = text.strip_suffix('\r').unwrap_or(text);

            match self.parse_line(text) {
                Some(pair) => pairs.push(pair),
                None => tracing::trace!(line = line_no, "skipped line"),
            }
        }

        Ok(pairs)
    }

    pub fn parse_str(&self, input: &str) -> Vec<Pair> {
        input.lines().filter_map(|line| self.parse_line(line)).collect()
    }

    /// Splits a single line on its first unescaped `=`.
    pub fn parse_line(&self, line: &str) -> Option<Pair> {
        let equal = find_separator(line)?;
        let (key, value) = (&line[..equal], &line[equal + 1..]);
        let value = value.replace('"', "");

        if self.unescape {
            let key = trim_unescaped(key);
            if key.is_empty() {
                return None;
            }
            Pair::new(unescape(key), unescape(trim_unescaped(&value))).ok()
        } else {
            Pair::new(key.trim(), value.trim()).ok()
        }
    }
}

impl Parser for LineParser {
    fn parse(&self, directory: &Path, file_name: &str) -> Result<Vec<Pair>> {
        let path = directory.join(file_name);
        let file = File::open(&path).map_err(Error::io(&path))?;
        let pairs = self
            .parse_reader(BufReader::new(file))
            .map_err(Error::io(&path))?;

        tracing::debug!(path = %path.display(), count = pairs.len(), "parsed property file");
        Ok(pairs)
    }
}

#[inline(always)]
fn is_escaped(bytes: &[u8], index: usize) -> bool {
    bytes[..index]
        .iter()
        .rev()
        .take_while(|b| **b == b'\\')
        .count()
        % 2
        == 1
}

fn find_separator(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|(i, b)| **b == b'=' && !is_escaped(bytes, *i))
        .map(|(i, _)| i)
}

/// Trims whitespace from both ends, keeping a trailing space that is
/// protected by a backslash.
fn trim_unescaped(s: &str) -> &str {
    let mut s = s.trim_start();
    while let Some(last) = s.chars().next_back() {
        let end = s.len() - last.len_utf8();
        if !last.is_whitespace() || is_escaped(s.as_bytes(), end) {
            break;
        }
        s = &s[..end];
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> Pair {
        Pair::new(key, value).unwrap()
    }

    #[test]
    fn simple_line() {
        let parser = LineParser::new();
        assert_eq!(parser.parse_line("key=value"), Some(pair("key", "value")));
        assert_eq!(
            parser.parse_line("  key  =  value  \n"),
            Some(pair("key", "value"))
        );
    }

    #[test]
    fn lines_without_separator_are_skipped() {
        let parser = LineParser::new();
        assert_eq!(parser.parse_line("# just a comment"), None);
        assert_eq!(parser.parse_line(""), None);
        assert_eq!(parser.parse_line("   \r\n"), None);
    }

    #[test]
    fn empty_key_is_skipped() {
        let parser = LineParser::new();
        assert_eq!(parser.parse_line("=value"), None);
        assert_eq!(parser.parse_line("   =value"), None);
    }

    #[test]
    fn empty_value_is_allowed() {
        let parser = LineParser::new();
        assert_eq!(parser.parse_line("key="), Some(pair("key", "")));
        assert_eq!(parser.parse_line("key=   \n"), Some(pair("key", "")));
    }

    #[test]
    fn quotes_are_stripped_from_value() {
        let parser = LineParser::new();
        assert_eq!(
            parser.parse_line(r#"name = "hello "world"" "#),
            Some(pair("name", "hello world"))
        );
        assert_eq!(
            parser.parse_line(r#"say"what = x"#),
            Some(pair(r#"say"what"#, "x"))
        );
    }

    #[test]
    fn splits_on_first_unescaped_separator() {
        let parser = LineParser::new();
        assert_eq!(parser.parse_line("a=b=c"), Some(pair("a", "b=c")));
        assert_eq!(parser.parse_line(r"a\=b=c"), Some(pair(r"a\=b", "c")));
        assert_eq!(parser.parse_line(r"a\\=b"), Some(pair(r"a\\", "b")));
        assert_eq!(parser.parse_line(r"only\=escaped"), None);
    }

    #[test]
    fn escapes_left_alone_by_default() {
        let parser = LineParser::new();
        assert_eq!(
            parser.parse_line(r"my\ key=\ \txé"),
            Some(pair(r"my\ key", r"\ \txé"))
        );
    }

    #[test]
    fn unescaping_decodes_escapes() {
        let parser = LineParser::unescaping();
        assert_eq!(
            parser.parse_line(r"my\ key\ =\ \txé"),
            Some(pair("my key ", " \txé"))
        );
        assert_eq!(parser.parse_line(r"a\=b=c\:d"), Some(pair("a=b", "c:d")));
    }

    #[test]
    fn parse_str_keeps_file_order_and_duplicates() {
        let parser = LineParser::new();
        let pairs = parser.parse_str("b=1\nno separator\na=2\nb=3");
        assert_eq!(pairs, vec![pair("b", "1"), pair("a", "2"), pair("b", "3")]);
    }

    #[test]
    fn reader_handles_missing_trailing_newline() {
        let parser = LineParser::new();
        let input = std::io::Cursor::new("one=1\r\ntwo=2");
        let pairs = parser.parse_reader(input).unwrap();
        assert_eq!(pairs, vec![pair("one", "1"), pair("two", "2")]);
    }

    #[test]
    fn reader_drops_line_terminators_before_unescaping() {
        let parser = LineParser::unescaping();
        let input = "path=C\\:\\\\dir\\\\\r\nlead=\\ \nlast=x\\";
        let expected = vec![
            pair("path", r"C:\dir\"),
            pair("lead", " "),
            pair("last", r"x\"),
        ];

        let pairs = parser.parse_reader(std::io::Cursor::new(input)).unwrap();
        assert_eq!(pairs, expected);
        assert_eq!(parser.parse_str(input), expected);
    }

    #[test]
    fn reader_fails_on_invalid_utf8() {
        let parser = LineParser::new();
        let input = std::io::Cursor::new(b"ok=1\nbad=\xff\xfe\n".to_vec());
        assert!(parser.parse_reader(input).is_err());
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = LineParser::new()
            .parse(dir.path(), "missing.properties")
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
