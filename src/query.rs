//! Query string splitting and building.

use crate::{
    encoding::{Encoding, Utf8},
    error::ParseError,
    pct_enc::{self, decode_lossy},
};
use std::collections::BTreeMap;

/// A query parameter value used when building a query.
///
/// A key with an absent or empty value is written without `=`.
/// A key with multiple values is written once per value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QueryValue {
    /// The key alone.
    #[default]
    Absent,
    /// A single value.
    Single(String),
    /// Any number of values, in order.
    Multiple(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.into())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for QueryValue {
    fn from(values: [&str; N]) -> Self {
        Self::Multiple(values.into_iter().map(Into::into).collect())
    }
}

/// Builds an encoded query from parameters, in the order given.
///
/// # Examples
///
/// ```
/// use urikit::query::{make_query_from_parameters, QueryValue};
///
/// let q = make_query_from_parameters(&[
///     ("a b".to_owned(), QueryValue::from("x&y")),
///     ("flag".to_owned(), QueryValue::Absent),
///     ("n".to_owned(), QueryValue::from(["1", "2"])),
/// ]);
/// assert_eq!(q, "a+b=x%26y&flag&n=1&n=2");
/// ```
#[must_use]
pub fn make_query_from_parameters(parameters: &[(String, QueryValue)]) -> String {
    let mut out = String::new();
    let mut write = |key: &str, value: Option<&str>| {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&pct_enc::encode_query_component(key));
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            out.push('=');
            out.push_str(&pct_enc::encode_query_component(value));
        }
    };
    for (key, value) in parameters {
        match value {
            QueryValue::Absent => write(key.as_str(), None),
            QueryValue::Single(v) => write(key.as_str(), Some(v.as_str())),
            QueryValue::Multiple(vs) => {
                for v in vs {
                    write(key.as_str(), Some(v.as_str()));
                }
            }
        }
    }
    out
}

/// A `key=value` pair located in a query: the start, the position of the
/// first `=` if any, and the end.
type Pair = (usize, Option<usize>, usize);

fn pairs(query: &str) -> impl Iterator<Item = Pair> + '_ {
    let mut start = 0;
    query.split('&').map(move |element| {
        let pair = (
            start,
            element.find('=').map(|i| start + i),
            start + element.len(),
        );
        start += element.len() + 1;
        pair
    })
}

/// Splits a query into a map of decoded keys to decoded values.
///
/// `+` decodes to a space. The first occurrence of a key wins, and pairs
/// with an empty key are skipped.
///
/// # Examples
///
/// ```
/// let map = urikit::split_query_string("a=1&b=x+y&a=2&=z&c")?;
/// assert_eq!(map["a"], "1");
/// assert_eq!(map["b"], "x y");
/// assert_eq!(map["c"], "");
/// assert_eq!(map.len(), 3);
/// # Ok::<_, urikit::ParseError>(())
/// ```
pub fn split_query_string(query: &str) -> Result<BTreeMap<String, String>, ParseError> {
    split_query_string_with(query, &Utf8)
}

/// Like [`split_query_string`], but decodes bytes in the given encoding.
pub fn split_query_string_with(
    query: &str,
    encoding: &dyn Encoding,
) -> Result<BTreeMap<String, String>, ParseError> {
    let mut map = BTreeMap::new();
    for (start, eq, end) in pairs(query) {
        let key_end = eq.unwrap_or(end);
        if key_end == start {
            continue;
        }
        let key = pct_enc::uri_decode(query, start, key_end, encoding, true)?;
        if map.contains_key(&key) {
            continue;
        }
        let value = match eq {
            Some(eq) => pct_enc::uri_decode(query, eq + 1, end, encoding, true)?,
            None => String::new(),
        };
        map.insert(key, value);
    }
    Ok(map)
}

/// Splits a query into a map of decoded keys to every decoded value, in order.
///
/// Unlike [`split_query_string`], a pair with an empty key but an `=` is kept.
pub fn split_query_string_all(query: &str) -> Result<BTreeMap<String, Vec<String>>, ParseError> {
    split_query_string_all_with(query, &Utf8)
}

/// Like [`split_query_string_all`], but decodes bytes in the given encoding.
pub fn split_query_string_all_with(
    query: &str,
    encoding: &dyn Encoding,
) -> Result<BTreeMap<String, Vec<String>>, ParseError> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (start, eq, end) in pairs(query) {
        if start == end {
            continue;
        }
        let (key, value) = match eq {
            Some(eq) => (
                pct_enc::uri_decode(query, start, eq, encoding, true)?,
                pct_enc::uri_decode(query, eq + 1, end, encoding, true)?,
            ),
            None => (
                pct_enc::uri_decode(query, start, end, encoding, true)?,
                String::new(),
            ),
        };
        map.entry(key).or_default().push(value);
    }
    Ok(map)
}

/// Like [`split_query_string`], but never fails: invalid escapes are kept
/// as written and invalid UTF-8 is replaced.
pub(crate) fn split_lossy(query: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (start, eq, end) in pairs(query) {
        let key_end = eq.unwrap_or(end);
        if key_end == start {
            continue;
        }
        let value = eq.map_or(String::new(), |eq| decode_lossy(&query[eq + 1..end], true));
        map.entry(decode_lossy(&query[start..key_end], true))
            .or_insert(value);
    }
    map
}

/// Like [`split_query_string_all`], but never fails.
pub(crate) fn split_all_lossy(query: &str) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (start, eq, end) in pairs(query) {
        if start == end {
            continue;
        }
        let (key, value) = match eq {
            Some(eq) => (
                decode_lossy(&query[start..eq], true),
                decode_lossy(&query[eq + 1..end], true),
            ),
            None => (decode_lossy(&query[start..end], true), String::new()),
        };
        map.entry(key).or_default().push(value);
    }
    map
}
