//! Percent-encoding and decoding of URI components.

use crate::{
    encoding::{Encoding, Utf8},
    error::{ArgumentError, ParseError, ParseErrorKind},
    table::{self, CharTable},
};
use std::{borrow::Cow, str};

const fn gen_octet_table() -> [u8; 256] {
    let mut out = [0xff; 256];
    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i;
        out[(i - 10 + b'a') as usize] = i;
        i += 1;
    }
    out
}

const OCTET_TABLE: &[u8; 256] = &gen_octet_table();

/// Returns the value of a hexadecimal digit.
#[inline]
pub(crate) fn hex_value(x: u8) -> Option<u8> {
    match OCTET_TABLE[x as usize] {
        0xff => None,
        v => Some(v),
    }
}

/// Returns the value of the two hexadecimal digits at `s[i..i + 2]`.
pub(crate) fn hex_pair(s: &[u8], i: usize) -> Option<u8> {
    let (hi, lo) = (s.get(i)?, s.get(i + 1)?);
    Some(hex_value(*hi)? << 4 | hex_value(*lo)?)
}

/// Returns `%XX` with uppercase hexadecimal digits.
pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Percent-encodes every UTF-8 byte of a character.
pub(crate) fn escape_char(ch: char) -> String {
    let mut buf = [0; 4];
    ch.encode_utf8(&mut buf)
        .bytes()
        .map(encode_byte)
        .collect()
}

pub(crate) fn encode_bytes_into(
    buf: &mut String,
    table: CharTable,
    bytes: &[u8],
    space_to_plus: bool,
) {
    for &x in bytes {
        if table.allows(x) {
            buf.push(x as char);
        } else if space_to_plus && x == b' ' {
            buf.push('+');
        } else {
            buf.push_str(encode_byte(x));
        }
    }
}

/// Percent-encodes the UTF-8 bytes of `text` that are not in `table`.
pub(crate) fn uri_encode_utf8(table: CharTable, text: &str, space_to_plus: bool) -> String {
    if text.bytes().all(|x| table::UNRESERVED.allows(x)) {
        return text.to_owned();
    }
    let mut buf = String::with_capacity(text.len());
    encode_bytes_into(&mut buf, table, text.as_bytes(), space_to_plus);
    buf
}

/// Percent-encodes the bytes of `text` in the given encoding that are not in `table`.
pub(crate) fn uri_encode(
    table: CharTable,
    text: &str,
    encoding: &dyn Encoding,
    space_to_plus: bool,
) -> Result<String, ArgumentError> {
    if text.bytes().all(|x| table::UNRESERVED.allows(x)) {
        return Ok(text.to_owned());
    }
    let bytes = encoding.encode(text)?;
    let mut buf = String::with_capacity(bytes.len());
    encode_bytes_into(&mut buf, table, &bytes, space_to_plus);
    Ok(buf)
}

/// Decodes the percent-encoded text `input[start..end]` in the given encoding.
///
/// Every `%` must start a valid escape, and the text itself must be ASCII.
pub(crate) fn uri_decode(
    input: &str,
    start: usize,
    end: usize,
    encoding: &dyn Encoding,
    plus_to_space: bool,
) -> Result<String, ParseError> {
    let s = &input.as_bytes()[start..end];
    let simple = !s
        .iter()
        .any(|&x| x >= 0x80 || x == b'%' || (plus_to_space && x == b'+'));
    if simple {
        return Ok(input[start..end].to_owned());
    }

    let mut bytes = Vec::with_capacity(s.len());
    let mut i = start;
    while i < end {
        let x = input.as_bytes()[i];
        match x {
            0x80.. => return Err(ParseError::new(ParseErrorKind::NonAsciiInEncoded, input, i)),
            b'%' => {
                if i + 3 > end {
                    return Err(ParseError::new(ParseErrorKind::TruncatedEscape, input, i));
                }
                match hex_pair(input.as_bytes(), i + 1) {
                    Some(v) => bytes.push(v),
                    None => return Err(ParseError::new(ParseErrorKind::InvalidEscape, input, i)),
                }
                i += 3;
                continue;
            }
            b'+' if plus_to_space => bytes.push(b' '),
            _ => bytes.push(x),
        }
        i += 1;
    }
    encoding
        .decode(&bytes)
        .map(Cow::into_owned)
        .map_err(|e| ParseError::new(e.kind(), input, start))
}

/// Decodes the valid escapes of `s`, keeping invalid ones as written,
/// and replaces invalid UTF-8.
pub(crate) fn decode_lossy(s: &str, plus_to_space: bool) -> String {
    if !s.bytes().any(|x| x == b'%' || (plus_to_space && x == b'+')) {
        return s.to_owned();
    }
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if let Some(v) = hex_pair(bytes, i + 1) {
                    out.push(v);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            b'+' if plus_to_space => out.push(b' '),
            x => out.push(x),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Result of normalizing a single `%` escape.
pub(crate) enum Escape {
    /// The escape is already canonical.
    Keep,
    /// The `%` does not start a valid escape and must itself be escaped.
    Invalid,
    /// The escape is replaced by the given text.
    Replace(Cow<'static, str>),
}

/// Normalizes the escape starting at `input[i]`, which must be `%`.
///
/// Escapes of unreserved characters are decoded, lowercased if asked to,
/// and other escapes get uppercase hexadecimal digits.
pub(crate) fn normalize_escape(input: &str, i: usize, end: usize, lower_case: bool) -> Escape {
    let bytes = input.as_bytes();
    if i + 2 >= end {
        return Escape::Invalid;
    }
    let Some(mut value) = hex_pair(bytes, i + 1) else {
        return Escape::Invalid;
    };
    if table::UNRESERVED.allows(value) {
        if lower_case {
            value = value.to_ascii_lowercase();
        }
        return Escape::Replace(Cow::Owned((value as char).to_string()));
    }
    if bytes[i + 1].is_ascii_lowercase() || bytes[i + 2].is_ascii_lowercase() {
        return Escape::Replace(Cow::Borrowed(encode_byte(value)));
    }
    Escape::Keep
}

/// Normalizes `input[start..end]` so that it only contains characters in
/// `table` and canonical escapes.
///
/// A stray `%` becomes `%25`. Characters outside the table are escaped,
/// except that gen-delims are an error unless `escape_delimiters` is set,
/// and a backslash becomes `/` if `replace_backslash` is set.
pub(crate) fn normalize(
    input: &str,
    start: usize,
    end: usize,
    table: CharTable,
    escape_delimiters: bool,
    replace_backslash: bool,
) -> Result<Cow<'_, str>, ParseError> {
    let bytes = input.as_bytes();
    let mut buf: Option<String> = None;
    let mut section_start = start;
    let mut i = start;

    while i < end {
        let x = bytes[i];
        if table.allows(x) {
            i += 1;
            continue;
        }
        let (replacement, len): (Cow<'_, str>, usize) = if x == b'%' {
            match normalize_escape(input, i, end, false) {
                Escape::Keep => {
                    i += 3;
                    continue;
                }
                Escape::Invalid => (Cow::Borrowed("%25"), 1),
                Escape::Replace(s) => (s, 3),
            }
        } else if x == b'\\' && replace_backslash {
            (Cow::Borrowed("/"), 1)
        } else if !escape_delimiters && table::GEN_DELIMS.allows(x) {
            return Err(ParseError::new(ParseErrorKind::UnexpectedChar, input, i));
        } else {
            let ch = match input[i..].chars().next() {
                Some(ch) => ch,
                None => break,
            };
            (Cow::Owned(escape_char(ch)), ch.len_utf8())
        };
        let buf = buf.get_or_insert_with(String::new);
        buf.push_str(&input[section_start..i]);
        buf.push_str(&replacement);
        i += len;
        section_start = i;
    }

    Ok(match buf {
        None => Cow::Borrowed(&input[start..end]),
        Some(mut buf) => {
            buf.push_str(&input[section_start..end]);
            Cow::Owned(buf)
        }
    })
}

/// Encodes a string for use as a URI component.
///
/// Every character other than the unreserved characters of RFC 2396 is
/// percent-encoded as UTF-8, including `/`, `&` and `=`.
///
/// # Examples
///
/// ```
/// use urikit::pct_enc::encode_component;
///
/// assert_eq!(encode_component("a b/c"), "a%20b%2Fc");
/// ```
#[must_use]
pub fn encode_component(component: &str) -> String {
    uri_encode_utf8(table::UNRESERVED_2396, component, false)
}

/// Decodes percent-escapes in a URI component as UTF-8.
///
/// `+` is left alone.
pub fn decode_component(component: &str) -> Result<String, ParseError> {
    uri_decode(component, 0, component.len(), &Utf8, false)
}

/// Encodes a string for use in a query as per the
/// `application/x-www-form-urlencoded` rules, with spaces as `+`.
#[must_use]
pub fn encode_query_component(component: &str) -> String {
    uri_encode_utf8(table::UNRESERVED, component, true)
}

/// Like [`encode_query_component`], but encodes characters in the given encoding.
pub fn encode_query_component_with(
    component: &str,
    encoding: &dyn Encoding,
) -> Result<String, ArgumentError> {
    uri_encode(table::UNRESERVED, component, encoding, true)
}

/// Decodes a query component, turning `+` into a space.
pub fn decode_query_component(component: &str) -> Result<String, ParseError> {
    uri_decode(component, 0, component.len(), &Utf8, true)
}

/// Like [`decode_query_component`], but decodes bytes in the given encoding.
pub fn decode_query_component_with(
    component: &str,
    encoding: &dyn Encoding,
) -> Result<String, ParseError> {
    uri_decode(component, 0, component.len(), encoding, true)
}

/// Encodes a whole URI, leaving characters with meaning in URI syntax alone.
///
/// # Examples
///
/// ```
/// use urikit::pct_enc::encode_full;
///
/// assert_eq!(encode_full("http://x/a b?q=ü"), "http://x/a%20b?q=%C3%BC");
/// ```
#[must_use]
pub fn encode_full(uri: &str) -> String {
    uri_encode_utf8(table::ENCODE_FULL, uri, false)
}

/// Decodes every percent-escape in a whole URI as UTF-8.
pub fn decode_full(uri: &str) -> Result<String, ParseError> {
    uri_decode(uri, 0, uri.len(), &Utf8, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_escapes() {
        let n = |s: &str| {
            normalize(s, 0, s.len(), table::PATH_CHAR_OR_SLASH, true, false)
                .unwrap()
                .into_owned()
        };
        let unchanged = normalize("/a/b", 0, 4, table::PATH_CHAR_OR_SLASH, true, false).unwrap();
        assert!(matches!(unchanged, Cow::Borrowed("/a/b")));
        assert_eq!(n("%41%7e"), "A~");
        assert_eq!(n("%2f%2F"), "%2F%2F");
        assert_eq!(n("%zz%"), "%25zz%25");
        assert_eq!(n("a b"), "a%20b");
        assert_eq!(n("é"), "%C3%A9");
        assert_eq!(n("[x]"), "%5Bx%5D");

        let e = normalize("a#b", 0, 3, table::USERINFO, false, false).unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::UnexpectedChar);
        assert_eq!(e.index(), 1);

        let s = "a\\b";
        assert_eq!(
            normalize(s, 0, 3, table::PATH_CHAR_OR_SLASH, true, true).unwrap(),
            "a/b"
        );
    }

    #[test]
    fn decode_errors() {
        let e = decode_component("a%2").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::TruncatedEscape);
        assert_eq!(e.index(), 1);
        let e = decode_component("a%g0").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::InvalidEscape);
        let e = decode_component("é%20").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::NonAsciiInEncoded);
        let e = decode_component("%C3").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::InvalidEncodedBytes);
    }

    #[test]
    fn escape_multi_byte() {
        assert_eq!(escape_char('€'), "%E2%82%AC");
        assert_eq!(encode_byte(0x0a), "%0A");
    }
}
