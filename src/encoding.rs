//! Text encodings used by query and data URI helpers.
//!
//! [`Utf8`], [`Latin1`] and [`Ascii`] cover the charsets that show up in URIs
//! most often. Any [`encoding_rs::Encoding`] can be used as well through
//! [`Charset::Whatwg`], which makes every WHATWG label available through
//! [`encoding_for_name`].
//!
//! Base64 helpers live here too. Data URIs are the only place where
//! base64 appears in URI text.

use crate::{
    error::{ArgumentError, ArgumentErrorKind, ParseError, ParseErrorKind},
    pct_enc::hex_value,
};
use base64::{
    alphabet,
    engine::{general_purpose::STANDARD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use std::borrow::Cow;

/// A character encoding that converts between text and bytes.
pub trait Encoding: Send + Sync {
    /// Returns the canonical name of the encoding.
    fn name(&self) -> &str;

    /// Encodes text into bytes.
    ///
    /// Fails with [`ArgumentErrorKind::Unencodable`] when the text contains
    /// a character the encoding cannot represent.
    fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, ArgumentError>;

    /// Decodes bytes into text.
    ///
    /// Fails with [`ParseErrorKind::InvalidEncodedBytes`] when the bytes are
    /// malformed for the encoding.
    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, ParseError>;
}

/// UTF-8.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8;

/// ISO-8859-1, where every byte maps to the code point of the same value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Latin1;

/// US-ASCII.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ascii;

fn invalid_bytes(bytes: &[u8], index: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidEncodedBytes,
        &String::from_utf8_lossy(bytes),
        index,
    )
}

impl Encoding for Utf8 {
    fn name(&self) -> &str {
        "utf-8"
    }

    fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, ArgumentError> {
        Ok(Cow::Borrowed(text.as_bytes()))
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, ParseError> {
        std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| invalid_bytes(bytes, e.valid_up_to()))
    }
}

impl Encoding for Latin1 {
    fn name(&self) -> &str {
        "iso-8859-1"
    }

    fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, ArgumentError> {
        if encoding_rs::mem::is_str_latin1(text) {
            Ok(encoding_rs::mem::encode_latin1_lossy(text))
        } else {
            Err(ArgumentError::new(ArgumentErrorKind::Unencodable, text))
        }
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, ParseError> {
        Ok(encoding_rs::mem::decode_latin1(bytes))
    }
}

impl Encoding for Ascii {
    fn name(&self) -> &str {
        "us-ascii"
    }

    fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, ArgumentError> {
        if text.is_ascii() {
            Ok(Cow::Borrowed(text.as_bytes()))
        } else {
            Err(ArgumentError::new(ArgumentErrorKind::Unencodable, text))
        }
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, ParseError> {
        let valid = encoding_rs::Encoding::ascii_valid_up_to(bytes);
        if valid < bytes.len() {
            return Err(invalid_bytes(bytes, valid));
        }
        std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| invalid_bytes(bytes, e.valid_up_to()))
    }
}

/// An encoding found by name, as returned by [`encoding_for_name`].
///
/// The WHATWG variant wraps any [`encoding_rs::Encoding`], for example
/// `Charset::Whatwg(encoding_rs::SHIFT_JIS)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Charset {
    /// UTF-8.
    Utf8,
    /// ISO-8859-1.
    Latin1,
    /// US-ASCII.
    Ascii,
    /// An encoding from the WHATWG Encoding Standard.
    Whatwg(&'static encoding_rs::Encoding),
}

impl From<&'static encoding_rs::Encoding> for Charset {
    fn from(encoding: &'static encoding_rs::Encoding) -> Self {
        Self::Whatwg(encoding)
    }
}

impl Encoding for Charset {
    fn name(&self) -> &str {
        match *self {
            Self::Utf8 => Utf8.name(),
            Self::Latin1 => Latin1.name(),
            Self::Ascii => Ascii.name(),
            Self::Whatwg(e) => e.name(),
        }
    }

    fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, ArgumentError> {
        match *self {
            Self::Utf8 => Utf8.encode(text),
            Self::Latin1 => Latin1.encode(text),
            Self::Ascii => Ascii.encode(text),
            Self::Whatwg(e) => {
                let (bytes, _, had_errors) = e.encode(text);
                if had_errors {
                    Err(ArgumentError::new(ArgumentErrorKind::Unencodable, text))
                } else {
                    Ok(bytes)
                }
            }
        }
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, ParseError> {
        match *self {
            Self::Utf8 => Utf8.decode(bytes),
            Self::Latin1 => Latin1.decode(bytes),
            Self::Ascii => Ascii.decode(bytes),
            Self::Whatwg(e) => e
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or_else(|| invalid_bytes(bytes, 0)),
        }
    }
}

/// Looks up an encoding by charset name, ignoring ASCII case.
///
/// The IANA names of UTF-8, ISO-8859-1 and US-ASCII and their common aliases
/// resolve to [`Charset::Utf8`], [`Charset::Latin1`] and [`Charset::Ascii`].
/// Other names are looked up as WHATWG labels. Returns `None` if nothing
/// matches.
#[must_use]
pub fn encoding_for_name(name: &str) -> Option<Charset> {
    let lower = name.trim().to_ascii_lowercase();
    let charset = match lower.as_str() {
        "utf-8" | "utf8" => Charset::Utf8,
        "iso-8859-1" | "iso_8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" | "iso-ir-100"
        | "cp819" | "ibm819" | "csisolatin1" => Charset::Latin1,
        "us-ascii" | "ascii" | "us" | "iso646-us" | "ansi_x3.4-1968" | "cp367" | "ibm367"
        | "csascii" => Charset::Ascii,
        _ => return encoding_rs::Encoding::for_label(lower.as_bytes()).map(Charset::Whatwg),
    };
    Some(charset)
}

/// Checks whether two encodings are the same, by name.
pub(crate) fn same_encoding(a: &dyn Encoding, b: &dyn Encoding) -> bool {
    a.name().eq_ignore_ascii_case(b.name())
}

/// Accepts non-canonical trailing bits and any padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes bytes as padded standard base64.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes base64 text after [normalizing](normalize_base64) it.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, ParseError> {
    let normalized = normalize_base64(text)?;
    LENIENT
        .decode(normalized.as_bytes())
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidBase64, text, 0))
}

/// Normalizes base64 text to the padded standard alphabet.
///
/// URL-safe `-` and `_` are mapped to `+` and `/`, percent-encoded `+`, `/`
/// and `=` are decoded, and missing padding is added. Returns the input
/// unchanged when it is already normal.
pub fn normalize_base64(text: &str) -> Result<Cow<'_, str>, ParseError> {
    Ok(match normalize_base64_range(text, 0, text.len())? {
        Some(s) => Cow::Owned(s),
        None => Cow::Borrowed(text),
    })
}

/// Normalizes `input[start..end]`, reporting errors against the whole input.
///
/// Returns `None` if the range is already normal.
pub(crate) fn normalize_base64_range(
    input: &str,
    start: usize,
    end: usize,
) -> Result<Option<String>, ParseError> {
    let bytes = input.as_bytes();
    let err = |i| Err(ParseError::new(ParseErrorKind::InvalidBase64, input, i));

    let mut out: Option<String> = None;
    let mut data_len = 0;
    let mut pad_start = None;
    let mut pad_len = 0;

    let mut i = start;
    while i < end {
        let x = bytes[i];
        let (mut ch, len) = match x {
            b'%' if i + 2 < end => match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                (Some(hi), Some(lo)) => (hi << 4 | lo, 3),
                _ => return err(i),
            },
            _ => (x, 1),
        };
        match ch {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' | b'=' => {}
            b'-' => ch = b'+',
            b'_' => ch = b'/',
            _ => return err(i),
        }

        if ch == b'=' {
            pad_start.get_or_insert(i);
            pad_len += 1;
        } else if pad_start.is_some() {
            return err(i);
        } else {
            data_len += 1;
        }

        if ch != x || len != 1 {
            out.get_or_insert_with(|| input[start..i].to_owned());
        }
        if let Some(out) = &mut out {
            out.push(ch as char);
        }
        i += len;
    }

    let rem = data_len % 4;
    if rem == 1 {
        return err(pad_start.unwrap_or(end));
    }
    let missing = (4 - rem) % 4;
    if let Some(pad_start) = pad_start {
        if pad_len != missing {
            return err(pad_start);
        }
    } else if missing != 0 {
        let out = out.get_or_insert_with(|| input[start..end].to_owned());
        out.extend(std::iter::repeat('=').take(missing));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        assert_eq!(normalize_base64("aGVsbG8=").unwrap(), "aGVsbG8=");
        assert!(matches!(
            normalize_base64("aGVsbG8=").unwrap(),
            Cow::Borrowed(_)
        ));
        assert_eq!(normalize_base64("aGVsbG8").unwrap(), "aGVsbG8=");
        assert_eq!(normalize_base64("-_-_").unwrap(), "+/+/");
        assert_eq!(normalize_base64("aGVsbG8%3D").unwrap(), "aGVsbG8=");
        assert_eq!(normalize_base64("ab%2Bc").unwrap(), "ab+c");
        assert_eq!(normalize_base64("").unwrap(), "");

        let e = normalize_base64("aGVs*G8=").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::InvalidBase64);
        assert_eq!(e.index(), 4);
        assert_eq!(normalize_base64("aGV=bG8").unwrap_err().index(), 4);
        assert_eq!(normalize_base64("aGVsb").unwrap_err().index(), 5);
        assert_eq!(normalize_base64("aGVsbG8==").unwrap_err().index(), 7);
    }

    #[test]
    fn decode() {
        assert_eq!(decode_base64("aGVsbG8").unwrap(), b"hello");
        assert_eq!(encode_base64(b"hello"), "aGVsbG8=");
    }

    #[test]
    fn lookup() {
        assert_eq!(encoding_for_name("UTF-8").unwrap().name(), "utf-8");
        assert_eq!(encoding_for_name("Latin1").unwrap().name(), "iso-8859-1");
        assert_eq!(encoding_for_name("US-ASCII").unwrap().name(), "us-ascii");
        assert_eq!(encoding_for_name("shift_jis").unwrap().name(), "Shift_JIS");
        assert!(encoding_for_name("no-such-charset").is_none());
    }

    #[test]
    fn latin1() {
        assert_eq!(Latin1.encode("é").unwrap().as_ref(), &[0xe9]);
        assert!(Latin1.encode("€").is_err());
        assert_eq!(Latin1.decode(&[0xe9]).unwrap(), "é");
        assert_eq!(Ascii.decode(&[b'a', 0xe9]).unwrap_err().index(), 1);
    }
}
