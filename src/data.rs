//! `data:` URIs, as in RFC 2397.

use crate::{
    encoding::{self, encoding_for_name, same_encoding, Ascii, Charset, Encoding},
    error::{
        ArgumentError, ArgumentErrorKind, Error, ParseError, ParseErrorKind, UnsupportedError,
        UnsupportedErrorKind,
    },
    normalize,
    pct_enc::{self, decode_lossy, hex_pair},
    table::{self, CharTable},
    uri::{Components, DataUri, GeneralUri, Uri, UriLike},
};
use std::{borrow::Cow, collections::BTreeMap, fmt};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const PREFIX: &str = "data:";

/// The content of a `data:` URI.
///
/// The text is kept in normal form, starting with `data:`, along with the
/// positions of its separators: the `:` after the scheme, each `;` and `=`
/// of the MIME type parameters, and the `,` before the content. A base64
/// data URI has an odd number of separators, its `;base64` adding one.
///
/// # Examples
///
/// ```
/// use urikit::{UriData, UriLike};
///
/// let data = UriData::parse("data:text/plain;charset=utf-8,a%20b")?;
/// assert_eq!(data.mime_type(), "text/plain");
/// assert_eq!(data.charset(), "utf-8");
/// assert!(!data.is_base64());
/// assert_eq!(data.content_as_string(None).unwrap(), "a b");
///
/// let data = UriData::from_string("hello", Some("text/plain"), None, &[], false).unwrap();
/// assert_eq!(data.uri().as_str(), "data:,hello");
/// # Ok::<_, urikit::ParseError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UriData {
    text: String,
    indices: Vec<usize>,
}

impl UriData {
    /// Creates a data URI holding `content` encoded as text.
    ///
    /// A missing or `text/plain` MIME type is left out of the URI. The
    /// encoding defaults to the one named by a `charset` parameter, and to
    /// US-ASCII otherwise. An explicit encoding is written as a `charset`
    /// parameter unless the parameters already contain one.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the MIME type does not contain exactly one `/`, a
    /// parameter name or value is empty, or the content cannot be encoded.
    pub fn from_string(
        content: &str,
        mime_type: Option<&str>,
        encoding: Option<&dyn Encoding>,
        parameters: &[(&str, &str)],
        base64: bool,
    ) -> Result<Self, ArgumentError> {
        let charset_param = parameters
            .iter()
            .find(|(key, _)| *key == "charset")
            .map(|&(_, value)| value);
        let mut charset_name = None;
        let found;
        let encoding: &dyn Encoding = match encoding {
            Some(encoding) => {
                if charset_param.is_none() {
                    charset_name = Some(encoding.name());
                }
                encoding
            }
            None => {
                found = charset_param
                    .and_then(encoding_for_name)
                    .unwrap_or(Charset::Ascii);
                &found
            }
        };

        let bytes = encoding.encode(content)?;
        let (mut text, mut indices) = write_header(mime_type, charset_name, parameters)?;
        indices.push(text.len());
        if base64 {
            text.push_str(";base64,");
            indices.push(text.len() - 1);
            text.push_str(&encoding::encode_base64(&bytes));
        } else {
            text.push(',');
            pct_enc::encode_bytes_into(&mut text, table::URIC, &bytes, false);
        }
        Ok(Self { text, indices })
    }

    /// Creates a data URI holding `bytes`.
    ///
    /// The MIME type defaults to `application/octet-stream`. The content is
    /// base64-encoded unless `percent_encoded` is set.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the MIME type does not contain exactly one `/`, or a
    /// parameter name or value is empty.
    pub fn from_bytes(
        bytes: &[u8],
        mime_type: Option<&str>,
        parameters: &[(&str, &str)],
        percent_encoded: bool,
    ) -> Result<Self, ArgumentError> {
        let mime_type = mime_type.unwrap_or("application/octet-stream");
        let (mut text, mut indices) = write_header(Some(mime_type), None, parameters)?;
        indices.push(text.len());
        if percent_encoded {
            text.push(',');
            pct_enc::encode_bytes_into(&mut text, table::URIC, bytes, false);
        } else {
            text.push_str(";base64,");
            indices.push(text.len() - 1);
            text.push_str(&encoding::encode_base64(bytes));
        }
        Ok(Self { text, indices })
    }

    /// Extracts the data URI content of a URI.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the scheme is not `data`, the URI has an authority or
    /// a fragment, or its path and query do not form valid data URI content.
    pub fn from_uri<U: UriLike + ?Sized>(uri: &U) -> Result<Self, Error> {
        let fail = |kind| Err(ArgumentError::new(kind, uri.as_str()).into());
        if uri.scheme() != "data" {
            return fail(ArgumentErrorKind::NotDataScheme);
        }
        if uri.has_authority() {
            return fail(ArgumentErrorKind::DataWithAuthority);
        }
        if uri.has_fragment() {
            return fail(ArgumentErrorKind::DataWithFragment);
        }
        Ok(parse_text(uri.as_str())?)
    }

    /// Parses a `data:` URI.
    ///
    /// A fragment is not split off: a `#` in the content is escaped.
    /// Use [`Uri::parse`] to parse a data URI that may have a fragment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text does not start with `data:` (in any case),
    /// the MIME type or a parameter is malformed, or base64 content is invalid.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let has_prefix = s
            .as_bytes()
            .get(..PREFIX.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(PREFIX.as_bytes()));
        if !has_prefix {
            return Err(ParseError::new(ParseErrorKind::MissingDataPrefix, s, 0));
        }
        parse_range(s, 0, s.len())
    }

    /// Returns the data URI as a [`Uri`].
    #[must_use]
    pub fn uri(&self) -> Uri {
        Uri::Data(DataUri::new(self.general_uri(None), self.clone()))
    }

    /// Builds the general URI form, splitting the text into path and query.
    fn general_uri(&self, fragment: Option<String>) -> GeneralUri {
        let text = &self.text;
        let (path_end, query) = match text[PREFIX.len()..].find('?') {
            Some(i) => {
                let q = PREFIX.len() + i;
                let query = normalize_lenient(text, q + 1, text.len(), table::QUERY_CHAR);
                (q, Some(query))
            }
            None => (text.len(), None),
        };
        GeneralUri::from_components(Components {
            scheme: "data".into(),
            path: normalize_lenient(text, PREFIX.len(), path_end, table::PATH_CHAR_OR_SLASH),
            query,
            fragment,
            ..Components::default()
        })
    }

    /// Returns the serialized data URI, including the `data:` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the decoded MIME type, `text/plain` if none is given.
    #[must_use]
    pub fn mime_type(&self) -> String {
        let (start, end) = (self.indices[0] + 1, self.indices[1]);
        if start == end {
            return "text/plain".into();
        }
        decode_lossy(&self.text[start..end], false)
    }

    /// Checks whether the MIME type equals `mime_type`, ignoring ASCII case.
    ///
    /// An empty `mime_type` stands for `text/plain`.
    #[must_use]
    pub fn is_mime_type(&self, mime_type: &str) -> bool {
        let (start, end) = (self.indices[0] + 1, self.indices[1]);
        if start == end {
            return mime_type.is_empty() || mime_type.eq_ignore_ascii_case("text/plain");
        }
        let mime_type = if mime_type.is_empty() {
            "text/plain"
        } else {
            mime_type
        };
        self.text[start..end].eq_ignore_ascii_case(mime_type)
    }

    /// Finds the range of the value of the `charset` parameter.
    fn charset_range(&self) -> Option<(usize, usize)> {
        let ix = &self.indices;
        (1..ix.len().saturating_sub(1)).step_by(2).find_map(|k| {
            let (key_start, key_end) = (ix[k] + 1, ix[k + 1]);
            let is_charset = self.text[key_start..key_end].eq_ignore_ascii_case("charset");
            (is_charset && k + 2 < ix.len()).then(|| (ix[k + 1] + 1, ix[k + 2]))
        })
    }

    /// Returns the decoded `charset` parameter, `US-ASCII` if none is given.
    #[must_use]
    pub fn charset(&self) -> String {
        match self.charset_range() {
            Some((start, end)) => decode_lossy(&self.text[start..end], false),
            None => "US-ASCII".into(),
        }
    }

    /// Checks whether the charset is `charset`, either by name, ignoring
    /// ASCII case, or by resolving both names to the same encoding.
    #[must_use]
    pub fn is_charset(&self, charset: &str) -> bool {
        let Some((start, end)) = self.charset_range() else {
            return charset.is_empty()
                || charset.eq_ignore_ascii_case("US-ASCII")
                || encoding_for_name(charset).is_some_and(|e| same_encoding(&e, &Ascii));
        };
        if charset.is_empty() {
            return false;
        }
        let value = &self.text[start..end];
        if value.eq_ignore_ascii_case(charset) {
            return true;
        }
        match (
            encoding_for_name(charset),
            encoding_for_name(&decode_lossy(value, false)),
        ) {
            (Some(a), Some(b)) => same_encoding(&a, &b),
            _ => false,
        }
    }

    /// Checks whether the charset names `encoding`.
    #[must_use]
    pub fn is_encoding(&self, encoding: &dyn Encoding) -> bool {
        match self.charset_range() {
            None => same_encoding(encoding, &Ascii),
            Some((start, end)) => {
                encoding_for_name(&decode_lossy(&self.text[start..end], false))
                    .is_some_and(|e| same_encoding(&e, encoding))
            }
        }
    }

    /// Returns the decoded MIME type parameters.
    ///
    /// `;base64` is not a parameter. If a name repeats, the last value wins.
    #[must_use]
    pub fn parameters(&self) -> BTreeMap<String, String> {
        let ix = &self.indices;
        let mut map = BTreeMap::new();
        let mut k = 1;
        while k + 2 < ix.len() {
            let (start, eq, end) = (ix[k] + 1, ix[k + 1], ix[k + 2]);
            map.insert(
                decode_lossy(&self.text[start..eq], false),
                decode_lossy(&self.text[eq + 1..end], false),
            );
            k += 2;
        }
        map
    }

    /// Checks whether the content is base64-encoded.
    #[must_use]
    pub fn is_base64(&self) -> bool {
        self.indices.len() % 2 == 1
    }

    fn content_start(&self) -> usize {
        self.indices.last().map_or(0, |&comma| comma + 1)
    }

    /// Returns the content as written, after the `,`.
    #[must_use]
    pub fn content_text(&self) -> &str {
        &self.text[self.content_start()..]
    }

    /// Returns the decoded content bytes.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the content holds an invalid escape or invalid base64.
    pub fn content_as_bytes(&self) -> Result<Vec<u8>, ParseError> {
        let start = self.content_start();
        if self.is_base64() {
            return encoding::decode_base64(&self.text[start..]).map_err(|mut e| {
                e.index += start;
                e.input = self.text.clone();
                e
            });
        }
        let bytes = self.text.as_bytes();
        let mut out = Vec::with_capacity(bytes.len() - start);
        let mut i = start;
        while i < bytes.len() {
            let x = bytes[i];
            if x != b'%' {
                out.push(x);
                i += 1;
                continue;
            }
            let Some(v) = hex_pair(bytes, i + 1) else {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidEscape,
                    &self.text,
                    i,
                ));
            };
            out.push(v);
            i += 3;
        }
        Ok(out)
    }

    /// Returns the content decoded as text.
    ///
    /// Without an explicit encoding, the one named by the charset is used.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no encoding is given and the charset is unknown, or
    /// the content cannot be decoded.
    pub fn content_as_string(&self, encoding: Option<&dyn Encoding>) -> Result<String, Error> {
        let found;
        let encoding = match encoding {
            Some(encoding) => encoding,
            None => {
                let charset = self.charset();
                found = encoding_for_name(&charset).ok_or_else(|| {
                    UnsupportedError::new(UnsupportedErrorKind::UnknownCharset, charset)
                })?;
                &found
            }
        };
        if self.is_base64() {
            let bytes = self.content_as_bytes()?;
            return Ok(encoding.decode(&bytes)?.into_owned());
        }
        let start = self.content_start();
        Ok(pct_enc::uri_decode(
            &self.text,
            start,
            self.text.len(),
            encoding,
            false,
        )?)
    }
}

/// Writes `data:` and the MIME type with its parameters, returning the
/// text and the separator positions so far.
fn write_header(
    mime_type: Option<&str>,
    charset: Option<&str>,
    parameters: &[(&str, &str)],
) -> Result<(String, Vec<usize>), ArgumentError> {
    let mut text = String::from(PREFIX);
    let mut indices = vec![PREFIX.len() - 1];
    let token = |s: &str| pct_enc::uri_encode_utf8(table::TOKEN_CHAR, s, false);

    let mime_type = match mime_type {
        Some(m) if !m.eq_ignore_ascii_case("text/plain") => m,
        _ => "",
    };
    if !mime_type.is_empty() {
        let mut slashes = mime_type.match_indices('/').map(|(i, _)| i);
        let slash = match (slashes.next(), slashes.next()) {
            (Some(slash), None) => slash,
            _ => {
                return Err(ArgumentError::new(
                    ArgumentErrorKind::InvalidMimeType,
                    mime_type,
                ))
            }
        };
        text.push_str(&token(&mime_type[..slash]));
        text.push('/');
        text.push_str(&token(&mime_type[slash + 1..]));
    }

    if let Some(charset) = charset {
        indices.push(text.len());
        indices.push(text.len() + 8);
        text.push_str(";charset=");
        text.push_str(&token(charset));
    }

    for &(key, value) in parameters {
        if key.is_empty() {
            return Err(ArgumentError::new(
                ArgumentErrorKind::EmptyParameterName,
                "",
            ));
        }
        if value.is_empty() {
            return Err(ArgumentError::new(
                ArgumentErrorKind::EmptyParameterValue,
                key,
            ));
        }
        indices.push(text.len());
        text.push(';');
        text.push_str(&token(key));
        indices.push(text.len());
        text.push('=');
        text.push_str(&token(value));
    }
    Ok((text, indices))
}

/// Normalizes a range, escaping any delimiter so that it cannot fail.
fn normalize_lenient(text: &str, start: usize, end: usize, table: CharTable) -> String {
    pct_enc::normalize(text, start, end, table, true, false)
        .map_or_else(|_| text[start..end].to_owned(), Cow::into_owned)
}

/// Parses `input[start..end]`, which starts with `data:` in any case.
///
/// Error indices are relative to the whole of `input`.
fn parse_range(input: &str, start: usize, end: usize) -> Result<UriData, ParseError> {
    let text = format!("{PREFIX}{}", &input[start + PREFIX.len()..end]);
    parse_text(&text).map_err(|mut e| {
        e.index += start;
        e.input = input.to_owned();
        e
    })
}

/// Parses data URI text that starts with a lowercase `data:`.
fn parse_text(text: &str) -> Result<UriData, ParseError> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let err = |kind, i: usize| Err(ParseError::new(kind, text, i.min(len)));

    let start = PREFIX.len();
    let mut indices = vec![start - 1];
    let mut slash = None;
    let mut i = start;
    while i < len {
        match bytes[i] {
            b',' | b';' => break,
            b'/' if slash.is_some() => return err(ParseErrorKind::InvalidMimeType, i),
            b'/' => slash = Some(i),
            _ => {}
        }
        i += 1;
    }
    if slash.is_none() && i > start {
        // An empty MIME type is fine, but a non-empty one needs its slash.
        return err(ParseErrorKind::InvalidMimeType, i);
    }

    while bytes.get(i) != Some(&b',') {
        indices.push(i);
        i += 1;
        let mut eq = None;
        while i < len {
            match bytes[i] {
                b'=' => {
                    eq.get_or_insert(i);
                }
                b';' | b',' => break,
                _ => {}
            }
            i += 1;
        }
        match eq {
            Some(eq) => indices.push(eq),
            None => {
                // Only a final `;base64` may go without a value.
                let last = indices[indices.len() - 1];
                let is_base64 = bytes.get(i) == Some(&b',')
                    && i == last + 7
                    && bytes[last + 1..i] == *b"base64";
                if !is_base64 {
                    return err(ParseErrorKind::ExpectingEquals, i);
                }
                break;
            }
        }
    }
    indices.push(i);

    let content = if indices.len() % 2 == 1 {
        encoding::normalize_base64_range(text, i + 1, len)?
    } else {
        match pct_enc::normalize(text, i + 1, len, table::URIC, true, false)? {
            Cow::Borrowed(_) => None,
            Cow::Owned(s) => Some(s),
        }
    };
    let header = pct_enc::normalize(text, start, i, table::PATH_CHAR_OR_SLASH, true, false)?;
    if let Cow::Owned(header) = header {
        // Escapes in the header shift the separators, so scan the result again.
        let content = content.as_deref().unwrap_or(&text[i + 1..]);
        return parse_text(&format!("{PREFIX}{header},{content}"));
    }
    let text = match content {
        Some(content) => format!("{}{content}", &text[..=i]),
        None => text.to_owned(),
    };
    Ok(UriData { text, indices })
}

/// Parses a `data:` URI that may carry a fragment.
pub(crate) fn parse_data_uri(input: &str, start: usize, end: usize) -> Result<DataUri, ParseError> {
    let hash = input[start..end].find('#').map(|i| start + i);
    let data = parse_range(input, start, hash.unwrap_or(end))?;
    let fragment = match hash {
        Some(hash) => Some(normalize::make_fragment(input, hash + 1, end)?),
        None => None,
    };
    Ok(DataUri::new(data.general_uri(fragment), data))
}

impl fmt::Debug for UriData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UriData")
            .field("mime_type", &self.mime_type())
            .field("parameters", &self.parameters())
            .field("is_base64", &self.is_base64())
            .field("content", &self.content_text())
            .finish()
    }
}

impl fmt::Display for UriData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.text, f)
    }
}

impl std::str::FromStr for UriData {
    type Err = ParseError;

    /// Equivalent to [`UriData::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for UriData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for UriData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        UriData::parse(&s).map_err(|e| {
            de::Error::custom(format_args!("failed to parse {s:?} as data URI: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators() {
        let d = parse_text("data:text/plain;a=b;base64,aGk=").unwrap();
        assert_eq!(d.indices, [4, 15, 17, 19, 26]);
        assert!(d.is_base64());

        let d = parse_text("data:,x").unwrap();
        assert_eq!(d.indices, [4, 5]);
        assert!(!d.is_base64());

        let d = parse_text("data:;charset=utf-8,x").unwrap();
        assert_eq!(d.indices, [4, 5, 13, 19]);
        assert_eq!(d.charset_range(), Some((14, 19)));
    }

    #[test]
    fn built_matches_parsed() {
        let built =
            UriData::from_string("a b", Some("text/html"), None, &[("x", "1")], false).unwrap();
        let parsed = parse_text(built.as_str()).unwrap();
        assert_eq!(built.indices, parsed.indices);
        assert_eq!(built.text, parsed.text);

        let built = UriData::from_bytes(&[0, 1, 2], None, &[], false).unwrap();
        let parsed = parse_text(built.as_str()).unwrap();
        assert_eq!(built.indices, parsed.indices);
    }

    #[test]
    fn errors() {
        let e = parse_text("data:a/b/c,x").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::InvalidMimeType);
        assert_eq!(e.index(), 8);

        let e = parse_text("data:ab,x").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::InvalidMimeType);
        assert_eq!(e.index(), 7);

        let e = parse_text("data:a/b;foo,x").unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::ExpectingEquals);
        assert_eq!(e.index(), 12);

        assert_eq!(
            parse_text("data:a/b;x=y").unwrap_err().kind(),
            ParseErrorKind::ExpectingEquals
        );
    }
}
