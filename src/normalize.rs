//! Validation and normalization of individual URI components.
//!
//! The functions taking `input, start, end` work on a range of a larger
//! string so that error indices point into the text the caller parsed.

use crate::{
    error::{ParseError, ParseErrorKind},
    ip,
    pct_enc::{self, Escape},
    table,
};
use std::borrow::Cow;

/// Returns the default port of a scheme, or `0` if it has none.
#[must_use]
pub(crate) fn default_port(scheme: &str) -> u16 {
    match scheme {
        "http" => 80,
        "https" => 443,
        _ => 0,
    }
}

/// Validates and lowercases a scheme.
///
/// An empty range yields an empty scheme. Checking that a scheme
/// is present where one is required is up to the caller.
pub(crate) fn make_scheme(input: &str, start: usize, end: usize) -> Result<String, ParseError> {
    let bytes = &input.as_bytes()[start..end];
    let Some(first) = bytes.first() else {
        return Ok(String::new());
    };
    if !first.is_ascii_alphabetic() {
        return Err(ParseError::new(ParseErrorKind::SchemeStart, input, start));
    }
    if let Some(i) = bytes.iter().position(|&x| !table::SCHEME.allows(x)) {
        return Err(ParseError::new(
            ParseErrorKind::SchemeChar,
            input,
            start + i,
        ));
    }
    Ok(input[start..end].to_ascii_lowercase())
}

pub(crate) fn make_user_info(input: &str, start: usize, end: usize) -> Result<String, ParseError> {
    pct_enc::normalize(input, start, end, table::USERINFO, false, false).map(Cow::into_owned)
}

/// Validates and normalizes a host.
///
/// A bracketed host must be an IPv6 address with an optional `%25` zone ID.
/// Unless `strict_ipv6` is set, an unbracketed host containing a colon is
/// validated as IPv6 and wrapped in brackets. Anything else is a reg-name.
pub(crate) fn make_host(
    input: &str,
    start: usize,
    end: usize,
    strict_ipv6: bool,
) -> Result<String, ParseError> {
    let bytes = input.as_bytes();
    if start == end {
        return Ok(String::new());
    }
    if bytes[start] == b'[' {
        if bytes[end - 1] != b']' || end - start < 2 {
            return Err(ParseError::new(
                ParseErrorKind::MissingBracket,
                input,
                start,
            ));
        }
        let (addr_end, zone) = split_zone_id(input, start + 1, end - 1)?;
        ip::parse_ipv6_address_range(input, start + 1, addr_end)?;
        let mut host = input[start..addr_end].to_ascii_lowercase();
        host.push_str(&zone);
        host.push(']');
        return Ok(host);
    }
    if !strict_ipv6 && bytes[start..end].contains(&b':') {
        let (addr_end, zone) = split_zone_id(input, start, end)?;
        ip::parse_ipv6_address_range(input, start, addr_end)?;
        return Ok(format!(
            "[{}{}]",
            input[start..addr_end].to_ascii_lowercase(),
            zone
        ));
    }
    normalize_reg_name(input, start, end).map(Cow::into_owned)
}

/// Finds a zone ID introduced by `%` or `%25` in `input[start..end]`.
///
/// Returns the end of the address and the normalized zone ID,
/// including its `%25` prefix, or an empty string if there is none.
fn split_zone_id(input: &str, start: usize, end: usize) -> Result<(usize, String), ParseError> {
    let bytes = input.as_bytes();
    let Some(pct) = bytes[start..end].iter().position(|&x| x == b'%') else {
        return Ok((end, String::new()));
    };
    let pct = start + pct;
    let zone_start = if input[pct + 1..end].starts_with("25") {
        pct + 3
    } else {
        pct + 1
    };
    let mut zone = String::from("%25");
    let mut i = zone_start;
    let mut section_start = i;
    while i < end {
        let x = bytes[i];
        if x != b'%' {
            i += 1;
            continue;
        }
        match pct_enc::normalize_escape(input, i, end, false) {
            Escape::Invalid => {
                return Err(ParseError::new(ParseErrorKind::InvalidEscape, input, i));
            }
            Escape::Keep => i += 3,
            Escape::Replace(s) => {
                zone.push_str(&pct_enc::normalize(
                    input,
                    section_start,
                    i,
                    table::ZONE_ID,
                    true,
                    false,
                )?);
                zone.push_str(&s);
                i += 3;
                section_start = i;
            }
        }
    }
    zone.push_str(&pct_enc::normalize(
        input,
        section_start,
        end,
        table::ZONE_ID,
        true,
        false,
    )?);
    Ok((pct, zone))
}

/// Lowercases a reg-name and normalizes its escapes.
///
/// Escapes of unreserved characters are decoded, a stray `%` becomes `%25`
/// and characters outside the reg-name class other than gen-delims are escaped.
pub(crate) fn normalize_reg_name(
    input: &str,
    start: usize,
    end: usize,
) -> Result<Cow<'_, str>, ParseError> {
    let bytes = input.as_bytes();
    let needs_work = bytes[start..end]
        .iter()
        .any(|&x| !table::REG_NAME.allows(x) || x.is_ascii_uppercase());
    if !needs_work {
        return Ok(Cow::Borrowed(&input[start..end]));
    }

    let mut buf = String::with_capacity(end - start);
    let mut i = start;
    while i < end {
        let x = bytes[i];
        if x == b'%' {
            match pct_enc::normalize_escape(input, i, end, true) {
                Escape::Keep => buf.push_str(&input[i..i + 3]),
                Escape::Invalid => {
                    buf.push_str("%25");
                    i += 1;
                    continue;
                }
                Escape::Replace(s) => buf.push_str(&s),
            }
            i += 3;
        } else if table::REG_NAME.allows(x) {
            buf.push(x.to_ascii_lowercase() as char);
            i += 1;
        } else if table::GEN_DELIMS.allows(x) {
            return Err(ParseError::new(ParseErrorKind::UnexpectedChar, input, i));
        } else {
            let Some(ch) = input[i..].chars().next() else {
                break;
            };
            buf.push_str(&pct_enc::escape_char(ch));
            i += ch.len_utf8();
        }
    }
    Ok(Cow::Owned(buf))
}

/// Parses a decimal port number.
pub(crate) fn parse_port(input: &str, start: usize, end: usize) -> Result<u16, ParseError> {
    let digits = &input[start..end];
    if digits.is_empty() || !digits.bytes().all(|x| x.is_ascii_digit()) {
        return Err(ParseError::new(ParseErrorKind::InvalidPort, input, start));
    }
    digits
        .parse()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidPort, input, start))
}

/// Drops a port equal to the default port of the scheme.
#[must_use]
pub(crate) fn make_port(port: Option<u16>, scheme: &str) -> Option<u16> {
    port.filter(|&p| p != default_port(scheme))
}

/// Normalizes a path given as text.
pub(crate) fn make_path(
    input: &str,
    start: usize,
    end: usize,
    scheme: &str,
    has_authority: bool,
) -> Result<String, ParseError> {
    let path = pct_enc::normalize(input, start, end, table::PATH_CHAR_OR_SLASH, true, true)?;
    Ok(finish_path(path.into_owned(), scheme, has_authority))
}

/// Builds a path from unencoded segments.
pub(crate) fn make_path_from_segments<S: AsRef<str>>(
    segments: &[S],
    scheme: &str,
    has_authority: bool,
) -> String {
    let path = segments
        .iter()
        .map(|s| pct_enc::uri_encode_utf8(table::PATH_CHAR, s.as_ref(), false))
        .collect::<Vec<_>>()
        .join("/");
    finish_path(path, scheme, has_authority)
}

/// The path of a URI built without a path.
pub(crate) fn empty_path(scheme: &str) -> String {
    if scheme == "file" {
        "/".into()
    } else {
        String::new()
    }
}

fn finish_path(mut path: String, scheme: &str, has_authority: bool) -> String {
    let is_file = scheme == "file";
    if path.is_empty() {
        if is_file {
            path.push('/');
        }
    } else if (is_file || has_authority) && !path.starts_with('/') {
        path.insert(0, '/');
    }
    normalize_path(path, scheme, has_authority)
}

/// Removes dot segments, keeping leading `..` in paths that
/// have nothing to resolve against.
pub(crate) fn normalize_path(path: String, scheme: &str, has_authority: bool) -> String {
    if scheme.is_empty() && !has_authority && !path.starts_with('/') {
        normalize_relative_path(&path, false).into_owned()
    } else {
        remove_dot_segments(&path).into_owned()
    }
}

/// Checks whether a path might contain a `.` or `..` segment.
pub(crate) fn may_contain_dot_segments(path: &str) -> bool {
    path.starts_with('.') || path.contains("/.")
}

/// Removes `.` and `..` segments as in RFC 3986, Section 5.2.4.
///
/// A `..` that would climb above the root is dropped.
pub(crate) fn remove_dot_segments(path: &str) -> Cow<'_, str> {
    if !may_contain_dot_segments(path) {
        return Cow::Borrowed(path);
    }
    let mut output: Vec<&str> = Vec::new();
    let mut append_slash = false;
    for segment in path.split('/') {
        append_slash = false;
        match segment {
            ".." => {
                if output.pop().is_some() && output.is_empty() {
                    output.push("");
                }
                append_slash = true;
            }
            "." => append_slash = true,
            _ => output.push(segment),
        }
    }
    if append_slash {
        output.push("");
    }
    Cow::Owned(output.join("/"))
}

/// Removes dot segments from a relative path, keeping the leading `..`
/// segments that cannot be resolved.
///
/// Unless `allow_scheme` is set, colons in the first segment are escaped
/// as `%3A` so that it cannot read as a scheme.
pub(crate) fn normalize_relative_path(path: &str, allow_scheme: bool) -> Cow<'_, str> {
    if !may_contain_dot_segments(path) {
        if !allow_scheme {
            return escape_scheme(path);
        }
        return Cow::Borrowed(path);
    }
    let mut output: Vec<Cow<'_, str>> = Vec::new();
    let mut append_slash = false;
    for segment in path.split('/') {
        append_slash = false;
        match segment {
            ".." => {
                if output.last().is_some_and(|s| *s != "..") {
                    output.pop();
                    append_slash = true;
                } else {
                    output.push(Cow::Borrowed(".."));
                }
            }
            "." => append_slash = true,
            _ => output.push(Cow::Borrowed(segment)),
        }
    }
    if output.is_empty() || (output.len() == 1 && output[0].is_empty()) {
        return Cow::Borrowed("./");
    }
    if append_slash || output.last().is_some_and(|s| *s == "..") {
        output.push(Cow::Borrowed(""));
    }
    if !allow_scheme {
        let first = escape_scheme(&output[0]).into_owned();
        output[0] = Cow::Owned(first);
    }
    Cow::Owned(output.join("/"))
}

/// Escapes every colon in the first segment of a relative path, which
/// would otherwise read as the end of a scheme.
pub(crate) fn escape_scheme(path: &str) -> Cow<'_, str> {
    let first = path.find('/').unwrap_or(path.len());
    if !path[..first].contains(':') {
        return Cow::Borrowed(path);
    }
    let mut buf = path[..first].replace(':', "%3A");
    buf.push_str(&path[first..]);
    Cow::Owned(buf)
}

pub(crate) fn make_query(input: &str, start: usize, end: usize) -> Result<String, ParseError> {
    pct_enc::normalize(input, start, end, table::QUERY_CHAR, true, false).map(Cow::into_owned)
}

pub(crate) fn make_fragment(input: &str, start: usize, end: usize) -> Result<String, ParseError> {
    pct_enc::normalize(input, start, end, table::QUERY_CHAR, true, false).map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_segments() {
        for (input, expected) in [
            ("/a/b/c/./../../g", "/a/g"),
            ("mid/content=5/../6", "mid/6"),
            ("/..", "/"),
            ("/../a", "/a"),
            ("/a/..", "/"),
            ("/a/.", "/a/"),
            ("/a/b/..", "/a/"),
            ("/a//../b", "/a/b"),
            ("/plain", "/plain"),
        ] {
            assert_eq!(remove_dot_segments(input), expected, "{input}");
        }
    }

    #[test]
    fn dot_segments_idempotent() {
        for p in ["/a/./b/../c/", "/../x/.", "a/b/../../.."] {
            let once = remove_dot_segments(p).into_owned();
            assert_eq!(remove_dot_segments(&once), once);
        }
    }

    #[test]
    fn relative_paths() {
        for (input, expected) in [
            ("..", "../"),
            ("../..", "../../"),
            ("a/..", "./"),
            ("./a", "a"),
            ("a/../../b", "../b"),
            ("a/./b/.", "a/b/"),
            (".", "./"),
            ("./a:b", "a%3Ab"),
            ("a:b/c", "a%3Ab/c"),
            ("1:b", "1:b"),
        ] {
            assert_eq!(normalize_relative_path(input, false), expected, "{input}");
        }
        assert_eq!(normalize_relative_path("./a:b", true), "a:b");
    }

    #[test]
    fn hosts() {
        let h = |s: &str, strict| make_host(s, 0, s.len(), strict);
        assert_eq!(h("Example.COM", true).unwrap(), "example.com");
        assert_eq!(h("%41%2f", true).unwrap(), "a%2F");
        assert_eq!(h("a%", true).unwrap(), "a%25");
        assert_eq!(h("[::FFFF]", true).unwrap(), "[::ffff]");
        assert_eq!(h("[fe80::1%25Eth0]", true).unwrap(), "[fe80::1%25Eth0]");
        assert_eq!(h("[fe80::1%eth0]", true).unwrap(), "[fe80::1%25eth0]");
        assert_eq!(h("::1", false).unwrap(), "[::1]");
        assert_eq!(h("ü", true).unwrap(), "%C3%BC");

        let e = h("[::1", true).unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::MissingBracket);
        assert_eq!(e.index(), 0);
        assert_eq!(
            h("a@b", true).unwrap_err().kind(),
            ParseErrorKind::UnexpectedChar
        );
        assert_eq!(
            h("[1::2::3]", true).unwrap_err().kind(),
            ParseErrorKind::Ipv6MultipleWildcards
        );
    }

    #[test]
    fn schemes() {
        assert_eq!(make_scheme("HtTp", 0, 4).unwrap(), "http");
        assert_eq!(make_scheme("", 0, 0).unwrap(), "");
        assert_eq!(
            make_scheme("1a", 0, 2).unwrap_err().kind(),
            ParseErrorKind::SchemeStart
        );
        let e = make_scheme("a_b", 0, 3).unwrap_err();
        assert_eq!(e.kind(), ParseErrorKind::SchemeChar);
        assert_eq!(e.index(), 1);
    }

    #[test]
    fn paths() {
        assert_eq!(make_path("a/b", 0, 3, "file", false).unwrap(), "/a/b");
        assert_eq!(make_path("", 0, 0, "file", false).unwrap(), "/");
        assert_eq!(make_path("a b", 0, 3, "", false).unwrap(), "a%20b");
        assert_eq!(make_path("a\\b", 0, 3, "http", true).unwrap(), "/a/b");
        assert_eq!(
            make_path_from_segments(&["a/b", "c d"], "", false),
            "a%2Fb/c%20d"
        );
        assert_eq!(make_path_from_segments(&["x"], "http", true), "/x");
        assert_eq!(make_port(Some(80), "http"), None);
        assert_eq!(make_port(Some(80), "https"), Some(80));
    }
}
