//! Turning scanner output into a [`Uri`].

use crate::{
    data,
    error::{ParseError, ParseErrorKind},
    normalize,
    scan::{self, Indices},
    uri::{Components, GeneralUri, SimpleUri, Uri},
};

/// Component boundaries found by the scanner, as absolute indices.
///
/// A missing scheme or authority is marked by `scheme_end` or `host_start`
/// falling before `start`, as the scanner leaves them.
#[derive(Clone, Copy, Debug)]
struct Bounds {
    start: isize,
    scheme_end: isize,
    host_start: isize,
    port_start: isize,
    path_start: isize,
    query_start: isize,
    fragment_start: isize,
    simple: bool,
}

fn scan_bounds(input: &str, start: usize, end: usize) -> Bounds {
    let bytes = input.as_bytes();
    let (s, e) = (start as isize, end as isize);

    let mut ix: Indices = [0, s - 1, s - 1, s, s, e, e, s - 1];
    let state = scan::scan(bytes, start, end, scan::URI_START, &mut ix);
    if state >= scan::NON_SIMPLE_END_STATES {
        ix[scan::NOT_SIMPLE] = e;
    }

    let scheme_end = ix[scan::SCHEME_END];
    if scheme_end >= s {
        // The first pass accepts anything before `:`, so check the scheme again.
        let colon = scheme_end as usize;
        let state = scan::scan(bytes, start, colon, scan::SCHEME_START, &mut ix);
        if state == scan::SCHEME_START {
            ix[scan::NOT_SIMPLE] = scheme_end;
        }
    }

    let host_start = ix[scan::HOST_START] + 1;
    let mut port_start = ix[scan::PORT_START];
    let mut path_start = ix[scan::PATH_START];
    let mut query_start = ix[scan::QUERY_START];
    let fragment_start = ix[scan::FRAGMENT_START];

    if fragment_start < query_start {
        query_start = fragment_start;
    }
    if path_start < host_start {
        path_start = query_start;
    } else if path_start <= scheme_end {
        path_start = scheme_end + 1;
    }
    if port_start < host_start {
        port_start = path_start;
    }

    let mut simple = ix[scan::NOT_SIMPLE] < s;
    if simple {
        let has_authority = host_start > s;
        let has_port = has_authority && port_start < path_start;
        simple = !(host_start > scheme_end + 3
            || (has_port && port_start + 1 == path_start)
            || bytes[start..end].contains(&b'\\')
            || ends_with_dot_segment(&bytes[path_start as usize..query_start as usize])
            || (has_port
                && input[port_start as usize + 1..path_start as usize]
                    .parse::<u16>()
                    .is_err()));
    }

    Bounds {
        start: s,
        scheme_end,
        host_start,
        port_start,
        path_start,
        query_start,
        fragment_start,
        simple,
    }
}

/// Checks for a `.` or `..` path, or a path ending in `/.` or `/..`.
///
/// Dot segments followed by `/` are caught by the scanner.
fn ends_with_dot_segment(path: &[u8]) -> bool {
    matches!(path, b"." | b"..") || path.ends_with(b"/.") || path.ends_with(b"/..")
}

fn is_data_prefix(input: &str, start: usize, end: usize) -> bool {
    end - start >= 5 && input.as_bytes()[start..start + 5].eq_ignore_ascii_case(b"data:")
}

pub(crate) fn parse(input: &str, start: usize, end: usize) -> Result<Uri, ParseError> {
    if is_data_prefix(input, start, end) {
        return data::parse_data_uri(input, start, end).map(Uri::Data);
    }
    let b = scan_bounds(input, start, end);
    if b.simple {
        Ok(Uri::Simple(make_simple(input, start, end, b)))
    } else {
        make_general(input, end, b).map(Uri::General)
    }
}

pub(crate) fn parse_general(
    input: &str,
    start: usize,
    end: usize,
) -> Result<GeneralUri, ParseError> {
    make_general(input, end, scan_bounds(input, start, end))
}

/// Copies a simple range out of the input, applying the rewrites that keep
/// it in normal form.
fn make_simple(input: &str, start: usize, end: usize, b: Bounds) -> SimpleUri {
    let mut text = input[start..end].to_owned();
    let rel = |i: isize| i - b.start;
    let scheme_end = rel(b.scheme_end).max(0) as usize;
    let mut host_start = rel(b.host_start);
    let mut port_start = rel(b.port_start);
    let mut path_start = rel(b.path_start);
    let mut query_start = rel(b.query_start);
    let mut fragment_start = rel(b.fragment_start);
    let has_authority = host_start > 0;

    let is_file = &text[..scheme_end] == "file";
    let default_port = match &text[..scheme_end] {
        "http" => Some("80"),
        "https" => Some("443"),
        _ => None,
    };

    if is_file && !has_authority {
        // `file:` always gets an authority, so the path must be absolute.
        let prefix = if text[path_start as usize..].starts_with('/') {
            "file://"
        } else {
            "file:///"
        };
        let delta = prefix.len() as isize - path_start;
        text = format!("{prefix}{}", &text[path_start as usize..]);
        host_start = 7;
        port_start = 7;
        path_start = 7;
        query_start += delta;
        fragment_start += delta;
    } else if is_file && path_start == query_start {
        text.insert(path_start as usize, '/');
        query_start += 1;
        fragment_start += 1;
    } else if let Some(port) = default_port {
        let (p, q) = (port_start as usize, path_start as usize);
        if has_authority && p + 1 < q && &text[p + 1..q] == port {
            let delta = path_start - port_start;
            text.replace_range(p..q, "");
            path_start -= delta;
            query_start -= delta;
            fragment_start -= delta;
        }
    }

    SimpleUri::new(
        text,
        scheme_end,
        host_start.max(0) as usize,
        port_start as usize,
        path_start as usize,
        query_start as usize,
        fragment_start as usize,
    )
}

fn make_general(input: &str, end: usize, b: Bounds) -> Result<GeneralUri, ParseError> {
    let start = b.start as usize;

    let scheme = if b.scheme_end > b.start {
        normalize::make_scheme(input, start, b.scheme_end as usize)?
    } else if b.scheme_end == b.start {
        return Err(ParseError::new(ParseErrorKind::EmptyScheme, input, start));
    } else {
        String::new()
    };

    let mut user_info = String::new();
    let mut host = None;
    let mut port = None;
    if b.host_start > b.start {
        let host_start = b.host_start as usize;
        let port_start = b.port_start as usize;
        let path_start = b.path_start as usize;
        let user_info_start = (b.scheme_end + 3) as usize;
        if user_info_start < host_start {
            user_info = normalize::make_user_info(input, user_info_start, host_start - 1)?;
        }
        host = Some(normalize::make_host(input, host_start, port_start, true)?);
        if port_start + 1 < path_start {
            let p = normalize::parse_port(input, port_start + 1, path_start)?;
            port = normalize::make_port(Some(p), &scheme);
        }
    }

    let path_start = b.path_start as usize;
    let query_start = b.query_start as usize;
    let fragment_start = b.fragment_start as usize;
    let path = normalize::make_path(input, path_start, query_start, &scheme, host.is_some())?;
    let query = if query_start < fragment_start {
        let query = normalize::make_query(input, query_start + 1, fragment_start)?;
        Some(query)
    } else {
        None
    };
    let fragment = if fragment_start < end {
        Some(normalize::make_fragment(input, fragment_start + 1, end)?)
    } else {
        None
    };

    Ok(GeneralUri::from_components(Components {
        scheme,
        user_info,
        host,
        port,
        path,
        query,
        fragment,
    }))
}
