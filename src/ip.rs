//! IPv4 and IPv6 literal parsing.

use crate::{
    error::{ParseError, ParseErrorKind},
    pct_enc::hex_value,
};

/// Returns immediately with an error.
macro_rules! err {
    ($input:expr, $index:expr, $kind:ident) => {
        return Err(ParseError::new(ParseErrorKind::$kind, $input, $index))
    };
}

/// Parses an IPv4 address in dotted-decimal form.
///
/// Each of the four parts must be a decimal number in `0..=255`.
/// Leading zeros are accepted and do not denote octal.
///
/// # Examples
///
/// ```
/// assert_eq!(urikit::parse_ipv4_address("127.0.0.1")?, [127, 0, 0, 1]);
/// assert!(urikit::parse_ipv4_address("256.0.0.1").is_err());
/// # Ok::<_, urikit::ParseError>(())
/// ```
pub fn parse_ipv4_address(host: &str) -> Result<[u8; 4], ParseError> {
    parse_ipv4_address_range(host, 0, host.len())
}

/// Parses the IPv4 address in `host[start..end]`.
///
/// Error indices are relative to the whole of `host`.
pub fn parse_ipv4_address_range(
    host: &str,
    start: usize,
    end: usize,
) -> Result<[u8; 4], ParseError> {
    let bytes = host.as_bytes();
    let mut out = [0u8; 4];
    let mut part_index = 0;
    let mut part_start = start;

    for i in start..end {
        let x = bytes[i];
        if x == b'.' {
            if part_index == 3 {
                err!(host, i, Ipv4PartCount);
            }
            out[part_index] = parse_dec_octet(host, part_start, i)?;
            part_index += 1;
            part_start = i + 1;
        } else if !x.is_ascii_digit() {
            err!(host, i, Ipv4InvalidChar);
        }
    }

    if part_index != 3 {
        err!(host, end, Ipv4PartCount);
    }
    out[3] = parse_dec_octet(host, part_start, end)?;
    Ok(out)
}

fn parse_dec_octet(host: &str, start: usize, end: usize) -> Result<u8, ParseError> {
    if start == end {
        err!(host, start, Ipv4PartRange);
    }
    let value = host.as_bytes()[start..end]
        .iter()
        .fold(0u32, |acc, &x| (acc * 10 + u32::from(x - b'0')).min(256));
    match u8::try_from(value) {
        Ok(v) => Ok(v),
        Err(_) => err!(host, start, Ipv4PartRange),
    }
}

/// Parses an IPv6 address into its sixteen bytes in network order.
///
/// At most one `::` may elide a run of zero parts, and the last
/// two parts may be written as an embedded IPv4 address.
///
/// # Examples
///
/// ```
/// let bytes = urikit::parse_ipv6_address("::1")?;
/// assert_eq!(bytes[15], 1);
/// assert!(bytes[..15].iter().all(|&b| b == 0));
///
/// let e = urikit::parse_ipv6_address("1::2::3").unwrap_err();
/// assert_eq!(e.kind(), urikit::ParseErrorKind::Ipv6MultipleWildcards);
/// # Ok::<_, urikit::ParseError>(())
/// ```
pub fn parse_ipv6_address(host: &str) -> Result<[u8; 16], ParseError> {
    parse_ipv6_address_range(host, 0, host.len())
}

/// Marks the position of `::` among the parsed parts.
const WILDCARD: i32 = -1;

/// Parses the IPv6 address in `host[start..end]`.
///
/// Error indices are relative to the whole of `host`.
pub fn parse_ipv6_address_range(
    host: &str,
    start: usize,
    end: usize,
) -> Result<[u8; 16], ParseError> {
    let bytes = host.as_bytes();
    if end - start < 2 {
        err!(host, start, Ipv6TooShort);
    }

    let mut parts: Vec<i32> = Vec::with_capacity(8);
    let mut wildcard_seen = false;
    let mut seen_dot = false;
    let mut part_start = start;

    let mut i = start;
    while i < end {
        match bytes[i] {
            b':' => {
                if i == start {
                    i += 1;
                    if i >= end || bytes[i] != b':' {
                        err!(host, i, Ipv6InvalidStartColon);
                    }
                    part_start = i;
                }
                if i == part_start {
                    if wildcard_seen {
                        err!(host, i, Ipv6MultipleWildcards);
                    }
                    wildcard_seen = true;
                    parts.push(WILDCARD);
                } else {
                    parts.push(parse_hex_part(host, part_start, i)?);
                }
                part_start = i + 1;
            }
            b'.' => seen_dot = true,
            _ => {}
        }
        i += 1;
    }

    let Some(&last) = parts.last() else {
        err!(host, end, Ipv6TooFewParts);
    };
    let at_end = part_start == end;
    if at_end && last != WILDCARD {
        err!(host, end, Ipv6MissingLastPart);
    }
    if !at_end {
        if seen_dot {
            let v4 = parse_ipv4_address_range(host, part_start, end)?;
            parts.push(i32::from(u16::from_be_bytes([v4[0], v4[1]])));
            parts.push(i32::from(u16::from_be_bytes([v4[2], v4[3]])));
        } else {
            parts.push(parse_hex_part(host, part_start, end)?);
        }
    }

    if wildcard_seen {
        if parts.len() > 7 {
            err!(host, start, Ipv6TooManyParts);
        }
    } else if parts.len() != 8 {
        err!(host, start, Ipv6WrongPartCount);
    }

    let mut out = [0u8; 16];
    let mut index = 0;
    for &part in &parts {
        if part == WILDCARD {
            index += (9 - parts.len()) * 2;
        } else {
            out[index..index + 2].copy_from_slice(&(part as u16).to_be_bytes());
            index += 2;
        }
    }
    Ok(out)
}

fn parse_hex_part(host: &str, start: usize, end: usize) -> Result<i32, ParseError> {
    if end - start > 4 {
        err!(host, start, Ipv6PartTooLong);
    }
    let mut value = 0;
    for (i, &x) in host.as_bytes()[start..end].iter().enumerate() {
        match hex_value(x) {
            Some(v) => value = value << 4 | i32::from(v),
            None => err!(host, start + i, Ipv6InvalidHexDigit),
        }
    }
    Ok(value)
}
