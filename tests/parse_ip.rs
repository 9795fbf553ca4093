use std::net::{Ipv4Addr, Ipv6Addr};

use urikit::{parse_ipv4_address, parse_ipv6_address, parse_ipv6_address_range, ParseErrorKind};

fn parse_v4(s: &str) -> Option<Ipv4Addr> {
    parse_ipv4_address(s).ok().map(Ipv4Addr::from)
}

fn parse_v6(s: &str) -> Option<Ipv6Addr> {
    parse_ipv6_address(s).ok().map(Ipv6Addr::from)
}

#[track_caller]
fn v4_error(s: &str, kind: ParseErrorKind, index: usize) {
    let e = parse_ipv4_address(s).unwrap_err();
    assert_eq!((e.kind(), e.index()), (kind, index), "{s}");
}

#[track_caller]
fn v6_error(s: &str, kind: ParseErrorKind, index: usize) {
    let e = parse_ipv6_address(s).unwrap_err();
    assert_eq!((e.kind(), e.index()), (kind, index), "{s}");
}

#[test]
fn test_parse_v4() {
    assert_eq!(Some(Ipv4Addr::new(127, 0, 0, 1)), parse_v4("127.0.0.1"));
    assert_eq!(
        Some(Ipv4Addr::new(255, 255, 255, 255)),
        parse_v4("255.255.255.255")
    );
    assert_eq!(Some(Ipv4Addr::new(0, 0, 0, 0)), parse_v4("0.0.0.0"));
    // leading zeros are decimal
    assert_eq!(Some(Ipv4Addr::new(1, 2, 3, 8)), parse_v4("01.002.3.0008"));

    // out of range
    v4_error("256.0.0.1", ParseErrorKind::Ipv4PartRange, 0);
    v4_error("1.2.3.99999999999", ParseErrorKind::Ipv4PartRange, 6);
    // too short
    v4_error("255.0.0", ParseErrorKind::Ipv4PartCount, 7);
    // too long
    v4_error("255.0.0.1.2", ParseErrorKind::Ipv4PartCount, 9);
    // no number between dots
    v4_error("255.0..1", ParseErrorKind::Ipv4PartRange, 6);
    v4_error("1.2.3.", ParseErrorKind::Ipv4PartRange, 6);
    // not a digit
    v4_error("1.2.a.4", ParseErrorKind::Ipv4InvalidChar, 4);
    v4_error(" 1.2.3.4", ParseErrorKind::Ipv4InvalidChar, 0);
}

#[test]
fn test_parse_v6() {
    // only one colon-elided group
    assert_eq!(Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0)), parse_v6("::"));
    assert_eq!(Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1)), parse_v6("::1"));
    assert_eq!(Some(Ipv6Addr::new(1, 0, 0, 0, 0, 0, 0, 0)), parse_v6("1::"));
    assert_eq!(
        Some(Ipv6Addr::new(1, 2, 3, 4, 5, 6, 7, 8)),
        parse_v6("1:2:3:4:5:6:7:8")
    );
    assert_eq!(
        Some(Ipv6Addr::new(0x2a02, 0x6b8, 0, 0, 0, 0, 0x11, 0x11)),
        parse_v6("2a02:6b8::11:11")
    );
    assert_eq!(
        Some(Ipv6Addr::new(0xabcd, 0xef01, 0, 0, 0, 0, 0, 0)),
        parse_v6("ABCD:ef01::")
    );
    // embedded IPv4
    assert_eq!(
        Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 0xc000, 0x0280)),
        parse_v6("::ffff:192.0.2.128")
    );
    assert_eq!(
        Some(Ipv6Addr::new(1, 2, 3, 4, 5, 6, 0x0102, 0x0304)),
        parse_v6("1:2:3:4:5:6:1.2.3.4")
    );

    v6_error("1", ParseErrorKind::Ipv6TooShort, 0);
    v6_error("12", ParseErrorKind::Ipv6TooFewParts, 2);
    v6_error(":1", ParseErrorKind::Ipv6InvalidStartColon, 1);
    v6_error("1::2::3", ParseErrorKind::Ipv6MultipleWildcards, 5);
    v6_error("1:", ParseErrorKind::Ipv6MissingLastPart, 2);
    v6_error("1:2", ParseErrorKind::Ipv6WrongPartCount, 0);
    v6_error("1:2:3:4:5:6:7:8:9", ParseErrorKind::Ipv6WrongPartCount, 0);
    v6_error("1::2:3:4:5:6:7:8", ParseErrorKind::Ipv6TooManyParts, 0);
    v6_error("12345::", ParseErrorKind::Ipv6PartTooLong, 0);
    v6_error("::1:g", ParseErrorKind::Ipv6InvalidHexDigit, 4);
    v6_error("::1.2.3", ParseErrorKind::Ipv4PartCount, 7);
}

#[test]
fn v6_range() {
    let s = "[fe80::1]";
    let bytes = parse_ipv6_address_range(s, 1, s.len() - 1).unwrap();
    assert_eq!(
        Ipv6Addr::from(bytes),
        Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)
    );

    let e = parse_ipv6_address_range("[::x]", 1, 4).unwrap_err();
    assert_eq!(e.index(), 3);
    assert_eq!(e.input(), "[::x]");
}

#[cfg(feature = "net")]
#[test]
fn host_ip() {
    use std::net::IpAddr;
    use urikit::Uri;

    let uri = Uri::parse("http://[fe80::1%25eth0]:8080/").unwrap();
    assert_eq!(
        uri.host_ip(),
        Some(IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)))
    );
    let uri = Uri::parse("http://10.0.0.1/").unwrap();
    assert_eq!(uri.host_ip(), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
    assert_eq!(Uri::parse("http://example.com/").unwrap().host_ip(), None);
}
