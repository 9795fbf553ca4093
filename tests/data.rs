use urikit::{
    encoding::{Latin1, Utf8},
    ArgumentErrorKind, Error, GeneralUri, ParseErrorKind, Uri, UriData, UriLike,
    UnsupportedErrorKind,
};

#[test]
fn parse() {
    let data = UriData::parse("data:text/plain;charset=utf-8,a%20b").unwrap();
    assert_eq!(data.mime_type(), "text/plain");
    assert_eq!(data.charset(), "utf-8");
    assert!(!data.is_base64());
    assert_eq!(data.content_text(), "a%20b");
    assert_eq!(data.content_as_bytes().unwrap(), b"a b");
    assert_eq!(data.content_as_string(None).unwrap(), "a b");

    let data = UriData::parse("data:,x").unwrap();
    assert_eq!(data.mime_type(), "text/plain");
    assert_eq!(data.charset(), "US-ASCII");
    assert!(data.parameters().is_empty());

    let data = UriData::parse("data:image/png;a=b;c=d;base64,AAEC").unwrap();
    assert!(data.is_base64());
    assert_eq!(data.mime_type(), "image/png");
    assert_eq!(data.parameters().len(), 2);
    assert_eq!(data.parameters()["c"], "d");
    assert_eq!(data.content_as_bytes().unwrap(), [0, 1, 2]);
}

#[test]
fn parse_normalizes() {
    let data = UriData::parse("DATA:text/html;base64,aGk").unwrap();
    assert_eq!(data.as_str(), "data:text/html;base64,aGk=");
    assert_eq!(data.content_as_bytes().unwrap(), b"hi");

    let data = UriData::parse("data:,a b<>").unwrap();
    assert_eq!(data.as_str(), "data:,a%20b%3C%3E");
    assert_eq!(data.content_as_string(None).unwrap(), "a b<>");

    let data = UriData::parse("data:;base64,_-8").unwrap();
    assert_eq!(data.content_text(), "/+8=");
}

#[test]
fn parse_normalizes_header() {
    let data = UriData::parse("data:text/h tml;a=b{c,x").unwrap();
    assert_eq!(data.as_str(), "data:text/h%20tml;a=b%7Bc,x");
    assert_eq!(data.mime_type(), "text/h tml");
    assert_eq!(data.parameters()["a"], "b{c");
    assert_eq!(data.content_text(), "x");

    let uri = Uri::parse("data:text/h tml;a=b{c,x").unwrap();
    assert_eq!(uri.as_str(), data.as_str());
    assert_eq!(uri.data().unwrap(), data);

    let built = UriData::from_string("x", Some("a/b{c"), None, &[], false).unwrap();
    assert_eq!(built.as_str(), "data:a/b%7Bc,x");
    assert_eq!(UriData::parse(built.as_str()).unwrap(), built);
}

#[test]
fn parse_as_uri() {
    let uri = Uri::parse("data:text/html;base64,aGk#x").unwrap();
    let Uri::Data(data_uri) = &uri else {
        panic!("expected a data URI");
    };
    assert_eq!(uri.as_str(), "data:text/html;base64,aGk=#x");
    assert_eq!(uri.scheme(), "data");
    assert_eq!(uri.path(), "text/html;base64,aGk=");
    assert_eq!(uri.fragment(), Some("x"));
    assert!(!uri.has_authority());
    assert_eq!(data_uri.data().as_str(), "data:text/html;base64,aGk=");
    assert_eq!(uri.data().unwrap().content_as_bytes().unwrap(), b"hi");

    let uri = Uri::parse("data:,a?b=c").unwrap();
    assert_eq!(uri.path(), ",a");
    assert_eq!(uri.query(), Some("b=c"));
    assert_eq!(uri.data().unwrap().content_text(), "a?b=c");

    // Forced into the general form, a data URI is an ordinary URI.
    let uri = Uri::General(GeneralUri::parse("data:,a%20b").unwrap());
    assert_eq!(uri.data().unwrap().content_as_string(None).unwrap(), "a b");
    assert!(Uri::parse("http://h/").unwrap().data().is_none());
}

#[test]
fn parse_error() {
    let e = UriData::parse("http://x").unwrap_err();
    assert_eq!(e.kind(), ParseErrorKind::MissingDataPrefix);

    let e = UriData::parse("data:a/b;foo,x").unwrap_err();
    assert_eq!((e.kind(), e.index()), (ParseErrorKind::ExpectingEquals, 12));

    let e = UriData::parse("data:;base64,a").unwrap_err();
    assert_eq!(e.kind(), ParseErrorKind::InvalidBase64);

    let Error::Parse(e) = Uri::parse_range("<data:a/b/c,x>", 1, 13).unwrap_err() else {
        panic!("expected a parse error");
    };
    assert_eq!((e.kind(), e.index()), (ParseErrorKind::InvalidMimeType, 9));
    assert_eq!(e.input(), "<data:a/b/c,x>");
}

#[test]
fn from_string() {
    let data = UriData::from_string("a b", Some("text/html"), None, &[("x", "1")], false).unwrap();
    assert_eq!(data.as_str(), "data:text/html;x=1,a%20b");
    assert_eq!(data.parameters()["x"], "1");

    let data = UriData::from_string("hello", Some("TEXT/PLAIN"), None, &[], false).unwrap();
    assert_eq!(data.uri().as_str(), "data:,hello");

    let data = UriData::from_string("ü", None, Some(&Latin1), &[], false).unwrap();
    assert_eq!(data.as_str(), "data:;charset=iso-8859-1,%FC");
    assert_eq!(data.mime_type(), "text/plain");
    assert!(data.is_encoding(&Latin1));
    assert!(data.is_charset("ISO-8859-1"));
    assert!(data.is_charset("latin1"));
    assert_eq!(data.content_as_string(None).unwrap(), "ü");

    let data = UriData::from_string("hi", None, Some(&Utf8), &[], true).unwrap();
    assert_eq!(data.as_str(), "data:;charset=utf-8;base64,aGk=");
    assert!(data.is_base64());
    assert_eq!(data.content_as_string(None).unwrap(), "hi");

    let data = UriData::from_string("é", None, None, &[("charset", "utf-8")], false).unwrap();
    assert_eq!(data.as_str(), "data:;charset=utf-8,%C3%A9");
}

#[test]
fn from_bytes() {
    let data = UriData::from_bytes(&[0, 1, 2], None, &[], false).unwrap();
    assert_eq!(data.as_str(), "data:application/octet-stream;base64,AAEC");

    let data = UriData::from_bytes(&[0, b'a'], Some("x/y"), &[], true).unwrap();
    assert_eq!(data.as_str(), "data:x/y,%00a");
    assert_eq!(data.content_as_bytes().unwrap(), [0, b'a']);

    let uri = Uri::data_from_bytes(b"hi", None, &[], false).unwrap();
    assert_eq!(uri.as_str(), "data:application/octet-stream;base64,aGk=");
    let uri = Uri::data_from_string("hi", None, None, &[], false).unwrap();
    assert_eq!(uri.as_str(), "data:,hi");
}

#[test]
fn construction_error() {
    let e = UriData::from_string("x", Some("text"), None, &[], false).unwrap_err();
    assert_eq!(e.kind(), ArgumentErrorKind::InvalidMimeType);
    let e = UriData::from_bytes(b"x", Some("a/b/c"), &[], false).unwrap_err();
    assert_eq!(e.kind(), ArgumentErrorKind::InvalidMimeType);
    let e = UriData::from_string("x", None, None, &[("", "v")], false).unwrap_err();
    assert_eq!(e.kind(), ArgumentErrorKind::EmptyParameterName);
    let e = UriData::from_string("x", None, None, &[("k", "")], false).unwrap_err();
    assert_eq!(e.kind(), ArgumentErrorKind::EmptyParameterValue);
    let e = UriData::from_string("é", None, None, &[], false).unwrap_err();
    assert_eq!(e.kind(), ArgumentErrorKind::Unencodable);

    let kind = |s: &str| match UriData::from_uri(&GeneralUri::parse(s).unwrap()) {
        Err(Error::Argument(e)) => e.kind(),
        other => panic!("{s}: {other:?}"),
    };
    assert_eq!(kind("http://h/"), ArgumentErrorKind::NotDataScheme);
    assert_eq!(kind("data://h/,x"), ArgumentErrorKind::DataWithAuthority);
    assert_eq!(kind("data:,x#f"), ArgumentErrorKind::DataWithFragment);
}

#[test]
fn unknown_charset() {
    let data = UriData::parse("data:;charset=x-nothing,abc").unwrap();
    match data.content_as_string(None) {
        Err(Error::Unsupported(e)) => assert_eq!(e.kind(), UnsupportedErrorKind::UnknownCharset),
        other => panic!("{other:?}"),
    }
    assert_eq!(data.content_as_string(Some(&Utf8)).unwrap(), "abc");
}

#[test]
fn mime_and_charset_checks() {
    let data = UriData::parse("data:,x").unwrap();
    assert!(data.is_mime_type("TEXT/PLAIN"));
    assert!(data.is_mime_type(""));
    assert!(data.is_charset("us-ascii"));
    assert!(data.is_charset("ascii"));
    assert!(!data.is_charset("utf-8"));

    let data = UriData::parse("data:Text/HTML;charset=UTF-8,x").unwrap();
    assert!(data.is_mime_type("text/html"));
    assert!(!data.is_mime_type("text/plain"));
    assert!(data.is_charset("utf8"));
    assert!(data.is_encoding(&Utf8));
    assert!(!data.is_encoding(&Latin1));
}
