use urikit::{
    encoding::{self, encoding_for_name, Ascii, Charset, Encoding, Latin1, Utf8},
    pct_enc::{
        decode_component, decode_full, decode_query_component, decode_query_component_with,
        encode_component, encode_full, encode_query_component, encode_query_component_with,
    },
    split_query_string, split_query_string_all, split_query_string_with, ArgumentErrorKind,
    ParseErrorKind,
};

#[test]
fn component() {
    assert_eq!(encode_component("a b/c?d=e&f"), "a%20b%2Fc%3Fd%3De%26f");
    assert_eq!(encode_component("~!*'()"), "~!*'()");
    assert_eq!(encode_component("ü€"), "%C3%BC%E2%82%AC");
    assert_eq!(decode_component("a%20b%2Fc+d").unwrap(), "a b/c+d");
    assert_eq!(decode_component("%C3%BC").unwrap(), "ü");
}

#[test]
fn query_component() {
    assert_eq!(encode_query_component("a b&c=d"), "a+b%26c%3Dd");
    assert_eq!(decode_query_component("a+b%26c").unwrap(), "a b&c");

    assert_eq!(encode_query_component_with("ü", &Latin1).unwrap(), "%FC");
    assert_eq!(
        decode_query_component_with("%FC+x", &Latin1).unwrap(),
        "ü x"
    );
    let e = encode_query_component_with("€", &Latin1).unwrap_err();
    assert_eq!(e.kind(), ArgumentErrorKind::Unencodable);
}

#[test]
fn full() {
    assert_eq!(
        encode_full("http://x/a b?q=ü#f"),
        "http://x/a%20b?q=%C3%BC#f"
    );
    assert_eq!(decode_full("http://x/a%20b").unwrap(), "http://x/a b");
}

#[test]
fn decode_error() {
    let e = decode_component("ab%4").unwrap_err();
    assert_eq!((e.kind(), e.index()), (ParseErrorKind::TruncatedEscape, 2));
    let e = decode_component("%4x").unwrap_err();
    assert_eq!((e.kind(), e.index()), (ParseErrorKind::InvalidEscape, 0));
    let e = decode_component("%FF").unwrap_err();
    assert_eq!(e.kind(), ParseErrorKind::InvalidEncodedBytes);
}

#[test]
fn encodings() {
    assert_eq!(Utf8.encode("é").unwrap().as_ref(), b"\xc3\xa9");
    assert_eq!(Latin1.encode("é").unwrap().as_ref(), b"\xe9");
    assert_eq!(Latin1.decode(b"\xe9").unwrap(), "é");
    assert_eq!(Ascii.encode("abc").unwrap().as_ref(), b"abc");
    assert_eq!(
        Ascii.encode("é").unwrap_err().kind(),
        ArgumentErrorKind::Unencodable
    );
    assert_eq!(
        Ascii.decode(b"a\x80").unwrap_err().kind(),
        ParseErrorKind::InvalidEncodedBytes
    );

    assert_eq!(encoding_for_name("UTF-8").unwrap().name(), Utf8.name());
    assert_eq!(encoding_for_name("latin1").unwrap().name(), Latin1.name());
    assert_eq!(
        encoding_for_name(" US-ASCII ").unwrap().name(),
        Ascii.name()
    );
    let sjis = encoding_for_name("shift_jis").unwrap();
    assert_eq!(sjis, Charset::Whatwg(encoding_rs::SHIFT_JIS));
    assert_eq!(sjis.decode(b"\x82\xa0").unwrap(), "あ");
    assert_eq!(sjis.encode("あ").unwrap().as_ref(), b"\x82\xa0");
    assert_eq!(
        sjis.decode(b"\x82").unwrap_err().kind(),
        ParseErrorKind::InvalidEncodedBytes
    );
    assert_eq!(Charset::from(encoding_rs::UTF_8).name(), "UTF-8");
    assert!(encoding_for_name("no-such-charset").is_none());
}

#[test]
fn base64() {
    assert_eq!(encoding::encode_base64(b"hi!?"), "aGkhPw==");
    assert_eq!(encoding::decode_base64("aGkhPw==").unwrap(), b"hi!?");
    assert_eq!(encoding::decode_base64("aGkhPw").unwrap(), b"hi!?");
    assert_eq!(encoding::decode_base64("aGkhPw%3D%3D").unwrap(), b"hi!?");

    assert_eq!(encoding::normalize_base64("_-8=").unwrap(), "/+8=");
    assert_eq!(encoding::normalize_base64("YQ").unwrap(), "YQ==");
    assert_eq!(encoding::normalize_base64("YWJj").unwrap(), "YWJj");

    let e = encoding::normalize_base64("YQ=a").unwrap_err();
    assert_eq!((e.kind(), e.index()), (ParseErrorKind::InvalidBase64, 3));
    let e = encoding::normalize_base64("Y").unwrap_err();
    assert_eq!(e.kind(), ParseErrorKind::InvalidBase64);
    let e = encoding::normalize_base64("YQ=").unwrap_err();
    assert_eq!((e.kind(), e.index()), (ParseErrorKind::InvalidBase64, 2));
    let e = encoding::normalize_base64("a b").unwrap_err();
    assert_eq!((e.kind(), e.index()), (ParseErrorKind::InvalidBase64, 1));
}

#[test]
fn split_query() {
    let map = split_query_string("a=1&b=x+y&a=2&c&=z&&d=%26").unwrap();
    assert_eq!(map["a"], "1");
    assert_eq!(map["b"], "x y");
    assert_eq!(map["c"], "");
    assert_eq!(map["d"], "&");
    assert!(!map.contains_key(""));

    let all = split_query_string_all("a=1&a=2&b").unwrap();
    assert_eq!(all["a"], ["1", "2"]);
    assert_eq!(all["b"], [""]);

    let map = split_query_string_with("k=%FC", &Latin1).unwrap();
    assert_eq!(map["k"], "ü");

    assert!(split_query_string("a=%zz").is_err());
}
