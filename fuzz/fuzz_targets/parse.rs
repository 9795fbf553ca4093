#![no_main]
use libfuzzer_sys::fuzz_target;
use urikit::{Uri, UriLike};

fuzz_target!(|data: &str| {
    let Ok(u1) = Uri::parse(data) else {
        return;
    };

    // A parsed URI is normalized, so parsing its text gives it back.
    let u2 = Uri::parse(u1.as_str()).unwrap();
    assert_eq!(u1.as_str(), u2.as_str());
    assert_eq!(u1.scheme(), u2.scheme());
    assert_eq!(u1.authority(), u2.authority());
    assert_eq!(u1.user_info(), u2.user_info());
    assert_eq!(u1.host(), u2.host());
    assert_eq!(u1.port(), u2.port());
    assert_eq!(u1.path(), u2.path());
    assert_eq!(u1.query(), u2.query());
    assert_eq!(u1.fragment(), u2.fragment());

    let mut buf = String::with_capacity(u1.as_str().len());
    if u1.has_scheme() {
        buf.push_str(u1.scheme());
        buf.push(':');
    }
    if let Some(a) = u1.authority() {
        buf.push_str("//");
        buf.push_str(a);
    }
    buf.push_str(u1.path());
    if let Some(q) = u1.query() {
        buf.push('?');
        buf.push_str(q);
    }
    if let Some(f) = u1.fragment() {
        buf.push('#');
        buf.push_str(f);
    }
    assert_eq!(u1.as_str(), buf);

    assert_eq!(u1.normalize_path(), u1);
});
