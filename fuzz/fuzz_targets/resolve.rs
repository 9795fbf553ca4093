#![no_main]
use libfuzzer_sys::fuzz_target;
use urikit::{Uri, UriLike};

fuzz_target!(|data: (&str, &str)| {
    let (Ok(base), Ok(r)) = (Uri::parse(data.0), Uri::parse(data.1)) else {
        return;
    };

    let u1 = base.resolve_uri(&r);
    let u2 = Uri::parse(u1.as_str()).unwrap();

    assert_eq!(u1.scheme(), u2.scheme());
    assert_eq!(u1.authority(), u2.authority());
    assert_eq!(u1.host(), u2.host());
    assert_eq!(u1.port(), u2.port());
    assert_eq!(u1.path(), u2.path());
    assert_eq!(u1.query(), u2.query());
    assert_eq!(u1.fragment(), u2.fragment());

    // The fast path for simple URIs agrees with the general algorithm.
    let slow = Uri::General(base.to_general()).resolve_uri(&Uri::General(r.to_general()));
    assert_eq!(u1.as_str(), slow.as_str());
});
