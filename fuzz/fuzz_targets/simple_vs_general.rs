#![no_main]
use libfuzzer_sys::fuzz_target;
use urikit::{GeneralUri, Uri, UriLike};

fuzz_target!(|data: &str| {
    let Ok(u) = Uri::parse(data) else {
        // `data:` content has its own syntax on top of the generic one.
        let is_data = data
            .get(..5)
            .is_some_and(|p| p.eq_ignore_ascii_case("data:"));
        assert!(is_data || GeneralUri::parse(data).is_err());
        return;
    };
    let Uri::Simple(s) = u else {
        return;
    };

    let g = GeneralUri::parse(data).unwrap();
    assert_eq!(s.as_str(), g.as_str());
    assert_eq!(s.scheme(), g.scheme());
    assert_eq!(s.user_info(), g.user_info());
    assert_eq!(s.host(), g.host());
    assert_eq!(s.port(), g.port());
    assert_eq!(s.path(), g.path());
    assert_eq!(s.query(), g.query());
    assert_eq!(s.fragment(), g.fragment());
    assert_eq!(s.path_segments(), g.path_segments());
    assert_eq!(s.query_parameters_all(), g.query_parameters_all());
});
