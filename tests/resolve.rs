use urikit::{GeneralUri, Uri, UriLike};

trait Test {
    fn pass(&self, r: &str, expected: &str);
}

impl Test for str {
    /// Checks the result both as parsed and with both sides forced into
    /// the general representation, which bypasses the simple fast path.
    #[track_caller]
    fn pass(&self, r: &str, expected: &str) {
        let base = Uri::parse(self).unwrap();
        assert_eq!(base.resolve(r).unwrap(), expected);

        let general_base = Uri::General(GeneralUri::parse(self).unwrap());
        let general_ref = Uri::General(GeneralUri::parse(r).unwrap());
        assert_eq!(general_base.resolve_uri(&general_ref), expected);
    }
}

#[test]
fn resolve() {
    // Examples from Section 5.4 of RFC 3986.
    let base = "http://a/b/c/d;p?q";

    base.pass("g:h", "g:h");
    base.pass("g", "http://a/b/c/g");
    base.pass("./g", "http://a/b/c/g");
    base.pass("g/", "http://a/b/c/g/");
    base.pass("/g", "http://a/g");
    base.pass("//g", "http://g");
    base.pass("?y", "http://a/b/c/d;p?y");
    base.pass("g?y", "http://a/b/c/g?y");
    base.pass("#s", "http://a/b/c/d;p?q#s");
    base.pass("g#s", "http://a/b/c/g#s");
    base.pass("g?y#s", "http://a/b/c/g?y#s");
    base.pass(";x", "http://a/b/c/;x");
    base.pass("g;x", "http://a/b/c/g;x");
    base.pass("g;x?y#s", "http://a/b/c/g;x?y#s");
    base.pass("", "http://a/b/c/d;p?q");
    base.pass(".", "http://a/b/c/");
    base.pass("./", "http://a/b/c/");
    base.pass("..", "http://a/b/");
    base.pass("../", "http://a/b/");
    base.pass("../g", "http://a/b/g");
    base.pass("../..", "http://a/");
    base.pass("../../", "http://a/");
    base.pass("../../g", "http://a/g");

    // Abnormal examples.
    base.pass("../../../g", "http://a/g");
    base.pass("../../../../g", "http://a/g");

    base.pass("/./g", "http://a/g");
    base.pass("/../g", "http://a/g");
    base.pass("g.", "http://a/b/c/g.");
    base.pass(".g", "http://a/b/c/.g");
    base.pass("g..", "http://a/b/c/g..");
    base.pass("..g", "http://a/b/c/..g");

    base.pass("./../g", "http://a/b/g");
    base.pass("./g/.", "http://a/b/c/g/");
    base.pass("g/./h", "http://a/b/c/g/h");
    base.pass("g/../h", "http://a/b/c/h");
    base.pass("g;x=1/./y", "http://a/b/c/g;x=1/y");
    base.pass("g;x=1/../y", "http://a/b/c/y");

    base.pass("g?y/./x", "http://a/b/c/g?y/./x");
    base.pass("g?y/../x", "http://a/b/c/g?y/../x");
    base.pass("g#s/./x", "http://a/b/c/g#s/./x");
    base.pass("g#s/../x", "http://a/b/c/g#s/../x");

    base.pass("http:g", "http:g");
}

#[test]
fn resolve_edge_cases() {
    // Empty base path with an authority.
    "http://a".pass("g", "http://a/g");
    "http://a".pass("../g", "http://a/g");
    "http://a?q".pass("", "http://a?q");
    "http://a?q".pass("#f", "http://a?q#f");

    // Default ports go away when the scheme comes from the base.
    "http://a/b".pass("//g:80/x", "http://g/x");
    "https://a/b".pass("//g:443", "https://g");
    "http://a/b".pass("//g:443", "http://g:443");

    // File URIs keep a non-empty path.
    "file:///x/y".pass("//h", "file://h/");
    "file:///x/y".pass("z", "file:///x/z");
    "file:///x/y".pass("../../..", "file:///");

    // Non-hierarchical base.
    "s:p".pass("g", "s:g");
    "s:a/b".pass("../c", "s:/c");
    "s:p".pass("?q", "s:p?q");

    // Relative bases keep what they cannot resolve.
    "a/b".pass("../c", "c");
    "a/b".pass("../%20:x", "%20%3Ax");
    "a/b".pass("../,:x", ",%3Ax");
    "a/b".pass("./c:d", "a/c%3Ad");
    "../x".pass("../y", "../../y");
    "a".pass("b", "b");
    "/a/b".pass("../c", "/c");
    "//h/a".pass("b", "//h/b");
    "?q".pass("#f", "?q#f");
}

#[test]
fn fast_path_stays_simple() {
    let base = Uri::parse("http://a/b/c/d;p?q").unwrap();
    assert!(base.is_simple());
    for r in ["g:h", "//g", "?y", "#s", "", "/g?y#s"] {
        let uri = base.resolve(r).unwrap();
        assert!(uri.is_simple(), "{r}");
    }

    let base = Uri::parse("http://a").unwrap();
    let uri = base.resolve("../../g?y").unwrap();
    assert!(uri.is_simple());
    assert_eq!(uri, "http://a/g?y");
    assert_eq!(uri.path(), "/g");
    assert_eq!(uri.query(), Some("y"));
}

#[test]
fn resolve_error() {
    let base = Uri::parse("http://a/").unwrap();
    assert!(base.resolve(":x").is_err());
}

#[test]
fn normalize_path() {
    let uri = Uri::parse("http://h/a/b").unwrap();
    assert_eq!(uri.normalize_path(), uri);

    let uri = Uri::parse("x/../y").unwrap();
    assert_eq!(uri.normalize_path(), "y");
}
