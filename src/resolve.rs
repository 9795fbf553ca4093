//! Reference resolution.

use crate::{
    normalize::{self, remove_dot_segments},
    uri::{Components, GeneralUri, SimpleUri, Uri, UriLike},
};

/// Resolves `reference` against `base` as in RFC 3986, Section 5.2.
///
/// Unlike the RFC, the base need not be absolute. A base without a scheme
/// or an authority keeps leading `..` segments of the merged path, so that
/// `a/b` and `../c` resolve to `c` and `../x` and `../y` resolve to `../../y`.
pub(crate) fn resolve<B, R>(base: &B, reference: &R) -> GeneralUri
where
    B: UriLike + ?Sized,
    R: UriLike + ?Sized,
{
    let mut t = Components::default();

    if reference.has_scheme() {
        t.scheme = reference.scheme().to_owned();
        if reference.has_authority() {
            take_authority(&mut t, reference);
            t.port = reference.explicit_port();
        }
        t.path = remove_dot_segments(reference.path()).into_owned();
        t.query = reference.query().map(str::to_owned);
    } else {
        t.scheme = base.scheme().to_owned();
        if reference.has_authority() {
            take_authority(&mut t, reference);
            t.port = normalize::make_port(reference.explicit_port(), &t.scheme);
            t.path = remove_dot_segments(reference.path()).into_owned();
            t.query = reference.query().map(str::to_owned);
        } else {
            take_authority(&mut t, base);
            t.port = base.explicit_port();
            if reference.has_empty_path() {
                t.path = base.path().to_owned();
                t.query = reference.query().or(base.query()).map(str::to_owned);
            } else {
                t.path = merge(base, reference.path());
                t.query = reference.query().map(str::to_owned);
            }
        }
    }
    t.fragment = reference.fragment().map(str::to_owned);
    GeneralUri::from_components(t)
}

fn take_authority<U: UriLike + ?Sized>(t: &mut Components, from: &U) {
    t.user_info = from.user_info().to_owned();
    t.host = from.host().map(str::to_owned);
}

/// Computes the target path for a relative, non-empty reference path.
fn merge<B: UriLike + ?Sized>(base: &B, path: &str) -> String {
    if path.starts_with('/') {
        return remove_dot_segments(path).into_owned();
    }
    if base.has_empty_path() {
        return if base.has_authority() {
            remove_dot_segments(&format!("/{path}")).into_owned()
        } else if base.has_scheme() {
            remove_dot_segments(path).into_owned()
        } else {
            path.to_owned()
        };
    }
    let merged = merge_paths(base.path(), path);
    if base.has_scheme() || base.has_authority() || base.has_absolute_path() {
        remove_dot_segments(&merged).into_owned()
    } else {
        normalize::normalize_relative_path(&merged, false).into_owned()
    }
}

/// Replaces the last segment of `base` with `reference`.
///
/// Each leading `../` of the reference drops one more base segment, as long
/// as the dropped segment is not itself `.` or `..`. Whatever is left is up
/// to dot-segment removal.
pub(crate) fn merge_paths(base: &str, reference: &str) -> String {
    let mut back_count = 0;
    let mut ref_start = 0;
    while reference[ref_start..].starts_with("../") {
        ref_start += 3;
        back_count += 1;
    }

    let bytes = base.as_bytes();
    let mut base_end = base.rfind('/');
    while let (Some(end), true) = (base_end, back_count > 0) {
        if end == 0 {
            break;
        }
        let Some(new_end) = base[..end].rfind('/') else {
            break;
        };
        let delta = end - new_end;
        if (delta == 2 || delta == 3)
            && bytes[new_end + 1] == b'.'
            && (delta == 2 || bytes[new_end + 2] == b'.')
        {
            break;
        }
        base_end = Some(new_end);
        back_count -= 1;
    }

    let keep = base_end.map_or(0, |end| end + 1);
    let mut out = String::with_capacity(keep + reference.len());
    out.push_str(&base[..keep]);
    out.push_str(&reference[ref_start - 3 * back_count..]);
    out
}

/// Resolves one simple URI against another, splicing text where the result
/// is known to be simple and falling back to [`resolve`] otherwise.
pub(crate) fn resolve_simple(base: &SimpleUri, r: &SimpleUri) -> Uri {
    if r.has_scheme() {
        return Uri::Simple(r.clone());
    }

    if r.has_authority() {
        if !base.has_scheme() {
            return Uri::Simple(r.clone());
        }
        let stays_simple = match base.scheme() {
            "file" => !r.has_empty_path(),
            "http" => !r.is_port("80"),
            "https" => !r.is_port("443"),
            _ => true,
        };
        if !stays_simple {
            return Uri::General(resolve(base, r));
        }
        let delta = base.scheme_end() + 1;
        let text = format!("{}{}", &base.as_str()[..delta], r.as_str());
        return Uri::Simple(SimpleUri::new(
            text,
            base.scheme_end(),
            r.host_start() + delta,
            r.port_start() + delta,
            r.path_start() + delta,
            r.query_start() + delta,
            r.fragment_start() + delta,
        ));
    }

    if r.has_empty_path() {
        if r.has_query() {
            let text = format!("{}{}", &base.as_str()[..base.query_start()], r.as_str());
            let delta = base.query_start();
            return Uri::Simple(SimpleUri::new(
                text,
                base.scheme_end(),
                base.host_start(),
                base.port_start(),
                base.path_start(),
                r.query_start() + delta,
                r.fragment_start() + delta,
            ));
        }
        if r.has_fragment() {
            let text = format!("{}{}", &base.as_str()[..base.fragment_start()], r.as_str());
            let delta = base.fragment_start();
            return Uri::Simple(SimpleUri::new(
                text,
                base.scheme_end(),
                base.host_start(),
                base.port_start(),
                base.path_start(),
                base.query_start(),
                r.fragment_start() + delta,
            ));
        }
        return Uri::Simple(base.remove_fragment());
    }

    if r.has_absolute_path() {
        let delta = base.path_start();
        let text = format!("{}{}", &base.as_str()[..delta], r.as_str());
        return Uri::Simple(SimpleUri::new(
            text,
            base.scheme_end(),
            base.host_start(),
            base.port_start(),
            base.path_start(),
            r.query_start() + delta,
            r.fragment_start() + delta,
        ));
    }

    if base.has_empty_path() && base.has_authority() {
        // The reference is a relative path. Leading `../` segments fold into `/`.
        let mut ref_start = 0;
        while r.as_str()[ref_start..].starts_with("../") {
            ref_start += 3;
        }
        let text = format!(
            "{}/{}",
            &base.as_str()[..base.path_start()],
            &r.as_str()[ref_start..]
        );
        let delta = base.path_start() + 1;
        return Uri::Simple(SimpleUri::new(
            text,
            base.scheme_end(),
            base.host_start(),
            base.port_start(),
            base.path_start(),
            r.query_start() + delta - ref_start,
            r.fragment_start() + delta - ref_start,
        ));
    }

    Uri::General(resolve(base, r))
}
