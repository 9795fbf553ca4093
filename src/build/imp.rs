use crate::{
    error::{ArgumentError, ArgumentErrorKind, Error, ParseError, ParseErrorKind},
    normalize,
    query::{self, QueryValue},
    uri::{Components, GeneralUri, Uri, UriLike},
};

/// Components as given to a builder, not yet normalized.
#[derive(Clone, Debug, Default)]
pub(crate) struct Parts {
    pub(crate) scheme: Option<String>,
    pub(crate) user_info: Option<String>,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) path: Option<String>,
    pub(crate) path_segments: Option<Vec<String>>,
    pub(crate) query: Option<String>,
    pub(crate) query_parameters: Option<Vec<(String, QueryValue)>>,
    pub(crate) fragment: Option<String>,
}

fn whole<F, T>(s: &str, f: F) -> Result<T, ParseError>
where
    F: FnOnce(&str, usize, usize) -> Result<T, ParseError>,
{
    f(s, 0, s.len())
}

fn make_host(host: &str) -> Result<String, ParseError> {
    normalize::make_host(host, 0, host.len(), false)
}

impl Parts {
    fn path_given(&self) -> bool {
        self.path.is_some() || self.path_segments.is_some()
    }

    fn query_given(&self) -> bool {
        self.query.is_some() || self.query_parameters.is_some()
    }

    fn take_path(&mut self, scheme: &str, has_authority: bool) -> Result<String, Error> {
        match (self.path.take(), self.path_segments.take()) {
            (Some(_), Some(_)) => {
                let e = ArgumentError::new(ArgumentErrorKind::PathAndSegments, "");
                Err(e.into())
            }
            (Some(path), None) => {
                let end = path.len();
                Ok(normalize::make_path(&path, 0, end, scheme, has_authority)?)
            }
            (None, Some(segments)) => Ok(normalize::make_path_from_segments(
                &segments,
                scheme,
                has_authority,
            )),
            (None, None) => Ok(normalize::empty_path(scheme)),
        }
    }

    fn take_query(&mut self) -> Result<Option<String>, Error> {
        match (self.query.take(), self.query_parameters.take()) {
            (Some(_), Some(_)) => {
                let e = ArgumentError::new(ArgumentErrorKind::QueryAndParameters, "");
                Err(e.into())
            }
            (Some(q), None) => Ok(Some(whole(&q, normalize::make_query)?)),
            (None, Some(params)) => Ok(Some(query::make_query_from_parameters(&params))),
            (None, None) => Ok(None),
        }
    }

    /// Assembles a URI from scratch.
    pub(crate) fn build(mut self) -> Result<Uri, Error> {
        let scheme = match &self.scheme {
            Some(s) => whole(s, normalize::make_scheme)?,
            None => String::new(),
        };
        let user_info = match &self.user_info {
            Some(u) => whole(u, normalize::make_user_info)?,
            None => String::new(),
        };
        let mut host = self.host.as_deref().map(make_host).transpose()?;
        let port = normalize::make_port(self.port, &scheme);
        let query = self.take_query()?.filter(|q| !q.is_empty());
        let fragment = match &self.fragment {
            Some(f) => Some(whole(f, normalize::make_fragment)?),
            None => None,
        };

        if host.is_none() && (!user_info.is_empty() || port.is_some() || scheme == "file") {
            host = Some(String::new());
        }
        let path = self.take_path(&scheme, host.is_some())?;

        Ok(Uri::General(GeneralUri::from_components(Components {
            scheme,
            user_info,
            host,
            port,
            path,
            query,
            fragment,
        })))
    }

    /// Assembles a URI from `base` with the given parts replaced.
    pub(crate) fn replace_in(mut self, base: &Uri) -> Result<Uri, Error> {
        let (scheme, scheme_changed) = match &self.scheme {
            Some(s) => {
                let s = whole(s, normalize::make_scheme)?;
                let changed = s != base.scheme();
                (s, changed)
            }
            None => (base.scheme().to_owned(), false),
        };
        let is_file = scheme == "file";

        let user_info = match &self.user_info {
            Some(u) => whole(u, normalize::make_user_info)?,
            None => base.user_info().to_owned(),
        };
        let port = match self.port {
            Some(p) => normalize::make_port(Some(p), &scheme),
            None if scheme_changed => normalize::make_port(base.explicit_port(), &scheme),
            None => base.explicit_port(),
        };
        let host = match self.host.as_deref() {
            Some(h) => Some(make_host(h)?),
            None if base.has_authority() => base.host().map(str::to_owned),
            None if !user_info.is_empty() || port.is_some() || is_file => Some(String::new()),
            None => None,
        };

        let path = if self.path_given() {
            self.take_path(&scheme, host.is_some())?
        } else {
            let mut path = base.path().to_owned();
            if (is_file || (host.is_some() && !path.is_empty())) && !path.starts_with('/') {
                path.insert(0, '/');
            }
            path
        };
        let query = if self.query_given() {
            self.take_query()?
        } else {
            base.query().map(str::to_owned)
        };
        let fragment = match &self.fragment {
            Some(f) => Some(whole(f, normalize::make_fragment)?),
            None => base.fragment().map(str::to_owned),
        };

        Ok(Uri::General(GeneralUri::from_components(Components {
            scheme,
            user_info,
            host,
            port,
            path,
            query,
            fragment,
        })))
    }
}

/// Splits an `http` authority into user info, host and port.
///
/// The host is validated and normalized here, so that errors point into the
/// authority.
fn split_authority(authority: &str) -> Result<(Option<&str>, String, Option<u16>), ParseError> {
    let bytes = authority.as_bytes();
    let (user_info, host_start) = match authority.find('@') {
        Some(i) => (Some(&authority[..i]), i + 1),
        None => (None, 0),
    };

    let mut host_end = host_start;
    if bytes.get(host_start) == Some(&b'[') {
        let Some(close) = authority[host_start..].find(']') else {
            return Err(ParseError::new(
                ParseErrorKind::MissingBracket,
                authority,
                host_start,
            ));
        };
        host_end = host_start + close + 1;
        if host_end < bytes.len() && bytes[host_end] != b':' {
            return Err(ParseError::new(
                ParseErrorKind::InvalidAuthorityEnd,
                authority,
                host_end,
            ));
        }
    }

    let mut port = None;
    while host_end < bytes.len() {
        if bytes[host_end] == b':' {
            if host_end + 1 < bytes.len() {
                port = Some(normalize::parse_port(authority, host_end + 1, bytes.len())?);
            }
            break;
        }
        host_end += 1;
    }
    let host = normalize::make_host(authority, host_start, host_end, false)?;
    Ok((user_info, host, port))
}

/// Builds an `http` or `https` URI from an authority and an unencoded path.
pub(crate) fn http_uri(
    scheme: &str,
    authority: &str,
    unencoded_path: &str,
    query_parameters: Option<Vec<(String, QueryValue)>>,
) -> Result<Uri, Error> {
    let mut parts = Parts {
        scheme: Some(scheme.into()),
        path_segments: Some(unencoded_path.split('/').map(str::to_owned).collect()),
        query_parameters,
        ..Parts::default()
    };
    if !authority.is_empty() {
        let (user_info, host, port) = split_authority(authority)?;
        parts.user_info = user_info.map(str::to_owned);
        parts.host = Some(host);
        parts.port = port;
    }
    parts.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_split() {
        let (u, h, p) = split_authority("user@Example.com:8080").unwrap();
        assert_eq!(
            (u, h.as_str(), p),
            (Some("user"), "example.com", Some(8080))
        );

        let (u, h, p) = split_authority("[::1%25eth0]:").unwrap();
        assert_eq!((u, h.as_str(), p), (None, "[::1%25eth0]", None));

        let e = split_authority("a@[::1").unwrap_err();
        assert_eq!((e.kind(), e.index()), (ParseErrorKind::MissingBracket, 2));

        let e = split_authority("[::1]x").unwrap_err();
        assert_eq!(
            (e.kind(), e.index()),
            (ParseErrorKind::InvalidAuthorityEnd, 5)
        );

        let e = split_authority("h:port").unwrap_err();
        assert_eq!((e.kind(), e.index()), (ParseErrorKind::InvalidPort, 2));
    }
}
