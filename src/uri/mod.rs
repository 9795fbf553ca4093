//! The URI value and its representations.

use crate::{
    data::UriData,
    error::{ArgumentError, ArgumentErrorKind, Error, ParseError, StateError, StateErrorKind},
    normalize, parse, pct_enc, query, resolve,
};
use std::{
    borrow::Borrow,
    collections::BTreeMap,
    str::FromStr,
    sync::OnceLock,
};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Implements comparison, hashing and formatting by the serialized form.
macro_rules! impl_common {
    ($Ty:ty, $name:literal) => {
        impl ::std::cmp::PartialEq for $Ty {
            fn eq(&self, other: &Self) -> bool {
                self.as_str() == other.as_str()
            }
        }

        impl ::std::cmp::Eq for $Ty {}

        impl ::std::cmp::PartialEq<str> for $Ty {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl ::std::cmp::PartialEq<&str> for $Ty {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl ::std::hash::Hash for $Ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash(self.as_str(), state);
            }
        }

        impl ::std::cmp::PartialOrd for $Ty {
            fn partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering> {
                Some(::std::cmp::Ord::cmp(self, other))
            }
        }

        impl ::std::cmp::Ord for $Ty {
            fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                self.as_str().cmp(other.as_str())
            }
        }

        impl ::std::fmt::Debug for $Ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct($name)
                    .field("scheme", &self.scheme())
                    .field("user_info", &self.user_info())
                    .field("host", &self.host())
                    .field("port", &self.explicit_port())
                    .field("path", &self.path())
                    .field("query", &self.query())
                    .field("fragment", &self.fragment())
                    .finish()
            }
        }

        impl ::std::fmt::Display for $Ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(self.as_str(), f)
            }
        }

        impl ::std::convert::AsRef<str> for $Ty {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

mod general;
mod simple;

pub use general::{DataUri, GeneralUri};
pub(crate) use general::Components;
pub use simple::SimpleUri;

/// Read access to the components of a URI.
///
/// Implemented by [`Uri`] and by each of its representations. All
/// components are returned in their normalized, still-encoded form except
/// for [`path_segments`] and the query parameter maps, which are decoded.
///
/// [`path_segments`]: Self::path_segments
pub trait UriLike {
    /// Returns the serialized URI.
    fn as_str(&self) -> &str;

    /// Returns the lowercase scheme, or an empty string if there is none.
    fn scheme(&self) -> &str;

    /// Returns the user information, or an empty string if there is none.
    fn user_info(&self) -> &str;

    /// Returns the host, or `None` if there is no authority.
    ///
    /// An IPv6 host keeps its brackets.
    fn host(&self) -> Option<&str>;

    /// Returns the port written in the URI.
    ///
    /// A port equal to the default of the scheme is never stored, so this
    /// is `None` for `http://example.com:80/`.
    fn explicit_port(&self) -> Option<u16>;

    /// Returns the path, which may be empty.
    fn path(&self) -> &str;

    /// Returns the query, without its leading `?`.
    fn query(&self) -> Option<&str>;

    /// Returns the fragment, without its leading `#`.
    fn fragment(&self) -> Option<&str>;

    /// Returns the authority as written, without the leading `//`.
    fn authority(&self) -> Option<&str>;

    /// Returns the decoded path segments.
    ///
    /// A leading `/` does not produce an empty first segment, and an
    /// empty path has no segments at all. Computed once and cached.
    fn path_segments(&self) -> &[String];

    /// Returns the decoded query parameters, keeping the first value of
    /// each key. Computed once and cached.
    ///
    /// Undecodable escapes are kept as written rather than failing. Use
    /// [`split_query_string`](crate::split_query_string) for strict decoding.
    fn query_parameters(&self) -> &BTreeMap<String, String>;

    /// Returns every decoded value of each query key, in order.
    /// Computed once and cached.
    fn query_parameters_all(&self) -> &BTreeMap<String, Vec<String>>;

    /// Returns the port, falling back to the default port of the scheme.
    ///
    /// The default is 80 for `http`, 443 for `https` and 0 otherwise.
    fn port(&self) -> u16 {
        self.explicit_port()
            .unwrap_or_else(|| normalize::default_port(self.scheme()))
    }

    /// Checks whether there is a scheme.
    fn has_scheme(&self) -> bool {
        !self.scheme().is_empty()
    }

    /// Checks whether there is an authority, which may be empty.
    fn has_authority(&self) -> bool {
        self.host().is_some()
    }

    /// Checks whether a port is written in the URI.
    fn has_port(&self) -> bool {
        self.explicit_port().is_some()
    }

    /// Checks whether there is a query, which may be empty.
    fn has_query(&self) -> bool {
        self.query().is_some()
    }

    /// Checks whether there is a fragment, which may be empty.
    fn has_fragment(&self) -> bool {
        self.fragment().is_some()
    }

    /// Checks whether the path is empty.
    fn has_empty_path(&self) -> bool {
        self.path().is_empty()
    }

    /// Checks whether the path starts with `/`.
    fn has_absolute_path(&self) -> bool {
        self.path().starts_with('/')
    }

    /// Checks whether this is an absolute URI: one with a scheme and no fragment.
    fn is_absolute(&self) -> bool {
        self.has_scheme() && !self.has_fragment()
    }

    /// Checks whether the scheme equals `scheme`, ignoring ASCII case.
    ///
    /// An empty `scheme` matches a URI without a scheme.
    fn is_scheme(&self, scheme: &str) -> bool {
        self.scheme().eq_ignore_ascii_case(scheme)
    }

    /// Returns the web origin, `scheme://host[:port]`.
    ///
    /// # Errors
    ///
    /// Returns `Err` unless the scheme is `http` or `https` and the host is non-empty.
    fn origin(&self) -> Result<String, StateError> {
        let fail = |kind| {
            Err(StateError {
                kind,
                uri: self.as_str().to_owned(),
            })
        };
        let scheme = self.scheme();
        if scheme.is_empty() {
            return fail(StateErrorKind::OriginWithoutScheme);
        }
        if scheme != "http" && scheme != "https" {
            return fail(StateErrorKind::OriginUnsupportedScheme);
        }
        let host = match self.host() {
            Some(host) if !host.is_empty() => host,
            _ => return fail(StateErrorKind::OriginEmptyHost),
        };
        Ok(match self.explicit_port() {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        })
    }
}

/// Lazily computed decoded views shared by the representations.
#[derive(Clone, Debug, Default)]
pub(crate) struct Caches {
    path_segments: OnceLock<Vec<String>>,
    query_parameters: OnceLock<BTreeMap<String, String>>,
    query_parameters_all: OnceLock<BTreeMap<String, Vec<String>>>,
}

impl Caches {
    pub(crate) fn path_segments(&self, path: &str) -> &[String] {
        self.path_segments.get_or_init(|| {
            let path = path.strip_prefix('/').unwrap_or(path);
            if path.is_empty() {
                Vec::new()
            } else {
                path.split('/')
                    .map(|s| pct_enc::decode_lossy(s, false))
                    .collect()
            }
        })
    }

    pub(crate) fn query_parameters(&self, query: Option<&str>) -> &BTreeMap<String, String> {
        self.query_parameters
            .get_or_init(|| query.map(query::split_lossy).unwrap_or_default())
    }

    pub(crate) fn query_parameters_all(
        &self,
        query: Option<&str>,
    ) -> &BTreeMap<String, Vec<String>> {
        self.query_parameters_all
            .get_or_init(|| query.map(query::split_all_lossy).unwrap_or_default())
    }
}

/// A parsed URI or URI reference.
///
/// Parsing picks the cheapest representation that can hold the input:
///
/// - [`SimpleUri`] when the input is already in normal form, so that
///   components are offsets into the original text;
/// - [`DataUri`] for `data:` URIs, with the decoded [`UriData`] attached;
/// - [`GeneralUri`] for everything else, with normalized components.
///
/// The choice is invisible through [`UriLike`]: every representation of the
/// same URI reports the same components and the same serialized form.
/// Equality, ordering and hashing go by the serialized form.
///
/// # Examples
///
/// ```
/// use urikit::{Uri, UriLike};
///
/// let uri = Uri::parse("HTTP://Example.COM:80/a/./b/../c?q=1#f")?;
/// assert_eq!(uri.as_str(), "http://example.com/a/c?q=1#f");
/// assert_eq!(uri.host(), Some("example.com"));
/// assert_eq!(uri.port(), 80);
/// assert_eq!(uri.path_segments(), ["a", "c"]);
/// assert_eq!(uri.query_parameters()["q"], "1");
/// # Ok::<_, urikit::ParseError>(())
/// ```
#[derive(Clone)]
pub enum Uri {
    /// A URI kept as a view over its already-normal text.
    Simple(SimpleUri),
    /// A URI with separately stored, normalized components.
    General(GeneralUri),
    /// A `data:` URI.
    Data(DataUri),
}

macro_rules! delegate {
    ($self:ident, $u:ident => $e:expr) => {
        match $self {
            Uri::Simple($u) => $e,
            Uri::General($u) => $e,
            Uri::Data($u) => $e,
        }
    };
}

impl UriLike for Uri {
    fn as_str(&self) -> &str {
        delegate!(self, u => u.as_str())
    }

    fn scheme(&self) -> &str {
        delegate!(self, u => u.scheme())
    }

    fn user_info(&self) -> &str {
        delegate!(self, u => u.user_info())
    }

    fn host(&self) -> Option<&str> {
        delegate!(self, u => u.host())
    }

    fn explicit_port(&self) -> Option<u16> {
        delegate!(self, u => u.explicit_port())
    }

    fn path(&self) -> &str {
        delegate!(self, u => u.path())
    }

    fn query(&self) -> Option<&str> {
        delegate!(self, u => u.query())
    }

    fn fragment(&self) -> Option<&str> {
        delegate!(self, u => u.fragment())
    }

    fn authority(&self) -> Option<&str> {
        delegate!(self, u => u.authority())
    }

    fn path_segments(&self) -> &[String] {
        delegate!(self, u => u.path_segments())
    }

    fn query_parameters(&self) -> &BTreeMap<String, String> {
        delegate!(self, u => u.query_parameters())
    }

    fn query_parameters_all(&self) -> &BTreeMap<String, Vec<String>> {
        delegate!(self, u => u.query_parameters_all())
    }
}

impl_common!(Uri, "Uri");

impl Uri {
    /// Parses a URI reference.
    ///
    /// The result is normalized: the scheme and reg-name host are lowercased,
    /// escapes are canonical, dot segments are removed and a default port is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not a valid URI reference.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        parse::parse(s, 0, s.len())
    }

    /// Parses the URI reference in `s[start..end]`.
    ///
    /// Error indices are relative to the whole of `s`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentErrorKind::InvalidRange`] if the range is out of
    /// bounds or not on character boundaries, and a [`ParseError`] if the
    /// text in range is not a valid URI reference.
    pub fn parse_range(s: &str, start: usize, end: usize) -> Result<Self, Error> {
        if start > end || !s.is_char_boundary(start) || !s.is_char_boundary(end) {
            let range = format!("{start}..{end}");
            let e = ArgumentError::new(ArgumentErrorKind::InvalidRange, range);
            return Err(e.into());
        }
        Ok(parse::parse(s, start, end)?)
    }

    /// Parses a URI reference, returning `None` on failure.
    #[must_use]
    pub fn try_parse(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }

    /// Checks whether this URI is held as a [`SimpleUri`].
    #[must_use]
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    /// Parses `reference` and resolves it against this URI.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `reference` fails to parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use urikit::Uri;
    ///
    /// let base = Uri::parse("http://a/b/c/d;p?q")?;
    /// assert_eq!(base.resolve("../g")?, "http://a/b/g");
    /// assert_eq!(base.resolve("#s")?, "http://a/b/c/d;p?q#s");
    /// # Ok::<_, urikit::ParseError>(())
    /// ```
    pub fn resolve(&self, reference: &str) -> Result<Self, ParseError> {
        Ok(self.resolve_uri(&Self::parse(reference)?))
    }

    /// Resolves `reference` against this URI as in RFC 3986, Section 5.2.
    ///
    /// The base need not be absolute. When neither URI has a scheme or an
    /// authority, leading `..` segments of the merged path are kept.
    #[must_use]
    pub fn resolve_uri(&self, reference: &Uri) -> Uri {
        match (self, reference) {
            (Self::Simple(base), Self::Simple(r)) => resolve::resolve_simple(base, r),
            _ => Self::General(resolve::resolve(self, reference)),
        }
    }

    /// Returns this URI without its fragment.
    #[must_use]
    pub fn remove_fragment(&self) -> Self {
        match self {
            Self::Simple(u) => Self::Simple(u.remove_fragment()),
            Self::General(u) => Self::General(u.remove_fragment()),
            Self::Data(u) => Self::Data(u.remove_fragment()),
        }
    }

    /// Returns this URI with dot segments removed from its path.
    ///
    /// Parsing and building already normalize the path, so for those URIs
    /// this returns an equal URI.
    #[must_use]
    pub fn normalize_path(&self) -> Self {
        let path = self.path();
        let normalized =
            normalize::normalize_path(path.to_owned(), self.scheme(), self.has_authority());
        if normalized == path {
            return self.clone();
        }
        Self::General(self.to_general().with_path(normalized))
    }

    /// Returns the content of a `data:` URI.
    ///
    /// Returns `None` if the scheme is not `data` or the URI is not a valid data URI.
    #[must_use]
    pub fn data(&self) -> Option<UriData> {
        match self {
            Self::Data(u) => Some(u.data().clone()),
            _ if self.scheme() == "data" => UriData::from_uri(self).ok(),
            _ => None,
        }
    }

    /// Materializes the general form of this URI.
    #[must_use]
    pub fn to_general(&self) -> GeneralUri {
        match self {
            Self::Simple(u) => u.to_general(),
            Self::General(u) => u.clone(),
            Self::Data(u) => u.to_general(),
        }
    }

    /// Returns the host as an IP address, if it is an IP literal.
    ///
    /// A zone ID of an IPv6 host is ignored.
    #[cfg(feature = "net")]
    #[must_use]
    pub fn host_ip(&self) -> Option<std::net::IpAddr> {
        use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

        let host = self.host()?;
        match host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            Some(v6) => {
                let addr = v6.split('%').next().unwrap_or(v6);
                crate::ip::parse_ipv6_address(addr)
                    .ok()
                    .map(|b| IpAddr::V6(Ipv6Addr::from(b)))
            }
            None => crate::ip::parse_ipv4_address(host)
                .ok()
                .map(|b| IpAddr::V4(Ipv4Addr::from(b))),
        }
    }
}

impl From<SimpleUri> for Uri {
    fn from(u: SimpleUri) -> Self {
        Self::Simple(u)
    }
}

impl From<GeneralUri> for Uri {
    fn from(u: GeneralUri) -> Self {
        Self::General(u)
    }
}

impl From<DataUri> for Uri {
    fn from(u: DataUri) -> Self {
        Self::Data(u)
    }
}

impl From<Uri> for String {
    fn from(u: Uri) -> String {
        match u {
            Uri::Simple(u) => u.into_string(),
            u => u.as_str().to_owned(),
        }
    }
}

impl Borrow<str> for Uri {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Uri {
    type Err = ParseError;

    /// Equivalent to [`Uri::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = ParseError;

    /// Equivalent to [`Uri::parse`].
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Uri {
    type Error = ParseError;

    /// Equivalent to [`Uri::parse`].
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Uri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Uri::parse(&s)
            .map_err(|e| de::Error::custom(format_args!("failed to parse {s:?} as URI: {e}")))
    }
}
