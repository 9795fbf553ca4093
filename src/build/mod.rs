//! Module for building URIs from parts and replacing parts of a URI.

mod imp;

use imp::Parts;

use crate::{
    data::UriData,
    encoding::Encoding,
    error::{ArgumentError, Error},
    query::QueryValue,
    uri::Uri,
};

macro_rules! setters {
    () => {
        /// Sets the scheme. It is validated and lowercased.
        pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
            self.parts.scheme = Some(scheme.into());
            self
        }

        /// Sets the user info. Characters not allowed in it are percent-encoded.
        pub fn user_info(mut self, user_info: impl Into<String>) -> Self {
            self.parts.user_info = Some(user_info.into());
            self
        }

        /// Sets the host.
        ///
        /// An IPv6 address may be given with or without brackets. A
        /// reg-name is lowercased and percent-encoded as needed.
        pub fn host(mut self, host: impl Into<String>) -> Self {
            self.parts.host = Some(host.into());
            self
        }

        /// Sets the port. The default port of the scheme is left out.
        pub fn port(mut self, port: u16) -> Self {
            self.parts.port = Some(port);
            self
        }

        /// Sets the path, which may contain percent-encoded octets.
        ///
        /// Cannot be combined with [`path_segments`](Self::path_segments).
        pub fn path(mut self, path: impl Into<String>) -> Self {
            self.parts.path = Some(path.into());
            self
        }

        /// Sets the path from unencoded segments, which are joined with `/`.
        pub fn path_segments<I, S>(mut self, segments: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.parts.path_segments = Some(segments.into_iter().map(Into::into).collect());
            self
        }

        /// Sets the query, which may contain percent-encoded octets.
        ///
        /// Cannot be combined with [`query_parameters`](Self::query_parameters).
        pub fn query(mut self, query: impl Into<String>) -> Self {
            self.parts.query = Some(query.into());
            self
        }

        /// Sets the query from unencoded parameters, in order.
        pub fn query_parameters<I, K, V>(mut self, parameters: I) -> Self
        where
            I: IntoIterator<Item = (K, V)>,
            K: Into<String>,
            V: Into<QueryValue>,
        {
            self.parts.query_parameters = Some(
                parameters
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            );
            self
        }

        /// Sets the fragment, which may contain percent-encoded octets.
        pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
            self.parts.fragment = Some(fragment.into());
            self
        }
    };
}

/// A builder for URIs.
///
/// This struct is created by [`Uri::builder`]. Every part is optional.
///
/// # Examples
///
/// ```
/// use urikit::{Uri, UriLike};
///
/// let uri = Uri::builder()
///     .scheme("HTTP")
///     .user_info("user")
///     .host("Example.com")
///     .port(80)
///     .path_segments(["over", "there now"])
///     .query_parameters([("name", "ferret")])
///     .fragment("nose")
///     .build()?;
///
/// assert_eq!(
///     uri.as_str(),
///     "http://user@example.com/over/there%20now?name=ferret#nose"
/// );
/// # Ok::<_, urikit::Error>(())
/// ```
///
/// A user info, a port or the `file` scheme implies an authority, empty if
/// no host is given. An empty query is left out.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct Builder {
    parts: Parts,
}

impl Builder {
    setters!();

    /// Builds the URI.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a part is malformed, or if both the path and path
    /// segments, or both the query and query parameters, are given.
    pub fn build(self) -> Result<Uri, Error> {
        self.parts.build()
    }
}

/// A builder for a URI with some parts replaced.
///
/// This struct is created by [`Uri::replace`]. Parts that are not set are
/// kept from the original URI.
///
/// # Examples
///
/// ```
/// use urikit::{Uri, UriLike};
///
/// let uri = Uri::parse("http://example.com:443/a?q#f")?;
/// let uri = uri.replace().scheme("https").query("").build()?;
/// assert_eq!(uri.as_str(), "https://example.com/a?#f");
/// # Ok::<_, urikit::Error>(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct Replace<'a> {
    base: &'a Uri,
    parts: Parts,
}

impl Replace<'_> {
    setters!();

    /// Builds the new URI.
    ///
    /// # Errors
    ///
    /// Returns `Err` under the same conditions as [`Builder::build`].
    pub fn build(self) -> Result<Uri, Error> {
        self.parts.replace_in(self.base)
    }
}

impl Uri {
    /// Creates a builder for a URI.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Creates a builder for a URI like this one with some parts replaced.
    ///
    /// A change of scheme drops a port that is the new scheme's default.
    pub fn replace(&self) -> Replace<'_> {
        Replace {
            base: self,
            parts: Parts::default(),
        }
    }

    /// Creates an `http` URI from an authority and an unencoded path.
    ///
    /// The authority may contain user info, a bracketed IPv6 address
    /// and a port. An empty authority gives a URI without one. The path is
    /// split at `/` and each segment percent-encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use urikit::{Uri, UriLike};
    ///
    /// let uri = Uri::http("example.org", "/a b/c")?;
    /// assert_eq!(uri.as_str(), "http://example.org/a%20b/c");
    /// # Ok::<_, urikit::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` if the authority is malformed. The error input is the
    /// authority.
    pub fn http(authority: &str, unencoded_path: &str) -> Result<Uri, Error> {
        imp::http_uri("http", authority, unencoded_path, None)
    }

    /// Creates an `https` URI, as [`Uri::http`] does.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the authority is malformed.
    pub fn https(authority: &str, unencoded_path: &str) -> Result<Uri, Error> {
        imp::http_uri("https", authority, unencoded_path, None)
    }

    /// Creates an `http` URI with a query built from parameters.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the authority is malformed.
    pub fn http_with_query<I, K, V>(
        authority: &str,
        unencoded_path: &str,
        query_parameters: I,
    ) -> Result<Uri, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        let params = collect_parameters(query_parameters);
        imp::http_uri("http", authority, unencoded_path, Some(params))
    }

    /// Creates an `https` URI with a query built from parameters.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the authority is malformed.
    pub fn https_with_query<I, K, V>(
        authority: &str,
        unencoded_path: &str,
        query_parameters: I,
    ) -> Result<Uri, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        let params = collect_parameters(query_parameters);
        imp::http_uri("https", authority, unencoded_path, Some(params))
    }

    /// Creates a `data:` URI holding text. See [`UriData::from_string`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the MIME type or a parameter is malformed, or the
    /// content cannot be encoded.
    pub fn data_from_string(
        content: &str,
        mime_type: Option<&str>,
        encoding: Option<&dyn Encoding>,
        parameters: &[(&str, &str)],
        base64: bool,
    ) -> Result<Uri, ArgumentError> {
        UriData::from_string(content, mime_type, encoding, parameters, base64).map(|d| d.uri())
    }

    /// Creates a `data:` URI holding bytes. See [`UriData::from_bytes`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the MIME type or a parameter is malformed.
    pub fn data_from_bytes(
        bytes: &[u8],
        mime_type: Option<&str>,
        parameters: &[(&str, &str)],
        percent_encoded: bool,
    ) -> Result<Uri, ArgumentError> {
        UriData::from_bytes(bytes, mime_type, parameters, percent_encoded).map(|d| d.uri())
    }
}

fn collect_parameters<I, K, V>(parameters: I) -> Vec<(String, QueryValue)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<QueryValue>,
{
    parameters
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
