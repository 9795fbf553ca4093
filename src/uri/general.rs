use super::{Caches, UriLike};
use crate::{data::UriData, error::ParseError, parse};
use std::collections::BTreeMap;

/// Normalized components from which a [`GeneralUri`] is assembled.
#[derive(Clone, Debug, Default)]
pub(crate) struct Components {
    pub(crate) scheme: String,
    pub(crate) user_info: String,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
}

/// A URI with separately stored, normalized components.
///
/// This is the representation for anything that is not already in normal
/// form when parsed, and for every URI that is built or resolved through
/// the general algorithms. The serialized form is computed once, when the
/// value is created.
#[derive(Clone)]
pub struct GeneralUri {
    parts: Components,
    text: String,
    authority: Option<(usize, usize)>,
    caches: Caches,
}

impl GeneralUri {
    /// Parses a URI reference into the general representation, even when
    /// it is simple enough to be kept as a [`SimpleUri`](super::SimpleUri).
    ///
    /// A `data:` URI is parsed as an ordinary URI with scheme `data`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not a valid URI reference.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        parse::parse_general(s, 0, s.len())
    }

    /// Assembles a URI from components that are already normalized.
    ///
    /// A `file` URI always gets an authority, which may be empty, and a
    /// non-empty path. A path starting with `//` also gets an authority, as
    /// it would otherwise read back as one.
    pub(crate) fn from_components(mut parts: Components) -> Self {
        if parts.scheme == "file" {
            parts.host.get_or_insert_with(String::new);
            if parts.path.is_empty() {
                parts.path.push('/');
            }
        } else if parts.host.is_none() && parts.path.starts_with("//") {
            parts.host = Some(String::new());
        }

        let mut text = String::new();
        if !parts.scheme.is_empty() {
            text.push_str(&parts.scheme);
            text.push(':');
        }
        let mut authority = None;
        if let Some(host) = &parts.host {
            text.push_str("//");
            let start = text.len();
            if !parts.user_info.is_empty() {
                text.push_str(&parts.user_info);
                text.push('@');
            }
            text.push_str(host);
            if let Some(port) = parts.port {
                text.push(':');
                text.push_str(&port.to_string());
            }
            authority = Some((start, text.len()));
        }
        text.push_str(&parts.path);
        if let Some(query) = &parts.query {
            text.push('?');
            text.push_str(query);
        }
        if let Some(fragment) = &parts.fragment {
            text.push('#');
            text.push_str(fragment);
        }

        Self {
            parts,
            text,
            authority,
            caches: Caches::default(),
        }
    }

    /// Returns this URI with the path replaced.
    pub(crate) fn with_path(self, path: String) -> Self {
        let mut parts = self.parts;
        parts.path = path;
        Self::from_components(parts)
    }

    /// Consumes this URI and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns this URI without its fragment.
    #[must_use]
    pub fn remove_fragment(&self) -> Self {
        if self.parts.fragment.is_none() {
            return self.clone();
        }
        let mut parts = self.parts.clone();
        parts.fragment = None;
        Self::from_components(parts)
    }
}

impl UriLike for GeneralUri {
    fn as_str(&self) -> &str {
        &self.text
    }

    fn scheme(&self) -> &str {
        &self.parts.scheme
    }

    fn user_info(&self) -> &str {
        &self.parts.user_info
    }

    fn host(&self) -> Option<&str> {
        self.parts.host.as_deref()
    }

    fn explicit_port(&self) -> Option<u16> {
        self.parts.port
    }

    fn path(&self) -> &str {
        &self.parts.path
    }

    fn query(&self) -> Option<&str> {
        self.parts.query.as_deref()
    }

    fn fragment(&self) -> Option<&str> {
        self.parts.fragment.as_deref()
    }

    fn authority(&self) -> Option<&str> {
        self.authority.map(|(start, end)| &self.text[start..end])
    }

    fn path_segments(&self) -> &[String] {
        self.caches.path_segments(self.path())
    }

    fn query_parameters(&self) -> &BTreeMap<String, String> {
        self.caches.query_parameters(self.query())
    }

    fn query_parameters_all(&self) -> &BTreeMap<String, Vec<String>> {
        self.caches.query_parameters_all(self.query())
    }
}

impl_common!(GeneralUri, "GeneralUri");

/// A `data:` URI together with its decoded [`UriData`].
///
/// The URI may carry a fragment. The [`UriData`] always describes the part
/// before it.
#[derive(Clone)]
pub struct DataUri {
    uri: GeneralUri,
    data: UriData,
}

impl DataUri {
    pub(crate) fn new(uri: GeneralUri, data: UriData) -> Self {
        Self { uri, data }
    }

    /// Returns the data URI content.
    #[must_use]
    pub fn data(&self) -> &UriData {
        &self.data
    }

    /// Returns this URI without its fragment.
    #[must_use]
    pub fn remove_fragment(&self) -> Self {
        Self {
            uri: self.uri.remove_fragment(),
            data: self.data.clone(),
        }
    }

    /// Returns the general form of this URI.
    #[must_use]
    pub fn to_general(&self) -> GeneralUri {
        self.uri.clone()
    }
}

impl UriLike for DataUri {
    fn as_str(&self) -> &str {
        self.uri.as_str()
    }

    fn scheme(&self) -> &str {
        self.uri.scheme()
    }

    fn user_info(&self) -> &str {
        ""
    }

    fn host(&self) -> Option<&str> {
        None
    }

    fn explicit_port(&self) -> Option<u16> {
        None
    }

    fn path(&self) -> &str {
        self.uri.path()
    }

    fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    fn fragment(&self) -> Option<&str> {
        self.uri.fragment()
    }

    fn authority(&self) -> Option<&str> {
        None
    }

    fn path_segments(&self) -> &[String] {
        self.uri.path_segments()
    }

    fn query_parameters(&self) -> &BTreeMap<String, String> {
        self.uri.query_parameters()
    }

    fn query_parameters_all(&self) -> &BTreeMap<String, Vec<String>> {
        self.uri.query_parameters_all()
    }
}

impl_common!(DataUri, "DataUri");
