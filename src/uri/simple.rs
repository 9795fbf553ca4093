use super::{Caches, Components, GeneralUri, UriLike};
use std::collections::BTreeMap;

/// A URI whose text is already in normal form.
///
/// Components are stored as offsets into the text and sliced on demand.
/// A simple URI never has user information, escapes, a backslash, a
/// default port or dot segments, and its scheme and host are lowercase.
///
/// The offsets satisfy
/// `scheme_end <= host_start <= port_start <= path_start <= query_start <= fragment_start <= len`,
/// where an absent scheme or authority is marked by a zero `scheme_end`
/// or `host_start`.
#[derive(Clone)]
pub struct SimpleUri {
    text: String,
    scheme_end: usize,
    host_start: usize,
    port_start: usize,
    path_start: usize,
    query_start: usize,
    fragment_start: usize,
    caches: Caches,
}

impl SimpleUri {
    pub(crate) fn new(
        text: String,
        scheme_end: usize,
        host_start: usize,
        port_start: usize,
        path_start: usize,
        query_start: usize,
        fragment_start: usize,
    ) -> Self {
        debug_assert!(
            port_start <= path_start
                && path_start <= query_start
                && query_start <= fragment_start
                && fragment_start <= text.len()
        );
        Self {
            text,
            scheme_end,
            host_start,
            port_start,
            path_start,
            query_start,
            fragment_start,
            caches: Caches::default(),
        }
    }

    pub(crate) fn scheme_end(&self) -> usize {
        self.scheme_end
    }

    pub(crate) fn host_start(&self) -> usize {
        self.host_start
    }

    pub(crate) fn port_start(&self) -> usize {
        self.port_start
    }

    pub(crate) fn path_start(&self) -> usize {
        self.path_start
    }

    pub(crate) fn query_start(&self) -> usize {
        self.query_start
    }

    pub(crate) fn fragment_start(&self) -> usize {
        self.fragment_start
    }

    /// Start of the authority, just after `//`.
    fn authority_start(&self) -> usize {
        if self.scheme_end > 0 {
            self.scheme_end + 3
        } else {
            2
        }
    }

    /// Checks whether the port is exactly `port`.
    pub(crate) fn is_port(&self, port: &str) -> bool {
        self.host_start > 0
            && self.port_start + 1 < self.path_start
            && &self.text[self.port_start + 1..self.path_start] == port
    }

    /// Consumes this URI and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns this URI without its fragment.
    #[must_use]
    pub fn remove_fragment(&self) -> Self {
        if self.fragment_start == self.text.len() {
            return self.clone();
        }
        Self::new(
            self.text[..self.fragment_start].to_owned(),
            self.scheme_end,
            self.host_start,
            self.port_start,
            self.path_start,
            self.query_start,
            self.fragment_start,
        )
    }

    /// Materializes the general form of this URI.
    #[must_use]
    pub fn to_general(&self) -> GeneralUri {
        GeneralUri::from_components(Components {
            scheme: self.scheme().to_owned(),
            user_info: self.user_info().to_owned(),
            host: self.host().map(str::to_owned),
            port: self.explicit_port(),
            path: self.path().to_owned(),
            query: self.query().map(str::to_owned),
            fragment: self.fragment().map(str::to_owned),
        })
    }
}

impl UriLike for SimpleUri {
    fn as_str(&self) -> &str {
        &self.text
    }

    fn scheme(&self) -> &str {
        &self.text[..self.scheme_end]
    }

    fn user_info(&self) -> &str {
        let start = self.authority_start();
        if self.host_start > start {
            &self.text[start..self.host_start - 1]
        } else {
            ""
        }
    }

    fn host(&self) -> Option<&str> {
        (self.host_start > 0).then(|| &self.text[self.host_start..self.port_start])
    }

    fn explicit_port(&self) -> Option<u16> {
        if self.host_start > 0 && self.port_start + 1 < self.path_start {
            self.text[self.port_start + 1..self.path_start].parse().ok()
        } else {
            None
        }
    }

    fn path(&self) -> &str {
        &self.text[self.path_start..self.query_start]
    }

    fn query(&self) -> Option<&str> {
        (self.query_start < self.fragment_start)
            .then(|| &self.text[self.query_start + 1..self.fragment_start])
    }

    fn fragment(&self) -> Option<&str> {
        (self.fragment_start < self.text.len()).then(|| &self.text[self.fragment_start + 1..])
    }

    fn authority(&self) -> Option<&str> {
        (self.host_start > 0).then(|| &self.text[self.authority_start()..self.path_start])
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

impl_common!(SimpleUri, "SimpleUri");
