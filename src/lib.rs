#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! A URI parser, normalizer and reference resolver.
//!
//! URIs are normalized as they are parsed: the scheme and host are
//! lowercased, percent-encodings are made uniform, dot segments are removed
//! and default ports are dropped. Most URIs met in practice are already in
//! normal form, and those are kept as a single string with the offsets of
//! their components ([`SimpleUri`]). Anything else is stored component by
//! component ([`GeneralUri`]). `data:` URIs carry their decoded MIME type,
//! parameters and content ([`DataUri`], [`UriData`]).
//!
//! See the documentation of [`Uri`] for more details.
//!
//! # Examples
//!
//! ```
//! use urikit::{Uri, UriLike};
//!
//! let base = Uri::parse("http://example.com/a/b/c")?;
//! assert!(base.is_simple());
//!
//! let uri = base.resolve("../d?x=1")?;
//! assert_eq!(uri.as_str(), "http://example.com/a/d?x=1");
//! assert_eq!(uri.query_parameters()["x"], "1");
//!
//! let uri = Uri::parse("HTTP://Example.COM:80/%7euser/./x")?;
//! assert_eq!(uri.as_str(), "http://example.com/~user/x");
//! # Ok::<_, urikit::ParseError>(())
//! ```
//!
//! # Feature flags
//!
//! All features are disabled by default.
//!
//! - `serde`: Enables [`serde`] support for URIs and data URIs, which
//!   serialize as strings.
//!
//! - `net`: Enables [`Uri::host_ip`], which reads an IP literal host as a
//!   [`std::net::IpAddr`].
//!
//! [`serde`]: https://docs.rs/serde

mod build;
mod data;
pub mod encoding;
pub mod error;
mod file;
mod ip;
mod normalize;
mod parse;
pub mod pct_enc;
pub mod query;
mod resolve;
mod scan;
pub mod table;
mod uri;

pub use build::{Builder, Replace};
pub use data::UriData;
pub use error::{
    ArgumentError, ArgumentErrorKind, Error, ParseError, ParseErrorKind, StateError,
    StateErrorKind, UnsupportedError, UnsupportedErrorKind,
};
pub use ip::{
    parse_ipv4_address, parse_ipv4_address_range, parse_ipv6_address, parse_ipv6_address_range,
};
pub use query::{
    split_query_string, split_query_string_all, split_query_string_all_with,
    split_query_string_with, QueryValue,
};
pub use uri::{DataUri, GeneralUri, SimpleUri, Uri, UriLike};
