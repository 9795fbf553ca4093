//! Error types.
//!
//! Every fallible operation returns the narrowest of these types that can
//! actually occur. [`Error`] unifies them for operations, such as building a
//! URI from parts, that can fail in more than one way.

use std::fmt;

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The scheme is empty, as in `":foo"`.
    ///
    /// The error index points to the colon.
    EmptyScheme,
    /// The scheme does not start with an ASCII letter.
    SchemeStart,
    /// The scheme contains a character other than letters, digits, `+`, `-` or `.`.
    SchemeChar,
    /// A character that is not allowed in the component.
    UnexpectedChar,
    /// An IP literal host is missing its closing `]`.
    ///
    /// The error index points to the opening `[`.
    MissingBracket,
    /// The port is not a decimal number in the range `0..=65535`.
    InvalidPort,
    /// The authority continues after the closing `]` of an IP literal with
    /// something other than a port.
    InvalidAuthorityEnd,
    /// A `%` that is not followed by two hexadecimal digits.
    InvalidEscape,
    /// A `%` too close to the end of the input to hold two hexadecimal digits.
    TruncatedEscape,
    /// A non-ASCII character inside text that should be percent-encoded.
    NonAsciiInEncoded,
    /// Decoded bytes are not valid for the requested text encoding.
    InvalidEncodedBytes,
    /// An IPv4 part contains a non-digit character.
    Ipv4InvalidChar,
    /// An IPv4 address with other than four parts.
    Ipv4PartCount,
    /// An IPv4 part outside `0..=255`, or empty.
    Ipv4PartRange,
    /// An IPv6 address shorter than two characters.
    Ipv6TooShort,
    /// An IPv6 address starting with a single colon.
    Ipv6InvalidStartColon,
    /// An IPv6 address with more than one `::`.
    Ipv6MultipleWildcards,
    /// An IPv6 address with no parts.
    Ipv6TooFewParts,
    /// An IPv6 address ending with a single colon.
    Ipv6MissingLastPart,
    /// An IPv6 address with `::` and eight or more parts.
    Ipv6TooManyParts,
    /// An IPv6 address without `::` and other than eight parts.
    Ipv6WrongPartCount,
    /// An IPv6 part with more than four hexadecimal digits.
    Ipv6PartTooLong,
    /// An IPv6 part containing a non-hexadecimal character.
    Ipv6InvalidHexDigit,
    /// The MIME type of a data URI contains more than one `/`, or none.
    InvalidMimeType,
    /// A data URI parameter without `=` that is not the final `;base64,`.
    ExpectingEquals,
    /// Malformed base64 content in a data URI.
    InvalidBase64,
    /// Text parsed as a data URI does not start with `data:`.
    MissingDataPrefix,
}

impl ParseErrorKind {
    fn message(self) -> &'static str {
        match self {
            Self::EmptyScheme => "invalid empty scheme",
            Self::SchemeStart => "scheme not starting with alphabetic character",
            Self::SchemeChar => "illegal scheme character",
            Self::UnexpectedChar => "invalid character",
            Self::MissingBracket => "missing end `]` to match `[` in host",
            Self::InvalidPort => "invalid port",
            Self::InvalidAuthorityEnd => "invalid end of authority",
            Self::InvalidEscape => "invalid percent escape",
            Self::TruncatedEscape => "truncated percent escape",
            Self::NonAsciiInEncoded => "illegal percent encoding in URI",
            Self::InvalidEncodedBytes => "bytes are not valid in the requested encoding",
            Self::Ipv4InvalidChar => "illegal IPv4 address, invalid character",
            Self::Ipv4PartCount => {
                "illegal IPv4 address, IPv4 address should contain exactly 4 parts"
            }
            Self::Ipv4PartRange => "illegal IPv4 address, each part must be in the range 0..255",
            Self::Ipv6TooShort => "illegal IPv6 address, address is too short",
            Self::Ipv6InvalidStartColon => "illegal IPv6 address, invalid start colon",
            Self::Ipv6MultipleWildcards => {
                "illegal IPv6 address, only one wildcard `::` is allowed"
            }
            Self::Ipv6TooFewParts => "illegal IPv6 address, too few parts",
            Self::Ipv6MissingLastPart => "illegal IPv6 address, expected a part after last `:`",
            Self::Ipv6TooManyParts => {
                "illegal IPv6 address, an address with a wildcard must have less than 7 parts"
            }
            Self::Ipv6WrongPartCount => {
                "illegal IPv6 address, an address without a wildcard must contain exactly 8 parts"
            }
            Self::Ipv6PartTooLong => {
                "illegal IPv6 address, an IPv6 part can only contain a maximum of 4 hex digits"
            }
            Self::Ipv6InvalidHexDigit => "illegal IPv6 address, invalid hex digit",
            Self::InvalidMimeType => "invalid MIME type",
            Self::ExpectingEquals => "expecting '='",
            Self::InvalidBase64 => "invalid base64 data",
            Self::MissingDataPrefix => "does not start with 'data:'",
        }
    }
}

/// An error occurred when parsing or decoding URI text.
///
/// Carries the offending input and the byte index at which the problem was detected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    pub(crate) kind: ParseErrorKind,
    pub(crate) index: usize,
    pub(crate) input: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, input: &str, index: usize) -> Self {
        Self {
            kind,
            index,
            input: input.into(),
        }
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Returns the byte index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the human-readable message, without the index.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at index {}", self.kind.message(), self.index)
    }
}

impl std::error::Error for ParseError {}

/// Detailed cause of an [`ArgumentError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ArgumentErrorKind {
    /// Both a path and path segments were given.
    PathAndSegments,
    /// Both a query and query parameters were given.
    QueryAndParameters,
    /// A MIME type without exactly one `/`.
    InvalidMimeType,
    /// A data URI parameter with an empty name.
    EmptyParameterName,
    /// A data URI parameter with an empty value.
    EmptyParameterValue,
    /// A URI with a scheme other than `data` was given where a data URI is required.
    NotDataScheme,
    /// A data URI with an authority.
    DataWithAuthority,
    /// A data URI with a fragment.
    DataWithFragment,
    /// A Windows drive letter that is not an ASCII letter.
    IllegalDriveLetter,
    /// A Windows path with a drive letter that is not absolute.
    RelativeDriveLetterPath,
    /// A `\\?\` prefixed Windows path that is not absolute.
    RelativePrefixedPath,
    /// A character that is reserved in file paths.
    IllegalPathChar,
    /// Text containing a character the chosen encoding cannot represent.
    Unencodable,
    /// A range that is out of bounds or does not fall on character boundaries.
    InvalidRange,
}

impl ArgumentErrorKind {
    fn message(self) -> &'static str {
        match self {
            Self::PathAndSegments => "both path and pathSegments specified",
            Self::QueryAndParameters => "both query and queryParameters specified",
            Self::InvalidMimeType => "invalid MIME type",
            Self::EmptyParameterName => "parameter names must not be empty",
            Self::EmptyParameterValue => "parameter values must not be empty",
            Self::NotDataScheme => "scheme must be 'data'",
            Self::DataWithAuthority => "data URI must not have authority",
            Self::DataWithFragment => "data URI must not have a fragment part",
            Self::IllegalDriveLetter => "illegal drive letter",
            Self::RelativeDriveLetterPath => "Windows paths with drive letter must be absolute",
            Self::RelativePrefixedPath => r"Windows paths with \\?\ prefix must be absolute",
            Self::IllegalPathChar => "illegal character in path",
            Self::Unencodable => "text cannot be represented in the encoding",
            Self::InvalidRange => "invalid range",
        }
    }
}

/// An invalid combination or shape of arguments, detected at the call site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArgumentError {
    pub(crate) kind: ArgumentErrorKind,
    pub(crate) value: String,
}

impl ArgumentError {
    pub(crate) fn new(kind: ArgumentErrorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ArgumentErrorKind {
        self.kind
    }

    /// Returns the offending value, or an empty string if there is none to show.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.message())?;
        if !self.value.is_empty() {
            write!(f, ": {:?}", self.value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ArgumentError {}

/// Detailed cause of a [`StateError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum StateErrorKind {
    /// The origin of a URI without a scheme was requested.
    OriginWithoutScheme,
    /// The origin of a URI whose scheme is neither `http` nor `https` was requested.
    OriginUnsupportedScheme,
    /// The origin of an `http`/`https` URI with an empty host was requested.
    OriginEmptyHost,
}

/// An operation was requested that the URI's existing state does not support.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateError {
    pub(crate) kind: StateErrorKind,
    pub(crate) uri: String,
}

impl StateError {
    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> StateErrorKind {
        self.kind
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StateErrorKind::OriginWithoutScheme => {
                write!(f, "cannot use origin without a scheme: {}", self.uri)
            }
            StateErrorKind::OriginUnsupportedScheme => write!(
                f,
                "origin is only applicable to schemes http and https: {}",
                self.uri
            ),
            StateErrorKind::OriginEmptyHost => {
                write!(f, "URI should have a non-empty host name: {}", self.uri)
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Detailed cause of an [`UnsupportedError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum UnsupportedErrorKind {
    /// A file path was requested from a URI whose scheme is not `file`.
    NotFileScheme,
    /// A file path was requested from a URI with a query.
    FilePathWithQuery,
    /// A file path was requested from a URI with a fragment.
    FilePathWithFragment,
    /// A non-Windows file path was requested from a URI with a non-empty host.
    FilePathWithAuthority,
    /// A path segment contains a character reserved on the target platform.
    IllegalPathChar,
    /// A Windows drive letter that is not an ASCII letter.
    IllegalDriveLetter,
    /// A data URI names a charset that no known encoding matches.
    UnknownCharset,
}

/// An operation that is not meaningful for the shape of this value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsupportedError {
    pub(crate) kind: UnsupportedErrorKind,
    pub(crate) detail: String,
}

impl UnsupportedError {
    pub(crate) fn new(kind: UnsupportedErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> UnsupportedErrorKind {
        self.kind
    }
}

impl fmt::Display for UnsupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            UnsupportedErrorKind::NotFileScheme => {
                "cannot extract a file path from a URI with scheme"
            }
            UnsupportedErrorKind::FilePathWithQuery => {
                "cannot extract a file path from a URI with a query component"
            }
            UnsupportedErrorKind::FilePathWithFragment => {
                "cannot extract a file path from a URI with a fragment component"
            }
            UnsupportedErrorKind::FilePathWithAuthority => {
                "cannot extract a non-Windows file path from a file URI with an authority"
            }
            UnsupportedErrorKind::IllegalPathChar => "illegal character in path",
            UnsupportedErrorKind::IllegalDriveLetter => "illegal drive letter",
            UnsupportedErrorKind::UnknownCharset => "unknown charset",
        };
        f.write_str(msg)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for UnsupportedError {}

/// Any error produced by this crate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Malformed URI syntax or encoded text.
    Parse(ParseError),
    /// Invalid arguments.
    Argument(ArgumentError),
    /// An operation the current state does not support.
    State(StateError),
    /// An operation not meaningful for this value.
    Unsupported(UnsupportedError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => fmt::Display::fmt(e, f),
            Self::Argument(e) => fmt::Display::fmt(e, f),
            Self::State(e) => fmt::Display::fmt(e, f),
            Self::Unsupported(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Argument(e) => Some(e),
            Self::State(e) => Some(e),
            Self::Unsupported(e) => Some(e),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ident => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Error {
                #[inline]
                fn from(e: $ty) -> Self {
                    Self::$variant(e)
                }
            }
        )+
    };
}

impl_from! {
    ParseError => Parse,
    ArgumentError => Argument,
    StateError => State,
    UnsupportedError => Unsupported,
}
