//! Conversion between file paths and `file` URIs.

use crate::{
    error::{ArgumentError, ArgumentErrorKind, Error, UnsupportedError, UnsupportedErrorKind},
    normalize,
    uri::{Components, GeneralUri, Uri, UriLike},
};

const WINDOWS_RESERVED: &[char] = &['"', '*', '/', ':', '<', '>', '?', '\\', '|'];

fn use_windows(windows: Option<bool>) -> bool {
    windows.unwrap_or(cfg!(windows))
}

/// A path split into segments, with the authority it implies.
#[derive(Debug, Default)]
struct FilePath {
    absolute: bool,
    host: Option<String>,
    segments: Vec<String>,
}

impl FilePath {
    fn new(absolute: bool, path: &str, sep: char) -> Self {
        Self {
            absolute,
            host: None,
            segments: path.split(sep).map(str::to_owned).collect(),
        }
    }

    fn terminate(&mut self, slash_terminated: bool) {
        if slash_terminated && self.segments.last().is_some_and(|s| !s.is_empty()) {
            self.segments.push(String::new());
        }
    }

    fn into_uri(self) -> Result<Uri, Error> {
        let scheme = if self.absolute { "file" } else { "" };
        let host = self
            .host
            .map(|h| normalize::make_host(&h, 0, h.len(), false))
            .transpose()?;
        let path = normalize::make_path_from_segments(&self.segments, scheme, host.is_some());
        Ok(Uri::General(GeneralUri::from_components(Components {
            scheme: scheme.into(),
            host,
            path,
            ..Components::default()
        })))
    }
}

fn check_windows_segments(
    path: &str,
    segments: &[String],
    first: usize,
) -> Result<(), ArgumentError> {
    if segments.iter().skip(first).any(|s| s.contains(WINDOWS_RESERVED)) {
        return Err(ArgumentError::new(ArgumentErrorKind::IllegalPathChar, path));
    }
    Ok(())
}

fn posix_file_path(path: &str, slash_terminated: bool) -> FilePath {
    let mut fp = FilePath::new(path.starts_with('/'), path, '/');
    fp.terminate(slash_terminated);
    fp
}

fn windows_file_path(path: &str, slash_terminated: bool) -> Result<FilePath, ArgumentError> {
    let path = if let Some(rest) = path.strip_prefix(r"\\?\") {
        if let Some(unc) = rest.strip_prefix(r"UNC\") {
            format!(r"\\{unc}")
        } else {
            let b = rest.as_bytes();
            if b.len() < 3 || b[1] != b':' || b[2] != b'\\' {
                return Err(ArgumentError::new(
                    ArgumentErrorKind::RelativePrefixedPath,
                    rest,
                ));
            }
            rest.to_owned()
        }
    } else {
        path.replace('/', "\\")
    };
    let b = path.as_bytes();

    if b.len() > 1 && b[1] == b':' {
        if !b[0].is_ascii_alphabetic() {
            return Err(ArgumentError::new(
                ArgumentErrorKind::IllegalDriveLetter,
                path,
            ));
        }
        if b.len() == 2 || b[2] != b'\\' {
            return Err(ArgumentError::new(
                ArgumentErrorKind::RelativeDriveLetterPath,
                path,
            ));
        }
        let mut fp = FilePath::new(true, &path, '\\');
        fp.terminate(slash_terminated);
        check_windows_segments(&path, &fp.segments, 1)?;
        return Ok(fp);
    }

    if let Some(unc) = path.strip_prefix(r"\\") {
        // `\\server\share\...`
        let (host, rest) = unc.split_once('\\').unwrap_or((unc, ""));
        let mut fp = FilePath::new(true, rest, '\\');
        check_windows_segments(&path, &fp.segments, 0)?;
        fp.host = Some(host.to_owned());
        fp.terminate(slash_terminated);
        return Ok(fp);
    }

    let mut fp = FilePath::new(path.starts_with('\\'), &path, '\\');
    fp.terminate(slash_terminated);
    check_windows_segments(&path, &fp.segments, 0)?;
    Ok(fp)
}

fn file_uri(path: &str, windows: Option<bool>, slash_terminated: bool) -> Result<Uri, Error> {
    let fp = if use_windows(windows) {
        windows_file_path(path, slash_terminated)?
    } else {
        posix_file_path(path, slash_terminated)
    };
    fp.into_uri()
}

impl Uri {
    /// Creates a URI from a file path.
    ///
    /// An absolute path gives a `file` URI. A relative path gives a URI
    /// reference with only a path. Set `windows` to choose between Windows
    /// and POSIX path rules, or leave it `None` for those of the host.
    ///
    /// On Windows, `/` is taken as a separator too. Drive letters, UNC paths
    /// and the `\\?\` prefix are understood.
    ///
    /// # Examples
    ///
    /// ```
    /// use urikit::{Uri, UriLike};
    ///
    /// let uri = Uri::file("/home/me/a b.txt", Some(false))?;
    /// assert_eq!(uri.as_str(), "file:///home/me/a%20b.txt");
    ///
    /// let uri = Uri::file(r"C:\Users\me", Some(true))?;
    /// assert_eq!(uri.as_str(), "file:///C:/Users/me");
    ///
    /// let uri = Uri::file(r"\\server\share\f", Some(true))?;
    /// assert_eq!(uri.as_str(), "file://server/share/f");
    /// # Ok::<_, urikit::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` if a Windows path has an invalid drive letter, is a
    /// relative path with a drive letter or `\\?\` prefix, or contains a
    /// reserved character. A malformed UNC host gives a parse error.
    pub fn file(path: &str, windows: Option<bool>) -> Result<Uri, Error> {
        file_uri(path, windows, false)
    }

    /// Creates a URI from a directory path, as [`Uri::file`] does, making
    /// sure the path ends with `/`.
    ///
    /// # Errors
    ///
    /// Returns `Err` under the same conditions as [`Uri::file`].
    pub fn directory(path: &str, windows: Option<bool>) -> Result<Uri, Error> {
        file_uri(path, windows, true)
    }

    /// Returns the file path this URI denotes.
    ///
    /// Path segments are percent-decoded. Set `windows` as for [`Uri::file`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the scheme is neither empty nor `file`, the URI has
    /// a non-empty query or fragment, or a segment contains a character
    /// reserved on the target platform. A POSIX path cannot be extracted
    /// from a URI with a non-empty host.
    pub fn to_file_path(&self, windows: Option<bool>) -> Result<String, UnsupportedError> {
        let fail = |kind| Err(UnsupportedError::new(kind, self.as_str()));
        if self.has_scheme() && self.scheme() != "file" {
            return Err(UnsupportedError::new(
                UnsupportedErrorKind::NotFileScheme,
                self.scheme(),
            ));
        }
        if self.query().is_some_and(|q| !q.is_empty()) {
            return fail(UnsupportedErrorKind::FilePathWithQuery);
        }
        if self.fragment().is_some_and(|f| !f.is_empty()) {
            return fail(UnsupportedErrorKind::FilePathWithFragment);
        }
        if use_windows(windows) {
            self.windows_file_path()
        } else {
            self.posix_file_path()
        }
    }

    fn posix_file_path(&self) -> Result<String, UnsupportedError> {
        if self.host().is_some_and(|h| !h.is_empty()) {
            return Err(UnsupportedError::new(
                UnsupportedErrorKind::FilePathWithAuthority,
                self.as_str(),
            ));
        }
        let segments = self.path_segments();
        if segments.iter().any(|s| s.contains('/')) {
            return Err(UnsupportedError::new(
                UnsupportedErrorKind::IllegalPathChar,
                self.as_str(),
            ));
        }
        let mut out = String::new();
        if self.has_absolute_path() {
            out.push('/');
        }
        out.push_str(&segments.join("/"));
        Ok(out)
    }

    fn windows_file_path(&self) -> Result<String, UnsupportedError> {
        let segments = self.path_segments();
        let has_drive = segments
            .first()
            .is_some_and(|s| s.len() == 2 && s.as_bytes()[1] == b':');
        if has_drive && !segments[0].as_bytes()[0].is_ascii_alphabetic() {
            return Err(UnsupportedError::new(
                UnsupportedErrorKind::IllegalDriveLetter,
                self.as_str(),
            ));
        }
        let first = usize::from(has_drive);
        if segments.iter().skip(first).any(|s| s.contains(WINDOWS_RESERVED)) {
            return Err(UnsupportedError::new(
                UnsupportedErrorKind::IllegalPathChar,
                self.as_str(),
            ));
        }

        let mut out = String::new();
        if self.has_absolute_path() && !has_drive {
            out.push('\\');
        }
        if let Some(host) = self.host().filter(|h| !h.is_empty()) {
            out.push('\\');
            out.push_str(host);
            out.push('\\');
        }
        out.push_str(&segments.join("\\"));
        if has_drive && segments.len() == 1 {
            out.push('\\');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_prefixes() {
        let fp = windows_file_path(r"\\?\UNC\server\share\x", false).unwrap();
        assert_eq!(fp.host.as_deref(), Some("server"));
        assert_eq!(fp.segments, ["share", "x"]);

        let fp = windows_file_path(r"\\?\C:\a", true).unwrap();
        assert_eq!(fp.segments, ["C:", "a", ""]);

        let e = windows_file_path(r"\\?\a\b", false).unwrap_err();
        assert_eq!(e.kind(), ArgumentErrorKind::RelativePrefixedPath);
    }

    #[test]
    fn windows_rejections() {
        let kind = |p: &str| windows_file_path(p, false).unwrap_err().kind();
        assert_eq!(kind("1:\\a"), ArgumentErrorKind::IllegalDriveLetter);
        assert_eq!(kind("C:a"), ArgumentErrorKind::RelativeDriveLetterPath);
        assert_eq!(kind("C:"), ArgumentErrorKind::RelativeDriveLetterPath);
        assert_eq!(kind("a\\b?"), ArgumentErrorKind::IllegalPathChar);
        assert_eq!(kind("C:\\a:b"), ArgumentErrorKind::IllegalPathChar);
    }

    #[test]
    fn directory_termination() {
        let fp = posix_file_path("/a/b", true);
        assert_eq!(fp.segments, ["", "a", "b", ""]);
        let fp = posix_file_path("/a/", true);
        assert_eq!(fp.segments, ["", "a", ""]);
    }
}
