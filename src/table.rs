//! Character class tables.
//!
//! Each table is a 128-bit set over the ASCII range stored as eight 16-bit
//! words, one word per sixteen code points. Non-ASCII characters are never
//! members of any table.

/// A set of ASCII characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharTable([u16; 8]);

impl CharTable {
    /// Creates a table that contains exactly the given bytes.
    ///
    /// # Panics
    ///
    /// Panics at compile time if any of the bytes is not ASCII.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut words = [0u16; 8];
        while let [cur, rem @ ..] = bytes {
            assert!(cur.is_ascii(), "table cannot contain non-ASCII byte");
            words[(*cur >> 4) as usize] |= 1u16 << (*cur & 15);
            bytes = rem;
        }
        Self(words)
    }

    /// Creates a table containing every byte in the inclusive range.
    #[must_use]
    pub const fn range(lo: u8, hi: u8) -> Self {
        assert!(hi.is_ascii() && lo <= hi, "invalid table range");
        let mut words = [0u16; 8];
        let mut x = lo;
        loop {
            words[(x >> 4) as usize] |= 1u16 << (x & 15);
            if x == hi {
                break;
            }
            x += 1;
        }
        Self(words)
    }

    /// Returns the union of two tables.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        let mut words = self.0;
        let mut i = 0;
        while i < 8 {
            words[i] |= other.0[i];
            i += 1;
        }
        Self(words)
    }

    /// Returns the characters in `self` that are not in `other`.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        let mut words = self.0;
        let mut i = 0;
        while i < 8 {
            words[i] &= !other.0[i];
            i += 1;
        }
        Self(words)
    }

    /// Checks whether the byte is in the table.
    #[inline]
    #[must_use]
    pub const fn allows(self, x: u8) -> bool {
        x < 128 && self.0[(x >> 4) as usize] & (1u16 << (x & 15)) != 0
    }

    /// Checks whether the character is in the table.
    #[inline]
    #[must_use]
    pub const fn allows_char(self, ch: char) -> bool {
        (ch as u32) < 128 && self.allows(ch as u8)
    }

    /// Checks whether every byte of the string is in the table.
    #[must_use]
    pub fn validate(self, s: &str) -> bool {
        s.bytes().all(|x| self.allows(x))
    }
}

const fn new(bytes: &[u8]) -> CharTable {
    CharTable::new(bytes)
}

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: CharTable = CharTable::range(b'A', b'Z').or(CharTable::range(b'a', b'z'));

/// `DIGIT = %x30-39`
pub const DIGIT: CharTable = CharTable::range(b'0', b'9');

/// `HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"`, case-insensitively.
pub const HEXDIG: CharTable = DIGIT.or(new(b"ABCDEFabcdef"));

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: CharTable = ALPHA.or(DIGIT).or(new(b"-._~"));

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")" / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: CharTable = new(b"!$&'()*+,;=");

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: CharTable = new(b":/?#[]@");

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub const SCHEME: CharTable = ALPHA.or(DIGIT).or(new(b"+-."));

/// `userinfo = *( unreserved / pct-encoded / sub-delims / ":" )`
pub const USERINFO: CharTable = UNRESERVED.or(SUB_DELIMS).or(new(b":"));

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`
pub const REG_NAME: CharTable = UNRESERVED.or(SUB_DELIMS);

/// `pchar = unreserved / pct-encoded / sub-delims / ":" / "@"`
pub const PATH_CHAR: CharTable = UNRESERVED.or(SUB_DELIMS).or(new(b":@"));

/// `pchar / "/"`
pub const PATH_CHAR_OR_SLASH: CharTable = PATH_CHAR.or(new(b"/"));

/// `query = fragment = *( pchar / "/" / "?" )`
pub const QUERY_CHAR: CharTable = PATH_CHAR.or(new(b"/?"));

/// Unreserved characters of RFC 2396:
/// `alphanum / "-" / "_" / "." / "!" / "~" / "*" / "'" / "(" / ")"`
pub const UNRESERVED_2396: CharTable = ALPHA.or(DIGIT).or(new(b"-_.!~*'()"));

/// Characters left alone when encoding a full URI.
pub const ENCODE_FULL: CharTable = UNRESERVED_2396.or(new(b"#$&+,/:;=?@"));

/// `token` characters of RFC 2045, used in data URI MIME types and parameters.
///
/// Only those that are also path characters are kept, so `#`, `%`, `^`,
/// `` ` ``, `{`, `|` and `}` are always escaped.
pub const TOKEN_CHAR: CharTable = ALPHA.or(DIGIT).or(new(b"!$&'*+-._~"));

/// `uric` of RFC 2396, allowed unescaped in data URI content.
pub const URIC: CharTable = UNRESERVED_2396.or(new(b";/?:@&=+$,"));

/// Characters allowed unescaped in an IPv6 zone identifier.
pub const ZONE_ID: CharTable = UNRESERVED;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership() {
        assert!(UNRESERVED.allows(b'~'));
        assert!(!UNRESERVED.allows(b'!'));
        assert!(SUB_DELIMS.allows(b'!'));
        assert!(PATH_CHAR.allows(b':'));
        assert!(!PATH_CHAR.allows(b'/'));
        assert!(PATH_CHAR_OR_SLASH.allows(b'/'));
        assert!(QUERY_CHAR.allows(b'?'));
        assert!(!QUERY_CHAR.allows(b'#'));
        assert!(!UNRESERVED.allows(0x80));
        assert!(!UNRESERVED.allows_char('é'));
        assert!(TOKEN_CHAR.allows(b'+'));
        assert!(!TOKEN_CHAR.allows(b'%'));
        assert!(!TOKEN_CHAR.allows(b'/'));
        assert!(!TOKEN_CHAR.allows(b'{'));
        assert!(HEXDIG.allows(b'f'));
        assert!(!HEXDIG.allows(b'g'));
    }

    #[test]
    fn sub_removes() {
        let t = UNRESERVED.sub(new(b"~"));
        assert!(!t.allows(b'~'));
        assert!(t.allows(b'a'));
        assert!(USERINFO.sub(GEN_DELIMS).allows(b'a'));
        assert!(!USERINFO.sub(GEN_DELIMS).allows(b':'));
    }
}
