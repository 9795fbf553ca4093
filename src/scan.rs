//! Table-driven scanner that classifies URI text in a single pass.
//!
//! Every transition is one byte: the next state in the low bits and the
//! index slot to record the current position in, if any, in the high bits.
//! Slot 0 is a sink that the parser never reads.

/// Bits of a transition holding the next state.
pub(crate) const STATE_MASK: u8 = 0x1f;
/// Shift of the index slot within a transition.
pub(crate) const SLOT_SHIFT: u32 = 5;

pub(crate) const SCHEME_END: usize = 1;
pub(crate) const HOST_START: usize = 2;
pub(crate) const PORT_START: usize = 3;
pub(crate) const PATH_START: usize = 4;
pub(crate) const QUERY_START: usize = 5;
pub(crate) const FRAGMENT_START: usize = 6;
pub(crate) const NOT_SIMPLE: usize = 7;

const NONE: usize = 0;

pub(crate) const URI_START: u8 = 0;
const SCHEME_OR_PATH: u8 = 1;
const AUTH_OR_PATH: u8 = 2;
const AUTH_OR_PATH_SLASH: u8 = 3;
const UINFO_OR_HOST0: u8 = 4;
const UINFO_OR_HOST: u8 = 5;
const UINFO_OR_PORT0: u8 = 6;
const UINFO_OR_PORT: u8 = 7;
const IPV6_HOST: u8 = 8;
const REL_PATH_SEG: u8 = 9;
const PATH_SEG: u8 = 10;
const PATH: u8 = 11;
const QUERY: u8 = 12;
const FRAGMENT: u8 = 13;
// Ending in any of the states from here on means the path
// still holds a dot segment to remove.
const SCHEME_OR_PATH_DOT: u8 = 14;
const SCHEME_OR_PATH_DOT2: u8 = 15;
const REL_PATH_SEG_DOT: u8 = 16;
const REL_PATH_SEG_DOT2: u8 = 17;
const PATH_SEG_DOT: u8 = 18;
const PATH_SEG_DOT2: u8 = 19;
pub(crate) const SCHEME_START: u8 = 20;
const SCHEME: u8 = 21;

/// The first state that may not end a simple URI.
pub(crate) const NON_SIMPLE_END_STATES: u8 = 14;

const STATE_COUNT: usize = 22;
const CLASS_COUNT: usize = 96;
const WILDCARD: usize = CLASS_COUNT - 1;

type Row = [u8; CLASS_COUNT];

const UNRESERVED: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-._~";
const SUB_DELIMS: &[u8] = b"!$&'()*+,;=";

/// Maps printable ASCII onto `0..95` and everything else onto the wildcard.
#[inline]
const fn class(x: u8) -> usize {
    if x >= 0x20 && x < 0x7f {
        (x - 0x20) as usize
    } else {
        WILDCARD
    }
}

const fn tr(state: u8, slot: usize) -> u8 {
    state | ((slot as u8) << SLOT_SHIFT)
}

const fn set(mut row: Row, mut chars: &[u8], t: u8) -> Row {
    while let [c, rem @ ..] = chars {
        row[class(*c)] = t;
        chars = rem;
    }
    row
}

const fn set_range(mut row: Row, lo: u8, hi: u8, t: u8) -> Row {
    let mut c = lo;
    while c <= hi {
        row[class(c)] = t;
        c += 1;
    }
    row
}

/// Sets `unreserved / sub-delims / "@"`.
const fn set_pchar(row: Row, t: u8) -> Row {
    set(set(set(row, UNRESERVED, t), SUB_DELIMS, t), b"@", t)
}

/// Sets `pchar`, as allowed in path segments.
const fn set_path_char(row: Row, t: u8) -> Row {
    set(set_pchar(row, t), b":", t)
}

const fn set_query_fragment(row: Row) -> Row {
    set(
        set(row, b"?", tr(QUERY, QUERY_START)),
        b"#",
        tr(FRAGMENT, FRAGMENT_START),
    )
}

/// Makes `/` and `\` go to `state`, the latter always recording a slot
/// so that a backslash is noticed by the parser.
const fn set_slash(row: Row, state: u8, slot: usize) -> Row {
    let backslash_slot = if slot == NONE { NOT_SIMPLE } else { slot };
    set(
        set(row, b"/", tr(state, slot)),
        b"\\",
        tr(state, backslash_slot),
    )
}

const fn build() -> [Row; STATE_COUNT] {
    let mut t = [[0u8; CLASS_COUNT]; STATE_COUNT];
    let ns = NOT_SIMPLE;

    let mut b = [tr(SCHEME_OR_PATH, ns); CLASS_COUNT];
    b = set_pchar(b, SCHEME_OR_PATH);
    b = set(b, b".", SCHEME_OR_PATH_DOT);
    b = set(b, b":", tr(AUTH_OR_PATH, SCHEME_END));
    b = set_slash(b, AUTH_OR_PATH_SLASH, NONE);
    t[URI_START as usize] = set_query_fragment(b);

    b = [tr(SCHEME_OR_PATH, ns); CLASS_COUNT];
    b = set_pchar(b, SCHEME_OR_PATH);
    b = set(b, b":", tr(AUTH_OR_PATH, SCHEME_END));
    b = set_slash(b, PATH_SEG, NONE);
    t[SCHEME_OR_PATH as usize] = set_query_fragment(b);

    b = [tr(SCHEME_OR_PATH, ns); CLASS_COUNT];
    b = set_pchar(b, SCHEME_OR_PATH);
    b = set(b, b".", SCHEME_OR_PATH_DOT2);
    b = set(b, b":", tr(AUTH_OR_PATH, SCHEME_END));
    b = set_slash(b, PATH_SEG, ns);
    t[SCHEME_OR_PATH_DOT as usize] = set_query_fragment(b);

    b = [tr(SCHEME_OR_PATH, ns); CLASS_COUNT];
    b = set_pchar(b, SCHEME_OR_PATH);
    b = set(b, b":", tr(AUTH_OR_PATH, SCHEME_END));
    b = set_slash(b, REL_PATH_SEG, NONE);
    t[SCHEME_OR_PATH_DOT2 as usize] = set_query_fragment(b);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, tr(PATH, PATH_START));
    b = set(b, b".", tr(PATH_SEG_DOT, PATH_START));
    b = set_slash(b, AUTH_OR_PATH_SLASH, PATH_START);
    t[AUTH_OR_PATH as usize] = set_query_fragment(b);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, PATH);
    b = set(b, b".", PATH_SEG_DOT);
    b = set_slash(b, UINFO_OR_HOST0, HOST_START);
    t[AUTH_OR_PATH_SLASH as usize] = set_query_fragment(b);

    b = [tr(UINFO_OR_HOST, ns); CLASS_COUNT];
    b = set(set(b, UNRESERVED, UINFO_OR_HOST), SUB_DELIMS, UINFO_OR_HOST);
    b = set_range(b, b'A', b'Z', tr(UINFO_OR_HOST, ns));
    b = set(b, b":", tr(UINFO_OR_PORT0, PORT_START));
    b = set(b, b"@", tr(UINFO_OR_HOST0, HOST_START));
    b = set_slash(b, PATH_SEG, PATH_START);
    t[UINFO_OR_HOST as usize] = set_query_fragment(b);
    t[UINFO_OR_HOST0 as usize] = set(t[UINFO_OR_HOST as usize], b"[", tr(IPV6_HOST, ns));

    b = [tr(UINFO_OR_HOST, ns); CLASS_COUNT];
    b = set(b, b"@", tr(UINFO_OR_HOST0, HOST_START));
    b = set_slash(b, PATH_SEG, PATH_START);
    b = set_query_fragment(b);
    t[UINFO_OR_PORT0 as usize] = set_range(b, b'1', b'9', UINFO_OR_PORT);
    t[UINFO_OR_PORT as usize] = set_range(b, b'0', b'9', UINFO_OR_PORT);

    t[IPV6_HOST as usize] = set([IPV6_HOST; CLASS_COUNT], b"]", UINFO_OR_HOST);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, PATH);
    b = set(b, b".", REL_PATH_SEG_DOT);
    b = set_slash(b, PATH_SEG, ns);
    t[REL_PATH_SEG as usize] = set_query_fragment(b);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, PATH);
    b = set(b, b".", REL_PATH_SEG_DOT2);
    b = set_slash(b, PATH_SEG, ns);
    t[REL_PATH_SEG_DOT as usize] = set_query_fragment(b);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, PATH);
    b = set_slash(b, REL_PATH_SEG, NONE);
    t[REL_PATH_SEG_DOT2 as usize] = set_query_fragment(b);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, PATH);
    b = set(b, b".", PATH_SEG_DOT);
    b = set_slash(b, PATH_SEG, NONE);
    t[PATH_SEG as usize] = set_query_fragment(b);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, PATH);
    b = set(b, b".", PATH_SEG_DOT2);
    b = set_slash(b, PATH_SEG, ns);
    t[PATH_SEG_DOT as usize] = set_query_fragment(b);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, PATH);
    b = set_slash(b, PATH_SEG, ns);
    t[PATH_SEG_DOT2 as usize] = set_query_fragment(b);

    b = [tr(PATH, ns); CLASS_COUNT];
    b = set_path_char(b, PATH);
    b = set_slash(b, PATH_SEG, NONE);
    t[PATH as usize] = set_query_fragment(b);

    b = [tr(QUERY, ns); CLASS_COUNT];
    b = set(set_path_char(b, QUERY), b"/?", QUERY);
    t[QUERY as usize] = set(b, b"#", tr(FRAGMENT, FRAGMENT_START));

    b = [tr(FRAGMENT, ns); CLASS_COUNT];
    t[FRAGMENT as usize] = set(set_path_char(b, FRAGMENT), b"/?", FRAGMENT);

    b = [tr(SCHEME, ns); CLASS_COUNT];
    t[SCHEME_START as usize] = set_range(b, b'a', b'z', SCHEME);

    b = set_range(b, b'a', b'z', SCHEME);
    b = set_range(b, b'0', b'9', SCHEME);
    t[SCHEME as usize] = set(b, b"+-.", SCHEME);

    t
}

static TRANSITIONS: [Row; STATE_COUNT] = build();

/// Boundary indices recorded by [`scan`], addressed by the slot constants.
pub(crate) type Indices = [isize; 8];

/// Runs the scanner over `bytes[start..end]` from the given state.
///
/// Each transition with a slot stores the position of the byte that
/// triggered it into `indices`. Returns the final state.
pub(crate) fn scan(
    bytes: &[u8],
    start: usize,
    end: usize,
    mut state: u8,
    indices: &mut Indices,
) -> u8 {
    for (i, &x) in bytes[start..end].iter().enumerate() {
        let t = TRANSITIONS[state as usize][class(x)];
        state = t & STATE_MASK;
        indices[(t >> SLOT_SHIFT) as usize] = (start + i) as isize;
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(s: &str) -> (u8, Indices) {
        let mut indices = [0, -1, -1, 0, 0, s.len() as isize, s.len() as isize, -1];
        let state = scan(s.as_bytes(), 0, s.len(), URI_START, &mut indices);
        (state, indices)
    }

    #[test]
    fn records_boundaries() {
        let (state, ix) = run("http://host:8080/a/b?q#f");
        assert_eq!(state, FRAGMENT);
        assert_eq!(ix[SCHEME_END], 4);
        assert_eq!(ix[HOST_START], 6);
        assert_eq!(ix[PORT_START], 11);
        assert_eq!(ix[PATH_START], 16);
        assert_eq!(ix[QUERY_START], 20);
        assert_eq!(ix[FRAGMENT_START], 22);
        assert_eq!(ix[NOT_SIMPLE], -1);
    }

    #[test]
    fn flags_non_simple() {
        // An uppercase scheme is caught by the scheme rescan, not here.
        for s in ["http://A/", "a/%20", "a b", "http://[::1]/", "a/b\\c", "é"] {
            let (_, ix) = run(s);
            assert!(ix[NOT_SIMPLE] >= 0, "{s}");
        }
        for s in ["a/./b", "./a", "a/../b"] {
            let (_, ix) = run(s);
            assert!(ix[NOT_SIMPLE] >= 0, "{s}");
        }
    }

    #[test]
    fn dot_states_at_end() {
        for s in [".", "..", "a/.", "a/..", "../.", "/.."] {
            assert!(run(s).0 >= NON_SIMPLE_END_STATES, "{s}");
        }
        for s in ["a", "a/", "../a", "../../", "a/.b"] {
            assert!(run(s).0 < NON_SIMPLE_END_STATES, "{s}");
        }
    }

    #[test]
    fn scheme_rescan() {
        let mut ix = [-1; 8];
        assert_eq!(scan(b"git+ssh", 0, 7, SCHEME_START, &mut ix), SCHEME);
        assert_eq!(ix[NOT_SIMPLE], -1);
        assert_eq!(scan(b"Git", 0, 3, SCHEME_START, &mut ix), SCHEME);
        assert_eq!(ix[NOT_SIMPLE], 0);
        assert_eq!(scan(b"", 0, 0, SCHEME_START, &mut ix), SCHEME_START);
    }
}
