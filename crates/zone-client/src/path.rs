//! Relative path handling and URL escaping.
//!
//! Logical paths are slash-separated and relative to a configured root.
//! After normalization they carry neither a leading nor a trailing slash;
//! the URL layer appends exactly one trailing slash for directory-addressed
//! requests, which is how the zone tells "this directory" apart from "a
//! file with this exact name".

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a URL path. `/` is intentionally absent so
/// separators survive escaping.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-escape a relative path, preserving `/` separators.
///
/// Non-ASCII bytes are always escaped. Equal inputs produce equal outputs.
#[must_use]
pub fn escape(path: &str) -> String {
    utf8_percent_encode(path, PATH_ESCAPE).to_string()
}

/// Join two slash-separated relative paths.
///
/// Empty components vanish: joining an empty base with a name yields just
/// the name. The result never has a leading or trailing slash. `..`
/// components are passed through untouched; callers hand in well-formed
/// relative paths.
#[must_use]
pub fn join(base: &str, rel: &str) -> String {
    let base = base.trim_matches('/');
    let rel = rel.trim_matches('/');
    match (base.is_empty(), rel.is_empty()) {
        (true, true) => String::new(),
        (true, false) => rel.to_owned(),
        (false, true) => base.to_owned(),
        (false, false) => format!("{base}/{rel}"),
    }
}

/// The parent directory of a relative path (`""` for top-level names).
#[must_use]
pub fn parent(path: &str) -> &str {
    let path = path.trim_matches('/');
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// The final segment of a relative path.
#[must_use]
pub fn base_name(path: &str) -> &str {
    let path = path.trim_matches('/');
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
