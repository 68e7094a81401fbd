//! Literal quoting/escaping preservation.
//!
//! When a literal is rewritten, the replacement must use the same quoting
//! convention the author used: raw strings stay raw, Windows-escaped paths
//! stay escaped, forward-slash paths stay forward-slash. Style is decided
//! solely from the original raw text, never from the new path's separators.

/// Decode a raw literal (delimiters included) into the path value it holds.
///
/// Raw strings (`r"..."` / `r'...'`) do not interpret escapes, so their body
/// passes through untouched. In plain literals a doubled backslash collapses
/// to a single separator. Other escape sequences are not interpreted.
pub fn decode(raw: &str) -> String {
    if let Some(body) = raw_string_body(raw) {
        return body.to_string();
    }
    strip_quotes(raw).replace(r"\\", r"\")
}

/// Re-encode a replacement path using the original literal's style.
///
/// The delimiter is taken from the original literal, so single-quoted and
/// back-tick literals keep their quote character. Decision table, tested
/// in order:
/// 1. raw-prefixed original: emit `r<q>...<q>`, backslashes untouched
/// 2. original holds a doubled backslash: every backslash doubled
/// 3. original holds a single backslash: backslashes as-is
/// 4. otherwise: backslashes converted to forward slashes
pub fn encode(new_inner: &str, original_raw: &str) -> String {
    let q = delimiter(original_raw);
    if raw_string_body(original_raw).is_some() {
        return format!("r{}{}{}", q, new_inner, q);
    }
    if original_raw.contains(r"\\") {
        return format!("{}{}{}", q, new_inner.replace('\\', r"\\"), q);
    }
    if original_raw.contains('\\') {
        return format!("{}{}{}", q, new_inner, q);
    }
    format!("{}{}{}", q, new_inner.replace('\\', "/"), q)
}

/// Quote character of a literal (the char after an `r` prefix, else the
/// first char). Defaults to `"` for malformed input.
fn delimiter(raw: &str) -> char {
    let bytes = raw.as_bytes();
    let first = match bytes.first() {
        Some(b'r') => bytes.get(1).copied(),
        b => b.copied(),
    };
    match first {
        Some(b @ (b'"' | b'\'' | b'`')) => b as char,
        _ => '"',
    }
}

fn raw_string_body(raw: &str) -> Option<&str> {
    if raw.len() >= 3 && (raw.starts_with("r\"") || raw.starts_with("r'")) {
        return Some(&raw[2..raw.len() - 1]);
    }
    None
}

fn strip_quotes(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if raw.len() >= 2 && matches!(bytes[0], b'"' | b'\'' | b'`') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}
