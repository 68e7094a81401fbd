//! Lexical path resolution for literal contents.
//!
//! Literals can hold Windows-style paths regardless of the host OS, so all
//! resolution here is lexical (string-level): no filesystem access, and
//! absolute detection covers both a leading slash and a drive-letter prefix.

/// True if `path` denotes an absolute path (leading separator or `X:`-style
/// drive prefix).
pub fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Resolve a literal's path value to an absolute path.
///
/// Absolute contents are returned unchanged; relative contents are joined
/// onto the containing file's directory with `.`/`..` segments collapsed.
pub fn resolve(inner: &str, containing_dir: &str) -> String {
    if is_absolute(inner) {
        return inner.to_string();
    }
    collapse(&format!("{}/{}", containing_dir, inner))
}

/// Compute the replacement path value for a rewritten literal.
///
/// If the original literal held an absolute path the replacement is the new
/// absolute path unchanged; otherwise it is the new path expressed relative
/// to the containing file's directory, with forward slashes.
pub fn compute_replacement(original_absolute: bool, new_abs: &str, containing_dir: &str) -> String {
    if original_absolute {
        return new_abs.to_string();
    }
    relative_to(new_abs, containing_dir)
}

/// Split a path into its prefix (root slash or drive) and segments.
fn split(path: &str) -> (String, Vec<String>) {
    let (prefix, rest) = if path.starts_with('/') || path.starts_with('\\') {
        ("/".to_string(), &path[1..])
    } else {
        let bytes = path.as_bytes();
        if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
            let after = path[2..].trim_start_matches(['/', '\\']);
            (format!("{}:/", &path[..1]), after)
        } else {
            (String::new(), path)
        }
    };

    let segments = rest
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    (prefix, segments)
}

/// Collapse `.` and `..` segments lexically. `..` at the root is dropped.
fn collapse(path: &str) -> String {
    let (prefix, segments) = split(path);

    let mut out: Vec<String> = Vec::new();
    for seg in segments {
        match seg.as_str() {
            "." => {}
            ".." => {
                out.pop();
            }
            _ => out.push(seg),
        }
    }

    format!("{}{}", prefix, out.join("/"))
}

/// Express `target` relative to `base` (both absolute), forward-slash
/// separated. Falls back to the collapsed target when the prefixes differ
/// (e.g. different drives) and no relative form exists.
fn relative_to(target: &str, base: &str) -> String {
    let (t_prefix, t_segs) = split(&collapse(target));
    let (b_prefix, b_segs) = split(&collapse(base));

    if !t_prefix.eq_ignore_ascii_case(&b_prefix) {
        return collapse(target);
    }

    let mut common = 0;
    while common < t_segs.len()
        && common < b_segs.len()
        && t_segs[common].eq_ignore_ascii_case(&b_segs[common])
    {
        common += 1;
    }

    let mut parts: Vec<String> = Vec::new();
    for _ in common..b_segs.len() {
        parts.push("..".to_string());
    }
    parts.extend(t_segs[common..].iter().cloned());

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_detection() {
        assert!(is_absolute("/proj/a.py"));
        assert!(is_absolute(r"C:\data\in.csv"));
        assert!(is_absolute("c:/data/in.csv"));
        assert!(!is_absolute("utils/helper.py"));
        assert!(!is_absolute("../data.csv"));
    }

    #[test]
    fn resolve_relative_joins_and_collapses() {
        assert_eq!(resolve("utils/helper.py", "/proj"), "/proj/utils/helper.py");
        assert_eq!(resolve("../shared/x.csv", "/proj/src"), "/proj/shared/x.csv");
        assert_eq!(resolve("./a.py", "/proj"), "/proj/a.py");
    }

    #[test]
    fn resolve_absolute_unchanged() {
        assert_eq!(resolve(r"C:\data\in.csv", "/proj"), r"C:\data\in.csv");
        assert_eq!(resolve("/abs/p.py", "/proj"), "/abs/p.py");
    }

    #[test]
    fn replacement_absolute_original() {
        let out = compute_replacement(true, r"C:\data2\in.csv", "/proj");
        assert_eq!(out, r"C:\data2\in.csv");
    }

    #[test]
    fn replacement_relative_original() {
        let out = compute_replacement(false, "/proj/utils/helper2.py", "/proj");
        assert_eq!(out, "utils/helper2.py");
    }

    #[test]
    fn replacement_relative_walks_up() {
        let out = compute_replacement(false, "/proj/shared/x.csv", "/proj/src/deep");
        assert_eq!(out, "../../shared/x.csv");
    }

    #[test]
    fn relative_across_drives_falls_back_to_absolute() {
        let out = compute_replacement(false, r"D:\data\x.csv", r"C:\proj");
        assert_eq!(out, "D:/data/x.csv");
    }

    #[test]
    fn windows_dir_resolution() {
        assert_eq!(resolve("in.csv", r"C:\data"), "C:/data/in.csv");
    }
}
