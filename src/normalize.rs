//! Path normalization for equality comparison.
//!
//! Produces a comparison key, never a displayable path: backslash separators
//! become forward slashes and the result is lowercased, so case-only and
//! separator-only differences compare equal.

/// Canonicalize a path string into a comparison key.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

/// Compare two path strings for normalized equality.
pub fn paths_equal(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_unified() {
        assert_eq!(normalize("a\\b\\c.py"), "a/b/c.py");
    }

    #[test]
    fn case_folded() {
        assert_eq!(normalize("C:\\Foo\\Bar.py"), normalize("c:/foo/bar.py"));
    }

    #[test]
    fn idempotent() {
        let once = normalize("C:\\Data\\In.csv");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn distinct_paths_stay_distinct() {
        assert!(!paths_equal("/proj/a.py", "/proj/b.py"));
    }
}
