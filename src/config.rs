use std::path::Path;
use std::time::Duration;

/// File extensions scanned for path literals.
///
/// Fixed representative set matching the supported source types; injected
/// through [`ScanConfig`] rather than read from the filesystem layout.
pub const SOURCE_EXTENSIONS: &[&str] = &["py", "js", "ts", "java", "cpp", "c", "r", "ipynb"];

/// Dependency/VCS directories never scanned or searched.
pub const SKIP_DIRS: &[&str] = &["node_modules", "vendor", ".git", ".svn", ".hg"];

/// Result cap for the broken-path workspace search.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Delay letting filesystem-level move operations (delete+create pairs)
/// complete before a created file is matched against recent deletes.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Scanning configuration injected into the rewrite engine and repair.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub skip_dirs: Vec<String>,
    pub search_limit: usize,
    pub settle_delay: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            skip_dirs: SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl ScanConfig {
    /// Glob patterns for candidate-file enumeration, one per extension.
    pub fn glob_patterns(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| format!("**/*.{}", ext))
            .collect()
    }

    /// True if any component of `path` is an excluded directory.
    pub fn is_excluded(&self, path: &Path) -> bool {
        path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|name| self.skip_dirs.iter().any(|d| d == name))
        })
    }
}
