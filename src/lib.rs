pub mod config;
pub mod engine;
pub mod error;
pub mod files;
pub mod normalize;
pub mod repair;
pub mod resolve;
pub mod scanner;
pub mod style;
pub mod watch;

pub use config::ScanConfig;
pub use engine::{ChangeLogEntry, RewriteEngine, RewriteReport};
pub use error::{Error, ErrorCode, Result};
pub use repair::RepairReport;
pub use watch::{MoveDetector, RenameEvent};

/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("rewrite", "Updated {} literals in {}", count, file);
/// log_status!("watch", "Move detected: {} -> {}", old, new);
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}
