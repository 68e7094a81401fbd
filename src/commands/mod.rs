use serde_json::Value;
use std::path::PathBuf;

pub type CmdResult<T> = autopath::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod rename;
pub mod repair;
pub mod watch;

pub fn run_json(command: crate::Commands, global: &GlobalArgs) -> (autopath::Result<Value>, i32) {
    match command {
        crate::Commands::Rename(args) => {
            crate::output::map_cmd_result_to_json(rename::run(args, global))
        }
        crate::Commands::Repair(args) => {
            crate::output::map_cmd_result_to_json(repair::run(args, global))
        }
        crate::Commands::Watch(args) => {
            crate::output::map_cmd_result_to_json(watch::run(args, global))
        }
    }
}

/// Workspace root for a command: explicit `--root` or the current directory.
fn resolve_root(root: Option<&str>) -> autopath::Result<PathBuf> {
    match root {
        Some(r) => Ok(PathBuf::from(r)),
        None => std::env::current_dir().map_err(|e| {
            autopath::Error::internal_io(e.to_string(), Some("resolve current directory".to_string()))
        }),
    }
}

/// Absolutize a user-supplied path against the workspace root.
fn absolutize(path: &str, root: &std::path::Path) -> String {
    if autopath::resolve::is_absolute(path) {
        path.to_string()
    } else {
        autopath::resolve::resolve(path, &root.to_string_lossy())
    }
}
