use clap::Args;
use serde::Serialize;
use std::time::Duration;

use autopath::engine::RewriteEngine;
use autopath::{log_status, watch, ScanConfig};

use crate::commands::{resolve_root, CmdResult};

#[derive(Args)]
pub struct WatchArgs {
    /// Workspace root to watch (default: current directory)
    #[arg(long)]
    pub root: Option<String>,
    /// Milliseconds to let a move's delete+create pair settle before matching
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum WatchOutput {
    #[serde(rename = "watch")]
    Watch {
        root: String,
        moves_handled: usize,
        total_changes: usize,
    },
}

pub fn run(args: WatchArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<WatchOutput> {
    let root = resolve_root(args.root.as_deref())?;
    let config = ScanConfig::default();
    let settle_delay = args
        .settle_ms
        .map(Duration::from_millis)
        .unwrap_or(config.settle_delay);

    let engine = RewriteEngine::new(root.clone(), config);

    let mut moves_handled = 0usize;
    let mut total_changes = 0usize;

    watch::run(&root, settle_delay, |rename| {
        let old_abs = rename.old_path.to_string_lossy().to_string();
        let new_abs = rename.new_path.to_string_lossy().to_string();
        log_status!("watch", "Move detected: {} -> {}", old_abs, new_abs);

        match engine.rewrite(&old_abs, &new_abs, true) {
            Ok(report) => {
                moves_handled += 1;
                total_changes += report.changes.len();
            }
            Err(e) => {
                log_status!("watch", "Rewrite failed for {}: {}", new_abs, e);
            }
        }
    })?;

    Ok((
        WatchOutput::Watch {
            root: root.to_string_lossy().to_string(),
            moves_handled,
            total_changes,
        },
        0,
    ))
}
