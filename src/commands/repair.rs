use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use autopath::engine::ChangeLogEntry;
use autopath::{repair, Error, ScanConfig};

use crate::commands::{absolutize, resolve_root, CmdResult};

#[derive(Args)]
pub struct RepairArgs {
    /// Source file to check for broken path literals
    pub file: String,
    /// Workspace root searched for replacement candidates (default: current directory)
    #[arg(long)]
    pub root: Option<String>,
    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    pub write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RepairOutput {
    #[serde(rename = "repair")]
    Repair {
        document: String,
        dry_run: bool,
        total_changes: usize,
        changes: Vec<ChangeLogEntry>,
        applied: bool,
    },
}

pub fn run(args: RepairArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RepairOutput> {
    if args.file.trim().is_empty() {
        return Err(Error::validation_invalid_argument(
            "file",
            "File path must not be empty",
        ));
    }

    let root = resolve_root(args.root.as_deref())?;
    let document = PathBuf::from(absolutize(&args.file, &root));

    let report = repair::repair(&root, &document, &ScanConfig::default(), args.write)?;

    Ok((
        RepairOutput::Repair {
            document: report.document,
            dry_run: !args.write,
            total_changes: report.changes.len(),
            changes: report.changes,
            applied: report.applied,
        },
        0,
    ))
}
