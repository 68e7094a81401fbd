//! Filesystem watching and move detection.
//!
//! Filesystem-level moves usually surface as a delete of the old path
//! followed by a create of the new one. [`MoveDetector`] pairs those into a
//! single [`RenameEvent`] by buffering recently deleted paths and matching a
//! later create with the same basename. First match wins; the pairing can
//! misfire when several files sharing a basename move concurrently.
//!
//! The detector owns its deleted-file index and is created per watch
//! session, not kept as ambient module state. OS events come from `notify`
//! and are drained over a crossbeam channel; the detector itself never
//! touches the OS, so tests drive it directly with synthetic timestamps.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossbeam_channel as channel;
use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecursiveMode, Watcher};

use crate::error::{Error, Result};
use crate::log_status;

/// One file move: old and new absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEvent {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

/// Pairs delete/create event sequences into rename events.
#[derive(Debug, Default)]
pub struct MoveDetector {
    deleted: VecDeque<(Instant, PathBuf)>,
}

impl MoveDetector {
    /// Deleted entries older than this are pruned instead of paired.
    pub const MAX_AGE: Duration = Duration::from_secs(2);
    /// Bound on the index during delete storms; oldest entries drop first.
    pub const MAX_PENDING: usize = 512;

    pub fn new() -> Self {
        Self {
            deleted: VecDeque::new(),
        }
    }

    /// Record a deleted path awaiting a matching re-creation.
    pub fn on_deleted(&mut self, path: PathBuf, now: Instant) {
        self.gc(now);
        self.deleted.push_back((now, path));
        while self.deleted.len() > Self::MAX_PENDING {
            self.deleted.pop_front();
        }
    }

    /// Match a created path against recent deletes.
    ///
    /// Returns the rename event if a deleted entry shares the created file's
    /// basename (oldest entry first). The matched entry is removed. `None`
    /// means this was a genuine new file.
    pub fn on_created(&mut self, path: PathBuf, now: Instant) -> Option<RenameEvent> {
        self.gc(now);

        let created_name = path.file_name()?.to_os_string();
        let idx = self
            .deleted
            .iter()
            .position(|(_, old)| old.file_name() == Some(created_name.as_os_str()))?;

        let (_, old_path) = self.deleted.remove(idx)?;
        Some(RenameEvent {
            old_path,
            new_path: path,
        })
    }

    /// Number of deletes still awaiting a match.
    pub fn pending(&self) -> usize {
        self.deleted.len()
    }

    fn gc(&mut self, now: Instant) {
        while let Some((t, _)) = self.deleted.front() {
            if now.saturating_duration_since(*t) <= Self::MAX_AGE {
                break;
            }
            self.deleted.pop_front();
        }
    }
}

const EVENT_QUEUE_CAPACITY: usize = 1024;

/// Watch `root` recursively and invoke `handle` for every detected move.
///
/// Runs until the watcher backend disconnects. The settle delay is applied
/// after each create event so filesystem-level move operations (which emit
/// delete+create pairs) have finished before the index is consulted.
pub fn run<F: FnMut(RenameEvent)>(
    root: &Path,
    settle_delay: Duration,
    mut handle: F,
) -> Result<()> {
    if !root.is_dir() {
        return Err(Error::workspace_not_found(
            root.to_string_lossy().to_string(),
        ));
    }

    let (tx, rx) = channel::bounded(EVENT_QUEUE_CAPACITY);
    let mut watcher = notify::recommended_watcher(move |res| {
        // Dropped events under a full queue are acceptable: the worst
        // outcome is an unpaired move, never a bad rewrite.
        let _ = tx.try_send(res);
    })
    .map_err(|e| Error::watch_init_failed(e.to_string()))?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|e| Error::watch_init_failed(e.to_string()))?;

    log_status!("watch", "Watching {}", root.display());

    let mut detector = MoveDetector::new();

    for msg in rx.iter() {
        let event = match msg {
            Ok(event) => event,
            Err(e) => {
                log_status!("watch", "Watcher error: {}", e);
                continue;
            }
        };

        match event.kind {
            EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                let now = Instant::now();
                for path in event.paths {
                    detector.on_deleted(path, now);
                }
            }
            EventKind::Create(_) => {
                std::thread::sleep(settle_delay);
                let now = Instant::now();
                for path in event.paths {
                    if let Some(rename) = detector.on_created(path, now) {
                        handle(rename);
                    }
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                let now = Instant::now();
                for path in event.paths {
                    if let Some(rename) = detector.on_created(path, now) {
                        handle(rename);
                    }
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                // Backend delivered the pair atomically; no index needed.
                let mut it = event.paths.into_iter();
                while let Some(from) = it.next() {
                    let Some(to) = it.next() else {
                        break;
                    };
                    handle(RenameEvent {
                        old_path: from,
                        new_path: to,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_then_create_pairs_into_rename() {
        let mut detector = MoveDetector::new();
        let t0 = Instant::now();

        detector.on_deleted(PathBuf::from("/proj/utils/helper.py"), t0);
        let rename = detector
            .on_created(PathBuf::from("/proj/lib/helper.py"), t0)
            .unwrap();

        assert_eq!(rename.old_path, PathBuf::from("/proj/utils/helper.py"));
        assert_eq!(rename.new_path, PathBuf::from("/proj/lib/helper.py"));
        assert_eq!(detector.pending(), 0);
    }

    #[test]
    fn create_without_delete_is_a_new_file() {
        let mut detector = MoveDetector::new();
        assert!(detector
            .on_created(PathBuf::from("/proj/new.py"), Instant::now())
            .is_none());
    }

    #[test]
    fn basename_mismatch_stays_pending() {
        let mut detector = MoveDetector::new();
        let t0 = Instant::now();

        detector.on_deleted(PathBuf::from("/proj/a.py"), t0);
        assert!(detector.on_created(PathBuf::from("/proj/b.py"), t0).is_none());
        assert_eq!(detector.pending(), 1);
    }

    #[test]
    fn expired_delete_does_not_pair() {
        let mut detector = MoveDetector::new();
        let t0 = Instant::now();

        detector.on_deleted(PathBuf::from("/proj/a.py"), t0);
        let later = t0 + MoveDetector::MAX_AGE + Duration::from_millis(1);
        assert!(detector.on_created(PathBuf::from("/x/a.py"), later).is_none());
        assert_eq!(detector.pending(), 0);
    }

    #[test]
    fn first_match_wins_in_delete_order() {
        let mut detector = MoveDetector::new();
        let t0 = Instant::now();

        detector.on_deleted(PathBuf::from("/one/x.txt"), t0);
        detector.on_deleted(PathBuf::from("/two/x.txt"), t0);

        let first = detector
            .on_created(PathBuf::from("/moved/x.txt"), t0)
            .unwrap();
        assert_eq!(first.old_path, PathBuf::from("/one/x.txt"));

        let second = detector
            .on_created(PathBuf::from("/moved2/x.txt"), t0)
            .unwrap();
        assert_eq!(second.old_path, PathBuf::from("/two/x.txt"));
    }

    #[test]
    fn matched_entry_is_consumed() {
        let mut detector = MoveDetector::new();
        let t0 = Instant::now();

        detector.on_deleted(PathBuf::from("/proj/a.py"), t0);
        assert!(detector.on_created(PathBuf::from("/new/a.py"), t0).is_some());
        assert!(detector.on_created(PathBuf::from("/new2/a.py"), t0).is_none());
    }

    #[test]
    fn index_is_bounded() {
        let mut detector = MoveDetector::new();
        let t0 = Instant::now();

        for i in 0..(MoveDetector::MAX_PENDING + 50) {
            detector.on_deleted(PathBuf::from(format!("/proj/f{}.py", i)), t0);
        }
        assert_eq!(detector.pending(), MoveDetector::MAX_PENDING);
    }

    #[test]
    fn missing_root_fails_to_watch() {
        let err = run(
            Path::new("/definitely/not/here"),
            Duration::from_millis(0),
            |_| {},
        )
        .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::WorkspaceNotFound);
    }
}
