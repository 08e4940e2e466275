//! File system watcher for watch mode.
//!
//! Watches the entry's directory recursively plus the declared `external` and
//! `over` files, and forwards relevant changes through a bounded channel.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use sammi_config::ResolvedExtensionConfig;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::{CliError, Result};

const CHANNEL_CAPACITY: usize = 100;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Created(p) | FileChange::Modified(p) | FileChange::Removed(p) => p,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FileChange::Created(_) => "add",
            FileChange::Modified(_) => "change",
            FileChange::Removed(_) => "unlink",
        }
    }

    /// `"<kind>: <path>"`, with the path shown relative to `root` when possible.
    pub fn describe(&self, root: &Path) -> String {
        let path = self.path();
        let shown = path.strip_prefix(root).unwrap_or(path);
        format!("{}: {}", self.kind(), shown.display())
    }

    fn from_event(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// What to watch and what to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchTargets {
    /// Watched recursively.
    pub directories: Vec<PathBuf>,
    /// Watched individually.
    pub files: Vec<PathBuf>,
    /// Build artifacts. Changes to exactly these paths are dropped.
    pub ignore: Vec<PathBuf>,
}

impl WatchTargets {
    pub fn from_config(config: &ResolvedExtensionConfig) -> Self {
        let directories = config
            .entry
            .parent()
            .map(Path::to_path_buf)
            .into_iter()
            .collect();
        let files = config
            .external
            .iter()
            .chain(config.over.iter())
            .cloned()
            .collect();

        Self {
            directories,
            files,
            ignore: vec![
                config.bundle_path(),
                config.sef_path(),
                config.preview_path(),
            ],
        }
    }

    fn should_ignore(&self, path: &Path) -> bool {
        if self.files.iter().any(|file| file == path) {
            return false;
        }
        if self.ignore.iter().any(|artifact| artifact == path) {
            return true;
        }

        // Editor swap and backup files
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.') || name.ends_with('~'))
    }
}

pub struct FileWatcher {
    watcher: RecommendedWatcher,
    watched: Vec<PathBuf>,
}

impl FileWatcher {
    /// Start watching `targets`.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` for a missing target and `Watch` when the
    /// platform watcher cannot be created.
    pub fn new(targets: WatchTargets) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let filter = targets.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            for path in event.paths {
                if filter.should_ignore(&path) {
                    trace!(path = %path.display(), "ignoring change");
                    continue;
                }
                let Some(change) = FileChange::from_event(&event.kind, path) else {
                    continue;
                };
                // A full channel already holds a pending change.
                let _ = tx.try_send(change);
            }
        })?;

        let mut watched = Vec::new();
        let recursive = targets
            .directories
            .iter()
            .map(|dir| (dir, RecursiveMode::Recursive));
        let single = targets
            .files
            .iter()
            .map(|file| (file, RecursiveMode::NonRecursive));

        for (path, mode) in recursive.chain(single) {
            if !path.exists() {
                return Err(CliError::FileNotFound(path.clone()));
            }
            watcher.watch(path, mode)?;
            debug!(path = %path.display(), "watching");
            watched.push(path.clone());
        }

        Ok((Self { watcher, watched }, rx))
    }

    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Stop every subscription.
    ///
    /// Paths that vanished while being watched are not an error.
    pub fn close(mut self) -> std::result::Result<(), notify::Error> {
        for path in std::mem::take(&mut self.watched) {
            match self.watcher.unwatch(&path) {
                Ok(()) => {}
                Err(e) if matches!(e.kind, notify::ErrorKind::WatchNotFound) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> WatchTargets {
        WatchTargets {
            directories: vec![PathBuf::from("/project/src")],
            files: vec![],
            ignore: vec![
                PathBuf::from("/project/src/dist/extension.js"),
                PathBuf::from("/project/src/dist/extension.sef"),
                PathBuf::from("/project/src/dist/preview.html"),
            ],
        }
    }

    #[test]
    fn build_artifacts_are_ignored() {
        let targets = targets();
        assert!(targets.should_ignore(Path::new("/project/src/dist/extension.js")));
        assert!(targets.should_ignore(Path::new("/project/src/dist/preview.html")));
        assert!(!targets.should_ignore(Path::new("/project/src/dist/helper.ts")));
        assert!(!targets.should_ignore(Path::new("/project/src/main.ts")));
    }

    #[test]
    fn output_in_project_root_keeps_sources_watched() {
        let targets = WatchTargets {
            directories: vec![PathBuf::from("/project")],
            files: vec![PathBuf::from("/project/over.json")],
            ignore: vec![
                PathBuf::from("/project/extension.js"),
                PathBuf::from("/project/extension.sef"),
                PathBuf::from("/project/preview.html"),
            ],
        };
        assert!(!targets.should_ignore(Path::new("/project/src/main.ts")));
        assert!(!targets.should_ignore(Path::new("/project/over.json")));
        assert!(targets.should_ignore(Path::new("/project/extension.sef")));
    }

    #[test]
    fn declared_files_are_never_ignored() {
        let targets = WatchTargets {
            directories: vec![],
            files: vec![PathBuf::from("/project/.over.json")],
            ignore: vec![PathBuf::from("/project/.over.json")],
        };
        assert!(!targets.should_ignore(Path::new("/project/.over.json")));
    }

    #[test]
    fn editor_files_are_ignored() {
        let targets = targets();
        assert!(targets.should_ignore(Path::new("/project/src/.main.ts.swp")));
        assert!(targets.should_ignore(Path::new("/project/src/main.ts~")));
    }

    #[test]
    fn describe_is_relative_to_root() {
        let change = FileChange::Modified(PathBuf::from("/project/src/main.ts"));
        assert_eq!(change.describe(Path::new("/project")), "change: src/main.ts");

        let change = FileChange::Removed(PathBuf::from("/elsewhere/over.json"));
        assert_eq!(
            change.describe(Path::new("/project")),
            "unlink: /elsewhere/over.json"
        );
    }

    #[test]
    fn missing_target_is_reported() {
        let targets = WatchTargets {
            directories: vec![PathBuf::from("/definitely/not/here")],
            ..Default::default()
        };
        let err = FileWatcher::new(targets).err().unwrap();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
