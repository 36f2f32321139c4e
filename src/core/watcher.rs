//! Debounced filesystem watching for one repository.
//!
//! A [`ChangeWatcher`] turns bursts of filesystem events into a single "repository may have
//! changed" callback. Events are filtered on notify's thread, then forwarded to a tokio task
//! that owns the one resettable debounce timer.

use notify::event::{AccessKind, AccessMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Entries directly under the git dir whose change means repository state moved
const GIT_DIR_ALLOW_LIST: [&str; 4] = ["index", "HEAD", "MERGE_HEAD", "COMMIT_EDITMSG"];
const DEPENDENCY_DIRS: [&str; 2] = ["node_modules", "bower_components"];
const OS_ARTIFACTS: [&str; 3] = ["Thumbs.db", "desktop.ini", ".DS_Store"];

pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;
type CallbackSlot = Arc<Mutex<Option<ChangeCallback>>>;

pub struct ChangeWatcher {
    workdir: PathBuf,
    git_dir: PathBuf,
    debounce: Duration,
    callback: CallbackSlot,
    watcher: Option<RecommendedWatcher>,
    task: Option<JoinHandle<()>>,
}

impl ChangeWatcher {
    pub fn new(workdir: impl Into<PathBuf>, git_dir: impl Into<PathBuf>, debounce: Duration) -> Self {
        let workdir = workdir.into();
        let git_dir = git_dir.into();
        Self {
            workdir: workdir.canonicalize().unwrap_or(workdir),
            git_dir: git_dir.canonicalize().unwrap_or(git_dir),
            debounce,
            callback: Arc::new(Mutex::new(None)),
            watcher: None,
            task: None,
        }
    }

    /// Replace the notification target. Watches keep running.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if let Ok(mut slot) = self.callback.lock() {
            *slot = Some(Arc::new(callback));
        }
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Begin watching. Must be called from within a tokio runtime.
    ///
    /// Returns whether live updates are active; a watch that cannot be established is
    /// logged and the caller falls back to manual refresh.
    pub fn start(&mut self) -> bool {
        self.stop();

        let (tx, rx) = unbounded_channel::<()>();
        let workdir = self.workdir.clone();
        let git_dir = self.git_dir.clone();
        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                if is_relevant_event(&workdir, &git_dir, &event) {
                    let _ = tx.send(());
                }
            }
            Err(e) => log::debug!("watch error: {e}"),
        });

        let mut watcher = match watcher {
            Ok(watcher) => watcher,
            Err(e) => {
                log::warn!("file watching unavailable: {e}");
                return false;
            }
        };

        if let Err(e) = watcher.watch(&self.workdir, RecursiveMode::Recursive) {
            log::warn!("could not watch {}: {e}", self.workdir.display());
            return false;
        }
        if !self.git_dir.starts_with(&self.workdir) {
            if let Err(e) = watcher.watch(&self.git_dir, RecursiveMode::Recursive) {
                log::warn!("could not watch {}: {e}", self.git_dir.display());
            }
        }

        log::debug!("watching {}", self.workdir.display());
        self.task = Some(spawn_debounce_loop(rx, self.debounce, Arc::clone(&self.callback)));
        self.watcher = Some(watcher);
        true
    }

    /// Drop all watches and any pending notification.
    pub fn stop(&mut self) {
        self.watcher = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Collapse signals on `rx` into callbacks fired after `delay` of quiet.
fn spawn_debounce_loop(
    mut rx: UnboundedReceiver<()>,
    delay: Duration,
    slot: CallbackSlot,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            let timer = tokio::time::sleep(delay);
            tokio::pin!(timer);
            loop {
                tokio::select! {
                    _ = &mut timer => break,
                    signal = rx.recv() => match signal {
                        Some(()) => timer.as_mut().reset(Instant::now() + delay),
                        None => return,
                    },
                }
            }

            let callback = slot.lock().ok().and_then(|slot| slot.clone());
            if let Some(callback) = callback {
                callback();
            }
        }
    })
}

fn is_relevant_event(workdir: &Path, git_dir: &Path, event: &notify::Event) -> bool {
    match &event.kind {
        notify::EventKind::Access(AccessKind::Close(AccessMode::Write)) => {}
        notify::EventKind::Access(_) => return false,
        _ => {}
    }
    event
        .paths
        .iter()
        .any(|path| is_relevant_path(workdir, git_dir, path))
}

fn is_relevant_path(workdir: &Path, git_dir: &Path, path: &Path) -> bool {
    if let Ok(rel) = path.strip_prefix(git_dir) {
        return rel.starts_with("refs")
            || GIT_DIR_ALLOW_LIST
                .iter()
                .any(|name| rel == Path::new(name));
    }

    let Ok(rel) = path.strip_prefix(workdir) else {
        return false;
    };

    !rel.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            let name: &str = &name;
            name.starts_with('.') || DEPENDENCY_DIRS.contains(&name) || OS_ARTIFACTS.contains(&name)
        }
        _ => false,
    })
}
