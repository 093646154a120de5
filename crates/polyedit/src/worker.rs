//! Background computation contract and the repaint animator.
//!
//! A `Job` runs a closure over a scene snapshot on its own thread. The editor
//! owns at most one job and cancels it (blocking until the thread exits)
//! whenever a transaction starts or the scene changes. A finished result is
//! visible only while the scene revision still matches the snapshot's.
//!
//! The worker polls `JobCtl::is_cancelled` and reports progress through
//! `JobCtl::set_progress`; `None` from the closure means "gave up".

use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::scene::Scene;

/// Progress value for "running, amount unknown".
pub const INDETERMINATE: i32 = -1;

/// Worker-side handle: cancellation flag and progress report.
#[derive(Clone, Debug)]
pub struct JobCtl {
    cancel: Arc<AtomicBool>,
    progress: Arc<AtomicI32>,
}

impl JobCtl {
    fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            progress: Arc::new(AtomicI32::new(INDETERMINATE)),
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Percent in [0, 100]; negative values mean indeterminate.
    pub fn set_progress(&self, pct: i32) {
        let v = if pct < 0 { INDETERMINATE } else { pct.min(100) };
        self.progress.store(v, Ordering::Release);
    }
}

pub struct Job<T> {
    ctl: JobCtl,
    revision: u64,
    handle: Option<JoinHandle<Option<T>>>,
    result: Option<T>,
}

impl<T: Send + 'static> Job<T> {
    /// Start `work` on a snapshot of `scene`.
    pub fn spawn<F>(name: &str, scene: &Scene, work: F) -> io::Result<Self>
    where
        F: FnOnce(&Scene, &JobCtl) -> Option<T> + Send + 'static,
    {
        let ctl = JobCtl::new();
        let snapshot = scene.clone();
        let worker_ctl = ctl.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || work(&snapshot, &worker_ctl))?;
        debug!(job = name, revision = scene.revision(), "job started");
        Ok(Self {
            ctl,
            revision: scene.revision(),
            handle: Some(handle),
            result: None,
        })
    }

    /// Revision of the snapshot the job works on.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn progress(&self) -> i32 {
        self.ctl.progress.load(Ordering::Acquire)
    }

    /// Collect the outcome if the thread has exited; true once collected.
    pub fn poll(&mut self) -> bool {
        if self.handle.as_ref().is_some_and(|h| h.is_finished()) {
            self.join();
        }
        self.handle.is_none()
    }

    /// Result of a successful run on an unchanged scene.
    pub fn result(&self, current_revision: u64) -> Option<&T> {
        if current_revision != self.revision || self.ctl.is_cancelled() {
            return None;
        }
        self.result.as_ref()
    }

    /// Signal cancellation and block until the worker exits.
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.handle.is_some() {
            self.ctl.cancel.store(true, Ordering::Release);
            self.join();
            debug!(revision = self.revision, "job cancelled");
        }
        self.result = None;
    }

    fn join(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        match handle.join() {
            Ok(out) => {
                if out.is_some() {
                    self.ctl.set_progress(100);
                }
                self.result = out;
            }
            Err(_) => warn!(revision = self.revision, "job panicked"),
        }
    }
}

impl<T> Drop for Job<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.ctl.cancel.store(true, Ordering::Release);
            let _ = handle.join();
        }
    }
}

/// Fixed-period repaint ticker. Never touches the scene.
pub struct Animator {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Animator {
    pub fn start<F>(period: Duration, mut repaint: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let handle = thread::Builder::new()
            .name("polyedit-animator".to_string())
            .spawn(move || {
                while !flag.load(Ordering::Acquire) {
                    repaint();
                    thread::park_timeout(period);
                }
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.halt();
    }
}
