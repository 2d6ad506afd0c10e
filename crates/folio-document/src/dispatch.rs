// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback execution contexts.
//
// Engines finish asynchronous saves on their own worker threads. Completions
// are handed to a `CallbackContext`, which decides where they actually run:
// inline on the worker, or on the host's UI/main thread through a `MainLoop`.

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Unit of work scheduled onto a context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where save completions are executed.
pub trait CallbackContext: Send + Sync {
    fn name(&self) -> &str;

    /// Schedule `job` to run on this context.
    fn dispatch(&self, job: Job);
}

/// Runs every job immediately on the delivering thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineContext;

impl CallbackContext for InlineContext {
    fn name(&self) -> &str {
        "inline"
    }

    fn dispatch(&self, job: Job) {
        job();
    }
}

/// Sending half of the main execution context.
///
/// Jobs queue up until the host drives the paired [`MainLoop`].
#[derive(Debug, Clone)]
pub struct MainContext {
    tx: mpsc::UnboundedSender<Job>,
}

impl CallbackContext for MainContext {
    fn name(&self) -> &str {
        "main"
    }

    fn dispatch(&self, job: Job) {
        if self.tx.send(job).is_err() {
            warn!("main loop is gone, completion dropped");
        }
    }
}

/// Receiving half of the main execution context, driven on the main thread.
#[derive(Debug)]
pub struct MainLoop {
    rx: mpsc::UnboundedReceiver<Job>,
}

/// Create a connected main context and its loop.
pub fn main_context() -> (MainContext, MainLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MainContext { tx }, MainLoop { rx })
}

impl MainLoop {
    /// Run jobs until every [`MainContext`] has been dropped.
    pub async fn run(&mut self) {
        while self.turn().await {}
        debug!("main loop finished");
    }

    /// Wait for and run one job. Returns `false` once no sender remains.
    pub async fn turn(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run every job that is already queued without waiting.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}
