//! Running a search on its own thread so the caller stays responsive.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use log::{debug, warn};

use super::{Algorithm, CancelToken, SearchReport, Solver};
use crate::state::State;

/// A search running on a worker thread.
///
/// Dropping the handle cancels the search and waits for the worker to stop.
pub struct BackgroundSearch {
    cancel: CancelToken,
    results: Receiver<SearchReport>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundSearch {
    pub(super) fn spawn(solver: Solver, initial: State, algorithm: Algorithm) -> Self {
        let cancel = CancelToken::new();
        let (sender, results) = bounded(1);
        let token = cancel.clone();
        let worker = thread::spawn(move || {
            let report = solver.run(&initial, algorithm, &token);
            if sender.send(report).is_err() {
                debug!("{algorithm} result dropped: nobody is waiting for it");
            }
        });
        Self {
            cancel,
            results,
            worker: Some(worker),
        }
    }

    /// Ask the worker to stop at its next expansion.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Block until the search finishes. `None` if the worker died without reporting.
    pub fn wait(mut self) -> Option<SearchReport> {
        let report = self.results.recv().ok();
        self.join();
        report
    }

    /// Wait up to `timeout`; on expiry cancel the search and collect its
    /// [`Canceled`](super::SearchResult::Canceled) report instead.
    pub fn wait_timeout(mut self, timeout: Duration) -> Option<SearchReport> {
        let report = match self.results.recv_timeout(timeout) {
            Ok(report) => Some(report),
            Err(RecvTimeoutError::Timeout) => {
                debug!("Search still running after {timeout:?}, canceling");
                self.cancel();
                self.results.recv().ok()
            }
            Err(RecvTimeoutError::Disconnected) => None,
        };
        self.join();
        report
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Search worker panicked");
            }
        }
    }
}

impl Drop for BackgroundSearch {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.cancel();
            self.join();
        }
    }
}

impl Solver {
    /// Start a search on a new thread.
    pub fn spawn(&self, initial: State, algorithm: Algorithm) -> BackgroundSearch {
        BackgroundSearch::spawn(*self, initial, algorithm)
    }
}
