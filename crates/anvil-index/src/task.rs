use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use tracing::error;

use crate::error::{IndexError, ScanError};
use crate::TARGET;

enum TaskState<T> {
    Pending(JoinHandle<Result<T, ScanError>>),
    Ready(Result<Arc<T>, IndexError>),
}

/// One-shot handle to an index computation running on a background thread.
///
/// The first `wait()` joins the thread and caches the outcome; every later
/// `wait()` hands back the same snapshot (or the same error) without
/// re-running anything. There is no cancellation and no timeout.
pub struct IndexTask<T> {
    state: Mutex<TaskState<T>>,
}

impl<T: Send + 'static> IndexTask<T> {
    /// Run `f` on a dedicated background thread.
    pub fn spawn<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, ScanError> + Send + 'static,
    {
        IndexTask {
            state: Mutex::new(TaskState::Pending(std::thread::spawn(f))),
        }
    }

    /// Block until the computation finishes and return the shared result.
    ///
    /// A computation that returned an error or panicked surfaces as
    /// [`IndexError`] here, at first access, and again at every subsequent
    /// access.
    pub fn wait(&self) -> Result<Arc<T>, IndexError> {
        let mut state = self.lock_state();
        if let TaskState::Ready(result) = &*state {
            return result.clone();
        }

        // Holding the lock across the join keeps concurrent waiters blocked
        // until the outcome is cached.
        let pending = mem::replace(&mut *state, TaskState::Ready(Err(IndexError::Panicked)));
        let TaskState::Pending(handle) = pending else {
            unreachable!("pending state checked above");
        };
        let result = match handle.join() {
            Ok(Ok(value)) => Ok(Arc::new(value)),
            Ok(Err(scan)) => {
                error!(target: TARGET, error = %scan, "background index build failed");
                Err(IndexError::failed(&scan))
            }
            Err(_) => {
                error!(target: TARGET, "background index build panicked");
                Err(IndexError::Panicked)
            }
        };
        *state = TaskState::Ready(result.clone());
        result
    }

    /// True once the background thread has run to completion, whether or not
    /// anyone has observed the outcome yet.
    pub fn is_finished(&self) -> bool {
        match &*self.lock_state() {
            TaskState::Pending(handle) => handle.is_finished(),
            TaskState::Ready(_) => true,
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, TaskState<T>> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for IndexTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexTask").finish_non_exhaustive()
    }
}
