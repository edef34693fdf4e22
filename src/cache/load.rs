//! Lazily populated load cells with an explicit load status.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::OnceCell;

/// Where a cell is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    NotLoaded,
    Loading,
    Loaded,
}

/// A value that is loaded at most once and then kept for the process lifetime.
///
/// Concurrent callers share one in-flight load. A failed load leaves the cell
/// empty, so the next caller tries again. An empty value is still a loaded
/// value.
#[derive(Debug)]
pub struct LoadCell<T> {
    value: OnceCell<T>,
    in_flight: Arc<AtomicUsize>,
}

impl<T> Default for LoadCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LoadCell<T> {
    pub fn new() -> Self {
        Self {
            value: OnceCell::new(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The loaded value, without triggering a load.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn status(&self) -> LoadStatus {
        if self.value.initialized() {
            LoadStatus::Loaded
        } else if self.in_flight.load(Ordering::Acquire) > 0 {
            LoadStatus::Loading
        } else {
            LoadStatus::NotLoaded
        }
    }

    /// Return the loaded value, running `load` if nothing is loaded yet.
    pub async fn get_or_try_load<F, Fut, E>(&self, load: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let _guard = InFlightGuard::enter(&self.in_flight);
        self.value.get_or_try_init(load).await
    }
}

struct InFlightGuard {
    counter: Arc<AtomicUsize>,
}

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}
