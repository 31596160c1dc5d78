//! Owner of the doctor list shown by a directory view.
//!
//! Every parameter change issues exactly one fetch. A newer fetch cancels the
//! one in flight, and results are tagged with a generation so a late answer
//! for old parameters is dropped instead of overwriting newer state.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::contract::model::{Doctor, DoctorQuery, SortKey};
use crate::domain::service::Service;

/// Snapshot published to subscribers.
#[derive(Debug, Clone, Default)]
pub struct DirectoryState {
    pub params: DoctorQuery,
    pub doctors: Vec<Doctor>,
    pub loading: bool,
    pub error: Option<String>,
    /// Incremented for every issued fetch.
    pub generation: u64,
}

struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

pub struct DirectoryController {
    service: Arc<Service>,
    state: watch::Sender<DirectoryState>,
    in_flight: Mutex<InFlight>,
}

impl DirectoryController {
    /// Create the controller and issue the initial fetch. Must run inside a Tokio runtime.
    pub fn new(service: Arc<Service>, params: DoctorQuery) -> Self {
        let (state, _) = watch::channel(DirectoryState::default());
        let this = Self {
            service,
            state,
            in_flight: Mutex::new(InFlight {
                generation: 0,
                cancel: CancellationToken::new(),
            }),
        };
        this.issue(params);
        this
    }

    /// Replace all parameters. Returns false (and fetches nothing) when they are unchanged.
    pub fn set_params(&self, params: DoctorQuery) -> bool {
        if self.state.borrow().params == params {
            return false;
        }
        self.issue(params);
        true
    }

    pub fn set_search_text(&self, text: impl Into<String>) -> bool {
        let params = self.state.borrow().params.clone().with_search_text(text);
        self.set_params(params)
    }

    pub fn set_region(&self, region: impl Into<String>) -> bool {
        let params = self.state.borrow().params.clone().with_region(region);
        self.set_params(params)
    }

    pub fn set_sort(&self, sort: SortKey) -> bool {
        let params = self.state.borrow().params.clone().with_sort(sort);
        self.set_params(params)
    }

    /// Fetch again with the current parameters.
    pub fn refetch(&self) {
        let params = self.state.borrow().params.clone();
        self.issue(params);
    }

    pub fn state(&self) -> DirectoryState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DirectoryState> {
        self.state.subscribe()
    }

    fn issue(&self, params: DoctorQuery) {
        let mut in_flight = self.in_flight.lock();
        in_flight.cancel.cancel();
        in_flight.generation += 1;
        in_flight.cancel = CancellationToken::new();

        let generation = in_flight.generation;
        let cancel = in_flight.cancel.clone();
        self.state.send_modify(|s| {
            s.params = params.clone();
            s.loading = true;
            s.error = None;
            s.generation = generation;
        });
        drop(in_flight);

        let service = self.service.clone();
        let state = self.state.clone();
        tokio::spawn(async move {
            let _loading = LoadingGuard {
                state: state.clone(),
                generation,
            };
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(generation, "directory fetch cancelled");
                }
                res = service.search_doctors(params) => {
                    state.send_if_modified(|s| {
                        if s.generation != generation {
                            return false;
                        }
                        match res {
                            Ok(doctors) => {
                                s.doctors = doctors;
                                s.error = None;
                            }
                            Err(e) => s.error = Some(e.to_string()),
                        }
                        s.loading = false;
                        true
                    });
                }
            }
        });
    }
}

impl Drop for DirectoryController {
    fn drop(&mut self) {
        self.in_flight.lock().cancel.cancel();
    }
}

/// Clears `loading` when the fetch that set it finishes, on every path.
struct LoadingGuard {
    state: watch::Sender<DirectoryState>,
    generation: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if s.generation == self.generation && s.loading {
                s.loading = false;
                true
            } else {
                false
            }
        });
    }
}
