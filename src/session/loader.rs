use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, error, info};

use crate::LapchartError;

use super::provider::TelemetryProvider;
use super::{LapRecord, SessionRequest};

/// Memoization store for loaded sessions, keyed by the exact request.
pub trait LapCache: Send + Sync {
    fn get(&self, request: &SessionRequest) -> Option<Arc<[LapRecord]>>;

    fn insert(&self, request: SessionRequest, laps: Arc<[LapRecord]>);

    /// Drop a single request so the next load goes back to the provider
    fn invalidate(&self, request: &SessionRequest);

    fn clear(&self);
}

/// Process-wide in-memory `LapCache`. Entries live until invalidated.
#[derive(Default)]
pub struct MemoryLapCache {
    entries: Mutex<HashMap<SessionRequest, Arc<[LapRecord]>>>,
}

impl MemoryLapCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LapCache for MemoryLapCache {
    fn get(&self, request: &SessionRequest) -> Option<Arc<[LapRecord]>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(request)
            .cloned()
    }

    fn insert(&self, request: SessionRequest, laps: Arc<[LapRecord]>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request, laps);
    }

    fn invalidate(&self, request: &SessionRequest) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(request);
    }

    fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Result of a session load. Provider errors never escape the loader, they
/// are turned into `Failed` with a message fit for display.
#[derive(Clone, Debug)]
pub enum LoadOutcome {
    Laps(Arc<[LapRecord]>),
    Empty,
    Failed { message: String },
}

impl LoadOutcome {
    fn from_laps(laps: Arc<[LapRecord]>) -> Self {
        if laps.is_empty() {
            Self::Empty
        } else {
            Self::Laps(laps)
        }
    }
}

pub struct SessionLoader {
    provider: Box<dyn TelemetryProvider>,
    cache: Arc<dyn LapCache>,
}

impl SessionLoader {
    pub fn new(provider: impl TelemetryProvider + 'static, cache: Arc<dyn LapCache>) -> Self {
        Self {
            provider: Box::new(provider),
            cache,
        }
    }

    /// Loads the laps for `request`, serving repeated requests from the cache.
    ///
    /// Successful loads are memoized, empty ones included. Failures are not, so
    /// a new load action retries the provider.
    pub fn load(&self, request: &SessionRequest) -> LoadOutcome {
        if let Some(laps) = self.cache.get(request) {
            debug!("Serving {} from the session cache", request);
            return LoadOutcome::from_laps(laps);
        }

        match self.fetch(request) {
            Ok(laps) => {
                let laps: Arc<[LapRecord]> = laps.into();
                self.cache.insert(request.clone(), laps.clone());
                LoadOutcome::from_laps(laps)
            }
            Err(e) => {
                error!("Could not load session {}: {}", request, e);
                LoadOutcome::Failed {
                    message: format!("Could not load {}: {}", request, e),
                }
            }
        }
    }

    pub fn invalidate(&self, request: &SessionRequest) {
        self.cache.invalidate(request);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn fetch(&self, request: &SessionRequest) -> Result<Vec<LapRecord>, LapchartError> {
        let session = self
            .provider
            .session(request.year, &request.race, request.kind)?;
        info!(
            "Resolved {} to provider session {} ({})",
            request, session.key, session.name
        );
        self.provider.load_laps(&session)
    }
}
