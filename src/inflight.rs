//! Duplicate-submission guard
//!
//! Mutating store actions register a marker keyed by operation and target id
//! for as long as they run. A second submission with the same key fails fast
//! with [`TallyError::Busy`] instead of racing the first.

use crate::cache::ResourceId;
use crate::error::{TallyError, TallyResult};
use crate::policy::Operation;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Marker key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InFlightKey {
    pub operation: Operation,
    pub target: Option<ResourceId>,
}

impl InFlightKey {
    fn describe(&self) -> String {
        match self.target {
            Some(id) => format!("{} {}", self.operation, id),
            None => self.operation.to_string(),
        }
    }
}

/// Set of outstanding mutations
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<InFlightKey>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `operation` on `target`. The marker is held until the guard drops.
    pub fn acquire(
        &self,
        operation: Operation,
        target: Option<ResourceId>,
    ) -> TallyResult<InFlightGuard> {
        let key = InFlightKey { operation, target };

        if !self.active.lock().insert(key) {
            debug!("Rejected duplicate submission: {}", key.describe());
            return Err(TallyError::Busy {
                operation: key.describe(),
            });
        }

        Ok(InFlightGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    /// Whether `operation` on `target` is currently running
    pub fn is_active(&self, operation: Operation, target: Option<ResourceId>) -> bool {
        self.active
            .lock()
            .contains(&InFlightKey { operation, target })
    }
}

/// Releases its marker on drop
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<InFlightKey>>>,
    key: InFlightKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.lock().remove(&self.key);
    }
}
