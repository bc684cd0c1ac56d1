//! In-memory mirror of server-held resources

use super::model::{Category, ResourceId, Summary, Transaction};
use serde::Serialize;

/// Everything the store caches for the current session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheState {
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
}

impl CacheState {
    /// True when nothing is cached and the summary is zeroed
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.transactions.is_empty()
            && self.summary == Summary::default()
    }

    /// Drop all cached data
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace the cached entry with the same id. Returns whether one matched.
    pub fn patch_category(&mut self, updated: Category) -> bool {
        match self.categories.iter_mut().find(|c| c.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn category(&self, id: ResourceId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn transaction(&self, id: ResourceId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }
}
