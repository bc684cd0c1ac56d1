//! Failure classification for store operations
//!
//! Every domain cache failure is sorted into one of three classes. The store
//! acts on the class: a rejected credential ends the session, a referential
//! conflict becomes a warning, anything else propagates untouched.

use crate::error::TallyError;
use std::fmt;

/// Message shown when a category cannot be deleted
pub const CONFLICT_WARNING: &str = "cannot delete: linked records exist";

/// Store actions, used for failure classification and in-flight tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    LoadAll,
    FetchCategories,
    FetchTransactions,
    FetchSummary,
    AddCategory,
    UpdateCategory,
    DeleteCategory,
    AddTransaction,
    UpdateTransaction,
    DeleteTransaction,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Register => "register",
            Operation::LoadAll => "load-all",
            Operation::FetchCategories => "fetch-categories",
            Operation::FetchTransactions => "fetch-transactions",
            Operation::FetchSummary => "fetch-summary",
            Operation::AddCategory => "add-category",
            Operation::UpdateCategory => "update-category",
            Operation::DeleteCategory => "delete-category",
            Operation::AddTransaction => "add-transaction",
            Operation::UpdateTransaction => "update-transaction",
            Operation::DeleteTransaction => "delete-transaction",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a failure is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Credential rejected: log out, then propagate
    SessionInvalid,
    /// Delete blocked by referencing records: warn, do not propagate
    DomainConflict,
    /// Propagate unchanged
    Other,
}

/// Classify a failure of `operation`
pub fn classify(operation: Operation, err: &TallyError) -> FailureClass {
    match (operation, err.status()) {
        (_, Some(401)) => FailureClass::SessionInvalid,
        (Operation::DeleteCategory, Some(400 | 409)) => FailureClass::DomainConflict,
        _ => FailureClass::Other,
    }
}

/// A mutation the server refused because other data references the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConflict {
    /// User-facing warning
    pub message: String,
    /// Server explanation, when it sent one
    pub detail: Option<String>,
}

impl DomainConflict {
    pub fn from_error(err: &TallyError) -> Self {
        Self {
            message: CONFLICT_WARNING.to_string(),
            detail: err.detail(),
        }
    }
}

impl fmt::Display for DomainConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail {
            Some(ref detail) => write!(f, "{} ({})", self.message, detail),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of a delete that may be refused for referential reasons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Blocked(DomainConflict),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}
