//! Tally - session and data cache coordinator for a personal-finance API
//!
//! [`store::Store`] owns the session token and a client-side mirror of the
//! user's categories, transactions and balance summary. Views and commands
//! call it and read its cache; it decides when to re-fetch, when a failure
//! ends the session, and where to navigate next.

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod inflight;
pub mod navigation;
pub mod policy;
pub mod session;
pub mod store;
pub mod transport;
pub mod ui;

pub use error::{TallyError, TallyResult};
