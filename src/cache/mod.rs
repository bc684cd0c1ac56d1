//! Domain cache for categories, transactions and the summary
//!
//! The cache is a client-side mirror. It is refreshed by re-fetching after
//! every mutation; the only in-place edit is the category patch applied from
//! an update response. All mutation goes through [`crate::store::Store`].

pub mod model;
pub mod state;

pub use model::{
    Category, CategoryPayload, Credentials, ResourceId, Summary, TokenGrant, Transaction,
    TransactionKind, TransactionPayload, DEFAULT_CATEGORY_COLOR,
};
pub use state::CacheState;
