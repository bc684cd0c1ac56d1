//! Fetch and mutate cached resources

use super::{DeleteOutcome, DomainConflict, Store};
use crate::cache::{
    Category, CategoryPayload, ResourceId, Summary, Transaction, TransactionPayload,
};
use crate::error::TallyResult;
use crate::policy::{self, FailureClass, Operation};
use crate::transport::{Body, Method};
use tracing::{debug, info, warn};

const CATEGORIES: &str = "/categories/";
const TRANSACTIONS: &str = "/transactions/";
const SUMMARY: &str = "/summary/";

fn category_path(id: ResourceId) -> String {
    format!("/categories/{}", id)
}

fn transaction_path(id: ResourceId) -> String {
    format!("/transactions/{}", id)
}

impl Store {
    // --- Reads ---

    pub async fn fetch_categories(&self) -> TallyResult<()> {
        self.policed(Operation::FetchCategories, self.pull_categories())
            .await
    }

    pub async fn fetch_transactions(&self) -> TallyResult<()> {
        self.policed(Operation::FetchTransactions, self.pull_transactions())
            .await
    }

    pub async fn fetch_summary(&self) -> TallyResult<()> {
        self.policed(Operation::FetchSummary, self.pull_summary())
            .await
    }

    /// Fetch categories, transactions and summary concurrently.
    ///
    /// Does nothing without a session. The three results are applied
    /// together; if any request fails none of them is applied and the
    /// failure goes through the policy once.
    pub async fn load_all(&self) -> TallyResult<()> {
        if !self.is_authenticated() {
            debug!("Skipping data load: no session");
            return Ok(());
        }
        self.policed(Operation::LoadAll, self.pull_all()).await
    }

    // --- Categories ---

    /// Create a category and refresh the category list
    pub async fn add_category(&self, payload: &CategoryPayload) -> TallyResult<Category> {
        let _guard = self.inflight.acquire(Operation::AddCategory, None)?;
        self.policed(Operation::AddCategory, async {
            let response = self
                .send(Method::Post, CATEGORIES, Body::Json(serde_json::to_value(payload)?))
                .await?;
            self.pull_categories().await?;
            response.json()
        })
        .await
    }

    /// Update a category.
    ///
    /// The cached entry is patched from the server's echo before the list is
    /// re-fetched, so views see the change without waiting for the refresh.
    pub async fn update_category(
        &self,
        id: ResourceId,
        payload: &CategoryPayload,
    ) -> TallyResult<Category> {
        let _guard = self.inflight.acquire(Operation::UpdateCategory, Some(id))?;
        self.policed(Operation::UpdateCategory, async {
            let epoch = self.current_epoch();
            let updated: Category = self
                .send(
                    Method::Put,
                    &category_path(id),
                    Body::Json(serde_json::to_value(payload)?),
                )
                .await?
                .json()?;

            let patch = updated.clone();
            self.apply(epoch, |cache| {
                if !cache.patch_category(patch) {
                    debug!("Category {} not cached; nothing to patch", id);
                }
            });

            self.pull_categories().await.map(|()| updated)
        })
        .await
    }

    /// Delete a category.
    ///
    /// A 400/409 answer means transactions still reference it: the result is
    /// [`DeleteOutcome::Blocked`], the session and cache are left alone.
    pub async fn delete_category(&self, id: ResourceId) -> TallyResult<DeleteOutcome> {
        let operation = Operation::DeleteCategory;
        let _guard = self.inflight.acquire(operation, Some(id))?;
        let epoch = self.current_epoch();

        if let Err(err) = self.send(Method::Delete, &category_path(id), Body::Empty).await {
            if policy::classify(operation, &err) == FailureClass::DomainConflict {
                let conflict = DomainConflict::from_error(&err);
                warn!("Category {} not deleted: {}", id, conflict);
                return Ok(DeleteOutcome::Blocked(conflict));
            }
            return Err(self.handle_failure(operation, epoch, err).await);
        }

        info!("Deleted category {}", id);
        self.policed(operation, self.pull_categories()).await?;
        Ok(DeleteOutcome::Deleted)
    }

    // --- Transactions ---

    /// Create a transaction, then refresh transactions and summary
    pub async fn add_transaction(&self, payload: &TransactionPayload) -> TallyResult<Transaction> {
        let _guard = self.inflight.acquire(Operation::AddTransaction, None)?;
        self.policed(Operation::AddTransaction, async {
            let response = self
                .send(
                    Method::Post,
                    TRANSACTIONS,
                    Body::Json(serde_json::to_value(payload)?),
                )
                .await?;
            self.pull_ledger().await?;
            response.json()
        })
        .await
    }

    /// Update a transaction, then refresh transactions and summary
    pub async fn update_transaction(
        &self,
        id: ResourceId,
        payload: &TransactionPayload,
    ) -> TallyResult<Transaction> {
        let _guard = self.inflight.acquire(Operation::UpdateTransaction, Some(id))?;
        self.policed(Operation::UpdateTransaction, async {
            let response = self
                .send(
                    Method::Put,
                    &transaction_path(id),
                    Body::Json(serde_json::to_value(payload)?),
                )
                .await?;
            self.pull_ledger().await?;
            response.json()
        })
        .await
    }

    /// Delete a transaction, then refresh transactions and summary
    pub async fn delete_transaction(&self, id: ResourceId) -> TallyResult<()> {
        let _guard = self.inflight.acquire(Operation::DeleteTransaction, Some(id))?;
        self.policed(Operation::DeleteTransaction, async {
            self.send(Method::Delete, &transaction_path(id), Body::Empty)
                .await?;
            info!("Deleted transaction {}", id);
            self.pull_ledger().await
        })
        .await
    }

    // --- Unpoliced fetch-and-replace ---

    async fn pull_categories(&self) -> TallyResult<()> {
        let epoch = self.current_epoch();
        let categories: Vec<Category> = self.get(CATEGORIES).await?;
        debug!("Fetched {} categories", categories.len());
        self.apply(epoch, |cache| cache.categories = categories);
        Ok(())
    }

    async fn pull_transactions(&self) -> TallyResult<()> {
        let epoch = self.current_epoch();
        let transactions: Vec<Transaction> = self.get(TRANSACTIONS).await?;
        debug!("Fetched {} transactions", transactions.len());
        self.apply(epoch, |cache| cache.transactions = transactions);
        Ok(())
    }

    async fn pull_summary(&self) -> TallyResult<()> {
        let epoch = self.current_epoch();
        let summary: Summary = self.get(SUMMARY).await?;
        self.apply(epoch, |cache| cache.summary = summary);
        Ok(())
    }

    /// Transactions and summary, fetched concurrently and applied together
    async fn pull_ledger(&self) -> TallyResult<()> {
        let epoch = self.current_epoch();
        let (transactions, summary) = tokio::try_join!(
            self.get::<Vec<Transaction>>(TRANSACTIONS),
            self.get::<Summary>(SUMMARY),
        )?;
        self.apply(epoch, |cache| {
            cache.transactions = transactions;
            cache.summary = summary;
        });
        Ok(())
    }

    async fn pull_all(&self) -> TallyResult<()> {
        let epoch = self.current_epoch();
        let (categories, transactions, summary) = tokio::try_join!(
            self.get::<Vec<Category>>(CATEGORIES),
            self.get::<Vec<Transaction>>(TRANSACTIONS),
            self.get::<Summary>(SUMMARY),
        )?;
        debug!(
            "Loaded {} categories, {} transactions",
            categories.len(),
            transactions.len()
        );
        self.apply(epoch, |cache| {
            cache.categories = categories;
            cache.transactions = transactions;
            cache.summary = summary;
        });
        Ok(())
    }
}
