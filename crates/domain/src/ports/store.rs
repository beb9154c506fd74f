use crate::sign_up::{SignUpDocument, StoredSignUp};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),

    #[error("store responded with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("store returned an unexpected payload: {0}")]
    Payload(String),
}

/// Search-indexed persistence for sign-up records.
#[async_trait]
pub trait SignUpStore: Send + Sync {
    /// Whether a record with this id exists.
    async fn exists(&self, sign_up_id: &str) -> Result<bool, StoreError>;

    /// Looks for an existing record matching either contact point. At most
    /// one hit matters; which one wins on multiple matches is left to the
    /// store's own ordering.
    async fn find_by_contact(
        &self,
        cellphone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<StoredSignUp>, StoreError>;

    /// Merges the partial document into the record with this id, creating it
    /// when absent. Fields missing from `document` keep their stored value.
    async fn upsert(&self, sign_up_id: &str, document: &SignUpDocument) -> Result<(), StoreError>;
}
