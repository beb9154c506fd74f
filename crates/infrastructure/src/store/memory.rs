use async_trait::async_trait;
use identity_domain::ports::{SignUpStore, StoreError};
use identity_domain::{SignUpDocument, StoredSignUp};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory [`SignUpStore`] with the same merge-on-upsert and
/// match-either-contact semantics as the indexed store. BTreeMap keeps
/// lookups deterministic for tests.
#[derive(Clone, Default)]
pub struct MemorySignUpStore {
    documents: Arc<RwLock<BTreeMap<String, SignUpDocument>>>,
}

impl MemorySignUpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, sign_up_id: &str) -> Option<SignUpDocument> {
        self.documents.read().get(sign_up_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

fn merge(existing: &mut SignUpDocument, incoming: &SignUpDocument) {
    if incoming.cellphone.is_some() {
        existing.cellphone = incoming.cellphone.clone();
    }
    if incoming.email.is_some() {
        existing.email = incoming.email.clone();
    }
    if incoming.validation_channel.is_some() {
        existing.validation_channel = incoming.validation_channel;
    }
    if incoming.created_at.is_some() {
        existing.created_at = incoming.created_at;
    }
    if incoming.updated_at.is_some() {
        existing.updated_at = incoming.updated_at;
    }
    if incoming.signed_up_at.is_some() {
        existing.signed_up_at = incoming.signed_up_at;
    }
}

#[async_trait]
impl SignUpStore for MemorySignUpStore {
    async fn exists(&self, sign_up_id: &str) -> Result<bool, StoreError> {
        Ok(self.documents.read().contains_key(sign_up_id))
    }

    async fn find_by_contact(
        &self,
        cellphone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<StoredSignUp>, StoreError> {
        if cellphone.is_none() && email.is_none() {
            return Ok(None);
        }
        let documents = self.documents.read();
        let hit = documents.iter().find(|(_, doc)| {
            let cellphone_matches = match (cellphone, &doc.cellphone) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
            let email_matches = match (email, &doc.email) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
            cellphone_matches || email_matches
        });
        Ok(hit.map(|(id, doc)| StoredSignUp {
            sign_up_id: id.clone(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            signed_up_at: doc.signed_up_at,
        }))
    }

    async fn upsert(&self, sign_up_id: &str, document: &SignUpDocument) -> Result<(), StoreError> {
        let mut documents = self.documents.write();
        match documents.get_mut(sign_up_id) {
            Some(existing) => merge(existing, document),
            None => {
                documents.insert(sign_up_id.to_string(), document.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use identity_domain::ValidationChannel;

    fn doc(cellphone: Option<&str>, email: Option<&str>) -> SignUpDocument {
        SignUpDocument {
            cellphone: cellphone.map(str::to_string),
            email: email.map(str::to_string),
            validation_channel: Some(ValidationChannel::Cellphone),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
            signed_up_at: None,
        }
    }

    #[tokio::test]
    async fn upsert_merges_instead_of_replacing() {
        let store = MemorySignUpStore::new();
        store
            .upsert("id-1", &doc(Some("+5551234567"), None))
            .await
            .unwrap();
        // Second write carries only an email; the cellphone must survive.
        let partial = SignUpDocument {
            email: Some("lead@example.com".to_string()),
            ..Default::default()
        };
        store.upsert("id-1", &partial).await.unwrap();

        let merged = store.document("id-1").unwrap();
        assert_eq!(merged.cellphone.as_deref(), Some("+5551234567"));
        assert_eq!(merged.email.as_deref(), Some("lead@example.com"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn finds_by_either_contact_point() {
        let store = MemorySignUpStore::new();
        store
            .upsert("id-1", &doc(Some("+5551234567"), Some("lead@example.com")))
            .await
            .unwrap();

        let by_phone = store
            .find_by_contact(Some("+5551234567"), None)
            .await
            .unwrap();
        assert_eq!(by_phone.map(|s| s.sign_up_id).as_deref(), Some("id-1"));

        let by_email = store
            .find_by_contact(None, Some("lead@example.com"))
            .await
            .unwrap();
        assert_eq!(by_email.map(|s| s.sign_up_id).as_deref(), Some("id-1"));

        let miss = store
            .find_by_contact(Some("+14155552671"), Some("other@example.com"))
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn one_matching_contact_point_is_enough() {
        let store = MemorySignUpStore::new();
        store
            .upsert("id-1", &doc(Some("+5551234567"), Some("lead@example.com")))
            .await
            .unwrap();

        // Both contacts supplied, only the email on record.
        let by_email = store
            .find_by_contact(Some("+14155552671"), Some("lead@example.com"))
            .await
            .unwrap();
        assert_eq!(by_email.map(|s| s.sign_up_id).as_deref(), Some("id-1"));

        // Both contacts supplied, only the cellphone on record.
        let by_phone = store
            .find_by_contact(Some("+5551234567"), Some("other@example.com"))
            .await
            .unwrap();
        assert_eq!(by_phone.map(|s| s.sign_up_id).as_deref(), Some("id-1"));
    }

    #[tokio::test]
    async fn repeating_an_upsert_changes_nothing() {
        let store = MemorySignUpStore::new();
        let partial = doc(Some("+5551234567"), Some("lead@example.com"));
        store.upsert("id-1", &partial).await.unwrap();
        let first = store.document("id-1").unwrap();

        store.upsert("id-1", &partial).await.unwrap();

        assert_eq!(store.document("id-1").unwrap(), first);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn absent_contacts_never_match_each_other() {
        let store = MemorySignUpStore::new();
        store.upsert("id-1", &doc(Some("+5551234567"), None)).await.unwrap();
        // A query without an email must not match a record without one.
        let miss = store.find_by_contact(None, None).await.unwrap();
        assert!(miss.is_none());
        let miss = store
            .find_by_contact(Some("+14155552671"), None)
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn exists_tracks_upserts() {
        let store = MemorySignUpStore::new();
        assert!(!store.exists("id-1").await.unwrap());
        store.upsert("id-1", &doc(None, Some("lead@example.com"))).await.unwrap();
        assert!(store.exists("id-1").await.unwrap());
    }
}
