use async_trait::async_trait;
use identity_domain::ports::{SignUpStore, StoreError};
use identity_domain::{SignUpDocument, StoredSignUp};
use identity_shared::config::ElasticsearchConfig;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Elasticsearch adapter for the sign-up index, speaking the REST API
/// directly over HTTP.
///
/// Dedup searches match on the `.keyword` sub-fields of the contact points
/// and only pull the operation dates back; writes are partial-document
/// updates with `doc_as_upsert`, so concurrent writers merge instead of
/// clobbering each other.
pub struct ElasticsearchSignUpStore {
    http: reqwest::Client,
    base_url: String,
    index: String,
}

impl ElasticsearchSignUpStore {
    pub fn new(http: reqwest::Client, config: &ElasticsearchConfig) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
        }
    }

    fn doc_url(&self, sign_up_id: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, sign_up_id)
    }

    fn update_url(&self, sign_up_id: &str) -> String {
        format!("{}/{}/_update/{}", self.base_url, self.index, sign_up_id)
    }

    fn search_url(&self) -> String {
        format!("{}/{}/_search", self.base_url, self.index)
    }
}

#[async_trait]
impl SignUpStore for ElasticsearchSignUpStore {
    async fn exists(&self, sign_up_id: &str) -> Result<bool, StoreError> {
        let response = self
            .http
            .head(self.doc_url(sign_up_id))
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        match response.status() {
            status if status.is_success() => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            status => Err(StoreError::Rejected {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }

    async fn find_by_contact(
        &self,
        cellphone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<StoredSignUp>, StoreError> {
        let Some(body) = contact_search_body(cellphone, email) else {
            return Ok(None);
        };

        let response = self
            .http
            .post(self.search_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let response = check_status(response).await?;
        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Payload(e.to_string()))?;

        Ok(search.hits.hits.into_iter().next().map(|hit| StoredSignUp {
            sign_up_id: hit.id,
            created_at: hit.source.created_at,
            updated_at: hit.source.updated_at,
            signed_up_at: hit.source.signed_up_at,
        }))
    }

    async fn upsert(&self, sign_up_id: &str, document: &SignUpDocument) -> Result<(), StoreError> {
        let body = json!({
            "doc": document,
            "doc_as_upsert": true
        });
        let response = self
            .http
            .post(self.update_url(sign_up_id))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        check_status(response).await?;
        debug!(sign_up_id, "sign-up document upserted");
        Ok(())
    }
}

/// Builds the dedup search body, or `None` when there is nothing to match on.
/// Emails are trimmed so an index entry never misses on stray whitespace.
fn contact_search_body(cellphone: Option<&str>, email: Option<&str>) -> Option<serde_json::Value> {
    let mut should = Vec::new();
    if let Some(cellphone) = cellphone {
        should.push(json!({ "term": { "cellphone.keyword": cellphone } }));
    }
    if let Some(email) = email {
        should.push(json!({ "term": { "email.keyword": email.trim() } }));
    }
    if should.is_empty() {
        return None;
    }

    // One hit is enough; the policy check only needs the dates.
    Some(json!({
        "size": 1,
        "_source": ["createdAt", "updatedAt", "signedUpAt"],
        "query": {
            "bool": {
                "should": should,
                "minimum_should_match": 1
            }
        }
    }))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: SignUpDocument,
}
