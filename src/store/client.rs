use super::error::StoreError;
use super::types::{Collection, IndexingPolicy, StoredProcedure};
use crate::config::StoreConfig;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Millisecond wait hint attached to throttled responses.
const RETRY_AFTER_MS_HEADER: &str = "x-retry-after-ms";

/// Wait applied when a throttled response carries no usable hint.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// The store surface the importer depends on.
///
/// Point queries return matches in server order; callers treat the first
/// match as authoritative since resource names are unique. Implementations
/// report throttling as [`StoreError::RateLimited`] so the retry policy can
/// honor the server's wait hint.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Point-query collections by id.
    async fn query_collections(&self, id: &str) -> Result<Vec<Collection>, StoreError>;

    /// Create a named collection with an optional indexing policy under the
    /// given offer/service tier.
    async fn create_collection(
        &self,
        id: &str,
        indexing_policy: Option<&IndexingPolicy>,
        offer_type: &str,
    ) -> Result<Collection, StoreError>;

    /// Point-query stored procedures on a collection by id.
    async fn query_stored_procedures(
        &self,
        collection: &Collection,
        id: &str,
    ) -> Result<Vec<StoredProcedure>, StoreError>;

    /// Register a stored procedure with the given source body.
    async fn create_stored_procedure(
        &self,
        collection: &Collection,
        id: &str,
        body: &str,
    ) -> Result<StoredProcedure, StoreError>;

    /// Execute a stored procedure with positional arguments: the serialized
    /// documents and the upsert flag. Returns the raw response body.
    async fn execute_stored_procedure(
        &self,
        sproc: &StoredProcedure,
        documents: &[String],
        upsert: bool,
    ) -> Result<String, StoreError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCollectionRequest<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    indexing_policy: Option<&'a IndexingPolicy>,
    offer_type: &'a str,
}

#[derive(Serialize)]
struct CreateSprocRequest<'a> {
    id: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct ResourceList<T> {
    resources: Vec<T>,
}

/// REST-backed [`DocumentStore`].
#[derive(Clone)]
pub struct HttpDocumentStore {
    http: reqwest::Client,
    config: StoreConfig,
}

impl HttpDocumentStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let user_agent = format!(
            "docbulk/{}{}",
            env!("CARGO_PKG_VERSION"),
            config.user_agent_suffix
        );
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(StoreError::Http)?;

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn colls_path(&self) -> String {
        format!("/dbs/{}/colls", self.config.database)
    }

    /// Map a non-success response onto the error taxonomy, pulling the wait
    /// hint off throttled responses.
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER_MS_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_RETRY_AFTER);
            return Err(StoreError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::CONFLICT => StoreError::Conflict(body),
            StatusCode::NOT_FOUND => StoreError::NotFound(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(body),
            StatusCode::BAD_REQUEST => StoreError::BadRequest(body),
            _ => StoreError::Service { status, body },
        })
    }

    async fn get_resources<T: for<'de> Deserialize<'de>>(
        &self,
        url: String,
        id: &str,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .http
            .get(url)
            .header("authorization", &self.config.auth_token)
            .query(&[("id", id)])
            .send()
            .await
            .map_err(StoreError::Http)?;
        let response = Self::check(response).await?;

        let body = response.bytes().await.map_err(StoreError::Http)?;
        let parsed: ResourceList<T> = serde_json::from_slice(&body)?;
        Ok(parsed.resources)
    }
}

impl DocumentStore for HttpDocumentStore {
    async fn query_collections(&self, id: &str) -> Result<Vec<Collection>, StoreError> {
        self.get_resources(self.url(&self.colls_path()), id).await
    }

    async fn create_collection(
        &self,
        id: &str,
        indexing_policy: Option<&IndexingPolicy>,
        offer_type: &str,
    ) -> Result<Collection, StoreError> {
        let payload = CreateCollectionRequest {
            id,
            indexing_policy,
            offer_type,
        };
        let response = self
            .http
            .post(self.url(&self.colls_path()))
            .header("authorization", &self.config.auth_token)
            .json(&payload)
            .send()
            .await
            .map_err(StoreError::Http)?;
        let response = Self::check(response).await?;

        let body = response.bytes().await.map_err(StoreError::Http)?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn query_stored_procedures(
        &self,
        collection: &Collection,
        id: &str,
    ) -> Result<Vec<StoredProcedure>, StoreError> {
        let url = self.url(&format!("{}/sprocs", collection.self_link));
        self.get_resources(url, id).await
    }

    async fn create_stored_procedure(
        &self,
        collection: &Collection,
        id: &str,
        body: &str,
    ) -> Result<StoredProcedure, StoreError> {
        let payload = CreateSprocRequest { id, body };
        let response = self
            .http
            .post(self.url(&format!("{}/sprocs", collection.self_link)))
            .header("authorization", &self.config.auth_token)
            .json(&payload)
            .send()
            .await
            .map_err(StoreError::Http)?;
        let response = Self::check(response).await?;

        let bytes = response.bytes().await.map_err(StoreError::Http)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn execute_stored_procedure(
        &self,
        sproc: &StoredProcedure,
        documents: &[String],
        upsert: bool,
    ) -> Result<String, StoreError> {
        // Positional argument array, matching the procedure contract.
        let args = json!([documents, upsert]);
        let response = self
            .http
            .post(self.url(&sproc.self_link))
            .header("authorization", &self.config.auth_token)
            .json(&args)
            .send()
            .await
            .map_err(StoreError::Http)?;
        let response = Self::check(response).await?;

        response.text().await.map_err(StoreError::Http)
    }
}
