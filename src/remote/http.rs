//! reqwest-backed [`UserApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::constants::{USERS_PATH, USER_AGENT};
use crate::error::{FetchCause, FetchError, Operation};
use crate::models::{UserDraft, UserId, UserRecord};
use crate::remote::{UserApi, WireUser};

/// Longest error body kept in a [`FetchCause::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Errors constructing an [`HttpUserApi`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP client for a `/users` collection.
pub struct HttpUserApi {
    client: Client,
    collection: Url,
    timeout: Duration,
}

impl HttpUserApi {
    /// Build a client for `{base_url}/users`.
    ///
    /// `timeout` bounds each request end to end.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut collection = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(collection.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", collection.scheme())));
        }
        collection
            .path_segments_mut()
            .map_err(|_| invalid("URL cannot have a path".to_string()))?
            .pop_if_empty()
            .push(USERS_PATH);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            collection,
            timeout,
        })
    }

    /// URL of the collection endpoint.
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    fn item_url(&self, id: &UserId) -> Url {
        let mut url = self.collection.clone();
        // Checked in `new`: the collection URL always has path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    /// Send a request and turn non-2xx statuses into errors.
    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::new(operation, self.transport_cause(&e)))?;

        let status = response.status();
        debug!(%operation, url = %response.url(), status = status.as_u16(), "remote response");

        if !status.is_success() {
            let mut body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            truncate_body(&mut body);
            return Err(FetchError::new(
                operation,
                FetchCause::Status {
                    code: status.as_u16(),
                    body,
                },
            ));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        operation: Operation,
        response: Response,
    ) -> Result<T, FetchError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::new(operation, self.transport_cause(&e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::new(operation, FetchCause::Decode(e.to_string())))
    }

    fn transport_cause(&self, err: &reqwest::Error) -> FetchCause {
        if err.is_timeout() {
            FetchCause::Timeout(self.timeout)
        } else if err.is_decode() {
            FetchCause::Decode(err.to_string())
        } else {
            FetchCause::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn list(&self) -> Result<Vec<WireUser>, FetchError> {
        debug!(url = %self.collection, "GET users");
        let response = self
            .send(Operation::List, self.client.get(self.collection.clone()))
            .await?;
        self.decode(Operation::List, response).await
    }

    async fn create(&self, draft: &UserDraft) -> Result<WireUser, FetchError> {
        debug!(url = %self.collection, "POST user");
        let request = self.client.post(self.collection.clone()).json(draft);
        let response = self.send(Operation::Create, request).await?;
        self.decode(Operation::Create, response).await
    }

    async fn update(&self, record: &UserRecord) -> Result<WireUser, FetchError> {
        let url = self.item_url(&record.id);
        debug!(%url, "PUT user");
        let request = self.client.put(url).json(record);
        let response = self.send(Operation::Update, request).await?;
        self.decode(Operation::Update, response).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), FetchError> {
        let url = self.item_url(id);
        debug!(%url, "DELETE user");
        self.send(Operation::Delete, self.client.delete(url)).await?;
        Ok(())
    }
}

fn truncate_body(body: &mut String) {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
}
