//! REST client for the workshop catalog service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::error::StoreError;
use crate::api::store::WorkshopStore;
use crate::types::{Workshop, WorkshopDraft, WorkshopId};

/// HTTP-backed workshop store.
///
/// Talks JSON to the catalog service's `/talleres/` resource routes. The
/// service assigns ids and `created_at`; everything returned by a mutation
/// is the stored record, which callers use to update their own state.
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    /// Create a store for the service at `base_url` (e.g.
    /// `http://localhost:8000/api`). `timeout` applies per request; there
    /// are no retries.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn error_from(response: Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        match status {
            400 => StoreError::Validation(body),
            404 => StoreError::NotFound(body),
            _ => StoreError::Http {
                status,
                message: body,
            },
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WorkshopStore for HttpStore {
    async fn list(&self) -> Result<Vec<Workshop>, StoreError> {
        let url = self.url("talleres/");
        debug!(%url, "catalog GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode(response).await
    }

    async fn create(&self, draft: WorkshopDraft) -> Result<Workshop, StoreError> {
        let url = self.url("talleres/");
        debug!(%url, name = %draft.name, "catalog POST");

        let response = self
            .client
            .post(&url)
            .json(&draft)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode(response).await
    }

    async fn update(&self, id: WorkshopId, draft: WorkshopDraft) -> Result<Workshop, StoreError> {
        let url = self.url(&format!("talleres/{id}/"));
        debug!(%url, "catalog PUT");

        let response = self
            .client
            .put(&url)
            .json(&draft)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode(response).await
    }

    async fn delete(&self, id: WorkshopId) -> Result<(), StoreError> {
        let url = self.url(&format!("talleres/{id}/"));
        debug!(%url, "catalog DELETE");

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let store = HttpStore::new("http://localhost:8000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(store.url("talleres/"), "http://localhost:8000/api/talleres/");
    }

    #[test]
    fn test_resource_urls() {
        let store = HttpStore::new("http://localhost:8000/api", Duration::from_secs(5)).unwrap();
        assert_eq!(
            store.url(&format!("talleres/{}/", 12)),
            "http://localhost:8000/api/talleres/12/"
        );
    }
}
