//! HTTP client for the dashboard REST API

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{OrderDetail, OrderStatus, OrderSummary, StatsSnapshot};
use std::time::Duration;

use crate::api::{OrderListResponse, StatusUpdateRequest, StatusUpdateResponse};
use crate::{ClientConfig, ClientError, ClientResult, OrderQuery, OrdersApi};

/// HTTP client for making requests to the ordering backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.api_url.trim().is_empty() {
            return Err(ClientError::Config("API URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, ?query, "GET");
        let response = self.client.get(&url).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    async fn patch<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<String> {
        let url = self.url(path);
        tracing::debug!(url = %url, "PATCH");
        let response = self.client.patch(&url).json(body).send().await?;
        Self::check_status(response).await?.text().await.map_err(Into::into)
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "Request rejected by backend");
        Err(ClientError::Status { status, body })
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let text = Self::check_status(response).await?.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(error = %e, "Failed to decode response body");
            ClientError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait]
impl OrdersApi for ApiClient {
    async fn list_orders(&self, query: &OrderQuery) -> ClientResult<Vec<OrderSummary>> {
        let list: OrderListResponse = self.get("orders/", &query.to_params()).await?;
        Ok(list.into_orders())
    }

    async fn fetch_stats(&self) -> ClientResult<StatsSnapshot> {
        self.get("stats/", &[]).await
    }

    async fn fetch_order_detail(&self, order_id: i64) -> ClientResult<OrderDetail> {
        self.get(&format!("orders/{order_id}/"), &[]).await
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()> {
        let body = self
            .patch(
                &format!("orders/{order_id}/update_status/"),
                &StatusUpdateRequest { status },
            )
            .await?;

        if body.trim().is_empty() {
            return Ok(());
        }

        // Any 2xx counts as applied; the body only feeds the log
        match serde_json::from_str::<StatusUpdateResponse>(&body) {
            Ok(resp) if !resp.success => {
                tracing::warn!(
                    order_id,
                    error = resp.error.as_deref().unwrap_or("-"),
                    "Backend flagged a 2xx status update as unsuccessful"
                );
            }
            Ok(resp) => {
                tracing::info!(
                    order_id,
                    order_number = resp.order_number.as_deref().unwrap_or("-"),
                    new_status = ?resp.new_status,
                    "Order status updated"
                );
            }
            Err(e) => {
                tracing::debug!(order_id, error = %e, "Unrecognised status update body");
            }
        }
        Ok(())
    }
}
