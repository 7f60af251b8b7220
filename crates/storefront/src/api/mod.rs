//! CloudMart backend REST API client.
//!
//! # Endpoints
//!
//! - `/products` - catalog listing and admin product management
//! - `/orders` - order placement, history and admin status changes
//! - `/tickets` - support tickets filed from ended chat threads
//! - `/ai/*` - support chat and shopping assistant
//!
//! The product listing is cached in memory with `moka` (5 minute TTL) and
//! invalidated by any product write made through this client.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudmart_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let products = client.products().await?;
//! ```

mod types;

use std::sync::Arc;
use std::time::Duration;

use cloudmart_core::{
    ConversationId, NewOrder, NewProduct, Order, OrderId, OrderStatus, Product, ProductId,
    SupportThread, ThreadId, Ticket, TicketId, TicketStatus,
};
use moka::future::Cache;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ApiConfig;

pub use types::assistant_reply_text;
use types::{
    AnalyzeSentimentRequest, AssistantMessageRequest, AssistantReply, AssistantStarted,
    OrderStatusUpdate, SupportMessageRequest, SupportReply, SupportStarted,
};

const PRODUCTS_CACHE_KEY: &str = "products";

/// Longest slice of an error body kept in logs and error messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the CloudMart backend API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<&'static str, Arc<Vec<Product>>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// Base URL all endpoint paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List the catalog. Served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>> {
        if let Some(cached) = self.inner.products.get(PRODUCTS_CACHE_KEY).await {
            tracing::debug!("Product list cache hit");
            return Ok(cached);
        }

        let url = self.endpoint("products")?;
        let products: Vec<Product> = self.execute(self.inner.client.get(url)).await?;
        let products = Arc::new(products);
        self.inner
            .products
            .insert(PRODUCTS_CACHE_KEY, Arc::clone(&products))
            .await;
        Ok(products)
    }

    /// Look up one product in the catalog listing.
    ///
    /// # Errors
    ///
    /// Returns error if the catalog cannot be fetched.
    pub async fn product(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.products().await?.iter().find(|p| &p.id == id).cloned())
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let url = self.endpoint("products")?;
        let created = self.execute(self.inner.client.post(url).json(product)).await?;
        self.invalidate_products().await;
        Ok(created)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, product))]
    pub async fn update_product(&self, id: &ProductId, product: &NewProduct) -> Result<Product> {
        let url = self.endpoint(&format!("products/{id}"))?;
        let updated = self.execute(self.inner.client.put(url).json(product)).await?;
        self.invalidate_products().await;
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        let url = self.endpoint(&format!("products/{id}"))?;
        self.execute_empty(self.inner.client.delete(url)).await?;
        self.invalidate_products().await;
        Ok(())
    }

    async fn invalidate_products(&self) {
        self.inner.products.invalidate(PRODUCTS_CACHE_KEY).await;
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, order), fields(user_email = %order.user_email, total = %order.total))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<()> {
        let url = self.endpoint("orders")?;
        self.execute_empty(self.inner.client.post(url).json(order))
            .await
    }

    /// List every order (admin).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not an order list.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>> {
        let url = self.endpoint("orders")?;
        self.execute(self.inner.client.get(url)).await
    }

    /// List the orders placed with `email`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not an order list.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, email: &str) -> Result<Vec<Order>> {
        let mut url = self.endpoint("orders/user")?;
        url.query_pairs_mut().append_pair("email", email);
        self.execute(self.inner.client.get(url)).await
    }

    /// Change an order's status (admin).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<()> {
        let url = self.endpoint(&format!("orders/{id}"))?;
        self.execute_empty(self.inner.client.put(url).json(&OrderStatusUpdate { status }))
            .await
    }

    /// Delete an order (admin).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<()> {
        let url = self.endpoint(&format!("orders/{id}"))?;
        self.execute_empty(self.inner.client.delete(url)).await
    }

    // =========================================================================
    // Tickets
    // =========================================================================

    /// List support tickets, optionally only those with `status` (admin).
    ///
    /// A body that is not a JSON array yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or a ticket cannot be decoded.
    #[instrument(skip(self))]
    pub async fn tickets(&self, status: Option<TicketStatus>) -> Result<Vec<Ticket>> {
        let url = match status {
            None => self.endpoint("tickets")?,
            Some(status) => {
                let mut url = self.endpoint("tickets/status")?;
                url.query_pairs_mut()
                    .append_pair("status", &status.to_string());
                url
            }
        };

        let body: serde_json::Value = self.execute(self.inner.client.get(url)).await?;
        if !body.is_array() {
            tracing::warn!("Ticket listing was not an array, treating as empty");
            return Ok(Vec::new());
        }
        serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Delete a ticket (admin).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_ticket(&self, id: &TicketId) -> Result<()> {
        let url = self.endpoint(&format!("tickets/{id}"))?;
        self.execute_empty(self.inner.client.delete(url)).await
    }

    // =========================================================================
    // Support chat
    // =========================================================================

    /// Open a new support thread on the backend.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or no thread id is returned.
    #[instrument(skip(self))]
    pub async fn start_support_thread(&self) -> Result<ThreadId> {
        let url = self.endpoint("ai/start")?;
        let started: SupportStarted = self.execute(self.inner.client.post(url)).await?;
        Ok(started.thread_id)
    }

    /// Send a user message on a support thread and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the reply is missing.
    #[instrument(skip(self, message))]
    pub async fn send_support_message(&self, thread_id: &ThreadId, message: &str) -> Result<String> {
        let url = self.endpoint("ai/message")?;
        let body = SupportMessageRequest { thread_id, message };
        let reply: SupportReply = self.execute(self.inner.client.post(url).json(&body)).await?;
        Ok(reply.response)
    }

    /// Hand an ended thread to the backend for sentiment analysis.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, thread), fields(thread_id = %thread.id))]
    pub async fn analyze_sentiment(&self, thread: &SupportThread) -> Result<()> {
        let url = self.endpoint("ai/analyze-sentiment")?;
        let body = AnalyzeSentimentRequest::from(thread);
        self.execute_empty(self.inner.client.post(url).json(&body))
            .await
    }

    // =========================================================================
    // Shopping assistant
    // =========================================================================

    /// Open a shopping assistant conversation.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or no conversation id is returned.
    #[instrument(skip(self))]
    pub async fn start_assistant(&self) -> Result<ConversationId> {
        let url = self.endpoint("ai/bedrock/start")?;
        let started: AssistantStarted = self.execute(self.inner.client.post(url)).await?;
        Ok(started.conversation_id)
    }

    /// Send a message to the shopping assistant and return its reply text.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, message))]
    pub async fn send_assistant_message(
        &self,
        conversation_id: &ConversationId,
        message: &str,
    ) -> Result<String> {
        let url = self.endpoint("ai/bedrock/message")?;
        let body = AssistantMessageRequest {
            conversation_id,
            message,
        };
        let reply: AssistantReply = self.execute(self.inner.client.post(url).json(&body)).await?;
        Ok(assistant_reply_text(&reply.response))
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and decode a JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&text),
                "Failed to parse API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    /// Send a request whose response body is not needed.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<()> {
        self.send(request).await.map(drop)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&text),
                "API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: preview(&text),
            });
        }

        Ok(text)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn preview(text: &str) -> String {
    text.chars().take(ERROR_BODY_PREVIEW).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
