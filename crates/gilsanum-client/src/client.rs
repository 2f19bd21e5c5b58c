//! HTTP client for the dashboard REST API.
//!
//! Wraps `reqwest` with envelope checking, typed deserialization, a
//! tag-invalidated response cache and retry on transient failures. Reads go
//! through the cache and the retry loop; writes are sent once and then
//! invalidate the tags they touch.

use std::time::Duration;

use gilsanum_core::{AppConfig, Product};
use reqwest::{header, Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{QueryCache, Tag, TagKind};
use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{
    ApiResponse, ChartPoint, Customer, CustomerInput, CustomerQuery, Order, OrderInput,
    OrderQuery, ProductInput, ProductQuery, ProductRanking, StatsCard,
};

const DEFAULT_USER_AGENT: &str = "gilsanum/0.1 (dashboard)";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Client for the dashboard REST API.
///
/// One instance can be shared across tasks; the cache is internally locked.
/// Use [`DashboardClient::from_config`] in binaries and
/// [`DashboardClient::new`] to point at a mock server in tests.
pub struct DashboardClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
    cache: QueryCache,
}

impl DashboardClient {
    /// Creates a client with the default retry policy and a 60 s cache.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::build(base_url, timeout_secs, DEFAULT_USER_AGENT)
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`DashboardClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Ok(
            Self::build(
                &config.api_base_url,
                config.request_timeout_secs,
                &config.user_agent,
            )?
            .with_retry_policy(config.max_retries, config.retry_backoff_base_ms)
            .with_cache_ttl(Duration::from_secs(config.cache_ttl_secs)),
        )
    }

    fn build(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so `Url::join` appends to the
        // base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            cache: QueryCache::new(DEFAULT_CACHE_TTL),
        })
    }

    /// Overrides the retry policy. `max_retries = 0` disables retries.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Overrides the cache lifetime. `Duration::ZERO` disables caching.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = QueryCache::new(ttl);
        self
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // -----------------------------------------------------------------------
    // products
    // -----------------------------------------------------------------------

    /// Lists products matching the server-side filters in `query`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the envelope reports `"success": false`.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on network
    ///   failure or non-2xx status, after retries.
    /// - [`ClientError::Deserialize`] if the body does not match.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ClientError> {
        self.fetch(
            "products",
            &query.to_params(),
            vec![Tag::all(TagKind::Product)],
        )
        .await
    }

    /// Fetches one product by id.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] for an unknown id, otherwise as
    /// [`DashboardClient::list_products`].
    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        self.fetch(
            &format!("products/{id}"),
            &[],
            vec![Tag::id(TagKind::Product, id)],
        )
        .await
    }

    /// Creates a product and invalidates every cached product read.
    ///
    /// # Errors
    ///
    /// As [`DashboardClient::list_products`], without retries.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ClientError> {
        self.mutate(
            Method::POST,
            "products",
            input,
            &[Tag::all(TagKind::Product)],
        )
        .await
    }

    /// Updates a product and invalidates cached reads of that product.
    ///
    /// # Errors
    ///
    /// As [`DashboardClient::create_product`].
    pub async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
    ) -> Result<Product, ClientError> {
        self.mutate(
            Method::PUT,
            &format!("products/{id}"),
            input,
            &[Tag::id(TagKind::Product, id)],
        )
        .await
    }

    /// Deletes a product and invalidates every cached product read.
    ///
    /// # Errors
    ///
    /// As [`DashboardClient::create_product`].
    pub async fn delete_product(&self, id: &str) -> Result<(), ClientError> {
        self.remove(&format!("products/{id}"), &[Tag::all(TagKind::Product)])
            .await
    }

    // -----------------------------------------------------------------------
    // customers & orders
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// As [`DashboardClient::list_products`].
    pub async fn list_customers(
        &self,
        query: &CustomerQuery,
    ) -> Result<Vec<Customer>, ClientError> {
        self.fetch(
            "customers",
            &query.to_params(),
            vec![Tag::all(TagKind::Customer)],
        )
        .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::get_product`].
    pub async fn get_customer(&self, id: &str) -> Result<Customer, ClientError> {
        self.fetch(
            &format!("customers/{id}"),
            &[],
            vec![Tag::id(TagKind::Customer, id)],
        )
        .await
    }

    /// Creates a customer and invalidates every cached customer read.
    ///
    /// # Errors
    ///
    /// As [`DashboardClient::create_product`].
    pub async fn create_customer(&self, input: &CustomerInput) -> Result<Customer, ClientError> {
        self.mutate(
            Method::POST,
            "customers",
            input,
            &[Tag::all(TagKind::Customer)],
        )
        .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::create_product`].
    pub async fn update_customer(
        &self,
        id: &str,
        input: &CustomerInput,
    ) -> Result<Customer, ClientError> {
        self.mutate(
            Method::PUT,
            &format!("customers/{id}"),
            input,
            &[Tag::id(TagKind::Customer, id)],
        )
        .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::create_product`].
    pub async fn delete_customer(&self, id: &str) -> Result<(), ClientError> {
        self.remove(&format!("customers/{id}"), &[Tag::all(TagKind::Customer)])
            .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::list_products`].
    pub async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<Order>, ClientError> {
        self.fetch("orders", &query.to_params(), vec![Tag::all(TagKind::Order)])
            .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::get_product`].
    pub async fn get_order(&self, id: &str) -> Result<Order, ClientError> {
        self.fetch(
            &format!("orders/{id}"),
            &[],
            vec![Tag::id(TagKind::Order, id)],
        )
        .await
    }

    /// Creates an order. Order writes also move the dashboard figures, so
    /// cached dashboard reads are dropped along with order reads.
    ///
    /// # Errors
    ///
    /// As [`DashboardClient::create_product`].
    pub async fn create_order(&self, input: &OrderInput) -> Result<Order, ClientError> {
        self.mutate(
            Method::POST,
            "orders",
            input,
            &[Tag::all(TagKind::Order), Tag::all(TagKind::Dashboard)],
        )
        .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::create_product`].
    pub async fn update_order(&self, id: &str, input: &OrderInput) -> Result<Order, ClientError> {
        self.mutate(
            Method::PUT,
            &format!("orders/{id}"),
            input,
            &[Tag::id(TagKind::Order, id), Tag::all(TagKind::Dashboard)],
        )
        .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::create_product`].
    pub async fn delete_order(&self, id: &str) -> Result<(), ClientError> {
        self.remove(
            &format!("orders/{id}"),
            &[Tag::all(TagKind::Order), Tag::all(TagKind::Dashboard)],
        )
        .await
    }

    // -----------------------------------------------------------------------
    // dashboard
    // -----------------------------------------------------------------------

    /// Headline stat cards.
    ///
    /// # Errors
    ///
    /// As [`DashboardClient::list_products`].
    pub async fn dashboard_stats(&self) -> Result<Vec<StatsCard>, ClientError> {
        self.fetch("dashboard/stats", &[], vec![Tag::all(TagKind::Dashboard)])
            .await
    }

    /// Monthly sales series for the analytics chart.
    ///
    /// # Errors
    ///
    /// As [`DashboardClient::list_products`].
    pub async fn chart_data(&self) -> Result<Vec<ChartPoint>, ClientError> {
        self.fetch(
            "dashboard/chart-data",
            &[],
            vec![Tag::all(TagKind::Dashboard)],
        )
        .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::list_products`].
    pub async fn recent_orders(&self, limit: Option<u32>) -> Result<Vec<Order>, ClientError> {
        self.fetch(
            "dashboard/recent-orders",
            &limit_param(limit),
            vec![Tag::all(TagKind::Dashboard)],
        )
        .await
    }

    /// # Errors
    ///
    /// As [`DashboardClient::list_products`].
    pub async fn popular_products(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<ProductRanking>, ClientError> {
        self.fetch(
            "dashboard/popular-products",
            &limit_param(limit),
            vec![Tag::all(TagKind::Dashboard)],
        )
        .await
    }

    // -----------------------------------------------------------------------
    // plumbing
    // -----------------------------------------------------------------------

    /// Cached, retried GET that unwraps the envelope's `data`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        provides: Vec<Tag>,
    ) -> Result<T, ClientError> {
        let url = self.build_url(path, params)?;
        let key = url.to_string();

        if let Some(body) = self.cache.get(&key) {
            tracing::debug!(url = %key, "dashboard API cache hit");
            return Self::decode(body, &key);
        }

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move { self.send(Method::GET, &url, None).await }
        })
        .await?;
        Self::check_api_error(&body)?;

        let data = Self::decode(body.clone(), &key)?;
        self.cache.insert(key, body, provides);
        Ok(data)
    }

    /// Single-shot write that unwraps `data` and invalidates `tags` on success.
    async fn mutate<I: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        input: &I,
        invalidates: &[Tag],
    ) -> Result<T, ClientError> {
        let url = self.build_url(path, &[])?;
        let payload = serde_json::to_value(input).map_err(|e| ClientError::Serialize {
            context: format!("{method} {url}"),
            source: e,
        })?;

        let body = self.send(method, &url, Some(&payload)).await?;
        Self::check_api_error(&body)?;
        self.invalidate(invalidates);
        Self::decode(body, url.as_str())
    }

    /// Single-shot DELETE. The envelope's `data` is ignored and may be `null`.
    async fn remove(&self, path: &str, invalidates: &[Tag]) -> Result<(), ClientError> {
        let url = self.build_url(path, &[])?;
        let body = self.send(Method::DELETE, &url, None).await?;
        Self::check_api_error(&body)?;
        self.invalidate(invalidates);
        Ok(())
    }

    fn invalidate(&self, tags: &[Tag]) {
        let dropped = self.cache.invalidate(tags);
        tracing::debug!(
            tags = %tags.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            dropped,
            "invalidated cached dashboard API reads"
        );
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `path` cannot be joined.
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends one request and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] on 404, [`ClientError::RateLimited`] on 429,
    /// [`ClientError::UnexpectedStatus`] on any other non-2xx,
    /// [`ClientError::Http`] on network failure and
    /// [`ClientError::Deserialize`] if the body is not JSON.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        payload: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ClientError> {
        tracing::debug!(%method, %url, "dashboard API request");
        let mut request = self
            .client
            .request(method, url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let retry_after_secs = retry_after_secs(response.headers());

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited {
                url: url.to_string(),
                retry_after_secs,
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                retry_after_secs,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Returns [`ClientError::Api`] when the envelope reports failure.
    fn check_api_error(body: &serde_json::Value) -> Result<(), ClientError> {
        if body.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            let msg = body
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(ClientError::Api(msg));
        }
        Ok(())
    }

    fn decode<T: DeserializeOwned>(body: serde_json::Value, context: &str) -> Result<T, ClientError> {
        let envelope: ApiResponse<T> =
            serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
                context: context.to_string(),
                source: e,
            })?;
        if let Some(total) = envelope.total {
            tracing::debug!(context, total, "dashboard API page");
        }
        Ok(envelope.data)
    }
}

/// Whole seconds from a `Retry-After` header. HTTP-date values are ignored.
fn retry_after_secs(headers: &header::HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn limit_param(limit: Option<u32>) -> Vec<(&'static str, String)> {
    limit
        .map(|l| vec![("limit", l.to_string())])
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
