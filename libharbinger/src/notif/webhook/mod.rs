//! HTTP webhook notifier.
//!
//! Each event is rendered (JSON by default) and POSTed once to the configured
//! endpoint. The response status is not inspected: a delivery succeeds when
//! the request went out and a response came back before the deadline.

use crate::config::DeliveryConfig;
use crate::error::{HarbingerError, Result};
use crate::model::NotificationEvent;
use crate::notif::render::{JsonRenderer, Render};
use crate::notif::Notifier;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client as ReqwestClient, Request, Url};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;


/// Webhook delivery backend.
#[derive(Clone)]
pub struct Webhook {
    config: DeliveryConfig,
    renderer: Arc<dyn Render>,
}

impl std::fmt::Debug for Webhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webhook")
            .field("endpoint", &self.config.endpoint)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl Webhook {
    /// Creates a webhook notifier rendering events as JSON.
    pub fn new(config: DeliveryConfig) -> Self {
        Self::with_renderer(config, Arc::new(JsonRenderer))
    }

    /// Creates a webhook notifier with a custom renderer.
    pub fn with_renderer(config: DeliveryConfig, renderer: Arc<dyn Render>) -> Self {
        Self { config, renderer }
    }

    /// Returns the delivery settings.
    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Builds the POST request for an already rendered body.
    ///
    /// Custom headers go in first so the configured `User-Agent` always wins.
    fn build_request(
        &self,
        client: &ReqwestClient,
        body: Vec<u8>,
        user_agent: &str,
    ) -> Result<Request> {
        let url = Url::parse(&self.config.endpoint).map_err(|e| {
            HarbingerError::request_with_source(
                format!("Invalid webhook endpoint {}", self.config.endpoint),
                e,
            )
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(self.renderer.content_type()).map_err(|e| {
                HarbingerError::request_with_source("Invalid content type", e)
            })?,
        );
        for (key, value) in &self.config.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                HarbingerError::request_with_source(format!("Invalid header name {}", key), e)
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                HarbingerError::request_with_source(format!("Invalid value for header {}", key), e)
            })?;
            headers.insert(name, value);
        }
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| {
                HarbingerError::request_with_source("Invalid user agent", e)
            })?,
        );

        client
            .post(url)
            .headers(headers)
            .body(body)
            .build()
            .map_err(|e| HarbingerError::request_with_source("Failed to build webhook request", e))
    }

    fn translate_reqwest_error(&self, error: reqwest::Error) -> HarbingerError {
        if error.is_timeout() {
            HarbingerError::deadline_exceeded(self.config.timeout)
        } else if error.is_connect() {
            HarbingerError::transport_with_source(
                format!("Failed to connect to webhook at {}", self.config.endpoint),
                error,
            )
        } else {
            HarbingerError::transport_with_source(
                format!("Failed to send webhook to {}", self.config.endpoint),
                error,
            )
        }
    }
}

#[async_trait]
impl Notifier for Webhook {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send_with_cancel(
        &self,
        event: NotificationEvent,
        cancel: CancellationToken,
    ) -> Result<()> {
        let body = self.renderer.render(&event)?;

        // No idle pooling: the connection is closed once the response is dropped.
        let client = ReqwestClient::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| HarbingerError::request_with_source("Failed to create HTTP client", e))?;
        let request = self.build_request(&client, body, &event.meta.user_agent)?;

        // Cancelled on every exit path, which also stops anything tied to it.
        let scope = cancel.child_token();
        let _release = scope.clone().drop_guard();

        debug!(endpoint = %self.config.endpoint, timeout = ?self.config.timeout, "sending webhook");

        let delivery = tokio::time::timeout(self.config.timeout, client.execute(request));
        let response = tokio::select! {
            biased;
            _ = scope.cancelled() => return Err(HarbingerError::Cancelled),
            outcome = delivery => match outcome {
                Err(_elapsed) => return Err(HarbingerError::deadline_exceeded(self.config.timeout)),
                Ok(result) => result.map_err(|e| self.translate_reqwest_error(e))?,
            },
        };

        debug!(status = response.status().as_u16(), "webhook delivered");
        drop(response);

        Ok(())
    }
}
