use std::time::{Duration, Instant};

use async_trait::async_trait;
use axis_core::{ConfigError, ContactSubmission, SiteConfig, SubscriberProfile};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GatewayError, Result};
use crate::gateway::{ChatAnswer, ContactReceipt, HealthStatus, SubscriptionOutcome, WebhookGateway};
use crate::wire::{
    ChatQuery, ChatResponseBody, ContactPayload, ContactResponseBody, SubscriptionPayload,
    SubscriptionResponseBody,
};

const JSON: &str = "application/json";

/// reqwest-backed gateway for the hosted automation webhooks.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    contact_url: Url,
    subscribe_url: Url,
    chat_url: Url,
    health_url: Url,
    timeout: Duration,
}

impl HttpGateway {
    /// Resolve all endpoint URLs up front so a bad base address fails here
    /// rather than on the first user action.
    pub fn new(config: &SiteConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            client: Client::new(),
            contact_url: config.contact_url()?,
            subscribe_url: config.subscribe_url()?,
            chat_url: config.chat_url()?,
            health_url: config.health_url()?,
            timeout: config.request_timeout(),
        })
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn post_json<B, T>(&self, operation: &'static str, url: &Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(operation, %url, "Sending webhook request");
        let started = Instant::now();

        let result = match tokio::time::timeout(self.timeout, self.send_json(url, body)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::timeout(self.timeout)),
        };

        match &result {
            Ok(_) => tracing::info!(
                operation,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Webhook request succeeded"
            ),
            Err(e) => tracing::warn!(
                operation,
                kind = ?e.kind,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Webhook request failed: {}",
                e.detail
            ),
        }
        result
    }

    async fn send_json<B, T>(&self, url: &Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::from_status(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl WebhookGateway for HttpGateway {
    async fn submit_contact_form(&self, submission: &ContactSubmission) -> Result<ContactReceipt> {
        let payload = ContactPayload::from(submission);
        let body: ContactResponseBody = self
            .post_json("submit_contact_form", &self.contact_url, &payload)
            .await?;
        Ok(body.into())
    }

    async fn submit_subscription_decision(
        &self,
        profile: &SubscriberProfile,
        subscribed: bool,
    ) -> Result<SubscriptionOutcome> {
        let payload = SubscriptionPayload::new(profile, subscribed);
        let body: SubscriptionResponseBody = self
            .post_json("submit_subscription_decision", &self.subscribe_url, &payload)
            .await?;
        Ok(body.into())
    }

    async fn ask_question(&self, question: &str) -> Result<ChatAnswer> {
        let payload = ChatQuery {
            chat_input: question,
        };
        let body: ChatResponseBody = self
            .post_json("ask_question", &self.chat_url, &payload)
            .await?;
        Ok(body.into())
    }

    async fn check_health(&self) -> Result<HealthStatus> {
        let request = self
            .client
            .get(self.health_url.clone())
            .header(ACCEPT, JSON)
            .send();

        let response = match tokio::time::timeout(self.timeout, request).await {
            Ok(response) => response?,
            Err(_) => return Err(GatewayError::timeout(self.timeout)),
        };

        let healthy = response.status().is_success();
        if !healthy {
            tracing::warn!(status = %response.status(), "Webhook health check reported unhealthy");
        }
        Ok(HealthStatus { healthy })
    }
}
