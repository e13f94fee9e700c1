use async_trait::async_trait;
use axis_core::{
    ArticleSummary, ContactSubmission, QuestionResponse, RecommendedArticle, ResponseStatus,
    SubscriberProfile,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Result of a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub status: String,
    pub should_prompt_subscription: bool,
    /// Profile the backend suggests prefilling the subscription modal with.
    pub recommended_profile: Option<SubscriberProfile>,
}

/// Result of a subscribe/decline decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionOutcome {
    pub recommendations: Vec<ArticleSummary>,
}

/// Raw answer from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub recommendations: Vec<RecommendedArticle>,
    pub status: ResponseStatus,
}

impl ChatAnswer {
    pub fn into_question_response(self) -> QuestionResponse {
        QuestionResponse::from_parts(self.status, self.answer, self.recommendations)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
}

/// Outbound calls to the automation service.
///
/// Implementations must bound every call by a timeout and return a
/// classified error instead of panicking. They never retry.
#[async_trait]
pub trait WebhookGateway: Send + Sync {
    async fn submit_contact_form(&self, submission: &ContactSubmission) -> Result<ContactReceipt>;

    async fn submit_subscription_decision(
        &self,
        profile: &SubscriberProfile,
        subscribed: bool,
    ) -> Result<SubscriptionOutcome>;

    async fn ask_question(&self, question: &str) -> Result<ChatAnswer>;

    async fn check_health(&self) -> Result<HealthStatus>;
}
