//! Chat transcript entries and question/answer results.
//!
//! AI-sourced text is always read through `display_text`/`visible_articles`:
//! anything that is not a `success` answer is replaced by a fixed advisory and
//! never shows recommendations, whatever the backend attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::article::RecommendedArticle;

/// Shown instead of the backend text when a question is off-topic.
pub const NOT_RELEVANT_ADVISORY: &str = "I specialize in technology and innovation topics. Try asking about AI, quantum computing, blockchain, or other tech innovations!";

/// Shown instead of the backend text when no article matched.
pub const NO_RESULTS_ADVISORY: &str = "I couldn't find specific articles about that topic in our knowledge base. However, I'd be happy to help you with questions about artificial intelligence, quantum computing, blockchain technology, cybersecurity, fintech, or other technology and innovation topics.";

/// Body of the synthetic AI message appended when a chat call fails.
pub const CHAT_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Ai,
}

/// Outcome tag the chat backend attaches to every answer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    NotRelevant,
    NoResults,
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Fixed replacement text for non-success statuses.
    pub fn advisory(&self) -> Option<&'static str> {
        match self {
            Self::Success => None,
            Self::NotRelevant => Some(NOT_RELEVANT_ADVISORY),
            Self::NoResults => Some(NO_RESULTS_ADVISORY),
        }
    }
}

/// One entry in the chat transcript.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub articles: Vec<RecommendedArticle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

impl ChatMessage {
    pub fn user(id: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::User,
            content: content.into(),
            created_at: at,
            articles: Vec::new(),
            status: None,
        }
    }

    pub fn ai(
        id: impl Into<String>,
        content: impl Into<String>,
        articles: Vec<RecommendedArticle>,
        status: ResponseStatus,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::Ai,
            content: content.into(),
            created_at: at,
            articles,
            status: Some(status),
        }
    }

    /// Synthetic reply recorded when the chat call fails.
    pub fn apology(id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::ai(id, CHAT_APOLOGY, Vec::new(), ResponseStatus::NoResults, at)
    }

    pub fn is_ai(&self) -> bool {
        self.role == MessageRole::Ai
    }

    /// Text to render for this message.
    pub fn display_text(&self) -> &str {
        match self.status.and_then(|status| status.advisory()) {
            Some(advisory) => advisory,
            None => &self.content,
        }
    }

    /// Recommendations to render; empty unless the answer succeeded.
    pub fn visible_articles(&self) -> &[RecommendedArticle] {
        match self.status {
            Some(ResponseStatus::Success) => &self.articles,
            _ => &[],
        }
    }
}

/// Answer shown in the modal's question-response state.
///
/// Only the success variant carries text and recommendations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestionResponse {
    Success {
        answer: String,
        articles: Vec<RecommendedArticle>,
    },
    NotRelevant,
    NoResults,
}

impl QuestionResponse {
    /// Build from the raw pieces of a chat answer, dropping fields that are
    /// not valid for the status.
    pub fn from_parts(
        status: ResponseStatus,
        answer: String,
        articles: Vec<RecommendedArticle>,
    ) -> Self {
        match status {
            ResponseStatus::Success => Self::Success { answer, articles },
            ResponseStatus::NotRelevant => Self::NotRelevant,
            ResponseStatus::NoResults => Self::NoResults,
        }
    }

    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::Success { .. } => ResponseStatus::Success,
            Self::NotRelevant => ResponseStatus::NotRelevant,
            Self::NoResults => ResponseStatus::NoResults,
        }
    }

    pub fn display_text(&self) -> &str {
        match self {
            Self::Success { answer, .. } => answer,
            Self::NotRelevant => NOT_RELEVANT_ADVISORY,
            Self::NoResults => NO_RESULTS_ADVISORY,
        }
    }

    pub fn articles(&self) -> &[RecommendedArticle] {
        match self {
            Self::Success { articles, .. } => articles,
            _ => &[],
        }
    }
}
