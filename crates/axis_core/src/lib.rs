//! axis_core - Core types for the Axis Mundi site
//!
//! This crate provides the types shared by the gateway, the content store and
//! the state machines:
//! - `model` - subscriber profiles, articles, recommendations, chat messages
//! - `validation` - client-side form checks that run before any network call
//! - `config` - webhook base address, endpoint paths and request timeout

pub mod config;
pub mod model;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, Endpoints, SiteConfig};
pub use model::{
    Article, ArticleSummary, ChatMessage, Interest, MessageRole, QuestionResponse,
    RecommendedArticle, ResponseStatus, SubscriberProfile, CHAT_APOLOGY, NOT_RELEVANT_ADVISORY,
    NO_RESULTS_ADVISORY,
};
pub use validation::{
    validate_question, ContactForm, ContactSubmission, SubscriptionForm, ValidationErrors,
};
