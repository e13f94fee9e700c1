//! Data model shared across the site crates.

mod article;
mod message;
mod profile;

pub use article::{Article, ArticleSummary, RecommendedArticle};
pub use message::{
    ChatMessage, MessageRole, QuestionResponse, ResponseStatus, CHAT_APOLOGY, NOT_RELEVANT_ADVISORY,
    NO_RESULTS_ADVISORY,
};
pub use profile::{Interest, SubscriberProfile, UnknownInterest};
