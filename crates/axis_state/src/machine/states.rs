//! Modal states - the screens of the subscription modal

use serde::{Deserialize, Serialize};

/// Defines the possible states of the subscription modal.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ModalState {
    /// Asking whether the visitor wants to subscribe.
    #[default]
    Initial,

    /// Subscribed; showing recommendations.
    Success,

    /// Declined; showing recommendations only.
    ArticlesOnly,

    /// Showing one full article.
    ReadingArticle,

    /// Question form is open.
    AskQuestion,

    /// Showing the answer to the last question.
    QuestionResponse,
}

impl ModalState {
    /// States that list recommendations and offer the question form.
    pub fn is_listing(&self) -> bool {
        matches!(self, Self::Success | Self::ArticlesOnly)
    }

    pub fn is_question_flow(&self) -> bool {
        matches!(self, Self::AskQuestion | Self::QuestionResponse)
    }

    /// Get a human-readable description of the current state.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Initial => "Stay updated with personalized insights",
            Self::Success => "You're subscribed",
            Self::ArticlesOnly => "Recommended articles",
            Self::ReadingArticle => "Reading article",
            Self::AskQuestion => "Ask a question",
            Self::QuestionResponse => "Answer",
        }
    }
}
