//! Modal events - what moves the modal between screens
//!
//! Events that follow a network call are only raised after the call
//! succeeded; failures leave the machine where it was.

use serde::{Deserialize, Serialize};

/// Defines the events that can trigger state transitions in the modal FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalEvent {
    // ========== Subscription ==========
    /// The subscribe call succeeded.
    SubscriptionConfirmed,

    /// The decline call succeeded.
    SubscriptionDeclined,

    /// User went from the subscribed screen back to the prompt.
    BackToSubscribe,

    // ========== Articles ==========
    /// The requested article was loaded.
    ArticleOpened,

    /// The requested article could not be loaded.
    ArticleUnavailable { has_recommendations: bool },

    /// User left the article view.
    NavigatedBack { has_recommendations: bool },

    // ========== Questions ==========
    /// User opened the question form.
    QuestionFormOpened,

    /// The question call succeeded.
    QuestionAnswered,

    /// User wants to ask something else.
    AskAnother,

    /// User left the question flow.
    BackToArticles,

    // ========== Lifecycle ==========
    /// Modal closed; always allowed.
    Closed,
}

impl ModalEvent {
    /// Check if this event is raised directly by a user action.
    pub fn is_user_event(&self) -> bool {
        matches!(
            self,
            Self::BackToSubscribe
                | Self::NavigatedBack { .. }
                | Self::QuestionFormOpened
                | Self::AskAnother
                | Self::BackToArticles
                | Self::Closed
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SubscriptionConfirmed => "subscription_confirmed",
            Self::SubscriptionDeclined => "subscription_declined",
            Self::BackToSubscribe => "back_to_subscribe",
            Self::ArticleOpened => "article_opened",
            Self::ArticleUnavailable { .. } => "article_unavailable",
            Self::NavigatedBack { .. } => "navigated_back",
            Self::QuestionFormOpened => "question_form_opened",
            Self::QuestionAnswered => "question_answered",
            Self::AskAnother => "ask_another",
            Self::BackToArticles => "back_to_articles",
            Self::Closed => "closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_event_detection() {
        assert!(ModalEvent::Closed.is_user_event());
        assert!(ModalEvent::NavigatedBack {
            has_recommendations: true
        }
        .is_user_event());
        assert!(!ModalEvent::SubscriptionConfirmed.is_user_event());
        assert!(!ModalEvent::QuestionAnswered.is_user_event());
    }
}
