//! State transitions - FSM transition logic
//!
//! Implements the state machine that moves the subscription modal between
//! its screens.

use thiserror::Error;

use super::events::ModalEvent;
use super::states::ModalState;

/// Error type for invalid state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} with event {event}")]
    InvalidTransition { from: ModalState, event: String },
}

/// Represents a state transition result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: ModalState,
    /// The state after the transition.
    pub to: ModalState,
    /// The event that triggered the transition.
    pub event: ModalEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine for the subscription modal.
#[derive(Debug, Clone)]
pub struct ModalMachine {
    /// Current state.
    current_state: ModalState,
    /// Listing screen to come back to from an article or the question flow.
    listing_state: Option<ModalState>,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    /// Max history entries to keep.
    max_history: usize,
}

impl Default for ModalMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalMachine {
    /// Create a new state machine in Initial state.
    pub fn new() -> Self {
        Self::with_state(ModalState::Initial)
    }

    /// Create a state machine with a specific initial state.
    pub fn with_state(state: ModalState) -> Self {
        Self {
            current_state: state,
            listing_state: state.is_listing().then_some(state),
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> ModalState {
        self.current_state
    }

    /// The listing screen last shown, if any.
    pub fn listing_state(&self) -> Option<ModalState> {
        self.listing_state
    }

    /// Get the transition history.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Handle an event and transition to a new state.
    ///
    /// Events that are not valid in the current state leave it untouched.
    pub fn handle_event(&mut self, event: ModalEvent) -> Result<StateTransition, TransitionError> {
        let old_state = self.current_state;
        let new_state = self.compute_next_state(old_state, &event).ok_or_else(|| {
            TransitionError::InvalidTransition {
                from: old_state,
                event: event.name().to_string(),
            }
        })?;

        self.current_state = new_state;
        if new_state.is_listing() {
            self.listing_state = Some(new_state);
        }
        if event == ModalEvent::Closed || new_state == ModalState::Initial {
            self.listing_state = None;
        }

        let transition = StateTransition {
            from: old_state,
            to: new_state,
            event,
            changed: old_state != new_state,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        Ok(transition)
    }

    /// Compute the next state given current state and event.
    fn compute_next_state(&self, state: ModalState, event: &ModalEvent) -> Option<ModalState> {
        use ModalEvent::*;
        use ModalState::*;

        let listing = self.listing_state.unwrap_or(ArticlesOnly);

        let next = match (state, event) {
            // ========== Subscription ==========
            (Initial, SubscriptionConfirmed) => Success,
            (Initial, SubscriptionDeclined) => ArticlesOnly,
            (Success, BackToSubscribe) => Initial,

            // ========== Articles ==========
            (Success | ArticlesOnly, ArticleOpened) => ReadingArticle,
            (
                Success | ArticlesOnly,
                ArticleUnavailable {
                    has_recommendations,
                },
            ) => {
                if *has_recommendations {
                    state
                } else {
                    Initial
                }
            }
            (
                ReadingArticle,
                NavigatedBack {
                    has_recommendations,
                },
            ) => {
                if *has_recommendations {
                    listing
                } else {
                    Initial
                }
            }

            // ========== Questions ==========
            (Success | ArticlesOnly, QuestionFormOpened) => AskQuestion,
            (AskQuestion, QuestionAnswered) => QuestionResponse,
            (QuestionResponse, AskAnother) => AskQuestion,
            (AskQuestion | QuestionResponse, BackToArticles) => listing,

            // ========== Lifecycle ==========
            (_, Closed) => Initial,

            _ => return None,
        };
        Some(next)
    }

    /// Check if a transition is valid without executing it.
    pub fn can_transition(&self, event: &ModalEvent) -> bool {
        self.compute_next_state(self.current_state, event).is_some()
    }

    /// Reset to Initial state.
    pub fn reset(&mut self) {
        self.current_state = ModalState::Initial;
        self.listing_state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_flow() {
        let mut sm = ModalMachine::new();
        assert_eq!(sm.state(), ModalState::Initial);

        let t1 = sm.handle_event(ModalEvent::SubscriptionConfirmed).unwrap();
        assert!(t1.changed);
        assert_eq!(sm.state(), ModalState::Success);

        let t2 = sm.handle_event(ModalEvent::BackToSubscribe).unwrap();
        assert!(t2.changed);
        assert_eq!(sm.state(), ModalState::Initial);
    }

    #[test]
    fn test_back_from_article_restores_listing() {
        let mut sm = ModalMachine::new();
        sm.handle_event(ModalEvent::SubscriptionDeclined).unwrap();
        sm.handle_event(ModalEvent::ArticleOpened).unwrap();
        assert_eq!(sm.state(), ModalState::ReadingArticle);

        sm.handle_event(ModalEvent::NavigatedBack {
            has_recommendations: true,
        })
        .unwrap();
        assert_eq!(sm.state(), ModalState::ArticlesOnly);

        let mut sm = ModalMachine::with_state(ModalState::Success);
        sm.handle_event(ModalEvent::ArticleOpened).unwrap();
        sm.handle_event(ModalEvent::NavigatedBack {
            has_recommendations: true,
        })
        .unwrap();
        assert_eq!(sm.state(), ModalState::Success);
    }

    #[test]
    fn test_back_without_recommendations_goes_to_initial() {
        let mut sm = ModalMachine::with_state(ModalState::ReadingArticle);
        sm.handle_event(ModalEvent::NavigatedBack {
            has_recommendations: false,
        })
        .unwrap();
        assert_eq!(sm.state(), ModalState::Initial);
    }

    #[test]
    fn test_unavailable_article_keeps_or_leaves_listing() {
        let mut sm = ModalMachine::with_state(ModalState::Success);
        let t = sm
            .handle_event(ModalEvent::ArticleUnavailable {
                has_recommendations: true,
            })
            .unwrap();
        assert!(!t.changed);
        assert_eq!(sm.state(), ModalState::Success);

        sm.handle_event(ModalEvent::ArticleUnavailable {
            has_recommendations: false,
        })
        .unwrap();
        assert_eq!(sm.state(), ModalState::Initial);
    }

    #[test]
    fn test_question_flow_round_trip() {
        let mut sm = ModalMachine::with_state(ModalState::Success);
        sm.handle_event(ModalEvent::QuestionFormOpened).unwrap();
        sm.handle_event(ModalEvent::QuestionAnswered).unwrap();
        assert_eq!(sm.state(), ModalState::QuestionResponse);
        sm.handle_event(ModalEvent::AskAnother).unwrap();
        assert_eq!(sm.state(), ModalState::AskQuestion);
        sm.handle_event(ModalEvent::BackToArticles).unwrap();
        assert_eq!(sm.state(), ModalState::Success);
    }

    #[test]
    fn test_invalid_transition_keeps_state() {
        let mut sm = ModalMachine::new();
        let err = sm.handle_event(ModalEvent::ArticleOpened).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: ModalState::Initial,
                event: "article_opened".to_string(),
            }
        );
        assert_eq!(sm.state(), ModalState::Initial);
        assert!(!sm.can_transition(&ModalEvent::BackToSubscribe));
        assert!(sm.history().is_empty());
    }

    #[test]
    fn test_close_is_always_valid_and_idempotent() {
        let mut sm = ModalMachine::with_state(ModalState::QuestionResponse);
        assert!(sm.handle_event(ModalEvent::Closed).unwrap().changed);
        assert!(!sm.handle_event(ModalEvent::Closed).unwrap().changed);
        assert_eq!(sm.state(), ModalState::Initial);
        assert_eq!(sm.listing_state(), None);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut sm = ModalMachine::new();
        for _ in 0..40 {
            sm.handle_event(ModalEvent::SubscriptionConfirmed).unwrap();
            sm.handle_event(ModalEvent::BackToSubscribe).unwrap();
        }
        assert_eq!(sm.history().len(), 50);
    }
}
