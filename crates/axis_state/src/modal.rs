//! Subscription modal session.
//!
//! Holds everything the modal shows between open and close. Calls that go
//! over the network are split into `begin_*`, which validates and takes a
//! [`Ticket`], and `finish_*`, which applies the result only if the ticket
//! still matches the session.

use axis_core::{validate_question, Article, ArticleSummary, QuestionResponse, SubscriberProfile};
use axis_gateway::{ChatAnswer, GatewayError, SubscriptionOutcome};
use serde::Serialize;

use crate::error::{ControllerError, Result};
use crate::machine::{ModalEvent, ModalMachine, ModalState, TransitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Subscribe,
    Decline,
    ReadArticle,
    AskQuestion,
}

impl ModalAction {
    /// Event raised when the call succeeds.
    fn success_event(&self) -> ModalEvent {
        match self {
            Self::Subscribe => ModalEvent::SubscriptionConfirmed,
            Self::Decline => ModalEvent::SubscriptionDeclined,
            Self::ReadArticle => ModalEvent::ArticleOpened,
            Self::AskQuestion => ModalEvent::QuestionAnswered,
        }
    }
}

/// Identifies one in-flight call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub origin: ModalState,
    pub action: ModalAction,
}

/// What views render for the modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModalSnapshot {
    pub is_open: bool,
    pub state: ModalState,
    pub profile: Option<SubscriberProfile>,
    pub recommendations: Vec<ArticleSummary>,
    pub current_article: Option<Article>,
    pub question_response: Option<QuestionResponse>,
    pub is_busy: bool,
}

#[derive(Debug, Default)]
pub struct ModalSession {
    is_open: bool,
    machine: ModalMachine,
    profile: Option<SubscriberProfile>,
    recommendations: Vec<ArticleSummary>,
    current_article: Option<Article>,
    question_response: Option<QuestionResponse>,
    pending: Option<Ticket>,
    generation: u64,
}

impl ModalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn state(&self) -> ModalState {
        self.machine.state()
    }

    pub fn profile(&self) -> Option<&SubscriberProfile> {
        self.profile.as_ref()
    }

    pub fn recommendations(&self) -> &[ArticleSummary] {
        &self.recommendations
    }

    pub fn current_article(&self) -> Option<&Article> {
        self.current_article.as_ref()
    }

    pub fn question_response(&self) -> Option<&QuestionResponse> {
        self.question_response.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn machine(&self) -> &ModalMachine {
        &self.machine
    }

    pub fn snapshot(&self) -> ModalSnapshot {
        ModalSnapshot {
            is_open: self.is_open,
            state: self.machine.state(),
            profile: self.profile.clone(),
            recommendations: self.recommendations.clone(),
            current_article: self.current_article.clone(),
            question_response: self.question_response.clone(),
            is_busy: self.is_busy(),
        }
    }

    /// Start a fresh session for `profile`, replacing any previous one.
    pub fn open(&mut self, profile: SubscriberProfile) {
        self.reset();
        self.is_open = true;
        self.profile = Some(profile);
    }

    /// Close and clear. Safe to call any number of times.
    pub fn close(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.is_open = false;
        self.machine.reset();
        self.profile = None;
        self.recommendations.clear();
        self.current_article = None;
        self.question_response = None;
        self.pending = None;
    }

    // ========== Subscription ==========

    /// Returns the profile to send along with the decision.
    pub fn begin_decision(&mut self, subscribed: bool) -> Result<(Ticket, SubscriberProfile)> {
        let action = if subscribed {
            ModalAction::Subscribe
        } else {
            ModalAction::Decline
        };
        let profile = self.profile.clone().ok_or(ControllerError::ModalClosed)?;
        let ticket = self.begin(action)?;
        Ok((ticket, profile))
    }

    pub fn finish_decision(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<SubscriptionOutcome, GatewayError>,
    ) -> Result<ModalState> {
        self.settle(ticket)?;
        let outcome = result?;
        self.transition(ticket.action.success_event())?;
        self.recommendations = outcome.recommendations;
        Ok(self.machine.state())
    }

    pub fn back_to_subscribe(&mut self) -> Result<ModalState> {
        self.ensure_idle()?;
        self.transition(ModalEvent::BackToSubscribe)?;
        Ok(self.machine.state())
    }

    // ========== Articles ==========

    pub fn begin_read(&mut self) -> Result<Ticket> {
        self.begin(ModalAction::ReadArticle)
    }

    /// On failure the modal stays on its listing, or drops to initial when
    /// there is nothing to list.
    pub fn finish_read(&mut self, ticket: Ticket, result: Result<Article>) -> Result<Article> {
        self.settle(ticket)?;
        match result {
            Ok(article) => {
                self.transition(ModalEvent::ArticleOpened)?;
                self.current_article = Some(article.clone());
                Ok(article)
            }
            Err(error) => {
                self.transition(ModalEvent::ArticleUnavailable {
                    has_recommendations: !self.recommendations.is_empty(),
                })?;
                Err(error)
            }
        }
    }

    pub fn navigate_back(&mut self) -> Result<ModalState> {
        self.ensure_open()?;
        self.transition(ModalEvent::NavigatedBack {
            has_recommendations: !self.recommendations.is_empty(),
        })?;
        self.current_article = None;
        Ok(self.machine.state())
    }

    // ========== Questions ==========

    pub fn open_question_form(&mut self) -> Result<ModalState> {
        self.ensure_idle()?;
        self.transition(ModalEvent::QuestionFormOpened)?;
        self.question_response = None;
        Ok(self.machine.state())
    }

    pub fn begin_question(&mut self, question: &str) -> Result<Ticket> {
        let errors = validate_question(question);
        if !errors.is_empty() {
            return Err(ControllerError::Validation(errors));
        }
        self.begin(ModalAction::AskQuestion)
    }

    pub fn finish_question(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<ChatAnswer, GatewayError>,
    ) -> Result<ModalState> {
        self.settle(ticket)?;
        let answer = result?;
        self.transition(ModalEvent::QuestionAnswered)?;
        self.question_response = Some(answer.into_question_response());
        Ok(self.machine.state())
    }

    pub fn ask_another(&mut self) -> Result<ModalState> {
        self.ensure_open()?;
        self.transition(ModalEvent::AskAnother)?;
        self.question_response = None;
        Ok(self.machine.state())
    }

    pub fn back_to_articles(&mut self) -> Result<ModalState> {
        self.ensure_idle()?;
        self.transition(ModalEvent::BackToArticles)?;
        self.question_response = None;
        Ok(self.machine.state())
    }

    // ========== Internals ==========

    fn ensure_open(&self) -> Result<()> {
        if self.is_open {
            Ok(())
        } else {
            Err(ControllerError::ModalClosed)
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        self.ensure_open()?;
        if self.pending.is_some() {
            return Err(ControllerError::Busy);
        }
        Ok(())
    }

    fn begin(&mut self, action: ModalAction) -> Result<Ticket> {
        self.ensure_idle()?;
        let event = action.success_event();
        if !self.machine.can_transition(&event) {
            return Err(TransitionError::InvalidTransition {
                from: self.machine.state(),
                event: event.name().to_string(),
            }
            .into());
        }
        let ticket = Ticket {
            generation: self.generation,
            origin: self.machine.state(),
            action,
        };
        self.pending = Some(ticket);
        Ok(ticket)
    }

    /// Release the slot held by `ticket`, or report that the session moved on.
    fn settle(&mut self, ticket: Ticket) -> Result<()> {
        let current = self.pending == Some(ticket)
            && self.generation == ticket.generation
            && self.machine.state() == ticket.origin;
        if !current {
            tracing::debug!(
                "Discarding stale {:?} result (generation {} vs {})",
                ticket.action,
                ticket.generation,
                self.generation
            );
            return Err(ControllerError::Stale);
        }
        self.pending = None;
        Ok(())
    }

    fn transition(&mut self, event: ModalEvent) -> Result<()> {
        let transition = self.machine.handle_event(event)?;
        tracing::debug!(
            "Modal transition {:?} -> {:?} on {}",
            transition.from,
            transition.to,
            event.name()
        );
        Ok(())
    }
}
