//! Chat panel session: transcript, loading flag and retry bookkeeping.

use axis_core::ChatMessage;
use axis_gateway::{ChatAnswer, ErrorKind, GatewayError};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ControllerError, Result};

/// Identifies one in-flight chat call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTicket {
    pub generation: u64,
}

/// What views render for the chat panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatSnapshot {
    pub is_open: bool,
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
    pub error: Option<ErrorKind>,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    is_open: bool,
    messages: Vec<ChatMessage>,
    is_loading: bool,
    error: Option<GatewayError>,
    last_user_message: Option<String>,
    generation: u64,
    last_id: i64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&GatewayError> {
        self.error.as_ref()
    }

    pub fn last_user_message(&self) -> Option<&str> {
        self.last_user_message.as_deref()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            is_open: self.is_open,
            messages: self.messages.clone(),
            is_loading: self.is_loading,
            error: self.error.as_ref().map(|e| e.kind),
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.error = None;
    }

    /// Hide the panel. The transcript is kept; an answer still in flight is
    /// dropped.
    pub fn close(&mut self) {
        self.is_open = false;
        self.error = None;
        self.abandon_in_flight();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.error = None;
        self.last_user_message = None;
        self.abandon_in_flight();
    }

    fn abandon_in_flight(&mut self) {
        if self.is_loading {
            self.generation += 1;
            self.is_loading = false;
        }
    }

    /// Append the user's message and take the loading slot.
    ///
    /// Returns `Ok(None)` for blank input, which is ignored.
    pub fn begin_send(&mut self, text: &str, now: DateTime<Utc>) -> Result<Option<ChatTicket>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if self.is_loading {
            return Err(ControllerError::Busy);
        }
        let id = self.next_id(now);
        self.messages.push(ChatMessage::user(id, text, now));
        Ok(Some(self.start(text)))
    }

    /// Drop the apology left by a failed call and resend the last user text.
    ///
    /// The user message is only appended again when it is no longer the
    /// last entry of the transcript.
    pub fn begin_retry(&mut self, now: DateTime<Utc>) -> Result<ChatTicket> {
        if self.is_loading {
            return Err(ControllerError::Busy);
        }
        let text = self
            .last_user_message
            .clone()
            .ok_or(ControllerError::NothingToRetry)?;

        if self.error.is_some() && self.messages.last().is_some_and(ChatMessage::is_ai) {
            self.messages.pop();
        }

        let resend = self
            .messages
            .last()
            .is_some_and(|m| !m.is_ai() && m.content == text);
        if !resend {
            let id = self.next_id(now);
            self.messages.push(ChatMessage::user(id, text.as_str(), now));
        }
        Ok(self.start(&text))
    }

    fn start(&mut self, text: &str) -> ChatTicket {
        self.error = None;
        self.last_user_message = Some(text.to_string());
        self.is_loading = true;
        ChatTicket {
            generation: self.generation,
        }
    }

    /// Append the answer, or the apology plus a retryable error on failure.
    pub fn finish(
        &mut self,
        ticket: ChatTicket,
        result: std::result::Result<ChatAnswer, GatewayError>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.is_loading || ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale chat result (generation {} vs {})",
                ticket.generation,
                self.generation
            );
            return Err(ControllerError::Stale);
        }
        self.is_loading = false;

        let id = self.next_id(now);
        match result {
            Ok(answer) => {
                self.messages.push(ChatMessage::ai(
                    id,
                    answer.answer,
                    answer.recommendations,
                    answer.status,
                    now,
                ));
                Ok(())
            }
            Err(error) => {
                self.messages.push(ChatMessage::apology(id, now));
                self.error = Some(error.clone());
                Err(error.into())
            }
        }
    }

    /// Millisecond timestamp, bumped when two messages land in the same
    /// millisecond.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = millis;
        millis.to_string()
    }
}
