//! Composition root for the site's interactive state.
//!
//! `SiteController` owns both sessions and performs their network calls.
//! Session locks are released before every awaited call and retaken to
//! apply the result; snapshots are republished after each change.

use std::sync::Arc;
use std::time::Duration;

use axis_content::ContentStore;
use axis_core::{Article, ContactForm, SiteConfig, SubscriberProfile, SubscriptionForm};
use axis_gateway::{ContactReceipt, SubscriptionOutcome, WebhookGateway};
use chrono::Utc;
use tokio::sync::{mpsc, watch, RwLock};

use crate::chat::{ChatSession, ChatSnapshot, ChatTicket};
use crate::error::{ControllerError, Result};
use crate::machine::ModalState;
use crate::modal::{ModalSession, ModalSnapshot};
use crate::notice::Notice;

pub struct SiteController {
    gateway: Arc<dyn WebhookGateway>,
    content: Arc<dyn ContentStore>,
    modal: RwLock<ModalSession>,
    chat: RwLock<ChatSession>,
    modal_tx: watch::Sender<ModalSnapshot>,
    chat_tx: watch::Sender<ChatSnapshot>,
    notice_tx: Option<mpsc::Sender<Notice>>,
    /// Bound on each content store call.
    request_timeout: Duration,
}

impl SiteController {
    pub fn new(gateway: Arc<dyn WebhookGateway>, content: Arc<dyn ContentStore>) -> Self {
        let (modal_tx, _) = watch::channel(ModalSnapshot::default());
        let (chat_tx, _) = watch::channel(ChatSnapshot::default());
        Self {
            gateway,
            content,
            modal: RwLock::new(ModalSession::new()),
            chat: RwLock::new(ChatSession::new()),
            modal_tx,
            chat_tx,
            notice_tx: None,
            request_timeout: SiteConfig::default().request_timeout(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_notice_channel(mut self, tx: mpsc::Sender<Notice>) -> Self {
        self.notice_tx = Some(tx);
        self
    }

    pub fn watch_modal(&self) -> watch::Receiver<ModalSnapshot> {
        self.modal_tx.subscribe()
    }

    pub fn watch_chat(&self) -> watch::Receiver<ChatSnapshot> {
        self.chat_tx.subscribe()
    }

    pub async fn modal_snapshot(&self) -> ModalSnapshot {
        self.modal.read().await.snapshot()
    }

    pub async fn chat_snapshot(&self) -> ChatSnapshot {
        self.chat.read().await.snapshot()
    }

    // ========== Contact ==========

    /// Validate and send the contact form; opens the modal when the backend
    /// asks for a subscription prompt.
    pub async fn submit_contact(&self, form: ContactForm) -> Result<ContactReceipt> {
        let submission = match form.into_submission() {
            Ok(submission) => submission,
            Err(errors) => {
                let error = ControllerError::Validation(errors);
                self.notify(Notice::failure("Validation Error", &error)).await;
                return Err(error);
            }
        };

        match self.gateway.submit_contact_form(&submission).await {
            Ok(receipt) => {
                tracing::info!("Contact form accepted with status {}", receipt.status);
                self.notify(Notice::info(
                    "Message Sent!",
                    "Your message has been submitted successfully. We'll get back to you soon.",
                ))
                .await;
                if receipt.should_prompt_subscription {
                    let profile = receipt
                        .recommended_profile
                        .clone()
                        .unwrap_or_else(|| submission.profile.clone());
                    self.open_modal(profile).await;
                }
                Ok(receipt)
            }
            Err(error) => {
                tracing::warn!("Contact form submission failed: {}", error);
                let error = ControllerError::from(error);
                self.notify(Notice::failure("Submission Failed", &error)).await;
                Err(error)
            }
        }
    }

    /// Standalone newsletter signup, outside the modal.
    pub async fn submit_subscription_form(
        &self,
        form: SubscriptionForm,
    ) -> Result<SubscriptionOutcome> {
        let profile = form.into_profile().map_err(ControllerError::Validation)?;

        match self
            .gateway
            .submit_subscription_decision(&profile, true)
            .await
        {
            Ok(outcome) => {
                self.notify(Notice::info(
                    "Success!",
                    "You've been successfully subscribed to our newsletter.",
                ))
                .await;
                Ok(outcome)
            }
            Err(error) => {
                tracing::warn!("Newsletter subscription failed: {}", error);
                let error = ControllerError::from(error);
                self.notify(Notice::failure("Subscription Failed", &error))
                    .await;
                Err(error)
            }
        }
    }

    // ========== Subscription modal ==========

    pub async fn open_modal(&self, profile: SubscriberProfile) {
        let mut modal = self.modal.write().await;
        modal.open(profile);
        self.publish_modal(&modal);
    }

    pub async fn close_modal(&self) {
        let mut modal = self.modal.write().await;
        modal.close();
        self.publish_modal(&modal);
    }

    /// Send the subscribe (`true`) or decline (`false`) decision.
    pub async fn subscribe(&self, subscribed: bool) -> Result<ModalState> {
        let (ticket, profile) = {
            let mut modal = self.modal.write().await;
            let started = modal.begin_decision(subscribed)?;
            self.publish_modal(&modal);
            started
        };

        let result = self
            .gateway
            .submit_subscription_decision(&profile, subscribed)
            .await;

        let applied = {
            let mut modal = self.modal.write().await;
            let applied = modal.finish_decision(ticket, result);
            self.publish_modal(&modal);
            applied
        };

        match &applied {
            Ok(_) if subscribed => {
                self.notify(Notice::info(
                    "Success!",
                    "You've been subscribed! Check your email for confirmation.",
                ))
                .await;
            }
            Ok(_) | Err(ControllerError::Stale) => {}
            Err(error) => {
                let title = if subscribed {
                    "Subscription Failed"
                } else {
                    "Error"
                };
                self.notify(Notice::failure(title, error)).await;
            }
        }
        applied
    }

    /// Load a recommended article by slug and show it.
    pub async fn read_article(&self, slug: &str) -> Result<Article> {
        let ticket = {
            let mut modal = self.modal.write().await;
            let ticket = modal.begin_read()?;
            self.publish_modal(&modal);
            ticket
        };

        let lookup = match tokio::time::timeout(
            self.request_timeout,
            self.content.find_active_by_slug(slug),
        )
        .await
        {
            Ok(Ok(Some(article))) => Ok(article),
            Ok(Ok(None)) => Err(ControllerError::ArticleNotFound(slug.to_string())),
            Ok(Err(error)) => Err(ControllerError::Store(error)),
            Err(_) => Err(ControllerError::Timeout(self.request_timeout)),
        };

        let applied = {
            let mut modal = self.modal.write().await;
            let applied = modal.finish_read(ticket, lookup);
            self.publish_modal(&modal);
            applied
        };

        match applied {
            Ok(article) => {
                self.record_view(&article).await;
                Ok(article)
            }
            Err(ControllerError::Stale) => Err(ControllerError::Stale),
            Err(error) => {
                tracing::warn!("Could not open article {:?}: {}", slug, error);
                self.notify(Notice::failure("Article Not Found", &error)).await;
                Err(error)
            }
        }
    }

    async fn record_view(&self, article: &Article) {
        let increment = self.content.increment_view_count(article.id);
        match tokio::time::timeout(self.request_timeout, increment).await {
            Ok(Ok(_)) => {}
            Ok(Err(error)) => {
                tracing::warn!("Failed to record view for article {}: {}", article.id, error)
            }
            Err(_) => tracing::warn!("Recording a view for article {} timed out", article.id),
        }
    }

    pub async fn navigate_back(&self) -> Result<ModalState> {
        self.modal_step(ModalSession::navigate_back).await
    }

    pub async fn back_to_subscribe(&self) -> Result<ModalState> {
        self.modal_step(ModalSession::back_to_subscribe).await
    }

    pub async fn open_question_form(&self) -> Result<ModalState> {
        self.modal_step(ModalSession::open_question_form).await
    }

    pub async fn ask_another(&self) -> Result<ModalState> {
        self.modal_step(ModalSession::ask_another).await
    }

    pub async fn back_to_articles(&self) -> Result<ModalState> {
        self.modal_step(ModalSession::back_to_articles).await
    }

    pub async fn ask_question(&self, question: &str) -> Result<ModalState> {
        let ticket = {
            let mut modal = self.modal.write().await;
            let ticket = modal.begin_question(question)?;
            self.publish_modal(&modal);
            ticket
        };

        let result = self.gateway.ask_question(question.trim()).await;

        let applied = {
            let mut modal = self.modal.write().await;
            let applied = modal.finish_question(ticket, result);
            self.publish_modal(&modal);
            applied
        };

        if let Err(error) = &applied {
            if !matches!(error, ControllerError::Stale) {
                self.notify(Notice::failure("Question Failed", error)).await;
            }
        }
        applied
    }

    async fn modal_step<F>(&self, step: F) -> Result<ModalState>
    where
        F: FnOnce(&mut ModalSession) -> Result<ModalState>,
    {
        let mut modal = self.modal.write().await;
        let state = step(&mut *modal)?;
        self.publish_modal(&modal);
        Ok(state)
    }

    // ========== Chat panel ==========

    pub async fn open_chat(&self) {
        let mut chat = self.chat.write().await;
        chat.open();
        self.publish_chat(&chat);
    }

    pub async fn close_chat(&self) {
        let mut chat = self.chat.write().await;
        chat.close();
        self.publish_chat(&chat);
    }

    pub async fn clear_chat(&self) {
        let mut chat = self.chat.write().await;
        chat.clear();
        self.publish_chat(&chat);
    }

    /// Blank text is ignored.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let ticket = {
            let mut chat = self.chat.write().await;
            let Some(ticket) = chat.begin_send(text, Utc::now())? else {
                return Ok(());
            };
            self.publish_chat(&chat);
            ticket
        };
        self.complete_chat(ticket, text).await
    }

    pub async fn retry_last_message(&self) -> Result<()> {
        let (ticket, text) = {
            let mut chat = self.chat.write().await;
            let ticket = chat.begin_retry(Utc::now())?;
            self.publish_chat(&chat);
            let text = chat.last_user_message().unwrap_or_default().to_string();
            (ticket, text)
        };
        self.complete_chat(ticket, &text).await
    }

    async fn complete_chat(&self, ticket: ChatTicket, text: &str) -> Result<()> {
        let result = self.gateway.ask_question(text).await;
        if let Err(error) = &result {
            tracing::warn!("Chat question failed: {}", error);
        }

        let mut chat = self.chat.write().await;
        let applied = chat.finish(ticket, result, Utc::now());
        self.publish_chat(&chat);
        applied
    }

    // ========== Publishing ==========

    fn publish_modal(&self, modal: &ModalSession) {
        self.modal_tx.send_replace(modal.snapshot());
    }

    fn publish_chat(&self, chat: &ChatSession) {
        self.chat_tx.send_replace(chat.snapshot());
    }

    async fn notify(&self, notice: Notice) {
        if let Some(ref tx) = self.notice_tx {
            let _ = tx.send(notice).await;
        }
    }
}
