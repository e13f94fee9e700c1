//! Subscription modal flows through SiteController


use std::time::Duration;

use axis_content::ContentStore;
use axis_core::{ContactForm, QuestionResponse, ResponseStatus, SubscriptionForm};
use axis_gateway::{ContactReceipt, ErrorKind, GatewayError};
use axis_state::{ControllerError, ModalSnapshot, ModalState, NoticeVariant};
use test_utils::{answer, failure, harness, outcome, profile, stalled_harness, summaries, Call};

async fn subscribed(h: &test_utils::Harness) {
    h.gateway.push_decision(outcome());
    h.controller.open_modal(profile()).await;
    h.controller.subscribe(true).await.expect("subscribe succeeds");
}

#[tokio::test]
async fn confirming_subscription_lists_recommendations() {
    let mut h = harness();
    subscribed(&h).await;

    let snapshot = h.controller.modal_snapshot().await;
    assert_eq!(snapshot.state, ModalState::Success);
    assert_eq!(snapshot.recommendations, summaries());
    assert!(!snapshot.is_busy);
    assert_eq!(h.gateway.calls(), vec![Call::Decision(true)]);

    let notice = h.notices.try_recv().expect("success notice");
    assert_eq!(notice.title, "Success!");
    assert_eq!(notice.variant, NoticeVariant::Default);
}

#[tokio::test]
async fn declining_lists_articles_only() {
    let h = harness();
    h.gateway.push_decision(outcome());
    h.controller.open_modal(profile()).await;

    let state = h.controller.subscribe(false).await.unwrap();
    assert_eq!(state, ModalState::ArticlesOnly);
    assert_eq!(h.controller.modal_snapshot().await.recommendations.len(), 2);
    assert_eq!(h.gateway.calls(), vec![Call::Decision(false)]);
}

#[tokio::test]
async fn failed_subscription_stays_on_the_prompt() {
    let mut h = harness();
    h.gateway
        .push_decision(Err(GatewayError::new(ErrorKind::Server, "HTTP 500")));
    h.controller.open_modal(profile()).await;
    let before = h.controller.modal_snapshot().await;

    let err = h.controller.subscribe(true).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Server));
    assert_eq!(h.controller.modal_snapshot().await, before);

    let notice = h.notices.try_recv().expect("failure notice");
    assert_eq!(notice.title, "Subscription Failed");
    assert_eq!(notice.description, "Server error. Please try again later.");
    assert!(notice.is_destructive());
}

#[tokio::test]
async fn closing_twice_leaves_the_same_cleared_state() {
    let h = harness();
    subscribed(&h).await;

    h.controller.close_modal().await;
    let first = h.controller.modal_snapshot().await;
    h.controller.close_modal().await;
    let second = h.controller.modal_snapshot().await;

    assert_eq!(first, second);
    assert_eq!(second, ModalSnapshot::default());
    assert_eq!(second.state, ModalState::Initial);
    assert!(second.recommendations.is_empty());
    assert!(second.current_article.is_none());
}

#[tokio::test]
async fn reading_then_going_back_restores_the_listing() {
    let h = harness();
    h.gateway.push_decision(outcome());
    h.controller.open_modal(profile()).await;
    h.controller.subscribe(false).await.unwrap();
    let listing = h.controller.modal_snapshot().await;

    let article = h.controller.read_article("robot-arms").await.unwrap();
    assert_eq!(article.id, 2);
    let reading = h.controller.modal_snapshot().await;
    assert_eq!(reading.state, ModalState::ReadingArticle);
    assert_eq!(reading.current_article.as_ref().map(|a| a.id), Some(2));

    let state = h.controller.navigate_back().await.unwrap();
    assert_eq!(state, ModalState::ArticlesOnly);
    assert_eq!(h.controller.modal_snapshot().await, listing);

    let stored = h.content.find_by_exact_slug("robot-arms").await.unwrap().unwrap();
    assert_eq!(stored.view_count, 1);
}

#[tokio::test]
async fn back_from_success_listing_returns_to_success() {
    let h = harness();
    subscribed(&h).await;

    h.controller.read_article("robot-arms").await.unwrap();
    assert_eq!(h.controller.navigate_back().await.unwrap(), ModalState::Success);
    assert_eq!(
        h.controller.back_to_subscribe().await.unwrap(),
        ModalState::Initial
    );
}

#[tokio::test]
async fn slug_with_trailing_space_still_opens_the_article() {
    let h = harness();
    subscribed(&h).await;

    let article = h.controller.read_article("quantum computing ").await.unwrap();
    assert_eq!(article.id, 1);
    assert_eq!(
        h.controller.modal_snapshot().await.state,
        ModalState::ReadingArticle
    );
}

#[tokio::test]
async fn missing_article_keeps_the_listing_and_notifies() {
    let mut h = harness();
    subscribed(&h).await;
    h.notices.try_recv().expect("subscribe notice");

    let err = h.controller.read_article("no-such-post").await.unwrap_err();
    assert!(matches!(err, ControllerError::ArticleNotFound(_)));

    let snapshot = h.controller.modal_snapshot().await;
    assert_eq!(snapshot.state, ModalState::Success);
    assert_eq!(snapshot.recommendations, summaries());
    assert!(snapshot.current_article.is_none());

    let notice = h.notices.try_recv().expect("not found notice");
    assert_eq!(notice.title, "Article Not Found");
}

#[tokio::test]
async fn reading_from_the_prompt_is_rejected() {
    let h = harness();
    h.controller.open_modal(profile()).await;

    let err = h.controller.read_article("robot-arms").await.unwrap_err();
    assert!(matches!(err, ControllerError::InvalidTransition(_)));
    assert!(!h.controller.modal_snapshot().await.is_busy);
}

#[tokio::test]
async fn off_topic_answers_never_carry_articles() {
    let h = harness();
    subscribed(&h).await;
    h.gateway
        .push_answer(answer(ResponseStatus::NotRelevant, "raw backend text"));

    h.controller.open_question_form().await.unwrap();
    let state = h.controller.ask_question("Best pizza?").await.unwrap();
    assert_eq!(state, ModalState::QuestionResponse);

    let response = h.controller.modal_snapshot().await.question_response.unwrap();
    assert_eq!(response, QuestionResponse::NotRelevant);
    assert!(response.articles().is_empty());
    assert!(response.display_text().starts_with("I specialize in technology"));
}

#[tokio::test]
async fn question_flow_round_trip() {
    let h = harness();
    subscribed(&h).await;
    h.gateway
        .push_answer(answer(ResponseStatus::Success, "Qubits hold superpositions."));

    h.controller.open_question_form().await.unwrap();
    h.controller.ask_question("  What is a qubit?  ").await.unwrap();
    assert_eq!(
        h.gateway.calls().last(),
        Some(&Call::Question("What is a qubit?".to_string()))
    );

    let response = h.controller.modal_snapshot().await.question_response.unwrap();
    assert_eq!(response.display_text(), "Qubits hold superpositions.");
    assert_eq!(response.articles().len(), 1);

    assert_eq!(h.controller.ask_another().await.unwrap(), ModalState::AskQuestion);
    assert!(h.controller.modal_snapshot().await.question_response.is_none());

    assert_eq!(h.controller.back_to_articles().await.unwrap(), ModalState::Success);
}

#[tokio::test]
async fn blank_question_never_reaches_the_gateway() {
    let h = harness();
    subscribed(&h).await;
    h.controller.open_question_form().await.unwrap();

    let err = h.controller.ask_question("   ").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Validation));
    assert_eq!(h.gateway.calls(), vec![Call::Decision(true)]);
    assert_eq!(
        h.controller.modal_snapshot().await.state,
        ModalState::AskQuestion
    );
}

#[tokio::test]
async fn second_decision_while_busy_is_rejected() {
    let h = harness();
    h.controller.open_modal(profile()).await;
    h.gateway.push_decision(outcome());
    let release = h.gateway.hold();

    let controller = h.controller.clone();
    let first = tokio::spawn(async move { controller.subscribe(true).await });

    let mut modal = h.controller.watch_modal();
    modal.wait_for(|s| s.is_busy).await.unwrap();

    let err = h.controller.subscribe(false).await.unwrap_err();
    assert!(matches!(err, ControllerError::Busy));
    assert_eq!(h.gateway.calls(), vec![Call::Decision(true)]);

    release.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), ModalState::Success);
}

#[tokio::test]
async fn result_arriving_after_close_is_discarded() {
    let h = harness();
    h.controller.open_modal(profile()).await;
    h.gateway.push_decision(outcome());
    let release = h.gateway.hold();

    let controller = h.controller.clone();
    let pending = tokio::spawn(async move { controller.subscribe(true).await });

    let mut modal = h.controller.watch_modal();
    modal.wait_for(|s| s.is_busy).await.unwrap();

    h.controller.close_modal().await;
    h.controller.open_modal(profile()).await;
    release.notify_one();

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, ControllerError::Stale));

    let snapshot = h.controller.modal_snapshot().await;
    assert!(snapshot.is_open);
    assert_eq!(snapshot.state, ModalState::Initial);
    assert!(snapshot.recommendations.is_empty());
    assert!(!snapshot.is_busy);
}

#[tokio::test]
async fn contact_submission_can_open_the_modal() {
    let mut h = harness();
    h.gateway.push_contact(Ok(ContactReceipt {
        status: "received".to_string(),
        should_prompt_subscription: true,
        recommended_profile: None,
    }));

    let form = ContactForm {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        interest: "Quantum Computing".to_string(),
        subject: "Partnership".to_string(),
        message: "Let's talk about qubits.".to_string(),
    };
    let receipt = h.controller.submit_contact(form).await.unwrap();
    assert!(receipt.should_prompt_subscription);

    let snapshot = h.controller.modal_snapshot().await;
    assert!(snapshot.is_open);
    assert_eq!(snapshot.profile, Some(profile()));
    assert_eq!(h.notices.try_recv().unwrap().title, "Message Sent!");
}

#[tokio::test]
async fn invalid_contact_form_is_not_sent() {
    let mut h = harness();

    let err = h
        .controller
        .submit_contact(ContactForm::default())
        .await
        .unwrap_err();
    match err {
        ControllerError::Validation(errors) => assert!(errors.get("email").is_some()),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(h.gateway.calls().is_empty());
    assert!(!h.controller.modal_snapshot().await.is_open);
    assert_eq!(h.notices.try_recv().unwrap().title, "Validation Error");
}

#[tokio::test]
async fn stalled_article_lookup_times_out_and_frees_the_modal() {
    let (controller, gateway) = stalled_harness(Duration::from_millis(50));
    gateway.push_decision(outcome());
    controller.open_modal(profile()).await;
    controller.subscribe(false).await.unwrap();

    let err = tokio::time::timeout(Duration::from_secs(5), controller.read_article("x"))
        .await
        .expect("lookup is bounded")
        .unwrap_err();
    assert!(matches!(err, ControllerError::Timeout(_)));
    assert_eq!(err.kind(), Some(ErrorKind::Timeout));

    let snapshot = controller.modal_snapshot().await;
    assert_eq!(snapshot.state, ModalState::ArticlesOnly);
    assert!(!snapshot.is_busy);
    assert_eq!(
        controller.open_question_form().await.unwrap(),
        ModalState::AskQuestion
    );
}

#[tokio::test]
async fn stalled_lookup_without_recommendations_returns_to_the_prompt() {
    let (controller, gateway) = stalled_harness(Duration::from_millis(50));
    gateway.push_decision(Ok(axis_gateway::SubscriptionOutcome::default()));
    controller.open_modal(profile()).await;
    controller.subscribe(true).await.unwrap();

    controller.read_article("x").await.unwrap_err();
    let snapshot = controller.modal_snapshot().await;
    assert_eq!(snapshot.state, ModalState::Initial);
    assert!(!snapshot.is_busy);
}

#[tokio::test]
async fn failed_question_stays_on_the_form() {
    let mut h = harness();
    subscribed(&h).await;
    h.notices.try_recv().expect("subscribe notice");
    h.gateway.push_answer(failure(ErrorKind::Timeout));

    h.controller.open_question_form().await.unwrap();
    let err = h.controller.ask_question("What is a qubit?").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Timeout));

    let snapshot = h.controller.modal_snapshot().await;
    assert_eq!(snapshot.state, ModalState::AskQuestion);
    assert!(!snapshot.is_busy);
    assert!(snapshot.question_response.is_none());

    let notice = h.notices.try_recv().expect("failure notice");
    assert_eq!(notice.title, "Question Failed");
    assert_eq!(
        notice.description,
        "Request timed out. Please check your connection and try again."
    );
    assert!(notice.is_destructive());
}

fn newsletter_form() -> SubscriptionForm {
    SubscriptionForm {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        interest: "Quantum Computing".to_string(),
    }
}

#[tokio::test]
async fn newsletter_signup_subscribes_without_touching_the_modal() {
    let mut h = harness();
    h.gateway.push_decision(outcome());

    let outcome = h
        .controller
        .submit_subscription_form(newsletter_form())
        .await
        .unwrap();
    assert_eq!(outcome.recommendations, summaries());
    assert_eq!(h.gateway.calls(), vec![Call::Decision(true)]);
    assert!(!h.controller.modal_snapshot().await.is_open);
    assert_eq!(h.notices.try_recv().unwrap().title, "Success!");
}

#[tokio::test]
async fn newsletter_signup_validates_before_sending() {
    let h = harness();
    let mut form = newsletter_form();
    form.email = "not-an-email".to_string();

    let err = h.controller.submit_subscription_form(form).await.unwrap_err();
    match err {
        ControllerError::Validation(errors) => assert!(errors.get("email").is_some()),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(h.gateway.calls().is_empty());
}

#[tokio::test]
async fn newsletter_signup_failure_notifies() {
    let mut h = harness();
    h.gateway
        .push_decision(Err(GatewayError::new(ErrorKind::Network, "refused")));

    let err = h
        .controller
        .submit_subscription_form(newsletter_form())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Network));

    let notice = h.notices.try_recv().unwrap();
    assert_eq!(notice.title, "Subscription Failed");
    assert!(notice.is_destructive());
}
