//! JSON bodies exchanged with the webhooks.
//!
//! Field names here are the literal keys the automation service expects;
//! they are case-sensitive.

use axis_core::{
    ArticleSummary, ContactSubmission, Interest, RecommendedArticle, ResponseStatus,
    SubscriberProfile,
};
use serde::{Deserialize, Serialize};

use crate::gateway::{ChatAnswer, ContactReceipt, SubscriptionOutcome};

#[derive(Debug, Serialize)]
pub(crate) struct ContactPayload<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "Email")]
    pub email: &'a str,
    #[serde(rename = "Subject")]
    pub subject: &'a str,
    #[serde(rename = "Interest")]
    pub interest: &'a str,
    #[serde(rename = "Message")]
    pub message: &'a str,
}

impl<'a> From<&'a ContactSubmission> for ContactPayload<'a> {
    fn from(submission: &'a ContactSubmission) -> Self {
        Self {
            name: &submission.profile.name,
            email: &submission.profile.email,
            subject: &submission.subject,
            interest: submission.profile.interest.label(),
            message: &submission.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactResponseBody {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "showSubscribePrompt", default)]
    pub show_subscribe_prompt: bool,
    #[serde(rename = "recommendedData", default)]
    pub recommended_data: Option<RecommendedData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendedData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub interest: String,
}

impl From<ContactResponseBody> for ContactReceipt {
    fn from(body: ContactResponseBody) -> Self {
        let recommended_profile = body.recommended_data.and_then(|data| {
            match data.interest.parse::<Interest>() {
                Ok(interest) => Some(SubscriberProfile::new(data.name, data.email, interest)),
                Err(e) => {
                    tracing::warn!("Dropping recommended profile: {}", e);
                    None
                }
            }
        });
        Self {
            status: body.status,
            should_prompt_subscription: body.show_subscribe_prompt,
            recommended_profile,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubscriptionPayload<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub interest: &'a str,
    pub subscribed: bool,
}

impl<'a> SubscriptionPayload<'a> {
    pub fn new(profile: &'a SubscriberProfile, subscribed: bool) -> Self {
        Self {
            name: &profile.name,
            email: &profile.email,
            interest: profile.interest.label(),
            subscribed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubscriptionResponseBody {
    #[serde(default)]
    pub response: Option<Vec<ArticleSummary>>,
}

impl From<SubscriptionResponseBody> for SubscriptionOutcome {
    fn from(body: SubscriptionResponseBody) -> Self {
        Self {
            recommendations: body.response.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatQuery<'a> {
    #[serde(rename = "chatInput")]
    pub chat_input: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseBody {
    pub status: ResponseStatus,
    #[serde(default)]
    pub data: ChatResponseData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatResponseData {
    #[serde(default)]
    pub ai_answer: String,
    #[serde(default)]
    pub recommended_articles: Option<Vec<RecommendedArticle>>,
}

impl From<ChatResponseBody> for ChatAnswer {
    fn from(body: ChatResponseBody) -> Self {
        Self {
            answer: body.data.ai_answer,
            recommendations: body.data.recommended_articles.unwrap_or_default(),
            status: body.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_payload_uses_exact_webhook_keys() {
        let submission = ContactSubmission {
            profile: SubscriberProfile::new("Ada", "ada@example.com", Interest::Web3),
            subject: "Hello there".to_string(),
            message: "A message long enough".to_string(),
        };

        let json = serde_json::to_value(ContactPayload::from(&submission)).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["Email", "Interest", "Message", "Name", "Subject"]);
        assert_eq!(json["Interest"], "Web3");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn contact_response_with_unknown_interest_drops_profile() {
        let body: ContactResponseBody = serde_json::from_str(
            r#"{"status":"stored","showSubscribePrompt":true,
                "recommendedData":{"name":"Ada","email":"ada@example.com","interest":"Gardening"}}"#,
        )
        .unwrap();

        let receipt = ContactReceipt::from(body);
        assert!(receipt.should_prompt_subscription);
        assert!(receipt.recommended_profile.is_none());
    }

    #[test]
    fn empty_subscription_response_has_no_recommendations() {
        let body: SubscriptionResponseBody = serde_json::from_str("{}").unwrap();
        assert!(SubscriptionOutcome::from(body).recommendations.is_empty());

        let body: SubscriptionResponseBody = serde_json::from_str(r#"{"response":null}"#).unwrap();
        assert!(SubscriptionOutcome::from(body).recommendations.is_empty());
    }

    #[test]
    fn chat_response_flattens_data() {
        let body: ChatResponseBody = serde_json::from_str(
            r#"{"status":"success","data":{"ai_answer":"Yes.","recommended_articles":[
                {"article_id":1,"title":"T","summary":"S","category":"AI","author":"A",
                 "published_date":"2024-01-01","article_url":"/blog/t","read_time_minutes":3}]}}"#,
        )
        .unwrap();

        let answer = ChatAnswer::from(body);
        assert_eq!(answer.status, ResponseStatus::Success);
        assert_eq!(answer.answer, "Yes.");
        assert_eq!(answer.recommendations.len(), 1);
    }

    #[test]
    fn chat_query_key_is_camel_case() {
        let json = serde_json::to_string(&ChatQuery { chat_input: "hi" }).unwrap();
        assert_eq!(json, r#"{"chatInput":"hi"}"#);
    }
}
