use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Interest, SubscriberProfile};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const SUBJECT_MIN: usize = 5;
const SUBJECT_MAX: usize = 200;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 2000;

/// Per-field validation messages, keyed by form field name.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Record the first failure for a field; later ones are ignored.
    fn insert(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Drop the message for a field, e.g. when the user edits it again.
    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }
}

/// Raw contact form input as typed by the visitor.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub interest: String,
    pub subject: String,
    pub message: String,
}

/// Contact form after validation: trimmed fields and a typed interest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContactSubmission {
    pub profile: SubscriberProfile,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, &self.name);
        check_email(&mut errors, &self.email);
        check_interest(&mut errors, &self.interest);
        check_length(
            &mut errors,
            "subject",
            &self.subject,
            SUBJECT_MIN,
            SUBJECT_MAX,
            "Subject must be at least 5 characters",
            "Subject must be less than 200 characters",
        );
        check_length(
            &mut errors,
            "message",
            &self.message,
            MESSAGE_MIN,
            MESSAGE_MAX,
            "Message must be at least 10 characters",
            "Message must be less than 2000 characters",
        );
        errors
    }

    /// Validate and convert into the shape the gateway sends.
    pub fn into_submission(self) -> Result<ContactSubmission, ValidationErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let interest = self
            .interest
            .parse::<Interest>()
            .map_err(|_| interest_error())?;
        Ok(ContactSubmission {
            profile: SubscriberProfile::new(self.name.trim(), self.email.trim(), interest),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        })
    }
}

/// Standalone subscription form (name, email, interest).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionForm {
    pub name: String,
    pub email: String,
    pub interest: String,
}

impl SubscriptionForm {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, &self.name);
        check_email(&mut errors, &self.email);
        check_interest(&mut errors, &self.interest);
        errors
    }

    pub fn into_profile(self) -> Result<SubscriberProfile, ValidationErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let interest = self
            .interest
            .parse::<Interest>()
            .map_err(|_| interest_error())?;
        Ok(SubscriberProfile::new(
            self.name.trim(),
            self.email.trim(),
            interest,
        ))
    }
}

impl From<&SubscriberProfile> for SubscriptionForm {
    fn from(profile: &SubscriberProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            interest: profile.interest.label().to_string(),
        }
    }
}

/// A question typed into the modal; only blank input is rejected.
pub fn validate_question(question: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if question.trim().is_empty() {
        errors.insert("question", "Please enter a question");
    }
    errors
}

fn interest_error() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert("interest", "Please select an area of interest");
    errors
}

fn check_name(errors: &mut ValidationErrors, value: &str) {
    check_length(
        errors,
        "name",
        value,
        NAME_MIN,
        NAME_MAX,
        "Name must be at least 2 characters",
        "Name must be less than 100 characters",
    );
}

fn check_email(errors: &mut ValidationErrors, value: &str) {
    let trimmed = value.trim();
    if !is_valid_email(trimmed) {
        errors.insert("email", "Please enter a valid email address");
    } else if trimmed.chars().count() > EMAIL_MAX {
        errors.insert("email", "Email must be less than 255 characters");
    }
}

fn check_interest(errors: &mut ValidationErrors, value: &str) {
    if value.parse::<Interest>().is_err() {
        errors.insert("interest", "Please select an area of interest");
    }
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    too_short: &str,
    too_long: &str,
) {
    let len = value.trim().chars().count();
    if len < min {
        errors.insert(field, too_short);
    } else if len > max {
        errors.insert(field, too_long);
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
        )
        .expect("email pattern is valid")
    })
}

// The pattern cannot express "no leading dot" or "no double dot" without
// lookaround, so those are checked separately.
fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_regex().is_match(value)
}
