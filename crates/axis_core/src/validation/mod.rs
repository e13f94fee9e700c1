//! Client-side form validation.
//!
//! Runs before any gateway call and reports one message per failing field.
//! These errors are never classified; they stay on the form.

mod forms;

pub use forms::{
    validate_question, ContactForm, ContactSubmission, SubscriptionForm, ValidationErrors,
};
