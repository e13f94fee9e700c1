use std::time::Duration;

use axis_content::StoreError;
use axis_core::ValidationErrors;
use axis_gateway::{ErrorKind, GatewayError};
use thiserror::Error;

use crate::machine::TransitionError;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(ValidationErrors),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("article not found: {0}")]
    ArticleNotFound(String),

    #[error("content store error: {0}")]
    Store(#[from] StoreError),

    #[error("no response within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("a request is already in flight")]
    Busy,

    #[error("the modal is not open")]
    ModalClosed,

    #[error("no message to retry")]
    NothingToRetry,

    /// The session moved on while the call was in flight; its result was dropped.
    #[error("result discarded after the session changed")]
    Stale,
}

pub type Result<T> = std::result::Result<T, ControllerError>;

impl ControllerError {
    /// The classified kind, for errors that came from the gateway or the form.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Validation(_) => Some(ErrorKind::Validation),
            Self::Gateway(error) => Some(error.kind),
            Self::Timeout(_) => Some(ErrorKind::Timeout),
            _ => None,
        }
    }

    /// Text suitable for a notice description.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => ErrorKind::Validation.user_message(),
            Self::Gateway(error) => error.user_message(),
            Self::Timeout(_) => ErrorKind::Timeout.user_message(),
            Self::ArticleNotFound(_) => {
                "The article you're looking for doesn't exist or has been removed."
            }
            Self::Store(_) => "Failed to load the article. Please try again.",
            Self::Busy => "Please wait for the current request to finish.",
            _ => ErrorKind::Unknown.user_message(),
        }
    }
}
