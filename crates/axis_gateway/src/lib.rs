//! axis_gateway - the single egress point to the automation webhooks
//!
//! Every operation is bounded by the configured timeout, never retries, and
//! reports failures as a `GatewayError` carrying one `ErrorKind`.

pub mod error;
pub mod gateway;
pub mod http;
mod wire;

pub use error::{ErrorKind, GatewayError, Result};
pub use gateway::{ChatAnswer, ContactReceipt, HealthStatus, SubscriptionOutcome, WebhookGateway};
pub use http::HttpGateway;
