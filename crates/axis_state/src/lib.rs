//! axis_state - Interactive state for the Axis Mundi site
//!
//! The subscription modal's state machine, the chat panel session, and the
//! `SiteController` that drives both through the webhook gateway and the
//! content store.

pub mod chat;
pub mod controller;
pub mod error;
pub mod machine;
pub mod modal;
pub mod notice;

pub use chat::{ChatSession, ChatSnapshot, ChatTicket};
pub use controller::SiteController;
pub use error::{ControllerError, Result};
pub use machine::{ModalEvent, ModalMachine, ModalState, StateTransition, TransitionError};
pub use modal::{ModalAction, ModalSession, ModalSnapshot, Ticket};
pub use notice::{Notice, NoticeVariant};
