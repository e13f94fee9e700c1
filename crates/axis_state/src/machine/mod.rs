//! State machine module
//!
//! Contains the FSM for the subscription modal's flow.

mod events;
mod states;
mod transitions;

pub use events::ModalEvent;
pub use states::ModalState;
pub use transitions::{ModalMachine, StateTransition, TransitionError};
