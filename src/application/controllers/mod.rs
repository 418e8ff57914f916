//! Screen controllers.

mod auth_flow_controller;

pub use auth_flow_controller::{
    AuthFlowController, Completion, CompletionOutcome, DEFAULT_REQUEST_TIMEOUT, FlowFailure,
    FlowPhase, PendingRequest, SubmitOutcome, Ticket,
};
