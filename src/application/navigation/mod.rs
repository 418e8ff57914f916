//! Screen navigation.

mod flow;
mod router;

pub use flow::{AppFlow, FlowStep};
pub use router::{NavOutcome, NavigationRouter};
