//! Remote-response batch dispatch
//!
//! Opens one batch over the enumerated hosts and submits the per-store
//! command plan against it, stopping at the first rejected command.

pub mod dispatcher;
pub mod plan;
pub mod ports;

pub use dispatcher::{BatchDispatcher, DispatchReport};
pub use plan::build_plan;
pub use ports::RemoteResponder;
