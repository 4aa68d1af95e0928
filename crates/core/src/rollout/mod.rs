//! End-to-end rollout run
//!
//! authenticate -> enumerate -> open batch -> dispatch -> report, with no
//! step ever re-entering an earlier one.

pub mod runner;
pub mod state;

pub use runner::{RolloutPorts, RolloutRunner};
pub use state::RunTracker;
