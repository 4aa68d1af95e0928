//! Domain types and models

pub mod dispatch;
pub mod hosts;
pub mod run;
pub mod token;

pub use dispatch::{BatchSession, CommandAck, CommandKind, RemoteCommand, StorePlan};
pub use hosts::{HostIdSet, HostPage, PageMerge, Scope};
pub use run::{RunReport, RunState};
pub use token::{BearerToken, CachedToken};
