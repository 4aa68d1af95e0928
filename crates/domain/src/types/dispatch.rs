//! Remote-response batch and command types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_COMMAND_REG_DELETE, BASE_COMMAND_REG_SET, COMMAND_ACCEPTED_STATUS};

/// Base command a command line is submitted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    RegDelete,
    RegSet,
}

impl CommandKind {
    /// Wire value of the `base_command` field
    pub fn base_command(self) -> &'static str {
        match self {
            Self::RegDelete => BASE_COMMAND_REG_DELETE,
            Self::RegSet => BASE_COMMAND_REG_SET,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_command())
    }
}

/// A fully formed command bound for one registry store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommand {
    pub kind: CommandKind,
    pub command_line: String,
    /// Registry store the command touches
    pub store: String,
    /// Key (or value name) the command touches
    pub key: String,
}

/// Ordered commands for one store: deletions, then hostname, then port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePlan {
    pub store: String,
    pub commands: Vec<RemoteCommand>,
}

/// Server-side handle for one remote-response fan-out
///
/// Hosts that were offline or unreachable when the batch was opened may be
/// missing from `included_hosts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSession {
    pub batch_id: String,
    pub requested_hosts: usize,
    pub included_hosts: Vec<String>,
}

impl BatchSession {
    /// Requested hosts the server left out of the session
    pub fn excluded_count(&self) -> usize {
        self.requested_hosts.saturating_sub(self.included_hosts.len())
    }
}

/// Raw acknowledgment of a submitted command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    pub status: u16,
    pub body: String,
}

impl CommandAck {
    /// Only "created" counts as accepted
    pub fn is_accepted(&self) -> bool {
        self.status == COMMAND_ACCEPTED_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_created_is_accepted() {
        let ack = |status| CommandAck { status, body: String::new() };

        assert!(ack(201).is_accepted());
        assert!(!ack(200).is_accepted());
        assert!(!ack(202).is_accepted());
        assert!(!ack(403).is_accepted());
    }

    #[test]
    fn excluded_count_reflects_offline_hosts() {
        let session = BatchSession {
            batch_id: "b-1".to_string(),
            requested_hosts: 5,
            included_hosts: vec!["a".into(), "b".into(), "c".into()],
        };

        assert_eq!(session.excluded_count(), 2);
    }

    #[test]
    fn base_command_wire_values() {
        assert_eq!(CommandKind::RegDelete.base_command(), "reg delete");
        assert_eq!(CommandKind::RegSet.to_string(), "reg set");
    }
}
