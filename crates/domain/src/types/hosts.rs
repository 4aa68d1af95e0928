//! Host population types

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which host population a run targets
///
/// Immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// Every host in the tenant
    WholeTenant,
    /// Members of one named host group
    HostGroup { id: String },
}

impl Scope {
    /// Group identifier for host-group scopes
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Self::WholeTenant => None,
            Self::HostGroup { id } => Some(id),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::WholeTenant
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WholeTenant => write!(f, "whole tenant"),
            Self::HostGroup { id } => write!(f, "host group {id}"),
        }
    }
}

/// One page of a cursor-paginated host query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPage {
    pub items: Vec<String>,
    /// Opaque cursor for the following page
    pub next_cursor: Option<String>,
    /// Total reported by the server for the whole collection
    pub total: usize,
}

/// Outcome of merging one page into a [`HostIdSet`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMerge {
    pub added: usize,
    pub duplicates: usize,
}

/// Ordered, append-only set of host identifiers
///
/// Insertion order is preserved; identifiers already present are skipped
/// and counted as duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostIdSet {
    ids: Vec<String>,
    seen: HashSet<String>,
}

impl HostIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page of identifiers
    pub fn extend_page(&mut self, items: Vec<String>) -> PageMerge {
        let mut merge = PageMerge::default();
        for id in items {
            if self.seen.insert(id.clone()) {
                self.ids.push(id);
                merge.added += 1;
            } else {
                merge.duplicates += 1;
            }
        }
        merge
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ids
    }
}

impl FromIterator<String> for HostIdSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend_page(iter.into_iter().collect());
        set
    }
}
