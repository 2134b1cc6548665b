use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persisted shape of the durable file store.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StatsData {
    pub visit_count: u64,
    pub likes: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct VisitStats {
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeStats {
    pub count: u64,
    pub is_liked: bool,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LikeRequest {
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Add,
    Remove,
}

impl LikeAction {
    /// Unknown or missing actions yield `None` and are treated as a read.
    pub fn parse(action: Option<&str>) -> Option<Self> {
        match action.map(str::trim) {
            Some("add") => Some(Self::Add),
            Some("remove") => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    pub fn liked(self) -> bool {
        self == Self::Add
    }
}
