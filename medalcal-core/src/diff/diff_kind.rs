use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffKind {
    Update,
    Delete,
}

impl DiffKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            DiffKind::Update => "~",
            DiffKind::Delete => "-",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
