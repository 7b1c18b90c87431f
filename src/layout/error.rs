//! Non-fatal diagnostics raised while routing links

use thiserror::Error;

/// A link that was left out of the routing output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkIssue {
    /// Source node id not present in the node collection
    #[error("link '{link}' skipped: source node '{node}' not found")]
    MissingSource { link: String, node: String },

    /// Target node id not present in the node collection
    #[error("link '{link}' skipped: target node '{node}' not found")]
    MissingTarget { link: String, node: String },

    /// A link id that already appeared earlier in the collection
    #[error("link '{link}' skipped: duplicate id")]
    DuplicateLink { link: String },
}

impl LinkIssue {
    pub fn missing_source(link: impl Into<String>, node: impl Into<String>) -> Self {
        Self::MissingSource {
            link: link.into(),
            node: node.into(),
        }
    }

    pub fn missing_target(link: impl Into<String>, node: impl Into<String>) -> Self {
        Self::MissingTarget {
            link: link.into(),
            node: node.into(),
        }
    }

    pub fn duplicate(link: impl Into<String>) -> Self {
        Self::DuplicateLink { link: link.into() }
    }

    /// Id of the link this issue is about
    pub fn link_id(&self) -> &str {
        match self {
            Self::MissingSource { link, .. }
            | Self::MissingTarget { link, .. }
            | Self::DuplicateLink { link } => link,
        }
    }
}
