//! FILENAME: core/model/src/path.rs
//! PURPOSE: Positional identity inside a tree.
//! CONTEXT: Both the group tree and the column tree identify nodes by the
//! sibling indices leading to them from the root, written dash-joined
//! ("0-2-1"). The same string is used for expand/collapse state and for
//! reordering flattened column lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    #[error("empty node path")]
    Empty,

    #[error("invalid node path segment '{0}'")]
    InvalidSegment(String),
}

/// Sibling indices from the root down to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath {
    segments: SmallVec<[usize; 4]>,
}

impl NodePath {
    /// Path of the `index`-th root entry.
    pub fn root(index: usize) -> Self {
        let mut segments = SmallVec::new();
        segments.push(index);
        NodePath { segments }
    }

    /// Path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(index);
        NodePath { segments }
    }

    /// The enclosing node's path, or None for a root entry.
    pub fn parent(&self) -> Option<NodePath> {
        if self.segments.len() <= 1 {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(NodePath { segments })
    }

    /// Index among siblings.
    pub fn last(&self) -> usize {
        self.segments.last().copied().unwrap_or(0)
    }

    /// Nesting depth, 0 for root entries.
    pub fn depth(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    pub fn segments(&self) -> &[usize] {
        &self.segments
    }

    /// True if `other` lies strictly below this node.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::Empty);
        }
        let segments = s
            .split('-')
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|_| PathParseError::InvalidSegment(part.to_string()))
            })
            .collect::<Result<SmallVec<[usize; 4]>, _>>()?;
        Ok(NodePath { segments })
    }
}

impl TryFrom<String> for NodePath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let path = NodePath::root(0).child(2).child(1);
        assert_eq!(path.to_string(), "0-2-1");
        assert_eq!("0-2-1".parse::<NodePath>().unwrap(), path);
        assert_eq!(path.depth(), 2);
        assert_eq!(path.last(), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<NodePath>(), Err(PathParseError::Empty));
        assert_eq!(
            "0--1".parse::<NodePath>(),
            Err(PathParseError::InvalidSegment(String::new()))
        );
        assert!("a-1".parse::<NodePath>().is_err());
    }

    #[test]
    fn test_parent_and_ancestry() {
        let root = NodePath::root(3);
        let leaf = root.child(0).child(4);
        assert_eq!(root.parent(), None);
        assert_eq!(leaf.parent(), Some(root.child(0)));
        assert!(root.is_ancestor_of(&leaf));
        assert!(!leaf.is_ancestor_of(&root));
        assert!(!root.is_ancestor_of(&root));
        assert!(!NodePath::root(1).is_ancestor_of(&leaf));
    }

    #[test]
    fn test_serde_as_string() {
        let path = NodePath::root(1).child(0);
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"1-0\"");
        let back: NodePath = serde_json::from_str("\"1-0\"").unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<NodePath>("\"x\"").is_err());
    }
}
