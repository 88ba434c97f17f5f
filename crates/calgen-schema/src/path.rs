//! Debug paths for schema nodes.
//!
//! The parser threads a [`NodePath`] through every call instead of giving each
//! node a reference to its parent. The path only ever grows by cloning, so a
//! child's path never affects its siblings.

use std::fmt;

const ROOT_SEGMENT: &str = "MapTop";

/// A dotted path identifying a node in the schema, e.g. `MapTop.TxScalarCal.fields[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// The path of the address map itself.
    pub fn root() -> Self {
        Self {
            segments: vec![ROOT_SEGMENT.to_string()],
        }
    }

    /// Extend the path with a named child.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Extend the path with an indexed element of a list, e.g. `fields[2]`.
    pub fn indexed(&self, list: &str, index: usize) -> Self {
        self.child(format!("{list}[{index}]"))
    }

    /// Replace the last segment, used once a node's name becomes known.
    pub fn renamed(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        if segments.len() > 1 {
            if let Some(last) = segments.last_mut() {
                *last = segment.into();
            }
        } else {
            segments.push(segment.into());
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl Default for NodePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
