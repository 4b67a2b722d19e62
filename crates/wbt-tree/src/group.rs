//! Grouping of sorted records into nested scopes.
//!
//! A record `[c0, c1, .., cn] => v` becomes a leaf keyed by `cn` inside the
//! scope identified by `[c0, .., cn-1]`; every proper prefix of a key is a
//! scope root owning an ordered list of siblings.

use std::fmt;

use wbt_core::base::{CompositeKey, SortedRecords};

use crate::error::TreeError;

/// Index of a node in its [`ScopeForest`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a grouped node carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody {
    /// A stored value.
    Leaf {
        /// The record's value.
        value: u64,
    },
    /// A nested scope.
    ScopeRoot {
        /// Sibling list of the scope, ascending by key.
        children: Vec<NodeId>,
    },
}

/// A grouped node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeNode {
    key: u64,
    composite: CompositeKey,
    nesting: usize,
    body: NodeBody,
}

impl ScopeNode {
    /// Key component at this node's depth.
    #[must_use]
    pub const fn key(&self) -> u64 {
        self.key
    }

    /// Full composite key from the outermost scope down to this node.
    #[must_use]
    pub const fn composite(&self) -> &CompositeKey {
        &self.composite
    }

    /// Number of enclosing scopes.
    #[must_use]
    pub const fn nesting(&self) -> usize {
        self.nesting
    }

    /// The node's payload.
    #[must_use]
    pub const fn body(&self) -> &NodeBody {
        &self.body
    }

    /// The stored value, for leaves.
    #[must_use]
    pub const fn value(&self) -> Option<u64> {
        match self.body {
            NodeBody::Leaf { value } => Some(value),
            NodeBody::ScopeRoot { .. } => None,
        }
    }

    /// Whether this node owns a nested scope.
    #[must_use]
    pub const fn is_scope_root(&self) -> bool {
        matches!(self.body, NodeBody::ScopeRoot { .. })
    }
}

/// Owned nested view of a grouped forest, used to compare groupings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeEntry {
    /// A stored value.
    Leaf {
        /// Key component.
        key: u64,
        /// Stored value.
        value: u64,
    },
    /// A nested scope.
    ScopeRoot {
        /// Key component.
        key: u64,
        /// The scope's siblings, ascending by key.
        children: Vec<Self>,
    },
}

/// Records grouped into nested sibling lists, stored in an arena.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeForest {
    nodes: Vec<ScopeNode>,
    top: Vec<NodeId>,
    records: usize,
}

/// Open scope during grouping. The frame owns its sibling list until it is
/// closed and the list is handed to its owner.
struct Frame {
    owner: Option<NodeId>,
    prefix: Vec<u64>,
    siblings: Vec<NodeId>,
}

impl Frame {
    const fn top() -> Self {
        Self {
            owner: None,
            prefix: Vec::new(),
            siblings: Vec::new(),
        }
    }

    /// Whether `key` lies strictly inside this scope.
    fn encloses(&self, key: &[u64]) -> bool {
        key.len() > self.prefix.len() && key.starts_with(&self.prefix)
    }
}

impl ScopeForest {
    /// Group sorted records into nested scopes.
    ///
    /// Every proper prefix of a key becomes a scope root; the last component
    /// becomes a leaf. A record with an empty key becomes a leaf in the
    /// outermost list keyed by its own value. Fails with
    /// [`TreeError::KeyConflict`] when a key both holds a value and prefixes
    /// another key.
    pub fn group(records: &SortedRecords) -> Result<Self, TreeError> {
        let mut nodes = Vec::with_capacity(records.len());
        let mut top = Frame::top();
        let mut open: Vec<Frame> = Vec::new();

        for record in records.iter() {
            let key = record.key.components();

            while open.last().is_some_and(|frame| !frame.encloses(key)) {
                close_frame(&mut nodes, &mut open)?;
            }

            loop {
                let nesting = open.len();
                let frame = open.last_mut().unwrap_or(&mut top);
                let depth = frame.prefix.len();
                if key.len() <= depth.saturating_add(1) {
                    break;
                }
                let Some(&component) = key.get(depth) else {
                    break;
                };
                let scope = ScopeNode {
                    key: component,
                    composite: record.key.prefix(depth.saturating_add(1)),
                    nesting,
                    body: NodeBody::ScopeRoot {
                        children: Vec::new(),
                    },
                };
                let prefix = scope.composite.components().to_vec();
                let owner = push_node(&mut nodes, frame, scope)?;
                open.push(Frame {
                    owner: Some(owner),
                    prefix,
                    siblings: Vec::new(),
                });
            }

            let nesting = open.len();
            let frame = open.last_mut().unwrap_or(&mut top);
            let component = record
                .key
                .component(frame.prefix.len())
                .unwrap_or(record.value);
            push_node(
                &mut nodes,
                frame,
                ScopeNode {
                    key: component,
                    composite: record.key.clone(),
                    nesting,
                    body: NodeBody::Leaf {
                        value: record.value,
                    },
                },
            )?;
        }

        while !open.is_empty() {
            close_frame(&mut nodes, &mut open)?;
        }

        Ok(Self {
            nodes,
            top: top.siblings,
            records: records.len(),
        })
    }

    /// The outermost sibling list.
    #[must_use]
    pub fn top(&self) -> &[NodeId] {
        &self.top
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Result<&ScopeNode, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id.0))
    }

    /// All nodes with their ids, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ScopeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Total number of nodes: one per record plus one per scope root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of records grouped into this forest.
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.records
    }

    /// Number of scope roots.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_scope_root()).count()
    }

    /// Owned nested view of the forest, outermost scope first.
    pub fn entries(&self) -> Result<Vec<ScopeEntry>, TreeError> {
        self.entries_of(&self.top)
    }

    fn entries_of(&self, siblings: &[NodeId]) -> Result<Vec<ScopeEntry>, TreeError> {
        siblings
            .iter()
            .map(|&id| {
                let node = self.node(id)?;
                Ok(match &node.body {
                    NodeBody::Leaf { value } => ScopeEntry::Leaf {
                        key: node.key,
                        value: *value,
                    },
                    NodeBody::ScopeRoot { children } => ScopeEntry::ScopeRoot {
                        key: node.key,
                        children: self.entries_of(children)?,
                    },
                })
            })
            .collect()
    }
}

/// Append `node` to the arena and to the frame's sibling list, checking it
/// against the previous sibling. An empty-key leaf sorts before every other
/// record, so nothing is checked against it.
fn push_node(
    nodes: &mut Vec<ScopeNode>,
    frame: &mut Frame,
    node: ScopeNode,
) -> Result<NodeId, TreeError> {
    if let Some(previous) = frame
        .siblings
        .last()
        .and_then(|id| nodes.get(id.0))
        .filter(|previous| !previous.composite.is_empty())
    {
        if previous.key == node.key {
            return Err(TreeError::KeyConflict {
                key: node.composite,
            });
        }
        if previous.key > node.key {
            return Err(TreeError::SiblingsOutOfOrder {
                previous: previous.composite.clone(),
                key: node.composite,
            });
        }
    }
    let id = NodeId(nodes.len());
    nodes.push(node);
    frame.siblings.push(id);
    Ok(id)
}

/// Pop the innermost frame and hand its siblings to the owning scope root.
fn close_frame(nodes: &mut [ScopeNode], open: &mut Vec<Frame>) -> Result<(), TreeError> {
    let Some(frame) = open.pop() else {
        return Ok(());
    };
    if let Some(owner) = frame.owner {
        let node = nodes
            .get_mut(owner.0)
            .ok_or(TreeError::UnknownNode(owner.0))?;
        node.body = NodeBody::ScopeRoot {
            children: frame.siblings,
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "Test code")]

    use test_utils::{key, records};

    use super::*;

    fn leaf(key: u64, value: u64) -> ScopeEntry {
        ScopeEntry::Leaf { key, value }
    }

    fn scope(key: u64, children: Vec<ScopeEntry>) -> ScopeEntry {
        ScopeEntry::ScopeRoot { key, children }
    }

    #[test]
    fn empty_input() {
        let forest = ScopeForest::group(&records![]).expect("group");
        assert!(forest.is_empty());
        assert!(forest.top().is_empty());
        assert_eq!(forest.entries().expect("entries"), vec![]);
    }

    #[test]
    fn single_component_keys_are_top_level_leaves() {
        let forest = ScopeForest::group(&records![[5] => 7, [2] => 1]).expect("group");
        assert_eq!(forest.entries().expect("entries"), vec![leaf(2, 1), leaf(5, 7)]);

        let node = forest.node(forest.top()[1]).expect("node");
        assert_eq!(node.nesting(), 0);
        assert_eq!(node.composite(), &key![5]);
        assert_eq!(node.value(), Some(7));
    }

    #[test]
    fn shared_prefix_becomes_nested_scopes() {
        let forest =
            ScopeForest::group(&records![[0, 3, 10] => 1, [0, 3, 20] => 2]).expect("group");

        assert_eq!(
            forest.entries().expect("entries"),
            vec![scope(0, vec![scope(3, vec![leaf(10, 1), leaf(20, 2)])])]
        );
        assert_eq!(forest.scope_count(), 2);
        assert_eq!(forest.len(), 4);

        let outer = forest.node(forest.top()[0]).expect("outer");
        assert_eq!(outer.nesting(), 0);
        assert_eq!(outer.composite(), &key![0]);
        let NodeBody::ScopeRoot { children } = outer.body() else {
            panic!("expected a scope root");
        };
        let inner = forest.node(children[0]).expect("inner");
        assert_eq!(inner.nesting(), 1);
        assert_eq!(inner.composite(), &key![0, 3]);
    }

    #[test]
    fn mixed_depths() {
        let forest = ScopeForest::group(&records![
            [0, 0, 0] => 5,
            [0, 0, 1, 7] => 1,
            [0, 0, 1, 9] => 2,
            [0, 0, 2] => 3,
            [1, 4] => 6,
        ])
        .expect("group");

        assert_eq!(
            forest.entries().expect("entries"),
            vec![
                scope(
                    0,
                    vec![scope(
                        0,
                        vec![
                            leaf(0, 5),
                            scope(1, vec![leaf(7, 1), leaf(9, 2)]),
                            leaf(2, 3),
                        ]
                    )]
                ),
                scope(1, vec![leaf(4, 6)]),
            ]
        );
        assert_eq!(forest.record_count(), 5);
        assert_eq!(forest.scope_count(), 4);
        assert_eq!(forest.len(), 9);
    }

    #[test]
    fn empty_key_is_a_top_level_leaf() {
        let forest = ScopeForest::group(&records![[] => 7]).expect("group");
        assert_eq!(forest.entries().expect("entries"), vec![leaf(7, 7)]);
        assert_eq!(forest.scope_count(), 0);

        let node = forest.node(forest.top()[0]).expect("node");
        assert_eq!(node.nesting(), 0);
        assert_eq!(node.composite(), &key![]);
    }

    #[test]
    fn empty_key_precedes_other_records() {
        let forest =
            ScopeForest::group(&records![[0, 3] => 1, [] => 9, [2] => 5]).expect("group");

        assert_eq!(
            forest.entries().expect("entries"),
            vec![leaf(9, 9), scope(0, vec![leaf(3, 1)]), leaf(2, 5)]
        );
        assert_eq!(forest.record_count(), 3);
        assert_eq!(forest.len(), 4);
    }

    #[test]
    fn leaf_and_scope_conflict() {
        let result = ScopeForest::group(&records![[0, 3] => 1, [0, 3, 10] => 2]);
        assert_eq!(
            result,
            Err(TreeError::KeyConflict {
                key: key![0, 3],
            })
        );
    }
}
