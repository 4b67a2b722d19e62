//! Path-ordered node sequences and the cursor walk over them.
//!
//! A flattened tree is a plain list of nodes sorted by [`Path`]. The list
//! alone determines the shape: [`walk`] rebuilds it bottom-up by consuming
//! the nodes of each subtree as one contiguous run.

use wbt_core::base::CompositeKey;

use crate::commit::{Commitment, commit_nodes};
use crate::error::TreeError;
use crate::group::ScopeEntry;
use crate::node::Combine;
use crate::path::{Path, Step};

/// What a flattened node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatBody {
    /// A stored value.
    Value(u64),
    /// The node owns a nested scope.
    ScopeRoot,
}

/// One node of a flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    /// Structural path from the outermost root.
    pub path: Path,
    /// Number of enclosing scopes.
    pub nesting: usize,
    /// Key component at this node's depth.
    pub key: u64,
    /// Full composite key.
    pub composite: CompositeKey,
    /// Payload.
    pub body: FlatBody,
}

impl FlatNode {
    /// The stored value, for leaves.
    #[must_use]
    pub const fn value(&self) -> Option<u64> {
        match self.body {
            FlatBody::Value(value) => Some(value),
            FlatBody::ScopeRoot => None,
        }
    }

    /// Whether this node owns a nested scope.
    #[must_use]
    pub const fn is_scope_root(&self) -> bool {
        matches!(self.body, FlatBody::ScopeRoot)
    }
}

/// Nodes in strictly ascending path order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Flattened(Vec<FlatNode>);

impl Flattened {
    /// Wrap `nodes`, checking that paths strictly ascend.
    pub fn new(nodes: Vec<FlatNode>) -> Result<Self, TreeError> {
        for (index, pair) in nodes.windows(2).enumerate() {
            if let [previous, node] = pair
                && previous.path >= node.path
            {
                return Err(TreeError::UnsortedPaths {
                    index: index.saturating_add(1),
                    previous: previous.path.to_string(),
                    path: node.path.to_string(),
                });
            }
        }
        Ok(Self(nodes))
    }

    /// The nodes, in path order.
    #[must_use]
    pub fn nodes(&self) -> &[FlatNode] {
        &self.0
    }

    /// Consume into the node vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<FlatNode> {
        self.0
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value-carrying nodes, in path order.
    pub fn leaves(&self) -> impl Iterator<Item = &FlatNode> {
        self.0.iter().filter(|node| !node.is_scope_root())
    }

    /// Number of scope roots.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.0.iter().filter(|node| node.is_scope_root()).count()
    }

    /// Commit to the sequence with `combiner`.
    pub fn commit<C: Combine>(&self, combiner: &C) -> Result<Commitment, TreeError> {
        commit_nodes(&self.0, combiner)
    }

    /// Rebuild the nested scopes from paths alone.
    pub fn regroup(&self) -> Result<Vec<ScopeEntry>, TreeError> {
        regroup_nodes(&self.0)
    }
}

/// Rebuild the nested scopes of an arbitrary path-ordered node slice.
pub fn regroup_nodes(nodes: &[FlatNode]) -> Result<Vec<ScopeEntry>, TreeError> {
    walk(nodes, &mut Regroup)
}

/// Bottom-up fold over the subtrees of a flattened tree.
pub(crate) trait ScopeVisitor {
    type Output;

    /// An empty subtree.
    fn empty(&mut self) -> Self::Output;

    /// A leaf with its folded subtrees.
    fn leaf(
        &mut self,
        node: &FlatNode,
        value: u64,
        left: Self::Output,
        right: Self::Output,
    ) -> Self::Output;

    /// A scope root with its folded subtrees and nested scope.
    fn scope_root(
        &mut self,
        node: &FlatNode,
        left: Self::Output,
        nested: Self::Output,
        right: Self::Output,
    ) -> Self::Output;
}

/// Fold `nodes` with `visitor`, consuming every node exactly once.
pub(crate) fn walk<V: ScopeVisitor>(
    nodes: &[FlatNode],
    visitor: &mut V,
) -> Result<V::Output, TreeError> {
    let mut cursor = Cursor { nodes, pos: 0 };
    let output = cursor.subtree(&Path::root(), visitor)?;
    // A node left after the root subtree sorts before `R` and the walk
    // already reports it as out of order; this keeps the walk total.
    if let Some(node) = cursor.peek() {
        return Err(TreeError::Leftover {
            remaining: nodes.len().saturating_sub(cursor.pos),
            path: node.path.to_string(),
        });
    }
    Ok(output)
}

struct Cursor<'a> {
    nodes: &'a [FlatNode],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a FlatNode> {
        self.nodes.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos = self.pos.saturating_add(1);
    }

    /// Consume the subtree at `prefix`.
    ///
    /// The subtree is empty when the next node lies outside `prefix`. A node
    /// exactly at `prefix` is a leaf pivot; otherwise the pivot is a scope
    /// root at `prefix + M`, preceded by its left subtree.
    fn subtree<V: ScopeVisitor>(
        &mut self,
        prefix: &Path,
        visitor: &mut V,
    ) -> Result<V::Output, TreeError> {
        let Some(head) = self.peek() else {
            return Ok(visitor.empty());
        };
        if !head.path.starts_with(prefix) {
            if head.path < *prefix {
                return Err(TreeError::PathOutOfOrder {
                    index: self.pos,
                    path: head.path.to_string(),
                    expected: prefix.to_string(),
                });
            }
            return Ok(visitor.empty());
        }

        if head.path == *prefix {
            let FlatBody::Value(value) = head.body else {
                return Err(TreeError::KindMismatch {
                    path: head.path.to_string(),
                    expected: "leaf",
                });
            };
            self.advance();
            let left = self.subtree(&prefix.child(Step::Left), visitor)?;
            let right = self.subtree(&prefix.child(Step::Right), visitor)?;
            return Ok(visitor.leaf(head, value, left, right));
        }

        let left = self.subtree(&prefix.child(Step::Left), visitor)?;
        let anchor = prefix.child(Step::ScopeRoot);
        let pivot = self
            .peek()
            .filter(|node| node.path == anchor)
            .ok_or_else(|| TreeError::MissingPivot {
                subtree: prefix.to_string(),
                index: self.pos,
            })?;
        if !pivot.is_scope_root() {
            return Err(TreeError::KindMismatch {
                path: pivot.path.to_string(),
                expected: "scope root",
            });
        }
        self.advance();
        let nested = self.subtree(&prefix.child(Step::Nested), visitor)?;
        let right = self.subtree(&prefix.child(Step::Right), visitor)?;
        Ok(visitor.scope_root(pivot, left, nested, right))
    }
}

/// Rebuilds sibling lists: a subtree folds to its in-order sibling run.
struct Regroup;

impl ScopeVisitor for Regroup {
    type Output = Vec<ScopeEntry>;

    fn empty(&mut self) -> Self::Output {
        Vec::new()
    }

    fn leaf(
        &mut self,
        node: &FlatNode,
        value: u64,
        mut left: Self::Output,
        right: Self::Output,
    ) -> Self::Output {
        left.push(ScopeEntry::Leaf {
            key: node.key,
            value,
        });
        left.extend(right);
        left
    }

    fn scope_root(
        &mut self,
        node: &FlatNode,
        mut left: Self::Output,
        nested: Self::Output,
        right: Self::Output,
    ) -> Self::Output {
        left.push(ScopeEntry::ScopeRoot {
            key: node.key,
            children: nested,
        });
        left.extend(right);
        left
    }
}
