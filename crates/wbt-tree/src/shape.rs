//! Balanced shape assignment and path-ordered flattening.
//!
//! Every sibling list is shaped into the unique size-balanced binary tree
//! for its length: [`pivot`] picks the root, the siblings before it form the
//! left subtree and those after it the right subtree, recursively. A scope
//! root additionally links to the root of its own shaped sibling list.

use crate::error::TreeError;
use crate::flat::{FlatBody, FlatNode, Flattened};
use crate::group::{NodeBody, NodeId, ScopeForest};
use crate::path::{Path, Step};

/// Index of the root among `count` siblings, `None` for an empty list.
///
/// The left subtree is filled as a perfect tree before the right one takes
/// the remainder, so the shape depends on `count` alone.
#[must_use]
#[allow(
    clippy::arithmetic_side_effects,
    reason = "fullsize stays below count, shifts cannot overflow"
)]
pub const fn pivot(count: usize) -> Option<usize> {
    match count {
        0 => None,
        1 => Some(0),
        _ => {
            let mut reduced = count;
            let mut fullsize = 0_usize;
            while reduced > 3 {
                reduced >>= 1;
                fullsize = (fullsize << 1) | 1;
            }
            if reduced == 3 {
                Some((fullsize << 1) | 1)
            } else {
                Some(count - 1 - fullsize)
            }
        }
    }
}

/// Structural links of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    /// Parent node and the step leading from it to this node.
    pub parent: Option<(NodeId, Step)>,
    /// Root of the left subtree.
    pub left: Option<NodeId>,
    /// Root of the right subtree.
    pub right: Option<NodeId>,
    /// Root of the nested scope, for scope roots.
    pub nested: Option<NodeId>,
}

/// A grouped forest with every sibling list shaped into a balanced tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedForest {
    forest: ScopeForest,
    links: Vec<Links>,
    root: Option<NodeId>,
}

impl ShapedForest {
    /// Shape every sibling list of `forest`.
    pub fn assign(forest: ScopeForest) -> Result<Self, TreeError> {
        let mut links = vec![Links::default(); forest.len()];
        let root = balance(&forest, &mut links, forest.top(), None)?;
        Ok(Self {
            forest,
            links,
            root,
        })
    }

    /// The grouped forest being shaped.
    #[must_use]
    pub const fn forest(&self) -> &ScopeForest {
        &self.forest
    }

    /// Root of the outermost tree. `None` for an empty forest.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Structural links of a node.
    pub fn links(&self, id: NodeId) -> Result<&Links, TreeError> {
        self.links
            .get(id.index())
            .ok_or(TreeError::UnknownNode(id.index()))
    }

    /// Path of a node, derived by walking parent links up to the root.
    pub fn path(&self, id: NodeId) -> Result<Path, TreeError> {
        let mut steps = Vec::new();
        let mut current = id;
        while let Some((parent, step)) = self.links(current)?.parent {
            steps.push(step);
            current = parent;
        }
        steps.reverse();
        if self.forest.node(id)?.is_scope_root() {
            steps.push(Step::ScopeRoot);
        }
        Ok(Path::from(steps))
    }

    /// Lazily yield every node in ascending path order.
    #[must_use]
    pub fn iter_flat(&self) -> FlatIter<'_> {
        FlatIter {
            shaped: self,
            stack: self
                .root
                .map(|root| Visit::Expand(root, Path::root()))
                .into_iter()
                .collect(),
        }
    }

    /// Collect [`Self::iter_flat`] into a validated [`Flattened`] sequence.
    pub fn flatten(&self) -> Result<Flattened, TreeError> {
        let nodes = self.iter_flat().collect::<Result<Vec<_>, _>>()?;
        Flattened::new(nodes)
    }

    fn flat_node(&self, id: NodeId, path: Path) -> Result<FlatNode, TreeError> {
        let node = self.forest.node(id)?;
        let body = match node.body() {
            NodeBody::Leaf { value } => FlatBody::Value(*value),
            NodeBody::ScopeRoot { .. } => FlatBody::ScopeRoot,
        };
        Ok(FlatNode {
            path,
            nesting: node.nesting(),
            key: node.key(),
            composite: node.composite().clone(),
            body,
        })
    }
}

/// Shape `siblings` and return the root of the resulting tree.
fn balance(
    forest: &ScopeForest,
    links: &mut [Links],
    siblings: &[NodeId],
    parent: Option<(NodeId, Step)>,
) -> Result<Option<NodeId>, TreeError> {
    let Some(index) = pivot(siblings.len()) else {
        return Ok(None);
    };
    let (before, rest) = siblings.split_at(index);
    let Some((&id, after)) = rest.split_first() else {
        return Ok(None);
    };

    let nested = match forest.node(id)?.body() {
        NodeBody::ScopeRoot { children } => {
            balance(forest, links, children, Some((id, Step::Nested)))?
        }
        NodeBody::Leaf { .. } => None,
    };
    let left = balance(forest, links, before, Some((id, Step::Left)))?;
    let right = balance(forest, links, after, Some((id, Step::Right)))?;

    let slot = links
        .get_mut(id.index())
        .ok_or(TreeError::UnknownNode(id.index()))?;
    *slot = Links {
        parent,
        left,
        right,
        nested,
    };
    Ok(Some(id))
}

#[derive(Debug)]
enum Visit {
    /// Expand the subtree rooted at a node placed at a position.
    Expand(NodeId, Path),
    /// Yield a node with its final path.
    Emit(NodeId, Path),
}

/// Lazy path-ordered traversal of a [`ShapedForest`].
///
/// A leaf at position `p` precedes its subtrees (`p < pL < pR`), while a
/// scope root sits between its left subtree and its nested scope
/// (`pL < pM < pN < pR`).
#[derive(Debug)]
pub struct FlatIter<'a> {
    shaped: &'a ShapedForest,
    stack: Vec<Visit>,
}

impl FlatIter<'_> {
    fn expand(&mut self, id: NodeId, position: &Path) -> Result<(), TreeError> {
        let links = *self.shaped.links(id)?;
        let is_scope_root = self.shaped.forest.node(id)?.is_scope_root();

        // Pushed in reverse visiting order.
        if let Some(right) = links.right {
            self.stack
                .push(Visit::Expand(right, position.child(Step::Right)));
        }
        if is_scope_root {
            if let Some(nested) = links.nested {
                self.stack
                    .push(Visit::Expand(nested, position.child(Step::Nested)));
            }
            self.stack
                .push(Visit::Emit(id, position.child(Step::ScopeRoot)));
            if let Some(left) = links.left {
                self.stack
                    .push(Visit::Expand(left, position.child(Step::Left)));
            }
        } else {
            if let Some(left) = links.left {
                self.stack
                    .push(Visit::Expand(left, position.child(Step::Left)));
            }
            self.stack.push(Visit::Emit(id, position.clone()));
        }
        Ok(())
    }
}

impl Iterator for FlatIter<'_> {
    type Item = Result<FlatNode, TreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(visit) = self.stack.pop() {
            match visit {
                Visit::Emit(id, path) => return Some(self.shaped.flat_node(id, path)),
                Visit::Expand(id, position) => {
                    if let Err(err) = self.expand(id, &position) {
                        self.stack.clear();
                        return Some(Err(err));
                    }
                }
            }
        }
        None
    }
}
