//! Structural paths locating nodes within a shaped forest.

use std::fmt;

/// One step of a [`Path`].
///
/// The derived ordering (`Left < ScopeRoot < Nested < Right`) makes path
/// order match the order in which the commitment consumes nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Descend into the left subtree.
    Left,
    /// Terminal marker: the node at this position is a scope root.
    ScopeRoot,
    /// Descend into the nested scope owned by a scope root.
    Nested,
    /// Descend into the right subtree.
    Right,
}

impl Step {
    /// Single-letter token used when rendering paths.
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::Left => 'L',
            Self::ScopeRoot => 'M',
            Self::Nested => 'N',
            Self::Right => 'R',
        }
    }

    /// Parse a single-letter token.
    #[must_use]
    pub const fn from_token(token: char) -> Option<Self> {
        match token {
            'L' => Some(Self::Left),
            'M' => Some(Self::ScopeRoot),
            'N' => Some(Self::Nested),
            'R' => Some(Self::Right),
            _ => None,
        }
    }
}

/// Sequence of steps from the outermost root to a node.
///
/// Ordering is lexicographic with a strict prefix sorting first, so sorting
/// nodes by path yields the commitment's consumption order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Path(Vec<Step>);

impl Path {
    /// The empty path, addressing the outermost root position.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// This path extended by one step.
    #[must_use]
    pub fn child(&self, step: Step) -> Self {
        let mut steps = Vec::with_capacity(self.0.len().saturating_add(1));
        steps.extend_from_slice(&self.0);
        steps.push(step);
        Self(steps)
    }

    /// The steps, outermost first.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The final step, if any.
    #[must_use]
    pub fn last(&self) -> Option<Step> {
        self.0.last().copied()
    }

    /// Whether `prefix` is a (not necessarily strict) prefix of this path.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The path without its final step. `None` for the root path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    /// Position of the node in its tree: the path without a trailing
    /// [`Step::ScopeRoot`] marker.
    #[must_use]
    pub fn position(&self) -> Self {
        if let Some((Step::ScopeRoot, init)) = self.0.split_last() {
            Self(init.to_vec())
        } else {
            self.clone()
        }
    }
}

impl From<Vec<Step>> for Path {
    fn from(steps: Vec<Step>) -> Self {
        Self(steps)
    }
}

impl FromIterator<Step> for Path {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            write!(f, "{}", step.token())?;
        }
        Ok(())
    }
}
