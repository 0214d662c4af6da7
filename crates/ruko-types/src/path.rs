use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a block inside a program tree.
///
/// Each entry is a child index: `[2, 0]` is the first child of the third
/// top-level block. The empty path denotes the program root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    /// The program root (no block).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `index`-th child below this path.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Nesting depth: 1 for top-level blocks, 0 for the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// `true` for blocks sitting directly in the program's top-level sequence.
    pub fn is_top_level(&self) -> bool {
        self.0.len() == 1
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for BlockPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl FromIterator<usize> for BlockPath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}
