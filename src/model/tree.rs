//! Lineage tree representation.
//!
//! Provides the core data structure of the crate:
//! * [LineageTree] - Tree of lineage names using the arena pattern
//! * [VertexIndex] as type used to index vertices in the tree
//! * [ROOT_LINEAGE] as name of the root sentinel

use crate::error::LineageError;
use crate::model::vertex::LineageVertex;
use std::collections::HashMap;
use std::fmt;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// Name of the root sentinel vertex; `A` and `B` hang below it.
pub const ROOT_LINEAGE: &str = "root";

/// The root is always the first vertex in the arena.
const ROOT_INDEX: VertexIndex = 0;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted tree of lineage names represented using the arena pattern
/// on [LineageVertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex], with a name lookup table on the side. No vertex owns
/// another vertex; parents and children are plain indices.
///
/// # Structure
/// - The root sentinel [ROOT_LINEAGE] is created with the tree and sits at index 0.
/// - Every other vertex has exactly one parent, which was present at the
///   moment of insertion, so there are no cycles.
/// - Names are unique.
/// - Children are kept in insertion order; all traversals follow that order.
///
/// # Example
/// ```
/// use sublineage::model::LineageTree;
///
/// let mut tree = LineageTree::new();
/// tree.insert("B", "root").unwrap();
/// tree.insert("B.1", "B").unwrap();
/// tree.insert("B.1.1", "B.1").unwrap();
/// tree.insert("B.2", "B").unwrap();
///
/// assert_eq!(tree.parent_of("B.1.1"), Some("B.1"));
/// assert_eq!(tree.common_ancestor("B.1.1", "B.2"), Some("B"));
/// assert!(tree.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct LineageTree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<LineageVertex>,

    /// Map from lineage name to its vertex index
    names: HashMap<String, VertexIndex>,
}

// ============================================================================
// New, Insertion, Getters (pub)
// ============================================================================
impl LineageTree {
    /// Creates a tree consisting only of the root sentinel.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a tree consisting only of the root sentinel,
    /// with room for `capacity` vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut vertices = Vec::with_capacity(capacity.max(1));
        vertices.push(LineageVertex::new_root(ROOT_INDEX, ROOT_LINEAGE));
        let mut names = HashMap::with_capacity(capacity.max(1));
        names.insert(ROOT_LINEAGE.to_string(), ROOT_INDEX);
        LineageTree { vertices, names }
    }

    /// Inserts `name` as new child of `parent`.
    ///
    /// # Arguments
    /// * `name` - Lineage name of the new vertex
    /// * `parent` - Name of a vertex already present in the tree
    ///
    /// # Returns
    /// * The index of the new vertex
    /// * [LineageError::MissingParent] if `parent` is not in the tree
    /// * [LineageError::DuplicateLineage] if `name` is already in the tree
    pub fn insert(&mut self, name: &str, parent: &str) -> Result<VertexIndex, LineageError> {
        if self.names.contains_key(name) {
            return Err(LineageError::DuplicateLineage(name.to_string()));
        }
        let parent_index = self.index_of(parent).ok_or_else(|| LineageError::MissingParent {
            lineage: name.to_string(),
            parent: parent.to_string(),
        })?;

        let index = self.vertices.len();
        let depth = self.vertices[parent_index].depth() + 1;
        self.vertices
            .push(LineageVertex::new_lineage(index, name, parent_index, depth));
        self.vertices[parent_index].add_child(index);
        self.names.insert(name.to_string(), index);

        Ok(index)
    }

    /// Returns whether a lineage with this name is in the tree.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Returns the vertex index of the lineage, or `None` if absent.
    pub fn index_of(&self, name: &str) -> Option<VertexIndex> {
        self.names.get(name).copied()
    }

    /// Returns the vertex of the lineage, or `None` if absent.
    pub fn vertex(&self, name: &str) -> Option<&LineageVertex> {
        self.index_of(name).map(|index| &self.vertices[index])
    }

    /// Returns the root sentinel vertex.
    pub fn root(&self) -> &LineageVertex {
        &self.vertices[ROOT_INDEX]
    }

    /// Returns the number of vertices, root included.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() == 1
    }

    /// Returns the name of the parent of `name`.
    ///
    /// # Returns
    /// `None` if `name` is absent or is the root
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        let vertex = self.vertex(name)?;
        vertex
            .parent_index()
            .map(|parent| self.vertices[parent].name())
    }

    /// Returns the names of the direct children of `name`, in insertion order.
    ///
    /// # Returns
    /// `None` if `name` is absent; an empty list for leaves
    pub fn children_of(&self, name: &str) -> Option<Vec<&str>> {
        let vertex = self.vertex(name)?;
        Some(
            vertex
                .children()
                .iter()
                .map(|&child| self.vertices[child].name())
                .collect(),
        )
    }

    /// Returns the depth of `name` (root has depth 0), or `None` if absent.
    pub fn depth(&self, name: &str) -> Option<usize> {
        self.vertex(name).map(|v| v.depth())
    }

    /// Returns the path from the parent of `name` up to and including the root.
    ///
    /// # Returns
    /// `None` if `name` is absent; an empty list for the root
    pub fn ancestors(&self, name: &str) -> Option<Vec<&str>> {
        let mut current = self.vertex(name)?;
        let mut path = Vec::with_capacity(current.depth());
        while let Some(parent) = current.parent_index() {
            current = &self.vertices[parent];
            path.push(current.name());
        }
        Some(path)
    }

    /// Returns all descendants of `name` in pre-order, excluding `name` itself.
    ///
    /// # Returns
    /// `None` if `name` is absent **or has no children**, so callers can tell
    /// leaves apart from inner lineages
    pub fn descendants(&self, name: &str) -> Option<Vec<&str>> {
        let vertex = self.vertex(name)?;
        if vertex.is_leaf() {
            return None;
        }
        Some(
            PreOrderIter::from_index(self, vertex.index())
                .skip(1)
                .map(|v| v.name())
                .collect(),
        )
    }

    /// Returns the names of all vertices in pre-order, starting with the root.
    pub fn lineage_names(&self) -> Vec<&str> {
        self.pre_order_iter().map(|v| v.name()).collect()
    }
}

impl Default for LineageTree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Common ancestors (pub)
// ============================================================================
impl LineageTree {
    /// Returns the closest common ancestor of two lineages.
    ///
    /// The deeper lineage is walked up to the depth of the shallower one,
    /// then both walk up in lock-step until they meet. A lineage that is an
    /// ancestor of the other is itself the result.
    ///
    /// # Returns
    /// `None` if either lineage is absent
    pub fn common_ancestor(&self, a: &str, b: &str) -> Option<&str> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        Some(self.vertices[self.common_ancestor_index(a, b)].name())
    }

    /// Returns the closest common ancestor of all present lineages in `names`.
    ///
    /// Names absent from the tree are ignored: combining an absent name with
    /// a result passes the result through unchanged. Evaluated as a fold from
    /// the last name to the first, without recursion.
    ///
    /// # Returns
    /// * The common ancestor of the present names
    ///   (a single present name is its own result)
    /// * `None` if no name is present in the tree
    pub fn common_ancestor_of_many<S: AsRef<str>>(&self, names: &[S]) -> Option<&str> {
        names
            .iter()
            .rev()
            .fold(None, |acc, name| match (self.index_of(name.as_ref()), acc) {
                (None, acc) => acc,
                (Some(index), None) => Some(index),
                (Some(index), Some(acc)) => Some(self.common_ancestor_index(index, acc)),
            })
            .map(|index| self.vertices[index].name())
    }

    fn common_ancestor_index(&self, a: VertexIndex, b: VertexIndex) -> VertexIndex {
        let (mut lower, mut higher) = if self.vertices[a].depth() > self.vertices[b].depth() {
            (a, b)
        } else {
            (b, a)
        };

        while self.vertices[lower].depth() != self.vertices[higher].depth() {
            lower = self.parent_or_root(lower);
        }
        while lower != higher {
            lower = self.parent_or_root(lower);
            higher = self.parent_or_root(higher);
        }

        lower
    }

    fn parent_or_root(&self, index: VertexIndex) -> VertexIndex {
        self.vertices[index].parent_index().unwrap_or(ROOT_INDEX)
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl LineageTree {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Vertex 0 is the root sentinel and the only vertex without parent
    /// - All vertex indices match their position in the arena
    /// - All parent indices are valid and list this vertex as a child
    /// - All child indices are valid and point back to this vertex
    /// - Depths increase by one from parent to child
    /// - The name table maps every name to the vertex carrying it
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.vertices.is_empty() || !self.vertices[ROOT_INDEX].is_root() {
            return false;
        }
        if self.names.len() != self.vertices.len() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }
            if self.names.get(vertex.name()) != Some(&index) {
                return false;
            }

            match vertex.parent_index() {
                None => {
                    if index != ROOT_INDEX {
                        return false;
                    }
                }
                Some(parent) => {
                    if parent >= self.vertices.len() {
                        return false;
                    }
                    let parent = &self.vertices[parent];
                    if !parent.children().contains(&index) || parent.depth() + 1 != vertex.depth() {
                        return false;
                    }
                }
            }

            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent_index() != Some(index) {
                    return false;
                }
            }
        }

        true
    }
}

impl std::ops::Index<VertexIndex> for LineageTree {
    type Output = LineageVertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
/// Renders the tree with one lineage per line, e.g.
/// ```text
/// root
///   ├─ A
///   └─ B
///       ├─ B.1
///       │   └─ B.1.1
///       └─ B.2
/// ```
impl fmt::Display for LineageTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.root().name())?;
        let children = self.root().children();
        for (i, &child) in children.iter().enumerate() {
            self.fmt_vertex(f, child, "  ", i + 1 == children.len())?;
        }
        Ok(())
    }
}

impl LineageTree {
    fn fmt_vertex(
        &self,
        f: &mut fmt::Formatter,
        index: VertexIndex,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let vertex = &self.vertices[index];
        let connector = if is_last { "└─ " } else { "├─ " };
        writeln!(f, "{}{}{}", prefix, connector, vertex.name())?;

        let new_prefix = format!("{}{}   ", prefix, if is_last { " " } else { "│" });
        let children = vertex.children();
        for (i, &child) in children.iter().enumerate() {
            self.fmt_vertex(f, child, &new_prefix, i + 1 == children.len())?;
        }
        Ok(())
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl LineageTree {
    /// Returns an iterator over the tree in pre-order (parents before children),
    /// starting at the root. Siblings are visited in insertion order.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::from_index(self, ROOT_INDEX)
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// Stack-based, so deep trees do not recurse.
pub struct PreOrderIter<'a> {
    tree: &'a LineageTree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn from_index(tree: &'a LineageTree, start: VertexIndex) -> Self {
        PreOrderIter {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a LineageVertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree.vertices[index];

        // Reversed, so the first child is visited first
        self.stack.extend(vertex.children().iter().rev());

        Some(vertex)
    }
}
