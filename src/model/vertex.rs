//! Vertex module for the lineage tree.

use crate::model::tree::VertexIndex;

// =#========================================================================#=
// LINEAGE VERTEX
// =#========================================================================#=
/// A vertex (node) of a [LineageTree](crate::model::LineageTree).
///
/// A vertex is either:
/// - **Root**: the `"root"` sentinel, no parent, depth 0
/// - **Lineage**: exactly one parent, any number of children
///
/// # Invariants
/// - `index` is the position of the vertex in the tree arena
/// - `parent` is `None` only for the root
/// - `depth` is the depth of the parent plus one
/// - `children` are kept in insertion order
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct LineageVertex {
    /// Index of this vertex in the tree arena
    index: VertexIndex,
    /// Lineage name, unique within a tree
    name: String,
    /// Index of the parent vertex; `None` for the root
    parent: Option<VertexIndex>,
    /// Indices of the child vertices, in insertion order
    children: Vec<VertexIndex>,
    /// Number of edges between this vertex and the root
    depth: usize,
}

impl LineageVertex {
    /// Creates the root vertex.
    ///
    /// # Arguments
    /// * `index` - The index of the root in the tree arena
    /// * `name` - Name of the root sentinel
    pub(crate) fn new_root(index: VertexIndex, name: &str) -> Self {
        LineageVertex {
            index,
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            depth: 0,
        }
    }

    /// Creates a lineage vertex below `parent`.
    ///
    /// The parent is not informed about its new child;
    /// that is the job of the tree.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree arena
    /// * `name` - Lineage name
    /// * `parent` - Index of the parent vertex
    /// * `depth` - Depth of the new vertex (parent depth + 1)
    pub(crate) fn new_lineage(index: VertexIndex, name: &str, parent: VertexIndex, depth: usize) -> Self {
        LineageVertex {
            index,
            name: name.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            depth,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the lineage name of this vertex.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent_index(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns the child indices in insertion order.
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns the depth of this vertex (root has depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` if this vertex is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns `true` if this vertex has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn add_child(&mut self, child: VertexIndex) {
        self.children.push(child);
    }
}
