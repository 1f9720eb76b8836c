//! Data model for lineage taxonomies.
//!
//! # Tree representation
//! A taxonomy is represented by [LineageTree], which uses the arena pattern
//! to store [LineageVertex] nodes referenced by [VertexIndex]. The tree
//! always contains the root sentinel [ROOT_LINEAGE]; the two root lineages
//! `A` and `B` hang below it.
//!
//! # Building trees
//! [LineageTree::insert] only accepts a lineage whose parent is already
//! present. Input lists are rarely ordered that way, so trees are normally
//! assembled by a [TreeBuilder](crate::builder::TreeBuilder), which derives
//! each parent from the lineage name and defers lineages until their parent
//! is placed.
//!
//! # Queries
//! * Parent, children, depth, ancestors and descendants of a lineage
//! * Pre-order listing of all lineages
//! * Closest common ancestor of two or many lineages

pub mod tree;
pub mod vertex;

pub use tree::LineageTree;
pub use tree::PreOrderIter;
pub use tree::ROOT_LINEAGE;
pub use tree::VertexIndex;
pub use vertex::LineageVertex;
