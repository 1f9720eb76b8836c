//! Error types for tree construction and collapse-map assembly.
//!
//! Two levels are distinguished:
//! * [LineageError] is attached to a single lineage name. Builders collect
//!   these into "invalid" lists and carry on with everything else.
//! * [Error] stops the operation that raised it, e.g. a clade schema whose
//!   names no longer follow the expected format.

use thiserror::Error;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

// =#========================================================================#=
// LINEAGE ERROR
// =#========================================================================€=
/// Problem with a single lineage name; never aborts a build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineageError {
    /// Recombinant lineages (leading `X`) are not placed on the tree.
    #[error("recombinant lineage {0} is not placed on the tree")]
    Recombinant(String),

    /// The leading alias token of the name is not in the alias table.
    #[error("lineage {lineage} uses unknown alias '{alias}'")]
    UnknownAlias { lineage: String, alias: String },

    /// The dealiased parent has no aliased form with the current alias table.
    #[error("no alias contracts {expanded} (dealiased parent of {lineage})")]
    Uncontractible { lineage: String, expanded: String },

    /// Name does not have the shape of a lineage at all.
    #[error("malformed lineage name '{0}'")]
    MalformedName(String),

    /// Insertion was attempted under a parent that is not in the tree.
    #[error("cannot insert {lineage}: parent {parent} is not in the tree")]
    MissingParent { lineage: String, parent: String },

    /// A vertex with this name already exists.
    #[error("lineage {0} is already in the tree")]
    DuplicateLineage(String),

    /// The parent never became available during deferred insertion.
    #[error("parent {parent} of {lineage} never became available")]
    UnresolvableParent { lineage: String, parent: String },

    /// Withdrawn record without a placeable parent or usable note reference.
    #[error("withdrawn lineage {0} has no placeable reference")]
    NoReference(String),
}

impl LineageError {
    /// Returns the lineage name the error is about.
    pub fn lineage(&self) -> &str {
        match self {
            LineageError::Recombinant(lineage)
            | LineageError::MalformedName(lineage)
            | LineageError::DuplicateLineage(lineage)
            | LineageError::NoReference(lineage) => lineage,
            LineageError::UnknownAlias { lineage, .. }
            | LineageError::Uncontractible { lineage, .. }
            | LineageError::MissingParent { lineage, .. }
            | LineageError::UnresolvableParent { lineage, .. } => lineage,
        }
    }
}

// =#========================================================================#=
// ERROR
// =#========================================================================$=
/// Fatal errors of the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A clade name that does not match `<2 digits><char> [(<info>)]`.
    /// Indicates an upstream schema change, so the clade build stops.
    #[error("malformed clade name '{0}' in clade schema")]
    MalformedClade(String),

    /// Group definition line without a tab between label and seeds.
    #[error("malformed group definition on line {line}: '{content}'")]
    MalformedGroupDefinition { line: usize, content: String },

    /// Collapse map row without a tab between label and members.
    #[error("malformed collapse map row on line {line}: '{content}'")]
    MalformedCollapseMap { line: usize, content: String },

    /// JSON input (alias table, clade schema) could not be deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single-lineage error escalated by the caller.
    #[error(transparent)]
    Lineage(#[from] LineageError),
}
