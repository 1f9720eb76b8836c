//! Sublineage is a library to organize aliased lineage names into a
//! taxonomy tree and to collapse the tree into a few reporting groups.
//!
//! Lineage nomenclatures such as Pango name each lineage after its parent
//! (`B.1.1` below `B.1`) and shorten long names with aliases (`BA.5` for
//! `B.1.1.529.5`). Core functionality provided:
//! - Aliases: expand and contract aliased names, see [crate::alias].
//! - Tree building: place current lineages, withdrawn lineages and external
//!   clades on a [LineageTree] in any input order, see [crate::builder].
//!   Names that cannot be placed are reported, never fatal.
//! - Tree queries: parent, children, depth, ancestors, descendants and
//!   closest common ancestor of many lineages.
//!   The tree uses the arena pattern, see [crate::model].
//! - Collapse maps: assign every lineage to one group given a few seed
//!   lineages per group, with nested seeds claiming their own subtree, see
//!   [crate::collapse].
//! - Signature clusters: fold lineages that share a mutation signature into
//!   one deterministically named cluster group, see [crate::barcode].
//!
//! All builds are deterministic: the same inputs always give the same tree
//! and byte-identical collapse map tables.
//!
//! # Usage patterns
//! 1. The quick API below runs the complete pipeline with default settings.
//! 2. Configure a [TreeBuilder](crate::builder::TreeBuilder) and a
//!    [CollapseMapBuilder](crate::collapse::CollapseMapBuilder) yourself for
//!    pass limits, custom labels or signature clusters.
//!
//! ## Example
//! ```
//! use sublineage::alias::AliasRegistry;
//! use sublineage::io::{GroupDefinitions, LineageNotes};
//! use sublineage::{build_lineage_tree, collapse_lineages};
//!
//! let aliases = AliasRegistry::from_json(r#"{"A": "", "B": "", "BA": "B.1.1.529"}"#)?;
//! let notes = LineageNotes::parse(
//!     "Lineage\tDescription\n\
//!      B\tRoot\n\
//!      B.1\tEurope\n\
//!      B.1.1\tEurope\n\
//!      B.1.1.529\tOmicron\n\
//!      BA.1 Alias of B.1.1.529.1\n\
//!      BA.2 Alias of B.1.1.529.2\n",
//! );
//! let build = build_lineage_tree(&aliases, &notes, None)?;
//! assert!(build.invalid.is_empty());
//!
//! let definitions = GroupDefinitions::parse("Group\tLineages\nOmicron\tBA.1\nOmicron (BA.2)\tBA.2\n")?;
//! let map = collapse_lineages(&build.tree, &definitions, ["BA.2_dropout"]);
//! assert_eq!(
//!     map.to_tsv(),
//!     "Group\tSublineages\n\
//!      Omicron\tBA.1\n\
//!      Omicron (BA.2)\tBA.2,BA.2_dropout\n\
//!      Not a VOC\troot,B,B.1,B.1.1,B.1.1.529\n"
//! );
//! # Ok::<(), sublineage::error::Error>(())
//! ```

pub mod alias;
pub mod barcode;
pub mod builder;
pub mod collapse;
pub mod error;
pub mod io;
pub mod model;

use crate::alias::AliasRegistry;
use crate::builder::{CladeNode, TreeBuilder};
use crate::collapse::{CollapseMap, CollapseMapBuilder};
use crate::error::{LineageError, Result};
use crate::io::{GroupDefinitions, LineageNotes};
use crate::model::LineageTree;

/// Result of [build_lineage_tree].
#[derive(Debug, Clone)]
pub struct LineageBuild {
    /// The lineage tree
    pub tree: LineageTree,
    /// Current lineages that could not be placed
    pub invalid: Vec<LineageError>,
    /// Withdrawn lineages that could not be placed
    pub invalid_withdrawn: Vec<LineageError>,
    /// Clades that could not be placed
    pub unplaced_clades: Vec<LineageError>,
}

// ============================================================================
// Quick API
// ============================================================================
/// Builds the lineage tree from lineage notes and, optionally, an external
/// clade schema, using default settings.
///
/// Current lineages are placed first, then withdrawn lineages, then clades.
///
/// # Errors
/// [Error::MalformedClade](crate::error::Error::MalformedClade) if a clade
/// name does not parse.
pub fn build_lineage_tree(
    aliases: &AliasRegistry,
    notes: &LineageNotes,
    clades: Option<&CladeNode>,
) -> Result<LineageBuild> {
    let capacity = notes.lineages().len() + notes.withdrawn().len() + 1;
    let mut builder = TreeBuilder::from_tree(aliases, LineageTree::with_capacity(capacity));
    let invalid = builder.add_lineages(notes.lineages());
    let invalid_withdrawn = builder.add_withdrawn_lineages(notes.withdrawn());
    let unplaced_clades = match clades {
        Some(root) => builder.add_clades(root)?,
        None => Vec::new(),
    };

    Ok(LineageBuild {
        tree: builder.into_tree(),
        invalid,
        invalid_withdrawn,
        unplaced_clades,
    })
}

/// Builds the collapse map of `tree` for the given group definitions and
/// observed lineage universe, using default labels.
///
/// See [CollapseMapBuilder] for the full configuration.
pub fn collapse_lineages<I, S>(tree: &LineageTree, definitions: &GroupDefinitions, universe: I) -> CollapseMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CollapseMapBuilder::new(tree, definitions)
        .with_universe(universe)
        .build()
}
