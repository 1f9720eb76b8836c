//! Assembly of lineage trees from unordered input.
//!
//! [TreeBuilder] places lineages on a [LineageTree] using only their names:
//! the parent of each lineage is derived by the [LineageNameResolver], and a
//! lineage whose parent is not placed yet is deferred to a later pass.
//! Problems with single names never abort a build; they are returned as
//! [LineageError] lists (the "invalid" lineages) while everything else is
//! placed.
//!
//! Three kinds of input are supported, normally added in this order:
//! 1. Current lineages ([TreeBuilder::add_lineages])
//! 2. Withdrawn lineages ([TreeBuilder::add_withdrawn_lineages]), placed by
//!    name or, failing that, next to a lineage mentioned in their note
//! 3. External clades ([TreeBuilder::add_clades]), see [clade]

pub mod clade;

pub use clade::{CladeNode, CladeRelationships, clade_relationships, parse_clade_name};

use crate::alias::{AliasRegistry, LineageNameResolver, embedded_lineage, is_recombinant};
use crate::error::{LineageError, Result};
use crate::io::WithdrawnLineage;
use crate::model::{LineageTree, ROOT_LINEAGE};
use tracing::{debug, info, warn};

/// A lineage waiting for its parent to be placed.
#[derive(Debug)]
struct PendingLineage {
    name: String,
    parent: String,
}

// =#========================================================================#=
// TREE BUILDER
// =#========================================================================€=
/// Builds a [LineageTree] from lineage lists, withdrawn records and clades.
///
/// # Deferred insertion
/// Names are processed in passes over a pending list, in input order. A
/// name whose parent is already in the tree is inserted; otherwise it stays
/// pending for the next pass. Names placed early in a pass can serve as
/// parents later in the same pass, so input in parent-first order needs a
/// single pass. The loop stops once a pass places nothing; every name still
/// pending then gets [LineageError::UnresolvableParent]. An optional pass
/// limit bounds the loop further.
///
/// # Example
/// ```
/// use sublineage::alias::AliasRegistry;
/// use sublineage::builder::TreeBuilder;
///
/// let aliases = AliasRegistry::from_json(r#"{"A": "", "B": "", "BA": "B.1.1.529"}"#).unwrap();
///
/// let mut builder = TreeBuilder::new(&aliases);
/// let invalid = builder.add_lineages(["BA.1", "B.1.1.529", "B.1.1", "B.1", "B", "XBB.1"]);
/// let tree = builder.into_tree();
///
/// assert_eq!(tree.parent_of("BA.1"), Some("B.1.1.529"));
/// assert_eq!(invalid.len(), 1);
/// assert_eq!(invalid[0].lineage(), "XBB.1");
/// ```
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    resolver: LineageNameResolver<'a>,
    tree: LineageTree,
    pass_limit: Option<usize>,
}

// ============================================================================
// New, Configuration (pub)
// ============================================================================
impl<'a> TreeBuilder<'a> {
    /// Creates a builder starting from a tree holding only the root.
    pub fn new(aliases: &'a AliasRegistry) -> Self {
        Self::from_tree(aliases, LineageTree::new())
    }

    /// Creates a builder that extends an existing tree.
    pub fn from_tree(aliases: &'a AliasRegistry, tree: LineageTree) -> Self {
        TreeBuilder {
            resolver: LineageNameResolver::new(aliases),
            tree,
            pass_limit: None,
        }
    }

    /// Bounds deferred insertion to at most `passes` passes per call.
    ///
    /// Names still pending afterwards are reported as
    /// [LineageError::UnresolvableParent].
    pub fn with_pass_limit(mut self, passes: usize) -> Self {
        self.pass_limit = Some(passes);
        self
    }

    /// Returns the tree built so far.
    pub fn tree(&self) -> &LineageTree {
        &self.tree
    }

    /// Consumes the builder and returns the tree.
    pub fn into_tree(self) -> LineageTree {
        self.tree
    }
}

// ============================================================================
// Adding lineages (pub)
// ============================================================================
impl<'a> TreeBuilder<'a> {
    /// Adds current lineages in any order.
    ///
    /// Recombinants, names with unresolvable alias and names whose parent
    /// never gets placed are skipped. Names already in the tree are ignored.
    ///
    /// # Arguments
    /// * `names` - Lineage names in aliased form
    ///
    /// # Returns
    /// The skipped names with reason, in the order they were rejected
    pub fn add_lineages<I, S>(&mut self, names: I) -> Vec<LineageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut invalid = Vec::new();
        let mut pending = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if is_recombinant(name) {
                debug!(lineage = name, "skipping recombinant lineage");
                invalid.push(LineageError::Recombinant(name.to_string()));
                continue;
            }

            match self.resolver.parent_of(name) {
                Ok(parent) => pending.push(PendingLineage {
                    name: name.to_string(),
                    parent: parent.as_str().to_string(),
                }),
                Err(error) => {
                    warn!(%error, "rejecting lineage");
                    invalid.push(error);
                }
            }
        }

        invalid.extend(self.place_deferred(pending));
        info!(
            vertices = self.tree.len(),
            invalid = invalid.len(),
            "added lineages"
        );
        invalid
    }

    /// Adds withdrawn lineages.
    ///
    /// A withdrawn name already in the tree is skipped. Otherwise it is
    /// placed below its nominal parent if that is in the tree. If not, the
    /// first lineage mentioned in the note is used: directly as parent when
    /// it is in the tree, else its own nominal parent is used.
    ///
    /// # Returns
    /// The withdrawn records that could not be placed
    pub fn add_withdrawn_lineages(&mut self, records: &[WithdrawnLineage]) -> Vec<LineageError> {
        let mut invalid = Vec::new();

        for record in records {
            let name = record.name.trim();
            if name.is_empty() || self.tree.contains(name) {
                continue;
            }
            if is_recombinant(name) {
                debug!(lineage = name, "skipping withdrawn recombinant lineage");
                invalid.push(LineageError::Recombinant(name.to_string()));
                continue;
            }

            let parent = match self.resolver.parent_of(name) {
                Ok(parent) if self.tree.contains(parent.as_str()) => parent.as_str().to_string(),
                _ => match self.parent_from_note(&record.note) {
                    Some(parent) => parent,
                    None => {
                        warn!(lineage = name, note = %record.note, "withdrawn lineage has no placeable reference");
                        invalid.push(LineageError::NoReference(name.to_string()));
                        continue;
                    }
                },
            };

            match self.tree.insert(name, &parent) {
                Ok(_) => debug!(lineage = name, parent = %parent, "placed withdrawn lineage"),
                Err(error) => {
                    warn!(%error, "rejecting withdrawn lineage");
                    invalid.push(error);
                }
            }
        }

        info!(
            records = records.len(),
            invalid = invalid.len(),
            "added withdrawn lineages"
        );
        invalid
    }

    /// Adds the clades of an external clade schema.
    ///
    /// Clades are placed below their referenced lineage or parent clade
    /// (see [clade_relationships]) with the same deferred insertion as
    /// lineages. The schema root without reference is placed below the
    /// tree root.
    ///
    /// # Returns
    /// * The clades that could not be placed
    /// * [Error::MalformedClade](crate::error::Error::MalformedClade) if any
    ///   clade name does not parse; nothing is placed in that case
    pub fn add_clades(&mut self, root: &CladeNode) -> Result<Vec<LineageError>> {
        let relationships = clade_relationships(&self.tree, root)?;

        let pending = relationships
            .iter()
            .map(|(label, parent)| PendingLineage {
                name: label.to_string(),
                parent: parent.unwrap_or(ROOT_LINEAGE).to_string(),
            })
            .collect();

        let unplaced = self.place_deferred(pending);
        info!(
            clades = relationships.len(),
            unplaced = unplaced.len(),
            "added clades"
        );
        Ok(unplaced)
    }
}

// ============================================================================
// Deferred insertion (private)
// ============================================================================
impl<'a> TreeBuilder<'a> {
    /// Inserts pending lineages pass by pass until all are placed or a pass
    /// makes no progress.
    fn place_deferred(&mut self, mut pending: Vec<PendingLineage>) -> Vec<LineageError> {
        let mut invalid = Vec::new();
        let mut passes = 0;

        while !pending.is_empty() {
            if self.pass_limit.is_some_and(|limit| passes >= limit) {
                warn!(passes, pending = pending.len(), "pass limit reached");
                break;
            }
            passes += 1;

            let before = pending.len();
            let mut deferred = Vec::new();
            for lineage in pending {
                if self.tree.contains(&lineage.name) {
                    debug!(lineage = %lineage.name, "skipping duplicate lineage");
                    continue;
                }
                if !self.tree.contains(&lineage.parent) {
                    deferred.push(lineage);
                    continue;
                }
                match self.tree.insert(&lineage.name, &lineage.parent) {
                    Ok(_) => debug!(lineage = %lineage.name, parent = %lineage.parent, "placed lineage"),
                    Err(error) => invalid.push(error),
                }
            }

            let progressed = deferred.len() < before;
            pending = deferred;
            if !progressed {
                break;
            }
        }

        debug!(passes, unresolved = pending.len(), "deferred insertion finished");
        for lineage in pending {
            warn!(lineage = %lineage.name, parent = %lineage.parent, "parent never became available");
            invalid.push(LineageError::UnresolvableParent {
                lineage: lineage.name,
                parent: lineage.parent,
            });
        }
        invalid
    }

    /// Parent for a withdrawn lineage taken from the first lineage
    /// mentioned in its note.
    fn parent_from_note(&self, note: &str) -> Option<String> {
        let reference = embedded_lineage(note)?;
        if self.tree.contains(reference) {
            return Some(reference.to_string());
        }
        self.resolver
            .parent_of(reference)
            .ok()
            .map(|parent| parent.as_str().to_string())
    }
}

// =#========================================================================#=
// QUICK API
// =#========================================================================$=
/// Builds a tree from a list of current lineages.
///
/// # Returns
/// The tree and the names that could not be placed
pub fn build_from_lineage_list<I, S>(names: I, aliases: &AliasRegistry) -> (LineageTree, Vec<LineageError>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = TreeBuilder::new(aliases);
    let invalid = builder.add_lineages(names);
    (builder.into_tree(), invalid)
}
