//! Parent resolution from lineage names.
//!
//! The naming convention alone determines where a lineage belongs:
//! `B.1.1` is a child of `B.1`, `BA.5` is a child of `B.1.1.529`. This
//! module derives that nominal parent without looking at any tree:
//! - [LineageNameResolver] - parent of a name, given an [AliasRegistry]
//! - [ParentLineage] - the resolved parent (root sentinel or lineage)
//! - [embedded_lineage] - finds a lineage-shaped token in free text
//! - [is_recombinant] - recombinant names are never placed on the tree

use crate::alias::AliasRegistry;
use crate::error::LineageError;
use crate::model::ROOT_LINEAGE;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Lineage-shaped token: one to three word characters followed by one or
/// more `.`-separated digit groups, e.g. `B.1.1.7` or `BA.2.75`.
static LINEAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w{1,3}(?:\.\d+)+)").expect("lineage pattern is a valid regex")
});

/// Root letters of the nomenclature; their parent is the root sentinel.
const ROOT_LETTERS: [&str; 2] = ["A", "B"];

/// Returns `true` for recombinant lineage names (leading `X`).
pub fn is_recombinant(name: &str) -> bool {
    name.starts_with('X')
}

/// Returns the first lineage-shaped token in `text`, if any.
///
/// # Example
/// ```
/// use sublineage::alias::embedded_lineage;
///
/// assert_eq!(embedded_lineage("Reclassified as B.1.1.1 descendant"), Some("B.1.1.1"));
/// assert_eq!(embedded_lineage("BA.2.75_dropout"), Some("BA.2.75"));
/// assert_eq!(embedded_lineage("no lineage here"), None);
/// ```
pub fn embedded_lineage(text: &str) -> Option<&str> {
    LINEAGE_PATTERN.find(text).map(|m| m.as_str())
}

// =#========================================================================#=
// PARENT LINEAGE
// =#========================================================================€=
/// Nominal parent of a lineage as derived from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLineage {
    /// Parent is the root sentinel (for `A` and `B`).
    Root,
    /// Parent is the named lineage.
    Lineage(String),
}

impl ParentLineage {
    /// Returns the parent name as stored in the tree.
    pub fn as_str(&self) -> &str {
        match self {
            ParentLineage::Root => ROOT_LINEAGE,
            ParentLineage::Lineage(name) => name,
        }
    }
}

impl fmt::Display for ParentLineage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =#========================================================================#=
// LINEAGE NAME RESOLVER
// =#========================================================================$=
/// Derives the parent of a lineage from its name and an [AliasRegistry].
///
/// Resolution is pure name algebra; it never consults a tree and gives the
/// same answer for the same name every time.
///
/// | Name | Rule | Example |
/// |------|------|---------|
/// | `A`, `B` | root sentinel | `B` → `root` |
/// | `X.n` (two segments) | dealias `X`; root letters stay, longer expansions are re-aliased | `B.1` → `B`, `BA.1` → `B.1.1.529`, `BE.1` → `BA.5.3.1` |
/// | three or more segments | drop the last segment | `B.1.117.3` → `B.1.117` |
///
/// # Example
/// ```
/// use sublineage::alias::{AliasRegistry, LineageNameResolver, ParentLineage};
///
/// let mut aliases = AliasRegistry::new();
/// aliases.insert("B", "");
/// aliases.insert("BA", "B.1.1.529");
/// let resolver = LineageNameResolver::new(&aliases);
///
/// assert_eq!(resolver.parent_of("B").unwrap(), ParentLineage::Root);
/// assert_eq!(resolver.parent_of("BA.5").unwrap().as_str(), "B.1.1.529");
/// assert!(resolver.parent_of("GG.5").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LineageNameResolver<'a> {
    aliases: &'a AliasRegistry,
}

impl<'a> LineageNameResolver<'a> {
    /// Creates a resolver over the given alias table.
    pub fn new(aliases: &'a AliasRegistry) -> Self {
        LineageNameResolver { aliases }
    }

    /// Resolves the nominal parent of `name`.
    ///
    /// # Arguments
    /// * `name` - Lineage name in aliased form
    ///
    /// # Returns
    /// * The parent as [ParentLineage]
    /// * [LineageError::MalformedName] for empty segments or a single
    ///   segment other than a root letter
    /// * [LineageError::UnknownAlias] if the alias token of a two-segment
    ///   name is not in the table
    /// * [LineageError::Uncontractible] if the dealiased parent has no
    ///   aliased form
    pub fn parent_of(&self, name: &str) -> Result<ParentLineage, LineageError> {
        if ROOT_LETTERS.contains(&name) {
            return Ok(ParentLineage::Root);
        }

        let segments: Vec<&str> = name.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(LineageError::MalformedName(name.to_string()));
        }

        match segments.len() {
            1 => Err(LineageError::MalformedName(name.to_string())),
            2 => self.parent_of_aliased(name, segments[0]),
            n => Ok(ParentLineage::Lineage(segments[..n - 1].join("."))),
        }
    }

    /// Parent of a two-segment name `alias.n`: the expansion of the alias,
    /// contracted back to the form the tree stores it under.
    fn parent_of_aliased(&self, name: &str, alias: &str) -> Result<ParentLineage, LineageError> {
        let dealiased = self.aliases.expand(alias).ok_or_else(|| LineageError::UnknownAlias {
            lineage: name.to_string(),
            alias: alias.to_string(),
        })?;

        if dealiased.is_empty() {
            return Ok(ParentLineage::Lineage(alias.to_string()));
        }

        self.aliases
            .contract(dealiased)
            .map(ParentLineage::Lineage)
            .ok_or_else(|| LineageError::Uncontractible {
                lineage: name.to_string(),
                expanded: dealiased.to_string(),
            })
    }
}
