//! Alias handling for hierarchical lineage names.
//!
//! Lineage names grow by one dot-separated segment per generation
//! (`B.1` → `B.1.1`). Once a name would carry more than three numeric
//! segments below its root letter, it is shortened with an alias
//! (`B.1.1.529.5` is written `BA.5`). This module provides:
//! - [AliasRegistry] - the alias table, with expansion and contraction
//! - [LineageNameResolver] - derives the parent of a lineage from its name
//!
//! # Alias table format
//! The table is a JSON object keyed by alias. Values are either the dotted
//! expansion (`"BA": "B.1.1.529"`, with `""` for the root letters `A` and
//! `B`) or, for recombinants, the list of parent lineages
//! (`"XA": ["B.1.1.7", "B.1.177"]`).

pub mod resolver;

pub use resolver::{LineageNameResolver, ParentLineage, embedded_lineage, is_recombinant};

use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Numeric segments making up one alias level.
const SEGMENTS_PER_LEVEL: usize = 3;

// =#========================================================================#=
// ALIAS REGISTRY
// =#========================================================================€=
/// Mapping from alias tokens to their dotted expansions.
///
/// Loaded once per build and not modified while a tree is built from it.
///
/// # Example
/// ```
/// use sublineage::alias::AliasRegistry;
///
/// let aliases = AliasRegistry::from_json(
///     r#"{"A": "", "B": "", "BA": "B.1.1.529", "BE": "B.1.1.529.5.3.1"}"#,
/// ).unwrap();
///
/// assert_eq!(aliases.expand("BA"), Some("B.1.1.529"));
/// assert_eq!(aliases.dealias("BE.1").as_deref(), Some("B.1.1.529.5.3.1.1"));
/// assert_eq!(aliases.contract("B.1.1.529.5.3.1.5").as_deref(), Some("BE.5"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    /// Alias token -> dotted expansion (empty for root letters)
    expansions: HashMap<String, String>,
    /// Alias tokens in table order
    order: Vec<String>,
    /// Dotted expansion -> alias token; later table entries win
    contractions: HashMap<String, String>,
    /// Recombinant alias token -> parent lineages
    recombinants: HashMap<String, Vec<String>>,
}

/// Value of an alias table entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AliasTarget {
    Expansion(String),
    Recombinant(Vec<String>),
}

impl AliasRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an alias table from its JSON representation.
    ///
    /// # Returns
    /// * The registry, with entries registered in table order
    /// * [Error::Json](crate::error::Error::Json) if the text is not a JSON
    ///   object of strings and string lists
    pub fn from_json(json: &str) -> Result<Self> {
        let table: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        Self::from_table(table)
    }

    /// Reads an alias table in JSON representation from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let table: serde_json::Map<String, serde_json::Value> = serde_json::from_reader(reader)?;
        Self::from_table(table)
    }

    fn from_table(table: serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut registry = AliasRegistry::new();
        for (alias, value) in table {
            match serde_json::from_value(value)? {
                AliasTarget::Expansion(expansion) => registry.insert(&alias, &expansion),
                AliasTarget::Recombinant(parents) => registry.insert_recombinant(&alias, parents),
            }
        }
        Ok(registry)
    }

    /// Registers `alias` as short form of `expansion`.
    ///
    /// An empty expansion marks a root letter (`A`, `B`) that needs no
    /// further dealiasing. Registering an alias again replaces its expansion
    /// but keeps its position in table order.
    pub fn insert(&mut self, alias: &str, expansion: &str) {
        match self.expansions.insert(alias.to_string(), expansion.to_string()) {
            Some(previous) => {
                self.update_contraction(&previous);
                self.update_contraction(expansion);
            }
            None => {
                self.order.push(alias.to_string());
                if !expansion.is_empty() {
                    self.contractions.insert(expansion.to_string(), alias.to_string());
                }
            }
        }
    }

    /// Points the contraction of `expansion` at the last alias in table
    /// order that still expands to it.
    fn update_contraction(&mut self, expansion: &str) {
        if expansion.is_empty() {
            return;
        }
        let alias = self
            .order
            .iter()
            .rev()
            .find(|alias| self.expansions.get(*alias).is_some_and(|e| e == expansion));
        match alias {
            Some(alias) => {
                self.contractions.insert(expansion.to_string(), alias.clone());
            }
            None => {
                self.contractions.remove(expansion);
            }
        }
    }

    /// Registers a recombinant alias with its parent lineages.
    ///
    /// Recombinant aliases are kept for reference only; they neither
    /// expand nor contract.
    pub fn insert_recombinant(&mut self, alias: &str, parents: Vec<String>) {
        self.recombinants.insert(alias.to_string(), parents);
    }

    /// Returns the expansion of `alias`, or `None` if the token is unknown.
    ///
    /// Root letters expand to the empty string.
    pub fn expand(&self, alias: &str) -> Option<&str> {
        self.expansions.get(alias).map(|s| s.as_str())
    }

    /// Returns whether `alias` has an expansion.
    pub fn contains(&self, alias: &str) -> bool {
        self.expansions.contains_key(alias)
    }

    /// Returns the parent lineages of a recombinant alias.
    pub fn recombinant_parents(&self, alias: &str) -> Option<&[String]> {
        self.recombinants.get(alias).map(|p| p.as_slice())
    }

    /// Returns the number of (non-recombinant) aliases.
    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    /// Returns `true` if no alias is registered.
    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }

    /// Fully expands an aliased lineage name.
    ///
    /// The leading token is replaced by its expansion; trailing segments are
    /// kept. Names rooted at `A` or `B` are returned unchanged.
    ///
    /// # Returns
    /// `None` if the leading token is not a known alias
    pub fn dealias(&self, name: &str) -> Option<String> {
        let (token, trailing) = match name.split_once('.') {
            Some((token, trailing)) => (token, trailing),
            None => (name, ""),
        };
        let expansion = self.expand(token)?;

        Some(if expansion.is_empty() {
            name.to_string()
        } else if trailing.is_empty() {
            expansion.to_string()
        } else {
            format!("{expansion}.{trailing}")
        })
    }

    /// Re-aliases a dotted expansion by one alias level.
    ///
    /// The number of alias levels is `ceil((segments - 1) / 3)`: three
    /// numeric segments per level below the root letter. A name with at most
    /// one level needs no alias and is returned unchanged. Otherwise every
    /// level but the last, i.e. the first `(levels - 1) * 3 + 1` segments, is
    /// looked up among the expansions and replaced by its alias.
    ///
    /// # Arguments
    /// * `expanded` - Dotted segment sequence, e.g. `B.1.1.529.5.3.1`
    ///
    /// # Returns
    /// * The contracted name, e.g. `BA.5.3.1`
    /// * `None` if no alias expands to the leading levels, which usually
    ///   means the alias table is stale
    pub fn contract(&self, expanded: &str) -> Option<String> {
        let segments: Vec<&str> = expanded.split('.').collect();
        let levels = (segments.len() - 1).div_ceil(SEGMENTS_PER_LEVEL);
        if levels <= 1 {
            return Some(expanded.to_string());
        }

        let split_point = (levels - 1) * SEGMENTS_PER_LEVEL + 1;
        let prefix = segments[..split_point].join(".");
        let alias = self.contractions.get(&prefix)?;

        Some(format!("{}.{}", alias, segments[split_point..].join(".")))
    }
}
