//! External clade schema and its mapping onto lineages.
//!
//! Clades come as a nested record tree. Each clade name may carry an
//! annotation in brackets whose last token is the equivalent lineage:
//!
//! | Clade name | Label | Parent lineage |
//! |------------|-------|----------------|
//! | `20C` | `20C` | none (parent clade) |
//! | `21J (Delta)` | `21J(Delta)` | none (parent clade) |
//! | `20I (Alpha, V1)` | `20I(Alpha)` | `V1` if in tree |
//! | `21K (Omicron, ~BA.1)` | `21K(Omicron)` | `BA.1` if in tree |
//! | `21L (BA.2)` | `21L` | `BA.2` if in tree |

use crate::error::{Error, Result};
use crate::model::LineageTree;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::sync::LazyLock;
use tracing::warn;

/// `<2 digits><word char>` optionally followed by ` (<info>)`.
static CLADE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d\d\w) ?(?:\((.*)\))?").expect("clade pattern is a valid regex")
});

/// A clade record of the external clade schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CladeNode {
    /// Clade name, e.g. `21K (Omicron, BA.1)`
    pub name: String,
    /// Child clades
    #[serde(default)]
    pub children: Vec<CladeNode>,
}

impl CladeNode {
    /// Creates a clade without children.
    pub fn new(name: &str) -> Self {
        CladeNode {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    /// Adds a child clade, builder style.
    pub fn with_child(mut self, child: CladeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Parses a clade schema from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a clade schema in JSON representation from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Splits a clade name into its label and the lineage it refers to.
///
/// `~` characters are removed from the annotation, and a `/`-joined
/// secondary lineage in the reference is dropped. A reference that is not
/// in `tree` yields `None`.
///
/// # Returns
/// * `(label, reference)`
/// * [Error::MalformedClade] if the name does not start with two digits and
///   a word character
pub fn parse_clade_name(tree: &LineageTree, clade: &str) -> Result<(String, Option<String>)> {
    let captures = CLADE_PATTERN
        .captures(clade)
        .ok_or_else(|| Error::MalformedClade(clade.to_string()))?;
    let number = &captures[1];

    let Some(info) = captures.get(2) else {
        return Ok((number.to_string(), None));
    };

    let info = info.as_str().replace('~', "");
    let tokens: Vec<&str> = info.split(", ").collect();

    let (label, reference) = match tokens.as_slice() {
        [single] if tree.contains(single) => (number.to_string(), *single),
        [single] => return Ok((format!("{number}({single})"), None)),
        [annotation @ .., last] => (format!("{}({})", number, annotation.join(",")), *last),
        [] => return Ok((number.to_string(), None)),
    };

    let reference = reference.split('/').next().unwrap_or(reference);
    if tree.contains(reference) {
        Ok((label, Some(reference.to_string())))
    } else {
        warn!(clade, reference, "clade reference is not in the lineage tree");
        Ok((label, None))
    }
}

// =#========================================================================#=
// CLADE RELATIONSHIPS
// =#========================================================================€=
/// Ordered mapping from clade label to its parent (lineage or clade label).
///
/// Descendants come before their ancestors, as the schema is flattened
/// bottom-up. `None` marks a clade without parent, i.e. the schema root
/// when its name carries no lineage reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CladeRelationships {
    entries: Vec<(String, Option<String>)>,
    positions: HashMap<String, usize>,
}

impl CladeRelationships {
    /// Returns the parent of `label`; the outer `None` means unknown label.
    pub fn get(&self, label: &str) -> Option<Option<&str>> {
        self.positions
            .get(label)
            .map(|&position| self.entries[position].1.as_deref())
    }

    /// Iterates over `(label, parent)` in flattening order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(label, parent)| (label.as_str(), parent.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets the parent of `label`; an existing label keeps its position.
    fn insert(&mut self, label: String, parent: Option<String>) {
        match self.positions.get(&label) {
            Some(&position) => self.entries[position].1 = parent,
            None => {
                self.positions.insert(label.clone(), self.entries.len());
                self.entries.push((label, parent));
            }
        }
    }
}

/// Flattens the clade schema below (and including) `clade` into
/// parent relationships.
///
/// Children are processed first. Every child clade still without parent
/// after its own subtree was processed is attached to the corrected label
/// of `clade`; then `clade` itself is added with its lineage reference.
///
/// # Returns
/// * The relationships in bottom-up order
/// * [Error::MalformedClade] for the first clade name that does not parse
pub fn clade_relationships(tree: &LineageTree, clade: &CladeNode) -> Result<CladeRelationships> {
    let (label, reference) = parse_clade_name(tree, &clade.name)?;

    let mut relationships = CladeRelationships::default();
    for child in &clade.children {
        let child_relationships = clade_relationships(tree, child)?;
        for (child_label, parent) in child_relationships.entries {
            relationships.insert(child_label, parent);
        }
    }

    for (_, parent) in relationships.entries.iter_mut() {
        if parent.is_none() {
            *parent = Some(label.clone());
        }
    }
    relationships.insert(label, reference);

    Ok(relationships)
}
