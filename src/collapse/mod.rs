//! Collapse maps: many fine-grained lineages folded into few groups.
//!
//! A [CollapseMap] assigns every lineage of a tree (and of an observed
//! lineage universe) to one reporting group. It is assembled by the
//! [CollapseMapBuilder] from user [GroupDefinitions](crate::io::GroupDefinitions):
//! 1. Each seed lineage claims its whole subtree.
//! 2. A seed nested below another seed takes its subtree back from the outer one.
//! 3. Unclaimed tree lineages go to the catch-all group (`Not a VOC`).
//! 4. Observed names not in the tree join the group of the lineage embedded
//!    in their name (`BA.2.75_dropout` joins the group of `BA.2.75`), or the
//!    unknown group.
//! 5. Optionally, clusters of lineages with identical mutation signature are
//!    folded into a named cluster group (see [signature]).
//!
//! Groups and members keep their insertion order, so the same inputs always
//! produce the same map.

pub mod builder;
pub mod signature;

pub use builder::CollapseMapBuilder;
pub use signature::{FoldedCluster, fold_signature_clusters};

use std::collections::{HashMap, HashSet};

/// Catch-all group for tree lineages no group claims.
pub const NOT_A_VOC: &str = "Not a VOC";
/// Group for observed names that cannot be classified.
pub const UNKNOWN: &str = "Unknown";

/// Reserved labels used while building a collapse map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseLabels {
    /// Catch-all group for unclaimed tree lineages
    pub not_a_voc: String,
    /// Group for unclassifiable names and clusters
    pub unknown: String,
    /// Cluster ancestor label when the common ancestor is the tree root
    pub mixed_root: String,
    /// Cluster ancestor label when no cluster member is in the tree
    pub no_ancestor: String,
    /// Infix between ancestor and similar-to lineage in cluster labels
    pub cluster_infix: String,
}

impl Default for CollapseLabels {
    fn default() -> Self {
        CollapseLabels {
            not_a_voc: NOT_A_VOC.to_string(),
            unknown: UNKNOWN.to_string(),
            mixed_root: "B/A".to_string(),
            no_ancestor: UNKNOWN.to_string(),
            cluster_infix: "_Sublineages_Like_".to_string(),
        }
    }
}

/// A labelled, ordered and duplicate-free set of lineage names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseGroup {
    label: String,
    members: Vec<String>,
    /// Same names as `members`, for constant-time lookup
    lookup: HashSet<String>,
}

impl CollapseGroup {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, lineage: &str) -> bool {
        self.lookup.contains(lineage)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn new(label: &str) -> Self {
        CollapseGroup {
            label: label.to_string(),
            members: Vec::new(),
            lookup: HashSet::new(),
        }
    }

    fn push(&mut self, lineage: &str) {
        if self.lookup.insert(lineage.to_string()) {
            self.members.push(lineage.to_string());
        }
    }

    fn clear(&mut self) {
        self.members.clear();
        self.lookup.clear();
    }

    fn remove_all(&mut self, lineages: &HashSet<&str>) {
        self.members.retain(|m| !lineages.contains(m.as_str()));
        self.lookup.retain(|m| !lineages.contains(m.as_str()));
    }
}

// =#========================================================================#=
// COLLAPSE MAP
// =#========================================================================€=
/// Ordered mapping from group label to its member lineages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseMap {
    groups: Vec<CollapseGroup>,
    positions: HashMap<String, usize>,
}

// ============================================================================
// New, Getters (pub)
// ============================================================================
impl CollapseMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the group with this label.
    pub fn group(&self, label: &str) -> Option<&CollapseGroup> {
        self.positions.get(label).map(|&position| &self.groups[position])
    }

    /// Returns the members of the group with this label.
    pub fn members(&self, label: &str) -> Option<&[String]> {
        self.group(label).map(|group| group.members())
    }

    /// Returns whether a group with this label exists (possibly empty).
    pub fn contains_group(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    /// Returns all group labels in insertion order.
    pub fn labels(&self) -> Vec<&str> {
        self.groups.iter().map(|group| group.label()).collect()
    }

    /// Iterates over the groups in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CollapseGroup> {
        self.groups.iter()
    }

    /// Returns the number of groups, empty ones included.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the label of the first group that has `lineage` as member.
    pub fn group_of(&self, lineage: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|group| group.contains(lineage))
            .map(|group| group.label())
    }
}

impl<'a> IntoIterator for &'a CollapseMap {
    type Item = &'a CollapseGroup;
    type IntoIter = std::slice::Iter<'a, CollapseGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

// ============================================================================
// Mutation (pub)
// ============================================================================
impl CollapseMap {
    /// Sets the members of a group, replacing previous members.
    ///
    /// A new group is appended; an existing group keeps its position.
    /// Duplicate members are dropped.
    pub fn insert_group<I, S>(&mut self, label: &str, members: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let position = self.position_or_insert(label);
        let group = &mut self.groups[position];
        group.clear();
        for member in members {
            group.push(member.as_ref());
        }
    }

    /// Appends `lineage` to a group, creating the group if needed.
    ///
    /// Nothing happens if the group already has this member.
    pub fn push_member(&mut self, label: &str, lineage: &str) {
        let position = self.position_or_insert(label);
        self.groups[position].push(lineage);
    }

    /// Removes every given lineage from every group. Groups stay, even if
    /// they become empty.
    pub fn remove_lineages<S: AsRef<str>>(&mut self, lineages: &[S]) {
        let lineages: HashSet<&str> = lineages.iter().map(|l| l.as_ref()).collect();
        for group in self.groups.iter_mut() {
            group.remove_all(&lineages);
        }
    }

    fn position_or_insert(&mut self, label: &str) -> usize {
        if let Some(&position) = self.positions.get(label) {
            return position;
        }
        let position = self.groups.len();
        self.positions.insert(label.to_string(), position);
        self.groups.push(CollapseGroup::new(label));
        position
    }
}

// ============================================================================
// Classification (pub)
// ============================================================================
impl CollapseMap {
    /// Returns the final group of a lineage or group label.
    ///
    /// Membership is followed upward: a lineage belongs to a group, which
    /// may itself be a member of another group (cluster labels are members
    /// of their majority group), until a label is reached that is no member
    /// of any group. A group label that is no member resolves to itself.
    ///
    /// A name unknown to the map that looks like a cluster label
    /// (`<ancestor>_Sublineages_Like_<similar>`) is classified by its
    /// similar-to lineage, then by its ancestor. This keeps labels from an
    /// older map working after the cluster was renamed or its first lineage
    /// withdrawn.
    ///
    /// # Returns
    /// `None` if the name cannot be classified
    ///
    /// # Example
    /// ```
    /// use sublineage::collapse::CollapseMap;
    ///
    /// let mut map = CollapseMap::new();
    /// map.insert_group("Omicron", ["BA.1", "BA.1_Sublineages_Like_BA.1.1"]);
    /// map.insert_group("BA.1_Sublineages_Like_BA.1.1", ["BA.1.1", "BA.1.2"]);
    ///
    /// assert_eq!(map.find_group("BA.1.2"), Some("Omicron"));
    /// assert_eq!(map.find_group("BA.1_Sublineages_Like_BA.1.15"), Some("Omicron"));
    /// assert_eq!(map.find_group("AY.4"), None);
    /// ```
    pub fn find_group(&self, name: &str) -> Option<&str> {
        if let Some(group) = self.final_group(name) {
            return Some(group);
        }

        let parts: Vec<&str> = name.split('_').collect();
        match parts.as_slice() {
            [ancestor, .., similar] => self
                .final_group(similar)
                .or_else(|| self.final_group(ancestor)),
            _ => None,
        }
    }

    fn final_group(&self, name: &str) -> Option<&str> {
        let Some(mut group) = self.group_of(name) else {
            return self.group(name).map(|group| group.label());
        };

        let mut visited = HashSet::new();
        visited.insert(group);
        while let Some(next) = self.group_of(group) {
            if !visited.insert(next) {
                break;
            }
            group = next;
        }
        Some(group)
    }
}
