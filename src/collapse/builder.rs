//! Builder assembling a [CollapseMap] from a tree and group definitions.

use crate::alias::embedded_lineage;
use crate::barcode::SignatureCluster;
use crate::collapse::signature::{FoldedCluster, fold_signature_clusters};
use crate::collapse::{CollapseLabels, CollapseMap};
use crate::io::GroupDefinitions;
use crate::model::LineageTree;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Configures and assembles a [CollapseMap].
///
/// # Example
/// ```
/// use sublineage::collapse::CollapseMapBuilder;
/// use sublineage::io::GroupDefinitions;
/// use sublineage::model::LineageTree;
///
/// let mut tree = LineageTree::new();
/// tree.insert("B", "root").unwrap();
/// tree.insert("B.1", "B").unwrap();
/// tree.insert("B.1.1", "B.1").unwrap();
/// tree.insert("B.1.1.1", "B.1.1").unwrap();
///
/// let definitions = GroupDefinitions::new()
///     .with_group("G1", ["B.1"])
///     .with_group("G2", ["B.1.1"]);
///
/// let map = CollapseMapBuilder::new(&tree, &definitions)
///     .with_universe(["B.1.1.1_dropout", "Q.9"])
///     .build();
///
/// assert_eq!(map.members("G1").unwrap(), ["B.1"]);
/// assert_eq!(map.members("G2").unwrap(), ["B.1.1.1", "B.1.1", "B.1.1.1_dropout"]);
/// assert_eq!(map.members("Not a VOC").unwrap(), ["root", "B"]);
/// assert_eq!(map.members("Unknown").unwrap(), ["Q.9"]);
/// ```
#[derive(Debug)]
pub struct CollapseMapBuilder<'a> {
    tree: &'a LineageTree,
    definitions: &'a GroupDefinitions,
    universe: Vec<String>,
    clusters: Vec<SignatureCluster>,
    labels: CollapseLabels,
}

// ============================================================================
// New, Configuration (pub)
// ============================================================================
impl<'a> CollapseMapBuilder<'a> {
    /// Creates a builder with empty universe, no signature clusters and
    /// default labels.
    pub fn new(tree: &'a LineageTree, definitions: &'a GroupDefinitions) -> Self {
        CollapseMapBuilder {
            tree,
            definitions,
            universe: Vec::new(),
            clusters: Vec::new(),
            labels: CollapseLabels::default(),
        }
    }

    /// Sets the observed lineage names (e.g. barcode row labels); names not
    /// in the tree are classified by name.
    pub fn with_universe<I, S>(mut self, universe: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.universe = universe.into_iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Sets clusters of lineages with identical mutation signature to fold
    /// into cluster groups after the map is assembled.
    pub fn with_signature_clusters(mut self, clusters: Vec<SignatureCluster>) -> Self {
        self.clusters = clusters;
        self
    }

    /// Replaces the reserved labels.
    pub fn with_labels(mut self, labels: CollapseLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Assembles the collapse map.
    pub fn build(self) -> CollapseMap {
        self.build_with_report().0
    }

    /// Assembles the collapse map and reports the folded signature clusters.
    pub fn build_with_report(self) -> (CollapseMap, Vec<FoldedCluster>) {
        let memberships = self.seed_memberships();
        let mut map = self.assemble_groups(&memberships);
        self.collect_unclaimed(&mut map);
        self.classify_universe(&mut map);

        let folded = fold_signature_clusters(&mut map, self.tree, &self.clusters, &self.labels);

        info!(
            groups = map.len(),
            folded = folded.len(),
            "built collapse map"
        );
        (map, folded)
    }
}

// ============================================================================
// Steps (private)
// ============================================================================
impl<'a> CollapseMapBuilder<'a> {
    /// Membership of every distinct seed: its descendants in pre-order, then
    /// the seed itself. Seeds nested below other seeds are removed from the
    /// outer memberships, using the unpruned memberships for all checks.
    fn seed_memberships(&self) -> HashMap<String, Vec<String>> {
        let mut seeds: Vec<&str> = Vec::new();
        let mut memberships: HashMap<String, Vec<String>> = HashMap::new();

        for (_, group_seeds) in self.definitions.iter() {
            for seed in group_seeds {
                if memberships.contains_key(seed) {
                    continue;
                }
                let mut membership: Vec<String> = self
                    .tree
                    .descendants(seed)
                    .unwrap_or_default()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                membership.push(seed.clone());

                seeds.push(seed);
                memberships.insert(seed.clone(), membership);
            }
        }

        let removals: Vec<(&str, HashSet<String>)> = {
            let snapshot: HashMap<&str, HashSet<&str>> = memberships
                .iter()
                .map(|(seed, membership)| {
                    (seed.as_str(), membership.iter().map(|m| m.as_str()).collect())
                })
                .collect();

            seeds
                .iter()
                .filter_map(|&outer| {
                    let removed: HashSet<String> = seeds
                        .iter()
                        .filter(|&&inner| inner != outer && snapshot[outer].contains(inner))
                        .flat_map(|&inner| snapshot[inner].iter().map(|m| m.to_string()))
                        .collect();
                    (!removed.is_empty()).then_some((outer, removed))
                })
                .collect()
        };

        for (outer, removed) in removals {
            if let Some(membership) = memberships.get_mut(outer) {
                membership.retain(|m| !removed.contains(m));
                debug!(seed = outer, removed = removed.len(), "pruned nested seeds");
            }
        }

        memberships
    }

    /// One group per definition, members concatenated over its seeds.
    ///
    /// A seed declared by several groups belongs to the first of them only.
    fn assemble_groups(&self, memberships: &HashMap<String, Vec<String>>) -> CollapseMap {
        let mut map = CollapseMap::new();
        let mut owners: HashMap<&str, &str> = HashMap::new();

        for (label, seeds) in self.definitions.iter() {
            let mut members: Vec<&String> = Vec::new();
            for seed in seeds {
                let owner = *owners.entry(seed.as_str()).or_insert(label);
                if owner != label {
                    warn!(seed = %seed, group = label, owner, "seed already claimed by an earlier group");
                    continue;
                }
                members.extend(memberships.get(seed.as_str()).into_iter().flatten());
            }
            map.insert_group(label, members);
        }
        map
    }

    /// Tree lineages claimed by no group go to the catch-all group.
    fn collect_unclaimed(&self, map: &mut CollapseMap) {
        let claimed: HashSet<String> = map
            .iter()
            .flat_map(|group| group.members().iter().cloned())
            .collect();

        let unclaimed: Vec<&str> = self
            .tree
            .lineage_names()
            .into_iter()
            .filter(|lineage| !claimed.contains(*lineage))
            .collect();

        let label = self.labels.not_a_voc.as_str();
        if !map.contains_group(label) {
            map.insert_group(label, Vec::<&str>::new());
        }
        for lineage in unclaimed {
            map.push_member(label, lineage);
        }
    }

    /// Observed names not in the tree join the group of the lineage embedded
    /// in their name, otherwise the unknown group.
    fn classify_universe(&self, map: &mut CollapseMap) {
        let owners: HashMap<String, String> = map
            .iter()
            .rev()
            .flat_map(|group| {
                group
                    .members()
                    .iter()
                    .map(|member| (member.clone(), group.label().to_string()))
            })
            .collect();

        let mut unknown = Vec::new();
        for name in &self.universe {
            if self.tree.contains(name) || owners.contains_key(name) {
                continue;
            }

            match embedded_lineage(name).and_then(|lineage| owners.get(lineage)) {
                Some(group) => {
                    debug!(lineage = %name, group = %group, "classified lineage by embedded name");
                    map.push_member(group, name);
                }
                None => unknown.push(name.as_str()),
            }
        }

        if !unknown.is_empty() {
            info!(count = unknown.len(), "unclassified lineages in universe");
            for name in unknown {
                map.push_member(&self.labels.unknown, name);
            }
        }
    }
}
