//! Folding of signature clusters into a collapse map.
//!
//! Lineages that share a mutation signature cannot be told apart, so they
//! are reported together under one cluster label
//! `<ancestor>_Sublineages_Like_<similar>`:
//! * `<similar>` is the alphabetically first member of the group most of the
//!   cluster belongs to
//! * `<ancestor>` is the closest common ancestor of the whole cluster
//!
//! The cluster label becomes a member of that majority group, and a new
//! group named by the label holds the cluster lineages.

use crate::barcode::SignatureCluster;
use crate::collapse::{CollapseLabels, CollapseMap};
use crate::model::{LineageTree, ROOT_LINEAGE};
use tracing::{debug, warn};

/// Outcome of folding one signature cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedCluster {
    /// Cluster label, also the label of the new cluster group
    pub label: String,
    /// Group the cluster label was added to
    pub destination: String,
    /// Representative lineage named in the label
    pub similar_to: String,
    /// Ancestor as rendered in the label
    pub ancestor: String,
    /// Cluster lineages
    pub lineages: Vec<String>,
}

/// Folds every ambiguous cluster into `map`, in cluster order.
///
/// For each cluster:
/// 1. Members are tallied by the first group containing them; the group with
///    most members wins, ties going to the group encountered first.
/// 2. With no member in any group, the cluster goes to the unknown group and
///    its representative is the first member of the whole cluster.
/// 3. The label is appended to the winning group (created if missing), the
///    members are removed from all groups and a group named by the label is
///    added with exactly the cluster members.
///
/// Clusters of a single lineage are left alone.
///
/// # Returns
/// One [FoldedCluster] per folded cluster
pub fn fold_signature_clusters(
    map: &mut CollapseMap,
    tree: &LineageTree,
    clusters: &[SignatureCluster],
    labels: &CollapseLabels,
) -> Vec<FoldedCluster> {
    clusters
        .iter()
        .filter(|cluster| cluster.is_ambiguous())
        .filter_map(|cluster| fold_cluster(map, tree, cluster, labels))
        .collect()
}

fn fold_cluster(
    map: &mut CollapseMap,
    tree: &LineageTree,
    cluster: &SignatureCluster,
    labels: &CollapseLabels,
) -> Option<FoldedCluster> {
    let lineages = cluster.lineages();

    let (destination, similar_to) = match majority_group(map, lineages) {
        Some((group, members)) => (group, members.into_iter().min()?.to_string()),
        None => {
            let similar_to = lineages.iter().min()?.clone();
            warn!(cluster = %similar_to, "no cluster lineage belongs to a group");
            (labels.unknown.clone(), similar_to)
        }
    };

    let ancestor = match tree.common_ancestor_of_many(lineages) {
        Some(ROOT_LINEAGE) => labels.mixed_root.clone(),
        Some(ancestor) => ancestor.to_string(),
        None => labels.no_ancestor.clone(),
    };

    let label = format!("{}{}{}", ancestor, labels.cluster_infix, similar_to);
    debug!(label = %label, destination = %destination, size = lineages.len(), "folding signature cluster");

    map.push_member(&destination, &label);
    map.remove_lineages(lineages);
    map.insert_group(&label, lineages);

    Some(FoldedCluster {
        label,
        destination,
        similar_to,
        ancestor,
        lineages: lineages.to_vec(),
    })
}

/// Group holding most cluster lineages, with those lineages.
fn majority_group<'a>(map: &CollapseMap, lineages: &'a [String]) -> Option<(String, Vec<&'a str>)> {
    let mut tallies: Vec<(&str, Vec<&'a str>)> = Vec::new();
    for lineage in lineages {
        let Some(group) = map.group_of(lineage) else {
            continue;
        };
        match tallies.iter_mut().find(|(label, _)| *label == group) {
            Some((_, members)) => members.push(lineage.as_str()),
            None => tallies.push((group, vec![lineage.as_str()])),
        }
    }

    let mut best: Option<(&str, Vec<&'a str>)> = None;
    for (group, members) in tallies {
        if best.as_ref().is_none_or(|(_, most)| members.len() > most.len()) {
            best = Some((group, members));
        }
    }
    best.map(|(group, members)| (group.to_string(), members))
}
