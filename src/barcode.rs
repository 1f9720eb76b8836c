//! Barcode helpers: the observed lineage universe and mutation signatures.
//!
//! A barcode table lists, per lineage, the mutations that characterize it
//! (`A21563T`: reference base, genome position, alternative base). This
//! module prepares its row labels as lineage universe and finds lineages
//! that become indistinguishable once only one genomic region is looked at.

use crate::alias::is_recombinant;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Placeholder lineages such as `proposed123`.
static PROPOSED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"proposed\d+").expect("proposed pattern is a valid regex"));

/// Prefix of miscellaneous barcode rows.
const MISC_MARKER: &str = "misc";

// =#========================================================================#=
// UNIVERSE
// =#========================================================================€=
/// Prepares barcode row labels as lineage universe.
///
/// Drops placeholder (`proposed<digits>`), miscellaneous (`misc...`) and
/// recombinant (`X...`) labels, removes spaces and drops repeated labels.
/// The remaining labels keep their order.
///
/// # Example
/// ```
/// use sublineage::barcode::filter_universe;
///
/// let universe = filter_universe(["BA.1", "proposed42", "XBB.1.5", "misc_BA.2", "BA.2 .75", "BA.1"]);
/// assert_eq!(universe, ["BA.1", "BA.2.75"]);
/// ```
pub fn filter_universe<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| {
            let label = label.as_ref();
            !PROPOSED_PATTERN.is_match(label) && !label.contains(MISC_MARKER) && !is_recombinant(label)
        })
        .map(|label| label.as_ref().replace(' ', ""))
        .filter(|label| !label.is_empty() && seen.insert(label.clone()))
        .collect()
}

// =#========================================================================#=
// MUTATIONS
// =#========================================================================€=
/// Closed interval of genome positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomeRegion {
    pub start: u32,
    pub end: u32,
}

impl GenomeRegion {
    /// Spike (S) gene of the SARS-CoV-2 reference genome.
    pub const S_GENE: GenomeRegion = GenomeRegion {
        start: 21563,
        end: 25384,
    };

    pub fn new(start: u32, end: u32) -> Self {
        GenomeRegion { start, end }
    }

    /// Returns `true` if `position` lies within the region, bounds included.
    pub fn contains(&self, position: u32) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Returns the genome position of a mutation written `<ref><pos><alt>`.
///
/// # Example
/// ```
/// use sublineage::barcode::mutation_position;
///
/// assert_eq!(mutation_position("A21563T"), Some(21563));
/// assert_eq!(mutation_position("A-T"), None);
/// ```
pub fn mutation_position(mutation: &str) -> Option<u32> {
    let mut chars = mutation.chars();
    chars.next()?;
    chars.next_back()?;
    chars.as_str().parse().ok()
}

/// Mutations observed for one barcode row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationProfile {
    label: String,
    mutations: Vec<String>,
}

impl MutationProfile {
    pub fn new<I, S>(label: &str, mutations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        MutationProfile {
            label: label.to_string(),
            mutations: mutations.into_iter().map(|m| m.as_ref().to_string()).collect(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mutations(&self) -> &[String] {
        &self.mutations
    }

    /// Mutation set independent of order and repetition.
    fn signature(&self) -> Vec<String> {
        let mut signature = self.mutations.clone();
        signature.sort();
        signature.dedup();
        signature
    }
}

/// Keeps only the mutations within `region`.
///
/// Mutations without readable position are dropped as well.
pub fn restrict_to_region(profiles: &[MutationProfile], region: GenomeRegion) -> Vec<MutationProfile> {
    profiles
        .iter()
        .map(|profile| MutationProfile {
            label: profile.label.clone(),
            mutations: profile
                .mutations
                .iter()
                .filter(|m| mutation_position(m).is_some_and(|position| region.contains(position)))
                .cloned()
                .collect(),
        })
        .collect()
}

// =#========================================================================#=
// SIGNATURE CLUSTERS
// =#========================================================================$=
/// Lineages sharing one mutation signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCluster {
    lineages: Vec<String>,
    mutations: Vec<String>,
}

impl SignatureCluster {
    /// Creates a cluster from its lineages; the signature is left empty.
    pub fn new<I, S>(lineages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SignatureCluster {
            lineages: lineages.into_iter().map(|l| l.as_ref().to_string()).collect(),
            mutations: Vec::new(),
        }
    }

    /// Lineages in order of first appearance.
    pub fn lineages(&self) -> &[String] {
        &self.lineages
    }

    /// Shared mutations, sorted.
    pub fn mutations(&self) -> &[String] {
        &self.mutations
    }

    /// Returns `true` if the signature cannot tell several lineages apart.
    pub fn is_ambiguous(&self) -> bool {
        self.lineages.len() > 1
    }
}

/// Groups profiles with identical mutation sets.
///
/// Clusters are returned in order of their first profile; lineages within a
/// cluster keep the profile order.
///
/// # Example
/// ```
/// use sublineage::barcode::{MutationProfile, cluster_identical_profiles};
///
/// let profiles = [
///     MutationProfile::new("BA.1", ["C22674T", "A22786C"]),
///     MutationProfile::new("BA.2", ["C22674T"]),
///     MutationProfile::new("BA.1.1", ["A22786C", "C22674T"]),
/// ];
/// let clusters = cluster_identical_profiles(&profiles);
///
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0].lineages(), ["BA.1", "BA.1.1"]);
/// assert!(!clusters[1].is_ambiguous());
/// ```
pub fn cluster_identical_profiles(profiles: &[MutationProfile]) -> Vec<SignatureCluster> {
    let mut clusters: Vec<SignatureCluster> = Vec::new();
    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();

    for profile in profiles {
        let signature = profile.signature();
        match positions.get(&signature) {
            Some(&position) => clusters[position].lineages.push(profile.label.clone()),
            None => {
                positions.insert(signature.clone(), clusters.len());
                clusters.push(SignatureCluster {
                    lineages: vec![profile.label.clone()],
                    mutations: signature,
                });
            }
        }
    }

    clusters
}
