use sublineage::alias::AliasRegistry;
use sublineage::builder::{TreeBuilder, build_from_lineage_list};
use sublineage::error::LineageError;
use sublineage::io::{LineageNotes, WithdrawnLineage};
use sublineage::model::LineageTree;
use tracing_subscriber::EnvFilter;

const ALIAS_KEY: &str = r#"{
    "A": "",
    "B": "",
    "AY": "B.1.617.2",
    "BA": "B.1.1.529",
    "BE": "B.1.1.529.5.3.1",
    "XBB": ["BJ.1", "BM.1.1.1"]
}"#;

const LINEAGES_IN_ORDER: &[&str] = &[
    "A", "A.1", "B", "B.1", "B.1.1", "B.1.1.1", "B.1.1.7", "LL.5", "B.1.1.529", "BA.1", "BA.1.1",
    "BA.5", "BA.5.3", "BA.5.3.1", "BE.1", "BE.1.1", "F.1", "B.1.617", "B.1.617.2", "AY.4", "XBB.1.5",
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn aliases() -> AliasRegistry {
    AliasRegistry::from_json(ALIAS_KEY).unwrap()
}

fn invalid_names(invalid: &[LineageError]) -> Vec<&str> {
    invalid.iter().map(|e| e.lineage()).collect()
}

fn assert_same_parents(a: &LineageTree, b: &LineageTree) {
    assert_eq!(a.len(), b.len());
    for name in a.lineage_names() {
        assert_eq!(a.parent_of(name), b.parent_of(name), "{name}");
    }
}

// ============= Lineage List Tests =============

#[test]
fn test_build_in_order() {
    init_tracing();
    let aliases = aliases();
    let (tree, invalid) = build_from_lineage_list(LINEAGES_IN_ORDER, &aliases);

    assert!(tree.is_valid());
    assert_eq!(tree.len(), 19);
    assert_eq!(tree.parent_of("A"), Some("root"));
    assert_eq!(tree.parent_of("B.1.1.7"), Some("B.1.1"));
    assert_eq!(tree.parent_of("BA.1"), Some("B.1.1.529"));
    assert_eq!(tree.parent_of("BE.1"), Some("BA.5.3.1"));
    assert_eq!(tree.parent_of("AY.4"), Some("B.1.617.2"));
    assert_eq!(invalid_names(&invalid), ["LL.5", "F.1", "XBB.1.5"]);
}

#[test]
fn test_build_out_of_order() {
    init_tracing();
    let aliases = aliases();
    let reversed: Vec<&str> = LINEAGES_IN_ORDER.iter().rev().copied().collect();

    let (expected, _) = build_from_lineage_list(LINEAGES_IN_ORDER, &aliases);
    let (tree, invalid) = build_from_lineage_list(&reversed, &aliases);

    assert!(tree.is_valid());
    assert_same_parents(&expected, &tree);
    assert_eq!(invalid_names(&invalid), ["XBB.1.5", "F.1", "LL.5"]);
}

#[test]
fn test_invalid_order_is_input_order() {
    let aliases = aliases();
    let shuffled = ["BA.1", "LL.5", "B.1.1.529", "B.1.1", "F.1", "B.1", "B"];
    let (tree, invalid) = build_from_lineage_list(shuffled, &aliases);

    assert_eq!(tree.len(), 6);
    assert_eq!(invalid_names(&invalid), ["LL.5", "F.1"]);
    assert!(matches!(invalid[0], LineageError::UnknownAlias { .. }));
}

#[test]
fn test_recombinants_are_invalid() {
    let aliases = aliases();
    let (tree, invalid) = build_from_lineage_list(["B", "XBB.1.5", "XA"], &aliases);

    assert_eq!(tree.len(), 2);
    assert_eq!(
        invalid,
        [
            LineageError::Recombinant("XBB.1.5".to_string()),
            LineageError::Recombinant("XA".to_string())
        ]
    );
}

#[test]
fn test_unresolvable_parent_terminates() {
    let aliases = aliases();
    let (tree, invalid) = build_from_lineage_list(["B.7.1.1", "B", "B.7.1", "B.1"], &aliases);

    assert_eq!(tree.lineage_names(), ["root", "B", "B.1"]);
    assert_eq!(
        invalid,
        [
            LineageError::UnresolvableParent {
                lineage: "B.7.1.1".to_string(),
                parent: "B.7.1".to_string()
            },
            LineageError::UnresolvableParent {
                lineage: "B.7.1".to_string(),
                parent: "B.7".to_string()
            }
        ]
    );
}

#[test]
fn test_pass_limit() {
    let aliases = aliases();
    let reversed = ["B.1.1.1", "B.1.1", "B.1", "B"];

    let mut unlimited = TreeBuilder::new(&aliases);
    assert!(unlimited.add_lineages(reversed).is_empty());
    assert_eq!(unlimited.tree().len(), 5);

    let mut limited = TreeBuilder::new(&aliases).with_pass_limit(2);
    let invalid = limited.add_lineages(reversed);
    assert_eq!(limited.tree().lineage_names(), ["root", "B", "B.1"]);
    assert_eq!(invalid_names(&invalid), ["B.1.1.1", "B.1.1"]);
    assert!(
        invalid
            .iter()
            .all(|e| matches!(e, LineageError::UnresolvableParent { .. }))
    );
}

#[test]
fn test_duplicates_are_skipped() {
    let aliases = aliases();
    let (tree, invalid) = build_from_lineage_list(["B", "B.1", "B.1", " B.1 ", ""], &aliases);

    assert!(invalid.is_empty());
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.children_of("B").unwrap(), ["B.1"]);
}

#[test]
fn test_malformed_single_segment() {
    let aliases = aliases();
    let (_, invalid) = build_from_lineage_list(["B", "Q"], &aliases);
    assert_eq!(invalid, [LineageError::MalformedName("Q".to_string())]);
}

#[test]
fn test_extend_existing_tree() {
    let aliases = aliases();
    let (tree, _) = build_from_lineage_list(["B", "B.1"], &aliases);

    let mut builder = TreeBuilder::from_tree(&aliases, tree);
    assert!(builder.add_lineages(["B.1.1", "B.1"]).is_empty());
    assert_eq!(builder.into_tree().parent_of("B.1.1"), Some("B.1"));
}

// ============= Withdrawn Lineage Tests =============

fn base_tree(aliases: &AliasRegistry) -> TreeBuilder<'_> {
    let mut builder = TreeBuilder::new(aliases);
    let invalid = builder.add_lineages(["B", "B.1", "B.1.1", "B.1.1.1", "B.1.2"]);
    assert!(invalid.is_empty());
    builder
}

#[test]
fn test_withdrawn_placed_by_note() {
    init_tracing();
    let aliases = aliases();
    let mut builder = base_tree(&aliases);

    let invalid = builder.add_withdrawn_lineages(&[WithdrawnLineage::new(
        "C.15",
        "Reclassified as B.1.1.1 descendant",
    )]);

    assert!(invalid.is_empty());
    assert_eq!(builder.tree().parent_of("C.15"), Some("B.1.1.1"));
}

#[test]
fn test_withdrawn_placed_by_name() {
    let aliases = aliases();
    let mut builder = base_tree(&aliases);

    let invalid = builder.add_withdrawn_lineages(&[WithdrawnLineage::new(
        "B.1.1.1.4",
        "Withdrawn: merged into B.1.2",
    )]);

    assert!(invalid.is_empty());
    assert_eq!(builder.tree().parent_of("B.1.1.1.4"), Some("B.1.1.1"));
}

#[test]
fn test_withdrawn_placed_next_to_absent_reference() {
    let aliases = aliases();
    let mut builder = base_tree(&aliases);

    let invalid = builder.add_withdrawn_lineages(&[WithdrawnLineage::new("Q.1", "Reassigned to B.1.1.8")]);

    assert!(invalid.is_empty());
    assert_eq!(builder.tree().parent_of("Q.1"), Some("B.1.1"));
}

#[test]
fn test_withdrawn_existing_is_skipped() {
    let aliases = aliases();
    let mut builder = base_tree(&aliases);

    let invalid = builder.add_withdrawn_lineages(&[WithdrawnLineage::new("B.1.2", "Withdrawn: B.1.1.1")]);

    assert!(invalid.is_empty());
    assert_eq!(builder.tree().parent_of("B.1.2"), Some("B.1"));
}

#[test]
fn test_withdrawn_without_reference() {
    let aliases = aliases();
    let mut builder = base_tree(&aliases);
    let before = builder.tree().len();

    let invalid = builder.add_withdrawn_lineages(&[
        WithdrawnLineage::new("Q.2", "Withdrawn, see issue"),
        WithdrawnLineage::new("Q.3", ""),
        WithdrawnLineage::new("Q.4", "Withdrawn: alias of GG.7.1"),
    ]);

    assert_eq!(
        invalid,
        [
            LineageError::NoReference("Q.2".to_string()),
            LineageError::NoReference("Q.3".to_string()),
            LineageError::MissingParent {
                lineage: "Q.4".to_string(),
                parent: "GG.7".to_string()
            }
        ]
    );
    assert_eq!(builder.tree().len(), before);
}

#[test]
fn test_withdrawn_from_lineage_notes() {
    let aliases = aliases();
    let notes = LineageNotes::parse(
        "Lineage\tDescription\n\
         B\tRoot\n\
         B.1\tEurope\n\
         B.1.1\tEurope\n\
         B.1.1.1\tEurope\n\
         *C.15\tReclassified as B.1.1.1 descendant\n\
         *B.1.5 Withdrawn: reclassified as B.1.1\n",
    );

    let mut builder = TreeBuilder::new(&aliases);
    assert!(builder.add_lineages(notes.lineages()).is_empty());
    assert!(builder.add_withdrawn_lineages(notes.withdrawn()).is_empty());

    let tree = builder.into_tree();
    assert_eq!(tree.parent_of("C.15"), Some("B.1.1.1"));
    assert_eq!(tree.parent_of("B.1.5"), Some("B.1"));
    assert!(tree.is_valid());
}
