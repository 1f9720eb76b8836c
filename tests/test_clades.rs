use sublineage::alias::AliasRegistry;
use sublineage::builder::{CladeNode, TreeBuilder, clade_relationships, parse_clade_name};
use sublineage::error::Error;
use sublineage::model::LineageTree;

const CLADES_JSON: &str = r#"{
    "name": "19A",
    "children": [
        {
            "name": "20A",
            "children": [
                {
                    "name": "20B",
                    "children": [
                        { "name": "20I (Alpha, V1)", "children": [] },
                        { "name": "21K (Omicron, ~BA.1)" }
                    ]
                }
            ]
        },
        { "name": "19B" }
    ]
}"#;

fn sample_tree() -> LineageTree {
    let aliases = AliasRegistry::from_json(r#"{"A": "", "B": "", "BA": "B.1.1.529"}"#).unwrap();
    let mut builder = TreeBuilder::new(&aliases);
    let invalid = builder.add_lineages(["B", "B.1", "B.1.1", "B.1.1.7", "B.1.1.529", "BA.1", "BA.2"]);
    assert!(invalid.is_empty());
    builder.into_tree()
}

// ============= Clade Name Tests =============

#[test]
fn test_clade_without_annotation() {
    let tree = sample_tree();
    assert_eq!(parse_clade_name(&tree, "20C").unwrap(), ("20C".to_string(), None));
}

#[test]
fn test_clade_with_free_text() {
    let tree = sample_tree();
    assert_eq!(
        parse_clade_name(&tree, "21J (Delta)").unwrap(),
        ("21J(Delta)".to_string(), None)
    );
}

#[test]
fn test_clade_with_single_lineage() {
    let tree = sample_tree();
    assert_eq!(
        parse_clade_name(&tree, "21L (BA.2)").unwrap(),
        ("21L".to_string(), Some("BA.2".to_string()))
    );
}

#[test]
fn test_clade_with_annotated_lineage() {
    let tree = sample_tree();
    assert_eq!(
        parse_clade_name(&tree, "21K (Omicron, ~BA.1)").unwrap(),
        ("21K(Omicron)".to_string(), Some("BA.1".to_string()))
    );
    assert_eq!(
        parse_clade_name(&tree, "20I (Alpha, V1, B.1.1.7/Q.1)").unwrap(),
        ("20I(Alpha,V1)".to_string(), Some("B.1.1.7".to_string()))
    );
}

#[test]
fn test_clade_reference_absent_from_tree() {
    let tree = sample_tree();
    assert_eq!(
        parse_clade_name(&tree, "20I (Alpha, V1)").unwrap(),
        ("20I(Alpha)".to_string(), None)
    );
}

#[test]
fn test_malformed_clade_name() {
    let tree = sample_tree();
    let result = parse_clade_name(&tree, "Omicron (BA.1)");
    assert!(matches!(result, Err(Error::MalformedClade(name)) if name == "Omicron (BA.1)"));
}

// ============= Clade Schema Tests =============

#[test]
fn test_clade_schema_from_json() {
    let root = CladeNode::from_json(CLADES_JSON).unwrap();
    assert_eq!(root.name, "19A");
    assert_eq!(root.children.len(), 2);
    assert!(root.children[1].children.is_empty());

    let from_reader = CladeNode::from_reader(CLADES_JSON.as_bytes()).unwrap();
    assert_eq!(root, from_reader);
}

#[test]
fn test_clade_schema_missing_name() {
    let result = CladeNode::from_json(r#"{"children": []}"#);
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn test_clade_relationships() {
    let tree = sample_tree();
    let root = CladeNode::from_json(CLADES_JSON).unwrap();
    let relationships = clade_relationships(&tree, &root).unwrap();

    let entries: Vec<(&str, Option<&str>)> = relationships.iter().collect();
    assert_eq!(
        entries,
        [
            ("20I(Alpha)", Some("20B")),
            ("21K(Omicron)", Some("BA.1")),
            ("20B", Some("20A")),
            ("20A", Some("19A")),
            ("19B", Some("19A")),
            ("19A", None),
        ]
    );
    assert_eq!(relationships.get("20B"), Some(Some("20A")));
    assert_eq!(relationships.get("19A"), Some(None));
    assert_eq!(relationships.get("20C"), None);
    assert_eq!(relationships.len(), 6);
}

#[test]
fn test_clade_relationships_malformed_child() {
    let tree = sample_tree();
    let root = CladeNode::new("19A").with_child(CladeNode::new("20A").with_child(CladeNode::new("Delta")));
    assert!(matches!(
        clade_relationships(&tree, &root),
        Err(Error::MalformedClade(_))
    ));
}

// ============= Clade Placement Tests =============

#[test]
fn test_add_clades() {
    let aliases = AliasRegistry::new();
    let root = CladeNode::from_json(CLADES_JSON).unwrap();

    let mut builder = TreeBuilder::from_tree(&aliases, sample_tree());
    let unplaced = builder.add_clades(&root).unwrap();
    let tree = builder.into_tree();

    assert!(unplaced.is_empty());
    assert_eq!(tree.parent_of("19A"), Some("root"));
    assert_eq!(tree.parent_of("20A"), Some("19A"));
    assert_eq!(tree.parent_of("20I(Alpha)"), Some("20B"));
    assert_eq!(tree.parent_of("21K(Omicron)"), Some("BA.1"));
    assert_eq!(tree.ancestors("21K(Omicron)").unwrap(), ["BA.1", "B.1.1.529", "B.1.1", "B.1", "B", "root"]);
    assert!(tree.is_valid());
}

#[test]
fn test_add_clades_malformed_places_nothing() {
    let aliases = AliasRegistry::new();
    let root = CladeNode::new("19A").with_child(CladeNode::new("Delta"));

    let mut builder = TreeBuilder::from_tree(&aliases, sample_tree());
    let before = builder.tree().len();

    assert!(builder.add_clades(&root).is_err());
    assert_eq!(builder.tree().len(), before);
}
