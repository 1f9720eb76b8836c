use sublineage::alias::{AliasRegistry, LineageNameResolver, ParentLineage, embedded_lineage, is_recombinant};
use sublineage::error::LineageError;

const ALIAS_KEY: &str = r#"{
    "A": "",
    "B": "",
    "AY": "B.1.617.2",
    "BA": "B.1.1.529",
    "BE": "B.1.1.529.5.3.1",
    "BQ": "B.1.1.529.5.3.1.1.1.1",
    "ZZ": "B.2.2.2.2"
}"#;

fn aliases() -> AliasRegistry {
    AliasRegistry::from_json(ALIAS_KEY).unwrap()
}

fn parent(resolver: &LineageNameResolver, name: &str) -> String {
    resolver.parent_of(name).unwrap().as_str().to_string()
}

// ============= Parent Resolution Tests =============

#[test]
fn test_root_letters_resolve_to_root() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    assert_eq!(resolver.parent_of("A").unwrap(), ParentLineage::Root);
    assert_eq!(resolver.parent_of("B").unwrap(), ParentLineage::Root);
    assert_eq!(ParentLineage::Root.as_str(), "root");
    assert_eq!(ParentLineage::Root.to_string(), "root");
}

#[test]
fn test_two_segments_with_empty_prefix() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    for n in 1..20 {
        assert_eq!(parent(&resolver, &format!("B.{n}")), "B");
        assert_eq!(parent(&resolver, &format!("A.{n}")), "A");
    }
}

#[test]
fn test_two_segments_with_alias() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    assert_eq!(parent(&resolver, "BA.1"), "B.1.1.529");
    assert_eq!(parent(&resolver, "AY.4"), "B.1.617.2");
}

#[test]
fn test_two_segments_with_nested_alias() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    assert_eq!(parent(&resolver, "BE.1"), "BA.5.3.1");
    assert_eq!(parent(&resolver, "BQ.1"), "BE.1.1.1");
}

#[test]
fn test_three_or_more_segments_strip_last() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    for name in ["B.1.1", "B.1.1.529", "BA.5.2.1", "BQ.1.1", "AY.4.2.1.1", "Q.1.1"] {
        let (expected, _) = name.rsplit_once('.').unwrap();
        assert_eq!(parent(&resolver, name), expected);
    }
}

#[test]
fn test_unknown_alias() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    assert_eq!(
        resolver.parent_of("GG.5"),
        Err(LineageError::UnknownAlias {
            lineage: "GG.5".to_string(),
            alias: "GG".to_string()
        })
    );
}

#[test]
fn test_uncontractible_parent() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    assert_eq!(
        resolver.parent_of("ZZ.1"),
        Err(LineageError::Uncontractible {
            lineage: "ZZ.1".to_string(),
            expanded: "B.2.2.2.2".to_string()
        })
    );
}

#[test]
fn test_malformed_names() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    for name in ["", "Q", "B..1", "BA.", ".1"] {
        assert_eq!(
            resolver.parent_of(name),
            Err(LineageError::MalformedName(name.to_string())),
            "{name}"
        );
    }
}

#[test]
fn test_resolution_is_deterministic() {
    let aliases = aliases();
    let resolver = LineageNameResolver::new(&aliases);
    for name in ["BE.1", "BA.1", "GG.5", "B.1.1.7"] {
        assert_eq!(resolver.parent_of(name), resolver.parent_of(name));
    }
}

// ============= Name Pattern Tests =============

#[test]
fn test_is_recombinant() {
    assert!(is_recombinant("XBB.1.5"));
    assert!(is_recombinant("XA"));
    assert!(!is_recombinant("BA.1"));
    assert!(!is_recombinant("B.1.1.X"));
}

#[test]
fn test_embedded_lineage() {
    assert_eq!(embedded_lineage("Reclassified as B.1.1.1 descendant"), Some("B.1.1.1"));
    assert_eq!(embedded_lineage("BA.2.75_dropout"), Some("BA.2.75"));
    assert_eq!(embedded_lineage("Alias of B.1.1.529.5.3.1.1.1.1"), Some("B.1.1.529.5.3.1.1.1.1"));
    assert_eq!(embedded_lineage("Withdrawn"), None);
    assert_eq!(embedded_lineage("BA"), None);
}
