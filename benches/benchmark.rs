use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sublineage::alias::AliasRegistry;
use sublineage::builder::build_from_lineage_list;
use sublineage::collapse::CollapseMapBuilder;
use sublineage::io::GroupDefinitions;

const ALIAS_KEY: &str = r#"{"A": "", "B": "", "BA": "B.1.1.529", "BE": "B.1.1.529.5.3.1"}"#;

/// B.i, B.i.j and B.i.j.k, plus aliased BA.* and BE.* sublineages.
fn synthetic_lineages(width: usize) -> Vec<String> {
    let mut lineages = vec!["B".to_string(), "B.1.1.529".to_string()];
    for i in 1..=width {
        lineages.push(format!("B.{i}"));
        for j in 1..=width {
            lineages.push(format!("B.{i}.{j}"));
            for k in 1..=width / 4 {
                lineages.push(format!("B.{i}.{j}.{k}"));
            }
        }
    }
    for i in 1..=width {
        lineages.push(format!("BA.{i}"));
        for j in 1..=width / 2 {
            lineages.push(format!("BA.{i}.{j}"));
        }
    }
    lineages.extend(["BA.5.3", "BA.5.3.1"].map(str::to_string));
    for i in 1..=width {
        lineages.push(format!("BE.{i}"));
    }
    lineages
}

fn synthetic_definitions(width: usize) -> GroupDefinitions {
    let mut definitions = GroupDefinitions::new();
    for i in (1..=width).step_by(3) {
        definitions.insert(&format!("Group B.{i}"), [format!("B.{i}")]);
        definitions.insert(&format!("Group B.{i}.1"), [format!("B.{i}.1")]);
    }
    definitions.insert("Omicron", ["BA.1", "BA.2"]);
    definitions.insert("Omicron (BE)", ["BE.1"]);
    definitions
}

fn tree_building(c: &mut Criterion) {
    let aliases = AliasRegistry::from_json(ALIAS_KEY).unwrap();
    let lineages = synthetic_lineages(20);
    let reversed: Vec<&String> = lineages.iter().rev().collect();

    c.bench_function("build_in_order", |b| {
        b.iter(|| build_from_lineage_list(black_box(&lineages), &aliases));
    });
    c.bench_function("build_reversed", |b| {
        b.iter(|| build_from_lineage_list(black_box(&reversed), &aliases));
    });
}

fn collapsing(c: &mut Criterion) {
    let aliases = AliasRegistry::from_json(ALIAS_KEY).unwrap();
    let (tree, _) = build_from_lineage_list(synthetic_lineages(20), &aliases);
    let definitions = synthetic_definitions(20);
    let universe: Vec<String> = (1..=200).map(|i| format!("BA.{}_dropout", i % 25)).collect();

    c.bench_function("collapse_map", |b| {
        b.iter(|| {
            CollapseMapBuilder::new(black_box(&tree), &definitions)
                .with_universe(&universe)
                .build()
        });
    });
}

criterion_group!(regression, tree_building);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = collapsing
}
criterion_main!(regression, reporting);
