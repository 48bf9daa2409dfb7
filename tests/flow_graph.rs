//! Properties of the full transform over the bundled report data

use finflow::core::{
    read_records_csv, read_records_json, transform, Direction, FinancialRecord, FlowConfig,
    FlowError, FlowLink, Tier, Warning,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::fs::File;

fn jmu_config() -> FlowConfig {
    FlowConfig::default()
        .with_hub_name("JMU")
        .with_collection("jmu-revenues")
}

fn jmu_records(config: &FlowConfig) -> Vec<FinancialRecord> {
    let file = File::open("tests/data/jmu.json").expect("fixture");
    read_records_json(file, &config.fields).unwrap()
}

#[test]
fn jmu_report_tiers() {
    let config = jmu_config();
    let report = transform(&jmu_records(&config), &config).unwrap();
    let graph = &report.graph;

    let count = |tier| graph.nodes_in_tier(tier).count();
    assert_eq!(count(Tier::InflowItem), 6);
    assert_eq!(count(Tier::InflowCategory), 2);
    assert_eq!(count(Tier::Hub), 1);
    assert_eq!(count(Tier::OutflowCategory), 1);
    assert_eq!(count(Tier::OutflowItem), 5);
    assert_eq!(graph.links().len(), 14);

    assert_eq!(graph.node("JMU").unwrap().value, dec!(683191000));
    assert_eq!(graph.node("Operating Expense").unwrap().value, dec!(504645000));
    assert_eq!(
        report.warnings,
        vec![Warning::ZeroAmountSkipped {
            name: "Gifts".to_string()
        }]
    );
}

#[test]
fn nodes_appear_in_column_order() {
    let config = jmu_config();
    let graph = transform(&jmu_records(&config), &config).unwrap().graph;
    let columns: Vec<usize> = graph.nodes().iter().map(|n| n.tier.column()).collect();
    let mut sorted = columns.clone();
    sorted.sort();
    assert_eq!(columns, sorted);
}

#[test]
fn conservation_through_the_hub() {
    let config = jmu_config();
    let records = jmu_records(&config);
    let graph = transform(&records, &config).unwrap().graph;

    let category_sum: Decimal = graph
        .nodes_in_tier(Tier::InflowCategory)
        .map(|n| n.value)
        .sum();
    let raw_inflow: Decimal = records
        .iter()
        .filter(|r| r.amount > Decimal::ZERO && r.category != config.expense_category)
        .map(|r| r.amount)
        .sum();
    let hub = graph.hub().unwrap();
    assert_eq!(category_sum, hub.value);
    assert_eq!(hub.value, raw_inflow);

    let into_hub: Decimal = graph.incoming("JMU").map(|l| l.weight).sum();
    assert_eq!(into_hub, hub.value);
}

#[test]
fn link_weights_agree_with_node_values() {
    let config = jmu_config();
    let graph = transform(&jmu_records(&config), &config).unwrap().graph;
    for node in graph.nodes() {
        let incoming: Vec<&FlowLink> = graph.incoming(&node.id).collect();
        if node.tier == Tier::Hub || incoming.is_empty() {
            continue;
        }
        let total: Decimal = incoming.iter().map(|l| l.weight).sum();
        assert_eq!(total, node.value, "node {}", node.id);
    }
    let expense = graph.node("Operating Expense").unwrap();
    let out: Decimal = graph.outgoing("Operating Expense").map(|l| l.weight).sum();
    assert_eq!(out, expense.value);
}

#[test]
fn partition_covers_nonzero_records() {
    let config = jmu_config();
    let records = jmu_records(&config);
    let graph = transform(&records, &config).unwrap().graph;

    let item_ids: HashSet<&str> = graph
        .nodes()
        .iter()
        .filter(|n| matches!(n.tier, Tier::InflowItem | Tier::OutflowItem))
        .map(|n| n.id.as_str())
        .collect();
    let nonzero: HashSet<&str> = records
        .iter()
        .filter(|r| !r.amount.is_zero())
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(item_ids, nonzero);
}

#[test]
fn every_link_resolves() {
    let config = jmu_config();
    let graph = transform(&jmu_records(&config), &config).unwrap().graph;
    let ids: HashSet<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
    for link in graph.links() {
        assert!(ids.contains(link.source.as_str()), "{}", link.source);
        assert!(ids.contains(link.target.as_str()), "{}", link.target);
        assert!(!link.weight.is_sign_negative());
    }
}

#[test]
fn transform_is_idempotent() {
    let config = jmu_config();
    let records = jmu_records(&config);
    let first = transform(&records, &config).unwrap();
    let second = transform(&records, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn other_fiscal_year() {
    let config = jmu_config().with_fiscal_year("2022");
    let report = transform(&jmu_records(&config), &config).unwrap();
    let graph = &report.graph;
    assert_eq!(graph.hub().unwrap().value, dec!(637881000));
    assert_eq!(
        graph.node("Investment income").map(|n| n.tier),
        Some(Tier::OutflowItem)
    );
}

#[test]
fn csv_report() {
    let config = FlowConfig::default();
    let file = File::open("tests/data/report.csv").expect("fixture");
    let records = read_records_csv(file, &config.fields).unwrap();
    let graph = transform(&records, &config).unwrap().graph;

    let categories: Vec<(&str, Decimal)> = graph
        .nodes_in_tier(Tier::InflowCategory)
        .map(|n| (n.id.as_str(), n.value))
        .collect();
    assert_eq!(
        categories,
        vec![
            ("Operating Revenue", dec!(140)),
            ("Non-operating Revenue", dec!(25)),
        ]
    );
    assert_eq!(graph.node("Operating Expense").unwrap().value, dec!(107));
}

#[test]
fn duplicate_names_fail_without_graph() {
    let config = FlowConfig::default();
    let file = File::open("tests/data/duplicate.json").expect("fixture");
    let records = read_records_json(file, &config.fields).unwrap();
    let err = transform(&records, &config).unwrap_err();
    assert_eq!(
        err,
        FlowError::DuplicateNodeId {
            id: "Gifts".to_string(),
            first: Tier::InflowItem,
            second: Tier::InflowItem,
        }
    );
}

#[test]
fn amounts_beyond_decimal_range_fail() {
    let doc = r#"[
        {"name": "Tuition", "2023": "79228162514264337593543950335", "type": "Operating Revenue"},
        {"name": "Housing", "2023": "79228162514264337593543950335", "type": "Operating Revenue"},
        {"name": "Salaries", "2023": -60, "type": "Operating Expense"}
    ]"#;
    let config = FlowConfig::default();
    let records = read_records_json(doc.as_bytes(), &config.fields).unwrap();
    let err = transform(&records, &config).unwrap_err();
    assert_eq!(
        err,
        FlowError::AmountOverflow {
            direction: Direction::Inflow,
            category: "Operating Revenue".to_string(),
        }
    );
}

#[test]
fn null_year_is_skipped_like_zero() {
    let doc = r#"[
        {"name": "Tuition", "2023": 100, "type": "Operating Revenue"},
        {"name": "Closed program", "2023": null, "type": "Operating Revenue"},
        {"name": "Salaries", "2023": -60, "type": "Operating Expense"}
    ]"#;
    let config = FlowConfig::default();
    let records = read_records_json(doc.as_bytes(), &config.fields).unwrap();
    let report = transform(&records, &config).unwrap();
    assert!(report.graph.node("Closed program").is_none());
    assert_eq!(
        report.warnings,
        vec![Warning::ZeroAmountSkipped {
            name: "Closed program".to_string()
        }]
    );
}
