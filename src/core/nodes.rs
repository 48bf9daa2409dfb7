use super::classify::{Classification, ClassifiedRecord};
use super::config::FlowConfig;
use super::graph::FlowError;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column of the diagram a node belongs to, left to right
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Tier {
    InflowItem,
    InflowCategory,
    Hub,
    OutflowCategory,
    OutflowItem,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::InflowItem,
        Tier::InflowCategory,
        Tier::Hub,
        Tier::OutflowCategory,
        Tier::OutflowItem,
    ];

    pub fn column(self) -> usize {
        match self {
            Tier::InflowItem => 0,
            Tier::InflowCategory => 1,
            Tier::Hub => 2,
            Tier::OutflowCategory => 3,
            Tier::OutflowItem => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::InflowItem => "inflow item",
            Tier::InflowCategory => "inflow category",
            Tier::Hub => "hub",
            Tier::OutflowCategory => "outflow category",
            Tier::OutflowItem => "outflow item",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FlowNode {
    /// Unique id, referenced by link endpoints
    pub id: String,
    /// Total magnitude flowing through the node (non-negative)
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub value: Decimal,
    pub label: String,
    /// Colour group; absent only on the hub
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub tier: Tier,
}

impl FlowNode {
    fn item(record: &ClassifiedRecord, tier: Tier) -> Self {
        Self {
            id: record.name.clone(),
            value: record.magnitude,
            label: record.name.clone(),
            group: Some(record.category.clone()),
            tier,
        }
    }

    fn category(category: &str, value: Decimal, tier: Tier) -> Self {
        Self {
            id: category.to_string(),
            value,
            label: category.to_string(),
            group: Some(category.to_string()),
            tier,
        }
    }
}

/// Ordered node list that refuses a second node with an id it already holds.
#[derive(Default)]
struct NodeSet {
    nodes: Vec<FlowNode>,
    seen: HashMap<String, Tier>,
}

impl NodeSet {
    fn push(&mut self, node: FlowNode) -> Result<(), FlowError> {
        if let Some(first) = self.seen.get(&node.id) {
            return Err(FlowError::DuplicateNodeId {
                id: node.id,
                first: *first,
                second: node.tier,
            });
        }
        self.seen.insert(node.id.clone(), node.tier);
        self.nodes.push(node);
        Ok(())
    }
}

/// Build the five tiers of nodes in column order.
pub fn build_nodes(
    classification: &Classification,
    config: &FlowConfig,
) -> Result<Vec<FlowNode>, FlowError> {
    let mut set = NodeSet::default();

    for record in &classification.inflow {
        set.push(FlowNode::item(record, Tier::InflowItem))?;
    }

    for total in classification.inflow_categories() {
        set.push(FlowNode::category(
            &total.category,
            total.total,
            Tier::InflowCategory,
        ))?;
    }

    set.push(FlowNode {
        id: config.hub_name.clone(),
        value: classification.total_inflow(),
        label: config.hub_name.clone(),
        group: None,
        tier: Tier::Hub,
    })?;

    set.push(FlowNode::category(
        &config.expense_category,
        classification.total_outflow(),
        Tier::OutflowCategory,
    ))?;

    for record in &classification.outflow {
        set.push(FlowNode::item(record, Tier::OutflowItem))?;
    }

    log::debug!("Built {} nodes", set.nodes.len());
    Ok(set.nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify::classify;
    use crate::core::record::FinancialRecord;
    use rust_decimal_macros::dec;

    fn config() -> FlowConfig {
        FlowConfig::default().with_hub_name("Inst")
    }

    fn build(records: &[FinancialRecord]) -> Result<Vec<FlowNode>, FlowError> {
        let config = config();
        build_nodes(&classify(records, &config.expense_category)?, &config)
    }

    fn summary(nodes: &[FlowNode]) -> Vec<(&str, Decimal, Tier)> {
        nodes
            .iter()
            .map(|n| (n.id.as_str(), n.value, n.tier))
            .collect()
    }

    #[test]
    fn five_tiers_in_order() {
        let nodes = build(&[
            FinancialRecord::new("Tuition", dec!(100), "Operating Revenue"),
            FinancialRecord::new("Salaries", dec!(-60), "Operating Expense"),
        ])
        .unwrap();
        assert_eq!(
            summary(&nodes),
            vec![
                ("Tuition", dec!(100), Tier::InflowItem),
                ("Operating Revenue", dec!(100), Tier::InflowCategory),
                ("Inst", dec!(100), Tier::Hub),
                ("Operating Expense", dec!(60), Tier::OutflowCategory),
                ("Salaries", dec!(60), Tier::OutflowItem),
            ]
        );
    }

    #[test]
    fn only_hub_lacks_group() {
        let nodes = build(&[
            FinancialRecord::new("Tuition", dec!(100), "Operating Revenue"),
            FinancialRecord::new("Salaries", dec!(-60), "Operating Expense"),
        ])
        .unwrap();
        for node in &nodes {
            assert_eq!(node.group.is_none(), node.tier == Tier::Hub, "{}", node.id);
        }
        assert_eq!(nodes[4].group.as_deref(), Some("Operating Expense"));
    }

    #[test]
    fn shared_category_yields_one_node() {
        let nodes = build(&[
            FinancialRecord::new("Tuition", dec!(100), "Operating Revenue"),
            FinancialRecord::new("Housing", dec!(40), "Operating Revenue"),
            FinancialRecord::new("Salaries", dec!(-60), "Operating Expense"),
        ])
        .unwrap();
        let categories: Vec<_> = nodes
            .iter()
            .filter(|n| n.tier == Tier::InflowCategory)
            .collect();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].value, dec!(140));
    }

    #[test]
    fn expense_node_normalizes_mixed_signs() {
        let nodes = build(&[
            FinancialRecord::new("Tuition", dec!(100), "Operating Revenue"),
            FinancialRecord::new("Salaries", dec!(-60), "Operating Expense"),
            FinancialRecord::new("Utilities", dec!(15), "Operating Expense"),
            FinancialRecord::new("Interest paid", dec!(-5), "Non-operating Revenue"),
        ])
        .unwrap();
        let expense = nodes
            .iter()
            .find(|n| n.tier == Tier::OutflowCategory)
            .unwrap();
        assert_eq!(expense.value, dec!(80));
        let items: Vec<_> = nodes
            .iter()
            .filter(|n| n.tier == Tier::OutflowItem)
            .map(|n| (n.id.as_str(), n.value, n.group.as_deref()))
            .collect();
        assert_eq!(
            items,
            vec![
                ("Salaries", dec!(60), Some("Operating Expense")),
                ("Utilities", dec!(15), Some("Operating Expense")),
                ("Interest paid", dec!(5), Some("Non-operating Revenue")),
            ]
        );
    }

    #[test]
    fn duplicate_inflow_name_fails() {
        let err = build(&[
            FinancialRecord::new("Gifts", dec!(10), "Operating Revenue"),
            FinancialRecord::new("Gifts", dec!(20), "Non-operating Revenue"),
            FinancialRecord::new("Salaries", dec!(-60), "Operating Expense"),
        ])
        .unwrap_err();
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
    fn item_named_like_category_fails() {
        let err = build(&[
            FinancialRecord::new("Auxiliary", dec!(10), "Auxiliary"),
            FinancialRecord::new("Salaries", dec!(-60), "Operating Expense"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            FlowError::DuplicateNodeId {
                id: "Auxiliary".to_string(),
                first: Tier::InflowItem,
                second: Tier::InflowCategory,
            }
        );
    }

    #[test]
    fn item_named_like_hub_fails() {
        let err = build(&[
            FinancialRecord::new("Tuition", dec!(10), "Operating Revenue"),
            FinancialRecord::new("Inst", dec!(-60), "Operating Expense"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            FlowError::DuplicateNodeId { ref id, first: Tier::Hub, second: Tier::OutflowItem } if id == "Inst"
        ));
    }

    #[test]
    fn tier_columns_are_sequential() {
        let columns: Vec<usize> = Tier::ALL.iter().map(|t| t.column()).collect();
        assert_eq!(columns, vec![0, 1, 2, 3, 4]);
    }
}
