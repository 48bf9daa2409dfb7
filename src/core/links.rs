use super::classify::Classification;
use super::config::FlowConfig;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Directed, weighted edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FlowLink {
    pub source: String,
    pub target: String,
    /// Magnitude of the flow (non-negative)
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub weight: Decimal,
}

impl FlowLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: Decimal) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Build links in four segments: item -> category, category -> hub,
/// hub -> expense category, expense category -> item.
///
/// Every weight is a normalized magnitude, so each link agrees with the
/// value of the node it feeds.
pub fn build_links(classification: &Classification, config: &FlowConfig) -> Vec<FlowLink> {
    let hub = config.hub_name.as_str();
    let expense = config.expense_category.as_str();
    let mut links = Vec::new();

    for record in &classification.inflow {
        links.push(FlowLink::new(
            &record.name,
            &record.category,
            record.magnitude,
        ));
    }

    for total in classification.inflow_categories() {
        links.push(FlowLink::new(&total.category, hub, total.total));
    }

    links.push(FlowLink::new(hub, expense, classification.total_outflow()));

    for record in &classification.outflow {
        links.push(FlowLink::new(expense, &record.name, record.magnitude));
    }

    log::debug!("Built {} links", links.len());
    links
}
