use super::graph::FlowGraph;
use super::nodes::Tier;
use finflow_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use std::io::Write;

/// Column description generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Graph in the shape d3-sankey consumes with `nodeId(d => d.name)`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SankeyExport {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SankeyNode {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub value: Decimal,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub value: Decimal,
}

impl From<&FlowGraph> for SankeyExport {
    fn from(graph: &FlowGraph) -> Self {
        Self {
            nodes: graph
                .nodes()
                .iter()
                .map(|n| SankeyNode {
                    name: n.id.clone(),
                    value: n.value,
                    title: n.label.clone(),
                    category: n.group.clone(),
                })
                .collect(),
            links: graph
                .links()
                .iter()
                .map(|l| SankeyLink {
                    source: l.source.clone(),
                    target: l.target.clone(),
                    value: l.weight,
                })
                .collect(),
        }
    }
}

/// One node per CSV row
#[derive(Debug, Clone, Serialize, CsvSchema)]
pub struct NodeRow {
    /// Node id, referenced by link rows
    pub id: String,
    /// Display label
    pub label: String,
    /// Diagram column, 0 (inflow items) to 4 (outflow items)
    pub column: usize,
    /// Tier name
    pub tier: Tier,
    /// Colour group, empty for the hub
    pub group: Option<String>,
    /// Total flow through the node
    pub value: Decimal,
}

/// One link per CSV row
#[derive(Debug, Clone, Serialize, CsvSchema)]
pub struct LinkRow {
    /// Id of the node the flow leaves
    pub source: String,
    /// Id of the node the flow enters
    pub target: String,
    /// Magnitude of the flow
    pub weight: Decimal,
}

pub fn node_rows(graph: &FlowGraph) -> Vec<NodeRow> {
    graph
        .nodes()
        .iter()
        .map(|n| NodeRow {
            id: n.id.clone(),
            label: n.label.clone(),
            column: n.tier.column(),
            tier: n.tier,
            group: n.group.clone(),
            value: n.value,
        })
        .collect()
}

pub fn link_rows(graph: &FlowGraph) -> Vec<LinkRow> {
    graph
        .links()
        .iter()
        .map(|l| LinkRow {
            source: l.source.clone(),
            target: l.target.clone(),
            weight: l.weight,
        })
        .collect()
}

pub fn write_csv<I, R, W>(records: I, writer: W) -> Result<(), csv::Error>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
