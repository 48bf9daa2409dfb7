use super::classify::{classify, Direction};
use super::config::FlowConfig;
use super::links::{build_links, FlowLink};
use super::nodes::{build_nodes, FlowNode, Tier};
use super::record::FinancialRecord;
use super::warnings::Warning;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("duplicate node id '{id}' ({first} and {second})")]
    DuplicateNodeId { id: String, first: Tier, second: Tier },
    #[error("link '{from}' -> '{to}' references unknown node '{missing}'")]
    DanglingLinkReference {
        from: String,
        to: String,
        missing: String,
    },
    #[error("no {direction} records, a flow graph needs both inflow and outflow")]
    EmptyInput { direction: Direction },
    #[error("links form a cycle through '{node}'")]
    Cycle { node: String },
    #[error("{direction} amounts under '{category}' exceed the decimal range")]
    AmountOverflow {
        direction: Direction,
        category: String,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Validated nodes and links, ready for a layout engine.
///
/// Only [`assemble`] creates one, so every link endpoint resolves to a node.
/// Layout engines that annotate in place should work on a clone or on
/// [`FlowGraph::into_parts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FlowGraph {
    nodes: Vec<FlowNode>,
    links: Vec<FlowLink>,
}

impl FlowGraph {
    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[FlowLink] {
        &self.links
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FlowLink> + 'a {
        self.links.iter().filter(move |l| l.target == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FlowLink> + 'a {
        self.links.iter().filter(move |l| l.source == id)
    }

    pub fn nodes_in_tier(&self, tier: Tier) -> impl Iterator<Item = &FlowNode> + '_ {
        self.nodes.iter().filter(move |n| n.tier == tier)
    }

    pub fn hub(&self) -> Option<&FlowNode> {
        self.nodes_in_tier(Tier::Hub).next()
    }

    pub fn into_parts(self) -> (Vec<FlowNode>, Vec<FlowLink>) {
        (self.nodes, self.links)
    }
}

/// A flow graph plus the non-fatal findings gathered while building it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FlowReport {
    pub graph: FlowGraph,
    pub warnings: Vec<Warning>,
}

/// Run the whole pipeline: classify, build nodes and links, assemble.
pub fn transform(records: &[FinancialRecord], config: &FlowConfig) -> Result<FlowReport, FlowError> {
    config.validate()?;

    let classification = classify(records, &config.expense_category)?;
    if classification.inflow.is_empty() {
        return Err(FlowError::EmptyInput {
            direction: Direction::Inflow,
        });
    }
    if classification.outflow.is_empty() {
        return Err(FlowError::EmptyInput {
            direction: Direction::Outflow,
        });
    }

    let nodes = build_nodes(&classification, config)?;
    let links = build_links(&classification, config);
    let mut report = assemble(nodes, links)?;

    let mut warnings: Vec<Warning> = classification
        .skipped
        .iter()
        .map(|name| {
            log::warn!("Record '{}' has a zero amount, left out of the graph", name);
            Warning::ZeroAmountSkipped { name: name.clone() }
        })
        .collect();
    warnings.append(&mut report.warnings);
    report.warnings = warnings;

    log::info!("Total inflow {}", classification.total_inflow());
    log::info!("Total outflow {}", classification.total_outflow());
    Ok(report)
}

/// Check referential integrity of `nodes` and `links` and package them.
///
/// Duplicate ids, dangling endpoints and cycles are fatal. Nodes without any
/// link are kept and reported as [`Warning::OrphanNode`].
pub fn assemble(nodes: Vec<FlowNode>, links: Vec<FlowLink>) -> Result<FlowReport, FlowError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if let Some(&first) = index.get(node.id.as_str()) {
            return Err(FlowError::DuplicateNodeId {
                id: node.id.clone(),
                first: nodes[first].tier,
                second: node.tier,
            });
        }
        index.insert(node.id.as_str(), i);
    }

    let mut edges = Vec::with_capacity(links.len());
    for link in &links {
        let endpoint = |id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| FlowError::DanglingLinkReference {
                    from: link.source.clone(),
                    to: link.target.clone(),
                    missing: id.to_string(),
                })
        };
        edges.push((endpoint(link.source.as_str())?, endpoint(link.target.as_str())?));
    }

    if let Some(node) = find_cycle(nodes.len(), &edges) {
        return Err(FlowError::Cycle {
            node: nodes[node].id.clone(),
        });
    }

    let mut degree = vec![0usize; nodes.len()];
    for &(source, target) in &edges {
        degree[source] += 1;
        degree[target] += 1;
    }
    let warnings: Vec<Warning> = nodes
        .iter()
        .zip(&degree)
        .filter(|(_, &d)| d == 0)
        .map(|(node, _)| {
            log::warn!("Orphan node '{}' kept in graph", node.id);
            Warning::OrphanNode {
                id: node.id.clone(),
            }
        })
        .collect();

    log::debug!("Assembled {} nodes, {} links", nodes.len(), links.len());
    Ok(FlowReport {
        graph: FlowGraph { nodes, links },
        warnings,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    New,
    Active,
    Done,
}

/// Depth-first search for a back edge. Returns a node on the cycle.
fn find_cycle(node_count: usize, edges: &[(usize, usize)]) -> Option<usize> {
    let mut adjacency = vec![Vec::new(); node_count];
    for &(source, target) in edges {
        adjacency[source].push(target);
    }

    let mut marks = vec![Mark::New; node_count];
    for start in 0..node_count {
        if marks[start] != Mark::New {
            continue;
        }
        marks[start] = Mark::Active;
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.len().checked_sub(1) {
            let (node, next) = stack[top];
            match adjacency[node].get(next) {
                Some(&child) => {
                    stack[top].1 += 1;
                    match marks[child] {
                        Mark::Active => return Some(child),
                        Mark::New => {
                            marks[child] = Mark::Active;
                            stack.push((child, 0));
                        }
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }
    None
}
