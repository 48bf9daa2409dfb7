//! Graph command - build the flow graph and hand it off in a layout-engine format

use super::{format_amount, InputArgs};
use crate::core::{link_rows, node_rows, transform, write_csv, FlowGraph, SankeyExport};
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct GraphCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = GraphFormat::Json)]
    format: GraphFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum GraphFormat {
    /// Nodes and links with ids, tiers and weights
    #[default]
    Json,
    /// d3-sankey input (nodes keyed by name, links carry value)
    D3,
    /// One CSV row per node
    NodeCsv,
    /// One CSV row per link
    LinkCsv,
    /// Human-readable tables
    Table,
}

impl GraphCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.input.config();
        let records = self.input.read_records(&config.fields)?;
        let report = transform(&records, &config)?;

        match &self.output {
            Some(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                self.write(&report.graph, &mut writer)?;
                writer.flush()?;
            }
            None => self.write(&report.graph, &mut io::stdout().lock())?,
        }
        Ok(())
    }

    fn write<W: Write>(&self, graph: &FlowGraph, writer: &mut W) -> anyhow::Result<()> {
        match self.format {
            GraphFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, graph)?;
                writeln!(writer)?;
            }
            GraphFormat::D3 => {
                serde_json::to_writer_pretty(&mut *writer, &SankeyExport::from(graph))?;
                writeln!(writer)?;
            }
            GraphFormat::NodeCsv => write_csv(node_rows(graph), writer)?,
            GraphFormat::LinkCsv => write_csv(link_rows(graph), writer)?,
            GraphFormat::Table => writeln!(writer, "{}", render_tables(graph))?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Tabled)]
struct NodeTableRow {
    #[tabled(rename = "Col")]
    column: usize,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Node")]
    id: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Debug, Clone, Tabled)]
struct LinkTableRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

fn render_tables(graph: &FlowGraph) -> String {
    let nodes: Vec<NodeTableRow> = graph
        .nodes()
        .iter()
        .map(|n| NodeTableRow {
            column: n.tier.column(),
            tier: n.tier.to_string(),
            id: n.id.clone(),
            group: n.group.clone().unwrap_or_default(),
            value: format_amount(n.value),
        })
        .collect();
    let links: Vec<LinkTableRow> = graph
        .links()
        .iter()
        .map(|l| LinkTableRow {
            source: l.source.clone(),
            target: l.target.clone(),
            weight: format_amount(l.weight),
        })
        .collect();

    let nodes = Table::new(nodes)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..)).with(Alignment::right()))
        .to_string();
    let links = Table::new(links)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string();
    format!("NODES\n{nodes}\n\nLINKS\n{links}")
}
