//! Schema command - print the shapes handed to layout engines

use crate::core::{CsvColumn, FinancialRecord, FlowConfig, FlowReport, LinkRow, NodeRow, SankeyExport};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Which schema to print
    #[arg(value_enum, default_value = "graph")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema of the graph output (with warnings)
    Graph,
    /// JSON Schema of the d3-sankey output
    Sankey,
    /// JSON Schema of a normalized input record
    Record,
    /// JSON Schema of the transform settings
    Config,
    /// Column descriptions of node CSV output
    NodeCsv,
    /// Column descriptions of link CSV output
    LinkCsv,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = match self.format {
            SchemaFormat::Graph => schema_for!(FlowReport),
            SchemaFormat::Sankey => schema_for!(SankeyExport),
            SchemaFormat::Record => schema_for!(FinancialRecord),
            SchemaFormat::Config => schema_for!(FlowConfig),
            SchemaFormat::NodeCsv => {
                print_csv_columns("Node CSV", NodeRow::csv_header(), NodeRow::csv_columns());
                return Ok(());
            }
            SchemaFormat::LinkCsv => {
                print_csv_columns("Link CSV", LinkRow::csv_header(), LinkRow::csv_columns());
                return Ok(());
            }
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}

fn print_csv_columns(title: &str, header: &str, columns: &[CsvColumn]) {
    println!("{title} Output Format");
    println!("{}", "=".repeat(title.len() + 14));
    println!();
    println!("{header}");
    println!();
    for column in columns {
        let req = if column.required { "always" } else { "optional" };
        println!("{:10} ({:8})  {}", column.name, req, column.description);
    }
}
