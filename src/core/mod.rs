pub mod classify;
pub mod config;
pub mod export;
pub mod graph;
pub mod links;
pub mod nodes;
pub mod record;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use classify::{classify, CategoryTotal, Classification, ClassifiedRecord, Direction};
pub use config::{FlowConfig, RecordFields};
pub use export::{link_rows, node_rows, write_csv, CsvColumn, LinkRow, NodeRow, SankeyExport};
pub use graph::{assemble, transform, FlowError, FlowGraph, FlowReport};
pub use links::{build_links, FlowLink};
pub use nodes::{build_nodes, FlowNode, Tier};
pub use record::{read_records_csv, read_records_json, FinancialRecord, RecordError};
pub use warnings::Warning;
