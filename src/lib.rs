//! Turns the line items of an annual financial report into a validated
//! five-tier flow graph for Sankey layout engines.
//!
//! Revenue items flow into revenue categories, into a single hub node, into
//! the expense category, and out to expense items. See [`core::transform`].

pub mod cmd;
pub mod core;

pub use crate::core::{transform, FinancialRecord, FlowConfig, FlowError, FlowGraph, FlowReport};
