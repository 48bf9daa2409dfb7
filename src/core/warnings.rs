use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Non-fatal findings reported alongside a built flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Node has no incoming or outgoing links. It is kept in the graph.
    OrphanNode { id: String },
    /// Record had a zero amount and contributes no node or link.
    ZeroAmountSkipped { name: String },
}

impl Warning {
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::OrphanNode { .. } => "OrphanNode",
            Warning::ZeroAmountSkipped { .. } => "ZeroAmountSkipped",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Warning::OrphanNode { id } => format!("node '{id}' is not connected to any link"),
            Warning::ZeroAmountSkipped { name } => {
                format!("record '{name}' has a zero amount and was left out")
            }
        }
    }
}
