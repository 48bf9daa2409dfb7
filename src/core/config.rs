use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::graph::FlowError;

pub const DEFAULT_HUB_NAME: &str = "Institution";
pub const DEFAULT_EXPENSE_CATEGORY: &str = "Operating Expense";
pub const DEFAULT_FISCAL_YEAR: &str = "2023";

/// Keys used to pull a record out of each entry of the input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RecordFields {
    /// Key of the array holding the records when the document root is an object
    pub collection: Option<String>,
    /// Key of the line item name
    pub name: String,
    /// Key of the fiscal-year amount (e.g. "2023")
    pub amount: String,
    /// Key of the classification tag
    pub category: String,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            collection: None,
            name: "name".to_string(),
            amount: DEFAULT_FISCAL_YEAR.to_string(),
            category: "type".to_string(),
        }
    }
}

/// Settings for one transform run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FlowConfig {
    /// Id of the central node all inflow passes through
    pub hub_name: String,
    /// Category tag that marks a record as an outflow regardless of sign
    pub expense_category: String,
    pub fields: RecordFields,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            hub_name: DEFAULT_HUB_NAME.to_string(),
            expense_category: DEFAULT_EXPENSE_CATEGORY.to_string(),
            fields: RecordFields::default(),
        }
    }
}

impl FlowConfig {
    pub fn with_hub_name(mut self, hub_name: impl Into<String>) -> Self {
        self.hub_name = hub_name.into();
        self
    }

    pub fn with_expense_category(mut self, expense_category: impl Into<String>) -> Self {
        self.expense_category = expense_category.into();
        self
    }

    pub fn with_fiscal_year(mut self, year: impl Into<String>) -> Self {
        self.fields.amount = year.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.fields.collection = Some(collection.into());
        self
    }

    pub fn validate(&self) -> Result<(), FlowError> {
        if self.hub_name.trim().is_empty() {
            return Err(FlowError::InvalidConfig("hub name is empty".to_string()));
        }
        if self.expense_category.trim().is_empty() {
            return Err(FlowError::InvalidConfig(
                "expense category is empty".to_string(),
            ));
        }
        if self.hub_name == self.expense_category {
            return Err(FlowError::InvalidConfig(format!(
                "hub name and expense category are both '{}'",
                self.hub_name
            )));
        }
        Ok(())
    }
}
