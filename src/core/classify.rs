use super::graph::FlowError;
use super::record::FinancialRecord;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which side of the hub a record sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Direction {
    Inflow,
    Outflow,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Inflow => write!(f, "inflow"),
            Direction::Outflow => write!(f, "outflow"),
        }
    }
}

/// A record with its sign folded into `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub name: String,
    pub category: String,
    /// Always non-negative
    pub magnitude: Decimal,
    pub direction: Direction,
}

/// Subtotal of one inflow category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub inflow: Vec<ClassifiedRecord>,
    pub outflow: Vec<ClassifiedRecord>,
    /// Names of records with a zero amount
    pub skipped: Vec<String>,
    total_inflow: Decimal,
    total_outflow: Decimal,
    inflow_categories: Vec<CategoryTotal>,
}

impl Classification {
    pub fn total_inflow(&self) -> Decimal {
        self.total_inflow
    }

    pub fn total_outflow(&self) -> Decimal {
        self.total_outflow
    }

    /// Inflow categories in order of first occurrence in the input, with subtotals.
    pub fn inflow_categories(&self) -> &[CategoryTotal] {
        &self.inflow_categories
    }

    fn push(&mut self, record: ClassifiedRecord) -> Result<(), FlowError> {
        let overflow = || FlowError::AmountOverflow {
            direction: record.direction,
            category: record.category.clone(),
        };
        match record.direction {
            Direction::Inflow => {
                self.total_inflow = self
                    .total_inflow
                    .checked_add(record.magnitude)
                    .ok_or_else(overflow)?;
                match self
                    .inflow_categories
                    .iter_mut()
                    .find(|t| t.category == record.category)
                {
                    Some(existing) => {
                        existing.total = existing
                            .total
                            .checked_add(record.magnitude)
                            .ok_or_else(overflow)?
                    }
                    None => self.inflow_categories.push(CategoryTotal {
                        category: record.category.clone(),
                        total: record.magnitude,
                    }),
                }
                self.inflow.push(record);
            }
            Direction::Outflow => {
                self.total_outflow = self
                    .total_outflow
                    .checked_add(record.magnitude)
                    .ok_or_else(overflow)?;
                self.outflow.push(record);
            }
        }
        Ok(())
    }
}

/// Split records into inflow and outflow.
///
/// A record tagged `expense_category` is an outflow whatever its sign; any
/// other record is an inflow when positive and an outflow when negative.
/// Zero amounts land in neither set. Fails with [`FlowError::AmountOverflow`]
/// when a total leaves the range of `Decimal`.
pub fn classify(
    records: &[FinancialRecord],
    expense_category: &str,
) -> Result<Classification, FlowError> {
    let mut classification = Classification::default();

    for record in records {
        if record.amount.is_zero() {
            log::debug!("Skipping zero amount record '{}'", record.name);
            classification.skipped.push(record.name.clone());
            continue;
        }

        let direction = if record.category == expense_category || record.amount.is_sign_negative()
        {
            Direction::Outflow
        } else {
            Direction::Inflow
        };

        classification.push(ClassifiedRecord {
            name: record.name.clone(),
            category: record.category.clone(),
            magnitude: record.amount.abs(),
            direction,
        })?;
    }

    log::debug!(
        "Classified {} inflow, {} outflow, {} skipped",
        classification.inflow.len(),
        classification.outflow.len(),
        classification.skipped.len()
    );
    Ok(classification)
}
