//! Summary command - inflow and outflow totals by category

use super::{format_amount, InputArgs};
use crate::core::{classify, transform, Classification, ClassifiedRecord, FlowError};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData {
    fiscal_year: String,
    hub: String,
    inflow: Vec<CategoryLine>,
    outflow: Vec<CategoryLine>,
    total_inflow: String,
    total_outflow: String,
    /// Positive is a surplus, negative a deficit
    net: String,
    skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
struct CategoryLine {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Total")]
    total: String,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.input.config();
        let records = self.input.read_records(&config.fields)?;
        // The summary only makes sense for input that forms a valid graph
        transform(&records, &config)?;

        let classification = classify(&records, &config.expense_category)?;
        let summary = build_summary(&classification, &config.fields.amount, &config.hub_name)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_text(&summary);
        }
        Ok(())
    }
}

fn build_summary(
    classification: &Classification,
    fiscal_year: &str,
    hub: &str,
) -> Result<SummaryData, FlowError> {
    let inflow = category_lines(&classification.inflow)?;
    let outflow = category_lines(&classification.outflow)?;
    let total_inflow = classification.total_inflow();
    let total_outflow = classification.total_outflow();

    Ok(SummaryData {
        fiscal_year: fiscal_year.to_string(),
        hub: hub.to_string(),
        inflow,
        outflow,
        total_inflow: format_amount(total_inflow),
        total_outflow: format_amount(total_outflow),
        net: format_amount(total_inflow - total_outflow),
        skipped: classification.skipped.clone(),
    })
}

/// Group magnitudes by category, keeping first-seen order
fn category_lines(records: &[ClassifiedRecord]) -> Result<Vec<CategoryLine>, FlowError> {
    let mut totals: Vec<(&str, usize, Decimal)> = Vec::new();
    for record in records {
        let category = record.category.as_str();
        match totals.iter_mut().find(|(c, _, _)| *c == category) {
            Some((_, count, total)) => {
                *count += 1;
                *total = total.checked_add(record.magnitude).ok_or_else(|| {
                    FlowError::AmountOverflow {
                        direction: record.direction,
                        category: record.category.clone(),
                    }
                })?;
            }
            None => totals.push((category, 1, record.magnitude)),
        }
    }
    Ok(totals
        .into_iter()
        .map(|(category, items, total)| CategoryLine {
            category: category.to_string(),
            items,
            total: format_amount(total),
        })
        .collect())
}

fn print_text(summary: &SummaryData) {
    println!();
    println!("FLOW SUMMARY (FY {}, hub {})", summary.fiscal_year, summary.hub);
    println!();
    println!("INFLOW");
    println!("{}", category_table(&summary.inflow));
    println!();
    println!("OUTFLOW");
    println!("{}", category_table(&summary.outflow));
    println!();
    println!("Total inflow:  {}", summary.total_inflow);
    println!("Total outflow: {}", summary.total_outflow);
    println!("Net:           {}", summary.net);
    if !summary.skipped.is_empty() {
        println!();
        println!("Zero amount (not shown): {}", summary.skipped.join(", "));
    }
}

fn category_table(lines: &[CategoryLine]) -> String {
    Table::new(lines)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}
