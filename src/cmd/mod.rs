pub mod graph;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::core::config::{DEFAULT_EXPENSE_CATEGORY, DEFAULT_FISCAL_YEAR, DEFAULT_HUB_NAME};
use crate::core::{read_records_csv, read_records_json, FinancialRecord, FlowConfig, RecordFields};
use clap::Args;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

/// Input and transform options shared by every command that reads a report
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON or CSV report file ("-" reads JSON from stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Treat the input as CSV whatever its extension
    #[arg(long)]
    pub csv: bool,

    /// Fiscal year column holding the amounts (e.g., 2023)
    #[arg(short, long, default_value = DEFAULT_FISCAL_YEAR)]
    pub year: String,

    /// Key of the record array inside a JSON document (e.g., jmu-revenues)
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Key of the line item name
    #[arg(long, default_value = "name")]
    pub name_field: String,

    /// Key of the category tag
    #[arg(long, default_value = "type")]
    pub category_field: String,

    /// Id of the central node
    #[arg(long, default_value = DEFAULT_HUB_NAME)]
    pub hub: String,

    /// Category that marks a record as an expense
    #[arg(long, default_value = DEFAULT_EXPENSE_CATEGORY)]
    pub expense_category: String,
}

impl InputArgs {
    pub fn config(&self) -> FlowConfig {
        FlowConfig {
            hub_name: self.hub.clone(),
            expense_category: self.expense_category.clone(),
            fields: RecordFields {
                collection: self.collection.clone(),
                name: self.name_field.clone(),
                amount: self.year.clone(),
                category: self.category_field.clone(),
            },
        }
    }

    /// Read records from the input file (or stdin with "-")
    pub fn read_records(&self, fields: &RecordFields) -> anyhow::Result<Vec<FinancialRecord>> {
        if self.input.as_os_str() == "-" {
            self.read_from_stdin(fields)
        } else {
            self.read_from_file(fields)
        }
    }

    fn is_csv(&self) -> bool {
        self.csv
            || self
                .input
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }

    fn read_from_file(&self, fields: &RecordFields) -> anyhow::Result<Vec<FinancialRecord>> {
        let file = File::open(&self.input)?;
        let reader = BufReader::new(file);
        let records = if self.is_csv() {
            read_records_csv(reader, fields)?
        } else {
            read_records_json(reader, fields)?
        };
        Ok(records)
    }

    fn read_from_stdin(&self, fields: &RecordFields) -> anyhow::Result<Vec<FinancialRecord>> {
        let stdin = io::stdin();
        let mut reader = BufReader::new(stdin.lock());

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }

        let cursor = io::Cursor::new(buffer);
        let records = if self.csv {
            read_records_csv(cursor, fields)?
        } else {
            read_records_json(cursor, fields)?
        };
        Ok(records)
    }
}

pub(crate) fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let (int_part, frac_part) = {
        let s = format!("{:.2}", rounded.abs());
        match s.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (s, "00".to_string()),
        }
    };
    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}
