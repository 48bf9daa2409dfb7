//! Validate command - surface data issues without emitting a graph

use super::InputArgs;
use crate::core::{transform, FlowError, Warning};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    fatal: bool,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    fiscal_year: String,
    record_count: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.input.config();
        let records = self.input.read_records(&config.fields)?;
        let issues = match transform(&records, &config) {
            Ok(report) => report.warnings.iter().map(warning_issue).collect(),
            Err(err) => vec![error_issue(&err)],
        };

        let output = ValidationOutput {
            fiscal_year: config.fields.amount.clone(),
            record_count: records.len(),
            issue_count: issues.len(),
            issues,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&output);
        }

        // Exit with code 1 if issues found
        if output.issue_count > 0 {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(output: &ValidationOutput) {
    println!();
    println!(
        "VALIDATION RESULTS (FY {}, {} records)",
        output.fiscal_year, output.record_count
    );
    println!();

    if output.issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", output.issue_count);
    println!();
    for (i, issue) in output.issues.iter().enumerate() {
        let severity = if issue.fatal { "error" } else { "warning" };
        println!("  {}. [{}] {}", i + 1, issue.issue_type, severity);
        println!("     {}", issue.message);
        println!();
    }
}

fn warning_issue(warning: &Warning) -> ValidationIssue {
    ValidationIssue {
        issue_type: warning.kind().to_string(),
        fatal: false,
        message: warning.message(),
    }
}

fn error_issue(err: &FlowError) -> ValidationIssue {
    let issue_type = match err {
        FlowError::DuplicateNodeId { .. } => "DuplicateNodeId",
        FlowError::DanglingLinkReference { .. } => "DanglingLinkReference",
        FlowError::EmptyInput { .. } => "EmptyInput",
        FlowError::Cycle { .. } => "Cycle",
        FlowError::AmountOverflow { .. } => "AmountOverflow",
        FlowError::InvalidConfig(_) => "InvalidConfig",
    };
    ValidationIssue {
        issue_type: issue_type.to_string(),
        fatal: true,
        message: err.to_string(),
    }
}
