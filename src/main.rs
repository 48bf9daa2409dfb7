use clap::{Parser, Subcommand};
use finflow::cmd::{
    graph::GraphCommand, schema::SchemaCommand, summary::SummaryCommand,
    validate::ValidateCommand,
};

/// Build Sankey flow graphs from annual financial reports
#[derive(Parser, Debug)]
#[command(name = "finflow", version, about)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the flow graph and write it for a layout engine
    Graph(GraphCommand),
    /// Check a report for data issues
    Validate(ValidateCommand),
    /// Inflow and outflow totals by category
    Summary(SummaryCommand),
    /// Print output schemas
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.command {
        Command::Graph(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Summary(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
