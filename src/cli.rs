use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "testaudit",
    version,
    about = "Service unit-test auditor that writes Markdown remediation reports"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit every configured group and write or delete its report
    Audit(AuditCommand),
    /// Print the rule table
    Rules(RulesCommand),
}

#[derive(Args)]
pub struct AuditCommand {
    /// Root of the Java project
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: SummaryFormat,
}

#[derive(Args)]
pub struct RulesCommand {
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: SummaryFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SummaryFormat {
    Text,
    Json,
}
