mod analyze;
mod cli;
mod config;
mod error;
mod report;
mod scan;
mod types;

use crate::error::AuditError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const VIOLATIONS: i32 = 1;
    pub const ANALYSIS_FAILED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<i32, AuditError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.command {
        cli::Commands::Audit(cmd) => {
            if !cmd.path.exists() {
                return Err(AuditError::PathNotFound(cmd.path.display().to_string()));
            }

            let loaded = config::load_config(&cmd.path)?;
            let rules = types::rules::RuleSet::from_config(&loaded.rules);
            let constants = scan::error_index::ErrorConstantIndex::load(
                &cmd.path.join(&loaded.layout.error_messages),
            )?;
            let ctx = report::md::RenderContext {
                rules: &rules,
                constants: &constants,
                max_verification_commands: loaded.audit.max_verification_commands,
            };

            let mut summary = report::RunSummary::default();
            for name in &loaded.audit.groups {
                let group = scan::ServiceGroup::new(&cmd.path, &loaded.layout, name.trim());
                let scanned = scan::scan_group(&group)?;
                let audit = analyze::audit_group(&group, scanned, &rules);
                summary.record(report::write_or_remove(&audit, &ctx)?);
            }

            let rendered = match cmd.format {
                cli::SummaryFormat::Text => summary.to_text(),
                cli::SummaryFormat::Json => report::json::to_json(&summary)?,
            };
            println!("{rendered}");

            if summary.has_failures() {
                Ok(exit_code::ANALYSIS_FAILED)
            } else if summary.has_violations() {
                Ok(exit_code::VIOLATIONS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Rules(cmd) => {
            let rendered = match cmd.format {
                cli::SummaryFormat::Text => rule_table_text(),
                cli::SummaryFormat::Json => rule_table_json()?,
            };
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
    }
}

fn rule_table_text() -> String {
    let mut output = String::from("| Rule | Severity | Description |\n| --- | --- | --- |\n");
    for rule in types::rules::Rule::ALL {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            rule.number(),
            rule.severity().as_str(),
            rule.description()
        ));
    }
    output
}

fn rule_table_json() -> Result<String, AuditError> {
    let rows: Vec<serde_json::Value> = types::rules::Rule::ALL
        .iter()
        .map(|rule| {
            serde_json::json!({
                "rule": rule.number(),
                "severity": rule.severity().as_str(),
                "description": rule.description(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
