#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Apply a document of IMAP mailbox operations

use clap::Parser;
use mail_org::{EntryReport, ImapConfig, Outcome, RunReport, Script, Stats};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mail-org")]
#[command(about = "Move, delete and download mail in bulk over IMAP")]
struct Args {
    /// Operation document to apply
    #[arg(short = 'c', long, default_value = "mail-org.json")]
    config_file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Validate the document and list its operations without connecting
    #[arg(long, visible_alias = "check")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let script = Script::load(&args.config_file).await?;

    if args.dry_run {
        return print_script(&script, args.json);
    }

    let config = ImapConfig::from_env()?;
    let report = mail_org::run(&config, &script).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_script(script: &Script, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let entries: Vec<_> = script
            .entries()
            .iter()
            .map(|entry| match &entry.operation {
                Ok(op) => json!({ "index": entry.index, "operation": op }),
                Err(e) => json!({ "index": entry.index, "error": e.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if script.is_empty() {
        println!("No operations.");
        return Ok(());
    }

    for entry in script.entries() {
        match &entry.operation {
            Ok(op) => println!(
                "#{:<4} {:<10} {}",
                entry.index,
                op.kind(),
                serde_json::to_string(op)?
            ),
            Err(e) => println!("#{:<4} {:<10} {e}", entry.index, "invalid"),
        }
    }
    println!(
        "\n{} operation(s), {} invalid",
        script.operations().count(),
        script.len() - script.operations().count()
    );
    Ok(())
}

fn print_report(report: &RunReport) {
    if report.entries.is_empty() {
        println!("No operations.");
        return;
    }

    println!("{:<6} {:<9} {}", "#", "Status", "Details");
    println!("{}", "-".repeat(60));

    for EntryReport { index, outcome } in &report.entries {
        match outcome {
            Outcome::Applied { stats } => {
                println!("{index:<6} {:<9} {}", "applied", describe(stats));
            }
            Outcome::Skipped { reason } => {
                println!("{index:<6} {:<9} {reason}", "skipped");
            }
        }
    }

    println!(
        "\n{} applied, {} skipped",
        report.applied(),
        report.skipped()
    );
}

fn describe(stats: &Stats) -> String {
    match stats {
        Stats::Delete(s) => format!("delete: {} of {} deleted", s.deleted, s.matched),
        Stats::Move(s) => {
            let mut line = format!(
                "move: {} of {} moved ({})",
                s.moved,
                s.matched,
                if s.native { "MOVE" } else { "COPY + delete" }
            );
            if s.copy_failures > 0 {
                line.push_str(&format!(", {} copy failure(s)", s.copy_failures));
            }
            line
        }
        Stats::Download(s) => {
            let mut line = format!("download: {} of {} written", s.downloaded, s.listed);
            if s.stopped_at_existing {
                line.push_str(", stopped at an earlier download");
            }
            line
        }
    }
}
