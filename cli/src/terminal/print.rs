use std::io::{self, Write};

use blackhole_common::cluster::{BlackholeStatus, StatusReport};
use colored::*;
use serde::Serialize;
use tracing::info;

pub const TOTAL_WIDTH: usize = 64;

/// Events with this target are written as is, without a level symbol.
pub const PRINT_TARGET: &str = "kube_blackhole::print";

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = console::measure_text_width(&formatted);

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

/// One `target ... valid` line per target, then its nodes as a tree.
pub fn status_summary(report: &StatusReport) {
    for (context, status) in &report.targets {
        let valid: ColoredString = if status.valid {
            "valid".green().bold()
        } else {
            "invalid".red().bold()
        };
        print(&format!("{} {}", context.bright_white().bold(), valid));

        for (i, (node, node_status)) in status.nodes.iter().enumerate() {
            let branch: ColoredString = if i + 1 == status.nodes.len() {
                "└─".bright_black()
            } else {
                "├─".bright_black()
            };
            print(&format!(" {} {} {}", branch, node, colored_status(*node_status)));
        }
    }
}

fn colored_status(status: BlackholeStatus) -> ColoredString {
    match status {
        BlackholeStatus::Blocked => status.as_str().red(),
        BlackholeStatus::PartlyBlocked => status.as_str().yellow(),
        BlackholeStatus::Unblocked => status.as_str().green(),
    }
}

#[derive(Serialize)]
struct Document<'a> {
    status: &'a StatusReport,
}

/// The machine readable report, rooted at a `status` key.
pub fn status_yaml(report: &StatusReport) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&Document { status: report })
}

/// Writes the report to stdout; everything else goes to stderr.
pub fn report(report: &StatusReport) -> anyhow::Result<()> {
    let yaml = status_yaml(report)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(yaml.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
