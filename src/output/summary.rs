use std::fmt::Write;

use anyhow::Result;
use comfy_table::{Cell, Color as TableColor};

use crate::config::OutputFormat;
use crate::report::{Cancellation, DedupReport};

use super::exports::export_json;
use super::styling::bright;
use super::tables::{color_coded_outcome_cell, create_table};

pub const NO_DUPLICATES_MESSAGE: &str = "All is well, no duplicate pipelines found!";
pub const DONE_MESSAGE: &str = "Done!";

/// Prints run progress and the final summary.
///
/// Text lines go to stdout. In JSON mode they move to stderr so stdout only
/// carries the report document.
pub struct Reporter {
    format: OutputFormat,
    pretty: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }

    pub fn heading(&self, branch: &str) {
        self.line(&render_heading(branch));
    }

    pub fn cancellation(&self, cancellation: &Cancellation) {
        self.line(&render_cancellation(cancellation));
    }

    pub fn finish(&self, report: &DedupReport) -> Result<()> {
        if let Some(table) = render_table(report) {
            eprintln!("{table}");
        }

        match self.format {
            OutputFormat::Text => {
                println!("{}", render_closing(report));
                Ok(())
            }
            OutputFormat::Json => {
                eprintln!("{}", render_closing(report));
                export_json(report, self.pretty, &mut std::io::stdout().lock())
            }
        }
    }

    fn line(&self, text: &str) {
        match self.format {
            OutputFormat::Text => println!("{text}"),
            OutputFormat::Json => eprintln!("{text}"),
        }
    }
}

fn render_heading(branch: &str) -> String {
    format!("Looking for duplicate {branch} pipelines to terminate")
}

fn render_cancellation(cancellation: &Cancellation) -> String {
    format!(
        ". Terminating build number {}, uuid \"{}\"\t{}",
        cancellation.build_number, cancellation.pipeline_id, cancellation.message
    )
}

fn render_closing(report: &DedupReport) -> String {
    if report.found_duplicates() {
        DONE_MESSAGE.to_string()
    } else {
        NO_DUPLICATES_MESSAGE.to_string()
    }
}

fn render_table(report: &DedupReport) -> Option<String> {
    if !report.found_duplicates() {
        return None;
    }

    let mut output = String::new();
    let title = if report.dry_run {
        "Duplicates (dry run)"
    } else {
        "Duplicates"
    };
    let _ = writeln!(output, "{} {}", bright("🧹"), bright(title).underlined());

    let mut table = create_table();
    table.set_header(
        ["Build", "UUID", "State", "Outcome"]
            .iter()
            .map(|label| Cell::new(*label).fg(TableColor::Cyan))
            .collect::<Vec<_>>(),
    );

    for cancellation in &report.cancellations {
        table.add_row(vec![
            Cell::new(format!("#{}", cancellation.build_number)),
            Cell::new(&cancellation.pipeline_id),
            Cell::new(&cancellation.state_name),
            color_coded_outcome_cell(cancellation),
        ]);
    }

    output.push_str(&table.to_string());
    let _ = write!(
        output,
        "\n  stopped: {}  failed: {}",
        report.stopped_count(),
        report.failed_count()
    );

    Some(output)
}
