use anyhow::Result;
use std::io::Write;

use crate::report::DedupReport;

/// Writes the run report as JSON for machine consumption.
pub fn export_json(report: &DedupReport, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}
