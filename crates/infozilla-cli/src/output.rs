//! Output formatting for the CLI.

use crate::commands::FileReport;
use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the reports of a batch.
    pub fn format_reports(&self, reports: &[FileReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_reports_json(reports),
            OutputFormat::Table => self.format_reports_table(reports),
            OutputFormat::Quiet => self.format_reports_quiet(reports),
        }
    }

    fn format_reports_json(&self, reports: &[FileReport]) -> Result<String> {
        Ok(serde_json::to_string_pretty(reports)?)
    }

    fn format_reports_table(&self, reports: &[FileReport]) -> Result<String> {
        if reports.iter().all(|r| r.result.is_empty()) {
            return Ok(self.info("No structural elements found."));
        }

        let mut builder = Builder::default();
        builder.push_record([
            "File", "Patches", "Hunks", "Traces", "Causes", "Talkback", "Code", "Lists", "Cleaned",
        ]);

        for report in reports {
            let counts = Counts::of(report);
            let mut row = vec![report.file.display().to_string()];
            row.extend(counts.values().iter().map(ToString::to_string));
            builder.push_record(row);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Paths of files where anything was found, one per line.
    fn format_reports_quiet(&self, reports: &[FileReport]) -> Result<String> {
        let files: Vec<String> = reports
            .iter()
            .filter(|r| !r.result.is_empty())
            .map(|r| r.file.display().to_string())
            .collect();
        Ok(files.join("\n"))
    }

    /// One `;`-separated record:
    /// `file;patches;hunks;traces;causes;talkback;regions;enumerations;cleaned_len`
    pub fn summary_record(&self, report: &FileReport) -> String {
        let mut fields = vec![report.file.display().to_string()];
        fields.extend(Counts::of(report).values().iter().map(ToString::to_string));
        fields.join(";")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Per-file artifact counts, in table and summary column order.
struct Counts {
    patches: usize,
    hunks: usize,
    traces: usize,
    causes: usize,
    talkback: usize,
    regions: usize,
    enumerations: usize,
    cleaned_len: usize,
}

impl Counts {
    fn of(report: &FileReport) -> Self {
        let result = &report.result;
        Self {
            patches: result.patches.len(),
            hunks: result.hunk_count(),
            traces: result.stack_traces.len(),
            causes: result.cause_count(),
            talkback: result.talkback_traces.len(),
            regions: result.code_regions.len(),
            enumerations: result.enumerations.len(),
            cleaned_len: result.cleaned_text.len(),
        }
    }

    fn values(&self) -> [usize; 8] {
        [
            self.patches,
            self.hunks,
            self.traces,
            self.causes,
            self.talkback,
            self.regions,
            self.enumerations,
            self.cleaned_len,
        ]
    }
}
