/*!
 * Reporting functionality for filemap
 *
 * Renders a flattened listing either as console tables, using the tabled
 * library, or as JSON records.
 */

use std::time::Duration;

use clap::ValueEnum;
use strum::Display;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::Result;
use crate::listing::EntrySummary;
use crate::types::FlattenedFileMapItem;
use crate::utils::format_number;

/// A finished listing and how long it took
#[derive(Debug, Clone)]
pub struct ListingReport<'a> {
    /// Directory that was walked
    pub directory: String,
    /// Time taken to walk and resolve
    pub duration: Duration,
    /// Flattened records in listing order
    pub records: &'a [FlattenedFileMapItem<EntrySummary>],
}

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// Console tables
    #[default]
    Table,
    /// Flattened records as pretty-printed JSON
    Json,
}

/// Report generator for listings
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string for a listing
    pub fn generate_report(&self, report: &ListingReport<'_>) -> Result<String> {
        match self.format {
            ReportFormat::Table => Ok(self.generate_console_report(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report.records)?),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ListingReport<'_>) -> Result<()> {
        let output = self.generate_report(report)?;
        match self.format {
            ReportFormat::Table => println!("\n{}", output),
            ReportFormat::Json => println!("{}", output),
        }
        Ok(())
    }

    // Indent by depth so the tree shape stays visible in pre-order
    fn display_name(&self, record: &FlattenedFileMapItem<EntrySummary>) -> String {
        let depth = record.path_parts.len().saturating_sub(1);
        let name = record.path_parts.last().map(String::as_str).unwrap_or("");
        let suffix = if record.children_indices.is_some() { "/" } else { "" };
        format!("{}{}{}", "  ".repeat(depth), name, suffix)
    }

    fn create_entries_table(&self, report: &ListingReport<'_>) -> String {
        #[derive(Tabled)]
        struct EntryRow {
            #[tabled(rename = "#")]
            index: usize,

            #[tabled(rename = "Entry")]
            name: String,

            #[tabled(rename = "Parent")]
            parent: String,

            #[tabled(rename = "Title")]
            title: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Words")]
            words: String,
        }

        let rows: Vec<EntryRow> = report
            .records
            .iter()
            .map(|record| EntryRow {
                index: record.index,
                name: self.display_name(record),
                parent: record
                    .parent_index
                    .map_or_else(|| "-".to_string(), |p| p.to_string()),
                title: match &record.data.error {
                    Some(_) => "⚠️ parse error".to_string(),
                    None => record.data.title.clone().unwrap_or_default(),
                },
                lines: format_number(record.data.lines),
                words: format_number(record.data.words),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_summary_table(&self, report: &ListingReport<'_>) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let directories = report
            .records
            .iter()
            .filter(|r| r.children_indices.is_some())
            .count();
        let errors = report
            .records
            .iter()
            .filter(|r| r.data.error.is_some())
            .count();
        let lines: usize = report.records.iter().map(|r| r.data.lines).sum();
        let words: usize = report.records.iter().map(|r| r.data.words).sum();

        let mut rows = vec![
            SummaryRow {
                key: "📂 Directory".to_string(),
                value: report.directory.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🗂️ Directories".to_string(),
                value: format_number(directories),
            },
            SummaryRow {
                key: "📄 Files".to_string(),
                value: format_number(report.records.len() - directories),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: format_number(lines),
            },
            SummaryRow {
                key: "🔤 Total Words".to_string(),
                value: format_number(words),
            },
        ];
        if errors > 0 {
            rows.push(SummaryRow {
                key: "⚠️ Parse Errors".to_string(),
                value: format_number(errors),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ListingReport<'_>) -> String {
        let entries_table = self.create_entries_table(report);
        let summary_table = self.create_summary_table(report);

        format!(
            "{}\n{}\n\n{}\n{}",
            "📋  FILE MAP", entries_table, "✅  SUMMARY", summary_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        path: &str,
        index: usize,
        parent_index: Option<usize>,
        children_indices: Option<Vec<usize>>,
        data: EntrySummary,
    ) -> FlattenedFileMapItem<EntrySummary> {
        FlattenedFileMapItem {
            path_parts: path.split('/').map(str::to_string).collect(),
            path: path.to_string(),
            data,
            index,
            parent_index,
            children_indices,
        }
    }

    fn records() -> Vec<FlattenedFileMapItem<EntrySummary>> {
        vec![
            record(
                "guide",
                0,
                None,
                Some(vec![1]),
                EntrySummary {
                    title: Some("Guide".to_string()),
                    lines: 3,
                    words: 10,
                    error: None,
                },
            ),
            record(
                "guide/setup",
                1,
                Some(0),
                None,
                EntrySummary {
                    error: Some("unterminated front matter at line 1: x".to_string()),
                    ..Default::default()
                },
            ),
        ]
    }

    fn report(records: &[FlattenedFileMapItem<EntrySummary>]) -> ListingReport<'_> {
        ListingReport {
            directory: "site".to_string(),
            duration: Duration::from_millis(5),
            records,
        }
    }

    #[test]
    fn test_table_report() {
        let records = records();
        let output = Reporter::new(ReportFormat::Table)
            .generate_report(&report(&records))
            .unwrap();
        assert!(output.contains("FILE MAP"));
        assert!(output.contains("guide/"));
        assert!(output.contains("  setup"));
        assert!(output.contains("Guide"));
        assert!(output.contains("Parse Errors"));
    }

    #[test]
    fn test_json_report() {
        let records = records();
        let output = Reporter::new(ReportFormat::Json)
            .generate_report(&report(&records))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["path"], "guide");
        assert_eq!(value[0]["childrenIndices"][0], 1);
        assert_eq!(value[1]["parentIndex"], 0);
        assert!(value[1].get("childrenIndices").is_none());
        assert_eq!(value[0]["data"]["title"], "Guide");
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ReportFormat::Json.to_string(), "json");
    }
}
