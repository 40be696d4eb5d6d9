use anisync_core::{CycleSummary, ItemOutcome};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", "✓".green().to_string(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.print_json(&json!({ "type": "info", "message": msg.as_ref() })),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", "⚠".yellow().to_string(), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "error", "message": msg.as_ref() })),
        }
    }

    fn message(&self, kind: &str, symbol: String, msg: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", symbol, msg),
            _ => self.print_json(&json!({ "type": kind, "message": msg })),
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default())
            }
            _ => println!("{}", serde_json::to_string(data).unwrap_or_default()),
        }
    }

    /// Print the result of one sync cycle
    pub fn summary(&self, summary: &CycleSummary) {
        match self.format {
            OutputFormat::Human => {
                if self.quiet {
                    return;
                }
                if !summary.items.is_empty() {
                    println!("{}", summary_table(summary));
                }
                let verb = if summary.dry_run { "would be updated" } else { "updated" };
                let line = format!(
                    "Sync completed in {:.1}s: {} {}, {} unchanged, {} skipped, {} rejected, {} failed",
                    summary.duration.as_secs_f64(),
                    summary.updated(),
                    verb,
                    summary.unchanged(),
                    summary.skipped(),
                    summary.rejected(),
                    summary.failed()
                );
                if summary.has_errors() {
                    self.warn(line);
                } else {
                    self.success(line);
                }
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let value = serde_json::to_value(summary).unwrap_or_default();
                self.json(&json!({ "type": "summary", "summary": value }));
            }
        }
    }
}

fn outcome_cells(outcome: &ItemOutcome) -> (&'static str, String) {
    match outcome {
        ItemOutcome::Updated { fields, .. } => ("updated", fields.join(", ")),
        ItemOutcome::Planned { fields } => ("planned", fields.join(", ")),
        ItemOutcome::Unchanged => ("unchanged", String::new()),
        ItemOutcome::Skipped { reason } => ("skipped", reason.clone()),
        ItemOutcome::Rejected { message } => ("rejected", message.clone()),
        ItemOutcome::Failed { message } => ("failed", message.clone()),
    }
}

fn summary_table(summary: &CycleSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Title", "AniList", "Result", "Details"]);

    for item in &summary.items {
        let (result, details) = outcome_cells(&item.outcome);
        table.add_row(vec![
            item.slug.clone(),
            item.site_url.clone().unwrap_or_default(),
            result.to_string(),
            details,
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use anisync_core::ItemReport;
    use std::time::Duration;

    #[test]
    fn test_summary_table_lists_every_item() {
        let summary = CycleSummary {
            started_at: chrono::Utc::now(),
            duration: Duration::from_secs(4),
            dry_run: false,
            pauses: 1,
            items: vec![
                ItemReport {
                    slug: "frieren-1a2b3c".to_string(),
                    site_url: Some("https://anilist.co/anime/154587".to_string()),
                    outcome: ItemOutcome::Updated { entry_id: 1, fields: vec!["status", "progress"] },
                },
                ItemReport {
                    slug: "orphan".to_string(),
                    site_url: None,
                    outcome: ItemOutcome::Skipped { reason: "no AniList entry".to_string() },
                },
            ],
        };

        let rendered = summary_table(&summary).to_string();
        assert!(rendered.contains("frieren-1a2b3c"));
        assert!(rendered.contains("status, progress"));
        assert!(rendered.contains("no AniList entry"));
    }
}
