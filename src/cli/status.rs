use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Parser;
use revizie::{Report, ReportKind, Status as InspectionStatus, StatusCounts};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

/// Reports needing attention listed under the counters.
const MAX_ATTENTION_DISPLAY: usize = 10;

#[derive(Debug, Parser, Default)]
#[command(about = "Show inspection status counts")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = super::open_store(root);
        let now = Utc::now();
        let counts = store.counts(now);

        if counts.total == 0 {
            println!("No reports yet. Create one with 'revizie new TNS'.");
            return Ok(());
        }

        let attention: Vec<_> = store
            .reports()
            .iter()
            .filter(|report| InspectionStatus::of(report, now) != InspectionStatus::Valid)
            .collect();

        match self.output {
            OutputFormat::Json => Self::output_json(store.reports(), &counts, &attention, now)?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&counts);
                } else {
                    Self::output_table(store.reports(), &counts, &attention, now);
                }
            }
        }
        Ok(())
    }

    fn per_kind(reports: &[Report]) -> [(ReportKind, usize); 2] {
        ReportKind::ALL.map(|kind| {
            (
                kind,
                reports.iter().filter(|report| report.kind() == kind).count(),
            )
        })
    }

    fn output_json(
        reports: &[Report],
        counts: &StatusCounts,
        attention: &[&Report],
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let kinds: Vec<_> = Self::per_kind(reports)
            .iter()
            .map(|(kind, count)| json!({ "kind": kind.code(), "count": count }))
            .collect();

        let attention: Vec<_> = attention
            .iter()
            .map(|report| {
                json!({
                    "id": report.id(),
                    "reportNumber": report.header.report_number,
                    "operatorName": report.header.operator_name,
                    "nextInspectionDate": report.header.next_inspection_date,
                    "status": InspectionStatus::of(report, now).label(),
                })
            })
            .collect();

        let output = json!({
            "total": counts.total,
            "valid": counts.valid,
            "expiringSoon": counts.expiring_soon,
            "expired": counts.expired,
            "kinds": kinds,
            "attention": attention,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(counts: &StatusCounts) {
        println!(
            "total={} valid={} expiring={} expired={}",
            counts.total, counts.valid, counts.expiring_soon, counts.expired
        );
    }

    fn output_table(
        reports: &[Report],
        counts: &StatusCounts,
        attention: &[&Report],
        now: DateTime<Utc>,
    ) {
        let narrow = is_narrow();

        println!("Inspection status");
        println!("{}", "─────────────────".dim());

        let rows = [
            ("Celkom revízií", counts.total.to_string().strong()),
            ("Platné", counts.valid.to_string().success()),
            ("Končiace (30 dní)", counts.expiring_soon.to_string().warning()),
            ("Po termíne", counts.expired.to_string().danger()),
        ];
        if narrow {
            for (label, count) in rows {
                println!("{label}: {count}");
            }
        } else {
            for (label, count) in rows {
                println!("{label:<20} {count}");
            }
        }

        println!();
        for (kind, count) in Self::per_kind(reports) {
            println!("{:<20} {count}", kind.label().dim());
        }

        if attention.is_empty() {
            println!("\nAll inspections are valid ✅");
            return;
        }

        println!();
        println!("Needs attention ⚠️");
        for report in attention.iter().take(MAX_ATTENTION_DISPLAY) {
            let status = InspectionStatus::of(report, now);
            println!(
                "  - {} {} ({})",
                report.header.next_inspection_date,
                report.header.report_number,
                report.header.operator_name
            );
            println!("    {}", status.label().status(status));
        }
        if attention.len() > MAX_ATTENTION_DISPLAY {
            println!(
                "  - ... and {} more",
                attention.len() - MAX_ATTENTION_DISPLAY
            );
        }
        println!("{}", "Run 'revizie list' to see every report.".dim());
    }
}
