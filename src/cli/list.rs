use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use regex::Regex;
use revizie::{Report, ReportKind, Status};
use serde::Serialize;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

/// Command arguments for `revizie list`.
#[derive(Debug, Parser)]
#[command(about = "List reports, newest first")]
pub struct List {
    /// Case-insensitive match against operator, report number, serial number
    /// and site name.
    #[arg(conflicts_with = "regex")]
    term: Option<String>,

    /// Regular expression match against operator, site and report number.
    #[arg(long)]
    regex: Option<String>,

    /// Filter by report kind (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "KIND")]
    kind: Vec<ReportKind>,

    /// Filter by inspection status (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',', value_name = "STATUS")]
    status: Vec<StatusFilter>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,

    /// Limit number of rows returned.
    #[arg(long)]
    limit: Option<usize>,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Inspection statuses selectable on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum StatusFilter {
    Valid,
    Expiring,
    Expired,
}

impl StatusFilter {
    const fn status(self) -> Status {
        match self {
            Self::Valid => Status::Valid,
            Self::Expiring => Status::ExpiringSoon,
            Self::Expired => Status::Expired,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Row<'a> {
    id: &'a str,
    report_number: &'a str,
    kind: &'static str,
    operator_name: &'a str,
    site_name: &'a str,
    equipment: &'a str,
    report_date: String,
    next_inspection_date: String,
    status: &'static str,
    #[serde(skip)]
    state: Status,
}

impl<'a> Row<'a> {
    fn new(report: &'a Report, now: DateTime<Utc>) -> Self {
        let state = Status::of(report, now);
        Self {
            id: report.id().as_str(),
            report_number: &report.header.report_number,
            kind: report.kind().code(),
            operator_name: &report.header.operator_name,
            site_name: &report.header.site_name,
            equipment: report.equipment_label(),
            report_date: report.header.report_date.to_string(),
            next_inspection_date: report.header.next_inspection_date.to_string(),
            status: state.label(),
            state,
        }
    }
}

struct Filters {
    regex: Option<Regex>,
    kinds: Vec<ReportKind>,
    statuses: Vec<Status>,
}

impl Filters {
    fn new(cmd: &List) -> anyhow::Result<Self> {
        let regex = if let Some(pattern) = &cmd.regex {
            Some(Regex::new(pattern).with_context(|| format!("invalid regex: {pattern}"))?)
        } else {
            None
        };
        Ok(Self {
            regex,
            kinds: cmd.kind.clone(),
            statuses: cmd.status.iter().map(|s| s.status()).collect(),
        })
    }

    fn matches(&self, report: &Report, now: DateTime<Utc>) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&report.kind()) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&Status::of(report, now)) {
            return false;
        }
        if let Some(regex) = &self.regex {
            let haystack = format!(
                "{}\n{}\n{}",
                report.header.operator_name, report.header.site_name, report.header.report_number
            );
            if !regex.is_match(&haystack) {
                return false;
            }
        }
        true
    }
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = super::open_store(root);
        let filters = Filters::new(&self)?;
        let now = Utc::now();

        let rows: Vec<_> = store
            .search(self.term.as_deref().unwrap_or_default())
            .filter(|report| filters.matches(report, now))
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|report| Row::new(report, now))
            .collect();

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            OutputFormat::Table => render_table(&rows, self.quiet),
        }
        Ok(())
    }
}

fn render_table(rows: &[Row<'_>], quiet: bool) {
    if rows.is_empty() {
        if !quiet {
            println!("{}", "Nenašli sa žiadne záznamy.".dim());
        }
        return;
    }

    if quiet {
        for row in rows {
            println!(
                "{}\t{}\t{}\t{}",
                row.id, row.report_number, row.kind, row.next_inspection_date
            );
        }
        return;
    }

    if is_narrow() {
        for row in rows {
            println!("{} {}", row.report_number.strong(), row.kind.dim());
            println!("  {} – {}", row.operator_name, row.site_name);
            println!("  {}", row.equipment);
            println!(
                "  {} {}",
                row.next_inspection_date,
                row.status.status(row.state)
            );
        }
        return;
    }

    println!(
        "{}",
        format!(
            "{:<16} {:<4} {:<28} {:<24} {:<11} Stav",
            "Číslo", "Typ", "Prevádzkovateľ", "Zariadenie", "Ďalšia rev."
        )
        .info()
    );
    for row in rows {
        println!(
            "{:<16} {:<4} {:<28} {:<24} {:<11} {}",
            truncate(row.report_number, 16),
            row.kind,
            truncate(row.operator_name, 28),
            truncate(row.equipment, 24),
            row.next_inspection_date,
            row.status.status(row.state)
        );
    }
    println!("{}", format!("{} report(s)", rows.len()).dim());
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut short: String = value.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
