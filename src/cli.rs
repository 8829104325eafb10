use std::path::{Path, PathBuf};

mod export;
mod list;
mod scan;
mod show;
mod status;
mod terminal;
mod wizard;

use chrono::{Local, Utc};
use clap::ArgAction;
use export::Export;
use list::List;
use revizie::{Config, Field, FileStore, Report, ReportKind, ReportStore};
use scan::Scan;
use show::Show;
use status::Status;
use tracing::instrument;
use wizard::Wizard;

/// Directory under the root holding the store and the configuration.
const DATA_DIR: &str = ".revizie";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The directory holding the report store
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show inspection status counts (default)
    Status(Status),

    /// Initialize a report store with a default configuration
    Init,

    /// List reports, optionally filtered by a search term
    List(List),

    /// Create a new report
    New(New),

    /// Edit a report step by step
    Edit(Edit),

    /// Set fields of a report without prompting
    Set(Set),

    /// Show the rendered report document
    Show(Show),

    /// Export a report to PDF
    Export(Export),

    /// Fill technical data of a pressure vessel report from a nameplate photo
    Scan(Scan),

    /// Delete a report
    Delete(Delete),

    /// Replace the store contents with the demo records
    Seed(Seed),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(&root)?,
            Self::Init => Init::run(&root)?,
            Self::List(command) => command.run(&root)?,
            Self::New(command) => command.run(&root)?,
            Self::Edit(command) => command.run(&root)?,
            Self::Set(command) => command.run(&root)?,
            Self::Show(command) => command.run(&root)?,
            Self::Export(command) => command.run(&root)?,
            Self::Scan(command) => command.run(&root)?,
            Self::Delete(command) => command.run(&root)?,
            Self::Seed(command) => command.run(&root)?,
        }
        Ok(())
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join(DATA_DIR).join("config.toml")
}

/// Loads the configuration, falling back to defaults when there is none.
fn load_config(root: &Path) -> Config {
    let path = config_path(root);
    if !path.exists() {
        tracing::debug!("No configuration at {}, using defaults", path.display());
        return Config::default();
    }
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("{e}; using defaults");
        Config::default()
    })
}

fn open_store(root: &Path) -> ReportStore<FileStore> {
    ReportStore::load(FileStore::new(root.join(DATA_DIR)))
}

/// Finds a report by id or report number.
fn resolve<'a>(store: &'a ReportStore<FileStore>, key: &str) -> anyhow::Result<&'a Report> {
    store
        .find(key)
        .ok_or_else(|| anyhow::anyhow!("Report {key} not found"))
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

/// Parses `key=value` into a field and its new value.
fn parse_assignment(assignment: &str) -> Result<(Field, String), String> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, found '{assignment}'"))?;
    let field = key.trim().parse::<Field>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let data_dir = root.join(DATA_DIR);
        let config_path = config_path(root);
        if config_path.exists() {
            anyhow::bail!(
                "Store already initialized (found existing {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(&data_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {DATA_DIR} directory: {e}"))?;

        Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!(
            "{}",
            format!("Initialized report store in {}", data_dir.display()).success()
        );
        println!(
            "{}",
            "Edit config.toml to set the technician name and license numbers.".dim()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct New {
    /// The report kind (TNS or GZ)
    kind: ReportKind,

    /// Set a field without prompting (key=value, repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(Field, String)>,

    /// Save straight away instead of opening the step editor
    #[arg(long)]
    no_edit: bool,
}

impl New {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let config = load_config(root);
        let mut store = open_store(root);
        let mut draft = config.draft(self.kind, today());
        for (field, value) in &self.assignments {
            draft.set_field(*field, value)?;
        }

        if self.no_edit {
            let saved = store.upsert(draft)?;
            println!(
                "{}",
                format!("Saved {}", saved.header.report_number).success()
            );
            println!("{}", saved.id().to_string().dim());
            return Ok(());
        }

        Wizard::new(draft, &mut store, &config).run()
    }
}

#[derive(Debug, clap::Parser)]
pub struct Edit {
    /// The report id or report number
    report: String,
}

impl Edit {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = load_config(root);
        let mut store = open_store(root);
        let report = resolve(&store, &self.report)?.clone();
        Wizard::new(report, &mut store, &config).run()
    }
}

#[derive(Debug, clap::Parser)]
pub struct Set {
    /// The report id or report number
    report: String,

    /// Field assignments (key=value)
    #[arg(required = true, value_name = "KEY=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(Field, String)>,
}

impl Set {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut store = open_store(root);
        let mut report = resolve(&store, &self.report)?.clone();
        for (field, value) in &self.assignments {
            report.set_field(*field, value)?;
        }
        let saved = store.upsert(report)?;
        println!(
            "{}",
            format!(
                "Updated {} field(s) of {}",
                self.assignments.len(),
                saved.header.report_number
            )
            .success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The report id or report number
    report: String,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut store = open_store(root);
        let report = resolve(&store, &self.report)?;
        let id = report.id().clone();
        let number = report.header.report_number.clone();

        if !self.yes {
            println!(
                "Will delete {} ({}, {})",
                number.strong(),
                report.header.operator_name,
                report.equipment_label()
            );
            let confirmed = dialoguer::Confirm::new()
                .with_prompt("Naozaj chcete vymazať túto revíziu?")
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        store.remove(&id)?;
        println!("{}", format!("Deleted {number}").success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Seed {
    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Seed {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut store = open_store(root);
        if !self.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!(
                    "Replace {} stored report(s) with the demo records?",
                    store.reports().len()
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        store.seed_demo(Utc::now())?;
        println!(
            "{}",
            format!("Seeded {} demo report(s)", store.reports().len()).success()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use revizie::domain::MeasurementPoint;

    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        let (field, value) = parse_assignment("conclusion=a=b").unwrap();
        assert_eq!(field, Field::Conclusion);
        assert_eq!(value, "a=b");

        let (field, value) = parse_assignment("measurements.shellTop=5,10").unwrap();
        assert_eq!(field, Field::Measurement(MeasurementPoint::ShellTop));
        assert_eq!(value, "5,10");
    }

    #[test]
    fn assignments_reject_garbage() {
        assert!(parse_assignment("conclusion").is_err());
        assert!(parse_assignment("nonsense=1").is_err());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load_config(tmp.path()), Config::default());
    }

    #[test]
    fn init_writes_config_once() {
        let tmp = tempfile::tempdir().unwrap();
        Init::run(tmp.path()).unwrap();
        assert!(config_path(tmp.path()).exists());
        assert!(Init::run(tmp.path()).is_err());
    }

    #[test]
    fn empty_store_opens_with_demo_records() {
        let tmp = tempfile::tempdir().unwrap();
        let store = open_store(tmp.path());
        assert_eq!(store.reports().len(), 5);
        assert!(resolve(&store, "demo-1").is_ok());
        assert!(resolve(&store, "missing").is_err());
    }
}
