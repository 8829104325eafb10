use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use revizie::render;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Display the rendered report document")]
pub struct Show {
    /// The report id or report number
    report: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    output: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Plain-text preview
    #[default]
    Text,
    /// Print-ready HTML page
    Html,
    /// The stored record
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = super::open_store(root);
        let report = super::resolve(&store, &self.report)?;

        let content = match self.output {
            OutputFormat::Text => render(report, super::today()).to_text(),
            OutputFormat::Html => render(report, super::today()).to_html()?,
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
        };

        match &self.out {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("{}", format!("Wrote {}", path.display()).success());
            }
            None => println!("{content}"),
        }
        Ok(())
    }
}
