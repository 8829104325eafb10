use std::path::{Path, PathBuf};

use clap::Parser;
use revizie::{
    Config, Report,
    export::{CommandRenderer, try_export},
};
use tracing::instrument;

use super::terminal::{Colorize, spinner};

#[derive(Debug, Parser)]
#[command(about = "Export a report to PDF")]
pub struct Export {
    /// The report id or report number
    report: String,

    /// Directory the PDF is written to
    #[arg(long, short, default_value = ".")]
    dir: PathBuf,
}

impl Export {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = super::load_config(root);
        let store = super::open_store(root);
        let report = super::resolve(&store, &self.report)?;
        export_with_progress(report, &config, &self.dir);
        Ok(())
    }
}

/// Exports `report` while showing a spinner.
///
/// Failures are logged by the export pipeline and only reported here as a
/// missing path.
pub fn export_with_progress(report: &Report, config: &Config, dir: &Path) -> Option<PathBuf> {
    let progress = spinner("Generujem PDF...");
    let renderer = CommandRenderer::from_config(config);
    let path = try_export(report, super::today(), dir, &renderer);
    progress.finish_and_clear();

    if let Some(path) = &path {
        println!("{}", format!("Saved {}", path.display()).success());
    }
    path
}
