use std::path::{Path, PathBuf};

use clap::Parser;
use revizie::{
    Config, Report, Step,
    domain::steps::content,
    extract::{ExtractError, GeminiExtractor, Image, scan},
};
use tracing::instrument;

use super::terminal::{Colorize, spinner};

#[derive(Debug, Parser)]
#[command(about = "Fill technical data from a nameplate photo")]
pub struct Scan {
    /// The report id or report number
    report: String,

    /// Photo of the nameplate or of a previous inspection report
    image: PathBuf,
}

impl Scan {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = super::load_config(root);
        let mut store = super::open_store(root);
        let mut report = super::resolve(&store, &self.report)?.clone();
        if !content(report.kind()).offers_scan(Step::Technical) {
            anyhow::bail!(
                "Nameplate scanning is not available for {} reports",
                report.kind().code()
            );
        }

        let merged = scan_with_progress(&mut report, &self.image, &config)?;
        if merged == 0 {
            println!("{}", "Nothing was read from the photo".warning());
            return Ok(());
        }

        let saved = store.upsert(report)?;
        println!(
            "{}",
            format!(
                "Filled {merged} field(s) of {}",
                saved.header.report_number
            )
            .success()
        );
        Ok(())
    }
}

/// Reads `image` and merges the extracted fields into `report` while showing
/// a spinner. On error `report` is left as it was.
pub fn scan_with_progress(
    report: &mut Report,
    image: &Path,
    config: &Config,
) -> Result<usize, ExtractError> {
    let extractor = GeminiExtractor::from_config(config)?;
    let image = Image::load(image)?;

    let progress = spinner("Analyzujem štítok...");
    let result = scan(report, &image, &extractor);
    progress.finish_and_clear();
    result
}
