//! PDF export of rendered reports.
//!
//! The page is rendered to HTML and handed to a [`PdfRenderer`]. The default
//! renderer runs an external HTML-to-PDF converter.

use std::{
    io::{self, Write as _},
    path::{Path, PathBuf},
    process::{self, ExitStatus},
};

use chrono::NaiveDate;

use crate::{Config, Report, render};

/// Errors from producing a PDF.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The intermediate HTML could not be written.
    #[error("failed to write the page: {0}")]
    Io(#[from] io::Error),

    /// The page template failed to render.
    #[error("failed to render the page: {0}")]
    Template(#[from] askama::Error),

    /// The converter could not be started.
    #[error("failed to launch '{program}': {source}")]
    Launch {
        /// The converter program.
        program: String,
        /// Why it could not be started.
        source: io::Error,
    },

    /// The converter ran but reported failure.
    #[error("'{program}' failed ({status}): {stderr}")]
    Failed {
        /// The converter program.
        program: String,
        /// Its exit status.
        status: ExitStatus,
        /// What it printed on stderr.
        stderr: String,
    },

    /// The converter succeeded but produced no file.
    #[error("no PDF was written to {}", .0.display())]
    Missing(PathBuf),
}

/// Converts an HTML page to a PDF file.
pub trait PdfRenderer {
    /// Writes `html` as a PDF to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF cannot be produced.
    fn render_pdf(&self, html: &str, output: &Path) -> Result<(), ExportError>;
}

/// Runs an external converter such as `wkhtmltopdf`.
///
/// Arguments may contain `{input}` and `{output}`, which are replaced by the
/// paths of the HTML page and the PDF file.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    /// Creates a renderer running `program` with `args`.
    #[must_use]
    pub const fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// The converter configured in `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pdf_program.clone(), config.pdf_args.clone())
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect()
    }
}

impl PdfRenderer for CommandRenderer {
    fn render_pdf(&self, html: &str, output: &Path) -> Result<(), ExportError> {
        let mut page = tempfile::Builder::new()
            .prefix("revizia-")
            .suffix(".html")
            .tempfile()?;
        page.write_all(html.as_bytes())?;
        page.flush()?;

        let args = self.args(page.path(), output);
        tracing::debug!("Running {} {}", self.program, args.join(" "));

        let result = process::Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ExportError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ExportError::Failed {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        if !output.exists() {
            return Err(ExportError::Missing(output.to_path_buf()));
        }
        Ok(())
    }
}

/// File name of the exported PDF.
///
/// Path separators in the report number become `-`; the first ten
/// characters of the operator name follow, with whitespace runs replaced by
/// `_`.
#[must_use]
pub fn pdf_filename(report: &Report) -> String {
    let number = report.header.report_number.replace(['/', '\\'], "-");
    let mut operator = String::new();
    let mut in_run = false;
    for c in report.header.operator_name.chars().take(10) {
        if c.is_whitespace() {
            if !in_run {
                operator.push('_');
            }
            in_run = true;
        } else {
            operator.push(c);
            in_run = false;
        }
    }
    format!("Revizia_{number}_{operator}.pdf")
}

/// Renders a report and writes it as a PDF into `dir`.
///
/// # Errors
///
/// Returns an error if the page cannot be rendered or the renderer fails.
#[tracing::instrument(level = "debug", skip(report, renderer), fields(number = %report.header.report_number))]
pub fn export_pdf(
    report: &Report,
    today: NaiveDate,
    dir: &Path,
    renderer: &dyn PdfRenderer,
) -> Result<PathBuf, ExportError> {
    let output = dir.join(pdf_filename(report));
    let html = render(report, today).to_html()?;
    renderer.render_pdf(&html, &output)?;
    tracing::info!("Exported {}", output.display());
    Ok(output)
}

/// As [`export_pdf`], but failures are logged and reported as `None`.
pub fn try_export(
    report: &Report,
    today: NaiveDate,
    dir: &Path,
    renderer: &dyn PdfRenderer,
) -> Option<PathBuf> {
    export_pdf(report, today, dir, renderer)
        .map_err(|e| tracing::error!("PDF generation failed: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::ReportKind;

    fn report(number: &str, operator: &str) -> Report {
        let mut report = Report::draft(
            ReportKind::PressureVessel,
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
        );
        report.header.report_number = number.to_string();
        report.header.operator_name = operator.to_string();
        report
    }

    #[derive(Default)]
    struct Recording {
        pages: RefCell<Vec<String>>,
    }

    impl PdfRenderer for Recording {
        fn render_pdf(&self, html: &str, output: &Path) -> Result<(), ExportError> {
            self.pages.borrow_mut().push(html.to_string());
            std::fs::write(output, b"%PDF-1.4")?;
            Ok(())
        }
    }

    struct Broken;

    impl PdfRenderer for Broken {
        fn render_pdf(&self, _html: &str, output: &Path) -> Result<(), ExportError> {
            Err(ExportError::Missing(output.to_path_buf()))
        }
    }

    #[test]
    fn filename_replaces_separators_and_whitespace() {
        assert_eq!(
            pdf_filename(&report("TNS-2024/042", "Volkswagen Slovakia, a.s.")),
            "Revizia_TNS-2024-042_Volkswagen.pdf"
        );
        assert_eq!(
            pdf_filename(&report(r"GZ\2024/7", "Bytové  družstvo")),
            "Revizia_GZ-2024-7_Bytové_dr.pdf"
        );
        assert_eq!(pdf_filename(&report("", "")), "Revizia__.pdf");
    }

    #[test]
    fn export_writes_named_pdf() {
        let tmp = tempfile::tempdir().unwrap();
        let renderer = Recording::default();
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();

        let path = export_pdf(&report("TNS-2024/001", "ACME"), today, tmp.path(), &renderer)
            .unwrap();

        assert_eq!(path, tmp.path().join("Revizia_TNS-2024-001_ACME.pdf"));
        assert!(path.exists());
        let pages = renderer.pages.borrow();
        assert!(pages[0].contains("TNS-2024/001"));
    }

    #[test]
    fn failed_export_is_reported_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();

        let result = try_export(&report("X", "Y"), today, tmp.path(), &Broken);

        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_converter_fails_to_launch() {
        let tmp = tempfile::tempdir().unwrap();
        let renderer = CommandRenderer::new(
            "revizie-no-such-converter".to_string(),
            vec!["{input}".to_string(), "{output}".to_string()],
        );

        let error = renderer
            .render_pdf("<html></html>", &tmp.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(error, ExportError::Launch { .. }));
    }

    #[test]
    fn placeholders_are_substituted() {
        let renderer = CommandRenderer::new(
            "wkhtmltopdf".to_string(),
            vec!["--quiet".to_string(), "{input}".to_string(), "out={output}".to_string()],
        );

        let args = renderer.args(Path::new("/tmp/a.html"), Path::new("/tmp/b.pdf"));
        assert_eq!(args, ["--quiet", "/tmp/a.html", "out=/tmp/b.pdf"]);
    }
}
