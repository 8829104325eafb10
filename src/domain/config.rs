use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Report, ReportKind};

/// Local settings of the report editor.
///
/// These fill in new drafts and select the external collaborators used for
/// PDF export and nameplate extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Technician name written into new drafts.
    pub technician_name: String,

    /// License number written into new pressure vessel drafts.
    pub tns_license: String,

    /// License number written into new gas installation drafts.
    pub gz_license: String,

    /// HTML-to-PDF converter program.
    pub pdf_program: String,

    /// Arguments passed to the converter.
    ///
    /// `{input}` and `{output}` are replaced by the HTML and PDF paths.
    pub pdf_args: Vec<String>,

    /// Model used for nameplate extraction.
    pub extraction_model: String,

    /// Environment variable holding the extraction API key.
    pub api_key_var: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            technician_name: default_technician(),
            tns_license: default_tns_license(),
            gz_license: default_gz_license(),
            pdf_program: default_pdf_program(),
            pdf_args: default_pdf_args(),
            extraction_model: default_model(),
            api_key_var: default_api_key_var(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// License number configured for a report kind.
    #[must_use]
    pub fn license(&self, kind: ReportKind) -> &str {
        match kind {
            ReportKind::PressureVessel => &self.tns_license,
            ReportKind::GasInstallation => &self.gz_license,
        }
    }

    /// Creates a draft carrying the configured technician.
    #[must_use]
    pub fn draft(&self, kind: ReportKind, today: NaiveDate) -> Report {
        let mut report = Report::draft(kind, today);
        report.header.technician_name.clone_from(&self.technician_name);
        report.header.technician_license = self.license(kind).to_string();
        report
    }
}

fn default_technician() -> String {
    "Ing. Jozef Revízny".to_string()
}

fn default_tns_license() -> String {
    ReportKind::PressureVessel.default_license().to_string()
}

fn default_gz_license() -> String {
    ReportKind::GasInstallation.default_license().to_string()
}

fn default_pdf_program() -> String {
    "wkhtmltopdf".to_string()
}

fn default_pdf_args() -> Vec<String> {
    [
        "--quiet",
        "--page-size",
        "A4",
        "--orientation",
        "Portrait",
        "--margin-top",
        "10mm",
        "--margin-bottom",
        "10mm",
        "--margin-left",
        "10mm",
        "--margin-right",
        "10mm",
        "{input}",
        "{output}",
    ]
    .map(String::from)
    .to_vec()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_var() -> String {
    "GEMINI_API_KEY".to_string()
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_technician")]
        technician_name: String,

        #[serde(default = "default_tns_license")]
        tns_license: String,

        #[serde(default = "default_gz_license")]
        gz_license: String,

        #[serde(default = "default_pdf_program")]
        pdf_program: String,

        #[serde(default = "default_pdf_args")]
        pdf_args: Vec<String>,

        #[serde(default = "default_model")]
        extraction_model: String,

        #[serde(default = "default_api_key_var")]
        api_key_var: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                technician_name,
                tns_license,
                gz_license,
                pdf_program,
                pdf_args,
                extraction_model,
                api_key_var,
            } => Self {
                technician_name,
                tns_license,
                gz_license,
                pdf_program,
                pdf_args,
                extraction_model,
                api_key_var,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            technician_name: config.technician_name,
            tns_license: config.tns_license,
            gz_license: config.gz_license,
            pdf_program: config.pdf_program,
            pdf_args: config.pdf_args,
            extraction_model: config.extraction_model,
            api_key_var: config.api_key_var,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            "_version = \"1\"\ntechnician_name = \"Ing. Mária Kováčová\"\ngz_license = \"017/2023/RT-PZ\"\npdf_program = \"chromium\"\n"
                .as_bytes(),
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.technician_name, "Ing. Mária Kováčová");
        assert_eq!(config.license(ReportKind::GasInstallation), "017/2023/RT-PZ");
        assert_eq!(config.license(ReportKind::PressureVessel), "001/2024/TNS");
        assert_eq!(config.pdf_program, "chromium");
        assert_eq!(config.pdf_args, default_pdf_args());
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\npdf_args = \"--quiet\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, Config::default());
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            extraction_model: "gemini-2.0-flash".to_string(),
            ..Config::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn draft_uses_configured_technician() {
        let config = Config {
            technician_name: "Ing. Peter Novák".to_string(),
            tns_license: "042/2022/TNS".to_string(),
            ..Config::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        let draft = config.draft(ReportKind::PressureVessel, today);

        assert_eq!(draft.header.technician_name, "Ing. Peter Novák");
        assert_eq!(draft.header.technician_license, "042/2022/TNS");
    }
}
