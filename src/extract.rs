//! Reading vessel details off a photographed nameplate.
//!
//! An image is sent to an external vision model together with a fixed
//! prompt and response schema. The fields it returns are merged into a
//! draft; fields it leaves out or empty are not touched.

use std::{
    io,
    path::{Path, PathBuf},
};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Config, Report};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Variable consulted when the configured one is unset.
pub const FALLBACK_KEY_VAR: &str = "API_KEY";

const PROMPT: &str = "Analyze this image of a pressure vessel nameplate or inspection report. \
                      Extract the technical details into JSON. If a value is missing, leave it empty.";

/// Errors from nameplate extraction. None of them modify the draft.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No API key is available.
    #[error("API key not found: set {var} or {FALLBACK_KEY_VAR}")]
    MissingCredential {
        /// The configured variable name.
        var: String,
    },

    /// The image could not be read.
    #[error("failed to read image: {0}")]
    Io(#[from] io::Error),

    /// The file type is not a supported image.
    #[error("unsupported image type: {}", .0.display())]
    UnsupportedImage(PathBuf),

    /// The request failed.
    #[error("extraction request failed: {0}")]
    Request(String),

    /// The response was not in the expected shape.
    #[error("failed to parse extraction response: {0}")]
    Parse(String),

    /// The service returned no text. Reported rather than treated as an
    /// empty merge, so the caller can tell nothing was read.
    #[error("extraction service returned no data")]
    EmptyResponse,
}

/// Image bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    bytes: Vec<u8>,
    mime_type: String,
}

impl Image {
    /// Wraps raw bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Reads an image file, inferring the MIME type from its extension.
    ///
    /// # Errors
    ///
    /// Fails on unknown extensions or if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let mime_type =
            mime_type_for(path).ok_or_else(|| ExtractError::UnsupportedImage(path.to_path_buf()))?;
        let bytes = std::fs::read(path)?;
        Ok(Self::new(bytes, mime_type))
    }

    /// The MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    };
    Some(mime)
}

/// Fields read from a nameplate. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NameplateFields {
    /// Manufacturer.
    pub manufacturer: Option<String>,
    /// Serial number.
    pub serial_number: Option<String>,
    /// Year of manufacture.
    pub year_of_manufacture: Option<String>,
    /// Volume in litres.
    pub volume_liters: Option<String>,
    /// Nominal pressure in MPa.
    pub nominal_pressure: Option<String>,
    /// Nominal temperature in °C.
    pub nominal_temp: Option<String>,
    /// Vessel type.
    pub tns_type: Option<String>,
    /// Operator printed on the plate or report.
    pub operator_name: Option<String>,
}

impl NameplateFields {
    /// Writes every present, non-empty field into `report` and returns how
    /// many were written.
    ///
    /// Vessel fields are skipped for gas installation reports.
    pub fn apply_to(&self, report: &mut Report) -> usize {
        fn merge(target: &mut String, value: Option<&String>) -> usize {
            match value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(value) => {
                    *target = value.to_string();
                    1
                }
                None => 0,
            }
        }

        let mut merged = merge(
            &mut report.header.operator_name,
            self.operator_name.as_ref(),
        );
        if let Some(vessel) = report.vessel_mut() {
            merged += merge(&mut vessel.manufacturer, self.manufacturer.as_ref());
            merged += merge(&mut vessel.serial_number, self.serial_number.as_ref());
            merged += merge(
                &mut vessel.year_of_manufacture,
                self.year_of_manufacture.as_ref(),
            );
            merged += merge(&mut vessel.volume_liters, self.volume_liters.as_ref());
            merged += merge(&mut vessel.nominal_pressure, self.nominal_pressure.as_ref());
            merged += merge(&mut vessel.nominal_temp, self.nominal_temp.as_ref());
            merged += merge(&mut vessel.tns_type, self.tns_type.as_ref());
        }
        merged
    }
}

/// A service that reads nameplate fields from an image.
pub trait NameplateExtractor {
    /// Extracts fields from `image`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or its answer
    /// cannot be understood.
    fn extract(&self, image: &Image) -> Result<NameplateFields, ExtractError>;
}

/// Extracts a nameplate and merges the result into `report`.
///
/// Returns the number of fields written. On error `report` is untouched.
///
/// # Errors
///
/// Propagates the extractor's error.
#[tracing::instrument(level = "debug", skip_all, fields(mime = image.mime_type()))]
pub fn scan(
    report: &mut Report,
    image: &Image,
    extractor: &dyn NameplateExtractor,
) -> Result<usize, ExtractError> {
    let fields = extractor.extract(image)?;
    let merged = fields.apply_to(report);
    tracing::info!("Merged {merged} fields from nameplate");
    Ok(merged)
}

/// Extraction through the Gemini `generateContent` REST API.
#[derive(Debug, Clone)]
pub struct GeminiExtractor {
    api_key: String,
    model: String,
}

impl GeminiExtractor {
    /// Creates an extractor with an explicit key.
    #[must_use]
    pub const fn new(api_key: String, model: String) -> Self {
        Self { api_key, model }
    }

    /// Creates an extractor using the configured model and key variable.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::MissingCredential`] if neither the configured
    /// variable nor [`FALLBACK_KEY_VAR`] is set.
    pub fn from_config(config: &Config) -> Result<Self, ExtractError> {
        Self::from_lookup(&config.extraction_model, &config.api_key_var, |name| {
            std::env::var(name).ok()
        })
    }

    fn from_lookup(
        model: &str,
        var: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ExtractError> {
        let api_key = [var, FALLBACK_KEY_VAR]
            .into_iter()
            .filter_map(&lookup)
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| ExtractError::MissingCredential {
                var: var.to_string(),
            })?;
        Ok(Self::new(api_key, model.to_string()))
    }

    fn url(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

impl NameplateExtractor for GeminiExtractor {
    fn extract(&self, image: &Image) -> Result<NameplateFields, ExtractError> {
        tracing::debug!("Requesting extraction from {}", self.model);
        let response = ureq::Agent::new_with_defaults()
            .post(self.url())
            .header("x-goog-api-key", self.api_key.as_str())
            .header("content-type", "application/json")
            .send_json(request_body(image))
            .map_err(|e| ExtractError::Request(e.to_string()))?;

        let response: GenerateContentResponse = response
            .into_body()
            .read_json()
            .map_err(|e| ExtractError::Parse(e.to_string()))?;

        parse_fields(&response.text().ok_or(ExtractError::EmptyResponse)?)
    }
}

fn response_schema() -> Value {
    let string = json!({ "type": "STRING" });
    json!({
        "type": "OBJECT",
        "properties": {
            "manufacturer": string,
            "serialNumber": string,
            "yearOfManufacture": string,
            "volumeLiters": string,
            "nominalPressure": string,
            "nominalTemp": string,
            "tnsType": string,
            "operatorName": string,
        },
        "required": ["manufacturer", "serialNumber"],
    })
}

fn request_body(image: &Image) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": image.mime_type(), "data": image.base64() } },
                { "text": PROMPT },
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn parse_fields(text: &str) -> Result<NameplateFields, ExtractError> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// Strips markdown code fences (```json ... ```) around a response.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }
    let Some(newline) = text.find('\n') else {
        return text;
    };
    let body = &text[newline + 1..];
    body.rfind("```").map_or(body, |close| &body[..close]).trim()
}
