use std::{fmt, str::FromStr};

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{GasDetails, VesselDetails, lenient};

/// Identifier of a stored report.
///
/// An unsaved draft carries an empty identifier; the store assigns a fresh
/// one on first save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Generates a new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Whether this is the identifier of an unsaved draft.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReportId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two kinds of inspected equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// Stationary pressure vessel (TNS).
    #[serde(rename = "TNS")]
    PressureVessel,
    /// Gas installation (GZ).
    #[serde(rename = "GZ")]
    GasInstallation,
}

impl ReportKind {
    /// Both kinds, in the order they are offered when starting a report.
    pub const ALL: [Self; 2] = [Self::PressureVessel, Self::GasInstallation];

    /// Short code, also used as the report number prefix.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::PressureVessel => "TNS",
            Self::GasInstallation => "GZ",
        }
    }

    /// Human readable name of the equipment class.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PressureVessel => "Tlaková nádoba",
            Self::GasInstallation => "Plynové zariadenie",
        }
    }

    /// Default technician license number for this kind of inspection.
    #[must_use]
    pub const fn default_license(self) -> &'static str {
        match self {
            Self::PressureVessel => "001/2024/TNS",
            Self::GasInstallation => "001/2024/RT-PZ",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string does not name a report kind.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown report kind '{0}': expected TNS or GZ")]
pub struct ParseKindError(String);

impl FromStr for ReportKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tns" | "pressure-vessel" | "vessel" => Ok(Self::PressureVessel),
            "gz" | "gas-installation" | "gas" => Ok(Self::GasInstallation),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// Fields shared by both report variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Date the inspection was carried out.
    #[serde(default = "lenient::fallback_date", deserialize_with = "lenient::date")]
    pub report_date: NaiveDate,
    /// Report number; generated on first save when left empty.
    #[serde(default)]
    pub report_number: String,
    /// Date by which the next inspection is due.
    #[serde(default = "lenient::fallback_date", deserialize_with = "lenient::date")]
    pub next_inspection_date: NaiveDate,
    /// Operator (owner) of the equipment.
    #[serde(default)]
    pub operator_name: String,
    /// Registered address of the operator.
    #[serde(default)]
    pub operator_address: String,
    /// Name of the site where the equipment is installed.
    #[serde(default)]
    pub site_name: String,
    /// Address of the site.
    #[serde(default)]
    pub site_address: String,
    /// Inspecting technician.
    #[serde(default)]
    pub technician_name: String,
    /// Technician license number.
    #[serde(default)]
    pub technician_license: String,
}

impl Header {
    fn new(kind: ReportKind, today: NaiveDate) -> Self {
        Self {
            report_date: today,
            report_number: String::new(),
            next_inspection_date: add_years(today, 1),
            operator_name: String::new(),
            operator_address: String::new(),
            site_name: String::new(),
            site_address: String::new(),
            technician_name: "Ing. Jozef Revízny".to_string(),
            technician_license: kind.default_license().to_string(),
        }
    }
}

/// Variant specific data, tagged by the report type.
///
/// Records with a missing or unknown tag are read as pressure vessels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reportType")]
pub enum Details {
    /// Pressure vessel inspection data.
    #[serde(rename = "TNS")]
    PressureVessel(VesselDetails),
    /// Gas installation inspection data.
    #[serde(rename = "GZ")]
    GasInstallation(GasDetails),
}

impl<'de> Deserialize<'de> for Details {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let kind = match fields.get("reportType").and_then(Value::as_str) {
            Some("GZ") => ReportKind::GasInstallation,
            _ => ReportKind::PressureVessel,
        };
        let fields = Value::Object(fields);
        let details = match kind {
            ReportKind::PressureVessel => VesselDetails::deserialize(fields).map(Self::PressureVessel),
            ReportKind::GasInstallation => GasDetails::deserialize(fields).map(Self::GasInstallation),
        };
        details.map_err(de::Error::custom)
    }
}

impl Details {
    /// The kind of report these details belong to.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::PressureVessel(_) => ReportKind::PressureVessel,
            Self::GasInstallation(_) => ReportKind::GasInstallation,
        }
    }
}

/// An inspection report.
///
/// The report kind is fixed when the draft is created. Variant data can be
/// edited through [`Report::vessel_mut`] and [`Report::gas_mut`], but never
/// replaced with the other variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub(crate) id: ReportId,
    #[serde(default = "epoch", with = "chrono::serde::ts_milliseconds")]
    pub(crate) created_at: DateTime<Utc>,
    /// Fields shared by both variants.
    #[serde(flatten)]
    pub header: Header,
    #[serde(flatten)]
    pub(crate) details: Details,
}

const fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl Report {
    /// Creates an unsaved draft of the given kind with default values.
    #[must_use]
    pub fn draft(kind: ReportKind, today: NaiveDate) -> Self {
        let details = match kind {
            ReportKind::PressureVessel => Details::PressureVessel(VesselDetails::default()),
            ReportKind::GasInstallation => Details::GasInstallation(GasDetails::default()),
        };
        Self {
            id: ReportId::default(),
            created_at: epoch(),
            header: Header::new(kind, today),
            details,
        }
    }

    /// The report identifier; empty for an unsaved draft.
    #[must_use]
    pub const fn id(&self) -> &ReportId {
        &self.id
    }

    /// Whether the report has been saved to the store.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }

    /// When the report was first saved.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The kind of equipment this report covers.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        self.details.kind()
    }

    /// Variant specific data.
    #[must_use]
    pub const fn details(&self) -> &Details {
        &self.details
    }

    /// Pressure vessel data, if this is a TNS report.
    #[must_use]
    pub const fn vessel(&self) -> Option<&VesselDetails> {
        match &self.details {
            Details::PressureVessel(vessel) => Some(vessel),
            Details::GasInstallation(_) => None,
        }
    }

    /// Mutable pressure vessel data, if this is a TNS report.
    pub const fn vessel_mut(&mut self) -> Option<&mut VesselDetails> {
        match &mut self.details {
            Details::PressureVessel(vessel) => Some(vessel),
            Details::GasInstallation(_) => None,
        }
    }

    /// Gas installation data, if this is a GZ report.
    #[must_use]
    pub const fn gas(&self) -> Option<&GasDetails> {
        match &self.details {
            Details::GasInstallation(gas) => Some(gas),
            Details::PressureVessel(_) => None,
        }
    }

    /// Mutable gas installation data, if this is a GZ report.
    pub const fn gas_mut(&mut self) -> Option<&mut GasDetails> {
        match &mut self.details {
            Details::GasInstallation(gas) => Some(gas),
            Details::PressureVessel(_) => None,
        }
    }

    /// Serial number of the vessel; gas installations have none.
    #[must_use]
    pub fn serial_number(&self) -> Option<&str> {
        self.vessel().map(|vessel| vessel.serial_number.as_str())
    }

    /// Short description of the inspected equipment, as shown in listings.
    #[must_use]
    pub fn equipment_label(&self) -> &str {
        match &self.details {
            Details::PressureVessel(vessel) => &vessel.tns_type,
            Details::GasInstallation(gas) => gas
                .installation_type
                .split(" - ")
                .next()
                .filter(|label| !label.is_empty())
                .unwrap_or(ReportKind::GasInstallation.label()),
        }
    }

    /// Case-insensitive substring match against operator, serial number,
    /// report number and site name.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        let hay = [
            Some(self.header.operator_name.as_str()),
            self.serial_number(),
            Some(self.header.report_number.as_str()),
            Some(self.header.site_name.as_str()),
        ];
        hay.into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(needle))
    }

    /// Sets the identity of a newly saved report. The creation time is kept
    /// at the millisecond precision it is stored with.
    pub(crate) fn assign_identity(&mut self, id: ReportId, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at =
            DateTime::from_timestamp_millis(created_at.timestamp_millis()).unwrap_or(created_at);
    }
}

/// Adds whole years to a date.
///
/// February 29th maps to February 28th in non-leap years.
#[must_use]
pub fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_add_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn draft_is_unsaved_with_kind_defaults() {
        let draft = Report::draft(ReportKind::GasInstallation, date(2024, 5, 1));

        assert!(!draft.is_saved());
        assert_eq!(draft.kind(), ReportKind::GasInstallation);
        assert_eq!(draft.header.technician_license, "001/2024/RT-PZ");
        assert_eq!(draft.header.next_inspection_date, date(2025, 5, 1));
        assert!(draft.vessel().is_none());
    }

    #[test]
    fn serializes_with_flat_type_tag() {
        let draft = Report::draft(ReportKind::PressureVessel, date(2024, 5, 1));
        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["reportType"], "TNS");
        assert_eq!(json["id"], "");
        assert_eq!(json["createdAt"], 0);
        assert_eq!(json["reportDate"], "2024-05-01");
        assert_eq!(json["measurements"]["shellMiddle"], "0.00");
    }

    #[test]
    fn json_round_trip_preserves_report() {
        let mut report = Report::draft(ReportKind::GasInstallation, date(2024, 3, 15));
        report.header.operator_name = "Bytové družstvo".to_string();
        report.gas_mut().unwrap().chimney = Some(crate::domain::CheckResult::Defect);

        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(back, report);
    }

    #[test]
    fn loads_record_with_foreign_keys_and_missing_fields() {
        let json = r#"{
            "id": "demo-9",
            "createdAt": 1700000000000,
            "reportType": "GZ",
            "reportDate": "2024-03-15",
            "nextInspectionDate": "2025-03-15",
            "reportNumber": "GZ-2024-033",
            "operatorName": "Kotolňa",
            "measurements": {"topHead": "1"},
            "tnsType": "",
            "gasChimneyResult": "Závada"
        }"#;

        let report: Report = serde_json::from_str(json).unwrap();

        assert_eq!(report.id().as_str(), "demo-9");
        assert_eq!(report.kind(), ReportKind::GasInstallation);
        assert_eq!(
            report.gas().unwrap().chimney,
            Some(crate::domain::CheckResult::Defect)
        );
    }

    #[test]
    fn missing_or_unknown_type_reads_as_vessel() {
        for tag in ["", r#""reportType": "", "#, r#""reportType": "boiler", "#] {
            let json = format!(
                r#"{{ {tag}"id": "old-1", "reportDate": "2023-01-10",
                    "nextInspectionDate": "2024-01-10", "serialNumber": "SN-7" }}"#
            );
            let report: Report = serde_json::from_str(&json).unwrap();
            assert_eq!(report.kind(), ReportKind::PressureVessel, "{json}");
            assert_eq!(report.serial_number(), Some("SN-7"));
        }
    }

    #[test]
    fn blank_dates_and_outcomes_do_not_fail_the_record() {
        let json = r#"{
            "id": "old-2",
            "reportType": "GZ",
            "reportDate": "",
            "operatorName": "Kotolňa",
            "gasChimneyResult": "",
            "gasTightnessTestResult": "?"
        }"#;

        let report: Report = serde_json::from_str(json).unwrap();

        assert_eq!(report.kind(), ReportKind::GasInstallation);
        assert_eq!(report.header.report_date, lenient::fallback_date());
        assert_eq!(report.header.next_inspection_date, lenient::fallback_date());
        assert_eq!(report.header.operator_name, "Kotolňa");
        assert_eq!(report.gas().unwrap().chimney, None);
        assert_eq!(report.gas().unwrap().tightness_test_result, None);
    }

    #[test]
    fn creation_time_is_kept_to_the_millisecond() {
        let mut report = Report::draft(ReportKind::PressureVessel, date(2024, 6, 10));
        let precise: DateTime<Utc> = "2024-06-10T09:30:00.123456789Z".parse().unwrap();

        report.assign_identity(ReportId::from("r-1"), precise);

        assert_eq!(report.created_at().timestamp_millis(), precise.timestamp_millis());
        assert_eq!(report.created_at().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("tns".parse(), Ok(ReportKind::PressureVessel));
        assert_eq!("GZ".parse(), Ok(ReportKind::GasInstallation));
        assert!("boiler".parse::<ReportKind>().is_err());
    }

    #[test]
    fn add_years_clamps_leap_day() {
        assert_eq!(add_years(date(2024, 2, 29), 1), date(2025, 2, 28));
        assert_eq!(add_years(date(2024, 2, 29), 4), date(2028, 2, 29));
    }

    #[test]
    fn gas_equipment_label_uses_short_type() {
        let mut report = Report::draft(ReportKind::GasInstallation, date(2024, 1, 1));
        report.gas_mut().unwrap().installation_type =
            "DOPZ - Domový plynovod a odberné plynové zariadenie".to_string();
        assert_eq!(report.equipment_label(), "DOPZ");

        report.gas_mut().unwrap().installation_type = String::new();
        assert_eq!(report.equipment_label(), "Plynové zariadenie");
    }
}
