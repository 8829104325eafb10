use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::lenient;

/// Canned conclusion for an installation fit for operation.
pub const FIT_CONCLUSION: &str = "Plynové zariadenie je schopné bezpečnej prevádzky.";

/// Canned conclusion for an installation that may operate once defects are
/// resolved.
pub const CONDITIONAL_CONCLUSION: &str =
    "Plynové zariadenie je podmienečne schopné prevádzky. Nutné odstrániť závady.";

/// Canned conclusion for an installation that must be shut down.
pub const UNFIT_CONCLUSION: &str =
    "Plynové zariadenie NIE JE schopné prevádzky. Odstaviť z prevádzky!";

/// Kinds of gas installation.
pub const INSTALLATION_TYPES: &[&str] = &[
    "DOPZ - Domový plynovod a odberné plynové zariadenie",
    "Kotolňa na plynné palivo",
    "Priemyselné plynové zariadenie",
    "Regulačná stanica plynu",
    "LP zásobník (LPG)",
    "Technologické plynové zariadenie",
];

/// Kinds of gas.
pub const GAS_TYPES: &[&str] = &["Zemný plyn", "Propán-bután (LPG)", "Mestský plyn", "Propán"];

/// Pressure levels.
pub const PRESSURE_LEVELS: &[&str] = &[
    "NTL (do 5 kPa)",
    "STL (5 kPa – 400 kPa)",
    "VTL (nad 400 kPa)",
];

/// Pipe materials.
pub const PIPE_MATERIALS: &[&str] = &["Oceľ", "Meď", "PE (polyetylén)", "Nerez", "Liatina"];

/// Media used for the tightness test.
pub const TEST_MEDIA: &[&str] = &["Vzduch", "Dusík", "Plyn"];

/// Outcome of a single checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckResult {
    /// The item is in order.
    #[serde(rename = "OK")]
    Ok,
    /// A defect was found.
    #[serde(rename = "Závada")]
    Defect,
    /// The item does not apply to this installation.
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl CheckResult {
    /// All outcomes in the order they are offered.
    pub const ALL: [Self; 3] = [Self::Ok, Self::Defect, Self::NotApplicable];

    /// Text as stored and printed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Defect => "Závada",
            Self::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ok" => Ok(Self::Ok),
            "závada" | "zavada" | "defect" => Ok(Self::Defect),
            "n/a" | "na" => Ok(Self::NotApplicable),
            _ => Err(format!("expected OK, Závada or N/A, got '{s}'")),
        }
    }
}

/// Outcome of the tightness test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TightnessResult {
    /// The installation held pressure.
    #[serde(rename = "Vyhovela")]
    Passed,
    /// The installation leaked.
    #[serde(rename = "Nevyhovela")]
    Failed,
}

impl TightnessResult {
    /// Both outcomes.
    pub const ALL: [Self; 2] = [Self::Passed, Self::Failed];

    /// Text as stored and printed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "Vyhovela",
            Self::Failed => "Nevyhovela",
        }
    }
}

impl fmt::Display for TightnessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TightnessResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vyhovela" | "passed" | "pass" => Ok(Self::Passed),
            "nevyhovela" | "failed" | "fail" => Ok(Self::Failed),
            _ => Err(format!("expected Vyhovela or Nevyhovela, got '{s}'")),
        }
    }
}

/// The six checklist items of a gas installation inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecklistItem {
    /// Main and appliance shutoff valves.
    ShutoffValves,
    /// Gas pressure regulators.
    Regulator,
    /// Manometers and measuring devices.
    Manometer,
    /// Gas meter and delivery point.
    Meter,
    /// Flue pipes and chimney.
    Chimney,
    /// Room ventilation and combustion air supply.
    Ventilation,
}

impl ChecklistItem {
    /// All items in checklist order.
    pub const ALL: [Self; 6] = [
        Self::ShutoffValves,
        Self::Regulator,
        Self::Manometer,
        Self::Meter,
        Self::Chimney,
        Self::Ventilation,
    ];

    /// Stored key of the item.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ShutoffValves => "gasShutoffValvesResult",
            Self::Regulator => "gasRegulatorResult",
            Self::Manometer => "gasManometerResult",
            Self::Meter => "gasMeterResult",
            Self::Chimney => "gasChimneyResult",
            Self::Ventilation => "gasVentilationResult",
        }
    }

    /// Label used in the editor.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShutoffValves => "Bezpečnostné uzávery (hlavný uzáver, spotrebičové uzávery)",
            Self::Regulator => "Regulátory tlaku plynu",
            Self::Manometer => "Manometre a meracie zariadenia",
            Self::Meter => "Plynomer a odberné miesto",
            Self::Chimney => "Dymovody a komínové teleso",
            Self::Ventilation => "Vetranie priestoru a prívod spaľovacieho vzduchu",
        }
    }

    /// Label used in the printed checklist.
    #[must_use]
    pub const fn document_label(self) -> &'static str {
        match self {
            Self::ShutoffValves => {
                "Kontrola bezpečnostných uzáverov (hlavný uzáver, spotrebičové uzávery)"
            }
            Self::Regulator => "Kontrola regulátorov tlaku plynu",
            Self::Manometer => "Kontrola manometrov a meracích zariadení",
            Self::Meter => "Kontrola plynomera a odberného miesta",
            Self::Chimney => "Kontrola dymovodov a komínového telesa",
            Self::Ventilation => "Kontrola vetrania priestoru a prívodu spaľovacieho vzduchu",
        }
    }
}

/// Data specific to a gas installation inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasDetails {
    /// Kind of installation, one of [`INSTALLATION_TYPES`] or free text.
    #[serde(rename = "gasInstallationType")]
    pub installation_type: String,
    /// Kind of gas.
    #[serde(rename = "gasType")]
    pub gas_type: String,
    /// Pressure level.
    #[serde(rename = "gasPressureLevel")]
    pub pressure_level: String,
    /// Operating pressure in kPa.
    #[serde(rename = "gasOperatingPressure")]
    pub operating_pressure: String,
    /// Maximum operating pressure in kPa.
    #[serde(rename = "gasMaxPressure")]
    pub max_pressure: String,
    /// Pipe material.
    #[serde(rename = "gasPipeMaterial")]
    pub pipe_material: String,
    /// Nominal pipe diameter, e.g. `DN 25`.
    #[serde(rename = "gasPipeDiameter")]
    pub pipe_diameter: String,
    /// Pipeline length in metres.
    #[serde(rename = "gasPipeLength")]
    pub pipe_length: String,
    /// Number of connected appliances.
    #[serde(rename = "gasApplianceCount")]
    pub appliance_count: String,
    /// Year of installation.
    #[serde(rename = "gasInstallationYear")]
    pub installation_year: String,
    /// Annual gas consumption in m³; optional.
    #[serde(rename = "gasAnnualConsumption")]
    pub annual_consumption: String,
    /// Findings of the visual inspection.
    #[serde(rename = "gasVisualInspectionResult")]
    pub visual_inspection_result: String,
    /// Tightness test pressure in kPa.
    #[serde(rename = "gasTightnessTestPressure")]
    pub tightness_test_pressure: String,
    /// Tightness test medium.
    #[serde(rename = "gasTightnessTestMedium")]
    pub tightness_test_medium: String,
    /// Tightness test duration in minutes.
    #[serde(rename = "gasTightnessTestDuration")]
    pub tightness_test_duration: String,
    /// Tightness test outcome.
    #[serde(
        rename = "gasTightnessTestResult",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::outcome"
    )]
    pub tightness_test_result: Option<TightnessResult>,
    /// Shutoff valves check.
    #[serde(
        rename = "gasShutoffValvesResult",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::outcome"
    )]
    pub shutoff_valves: Option<CheckResult>,
    /// Pressure regulator check.
    #[serde(
        rename = "gasRegulatorResult",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::outcome"
    )]
    pub regulator: Option<CheckResult>,
    /// Manometer check.
    #[serde(
        rename = "gasManometerResult",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::outcome"
    )]
    pub manometer: Option<CheckResult>,
    /// Gas meter check.
    #[serde(
        rename = "gasMeterResult",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::outcome"
    )]
    pub meter: Option<CheckResult>,
    /// Chimney check.
    #[serde(
        rename = "gasChimneyResult",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::outcome"
    )]
    pub chimney: Option<CheckResult>,
    /// Ventilation check.
    #[serde(
        rename = "gasVentilationResult",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::outcome"
    )]
    pub ventilation: Option<CheckResult>,
    /// Defects found and measures imposed.
    #[serde(rename = "gasDefectsFound")]
    pub defects_found: String,
    /// Overall conclusion.
    #[serde(rename = "gasConclusion")]
    pub conclusion: String,
}

impl Default for GasDetails {
    fn default() -> Self {
        Self {
            installation_type: INSTALLATION_TYPES[0].to_string(),
            gas_type: GAS_TYPES[0].to_string(),
            pressure_level: PRESSURE_LEVELS[0].to_string(),
            operating_pressure: String::new(),
            max_pressure: String::new(),
            pipe_material: PIPE_MATERIALS[0].to_string(),
            pipe_diameter: String::new(),
            pipe_length: String::new(),
            appliance_count: String::new(),
            installation_year: String::new(),
            annual_consumption: String::new(),
            visual_inspection_result: String::new(),
            tightness_test_pressure: String::new(),
            tightness_test_medium: TEST_MEDIA[0].to_string(),
            tightness_test_duration: "15".to_string(),
            tightness_test_result: None,
            shutoff_valves: None,
            regulator: None,
            manometer: None,
            meter: None,
            chimney: None,
            ventilation: None,
            defects_found: String::new(),
            conclusion: String::new(),
        }
    }
}

impl GasDetails {
    /// Outcome of a checklist item, if recorded.
    #[must_use]
    pub const fn check(&self, item: ChecklistItem) -> Option<CheckResult> {
        match item {
            ChecklistItem::ShutoffValves => self.shutoff_valves,
            ChecklistItem::Regulator => self.regulator,
            ChecklistItem::Manometer => self.manometer,
            ChecklistItem::Meter => self.meter,
            ChecklistItem::Chimney => self.chimney,
            ChecklistItem::Ventilation => self.ventilation,
        }
    }

    /// Records the outcome of a checklist item.
    pub const fn set_check(&mut self, item: ChecklistItem, result: Option<CheckResult>) {
        let slot = match item {
            ChecklistItem::ShutoffValves => &mut self.shutoff_valves,
            ChecklistItem::Regulator => &mut self.regulator,
            ChecklistItem::Manometer => &mut self.manometer,
            ChecklistItem::Meter => &mut self.meter,
            ChecklistItem::Chimney => &mut self.chimney,
            ChecklistItem::Ventilation => &mut self.ventilation,
        };
        *slot = result;
    }
}
