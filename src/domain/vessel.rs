use serde::{Deserialize, Serialize};

/// Canned conclusion for a vessel fit for continued operation.
pub const FIT_CONCLUSION: &str = "TN je schopná bezpečnej prevádzky.";

/// Canned conclusion for a vessel that must be withdrawn from service.
pub const UNFIT_CONCLUSION: &str = "TN NIE JE schopná prevádzky. Odstaviť!";

/// The five points at which wall thickness is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementPoint {
    /// Upper dished head.
    TopHead,
    /// Upper part of the shell.
    ShellTop,
    /// Middle of the shell.
    ShellMiddle,
    /// Lower part of the shell.
    ShellBottom,
    /// Lower dished head.
    BottomHead,
}

impl MeasurementPoint {
    /// All points, top to bottom.
    pub const ALL: [Self; 5] = [
        Self::TopHead,
        Self::ShellTop,
        Self::ShellMiddle,
        Self::ShellBottom,
        Self::BottomHead,
    ];

    /// Key of the point inside the `measurements` object.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TopHead => "topHead",
            Self::ShellTop => "shellTop",
            Self::ShellMiddle => "shellMiddle",
            Self::ShellBottom => "shellBottom",
            Self::BottomHead => "bottomHead",
        }
    }

    /// Label used in the editor and the document.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TopHead => "Horné dno",
            Self::ShellTop => "Plášť vrch",
            Self::ShellMiddle => "Plášť stred",
            Self::ShellBottom => "Plášť spodok",
            Self::BottomHead => "Dolné dno",
        }
    }

    /// Whether the point lies on the cylindrical shell.
    #[must_use]
    pub const fn is_shell(self) -> bool {
        matches!(self, Self::ShellTop | Self::ShellMiddle | Self::ShellBottom)
    }
}

/// Wall thickness readings in millimetres, kept as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Measurements {
    /// Upper dished head.
    pub top_head: String,
    /// Upper part of the shell.
    pub shell_top: String,
    /// Middle of the shell.
    pub shell_middle: String,
    /// Lower part of the shell.
    pub shell_bottom: String,
    /// Lower dished head.
    pub bottom_head: String,
}

impl Default for Measurements {
    fn default() -> Self {
        let zero = || "0.00".to_string();
        Self {
            top_head: zero(),
            shell_top: zero(),
            shell_middle: zero(),
            shell_bottom: zero(),
            bottom_head: zero(),
        }
    }
}

impl Measurements {
    /// The raw reading at a point.
    #[must_use]
    pub fn get(&self, point: MeasurementPoint) -> &str {
        match point {
            MeasurementPoint::TopHead => &self.top_head,
            MeasurementPoint::ShellTop => &self.shell_top,
            MeasurementPoint::ShellMiddle => &self.shell_middle,
            MeasurementPoint::ShellBottom => &self.shell_bottom,
            MeasurementPoint::BottomHead => &self.bottom_head,
        }
    }

    fn slot(&mut self, point: MeasurementPoint) -> &mut String {
        match point {
            MeasurementPoint::TopHead => &mut self.top_head,
            MeasurementPoint::ShellTop => &mut self.shell_top,
            MeasurementPoint::ShellMiddle => &mut self.shell_middle,
            MeasurementPoint::ShellBottom => &mut self.shell_bottom,
            MeasurementPoint::BottomHead => &mut self.bottom_head,
        }
    }

    /// Smallest numeric reading over all five points.
    ///
    /// Readings that do not parse as numbers are ignored; `None` when none
    /// parse.
    #[must_use]
    pub fn minimum(&self) -> Option<f64> {
        self.minimum_over(|_| true)
    }

    /// Smallest numeric reading over the three shell points.
    #[must_use]
    pub fn shell_minimum(&self) -> Option<f64> {
        self.minimum_over(MeasurementPoint::is_shell)
    }

    fn minimum_over(&self, include: impl Fn(MeasurementPoint) -> bool) -> Option<f64> {
        MeasurementPoint::ALL
            .into_iter()
            .filter(|&point| include(point))
            .filter_map(|point| parse_reading(self.get(point)))
            .reduce(f64::min)
    }
}

/// Parses a thickness reading.
///
/// Accepts a decimal comma as well as a decimal point.
#[must_use]
pub fn parse_reading(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Formats a reading with two decimals.
#[must_use]
pub fn format_reading(value: f64) -> String {
    format!("{value:.2}")
}

/// Data specific to a pressure vessel inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VesselDetails {
    /// Vessel type, e.g. horizontal air receiver.
    pub tns_type: String,
    /// Manufacturer.
    pub manufacturer: String,
    /// Serial number.
    pub serial_number: String,
    /// Year of manufacture.
    pub year_of_manufacture: String,
    /// Volume in litres.
    pub volume_liters: String,
    /// Nominal temperature in °C.
    pub nominal_temp: String,
    /// Nominal (maximum) pressure in MPa.
    pub nominal_pressure: String,
    /// Working medium.
    pub medium: String,
    /// Regulatory classification, e.g. `Ab1`.
    pub classification: String,
    /// Ultrasonic thickness gauge used for the measurements.
    pub ultrasonic_device: String,
    /// Control pressure gauge used for the pressure test.
    pub pressure_gauge: String,
    measurements: Measurements,
    min_measurement: String,
    /// Test pressure in MPa.
    pub pressure_test_value: String,
    /// Findings of the visual inspection.
    pub visual_inspection_result: String,
    /// Technician's conclusion.
    pub conclusion: String,
}

impl Default for VesselDetails {
    fn default() -> Self {
        Self {
            tns_type: String::new(),
            manufacturer: String::new(),
            serial_number: String::new(),
            year_of_manufacture: String::new(),
            volume_liters: String::new(),
            nominal_temp: "70".to_string(),
            nominal_pressure: "0.6".to_string(),
            medium: "Vzduch / Voda".to_string(),
            classification: "Ab1".to_string(),
            ultrasonic_device: "SA 40 + sonda 5P".to_string(),
            pressure_gauge: "Ø 160, 0-2.5 MPa".to_string(),
            measurements: Measurements::default(),
            min_measurement: "0.00".to_string(),
            pressure_test_value: "0.6".to_string(),
            visual_inspection_result: "Neboli zistené korozívne úbytky ani deformácie.".to_string(),
            conclusion: FIT_CONCLUSION.to_string(),
        }
    }
}

impl VesselDetails {
    /// The wall thickness readings.
    #[must_use]
    pub const fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// The derived minimum reading, formatted with two decimals.
    #[must_use]
    pub fn min_measurement(&self) -> &str {
        &self.min_measurement
    }

    /// Records a reading and recomputes the derived minimum.
    pub fn set_measurement(&mut self, point: MeasurementPoint, value: impl Into<String>) {
        *self.measurements.slot(point) = value.into();
        self.recompute_minimum();
    }

    /// Replaces all readings at once and recomputes the derived minimum.
    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.measurements = measurements;
        self.recompute_minimum();
    }

    /// Recomputes the derived minimum from the numeric readings.
    ///
    /// When no reading parses the previous minimum is kept.
    pub fn recompute_minimum(&mut self) {
        if let Some(min) = self.measurements.minimum() {
            self.min_measurement = format_reading(min);
        }
    }
}
