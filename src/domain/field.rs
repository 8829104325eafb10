use std::{fmt, str::FromStr};

use chrono::NaiveDate;

use crate::domain::{ChecklistItem, MeasurementPoint, Report, ReportKind};

/// An editable report field, addressed by its stored key.
///
/// The derived minimum measurement is not addressable; only recomputation
/// writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Inspection date.
    ReportDate,
    /// Report number.
    ReportNumber,
    /// Next inspection date.
    NextInspectionDate,
    /// Operator name.
    OperatorName,
    /// Operator address.
    OperatorAddress,
    /// Site name.
    SiteName,
    /// Site address.
    SiteAddress,
    /// Technician name.
    TechnicianName,
    /// Technician license number.
    TechnicianLicense,

    /// Vessel type.
    TnsType,
    /// Vessel manufacturer.
    Manufacturer,
    /// Vessel serial number.
    SerialNumber,
    /// Vessel year of manufacture.
    YearOfManufacture,
    /// Vessel volume.
    VolumeLiters,
    /// Nominal temperature.
    NominalTemp,
    /// Nominal pressure.
    NominalPressure,
    /// Working medium.
    Medium,
    /// Classification.
    Classification,
    /// Ultrasonic gauge.
    UltrasonicDevice,
    /// Control pressure gauge.
    PressureGauge,
    /// A wall thickness reading.
    Measurement(MeasurementPoint),
    /// Test pressure.
    PressureTestValue,
    /// Visual inspection findings.
    VisualInspectionResult,
    /// Vessel conclusion.
    Conclusion,

    /// Installation type.
    GasInstallationType,
    /// Gas type.
    GasType,
    /// Pressure level.
    GasPressureLevel,
    /// Operating pressure.
    GasOperatingPressure,
    /// Maximum operating pressure.
    GasMaxPressure,
    /// Pipe material.
    GasPipeMaterial,
    /// Pipe diameter.
    GasPipeDiameter,
    /// Pipe length.
    GasPipeLength,
    /// Appliance count.
    GasApplianceCount,
    /// Installation year.
    GasInstallationYear,
    /// Annual consumption.
    GasAnnualConsumption,
    /// Visual inspection findings.
    GasVisualInspectionResult,
    /// Tightness test pressure.
    GasTightnessTestPressure,
    /// Tightness test medium.
    GasTightnessTestMedium,
    /// Tightness test duration.
    GasTightnessTestDuration,
    /// Tightness test outcome.
    GasTightnessTestResult,
    /// A checklist item.
    GasCheck(ChecklistItem),
    /// Defects found.
    GasDefectsFound,
    /// Installation conclusion.
    GasConclusion,
}

impl Field {
    /// Every editable field.
    pub const ALL: &'static [Self] = &[
        Self::ReportDate,
        Self::ReportNumber,
        Self::NextInspectionDate,
        Self::OperatorName,
        Self::OperatorAddress,
        Self::SiteName,
        Self::SiteAddress,
        Self::TechnicianName,
        Self::TechnicianLicense,
        Self::TnsType,
        Self::Manufacturer,
        Self::SerialNumber,
        Self::YearOfManufacture,
        Self::VolumeLiters,
        Self::NominalTemp,
        Self::NominalPressure,
        Self::Medium,
        Self::Classification,
        Self::UltrasonicDevice,
        Self::PressureGauge,
        Self::Measurement(MeasurementPoint::TopHead),
        Self::Measurement(MeasurementPoint::ShellTop),
        Self::Measurement(MeasurementPoint::ShellMiddle),
        Self::Measurement(MeasurementPoint::ShellBottom),
        Self::Measurement(MeasurementPoint::BottomHead),
        Self::PressureTestValue,
        Self::VisualInspectionResult,
        Self::Conclusion,
        Self::GasInstallationType,
        Self::GasType,
        Self::GasPressureLevel,
        Self::GasOperatingPressure,
        Self::GasMaxPressure,
        Self::GasPipeMaterial,
        Self::GasPipeDiameter,
        Self::GasPipeLength,
        Self::GasApplianceCount,
        Self::GasInstallationYear,
        Self::GasAnnualConsumption,
        Self::GasVisualInspectionResult,
        Self::GasTightnessTestPressure,
        Self::GasTightnessTestMedium,
        Self::GasTightnessTestDuration,
        Self::GasTightnessTestResult,
        Self::GasCheck(ChecklistItem::ShutoffValves),
        Self::GasCheck(ChecklistItem::Regulator),
        Self::GasCheck(ChecklistItem::Manometer),
        Self::GasCheck(ChecklistItem::Meter),
        Self::GasCheck(ChecklistItem::Chimney),
        Self::GasCheck(ChecklistItem::Ventilation),
        Self::GasDefectsFound,
        Self::GasConclusion,
    ];

    /// The stored key, e.g. `operatorName` or `measurements.shellTop`.
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Measurement(point) => format!("measurements.{}", point.key()),
            Self::GasCheck(item) => item.key().to_string(),
            other => other.plain_key().to_string(),
        }
    }

    const fn plain_key(self) -> &'static str {
        match self {
            Self::ReportDate => "reportDate",
            Self::ReportNumber => "reportNumber",
            Self::NextInspectionDate => "nextInspectionDate",
            Self::OperatorName => "operatorName",
            Self::OperatorAddress => "operatorAddress",
            Self::SiteName => "siteName",
            Self::SiteAddress => "siteAddress",
            Self::TechnicianName => "technicianName",
            Self::TechnicianLicense => "technicianLicense",
            Self::TnsType => "tnsType",
            Self::Manufacturer => "manufacturer",
            Self::SerialNumber => "serialNumber",
            Self::YearOfManufacture => "yearOfManufacture",
            Self::VolumeLiters => "volumeLiters",
            Self::NominalTemp => "nominalTemp",
            Self::NominalPressure => "nominalPressure",
            Self::Medium => "medium",
            Self::Classification => "classification",
            Self::UltrasonicDevice => "ultrasonicDevice",
            Self::PressureGauge => "pressureGauge",
            Self::Measurement(point) => point.key(),
            Self::PressureTestValue => "pressureTestValue",
            Self::VisualInspectionResult => "visualInspectionResult",
            Self::Conclusion => "conclusion",
            Self::GasInstallationType => "gasInstallationType",
            Self::GasType => "gasType",
            Self::GasPressureLevel => "gasPressureLevel",
            Self::GasOperatingPressure => "gasOperatingPressure",
            Self::GasMaxPressure => "gasMaxPressure",
            Self::GasPipeMaterial => "gasPipeMaterial",
            Self::GasPipeDiameter => "gasPipeDiameter",
            Self::GasPipeLength => "gasPipeLength",
            Self::GasApplianceCount => "gasApplianceCount",
            Self::GasInstallationYear => "gasInstallationYear",
            Self::GasAnnualConsumption => "gasAnnualConsumption",
            Self::GasVisualInspectionResult => "gasVisualInspectionResult",
            Self::GasTightnessTestPressure => "gasTightnessTestPressure",
            Self::GasTightnessTestMedium => "gasTightnessTestMedium",
            Self::GasTightnessTestDuration => "gasTightnessTestDuration",
            Self::GasTightnessTestResult => "gasTightnessTestResult",
            Self::GasCheck(item) => item.key(),
            Self::GasDefectsFound => "gasDefectsFound",
            Self::GasConclusion => "gasConclusion",
        }
    }

    /// The report kind this field belongs to; `None` for shared header
    /// fields.
    #[must_use]
    pub const fn kind(self) -> Option<ReportKind> {
        match self {
            Self::ReportDate
            | Self::ReportNumber
            | Self::NextInspectionDate
            | Self::OperatorName
            | Self::OperatorAddress
            | Self::SiteName
            | Self::SiteAddress
            | Self::TechnicianName
            | Self::TechnicianLicense => None,
            Self::TnsType
            | Self::Manufacturer
            | Self::SerialNumber
            | Self::YearOfManufacture
            | Self::VolumeLiters
            | Self::NominalTemp
            | Self::NominalPressure
            | Self::Medium
            | Self::Classification
            | Self::UltrasonicDevice
            | Self::PressureGauge
            | Self::Measurement(_)
            | Self::PressureTestValue
            | Self::VisualInspectionResult
            | Self::Conclusion => Some(ReportKind::PressureVessel),
            _ => Some(ReportKind::GasInstallation),
        }
    }

    /// Whether the field can be edited on a report of the given kind.
    #[must_use]
    pub fn applies_to(self, kind: ReportKind) -> bool {
        self.kind().is_none_or(|own| own == kind)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.key() == key)
            .ok_or_else(|| FieldError::Unknown(key.to_string()))
    }
}

/// Errors raised when reading or writing a field.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    /// No field has this key.
    #[error("Unknown field '{0}'")]
    Unknown(String),

    /// The field belongs to the other report kind.
    #[error("Field '{field}' is not applicable to this report type ({kind})")]
    NotApplicable {
        /// The offending field.
        field: Field,
        /// Kind of the report being edited.
        kind: ReportKind,
    },

    /// The value could not be parsed for this field.
    #[error("Invalid value for '{field}': {reason}")]
    Invalid {
        /// The offending field.
        field: Field,
        /// Why the value was rejected.
        reason: String,
    },
}

fn parse_date(field: Field, value: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| FieldError::Invalid {
        field,
        reason: format!("expected a date as YYYY-MM-DD ({e})"),
    })
}

/// Parses an optional enum value; an empty string clears it.
fn parse_optional<T: FromStr<Err = String>>(
    field: Field,
    value: &str,
) -> Result<Option<T>, FieldError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|reason| FieldError::Invalid { field, reason })
}

impl Report {
    /// Reads a field as display text.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotApplicable`] if the field belongs to the other
    /// report kind.
    pub fn field(&self, field: Field) -> Result<String, FieldError> {
        let header = &self.header;
        let value = match field {
            Field::ReportDate => header.report_date.to_string(),
            Field::ReportNumber => header.report_number.clone(),
            Field::NextInspectionDate => header.next_inspection_date.to_string(),
            Field::OperatorName => header.operator_name.clone(),
            Field::OperatorAddress => header.operator_address.clone(),
            Field::SiteName => header.site_name.clone(),
            Field::SiteAddress => header.site_address.clone(),
            Field::TechnicianName => header.technician_name.clone(),
            Field::TechnicianLicense => header.technician_license.clone(),
            _ => {
                if let Some(vessel) = self.vessel() {
                    let value: &str = match field {
                        Field::TnsType => &vessel.tns_type,
                        Field::Manufacturer => &vessel.manufacturer,
                        Field::SerialNumber => &vessel.serial_number,
                        Field::YearOfManufacture => &vessel.year_of_manufacture,
                        Field::VolumeLiters => &vessel.volume_liters,
                        Field::NominalTemp => &vessel.nominal_temp,
                        Field::NominalPressure => &vessel.nominal_pressure,
                        Field::Medium => &vessel.medium,
                        Field::Classification => &vessel.classification,
                        Field::UltrasonicDevice => &vessel.ultrasonic_device,
                        Field::PressureGauge => &vessel.pressure_gauge,
                        Field::Measurement(point) => vessel.measurements().get(point),
                        Field::PressureTestValue => &vessel.pressure_test_value,
                        Field::VisualInspectionResult => &vessel.visual_inspection_result,
                        Field::Conclusion => &vessel.conclusion,
                        _ => return Err(self.not_applicable(field)),
                    };
                    value.to_string()
                } else if let Some(gas) = self.gas() {
                    match field {
                        Field::GasTightnessTestResult => gas
                            .tightness_test_result
                            .map(|result| result.to_string())
                            .unwrap_or_default(),
                        Field::GasCheck(item) => gas
                            .check(item)
                            .map(|result| result.to_string())
                            .unwrap_or_default(),
                        _ => {
                            let value: &str = match field {
                                Field::GasInstallationType => &gas.installation_type,
                                Field::GasType => &gas.gas_type,
                                Field::GasPressureLevel => &gas.pressure_level,
                                Field::GasOperatingPressure => &gas.operating_pressure,
                                Field::GasMaxPressure => &gas.max_pressure,
                                Field::GasPipeMaterial => &gas.pipe_material,
                                Field::GasPipeDiameter => &gas.pipe_diameter,
                                Field::GasPipeLength => &gas.pipe_length,
                                Field::GasApplianceCount => &gas.appliance_count,
                                Field::GasInstallationYear => &gas.installation_year,
                                Field::GasAnnualConsumption => &gas.annual_consumption,
                                Field::GasVisualInspectionResult => &gas.visual_inspection_result,
                                Field::GasTightnessTestPressure => &gas.tightness_test_pressure,
                                Field::GasTightnessTestMedium => &gas.tightness_test_medium,
                                Field::GasTightnessTestDuration => &gas.tightness_test_duration,
                                Field::GasDefectsFound => &gas.defects_found,
                                Field::GasConclusion => &gas.conclusion,
                                _ => return Err(self.not_applicable(field)),
                            };
                            value.to_string()
                        }
                    }
                } else {
                    return Err(self.not_applicable(field));
                }
            }
        };
        Ok(value)
    }

    /// Writes a field from text.
    ///
    /// Writing a measurement recomputes the derived minimum. Dates must be
    /// `YYYY-MM-DD`; checklist and tightness results accept their stored
    /// spellings, and an empty value clears them.
    ///
    /// # Errors
    ///
    /// Returns an error if the field belongs to the other report kind or the
    /// value cannot be parsed. The report is unchanged on error.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        if !field.applies_to(self.kind()) {
            return Err(self.not_applicable(field));
        }

        let foreign = self.not_applicable(field);
        let header = &mut self.header;
        match field {
            Field::ReportDate => header.report_date = parse_date(field, value)?,
            Field::NextInspectionDate => header.next_inspection_date = parse_date(field, value)?,
            Field::ReportNumber => value.clone_into(&mut header.report_number),
            Field::OperatorName => value.clone_into(&mut header.operator_name),
            Field::OperatorAddress => value.clone_into(&mut header.operator_address),
            Field::SiteName => value.clone_into(&mut header.site_name),
            Field::SiteAddress => value.clone_into(&mut header.site_address),
            Field::TechnicianName => value.clone_into(&mut header.technician_name),
            Field::TechnicianLicense => value.clone_into(&mut header.technician_license),
            _ => match &mut self.details {
                crate::domain::Details::PressureVessel(vessel) => {
                    let slot = match field {
                        Field::Measurement(point) => {
                            vessel.set_measurement(point, value);
                            return Ok(());
                        }
                        Field::TnsType => &mut vessel.tns_type,
                        Field::Manufacturer => &mut vessel.manufacturer,
                        Field::SerialNumber => &mut vessel.serial_number,
                        Field::YearOfManufacture => &mut vessel.year_of_manufacture,
                        Field::VolumeLiters => &mut vessel.volume_liters,
                        Field::NominalTemp => &mut vessel.nominal_temp,
                        Field::NominalPressure => &mut vessel.nominal_pressure,
                        Field::Medium => &mut vessel.medium,
                        Field::Classification => &mut vessel.classification,
                        Field::UltrasonicDevice => &mut vessel.ultrasonic_device,
                        Field::PressureGauge => &mut vessel.pressure_gauge,
                        Field::PressureTestValue => &mut vessel.pressure_test_value,
                        Field::VisualInspectionResult => &mut vessel.visual_inspection_result,
                        Field::Conclusion => &mut vessel.conclusion,
                        _ => return Err(foreign),
                    };
                    value.clone_into(slot);
                }
                crate::domain::Details::GasInstallation(gas) => {
                    let slot = match field {
                        Field::GasTightnessTestResult => {
                            gas.tightness_test_result = parse_optional(field, value)?;
                            return Ok(());
                        }
                        Field::GasCheck(item) => {
                            gas.set_check(item, parse_optional(field, value)?);
                            return Ok(());
                        }
                        Field::GasInstallationType => &mut gas.installation_type,
                        Field::GasType => &mut gas.gas_type,
                        Field::GasPressureLevel => &mut gas.pressure_level,
                        Field::GasOperatingPressure => &mut gas.operating_pressure,
                        Field::GasMaxPressure => &mut gas.max_pressure,
                        Field::GasPipeMaterial => &mut gas.pipe_material,
                        Field::GasPipeDiameter => &mut gas.pipe_diameter,
                        Field::GasPipeLength => &mut gas.pipe_length,
                        Field::GasApplianceCount => &mut gas.appliance_count,
                        Field::GasInstallationYear => &mut gas.installation_year,
                        Field::GasAnnualConsumption => &mut gas.annual_consumption,
                        Field::GasVisualInspectionResult => &mut gas.visual_inspection_result,
                        Field::GasTightnessTestPressure => &mut gas.tightness_test_pressure,
                        Field::GasTightnessTestMedium => &mut gas.tightness_test_medium,
                        Field::GasTightnessTestDuration => &mut gas.tightness_test_duration,
                        Field::GasDefectsFound => &mut gas.defects_found,
                        Field::GasConclusion => &mut gas.conclusion,
                        _ => return Err(foreign),
                    };
                    value.clone_into(slot);
                }
            },
        }
        Ok(())
    }

    fn not_applicable(&self, field: Field) -> FieldError {
        FieldError::NotApplicable {
            field,
            kind: self.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::CheckResult;

    fn draft(kind: ReportKind) -> Report {
        Report::draft(kind, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn every_key_round_trips() {
        for field in Field::ALL {
            assert_eq!(field.key().parse::<Field>(), Ok(*field));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(
            "colour".parse::<Field>(),
            Err(FieldError::Unknown("colour".to_string()))
        );
    }

    #[test]
    fn measurement_edit_updates_minimum() {
        let mut report = draft(ReportKind::PressureVessel);
        for (key, value) in [
            ("measurements.topHead", "5.20"),
            ("measurements.shellTop", "5.10"),
            ("measurements.shellMiddle", "5.05"),
            ("measurements.shellBottom", "5.10"),
            ("measurements.bottomHead", "5.25"),
        ] {
            report.set_field(key.parse().unwrap(), value).unwrap();
        }

        assert_eq!(report.vessel().unwrap().min_measurement(), "5.05");
    }

    #[test]
    fn foreign_field_is_not_applicable() {
        let mut report = draft(ReportKind::GasInstallation);
        let before = report.clone();

        let err = report.set_field(Field::SerialNumber, "X-1").unwrap_err();

        assert_eq!(
            err,
            FieldError::NotApplicable {
                field: Field::SerialNumber,
                kind: ReportKind::GasInstallation
            }
        );
        assert_eq!(report, before);
        assert!(report.field(Field::Conclusion).is_err());
    }

    #[test]
    fn every_field_is_set_or_rejected_as_foreign() {
        for kind in ReportKind::ALL {
            for field in Field::ALL {
                let mut report = draft(kind);
                let result = report.set_field(*field, "");
                if field.applies_to(kind) {
                    assert!(
                        !matches!(result, Err(FieldError::NotApplicable { .. })),
                        "{field:?} on {kind}"
                    );
                } else {
                    assert_eq!(
                        result,
                        Err(FieldError::NotApplicable { field: *field, kind }),
                        "{field:?} on {kind}"
                    );
                }
            }
        }
    }

    #[test]
    fn invalid_date_leaves_report_unchanged() {
        let mut report = draft(ReportKind::PressureVessel);
        let before = report.clone();

        assert!(report.set_field(Field::ReportDate, "1.6.2024").is_err());
        assert_eq!(report, before);
    }

    #[test]
    fn checklist_values_parse_and_clear() {
        let mut report = draft(ReportKind::GasInstallation);
        let field = Field::GasCheck(ChecklistItem::Chimney);

        report.set_field(field, "Závada").unwrap();
        assert_eq!(report.gas().unwrap().chimney, Some(CheckResult::Defect));
        assert_eq!(report.field(field).unwrap(), "Závada");

        report.set_field(field, "").unwrap();
        assert_eq!(report.gas().unwrap().chimney, None);

        assert!(report.set_field(field, "broken").is_err());
    }

    #[test]
    fn header_fields_apply_to_both_kinds() {
        for kind in ReportKind::ALL {
            let mut report = draft(kind);
            report.set_field(Field::SiteName, "Kotolňa K1").unwrap();
            assert_eq!(report.field(Field::SiteName).unwrap(), "Kotolňa K1");
        }
    }
}
