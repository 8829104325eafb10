//! What each editor step shows, per report kind.
//!
//! Both kinds walk the same four steps. The first and last share a common
//! shell; the middle two differ entirely. [`content`] is the single place
//! where the report kind selects a provider.

use crate::domain::{
    ChecklistItem, Field, MeasurementPoint, ReportKind, Step, gas, vessel,
};

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Single line of free text.
    Text,
    /// Multi-line narrative.
    Narrative,
    /// Calendar date.
    Date,
    /// One of a fixed list of options (free text is still accepted).
    Choice(&'static [&'static str]),
    /// Checklist outcome: OK, defect or not applicable.
    Check,
    /// Tightness test outcome: passed or failed.
    Tightness,
    /// Wall thickness reading; drives the derived minimum.
    Measurement,
}

/// A field as presented in a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The edited field.
    pub field: Field,
    /// Label shown to the user.
    pub label: &'static str,
    /// Input style.
    pub input: Input,
}

const fn spec(field: Field, label: &'static str, input: Input) -> FieldSpec {
    FieldSpec {
        field,
        label,
        input,
    }
}

/// A narrative that can be applied to the conclusion with one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedConclusion {
    /// Short button label.
    pub label: &'static str,
    /// Text written into the conclusion field.
    pub text: &'static str,
}

/// Per-kind step content.
pub trait StepContent: Sync {
    /// Title of a step.
    fn title(&self, step: Step) -> &'static str;

    /// Fields presented in a step, in order.
    fn fields(&self, step: Step) -> &'static [FieldSpec];

    /// Year offsets offered to quick-set the next inspection date.
    fn quick_set_years(&self) -> &'static [u32];

    /// Canned conclusions offered on the last step.
    fn conclusions(&self) -> &'static [CannedConclusion];

    /// The field canned conclusions write to.
    fn conclusion_field(&self) -> Field;

    /// Whether a step offers scanning a nameplate photo.
    fn offers_scan(&self, step: Step) -> bool;
}

/// Returns the step content provider for a report kind.
#[must_use]
pub fn content(kind: ReportKind) -> &'static dyn StepContent {
    match kind {
        ReportKind::PressureVessel => &VesselSteps,
        ReportKind::GasInstallation => &GasSteps,
    }
}

const GENERAL: &[FieldSpec] = &[
    spec(Field::ReportDate, "Dátum prehliadky", Input::Date),
    spec(Field::ReportNumber, "Číslo správy", Input::Text),
    spec(Field::OperatorName, "Prevádzkovateľ – názov firmy / osoby", Input::Text),
    spec(Field::OperatorAddress, "Prevádzkovateľ – adresa sídla", Input::Text),
    spec(Field::SiteName, "Miesto prevádzky – názov objektu", Input::Text),
    spec(Field::SiteAddress, "Miesto prevádzky – adresa", Input::Text),
    spec(Field::TechnicianName, "Revízny technik – meno a priezvisko", Input::Text),
    spec(Field::TechnicianLicense, "Revízny technik – č. osvedčenia", Input::Text),
];

const NEXT_INSPECTION: FieldSpec = spec(
    Field::NextInspectionDate,
    "Plánovaná ďalšia revízia",
    Input::Date,
);

/// Steps of a pressure vessel report.
#[derive(Debug, Clone, Copy)]
pub struct VesselSteps;

const VESSEL_TECHNICAL: &[FieldSpec] = &[
    spec(Field::Manufacturer, "Výrobca", Input::Text),
    spec(Field::SerialNumber, "Výrobné číslo", Input::Text),
    spec(Field::YearOfManufacture, "Rok výroby", Input::Text),
    spec(Field::TnsType, "Typ TNS", Input::Text),
    spec(Field::VolumeLiters, "Objem (L)", Input::Text),
    spec(Field::NominalPressure, "Max. tlak (MPa)", Input::Text),
    spec(Field::NominalTemp, "Menovitá teplota (°C)", Input::Text),
    spec(Field::Medium, "Médium", Input::Text),
    spec(Field::Classification, "Zaradenie (napr. Ab1)", Input::Text),
];

const VESSEL_MEASUREMENTS: &[FieldSpec] = &[
    spec(
        Field::Measurement(MeasurementPoint::TopHead),
        MeasurementPoint::TopHead.label(),
        Input::Measurement,
    ),
    spec(
        Field::Measurement(MeasurementPoint::ShellTop),
        MeasurementPoint::ShellTop.label(),
        Input::Measurement,
    ),
    spec(
        Field::Measurement(MeasurementPoint::ShellMiddle),
        MeasurementPoint::ShellMiddle.label(),
        Input::Measurement,
    ),
    spec(
        Field::Measurement(MeasurementPoint::ShellBottom),
        MeasurementPoint::ShellBottom.label(),
        Input::Measurement,
    ),
    spec(
        Field::Measurement(MeasurementPoint::BottomHead),
        MeasurementPoint::BottomHead.label(),
        Input::Measurement,
    ),
    spec(Field::UltrasonicDevice, "Ultrazvukový prístroj", Input::Text),
    spec(Field::PressureTestValue, "Skúšobný tlak (MPa)", Input::Text),
    spec(Field::PressureGauge, "Kontrolný manometer", Input::Text),
];

const VESSEL_CONCLUSION: &[FieldSpec] = &[
    spec(
        Field::VisualInspectionResult,
        "Výsledok vizuálnej kontroly",
        Input::Narrative,
    ),
    NEXT_INSPECTION,
    spec(Field::Conclusion, "Zhodnotenie technika", Input::Narrative),
];

const VESSEL_CONCLUSIONS: &[CannedConclusion] = &[
    CannedConclusion {
        label: "Schopná",
        text: vessel::FIT_CONCLUSION,
    },
    CannedConclusion {
        label: "Neschopná",
        text: vessel::UNFIT_CONCLUSION,
    },
];

impl StepContent for VesselSteps {
    fn title(&self, step: Step) -> &'static str {
        match step {
            Step::General => "Základné Údaje",
            Step::Technical => "Technické Parametre",
            Step::Results => "Merania",
            Step::Conclusion => "Záver",
        }
    }

    fn fields(&self, step: Step) -> &'static [FieldSpec] {
        match step {
            Step::General => GENERAL,
            Step::Technical => VESSEL_TECHNICAL,
            Step::Results => VESSEL_MEASUREMENTS,
            Step::Conclusion => VESSEL_CONCLUSION,
        }
    }

    fn quick_set_years(&self) -> &'static [u32] {
        &[1, 2, 5]
    }

    fn conclusions(&self) -> &'static [CannedConclusion] {
        VESSEL_CONCLUSIONS
    }

    fn conclusion_field(&self) -> Field {
        Field::Conclusion
    }

    fn offers_scan(&self, step: Step) -> bool {
        step == Step::Technical
    }
}

/// Steps of a gas installation report.
#[derive(Debug, Clone, Copy)]
pub struct GasSteps;

const GAS_TECHNICAL: &[FieldSpec] = &[
    spec(
        Field::GasInstallationType,
        "Druh plynového zariadenia",
        Input::Choice(gas::INSTALLATION_TYPES),
    ),
    spec(Field::GasType, "Druh plynu", Input::Choice(gas::GAS_TYPES)),
    spec(
        Field::GasPressureLevel,
        "Tlakový stupeň",
        Input::Choice(gas::PRESSURE_LEVELS),
    ),
    spec(
        Field::GasPipeMaterial,
        "Materiál potrubia",
        Input::Choice(gas::PIPE_MATERIALS),
    ),
    spec(Field::GasOperatingPressure, "Prevádzkový tlak PP (kPa)", Input::Text),
    spec(Field::GasMaxPressure, "Max. prevádzkový tlak MOP (kPa)", Input::Text),
    spec(Field::GasPipeDiameter, "Menovitý priemer DN", Input::Text),
    spec(Field::GasPipeLength, "Dĺžka plynovodu (m)", Input::Text),
    spec(Field::GasApplianceCount, "Počet plynových spotrebičov (ks)", Input::Text),
    spec(Field::GasInstallationYear, "Rok inštalácie", Input::Text),
    spec(
        Field::GasAnnualConsumption,
        "Ročná spotreba plynu (m³/rok) – voliteľné",
        Input::Text,
    ),
];

const GAS_RESULTS: &[FieldSpec] = &[
    spec(
        Field::GasVisualInspectionResult,
        "Vizuálna kontrola zariadenia",
        Input::Narrative,
    ),
    spec(Field::GasTightnessTestPressure, "Skúšobný tlak (kPa)", Input::Text),
    spec(
        Field::GasTightnessTestMedium,
        "Skúšobné médium",
        Input::Choice(gas::TEST_MEDIA),
    ),
    spec(Field::GasTightnessTestDuration, "Dĺžka trvania (min)", Input::Text),
    spec(
        Field::GasTightnessTestResult,
        "Skúška plynotesnosti",
        Input::Tightness,
    ),
    spec(
        Field::GasCheck(ChecklistItem::ShutoffValves),
        ChecklistItem::ShutoffValves.label(),
        Input::Check,
    ),
    spec(
        Field::GasCheck(ChecklistItem::Regulator),
        ChecklistItem::Regulator.label(),
        Input::Check,
    ),
    spec(
        Field::GasCheck(ChecklistItem::Manometer),
        ChecklistItem::Manometer.label(),
        Input::Check,
    ),
    spec(
        Field::GasCheck(ChecklistItem::Meter),
        ChecklistItem::Meter.label(),
        Input::Check,
    ),
    spec(
        Field::GasCheck(ChecklistItem::Chimney),
        ChecklistItem::Chimney.label(),
        Input::Check,
    ),
    spec(
        Field::GasCheck(ChecklistItem::Ventilation),
        ChecklistItem::Ventilation.label(),
        Input::Check,
    ),
    spec(
        Field::GasDefectsFound,
        "Zistené nedostatky a uložené opatrenia",
        Input::Narrative,
    ),
];

const GAS_CONCLUSION: &[FieldSpec] = &[
    NEXT_INSPECTION,
    spec(Field::GasConclusion, "Celkové zhodnotenie", Input::Narrative),
];

const GAS_CONCLUSIONS: &[CannedConclusion] = &[
    CannedConclusion {
        label: "Schopné prevádzky",
        text: gas::FIT_CONCLUSION,
    },
    CannedConclusion {
        label: "Podmienečne",
        text: gas::CONDITIONAL_CONCLUSION,
    },
    CannedConclusion {
        label: "Neschopné",
        text: gas::UNFIT_CONCLUSION,
    },
];

impl StepContent for GasSteps {
    fn title(&self, step: Step) -> &'static str {
        match step {
            Step::General => "Základné Údaje",
            Step::Technical => "Parametre PZ",
            Step::Results => "Výsledky",
            Step::Conclusion => "Záver",
        }
    }

    fn fields(&self, step: Step) -> &'static [FieldSpec] {
        match step {
            Step::General => GENERAL,
            Step::Technical => GAS_TECHNICAL,
            Step::Results => GAS_RESULTS,
            Step::Conclusion => GAS_CONCLUSION,
        }
    }

    fn quick_set_years(&self) -> &'static [u32] {
        &[1, 2, 3]
    }

    fn conclusions(&self) -> &'static [CannedConclusion] {
        GAS_CONCLUSIONS
    }

    fn conclusion_field(&self) -> Field {
        Field::GasConclusion
    }

    fn offers_scan(&self, _step: Step) -> bool {
        false
    }
}
