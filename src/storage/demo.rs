//! Illustrative records used to populate an empty store.

use chrono::{DateTime, Days, Months, NaiveDate, TimeDelta, Utc};

use crate::domain::{
    CheckResult, Measurements, Report, ReportId, ReportKind, TightnessResult, gas,
};

struct Timing {
    days_ago: u64,
    valid_months: u32,
}

impl Timing {
    const fn new(days_ago: u64, valid_months: u32) -> Self {
        Self {
            days_ago,
            valid_months,
        }
    }

    fn apply(&self, report: &mut Report, today: NaiveDate) {
        let inspected = today
            .checked_sub_days(Days::new(self.days_ago))
            .unwrap_or(today);
        report.header.report_date = inspected;
        report.header.next_inspection_date = inspected
            .checked_add_months(Months::new(self.valid_months))
            .unwrap_or(inspected);
    }
}

fn base(
    kind: ReportKind,
    id: &str,
    age_ms: i64,
    now: DateTime<Utc>,
    timing: &Timing,
) -> Report {
    let today = now.date_naive();
    let mut report = Report::draft(kind, today);
    report.assign_identity(
        ReportId::from(id),
        now - TimeDelta::milliseconds(age_ms),
    );
    timing.apply(&mut report, today);
    report
}

fn readings(values: [&str; 5]) -> Measurements {
    let [top_head, shell_top, shell_middle, shell_bottom, bottom_head] =
        values.map(str::to_string);
    Measurements {
        top_head,
        shell_top,
        shell_middle,
        shell_bottom,
        bottom_head,
    }
}

fn vessel(
    mut report: Report,
    number: &str,
    (operator, site, address): (&str, &str, &str),
    (manufacturer, serial, tns_type): (&str, &str, &str),
    (volume, pressure): (&str, &str),
    measurements: [&str; 5],
) -> Report {
    report.header.report_number = number.to_string();
    report.header.operator_name = operator.to_string();
    report.header.site_name = site.to_string();
    report.header.site_address = address.to_string();
    if let Some(details) = report.vessel_mut() {
        details.manufacturer = manufacturer.to_string();
        details.serial_number = serial.to_string();
        details.tns_type = tns_type.to_string();
        details.volume_liters = volume.to_string();
        details.nominal_pressure = pressure.to_string();
        details.set_measurements(readings(measurements));
    }
    report
}

/// The five demo records, three pressure vessels and two gas installations.
///
/// Dates are placed relative to `now` so that the set always contains
/// expired, soon expiring and valid records.
#[must_use]
pub fn demo_reports(now: DateTime<Utc>) -> Vec<Report> {
    let slovnaft = vessel(
        base(
            ReportKind::PressureVessel,
            "demo-1",
            5_000_000,
            now,
            &Timing::new(165, 12),
        ),
        "REV-2024-001",
        (
            "Slovnaft, a.s.",
            "Čerpacia stanica D2",
            "Prístavná 12, Bratislava",
        ),
        ("Dukla Trutnov", "998-A/2021", "Vzdušník ležatý"),
        ("500", "1.0"),
        ["5.20", "5.10", "5.05", "5.10", "5.25"],
    );

    let volkswagen = vessel(
        base(
            ReportKind::PressureVessel,
            "demo-2",
            4_000_000,
            now,
            &Timing::new(130, 3),
        ),
        "REV-2023-442",
        (
            "Volkswagen Slovakia, a.s.",
            "Hala H4 - Lisovňa",
            "Jána Jonáša 1, Bratislava",
        ),
        ("Atlas Copco", "AC-77854", "Vzdušník stojatý"),
        ("2000", "1.6"),
        ["10.50", "10.20", "10.15", "10.20", "10.45"],
    );

    let mut boiler_room = base(
        ReportKind::GasInstallation,
        "demo-3",
        3_000_000,
        now,
        &Timing::new(350, 12),
    );
    boiler_room.header.report_number = "GZ-2024-033".to_string();
    boiler_room.header.operator_name = "Bytové družstvo Petržalka".to_string();
    boiler_room.header.site_name = "Kotolňa K1".to_string();
    boiler_room.header.site_address = "Budatínska 1, Bratislava".to_string();
    if let Some(details) = boiler_room.gas_mut() {
        details.installation_type = gas::INSTALLATION_TYPES[1].to_string();
        details.operating_pressure = "2.1".to_string();
        details.max_pressure = "5".to_string();
        details.pipe_diameter = "DN 32".to_string();
        details.pipe_length = "45".to_string();
        details.appliance_count = "3".to_string();
        details.installation_year = "2005".to_string();
        details.tightness_test_pressure = "1.5".to_string();
        details.tightness_test_result = Some(TightnessResult::Passed);
        details.conclusion = gas::FIT_CONCLUSION.to_string();
    }

    let mut restaurant = base(
        ReportKind::GasInstallation,
        "demo-4",
        2_000_000,
        now,
        &Timing::new(700, 12),
    );
    restaurant.header.report_number = "GZ-2022-118".to_string();
    restaurant.header.operator_name = "Reštaurácia Koliba".to_string();
    restaurant.header.site_name = "Prevádzka - kuchyňa".to_string();
    restaurant.header.site_address = "Partizánska 5, Žilina".to_string();
    if let Some(details) = restaurant.gas_mut() {
        details.installation_type = gas::INSTALLATION_TYPES[0].to_string();
        details.operating_pressure = "2.0".to_string();
        details.max_pressure = "5".to_string();
        details.pipe_material = "Meď".to_string();
        details.pipe_diameter = "DN 20".to_string();
        details.pipe_length = "18".to_string();
        details.appliance_count = "4".to_string();
        details.installation_year = "2010".to_string();
        details.tightness_test_pressure = "1.5".to_string();
        details.tightness_test_result = Some(TightnessResult::Passed);
        details.chimney = Some(CheckResult::Defect);
        details.defects_found =
            "Zistená korózia na dymovodnom potrubí – nutná oprava do 30 dní.".to_string();
        details.conclusion =
            "Plynové zariadenie je podmienečne schopné prevádzky. Nutná oprava dymovodu."
                .to_string();
    }

    let hospital = vessel(
        base(
            ReportKind::PressureVessel,
            "demo-5",
            1_000_000,
            now,
            &Timing::new(180, 12),
        ),
        "REV-2024-085",
        (
            "Nemocnica s poliklinikou",
            "Kompresorovňa kyslíka",
            "Námestie slobody, Sabinov",
        ),
        ("Orlík", "OR-5541", "Vzdušník"),
        ("150", "1.0"),
        ["4.50", "4.40", "4.35", "4.40", "4.50"],
    );

    vec![slovnaft, volkswagen, boiler_room, restaurant, hospital]
}
