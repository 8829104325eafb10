//! Print-ready renditions of a report.
//!
//! [`render`] lays a report out as a [`Document`] using the template of its
//! kind. The document serializes to HTML for printing and PDF export, and to
//! plain text for the terminal.

mod document;
mod gas;
mod html;
mod text;
mod vessel;

use chrono::NaiveDate;
pub use document::{Block, CheckRow, Document, Marker, Row, Section, SectionKind, Signature};

use crate::domain::{Details, Report};

/// Renders a report with the template of its kind.
///
/// `today` is stamped into the generation footnote.
#[must_use]
pub fn render(report: &Report, today: NaiveDate) -> Document {
    match report.details() {
        Details::PressureVessel(details) => vessel::render(&report.header, details, today),
        Details::GasInstallation(details) => gas::render(&report.header, details, today),
    }
}

/// Formats a date the way Slovak documents print it, e.g. `5. 3. 2025`.
fn local_date(date: NaiveDate) -> String {
    date.format("%-d. %-m. %Y").to_string()
}

fn footnote(today: NaiveDate) -> String {
    format!("Vygenerované aplikáciou TlakRevízie • {}", local_date(today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChecklistItem, CheckResult, Field, MeasurementPoint, ReportKind, TightnessResult,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn vessel_report() -> Report {
        let mut report = Report::draft(ReportKind::PressureVessel, today());
        report.header.operator_name = "Slovnaft, a.s.".to_string();
        report.header.operator_address = "Vlčie hrdlo 1, Bratislava".to_string();
        for (point, value) in MeasurementPoint::ALL
            .into_iter()
            .zip(["5.20", "5.10", "5.05", "5.10", "5.25"])
        {
            report.set_field(Field::Measurement(point), value).unwrap();
        }
        report
    }

    fn gas_report() -> Report {
        let mut report = Report::draft(ReportKind::GasInstallation, today());
        report.header.operator_name = "Reštaurácia Koliba".to_string();
        let gas = report.gas_mut().unwrap();
        gas.tightness_test_result = Some(TightnessResult::Passed);
        gas.set_check(ChecklistItem::Chimney, Some(CheckResult::Defect));
        gas.set_check(ChecklistItem::Meter, Some(CheckResult::NotApplicable));
        gas.set_check(ChecklistItem::Regulator, Some(CheckResult::Ok));
        report
    }

    #[test]
    fn vessel_document_shows_every_measurement() {
        let document = render(&vessel_report(), today());
        let results = document.section(SectionKind::Results).unwrap();

        for point in MeasurementPoint::ALL {
            assert!(results.value(point.label()).is_some(), "{point:?}");
        }
        assert_eq!(results.value("Plášť stred"), Some("5.05 mm"));
        assert_eq!(results.value("Plášť (min)"), Some("5.05 mm"));
        assert!(document.to_text().contains("Minimálna nameraná hodnota: 5.05 mm."));
    }

    #[test]
    fn shell_minimum_ignores_heads_and_dashes_when_missing() {
        let mut report = vessel_report();
        report
            .set_field(Field::Measurement(MeasurementPoint::TopHead), "1.00")
            .unwrap();
        let results = render(&report, today())
            .section(SectionKind::Results)
            .cloned()
            .unwrap();
        assert_eq!(results.value("Plášť (min)"), Some("5.05 mm"));

        for point in [
            MeasurementPoint::ShellTop,
            MeasurementPoint::ShellMiddle,
            MeasurementPoint::ShellBottom,
        ] {
            report.set_field(Field::Measurement(point), "").unwrap();
        }
        let document = render(&report, today());
        let results = document.section(SectionKind::Results).unwrap();
        assert_eq!(results.value("Plášť (min)"), Some("—"));
    }

    #[test]
    fn vessel_dates_are_iso() {
        let document = render(&vessel_report(), today());
        let identification = document.section(SectionKind::Identification).unwrap();
        assert_eq!(identification.value("Dátum vykonania"), Some("2024-03-05"));
        assert_eq!(identification.value("Ďalšia prehliadka"), Some("2025-03-05"));
    }

    #[test]
    fn parties_carry_address_as_note() {
        let document = render(&vessel_report(), today());
        let parties = document.section(SectionKind::Parties).unwrap();
        let operator = parties.rows().next().unwrap();
        assert_eq!(operator.value, "Slovnaft, a.s.");
        assert_eq!(operator.note.as_deref(), Some("Vlčie hrdlo 1, Bratislava"));
    }

    #[test]
    fn gas_checklist_markers() {
        let document = render(&gas_report(), today());
        let results = document.section(SectionKind::Results).unwrap();
        let Some(Block::Checklist(items)) = results
            .blocks
            .iter()
            .find(|block| matches!(block, Block::Checklist(_)))
        else {
            panic!("no checklist");
        };

        let markers: Vec<_> = items.iter().map(|item| item.marker).collect();
        assert_eq!(
            markers,
            [
                Marker::Pass,
                Marker::Neutral,
                Marker::Pass,
                Marker::Neutral,
                Marker::Neutral,
                Marker::Fail,
                Marker::Neutral,
            ]
        );
        assert_eq!(items[0].value, "Vyhovela");
        assert_eq!(items[4].value, "N/A");
    }

    #[test]
    fn gas_technical_dashes_and_optional_consumption() {
        let mut report = gas_report();
        let document = render(&report, today());
        let technical = document.section(SectionKind::Technical).unwrap();
        assert_eq!(technical.value("Dĺžka plynovodu"), Some("—"));
        assert_eq!(technical.value("Počet plynových spotrebičov"), Some("—"));
        assert_eq!(technical.value("Rok inštalácie"), Some("—"));
        assert_eq!(technical.value("Ročná spotreba plynu"), None);

        let gas = report.gas_mut().unwrap();
        gas.pipe_length = "18".to_string();
        gas.appliance_count = "4".to_string();
        gas.annual_consumption = "1200".to_string();
        let document = render(&report, today());
        let technical = document.section(SectionKind::Technical).unwrap();
        assert_eq!(technical.value("Dĺžka plynovodu"), Some("18 m"));
        assert_eq!(technical.value("Počet plynových spotrebičov"), Some("4 ks"));
        assert_eq!(technical.value("Ročná spotreba plynu"), Some("1200 m³/rok"));
    }

    #[test]
    fn gas_dates_are_local() {
        let document = render(&gas_report(), today());
        let identification = document.section(SectionKind::Identification).unwrap();
        assert_eq!(identification.value("Dátum vykonania"), Some("5. 3. 2024"));
        assert!(document
            .to_text()
            .contains("Termín nasledujúcej odbornej prehliadky a skúšky: do 5. 3. 2025"));
    }

    #[test]
    fn footnote_carries_today() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        for report in [vessel_report(), gas_report()] {
            let document = render(&report, day);
            assert_eq!(
                document.footnote,
                "Vygenerované aplikáciou TlakRevízie • 15. 10. 2026"
            );
        }
    }

    #[test]
    fn html_is_escaped_and_print_ready() {
        let mut report = gas_report();
        report.header.site_name = "Kuchyňa <B> & sklad".to_string();
        let html = render(&report, today()).to_html().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("size: A4 portrait"));
        assert!(html.contains("Kuchyňa &lt;B&gt; &amp; sklad"));
        assert!(!html.contains("<B>"));
        assert!(html.contains("<td class=\"fail\">✗ Závada</td>"));
        assert!(html.contains("[Pečiatka RT]"));
    }
}
