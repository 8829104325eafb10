use chrono::NaiveDate;

use crate::{
    domain::{Header, MeasurementPoint, VesselDetails, vessel::format_reading},
    render::{
        Block, Document, Row, Section, SectionKind, Signature, footnote,
    },
};

const TITLE: &str = "Správa o odbornej prehliadke a skúške tlakovej nádoby stabilnej";
const SUBTITLE: &str = "podľa vyhl. MPSVaR SR č. 508/2009 Z.z. a STN 69 0012";
const LEGAL_BASIS: &str =
    "Zariadenie je schopné bezpečnej prevádzky podľa § 9 ods. 1 zákona NR SR č. 124/2006 Z.z.";

pub fn render(header: &Header, vessel: &VesselDetails, today: NaiveDate) -> Document {
    let parties = Section::new(SectionKind::Parties).block(Block::Rows(vec![
        Row::new("Prevádzkovateľ", &header.operator_name).with_note(&header.operator_address),
        Row::new("Prevádzka", &header.site_name).with_note(&header.site_address),
    ]));

    let identification = Section::new(SectionKind::Identification).block(Block::Rows(vec![
        Row::new("Druh skúšky", "Vnútorná, Tlaková"),
        Row::new("Dátum vykonania", header.report_date.to_string()),
        Row::new("Ďalšia prehliadka", header.next_inspection_date.to_string()),
        Row::new("Číslo správy", &header.report_number),
        Row::new("Technik", &header.technician_name),
        Row::new("Osvedčenie", &header.technician_license),
    ]));

    let technical = Section::new(SectionKind::Technical).block(Block::Rows(vec![
        Row::new("Výrobca", &vessel.manufacturer),
        Row::new("Typ TNS", &vessel.tns_type),
        Row::new("Výr. číslo", &vessel.serial_number),
        Row::new("Rok výroby", &vessel.year_of_manufacture),
        Row::new("Objem", format!("{} L", vessel.volume_liters)),
        Row::new("Tlak (PS)", format!("{} MPa", vessel.nominal_pressure)),
    ]));

    let measurements = vessel.measurements();
    let mut readings: Vec<Row> = MeasurementPoint::ALL
        .into_iter()
        .map(|point| Row::new(point.label(), format!("{} mm", measurements.get(point))))
        .collect();
    let shell_minimum = measurements
        .shell_minimum()
        .map_or_else(|| "—".to_string(), |min| format!("{} mm", format_reading(min)));
    readings.push(Row::new("Plášť (min)", shell_minimum));

    let results = Section::new(SectionKind::Results)
        .block(Block::lead(
            "Vnútorná prehliadka:",
            format!(
                "Vykonaná skúškou tesnosti a meraním hrúbky steny ultrazvukovým prístrojom {}. \
                 Preverený bol vnútorný plášť nádoby a klenuté dná.",
                vessel.ultrasonic_device
            ),
        ))
        .block(Block::paragraph("Namerané hodnoty hrúbky steny (v mm):"))
        .block(Block::Rows(readings))
        .block(Block::paragraph(format!(
            "Minimálna nameraná hodnota: {} mm.",
            vessel.min_measurement()
        )))
        .block(Block::lead(
            "Skúška tesnosti:",
            format!(
                "Vykonaná médiom {} o tlaku {} MPa.",
                vessel.medium, vessel.pressure_test_value
            ),
        ))
        .block(Block::lead(
            "Kontrolný manometer:",
            format!("{}.", vessel.pressure_gauge),
        ))
        .block(Block::lead("Zistenia:", &vessel.visual_inspection_result));

    let conclusion = Section::new(SectionKind::Conclusion)
        .heading("Celkové zhodnotenie:")
        .block(Block::paragraph(&vessel.conclusion))
        .block(Block::paragraph(LEGAL_BASIS))
        .block(Block::paragraph(format!(
            "Termín nasledujúcej odbornej prehliadky: do {}",
            header.next_inspection_date
        )));

    Document {
        title: TITLE.to_string(),
        subtitle: SUBTITLE.to_string(),
        sections: vec![parties, identification, technical, results, conclusion],
        signatures: [
            Signature::operator(),
            Signature::technician(
                &header.technician_name,
                format!("Revízny technik ({})", header.technician_license),
            ),
        ],
        footnote: footnote(today),
    }
}
