use chrono::NaiveDate;

use crate::{
    domain::{ChecklistItem, GasDetails, Header},
    render::{
        Block, CheckRow, Document, Row, Section, SectionKind, Signature, footnote, local_date,
    },
};

const TITLE: &str = "Správa o odbornej prehliadke a odbornej skúške plynového zariadenia";
const SUBTITLE: &str = "v zmysle vyhl. MPSVaR SR č. 508/2009 Z.z. (Príloha č. 3) a § 14 zákona NR SR č. 124/2006 Z.z.";
const LEGAL_BASIS: &str = "Zariadenie bolo skontrolované v zmysle § 14 zákona NR SR č. 124/2006 Z.z. \
                           a vyhl. MPSVaR SR č. 508/2009 Z.z. (Príloha č. 3).";
const TIGHTNESS_ITEM: &str = "Skúška plynotesnosti plynovodnej inštalácie";

/// `value unit`, or a dash when the value is empty.
fn or_dash(value: &str, unit: &str) -> String {
    match (value.is_empty(), unit.is_empty()) {
        (true, _) => "—".to_string(),
        (false, true) => value.to_string(),
        (false, false) => format!("{value} {unit}"),
    }
}

/// `name, address`, dropping the address when empty.
fn with_address(name: &str, address: &str) -> String {
    if address.is_empty() {
        name.to_string()
    } else {
        format!("{name}, {address}")
    }
}

pub fn render(header: &Header, gas: &GasDetails, today: NaiveDate) -> Document {
    let identification = Section::new(SectionKind::Identification).block(Block::Rows(vec![
        Row::new("Číslo správy", &header.report_number),
        Row::new("Dátum vykonania", local_date(header.report_date)),
        Row::new("Druh prehliadky", "Odborná prehliadka a skúška"),
    ]));

    let parties = Section::new(SectionKind::Parties).block(Block::Rows(vec![
        Row::new(
            "Prevádzkovateľ",
            with_address(&header.operator_name, &header.operator_address),
        ),
        Row::new(
            "Prevádzka / Objekt",
            with_address(&header.site_name, &header.site_address),
        ),
        Row::new(
            "Revízny technik",
            format!(
                "{} — osvedčenie RT PZ č. {}",
                header.technician_name, header.technician_license
            ),
        ),
    ]));

    let mut parameters = vec![
        Row::new("Druh plynového zariadenia", &gas.installation_type),
        Row::new("Druh plynu", &gas.gas_type),
        Row::new("Tlakový stupeň", &gas.pressure_level),
        Row::new("Prevádzkový tlak (PP)", format!("{} kPa", gas.operating_pressure)),
        Row::new("Max. prevádzkový tlak (MOP)", format!("{} kPa", gas.max_pressure)),
        Row::new("Materiál potrubia", &gas.pipe_material),
        Row::new("Menovitý priemer (DN)", &gas.pipe_diameter),
        Row::new("Dĺžka plynovodu", or_dash(&gas.pipe_length, "m")),
        Row::new("Počet plynových spotrebičov", or_dash(&gas.appliance_count, "ks")),
        Row::new("Rok inštalácie", or_dash(&gas.installation_year, "")),
    ];
    if !gas.annual_consumption.is_empty() {
        parameters.push(Row::new(
            "Ročná spotreba plynu",
            format!("{} m³/rok", gas.annual_consumption),
        ));
    }
    let technical = Section::new(SectionKind::Technical)
        .heading("I. Technické parametre plynového zariadenia")
        .block(Block::Rows(parameters));

    let checklist = std::iter::once(CheckRow::tightness(
        TIGHTNESS_ITEM,
        gas.tightness_test_result,
    ))
    .chain(
        ChecklistItem::ALL
            .into_iter()
            .map(|item| CheckRow::check(item.document_label(), gas.check(item))),
    )
    .collect();

    let results = Section::new(SectionKind::Results)
        .heading("II. Výsledky odbornej prehliadky a odbornej skúšky")
        .block(Block::Rows(vec![
            Row::new("Vizuálna kontrola zariadenia", &gas.visual_inspection_result),
            Row::new(
                "Skúška plynotesnosti",
                format!(
                    "Médium: {} — Skúšobný tlak: {} kPa — Dĺžka trvania: {} min.",
                    gas.tightness_test_medium,
                    gas.tightness_test_pressure,
                    gas.tightness_test_duration
                ),
            ),
        ]))
        .block(Block::Checklist(checklist))
        .block(Block::lead(
            "Zistené nedostatky a uložené opatrenia:",
            &gas.defects_found,
        ));

    let conclusion = Section::new(SectionKind::Conclusion)
        .heading("III. Celkové zhodnotenie:")
        .block(Block::paragraph(&gas.conclusion))
        .block(Block::paragraph(LEGAL_BASIS))
        .block(Block::paragraph(format!(
            "Termín nasledujúcej odbornej prehliadky a skúšky: do {}",
            local_date(header.next_inspection_date)
        )));

    Document {
        title: TITLE.to_string(),
        subtitle: SUBTITLE.to_string(),
        sections: vec![identification, parties, technical, results, conclusion],
        signatures: [
            Signature::operator(),
            Signature::technician(
                &header.technician_name,
                format!("Revízny technik PZ ({})", header.technician_license),
            ),
        ],
        footnote: footnote(today),
    }
}
