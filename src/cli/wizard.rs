//! Interactive step-by-step editing of a single report.

use std::{fmt, path::Path};

use dialoguer::{Confirm, Input as Prompt, Select};
use revizie::{
    Config, Editor, FileStore, Report, ReportStore, Step, render,
    domain::{CannedConclusion, FieldSpec, Input, Position},
};

use super::terminal::Colorize;

/// Label of the option that clears a checklist or test outcome.
const UNSET: &str = "(nevyplnené)";
const CUSTOM: &str = "Vlastná hodnota…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    EditField,
    QuickSet(u32),
    Conclusion(CannedConclusion),
    Scan,
    Next,
    Back,
    Jump,
    Preview,
    Save,
    Export,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EditField => f.write_str("Upraviť pole"),
            Self::QuickSet(years) => write!(f, "Ďalšia revízia o {years} r."),
            Self::Conclusion(conclusion) => write!(f, "Záver: {}", conclusion.label),
            Self::Scan => f.write_str("Načítať údaje zo štítka (foto)"),
            Self::Next => f.write_str("Ďalej"),
            Self::Back => f.write_str("Späť"),
            Self::Jump => f.write_str("Prejsť na krok…"),
            Self::Preview => f.write_str("Náhľad"),
            Self::Save => f.write_str("Uložiť"),
            Self::Export => f.write_str("Exportovať PDF"),
            Self::Quit => f.write_str("Koniec"),
        }
    }
}

/// Actions offered at the editor's current position, most likely first.
fn actions(editor: &Editor) -> Vec<Action> {
    let content = editor.content();
    let Position::Step(step) = editor.position() else {
        return vec![
            Action::Save,
            Action::Export,
            Action::Back,
            Action::Jump,
            Action::Quit,
        ];
    };

    let mut actions = vec![Action::EditField];
    if content.offers_scan(step) {
        actions.push(Action::Scan);
    }
    if step == Step::Conclusion {
        actions.extend(content.quick_set_years().iter().map(|&y| Action::QuickSet(y)));
        actions.extend(content.conclusions().iter().map(|&c| Action::Conclusion(c)));
    }
    actions.push(Action::Next);
    if step != Step::General {
        actions.push(Action::Back);
        actions.push(Action::Jump);
    }
    actions.extend([Action::Preview, Action::Save, Action::Quit]);
    actions
}

/// Choices offered for a field, or `None` for free text.
fn options(input: Input) -> Option<Vec<&'static str>> {
    match input {
        Input::Choice(choices) => Some(choices.iter().copied().chain([CUSTOM]).collect()),
        Input::Check => Some(vec!["OK", "Závada", "N/A", UNSET]),
        Input::Tightness => Some(vec!["Vyhovela", "Nevyhovela", UNSET]),
        Input::Text | Input::Narrative | Input::Date | Input::Measurement => None,
    }
}

/// The step strip, e.g. `1 Základné údaje › 2 Technické údaje › …`.
fn strip(editor: &Editor) -> String {
    let current = editor.position().index();
    editor
        .titles()
        .iter()
        .chain(std::iter::once(&"Náhľad"))
        .enumerate()
        .map(|(index, title)| {
            let label = format!("{} {title}", index + 1);
            match index.cmp(&current) {
                std::cmp::Ordering::Less => label,
                std::cmp::Ordering::Equal => label.strong(),
                std::cmp::Ordering::Greater => label.dim(),
            }
        })
        .collect::<Vec<_>>()
        .join(" › ")
}

/// Step editor driving an [`Editor`] from the terminal.
pub struct Wizard<'a> {
    editor: Editor,
    store: &'a mut ReportStore<FileStore>,
    config: &'a Config,
    saved: Option<Report>,
}

impl<'a> Wizard<'a> {
    pub fn new(draft: Report, store: &'a mut ReportStore<FileStore>, config: &'a Config) -> Self {
        let saved = draft.is_saved().then(|| draft.clone());
        Self {
            editor: Editor::new(draft),
            store,
            config,
            saved,
        }
    }

    fn is_dirty(&self) -> bool {
        self.saved.as_ref() != Some(self.editor.draft())
    }

    pub fn run(mut self) -> anyhow::Result<()> {
        loop {
            println!();
            println!("{}", strip(&self.editor));
            println!("{}", "─".repeat(40).dim());
            self.print_position();

            let actions = actions(&self.editor);
            let labels: Vec<String> = actions.iter().map(ToString::to_string).collect();
            let choice = Select::new()
                .with_prompt("Akcia")
                .items(&labels)
                .default(0)
                .interact()?;
            let Some(action) = actions.get(choice).copied() else {
                continue;
            };

            match action {
                Action::EditField => self.edit_field()?,
                Action::QuickSet(years) => self.editor.quick_set_next_inspection(years),
                Action::Conclusion(conclusion) => self.editor.apply_conclusion(&conclusion)?,
                Action::Scan => self.scan()?,
                Action::Next => {
                    self.editor.next();
                }
                Action::Back => {
                    self.editor.back();
                }
                Action::Jump => self.jump()?,
                Action::Preview => self.editor.show_preview(),
                Action::Save => self.save(),
                Action::Export => {
                    super::export::export_with_progress(
                        self.editor.draft(),
                        self.config,
                        Path::new("."),
                    );
                }
                Action::Quit => {
                    if !self.is_dirty()
                        || Confirm::new()
                            .with_prompt("Zahodiť neuložené zmeny?")
                            .default(false)
                            .interact()?
                    {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn print_position(&self) {
        let draft = self.editor.draft();
        if self.editor.position() == Position::Preview {
            println!("{}", render(draft, super::today()));
            return;
        }

        for spec in self.editor.fields() {
            let value = draft.field(spec.field).unwrap_or_default();
            let value = if value.is_empty() {
                "—".dim()
            } else {
                value
            };
            println!("  {:<40} {value}", spec.label.dim());
        }

        if self.editor.position() == Position::Step(Step::Results) {
            if let Some(vessel) = draft.vessel() {
                println!(
                    "  {:<40} {}",
                    "Minimálna nameraná hrúbka".dim(),
                    vessel.min_measurement().strong()
                );
            }
        }
    }

    fn edit_field(&mut self) -> anyhow::Result<()> {
        let fields = self.editor.fields();
        let labels: Vec<String> = fields
            .iter()
            .map(|spec| {
                let value = self.editor.draft().field(spec.field).unwrap_or_default();
                format!("{} [{value}]", spec.label)
            })
            .collect();
        let choice = Select::new()
            .with_prompt("Pole")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        let Some(spec) = choice.and_then(|index| fields.get(index)) else {
            return Ok(());
        };

        let current = self.editor.draft().field(spec.field).unwrap_or_default();
        let value = prompt_value(spec, &current)?;
        if let Err(e) = self.editor.set(spec.field, &value) {
            eprintln!("{}", e.to_string().danger());
        }
        Ok(())
    }

    fn jump(&mut self) -> anyhow::Result<()> {
        let reachable = self.editor.position().index();
        let titles = self.editor.titles();
        let labels: Vec<String> = titles
            .iter()
            .take(reachable)
            .enumerate()
            .map(|(index, title)| format!("{} {title}", index + 1))
            .collect();
        if labels.is_empty() {
            return Ok(());
        }
        if let Some(index) = Select::new()
            .with_prompt("Krok")
            .items(&labels)
            .default(0)
            .interact_opt()?
        {
            if let Err(e) = self.editor.jump_to(index) {
                eprintln!("{}", e.to_string().warning());
            }
        }
        Ok(())
    }

    fn scan(&mut self) -> anyhow::Result<()> {
        let path: String = Prompt::new()
            .with_prompt("Cesta k fotografii štítku")
            .interact_text()?;
        match super::scan::scan_with_progress(
            self.editor.draft_mut(),
            Path::new(path.trim()),
            self.config,
        ) {
            Ok(0) => println!("{}", "Zo štítka sa nepodarilo nič prečítať".warning()),
            Ok(merged) => println!("{}", format!("Doplnených polí: {merged}").success()),
            Err(e) => eprintln!("{}", format!("Chyba pri analýze: {e}").danger()),
        }
        Ok(())
    }

    /// Saves the draft. A failed write is reported and editing continues.
    fn save(&mut self) {
        if let Err(e) = self.editor.save(&mut *self.store) {
            eprintln!("{}", format!("Uloženie zlyhalo: {e}").danger());
            return;
        }
        self.saved = Some(self.editor.draft().clone());
        println!(
            "{}",
            format!("Uložené: {}", self.editor.draft().header.report_number).success()
        );
    }
}

fn prompt_value(spec: &FieldSpec, current: &str) -> anyhow::Result<String> {
    let Some(choices) = options(spec.input) else {
        return free_text(spec.label, current);
    };

    let default = choices
        .iter()
        .position(|choice| *choice == current)
        .unwrap_or(0);
    let index = Select::new()
        .with_prompt(spec.label)
        .items(&choices)
        .default(default)
        .interact()?;

    match choices.get(index).copied() {
        Some(CUSTOM) => free_text(spec.label, current),
        Some(UNSET) | None => Ok(String::new()),
        Some(choice) => Ok(choice.to_string()),
    }
}

fn free_text(label: &str, current: &str) -> anyhow::Result<String> {
    Ok(Prompt::<String>::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use revizie::{Field, ReportKind};

    use super::*;

    fn editor(kind: ReportKind) -> Editor {
        Editor::draft_of(kind, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn first_step_cannot_go_back() {
        let actions = actions(&editor(ReportKind::PressureVessel));
        assert_eq!(actions[0], Action::EditField);
        assert!(!actions.contains(&Action::Back));
        assert!(!actions.contains(&Action::Scan));
    }

    #[test]
    fn vessel_technical_step_offers_scan() {
        let mut vessel = editor(ReportKind::PressureVessel);
        vessel.next();
        assert!(actions(&vessel).contains(&Action::Scan));

        let mut gas = editor(ReportKind::GasInstallation);
        gas.next();
        assert!(!actions(&gas).contains(&Action::Scan));
    }

    #[test]
    fn conclusion_step_offers_quick_sets() {
        let mut gas = editor(ReportKind::GasInstallation);
        for _ in 0..3 {
            gas.next();
        }
        let quick: Vec<_> = actions(&gas)
            .into_iter()
            .filter_map(|action| match action {
                Action::QuickSet(years) => Some(years),
                _ => None,
            })
            .collect();
        assert_eq!(quick, [1, 2, 3]);
    }

    #[test]
    fn preview_offers_export() {
        let mut vessel = editor(ReportKind::PressureVessel);
        vessel.show_preview();
        let actions = actions(&vessel);
        assert!(actions.contains(&Action::Export));
        assert!(!actions.contains(&Action::EditField));
    }

    #[test]
    fn outcome_inputs_can_be_cleared() {
        assert_eq!(options(Input::Check).unwrap().last(), Some(&UNSET));
        assert_eq!(options(Input::Tightness).unwrap().len(), 3);
        assert!(options(Input::Date).is_none());
        assert_eq!(
            options(Input::Choice(&["A", "B"])).unwrap(),
            ["A", "B", CUSTOM]
        );
    }

    #[test]
    fn failed_save_keeps_editing() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut store = ReportStore::load(FileStore::new(blocker.join("data")));
        let config = Config::default();
        let draft = editor(ReportKind::GasInstallation).draft().clone();

        let mut wizard = Wizard::new(draft, &mut store, &config);
        wizard.editor.set(Field::OperatorName, "Kotolňa").unwrap();
        wizard.save();

        assert!(wizard.saved.is_none());
        assert!(wizard.is_dirty());
        assert!(!wizard.editor.draft().is_saved());
        assert_eq!(wizard.editor.draft().header.operator_name, "Kotolňa");
    }
}
