use std::fmt;

use crate::{
    domain::{
        Field, FieldError, Report, ReportKind,
        report::add_years,
        steps::{self, CannedConclusion, FieldSpec, StepContent},
    },
    storage::{KeyValueStore, ReportStore, StoreError},
};

/// One of the four editing steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Identification, operator, site and technician.
    General,
    /// Equipment parameters.
    Technical,
    /// Measurements (TNS) or test results (GZ).
    Results,
    /// Visual inspection, next inspection date and conclusion.
    Conclusion,
}

impl Step {
    /// The steps in order.
    pub const ALL: [Self; 4] = [
        Self::General,
        Self::Technical,
        Self::Results,
        Self::Conclusion,
    ];

    /// Zero-based index of the step.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Where the editor currently is: on a step, or on the preview that follows
/// the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    /// Editing a step.
    Step(Step),
    /// Reviewing the rendered document.
    Preview,
}

impl Position {
    /// Index of the preview position.
    pub const PREVIEW: usize = Step::ALL.len();

    /// Zero-based index; the preview comes after the last step.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Step(step) => step.index(),
            Self::Preview => Self::PREVIEW,
        }
    }

    /// The position at an index, if there is one.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        if index == Self::PREVIEW {
            Some(Self::Preview)
        } else {
            Step::ALL.get(index).copied().map(Self::Step)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => write!(f, "step {}", step.index() + 1),
            Self::Preview => f.write_str("preview"),
        }
    }
}

/// Errors from moving around the editor.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StepError {
    /// Later steps are only reached by advancing one at a time.
    #[error("cannot jump ahead to {requested} from {current}")]
    Locked {
        /// The requested position.
        requested: Position,
        /// The current position.
        current: Position,
    },

    /// No position has this index.
    #[error("there is no step {0}")]
    OutOfRange(usize),
}

/// Multi-step editor over a single draft report.
#[derive(Debug, Clone)]
pub struct Editor {
    draft: Report,
    position: Position,
}

impl Editor {
    /// Opens a report for editing at the first step.
    #[must_use]
    pub const fn new(draft: Report) -> Self {
        Self {
            draft,
            position: Position::Step(Step::General),
        }
    }

    /// Opens a fresh draft of the given kind.
    #[must_use]
    pub fn draft_of(kind: ReportKind, today: chrono::NaiveDate) -> Self {
        Self::new(Report::draft(kind, today))
    }

    /// The draft being edited.
    #[must_use]
    pub const fn draft(&self) -> &Report {
        &self.draft
    }

    /// Mutable access to the draft, e.g. for merging extracted fields.
    pub const fn draft_mut(&mut self) -> &mut Report {
        &mut self.draft
    }

    /// Consumes the editor, returning the draft.
    #[must_use]
    pub fn into_draft(self) -> Report {
        self.draft
    }

    /// The current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The step content provider for the draft's kind.
    #[must_use]
    pub fn content(&self) -> &'static dyn StepContent {
        steps::content(self.draft.kind())
    }

    /// Titles of the four steps, in order.
    #[must_use]
    pub fn titles(&self) -> [&'static str; 4] {
        let content = self.content();
        Step::ALL.map(|step| content.title(step))
    }

    /// Fields of the current step; empty on the preview.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self.position {
            Position::Step(step) => self.content().fields(step),
            Position::Preview => &[],
        }
    }

    /// Advances one position, stopping at the preview.
    pub fn next(&mut self) -> Position {
        let index = (self.position.index() + 1).min(Position::PREVIEW);
        self.position = Position::from_index(index).unwrap_or(Position::Preview);
        self.position
    }

    /// Retreats one position, stopping at the first step.
    pub fn back(&mut self) -> Position {
        let index = self.position.index().saturating_sub(1);
        self.position = Position::from_index(index).unwrap_or(Position::Step(Step::General));
        self.position
    }

    /// Jumps to a position at or before the current one.
    ///
    /// # Errors
    ///
    /// Fails when the index is past the current position or past the
    /// preview.
    pub fn jump_to(&mut self, index: usize) -> Result<Position, StepError> {
        let requested = Position::from_index(index).ok_or(StepError::OutOfRange(index))?;
        if requested > self.position {
            return Err(StepError::Locked {
                requested,
                current: self.position,
            });
        }
        self.position = requested;
        Ok(requested)
    }

    /// Goes straight to the preview.
    pub const fn show_preview(&mut self) {
        self.position = Position::Preview;
    }

    /// Sets a field of the draft.
    ///
    /// Measurement edits recompute the derived minimum.
    ///
    /// # Errors
    ///
    /// See [`Report::set_field`].
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        self.draft.set_field(field, value)
    }

    /// Sets the next inspection date to the inspection date plus `years`.
    pub fn quick_set_next_inspection(&mut self, years: u32) {
        self.draft.header.next_inspection_date = add_years(self.draft.header.report_date, years);
    }

    /// Overwrites the conclusion narrative with a canned text.
    ///
    /// # Errors
    ///
    /// Only if the conclusion field does not belong to the draft's kind,
    /// which the step content rules out.
    pub fn apply_conclusion(&mut self, conclusion: &CannedConclusion) -> Result<(), FieldError> {
        let field = self.content().conclusion_field();
        self.draft.set_field(field, conclusion.text)
    }

    /// Saves the draft and keeps editing the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the collection.
    pub fn save<S: KeyValueStore>(&mut self, store: &mut ReportStore<S>) -> Result<(), StoreError> {
        let saved = store.upsert(self.draft.clone())?;
        self.draft = saved.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        domain::MeasurementPoint,
        storage::{FailingStore, MemoryStore},
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn vessel_editor() -> Editor {
        Editor::draft_of(ReportKind::PressureVessel, today())
    }

    #[test]
    fn next_stops_at_preview() {
        let mut editor = vessel_editor();
        for _ in 0..10 {
            editor.next();
        }
        assert_eq!(editor.position(), Position::Preview);
        assert!(editor.fields().is_empty());
    }

    #[test]
    fn back_stops_at_first_step() {
        let mut editor = vessel_editor();
        editor.next();
        assert_eq!(editor.back(), Position::Step(Step::General));
        assert_eq!(editor.back(), Position::Step(Step::General));
    }

    #[test]
    fn jumps_only_backwards() {
        let mut editor = vessel_editor();
        editor.next();
        editor.next();

        assert_eq!(
            editor.jump_to(3),
            Err(StepError::Locked {
                requested: Position::Step(Step::Conclusion),
                current: Position::Step(Step::Results),
            })
        );
        assert_eq!(editor.jump_to(2), Ok(Position::Step(Step::Results)));
        assert_eq!(editor.jump_to(0), Ok(Position::Step(Step::General)));
        assert_eq!(editor.jump_to(9), Err(StepError::OutOfRange(9)));
    }

    #[test]
    fn preview_unlocks_every_step() {
        let mut editor = vessel_editor();
        editor.show_preview();
        assert_eq!(editor.jump_to(3), Ok(Position::Step(Step::Conclusion)));
    }

    #[test]
    fn titles_follow_kind() {
        let gas = Editor::draft_of(ReportKind::GasInstallation, today());
        assert_eq!(
            gas.titles(),
            ["Základné Údaje", "Parametre PZ", "Výsledky", "Záver"]
        );
        assert_eq!(vessel_editor().titles()[2], "Merania");
    }

    #[test]
    fn measurement_edits_update_minimum() {
        let mut editor = vessel_editor();
        for (point, value) in MeasurementPoint::ALL
            .into_iter()
            .zip(["5.20", "5.10", "5.05", "5.10", "5.25"])
        {
            editor.set(Field::Measurement(point), value).unwrap();
        }
        assert_eq!(editor.draft().vessel().unwrap().min_measurement(), "5.05");
    }

    #[test]
    fn quick_set_adds_years_to_inspection_date() {
        let mut editor = vessel_editor();
        editor.set(Field::ReportDate, "2024-02-29").unwrap();

        editor.quick_set_next_inspection(5);
        assert_eq!(
            editor.draft().header.next_inspection_date,
            NaiveDate::from_ymd_opt(2029, 2, 28).unwrap()
        );

        editor.quick_set_next_inspection(4);
        assert_eq!(
            editor.draft().header.next_inspection_date,
            NaiveDate::from_ymd_opt(2028, 2, 29).unwrap()
        );
    }

    #[test]
    fn canned_conclusion_overwrites_narrative() {
        let mut editor = Editor::draft_of(ReportKind::GasInstallation, today());
        let conditional = editor.content().conclusions()[1];

        editor.apply_conclusion(&conditional).unwrap();
        assert_eq!(editor.draft().gas().unwrap().conclusion, conditional.text);

        editor.set(Field::GasConclusion, "Vlastný text").unwrap();
        assert_eq!(editor.draft().gas().unwrap().conclusion, "Vlastný text");
    }

    #[test]
    fn save_keeps_editing_stored_record() {
        let mut store = ReportStore::load(MemoryStore::default());
        let before = store.reports().len();
        let mut editor = vessel_editor();
        editor.set(Field::OperatorName, "ACME s.r.o.").unwrap();

        editor.save(&mut store).unwrap();
        let id = editor.draft().id().clone();
        assert!(!id.is_empty());
        assert_eq!(store.reports().len(), before + 1);

        editor.set(Field::SiteName, "Hala B").unwrap();
        editor.save(&mut store).unwrap();

        assert_eq!(editor.draft().id(), &id);
        assert_eq!(store.reports().len(), before + 1);
        assert_eq!(store.reports()[0].header.site_name, "Hala B");
    }

    #[test]
    fn failed_save_keeps_draft_unsaved_and_retry_works() {
        let mut store = ReportStore::load(FailingStore::new(MemoryStore::default(), 1));
        let before = store.reports().len();
        let mut editor = vessel_editor();
        editor.set(Field::OperatorName, "ACME s.r.o.").unwrap();

        assert!(editor.save(&mut store).is_err());
        assert!(!editor.draft().is_saved());
        assert_eq!(editor.draft().header.operator_name, "ACME s.r.o.");
        assert_eq!(store.reports().len(), before);

        editor.save(&mut store).unwrap();
        assert!(editor.draft().is_saved());
        assert_eq!(store.reports().len(), before + 1);
    }
}
