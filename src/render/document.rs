use crate::domain::{CheckResult, TightnessResult};

/// A rendered report, ready to be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Document title.
    pub title: String,
    /// Legal basis printed under the title.
    pub subtitle: String,
    /// Body sections in print order.
    pub sections: Vec<Section>,
    /// Operator and technician signature fields.
    pub signatures: [Signature; 2],
    /// Generation note at the foot of the page.
    pub footnote: String,
}

impl Document {
    /// The first section of a kind, if present.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }
}

/// Role of a section in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Report number, dates, inspection type.
    Identification,
    /// Operator, site and technician.
    Parties,
    /// Equipment parameters.
    Technical,
    /// Measurements or test results.
    Results,
    /// Overall assessment and next inspection.
    Conclusion,
}

impl SectionKind {
    pub(crate) const fn class(self) -> &'static str {
        match self {
            Self::Identification => "identification",
            Self::Parties => "parties",
            Self::Technical => "technical",
            Self::Results => "results",
            Self::Conclusion => "conclusion",
        }
    }
}

/// A titled group of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Role of the section.
    pub kind: SectionKind,
    /// Heading, if the template prints one.
    pub heading: Option<String>,
    /// Content.
    pub blocks: Vec<Block>,
}

impl Section {
    pub(crate) const fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            heading: None,
            blocks: Vec::new(),
        }
    }

    pub(crate) fn heading(mut self, heading: &str) -> Self {
        self.heading = Some(heading.to_string());
        self
    }

    pub(crate) fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// All labeled rows in the section.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Rows(rows) => rows.as_slice(),
            _ => &[],
        })
    }

    /// Value of the row with the given label.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// Content of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Labeled values.
    Rows(Vec<Row>),
    /// Running text with an optional bold lead-in.
    Paragraph {
        /// Bold lead-in, e.g. `Zistenia:`.
        lead: Option<String>,
        /// The text.
        text: String,
    },
    /// Checklist table with a result marker per item.
    Checklist(Vec<CheckRow>),
}

impl Block {
    pub(crate) fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            lead: None,
            text: text.into(),
        }
    }

    pub(crate) fn lead(lead: &str, text: impl Into<String>) -> Self {
        Self::Paragraph {
            lead: Some(lead.to_string()),
            text: text.into(),
        }
    }
}

/// A labeled value, with an optional second line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Label.
    pub label: String,
    /// Value.
    pub value: String,
    /// Second line under the value, e.g. an address.
    pub note: Option<String>,
}

impl Row {
    pub(crate) fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            note: None,
        }
    }

    pub(crate) fn with_note(mut self, note: &str) -> Self {
        if !note.is_empty() {
            self.note = Some(note.to_string());
        }
        self
    }
}

/// Visual outcome marker of a checklist row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Passed.
    Pass,
    /// Failed.
    Fail,
    /// Not applicable, unset or unrecognised.
    Neutral,
}

impl Marker {
    /// Marker for a recorded result, by its printed value.
    #[must_use]
    pub fn of(value: &str) -> Self {
        match value {
            "OK" | "Vyhovela" => Self::Pass,
            "Závada" | "Nevyhovela" => Self::Fail,
            _ => Self::Neutral,
        }
    }

    /// Symbol printed before the value.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Fail => "✗",
            Self::Neutral => "",
        }
    }

    pub(crate) const fn class(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Neutral => "neutral",
        }
    }
}

/// A checklist row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRow {
    /// The checked item.
    pub item: String,
    /// Printed result; empty when unset.
    pub value: String,
    /// Outcome marker.
    pub marker: Marker,
}

impl CheckRow {
    pub(crate) fn new(item: &str, value: &str) -> Self {
        Self {
            item: item.to_string(),
            value: value.to_string(),
            marker: Marker::of(value),
        }
    }

    pub(crate) fn check(item: &str, result: Option<CheckResult>) -> Self {
        Self::new(item, result.map_or("", CheckResult::as_str))
    }

    pub(crate) fn tightness(item: &str, result: Option<TightnessResult>) -> Self {
        Self::new(item, result.map_or("", TightnessResult::as_str))
    }
}

/// A signature field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Name or role printed under the line.
    pub title: String,
    /// Smaller caption under the title.
    pub caption: String,
    /// Whether a stamp placeholder is printed above the line.
    pub stamp: bool,
}

impl Signature {
    pub(crate) fn operator() -> Self {
        Self {
            title: "Prevádzkovateľ".to_string(),
            caption: "(Podpis a pečiatka)".to_string(),
            stamp: false,
        }
    }

    pub(crate) fn technician(name: &str, caption: String) -> Self {
        Self {
            title: name.to_string(),
            caption,
            stamp: true,
        }
    }
}
