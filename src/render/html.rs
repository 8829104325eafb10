use askama::Template;

use crate::render::{Block, CheckRow, Document, Row};

const STYLE: &str = "\
@page { size: A4 portrait; margin: 10mm; }
body { font-family: 'Times New Roman', serif; font-size: 11pt; color: #000; }
h1 { font-size: 14pt; text-align: center; text-transform: uppercase; margin: 0; }
.subtitle { text-align: center; font-size: 9pt; margin-bottom: 12pt; }
section { margin-bottom: 10pt; }
h2, h3 { font-size: 11pt; margin: 6pt 0; }
table { width: 100%; border-collapse: collapse; }
td, th { border: 1px solid #000; padding: 3pt 5pt; vertical-align: top; }
td.label { font-weight: bold; width: 40%; }
.note { font-size: 9pt; }
.conclusion { border: 2px solid #000; padding: 6pt; }
td.pass { color: #15803d; font-weight: bold; text-align: center; }
td.fail { color: #b91c1c; font-weight: bold; text-align: center; }
td.neutral { color: #6b7280; text-align: center; }
.signatures { display: flex; justify-content: space-between; margin-top: 36pt; }
.signature { width: 40%; text-align: center; }
.signature .line { border-top: 1px solid #000; margin-top: 30pt; }
.stamp { font-size: 8pt; color: #9ca3af; }
.caption { font-size: 8pt; }
footer { margin-top: 24pt; text-align: center; font-size: 8pt; color: #6b7280; }
";

/// Print-ready page; every interpolated value is HTML-escaped.
#[derive(Template)]
#[template(path = "report.html")]
struct Page<'a> {
    document: &'a Document,
    sections: Vec<SectionView<'a>>,
    style: &'static str,
}

struct SectionView<'a> {
    class: &'static str,
    heading: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

enum Part<'a> {
    Rows(&'a [Row]),
    Paragraph(Option<&'a str>, &'a str),
    Checklist(&'a [CheckRow]),
}

impl<'a> From<&'a Block> for Part<'a> {
    fn from(block: &'a Block) -> Self {
        match block {
            Block::Rows(rows) => Self::Rows(rows),
            Block::Paragraph { lead, text } => Self::Paragraph(lead.as_deref(), text),
            Block::Checklist(items) => Self::Checklist(items),
        }
    }
}

impl Document {
    /// Serializes the document as a standalone, print-ready HTML page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page template fails to render.
    pub fn to_html(&self) -> askama::Result<String> {
        let sections = self
            .sections
            .iter()
            .map(|section| SectionView {
                class: section.kind.class(),
                heading: section.heading.as_deref(),
                parts: section.blocks.iter().map(Part::from).collect(),
            })
            .collect();
        Page {
            document: self,
            sections,
            style: STYLE,
        }
        .render()
    }
}
