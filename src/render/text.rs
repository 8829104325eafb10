use std::fmt;

use crate::render::{Block, Document};

impl Document {
    /// Plain text rendition for the terminal.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title.to_uppercase())?;
        writeln!(f, "{}", self.subtitle)?;

        for section in &self.sections {
            writeln!(f)?;
            if let Some(heading) = &section.heading {
                writeln!(f, "{heading}")?;
            }
            for block in &section.blocks {
                match block {
                    Block::Rows(rows) => {
                        let width = rows
                            .iter()
                            .map(|row| row.label.chars().count())
                            .max()
                            .unwrap_or(0);
                        for row in rows {
                            let pad = width - row.label.chars().count();
                            writeln!(f, "  {}:{:pad$} {}", row.label, "", row.value)?;
                            if let Some(note) = &row.note {
                                writeln!(f, "    {:width$}{note}", "")?;
                            }
                        }
                    }
                    Block::Paragraph { lead, text } => match lead {
                        Some(lead) => writeln!(f, "  {lead} {text}")?,
                        None => writeln!(f, "  {text}")?,
                    },
                    Block::Checklist(items) => {
                        for item in items {
                            let symbol = match item.marker.symbol() {
                                "" => " ",
                                symbol => symbol,
                            };
                            writeln!(f, "  [{symbol}] {}: {}", item.item, item.value)?;
                        }
                    }
                }
            }
        }

        writeln!(f)?;
        for signature in &self.signatures {
            if signature.stamp {
                writeln!(f, "  [Pečiatka RT]")?;
            }
            writeln!(f, "  ____________________")?;
            writeln!(f, "  {}", signature.title)?;
            writeln!(f, "  {}", signature.caption)?;
        }

        writeln!(f)?;
        write!(f, "{}", self.footnote)
    }
}
