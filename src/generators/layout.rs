//! Document layout instructions.
//!
//! Generators compose one of these instead of talking to a PDF backend
//! directly; the render engine turns it into Typst markup. Keeping the model
//! small and declarative is what lets tests assert on document content
//! without compiling a single PDF.

use serde::Serialize;

/// Layout of one finished document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentLayout {
    pub title: String,
    pub blocks: Vec<LayoutBlock>,
}

/// One visual block, rendered top to bottom.
#[derive(Debug, Clone, Serialize)]
pub enum LayoutBlock {
    /// Centered document heading.
    Heading(String),
    /// Bold section heading.
    Subheading(String),
    /// Justified body paragraph.
    Paragraph(String),
    /// Two-column label/value rows (ID pages, letterheads).
    KeyValueRows(Vec<(String, String)>),
    /// Full table with a header row.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Bordered card centered on the page (visiting card).
    CenteredCard { lines: Vec<String> },
    /// Right-aligned signature block.
    Signature { name: String, role: String },
    /// Vertical whitespace.
    Spacer,
}

impl DocumentLayout {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn heading(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(LayoutBlock::Heading(text.into()));
        self
    }

    pub fn subheading(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(LayoutBlock::Subheading(text.into()));
        self
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(LayoutBlock::Paragraph(text.into()));
        self
    }

    pub fn key_values(mut self, rows: Vec<(String, String)>) -> Self {
        self.blocks.push(LayoutBlock::KeyValueRows(rows));
        self
    }

    pub fn table(mut self, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        self.blocks.push(LayoutBlock::Table { headers, rows });
        self
    }

    pub fn card(mut self, lines: Vec<String>) -> Self {
        self.blocks.push(LayoutBlock::CenteredCard { lines });
        self
    }

    pub fn signature(mut self, name: impl Into<String>, role: impl Into<String>) -> Self {
        self.blocks.push(LayoutBlock::Signature {
            name: name.into(),
            role: role.into(),
        });
        self
    }

    pub fn spacer(mut self) -> Self {
        self.blocks.push(LayoutBlock::Spacer);
        self
    }

    /// All text content flattened, used by tests to assert a value made it
    /// into the document.
    pub fn plain_text(&self) -> String {
        let mut out = vec![self.title.clone()];
        for block in &self.blocks {
            match block {
                LayoutBlock::Heading(t)
                | LayoutBlock::Subheading(t)
                | LayoutBlock::Paragraph(t) => out.push(t.clone()),
                LayoutBlock::KeyValueRows(rows) => {
                    for (k, v) in rows {
                        out.push(format!("{}: {}", k, v));
                    }
                }
                LayoutBlock::Table { headers, rows } => {
                    out.push(headers.join(" | "));
                    for row in rows {
                        out.push(row.join(" | "));
                    }
                }
                LayoutBlock::CenteredCard { lines } => out.extend(lines.iter().cloned()),
                LayoutBlock::Signature { name, role } => {
                    out.push(name.clone());
                    out.push(role.clone());
                }
                LayoutBlock::Spacer => {}
            }
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_block_order() {
        let layout = DocumentLayout::new("Test")
            .heading("Top")
            .paragraph("Body")
            .signature("Jane", "Applicant");
        assert_eq!(layout.blocks.len(), 3);
        assert!(matches!(layout.blocks[0], LayoutBlock::Heading(_)));
    }

    #[test]
    fn plain_text_includes_table_cells() {
        let layout = DocumentLayout::new("T").table(
            vec!["Year".into(), "Income".into()],
            vec![vec!["2025".into(), "960,000".into()]],
        );
        let text = layout.plain_text();
        assert!(text.contains("960,000"));
        assert!(text.contains("Year"));
    }
}
