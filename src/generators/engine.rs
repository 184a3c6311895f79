//! Typst rendering backend.
//!
//! Encodes a `DocumentLayout` to Typst source, compiles it with the `typst`
//! CLI inside a temp directory, and copies the PDF to its final path. The
//! compile step is blocking work and runs on the blocking pool.

use super::layout::{DocumentLayout, LayoutBlock};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to place output file: {0}")]
    OutputIo(#[source] std::io::Error),
    #[error("render task failed: {0}")]
    Task(String),
}

/// Rendering backend seam; the production impl shells out to Typst, tests
/// swap in a mock that writes marker bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Render the layout to `output_path`, returning the byte size written.
    async fn render(&self, layout: &DocumentLayout, output_path: &Path) -> Result<u64, RenderError>;
}

pub struct TypstPdfRenderer;

#[async_trait]
impl PdfRenderer for TypstPdfRenderer {
    async fn render(&self, layout: &DocumentLayout, output_path: &Path) -> Result<u64, RenderError> {
        let source = encode_layout(layout);
        let output_path: PathBuf = output_path.to_path_buf();

        tokio::task::spawn_blocking(move || compile_and_place(&source, &output_path))
            .await
            .map_err(|err| RenderError::Task(err.to_string()))?
    }
}

fn compile_and_place(source: &str, output_path: &Path) -> Result<u64, RenderError> {
    let temp_dir = tempdir().map_err(RenderError::TempDir)?;
    let typ_path = temp_dir.path().join("document.typ");
    let pdf_path = temp_dir.path().join("document.pdf");

    fs::write(&typ_path, source).map_err(RenderError::WriteTypst)?;

    let status = Command::new("typst")
        .arg("compile")
        .arg(&typ_path)
        .arg(&pdf_path)
        .current_dir(temp_dir.path())
        .status()
        .map_err(RenderError::TypstIo)?;

    if !status.success() {
        return Err(RenderError::TypstExit(status.code().unwrap_or(-1)));
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(RenderError::OutputIo)?;
    }
    fs::copy(&pdf_path, output_path).map_err(RenderError::OutputIo)?;

    let size = fs::metadata(output_path)
        .map_err(RenderError::OutputIo)?
        .len();
    Ok(size)
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Encode a layout as a standalone Typst document.
pub fn encode_layout(layout: &DocumentLayout) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str("#set page(paper: \"a4\", margin: 2cm)\n");
    out.push_str("#set text(size: 11pt)\n\n");

    for block in &layout.blocks {
        match block {
            LayoutBlock::Heading(text) => {
                out.push_str(&format!(
                    "#align(center, text(size: 16pt, weight: \"bold\", \"{}\"))\n#v(10pt)\n",
                    escape_typst_string(text)
                ));
            }
            LayoutBlock::Subheading(text) => {
                out.push_str(&format!(
                    "#text(size: 13pt, weight: \"bold\", \"{}\")\n#v(6pt)\n",
                    escape_typst_string(text)
                ));
            }
            LayoutBlock::Paragraph(text) => {
                out.push_str(&format!(
                    "#par(justify: true, text(\"{}\"))\n#v(6pt)\n",
                    escape_typst_string(text)
                ));
            }
            LayoutBlock::KeyValueRows(rows) => {
                out.push_str("#table(\n  columns: (1fr, 2fr),\n  stroke: 0.5pt,\n");
                for (key, value) in rows {
                    out.push_str(&format!(
                        "  [#text(weight: \"bold\", \"{}\")], [#text(\"{}\")],\n",
                        escape_typst_string(key),
                        escape_typst_string(value)
                    ));
                }
                out.push_str(")\n#v(6pt)\n");
            }
            LayoutBlock::Table { headers, rows } => {
                out.push_str(&format!(
                    "#table(\n  columns: {},\n  stroke: 0.5pt,\n",
                    headers.len().max(1)
                ));
                for header in headers {
                    out.push_str(&format!(
                        "  [#text(weight: \"bold\", \"{}\")],",
                        escape_typst_string(header)
                    ));
                }
                out.push('\n');
                for row in rows {
                    for cell in row {
                        out.push_str(&format!("  [#text(\"{}\")],", escape_typst_string(cell)));
                    }
                    out.push('\n');
                }
                out.push_str(")\n#v(6pt)\n");
            }
            LayoutBlock::CenteredCard { lines } => {
                out.push_str(
                    "#align(center + horizon, rect(inset: 18pt, stroke: 0.8pt, [\n",
                );
                for line in lines {
                    out.push_str(&format!(
                        "  #align(center, text(\"{}\"))\n",
                        escape_typst_string(line)
                    ));
                }
                out.push_str("]))\n");
            }
            LayoutBlock::Signature { name, role } => {
                out.push_str(&format!(
                    "#v(24pt)\n#align(right, [#text(\"{}\") #linebreak() #text(style: \"italic\", \"{}\")])\n",
                    escape_typst_string(name),
                    escape_typst_string(role)
                ));
            }
            LayoutBlock::Spacer => out.push_str("#v(12pt)\n"),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_escapes_interpolated_strings() {
        let layout = DocumentLayout::new("Test").paragraph("He said \"go\"\nand left");
        let source = encode_layout(&layout);
        assert!(source.contains(r#"He said \"go\"\nand left"#));
    }

    #[test]
    fn encoding_emits_table_headers_bold() {
        let layout = DocumentLayout::new("T").table(
            vec!["Country".into()],
            vec![vec!["Malaysia".into()]],
        );
        let source = encode_layout(&layout);
        assert!(source.contains("weight: \"bold\", \"Country\""));
        assert!(source.contains("Malaysia"));
    }
}
