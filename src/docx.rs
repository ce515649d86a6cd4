//! In-memory document model and .docx packaging.
//!
//! The model is an append-only sequence of paragraphs, each an ordered
//! sequence of runs; nothing is revisited after it is appended. Packaging
//! emits minimal WordprocessingML plus the fixed OPC parts and zips them.
//! No timestamps or other nondeterminism: identical models produce
//! byte-identical archives.

use crate::error::{ConvertError, Result};
use log::debug;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    fn jc_val(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// A contiguous span of text sharing one formatting state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points.
    pub size: u32,
    /// Emit a tab before the text; used to push a run to the paragraph's
    /// right tab stop.
    pub tab_before: bool,
}

impl Run {
    pub fn new(text: impl Into<String>, size: u32) -> Self {
        Run {
            text: text.into(),
            bold: false,
            italic: false,
            size,
            tab_before: false,
        }
    }
}

/// One output paragraph: formatting plus its ordered runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub alignment: Alignment,
    /// Line spacing in 240ths of a line; `None` means single spacing.
    pub line: Option<u32>,
    /// Spacing before/after in twips.
    pub space_before: u32,
    pub space_after: u32,
    /// Single bottom border (section title underline).
    pub bottom_border: bool,
    /// Left indent in twips.
    pub left_indent: u32,
    /// Right-aligned tab stop position in twips, when a run uses
    /// `tab_before`.
    pub right_tab_stop: Option<u32>,
    pub runs: Vec<Run>,
}

impl Default for Paragraph {
    fn default() -> Self {
        Paragraph {
            alignment: Alignment::Left,
            line: None,
            space_before: 0,
            space_after: 0,
            bottom_border: false,
            left_indent: 0,
            right_tab_stop: None,
            runs: Vec::new(),
        }
    }
}

impl Paragraph {
    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }
}

/// The output document: an append-only paragraph sequence, exclusively
/// owned by the caller once conversion returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Serialize the full .docx package into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let opt = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);

            zip.start_file("[Content_Types].xml", opt)?;
            zip.write_all(content_types_xml().as_bytes())?;

            zip.start_file("_rels/.rels", opt)?;
            zip.write_all(rels_xml().as_bytes())?;

            zip.start_file("word/document.xml", opt)?;
            zip.write_all(document_xml(self).as_bytes())?;

            zip.start_file("word/_rels/document.xml.rels", opt)?;
            zip.write_all(word_rels_xml().as_bytes())?;

            zip.start_file("word/styles.xml", opt)?;
            zip.write_all(styles_xml().as_bytes())?;

            zip.finish()?;
        }
        Ok(buf)
    }

    /// Write the package to disk, creating parent directories as needed.
    pub fn save(&self, out_path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConvertError::WriteOutput {
                    path: out_path.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let mut file = File::create(out_path).map_err(|e| ConvertError::WriteOutput {
            path: out_path.to_path_buf(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| ConvertError::WriteOutput {
            path: out_path.to_path_buf(),
            source: e,
        })?;
        debug!("wrote {} bytes to {}", bytes.len(), out_path.display());
        Ok(())
    }
}

fn xml_escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn push_paragraph_props(body: &mut String, p: &Paragraph) {
    let has_spacing = p.space_before > 0 || p.space_after > 0 || p.line.is_some();
    let needs_ppr = p.alignment != Alignment::Left
        || has_spacing
        || p.bottom_border
        || p.left_indent > 0
        || p.right_tab_stop.is_some();
    if !needs_ppr {
        return;
    }

    body.push_str("<w:pPr>");
    if p.bottom_border {
        // Same single/sz=6 border python-docx emits for a thin rule.
        body.push_str(
            r#"<w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="000000"/></w:pBdr>"#,
        );
    }
    if let Some(pos) = p.right_tab_stop {
        body.push_str(&format!(
            r#"<w:tabs><w:tab w:val="right" w:pos="{pos}"/></w:tabs>"#
        ));
    }
    if has_spacing {
        body.push_str("<w:spacing");
        if p.space_before > 0 {
            body.push_str(&format!(r#" w:before="{}""#, p.space_before));
        }
        if p.space_after > 0 {
            body.push_str(&format!(r#" w:after="{}""#, p.space_after));
        }
        if let Some(line) = p.line {
            body.push_str(&format!(r#" w:line="{line}" w:lineRule="auto""#));
        }
        body.push_str("/>");
    }
    if p.left_indent > 0 {
        body.push_str(&format!(r#"<w:ind w:left="{}"/>"#, p.left_indent));
    }
    if p.alignment != Alignment::Left {
        body.push_str(&format!(r#"<w:jc w:val="{}"/>"#, p.alignment.jc_val()));
    }
    body.push_str("</w:pPr>");
}

fn push_run(body: &mut String, run: &Run) {
    body.push_str("<w:r>");
    body.push_str("<w:rPr>");
    if run.bold {
        body.push_str("<w:b/>");
    }
    if run.italic {
        body.push_str("<w:i/>");
    }
    body.push_str(&format!(
        r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
        run.size
    ));
    body.push_str("</w:rPr>");
    if run.tab_before {
        body.push_str("<w:tab/>");
    }
    body.push_str(r#"<w:t xml:space="preserve">"#);
    body.push_str(&xml_escape_text(&run.text));
    body.push_str("</w:t></w:r>");
}

/// Render `word/document.xml` for the whole model.
pub fn document_xml(doc: &Document) -> String {
    let mut body = String::new();
    for p in &doc.paragraphs {
        body.push_str("<w:p>");
        push_paragraph_props(&mut body, p);
        for run in &p.runs {
            push_run(&mut body, run);
        }
        body.push_str("</w:p>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"
 xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
 xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
 xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordprocessingml"
 mc:Ignorable="w14">
  <w:body>
    {body}
    <w:sectPr>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#
    )
}

fn content_types_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#
}

fn rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
}

fn word_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
}

fn styles_xml() -> &'static str {
    // Normal = Arial 11pt, matching the resume template's body font.
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
    <w:rPr>
      <w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial"/>
      <w:sz w:val="22"/>
      <w:szCs w:val="22"/>
    </w:rPr>
  </w:style>
</w:styles>"#
}
