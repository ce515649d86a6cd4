//! Convert a class-annotated HTML resume into a Word (.docx) document.
//!
//! The input is a constrained HTML document using a fixed vocabulary of
//! semantic classes (`name-header`, `contact-info`, `section-title`,
//! `ul-section`, `right-span`, `dot`). Conversion preserves the visual
//! semantics: centered headers, bordered section titles, bullet/indent
//! emulation for list items, bold/italic inheritance on nested spans, and
//! right-aligned trailing spans placed via a tab stop.
//!
//! ```no_run
//! use docx_from_resume::convert_html;
//!
//! # fn main() -> docx_from_resume::Result<()> {
//! let doc = convert_html(r#"<div class="name-header">Jane Doe</div>"#)?;
//! doc.save(std::path::Path::new("resume.docx"))?;
//! # Ok(())
//! # }
//! ```

pub mod docx;
pub mod error;
pub mod styles;
pub mod translate;

pub use docx::{Alignment, Document, Paragraph, Run};
pub use error::{ConvertError, Result};
pub use styles::{classify, lookup, StyleClass, StyleSpec};
pub use translate::convert_html;

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Output filename used when the caller does not supply one.
pub const DEFAULT_OUTPUT: &str = "output.docx";

/// Full conversion entry point: load the HTML source, translate it, and
/// persist the document, returning the resolved output path.
///
/// Exactly one of `html_path` / `html_content` must be given. Validation
/// happens before any parsing or I/O beyond the source read; re-running on
/// identical input produces an identical file.
pub fn convert(
    html_path: Option<&Path>,
    html_content: Option<&str>,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let html = match (html_path, html_content) {
        (Some(_), Some(_)) => {
            return Err(ConvertError::InvalidArguments(
                "supply either a source path or inline content, not both",
            ))
        }
        (None, None) => {
            return Err(ConvertError::InvalidArguments(
                "a source path or inline content is required",
            ))
        }
        (Some(path), None) => {
            if !path.is_file() {
                return Err(ConvertError::SourceNotFound(path.to_path_buf()));
            }
            let text = fs::read_to_string(path).map_err(|e| ConvertError::ReadSource {
                path: path.to_path_buf(),
                source: e,
            })?;
            debug!("read {} bytes from {}", text.len(), path.display());
            text
        }
        (None, Some(content)) => content.to_string(),
    };

    let doc = convert_html(&html)?;
    let out = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    doc.save(&out)?;
    Ok(out)
}
