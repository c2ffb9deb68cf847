use std::io::{Cursor, Read};

use anyhow::Result;
use regex::Regex;

/// Extracted document text is capped at this many characters before it is
/// interpolated into a prompt.
pub const DOC_TEXT_LIMIT: usize = 2000;

pub const UNSUPPORTED_SENTINEL: &str = "[Unsupported file type]";
pub const PDF_SENTINEL: &str = "[Could not extract text from PDF]";
pub const DOCX_SENTINEL: &str = "[Could not extract text from DOCX]";
pub const PPTX_SENTINEL: &str = "[Could not extract text from PPTX]";
pub const TXT_SENTINEL: &str = "[Could not extract text from TXT]";

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC_MIME: &str = "application/msword";
const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Extract up to [`DOC_TEXT_LIMIT`] characters of plain text from an uploaded
/// document, dispatching on its declared MIME type.
///
/// Never fails: extraction errors are logged and collapse to a per-format
/// sentinel string, unknown types to [`UNSUPPORTED_SENTINEL`].
pub fn extract_text(data: &[u8], content_type: &str) -> String {
    let (extracted, sentinel) = match content_type {
        "application/pdf" => (pdf_text(data), PDF_SENTINEL),
        DOCX_MIME | DOC_MIME => (docx_text(data), DOCX_SENTINEL),
        PPTX_MIME => (pptx_text(data), PPTX_SENTINEL),
        "text/plain" => (plain_text(data), TXT_SENTINEL),
        other => {
            tracing::debug!(content_type = other, "unsupported upload type");
            return UNSUPPORTED_SENTINEL.to_string();
        }
    };

    match extracted {
        Ok(text) => clip(&text, DOC_TEXT_LIMIT),
        Err(err) => {
            tracing::warn!(content_type, error = %err, "document extraction failed");
            sentinel.to_string()
        }
    }
}

fn pdf_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| anyhow::anyhow!("pdf extraction: {e}"))?;
    // Pages come back with layout whitespace; join fragments with single spaces.
    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn docx_text(data: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;
    xml_runs(&xml, "w:t")
}

fn pptx_text(data: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let slide_name = Regex::new(r"^ppt/slides/slide(\d+)\.xml$")?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = slide_name.captures(name)?[1].parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort();

    let mut parts = Vec::new();
    for (_, name) in slides {
        let mut xml = String::new();
        archive.by_name(&name)?.read_to_string(&mut xml)?;
        let text = xml_runs(&xml, "a:t")?;
        if !text.is_empty() {
            parts.push(text);
        }
    }
    Ok(parts.join(" "))
}

fn plain_text(data: &[u8]) -> Result<String> {
    Ok(std::str::from_utf8(data)?.to_string())
}

/// Collect the character content of every `<tag>…</tag>` run in an OOXML
/// part, space-joined and entity-decoded.
fn xml_runs(xml: &str, tag: &str) -> Result<String> {
    let run = Regex::new(&format!(r"<{tag}(?:\s[^>]*)?>([^<]*)</{tag}>"))?;
    let runs: Vec<String> = run
        .captures_iter(xml)
        .map(|cap| html_escape::decode_html_entities(&cap[1]).into_owned())
        .collect();
    Ok(runs.join(" "))
}

/// First `limit` characters, respecting char boundaries.
fn clip(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
