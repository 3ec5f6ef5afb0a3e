//! DOCX text extraction.
//!
//! A `.docx` is a ZIP container; the body lives in `word/document.xml` as
//! WordprocessingML. Only text runs (`w:t`) are kept, with paragraph, tab and
//! break elements translated to whitespace so the result reads line by line.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::extract::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
/// Ceiling on the inflated size of `word/document.xml`.
const MAX_DOCUMENT_XML_BYTES: usize = 32 * 1024 * 1024;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)<w:t(?:\s[^>]*)?/>|<w:t(?:\s[^>]*)?>(?P<text>.*?)</w:t>|</w:p>|<w:tab\s*/>|<w:(?:br|cr)(?:\s[^>]*)?/>",
        )
        .expect("static DOCX token regex is valid")
    })
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|amp|quot|apos);")
            .expect("static XML entity regex is valid")
    })
}

/// Extracts the raw text of a DOCX document held in memory.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let xml = read_document_xml(bytes, MAX_DOCUMENT_XML_BYTES).map_err(ExtractError::Docx)?;
    Ok(text_from_document_xml(&xml))
}

/// Inflates the document part, refusing anything past `max_bytes`. The
/// declared size is checked first; the bounded read catches headers that lie.
fn read_document_xml(bytes: &[u8], max_bytes: usize) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| format!("{DOCUMENT_PART}: {e}"))?;

    let too_large = || format!("{DOCUMENT_PART} exceeds {max_bytes} bytes when inflated");
    if part.size() > max_bytes as u64 {
        return Err(too_large());
    }

    let mut xml = String::new();
    part.by_ref()
        .take(max_bytes as u64 + 1)
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;
    if xml.len() > max_bytes {
        return Err(too_large());
    }
    Ok(xml)
}

/// Walks WordprocessingML and joins text runs into plain text.
fn text_from_document_xml(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);

    for caps in token_regex().captures_iter(xml) {
        if let Some(text) = caps.name("text") {
            out.push_str(&decode_entities(text.as_str()));
            continue;
        }
        let token = &caps[0];
        if token.starts_with("<w:tab") {
            out.push('\t');
        } else if token.starts_with("<w:t") {
            // self-closing run, no text
            continue;
        } else {
            // </w:p>, <w:br/>, <w:cr/>
            out.push('\n');
        }
    }

    out.trim_end().to_string()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    entity_regex()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            match entity {
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "amp" => "&".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity[1..].parse::<u32>().ok()
                    };
                    code.and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}
