use std::io::{Cursor, Read};

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::ClientError;
use crate::models::{DocumentKind, UploadedDocument};
use crate::services::pdfjs;
use crate::utils::collapse_whitespace;

static DOCX_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>(?P<text>[^<]*)</w:t>|(?P<para></w:p>)|(?P<tab><w:tab\s*/>)|(?P<brk><w:(?:br|cr)(?:\s[^>]*)?/>)")
        .expect("static regex")
});

static XML_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("static regex"));

const DOCX_BODY: &str = "word/document.xml";

pub struct DocumentService;

impl DocumentService {
    /// Extracts the text of an uploaded file, dispatching on its name.
    pub async fn extract_text(filename: &str, content: &[u8]) -> Result<UploadedDocument> {
        let kind = DocumentKind::from_filename(filename);
        log::info!("extracting {} ({} bytes) as {}", filename, content.len(), kind.label());

        let text = match kind {
            DocumentKind::Pdf => collapse_whitespace(&pdfjs::extract_text(content).await?),
            DocumentKind::Docx => collapse_whitespace(&Self::docx_to_text(content)?),
            DocumentKind::Text => String::from_utf8_lossy(content).into_owned(),
        };

        Ok(UploadedDocument {
            name: filename.to_string(),
            kind,
            text,
        })
    }

    /// Reads the main document part out of the DOCX container and keeps only
    /// its text runs.
    pub fn docx_to_text(content: &[u8]) -> std::result::Result<String, ClientError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(content))
            .map_err(|e| ClientError::Docx(format!("not a DOCX file: {}", e)))?;
        let mut xml = String::new();
        archive
            .by_name(DOCX_BODY)
            .map_err(|e| ClientError::Docx(format!("{}: {}", DOCX_BODY, e)))?
            .read_to_string(&mut xml)
            .map_err(|e| ClientError::Docx(e.to_string()))?;

        Ok(Self::document_xml_text(&xml))
    }

    fn document_xml_text(xml: &str) -> String {
        let mut text = String::new();
        for caps in DOCX_TOKENS.captures_iter(xml) {
            if let Some(run) = caps.name("text") {
                text.push_str(&decode_entities(run.as_str()));
            } else if caps.name("tab").is_some() {
                text.push('\t');
            } else {
                text.push('\n');
            }
        }
        text
    }

    pub fn load_notice(doc: &UploadedDocument) -> String {
        match doc.kind {
            DocumentKind::Pdf | DocumentKind::Docx => format!(
                "📄 Loaded {}: \"{}\" ({} chars)",
                doc.kind.label(),
                doc.name,
                doc.text.chars().count()
            ),
            DocumentKind::Text => format!("📄 Loaded: \"{}\"", doc.name),
        }
    }

    pub fn failure_notice(kind: DocumentKind, err: &anyhow::Error) -> String {
        match kind {
            DocumentKind::Text => "❌ Error reading file".to_string(),
            _ => format!("❌ Failed to read {}: {}", kind.label(), err),
        }
    }
}

fn decode_entities(raw: &str) -> String {
    XML_ENTITY
        .replace_all(raw, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if name.starts_with("#x") => u32::from_str_radix(&name[2..], 16).ok().and_then(std::char::from_u32),
                _ if name.starts_with('#') => name[1..].parse().ok().and_then(std::char::from_u32),
                _ => None,
            };
            decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
