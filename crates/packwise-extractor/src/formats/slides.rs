//! PowerPoint (pptx) extraction
//!
//! A pptx file is a zip archive of DrawingML parts. Visible text lives in
//! `<a:t>` runs grouped into `<a:p>` paragraphs, so a pair of regexes is
//! enough to recover it in reading order without a full XML parser.

use super::FormatExtractor;
use crate::error::FormatError;
use once_cell::sync::Lazy;
use packwise_domain::DocumentFormat;
use regex::Regex;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Emitted after every slide
pub const SLIDE_BREAK: &str = "--- SLIDE BREAK ---";

/// Precedes the speaker notes of a slide
pub const NOTES_MARKER: &str = "--- NOTES ---";

static SLIDE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());
static NOTES_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ppt/notesSlides/notesSlide(\d+)\.xml$").unwrap());
static PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<a:p(?:\s[^>]*)?>(.*?)</a:p>").unwrap());
static TEXT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<a:t(?:\s[^>]*)?>([^<]*)</a:t>").unwrap());
static SLIDE_NUMBER_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a:fld\s[^>]*type="slidenum"[^>]*>.*?</a:fld>"#).unwrap()
});

/// Reads slide text and speaker notes from a pptx archive
pub struct SlidesExtractor;

impl FormatExtractor for SlidesExtractor {
    fn name(&self) -> &'static str {
        "slides"
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::Slides
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, FormatError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| FormatError::Open {
            format: "slides",
            reason: e.to_string(),
        })?;

        let mut slides: Vec<(String, String)> = Vec::new();
        let mut notes: HashMap<String, String> = HashMap::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| FormatError::Part {
                part: format!("entry {}", i),
                reason: e.to_string(),
            })?;
            let name = entry.name().to_string();

            let slot = if let Some(caps) = SLIDE_PART.captures(&name) {
                Some((true, caps[1].to_string()))
            } else {
                NOTES_PART
                    .captures(&name)
                    .map(|caps| (false, caps[1].to_string()))
            };
            let Some((is_slide, number)) = slot else {
                continue;
            };

            let mut xml = String::new();
            entry
                .read_to_string(&mut xml)
                .map_err(|e| FormatError::Part {
                    part: name.clone(),
                    reason: e.to_string(),
                })?;

            if is_slide {
                slides.push((number, xml));
            } else {
                notes.insert(number, xml);
            }
        }

        let mut lines = Vec::new();
        for (number, xml) in &slides {
            lines.extend(paragraph_lines(xml));

            if let Some(notes_xml) = notes.get(number) {
                // Notes pages carry a slide-number placeholder field
                let notes_xml = SLIDE_NUMBER_FIELD.replace_all(notes_xml, "");
                let note_lines = paragraph_lines(&notes_xml);
                if !note_lines.is_empty() {
                    lines.push(NOTES_MARKER.to_string());
                    lines.extend(note_lines);
                }
            }

            lines.push(SLIDE_BREAK.to_string());
        }

        // Markers alone are not text
        let has_text = lines
            .iter()
            .any(|line| line != SLIDE_BREAK && line != NOTES_MARKER);
        if has_text {
            Ok(lines)
        } else {
            Ok(Vec::new())
        }
    }
}

/// One line per non-empty `<a:p>` paragraph
fn paragraph_lines(xml: &str) -> Vec<String> {
    PARAGRAPH
        .captures_iter(xml)
        .filter_map(|paragraph| {
            let line: String = TEXT_RUN
                .captures_iter(&paragraph[1])
                .map(|run| unescape(&run[1]))
                .collect();
            let line = line.trim().to_string();
            (!line.is_empty()).then_some(line)
        })
        .collect()
}

/// Decode the entities DrawingML text runs use; `&amp;` last
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn slide_xml(paragraphs: &[&[&str]]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|runs| {
                let runs: String = runs
                    .iter()
                    .map(|run| format!(r#"<a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r>"#, run))
                    .collect();
                format!("<a:p><a:pPr algn=\"l\"/>{}</a:p>", runs)
            })
            .collect();
        format!(
            r#"<?xml version="1.0"?><p:sld><p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
            body
        )
    }

    fn build_pptx(parts: &[(&str, String)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_slides_with_breaks_and_notes() {
        let bytes = build_pptx(&[
            ("[Content_Types].xml", "<Types/>".to_string()),
            (
                "ppt/slides/slide1.xml",
                slide_xml(&[&["Amber Bottle ", "100ml"], &["PET &amp; PP cap"]]),
            ),
            (
                "ppt/slides/slide2.xml",
                slide_xml(&[&["Kraft Mailer Box"]]),
            ),
            (
                "ppt/notesSlides/notesSlide1.xml",
                slide_xml(&[&["MOQ 5000 &lt;per colour&gt;"]]),
            ),
        ]);

        let lines = SlidesExtractor.extract(&bytes).unwrap();
        assert_eq!(
            lines,
            vec![
                "Amber Bottle 100ml",
                "PET & PP cap",
                NOTES_MARKER,
                "MOQ 5000 <per colour>",
                SLIDE_BREAK,
                "Kraft Mailer Box",
                SLIDE_BREAK,
            ]
        );
    }

    #[test]
    fn test_notes_drop_slide_number_but_keep_numbers() {
        let notes = r#"<p:notes><p:txBody><a:p><a:r><a:t>5000</a:t></a:r></a:p><a:p><a:fld id="{B6F15528}" type="slidenum"><a:rPr lang="en-US"/><a:t>1</a:t></a:fld><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:notes>"#;
        let bytes = build_pptx(&[
            ("ppt/slides/slide1.xml", slide_xml(&[&["Paper Cup 8oz"]])),
            ("ppt/notesSlides/notesSlide1.xml", notes.to_string()),
        ]);

        let lines = SlidesExtractor.extract(&bytes).unwrap();
        assert_eq!(
            lines,
            vec!["Paper Cup 8oz", NOTES_MARKER, "5000", SLIDE_BREAK]
        );
    }

    #[test]
    fn test_deck_without_text_is_empty() {
        let bytes = build_pptx(&[
            ("ppt/slides/slide1.xml", slide_xml(&[])),
            ("ppt/media/image1.png", "png".to_string()),
        ]);
        assert!(SlidesExtractor.extract(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_not_a_zip() {
        let result = SlidesExtractor.extract(b"PK but not really");
        assert!(matches!(result, Err(FormatError::Open { .. })));
    }

    #[test]
    fn test_unescape_order() {
        assert_eq!(unescape("&amp;lt;"), "&lt;");
        assert_eq!(unescape("&quot;A&quot; &gt; B"), "\"A\" > B");
    }

    #[test]
    fn test_paragraph_properties_are_not_paragraphs() {
        let xml = r#"<a:p><a:pPr marL="0"/><a:r><a:t xml:space="preserve">Glass Jar</a:t></a:r></a:p>"#;
        assert_eq!(paragraph_lines(xml), vec!["Glass Jar"]);
    }
}
