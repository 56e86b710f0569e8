//! DOCX rendering.
//!
//! Assembles a minimal WordprocessingML package in memory from
//! classified synopsis blocks. Static parts (content types,
//! relationships, styles, numbering) are fixed strings; only
//! `word/document.xml` and `docProps/core.xml` are generated.

use std::io::{Cursor, Write};

use chrono::{SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::config::APP_NAME;
use crate::export::ExportError;
use crate::pipeline::synopsis::formatter::Block;

/// MIME type of the exported document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

// ---------------------------------------------------------------------------
// Static package parts
// ---------------------------------------------------------------------------

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#;

// Font sizes are half-points: 32 = 16pt, 26 = 13pt, 22 = 11pt.
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal">
<w:name w:val="Normal"/>
<w:rPr><w:sz w:val="22"/></w:rPr>
</w:style>
<w:style w:type="paragraph" w:styleId="Heading1">
<w:name w:val="heading 1"/>
<w:basedOn w:val="Normal"/>
<w:pPr><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr>
<w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
</w:style>
<w:style w:type="paragraph" w:styleId="Heading2">
<w:name w:val="heading 2"/>
<w:basedOn w:val="Normal"/>
<w:pPr><w:spacing w:before="200" w:after="100"/><w:outlineLvl w:val="1"/></w:pPr>
<w:rPr><w:b/><w:sz w:val="26"/></w:rPr>
</w:style>
<w:style w:type="paragraph" w:styleId="ListBullet">
<w:name w:val="List Bullet"/>
<w:basedOn w:val="Normal"/>
</w:style>
</w:styles>"#;

const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:abstractNum w:abstractNumId="0">
<w:lvl w:ilvl="0">
<w:numFmt w:val="bullet"/>
<w:lvlText w:val="&#8226;"/>
<w:lvlJc w:val="left"/>
<w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
</w:lvl>
</w:abstractNum>
<w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render synopsis blocks into a complete DOCX file.
///
/// `title` becomes the document title in the core properties.
pub fn render_docx(blocks: &[Block], title: &str) -> Result<Vec<u8>, ExportError> {
    let document = document_xml(blocks)?;
    let core = core_properties_xml(title)?;

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/document.xml", &document),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/numbering.xml", NUMBERING_XML.as_bytes()),
        ("docProps/core.xml", &core),
    ];

    for (name, content) in parts {
        archive
            .start_file(name, options)
            .map_err(|e| ExportError::Zip(e.to_string()))?;
        archive.write_all(content)?;
    }

    let cursor = archive
        .finish()
        .map_err(|e| ExportError::Zip(e.to_string()))?;
    let bytes = cursor.into_inner();

    tracing::debug!(
        blocks = blocks.len(),
        bytes = bytes.len(),
        "Rendered DOCX package"
    );
    Ok(bytes)
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn emit(w: &mut XmlWriter, event: Event<'_>) -> Result<(), ExportError> {
    w.write_event(event)
        .map_err(|e| ExportError::Xml(e.to_string()))
}

fn document_xml(blocks: &[Block]) -> Result<Vec<u8>, ExportError> {
    let mut w = Writer::new(Cursor::new(Vec::new()));
    emit(
        &mut w,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", WORDML_NS));
    emit(&mut w, Event::Start(root))?;
    emit(&mut w, Event::Start(BytesStart::new("w:body")))?;

    for block in blocks {
        write_block(&mut w, block)?;
    }

    // A4 page size in twentieths of a point.
    emit(&mut w, Event::Start(BytesStart::new("w:sectPr")))?;
    let mut page_size = BytesStart::new("w:pgSz");
    page_size.push_attribute(("w:w", "11906"));
    page_size.push_attribute(("w:h", "16838"));
    emit(&mut w, Event::Empty(page_size))?;
    emit(&mut w, Event::End(BytesEnd::new("w:sectPr")))?;

    emit(&mut w, Event::End(BytesEnd::new("w:body")))?;
    emit(&mut w, Event::End(BytesEnd::new("w:document")))?;

    Ok(w.into_inner().into_inner())
}

fn write_block(w: &mut XmlWriter, block: &Block) -> Result<(), ExportError> {
    match block {
        Block::Heading { level, text } => {
            let style = if *level <= 1 { "Heading1" } else { "Heading2" };
            emit(w, Event::Start(BytesStart::new("w:p")))?;
            emit(w, Event::Start(BytesStart::new("w:pPr")))?;
            write_style_ref(w, style)?;
            emit(w, Event::End(BytesEnd::new("w:pPr")))?;
            write_run(w, text)?;
            emit(w, Event::End(BytesEnd::new("w:p")))?;
        }
        Block::Bullet { text } => {
            emit(w, Event::Start(BytesStart::new("w:p")))?;
            emit(w, Event::Start(BytesStart::new("w:pPr")))?;
            write_style_ref(w, "ListBullet")?;
            emit(w, Event::Start(BytesStart::new("w:numPr")))?;
            let mut indent_level = BytesStart::new("w:ilvl");
            indent_level.push_attribute(("w:val", "0"));
            emit(w, Event::Empty(indent_level))?;
            let mut numbering = BytesStart::new("w:numId");
            numbering.push_attribute(("w:val", "1"));
            emit(w, Event::Empty(numbering))?;
            emit(w, Event::End(BytesEnd::new("w:numPr")))?;
            emit(w, Event::End(BytesEnd::new("w:pPr")))?;
            write_run(w, text)?;
            emit(w, Event::End(BytesEnd::new("w:p")))?;
        }
        Block::Paragraph { text } => {
            // Blank synopsis lines keep their vertical space in the document.
            if text.is_empty() {
                emit(w, Event::Empty(BytesStart::new("w:p")))?;
            } else {
                emit(w, Event::Start(BytesStart::new("w:p")))?;
                write_run(w, text)?;
                emit(w, Event::End(BytesEnd::new("w:p")))?;
            }
        }
    }
    Ok(())
}

fn write_style_ref(w: &mut XmlWriter, style: &str) -> Result<(), ExportError> {
    let mut elem = BytesStart::new("w:pStyle");
    elem.push_attribute(("w:val", style));
    emit(w, Event::Empty(elem))
}

fn write_run(w: &mut XmlWriter, text: &str) -> Result<(), ExportError> {
    emit(w, Event::Start(BytesStart::new("w:r")))?;
    let mut t = BytesStart::new("w:t");
    t.push_attribute(("xml:space", "preserve"));
    emit(w, Event::Start(t))?;
    emit(w, Event::Text(BytesText::new(text)))?;
    emit(w, Event::End(BytesEnd::new("w:t")))?;
    emit(w, Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

fn core_properties_xml(title: &str) -> Result<Vec<u8>, ExportError> {
    let mut w = Writer::new(Cursor::new(Vec::new()));
    emit(
        &mut w,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;

    let mut root = BytesStart::new("cp:coreProperties");
    root.push_attribute((
        "xmlns:cp",
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
    ));
    root.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
    root.push_attribute(("xmlns:dcterms", "http://purl.org/dc/terms/"));
    root.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    emit(&mut w, Event::Start(root))?;

    emit(&mut w, Event::Start(BytesStart::new("dc:title")))?;
    emit(&mut w, Event::Text(BytesText::new(title)))?;
    emit(&mut w, Event::End(BytesEnd::new("dc:title")))?;

    emit(&mut w, Event::Start(BytesStart::new("dc:creator")))?;
    emit(&mut w, Event::Text(BytesText::new(APP_NAME)))?;
    emit(&mut w, Event::End(BytesEnd::new("dc:creator")))?;

    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut created_elem = BytesStart::new("dcterms:created");
    created_elem.push_attribute(("xsi:type", "dcterms:W3CDTF"));
    emit(&mut w, Event::Start(created_elem))?;
    emit(&mut w, Event::Text(BytesText::new(&created)))?;
    emit(&mut w, Event::End(BytesEnd::new("dcterms:created")))?;

    emit(&mut w, Event::End(BytesEnd::new("cp:coreProperties")))?;
    Ok(w.into_inner().into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn sample_blocks() -> Vec<Block> {
        vec![
            Block::Heading {
                level: 1,
                text: "Meeting Synopsis".into(),
            },
            Block::Heading {
                level: 2,
                text: "Decisions".into(),
            },
            Block::Bullet {
                text: "Budget approved".into(),
            },
            Block::Paragraph { text: String::new() },
            Block::Paragraph {
                text: "Next review in May.".into(),
            },
        ]
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn package_contains_all_parts() {
        let bytes = render_docx(&sample_blocks(), "Weekly sync").unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/numbering.xml",
            "docProps/core.xml",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing part: {expected}");
        }
    }

    #[test]
    fn headings_map_to_styles() {
        let bytes = render_docx(&sample_blocks(), "t").unwrap();
        let document = read_part(&bytes, "word/document.xml");

        assert!(document.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(document.contains(r#"<w:pStyle w:val="Heading2"/>"#));
        assert!(document.contains("Meeting Synopsis"));
        assert!(document.contains("Decisions"));
    }

    #[test]
    fn bullets_reference_numbering() {
        let bytes = render_docx(&sample_blocks(), "t").unwrap();
        let document = read_part(&bytes, "word/document.xml");

        assert!(document.contains(r#"<w:pStyle w:val="ListBullet"/>"#));
        assert!(document.contains(r#"<w:numId w:val="1"/>"#));
        assert!(document.contains("Budget approved"));
    }

    #[test]
    fn text_is_escaped() {
        let blocks = vec![Block::Paragraph {
            text: "R&D <review>".into(),
        }];
        let bytes = render_docx(&blocks, "t").unwrap();
        let document = read_part(&bytes, "word/document.xml");

        assert!(document.contains("R&amp;D &lt;review&gt;"));
        assert!(!document.contains("R&D <review>"));
    }

    #[test]
    fn blank_paragraph_is_self_closing() {
        let blocks = vec![Block::Paragraph { text: String::new() }];
        let bytes = render_docx(&blocks, "t").unwrap();
        let document = read_part(&bytes, "word/document.xml");

        assert!(document.contains("<w:p/>"));
        assert!(!document.contains("<w:r>"));
    }

    #[test]
    fn no_blocks_still_builds_a_valid_package() {
        let bytes = render_docx(&[], "Empty").unwrap();
        let document = read_part(&bytes, "word/document.xml");

        assert!(document.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(document.contains("<w:body>"));
        assert!(document.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    }

    #[test]
    fn title_lands_in_core_properties() {
        let bytes = render_docx(&sample_blocks(), "Board meeting 2024-03").unwrap();
        let core = read_part(&bytes, "docProps/core.xml");

        assert!(core.contains("<dc:title>Board meeting 2024-03</dc:title>"));
        assert!(core.contains("<dc:creator>minuta</dc:creator>"));
        assert!(core.contains("dcterms:created"));
    }

    #[test]
    fn mime_constant_is_wordprocessingml() {
        assert_eq!(
            DOCX_MIME,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }
}
