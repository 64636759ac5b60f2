//! Minimal WordprocessingML → HTML renderer.
//!
//! Reads `word/document.xml` out of the zip container and walks it with a
//! streaming XML reader. Supported: paragraphs, `Heading1`–`Heading6`
//! styles, bold, italic, tabs, line breaks, tables, and yellow run
//! highlighting (either `w:highlight` or a `FFFF00` shading fill), which is
//! emitted as an inline `background-color:yellow` span. Paragraphs nested
//! inside a run (text boxes) are inlined into the enclosing paragraph.
//! Everything else is reduced to its text.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use super::{ConvertError, DocumentConverter};

const MAIN_PART: &str = "word/document.xml";

/// Largest uncompressed `word/document.xml` the converter will inflate.
const MAX_MAIN_PART_BYTES: u64 = 64 * 1024 * 1024;

/// Converter for Office Open XML word-processing documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxConverter;

impl DocxConverter {
    /// Creates the converter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentConverter for DocxConverter {
    fn convert(&self, bytes: &[u8]) -> Result<String, ConvertError> {
        let xml = read_main_part(bytes, MAX_MAIN_PART_BYTES)?;
        render_body(&xml)
    }
}

/// Inflates the main part, refusing to go past `limit` bytes whatever the
/// zip headers claim.
fn read_main_part(bytes: &[u8], limit: u64) -> Result<String, ConvertError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ConvertError::InvalidDocument(format!("not a docx container: {e}")))?;
    let mut part = archive
        .by_name(MAIN_PART)
        .map_err(|e| ConvertError::InvalidDocument(format!("missing {MAIN_PART}: {e}")))?;

    let mut raw = Vec::new();
    let read = part
        .by_ref()
        .take(limit.saturating_add(1))
        .read_to_end(&mut raw)
        .map_err(|e| ConvertError::InvalidDocument(format!("unreadable {MAIN_PART}: {e}")))?;
    if u64::try_from(read).unwrap_or(u64::MAX) > limit {
        return Err(ConvertError::InvalidDocument(format!(
            "{MAIN_PART} is larger than {limit} bytes"
        )));
    }

    String::from_utf8(raw)
        .map_err(|e| ConvertError::InvalidDocument(format!("{MAIN_PART} is not UTF-8: {e}")))
}

/// Renders the body of a `document.xml` part as an HTML fragment.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidDocument`] if the XML is malformed.
pub fn render_body(xml: &str) -> Result<String, ConvertError> {
    let mut reader = Reader::from_str(xml);
    let mut renderer = Renderer::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ConvertError::InvalidDocument(format!("malformed {MAIN_PART}: {e}")))?;
        match event {
            Event::Start(e) => renderer.open(&e, false),
            Event::Empty(e) => renderer.open(&e, true),
            Event::End(e) => renderer.close(e.name().as_ref()),
            Event::Text(t) if renderer.in_text => {
                let text = t.unescape().map_err(|e| {
                    ConvertError::InvalidDocument(format!("bad text in {MAIN_PART}: {e}"))
                })?;
                renderer.push_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(renderer.out)
}

#[derive(Debug, Default, Clone, Copy)]
struct RunStyle {
    bold: bool,
    italic: bool,
    highlight: bool,
}

#[derive(Debug, Default)]
struct Run {
    style: RunStyle,
    html: String,
}

impl Run {
    fn into_html(self) -> String {
        let mut html = self.html;
        if html.is_empty() {
            return html;
        }
        if self.style.bold {
            html = format!("<strong>{html}</strong>");
        }
        if self.style.italic {
            html = format!("<em>{html}</em>");
        }
        if self.style.highlight {
            html = format!("<span style=\"background-color:yellow\">{html}</span>");
        }
        html
    }
}

#[derive(Debug)]
struct Paragraph {
    tag: &'static str,
    html: String,
}

/// An element still open while its children are rendered.
#[derive(Debug)]
enum Frame {
    Paragraph(Paragraph),
    Run(Run),
}

#[derive(Debug, Default)]
struct Renderer {
    out: String,
    open: Vec<Frame>,
    in_text: bool,
}

impl Renderer {
    fn open(&mut self, e: &BytesStart<'_>, is_empty: bool) {
        match e.name().as_ref() {
            b"w:p" if !is_empty => self.open.push(Frame::Paragraph(Paragraph {
                tag: "p",
                html: String::new(),
            })),
            b"w:pStyle" => {
                let tag = attr(e, b"w:val").as_deref().and_then(heading_tag);
                if let (Some(paragraph), Some(tag)) = (self.paragraph(), tag) {
                    paragraph.tag = tag;
                }
            }
            b"w:r" if !is_empty => self.open.push(Frame::Run(Run::default())),
            b"w:b" => {
                if let Some(run) = self.run() {
                    run.style.bold = is_on(e);
                }
            }
            b"w:i" => {
                if let Some(run) = self.run() {
                    run.style.italic = is_on(e);
                }
            }
            b"w:highlight" => {
                if let Some(run) = self.run() {
                    run.style.highlight =
                        attr(e, b"w:val").is_some_and(|v| v.eq_ignore_ascii_case("yellow"));
                }
            }
            b"w:shd" => {
                if let Some(run) = self.run()
                    && attr(e, b"w:fill").is_some_and(|v| v.eq_ignore_ascii_case("ffff00"))
                {
                    run.style.highlight = true;
                }
            }
            b"w:t" if !is_empty => self.in_text = true,
            b"w:tab" => self.push_markup("\t"),
            b"w:br" | b"w:cr" => self.push_markup("<br />"),
            b"w:tbl" if !is_empty => self.emit("<table>"),
            b"w:tr" if !is_empty => self.emit("<tr>"),
            b"w:tc" if !is_empty => self.emit("<td>"),
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"w:t" => self.in_text = false,
            b"w:r" => {
                if matches!(self.open.last(), Some(Frame::Run(_)))
                    && let Some(Frame::Run(run)) = self.open.pop()
                {
                    let html = run.into_html();
                    self.emit(&html);
                }
            }
            b"w:p" => {
                if matches!(self.open.last(), Some(Frame::Paragraph(_)))
                    && let Some(Frame::Paragraph(paragraph)) = self.open.pop()
                    && !paragraph.html.is_empty()
                {
                    if self.open.is_empty() {
                        let tag = paragraph.tag;
                        self.out
                            .push_str(&format!("<{tag}>{}</{tag}>", paragraph.html));
                    } else {
                        self.emit(&paragraph.html);
                    }
                }
            }
            b"w:tc" => self.emit("</td>"),
            b"w:tr" => self.emit("</tr>"),
            b"w:tbl" => self.emit("</table>"),
            _ => {}
        }
    }

    /// Innermost open run, if it is the innermost element.
    fn run(&mut self) -> Option<&mut Run> {
        match self.open.last_mut() {
            Some(Frame::Run(run)) => Some(run),
            _ => None,
        }
    }

    /// Innermost open paragraph.
    fn paragraph(&mut self) -> Option<&mut Paragraph> {
        self.open.iter_mut().rev().find_map(|frame| match frame {
            Frame::Paragraph(paragraph) => Some(paragraph),
            Frame::Run(_) => None,
        })
    }

    /// Appends finished markup to the innermost open element, or to the
    /// output when nothing is open.
    fn emit(&mut self, html: &str) {
        match self.open.last_mut() {
            Some(Frame::Paragraph(Paragraph { html: target, .. }))
            | Some(Frame::Run(Run { html: target, .. })) => target.push_str(html),
            None => self.out.push_str(html),
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run() {
            run.html.push_str(&escape(text));
        }
    }

    /// Appends pre-built markup to the open run; tab stops and breaks that
    /// appear outside a run (paragraph properties) are ignored.
    fn push_markup(&mut self, markup: &str) {
        if let Some(run) = self.run() {
            run.html.push_str(markup);
        }
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Toggle properties are on unless `w:val` says otherwise.
fn is_on(e: &BytesStart<'_>) -> bool {
    !matches!(attr(e, b"w:val").as_deref(), Some("0" | "false" | "off"))
}

fn heading_tag(style: &str) -> Option<&'static str> {
    let level = style
        .strip_prefix("Heading")
        .or_else(|| style.strip_prefix("heading"))?
        .trim();
    match level {
        "1" => Some("h1"),
        "2" => Some("h2"),
        "3" => Some("h3"),
        "4" => Some("h4"),
        "5" => Some("h5"),
        "6" => Some("h6"),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::io::Write;

    use super::*;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn render(body: &str) -> String {
        let Ok(html) = render_body(&document(body)) else {
            panic!("render failed");
        };
        html
    }

    #[test]
    fn plain_paragraphs() {
        let html = render(
            r#"<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p><w:p/>"#,
        );
        assert_eq!(html, "<p>Hello world</p>");
    }

    #[test]
    fn headings_and_emphasis() {
        let html = render(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>
<w:p><w:r><w:rPr><w:b/><w:i/></w:rPr><w:t>both</w:t></w:r><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>plain</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            html,
            "<h2>Title</h2><p><em><strong>both</strong></em>plain</p>"
        );
    }

    #[test]
    fn yellow_highlight_becomes_styled_span() {
        let html = render(
            r#"<w:p><w:r><w:rPr><w:highlight w:val="yellow"/></w:rPr><w:t>hot</w:t></w:r><w:r><w:rPr><w:highlight w:val="green"/></w:rPr><w:t>cold</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            html,
            r#"<p><span style="background-color:yellow">hot</span>cold</p>"#
        );
    }

    #[test]
    fn yellow_shading_counts_as_highlight() {
        let html = render(
            r#"<w:p><w:r><w:rPr><w:shd w:val="clear" w:color="auto" w:fill="FFFF00"/></w:rPr><w:t>shaded</w:t></w:r></w:p>"#,
        );
        assert!(html.contains(r#"<span style="background-color:yellow">shaded</span>"#));
    }

    #[test]
    fn text_is_escaped() {
        let html = render(r#"<w:p><w:r><w:t>a &lt; b &amp; c</w:t></w:r></w:p>"#);
        assert_eq!(html, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn tables_breaks_and_tab_stops() {
        let html = render(
            r#"<w:tbl><w:tr><w:tc><w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>a</w:t><w:br/><w:t>b</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:tab/><w:t>c</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(
            html,
            "<table><tr><td><p>a<br />b</p></td><td><p>\tc</p></td></tr></table>"
        );
    }

    #[test]
    fn text_box_paragraphs_stay_inside_the_outer_paragraph() {
        let html = render(
            r#"<w:p><w:r><w:t xml:space="preserve">before </w:t></w:r><w:r><w:pict><v:shape><v:textbox><w:txbxContent><w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>boxed</w:t></w:r></w:p></w:txbxContent></v:textbox></v:shape></w:pict></w:r><w:r><w:t xml:space="preserve"> after</w:t></w:r></w:p><w:p><w:r><w:t>next</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            html,
            "<p>before <strong>boxed</strong> after</p><p>next</p>"
        );
    }

    #[test]
    fn malformed_xml_is_invalid_document() {
        let result = render_body("<w:document><w:body><w:p></w:body>");
        assert!(matches!(result, Err(ConvertError::InvalidDocument(_))));
    }

    #[test]
    fn non_zip_input_is_invalid_document() {
        let result = DocxConverter::new().convert(b"definitely not a zip file");
        assert!(matches!(result, Err(ConvertError::InvalidDocument(_))));
    }

    fn container(xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let Ok(()) = writer.start_file(MAIN_PART, zip::write::FileOptions::default()) else {
            panic!("start_file failed");
        };
        let Ok(()) = writer.write_all(xml.as_bytes()) else {
            panic!("write failed");
        };
        let Ok(cursor) = writer.finish() else {
            panic!("finish failed");
        };
        cursor.into_inner()
    }

    #[test]
    fn converts_zip_container() {
        let bytes = container(&document(r#"<w:p><w:r><w:t>zipped</w:t></w:r></w:p>"#));
        let Ok(html) = DocxConverter::new().convert(&bytes) else {
            panic!("conversion failed");
        };
        assert_eq!(html, "<p>zipped</p>");
    }

    #[test]
    fn oversized_main_part_is_rejected() {
        // Deflates to a few KiB but inflates to 1 MiB.
        let text = "a".repeat(1 << 20);
        let xml = document(&format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"));
        let bytes = container(&xml);
        assert!(bytes.len() < 64 * 1024);

        let limit = 4 * 1024;
        let Err(ConvertError::InvalidDocument(message)) = read_main_part(&bytes, limit) else {
            panic!("expected InvalidDocument");
        };
        assert!(message.contains("larger than"));

        let Ok(read) = read_main_part(&bytes, u64::try_from(xml.len()).unwrap_or(u64::MAX)) else {
            panic!("a part exactly at the limit should be read");
        };
        assert_eq!(read, xml);
    }
}
