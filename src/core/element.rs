//! Minimal owned element tree over `quick_xml` events.
//!
//! The Abra export is addressed by tag name (direct children, or any depth for
//! invoice and item containers), so the reader materialises a small tree
//! instead of keeping a path stack. Namespace prefixes are dropped; attributes
//! are not needed by any mapping and are not kept.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::bytes::Regex;

use super::error::{FakturaceError, Result};

/// One XML element: local name, its own character data and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with text and no children.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Create an element with children and no text.
    pub fn node(name: impl Into<String>, children: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            children,
        }
    }

    /// Decode raw document bytes with [`decode_document`], then [`Element::parse`].
    pub fn parse_bytes(bytes: &[u8]) -> Result<Element> {
        Self::parse(&decode_document(bytes)?)
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(Element::node(local_name(e.local_name().as_ref()), Vec::new()));
                }
                Ok(Event::Empty(ref e)) => {
                    let el = Element::node(local_name(e.local_name().as_ref()), Vec::new());
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| FakturaceError::Xml(format!("bad text content: {err}")))?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| FakturaceError::Xml("unbalanced end tag".into()))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(FakturaceError::Xml(format!(
                        "parse error at byte {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(FakturaceError::Xml(format!(
                "unexpected end of document inside <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }
        root.ok_or_else(|| FakturaceError::Xml("document has no root element".into()))
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first direct child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Every element named `name` at any depth, including `self`, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        let mut pending = vec![self];
        while let Some(el) = pending.pop() {
            if el.name == name {
                found.push(el);
            }
            pending.extend(el.children.iter().rev());
        }
        found
    }
}

static DECLARED_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("encoding declaration pattern is valid")
});

/// Decode a source document to text.
///
/// A byte-order mark wins, then the `encoding` of the XML declaration, then
/// UTF-8. Bytes that are not valid in the chosen encoding are an error.
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((enc, bom_len)) => (enc, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| FakturaceError::Xml(format!("document is not valid {}", encoding.name())))
}

fn declared_encoding(bytes: &[u8]) -> Result<&'static Encoding> {
    let Some(caps) = DECLARED_ENCODING.captures(bytes) else {
        return Ok(UTF_8);
    };
    Encoding::for_label(&caps[1]).ok_or_else(|| {
        FakturaceError::Xml(format!(
            "unsupported encoding {:?}",
            String::from_utf8_lossy(&caps[1])
        ))
    })
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None if root.is_none() => *root = Some(el),
        None => {
            return Err(FakturaceError::Xml(format!(
                "second root element <{}>",
                el.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_document() {
        let doc = Element::parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <winstrom version="1.0">
              <faktura-vydana>
                <id>ext:FV-1</id>
                <id>key:12</id>
                <popis><![CDATA[a < b]]></popis>
                <nazFirmy>Kos &amp; syn</nazFirmy>
                <empty/>
              </faktura-vydana>
            </winstrom>"#,
        )
        .unwrap();

        assert_eq!(doc.name, "winstrom");
        let inv = doc.child("faktura-vydana").unwrap();
        let ids: Vec<_> = inv.children_named("id").map(|e| e.text.as_str()).collect();
        assert_eq!(ids, ["ext:FV-1", "key:12"]);
        assert_eq!(inv.child_text("popis"), Some("a < b"));
        assert_eq!(inv.child_text("nazFirmy"), Some("Kos & syn"));
        assert_eq!(inv.child_text("empty"), Some(""));
        assert_eq!(inv.child_text("missing"), None);
    }

    #[test]
    fn namespace_prefixes_are_dropped() {
        let doc = Element::parse(r#"<w:root xmlns:w="urn:x"><w:kod>A</w:kod></w:root>"#).unwrap();
        assert_eq!(doc.name, "root");
        assert_eq!(doc.child_text("kod"), Some("A"));
    }

    #[test]
    fn descendants_in_document_order() {
        let doc = Element::parse("<a><b><c>1</c></b><c>2</c><d><c>3</c></d></a>").unwrap();
        let texts: Vec<_> = doc
            .descendants_named("c")
            .into_iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, ["1", "2", "3"]);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(Element::parse("<a><b></a>").is_err());
        assert!(Element::parse("<a>").is_err());
        assert!(Element::parse("").is_err());
    }

    #[test]
    fn declared_cp1250_is_decoded() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"windows-1250\"?>\n<a><n>Nov\xE1k \x9Akoda</n></a>";
        let doc = Element::parse_bytes(bytes).unwrap();
        assert_eq!(doc.child_text("n"), Some("Novák škoda"));
    }

    #[test]
    fn bom_and_default_utf8() {
        let doc = Element::parse_bytes("\u{feff}<a><n>Novák</n></a>".as_bytes()).unwrap();
        assert_eq!(doc.child_text("n"), Some("Novák"));
        let doc = Element::parse_bytes("<a><n>Novák</n></a>".as_bytes()).unwrap();
        assert_eq!(doc.child_text("n"), Some("Novák"));
    }

    #[test]
    fn undecodable_documents_are_errors() {
        assert!(matches!(
            decode_document(b"<a>Nov\xE1k</a>"),
            Err(FakturaceError::Xml(_))
        ));
        assert!(matches!(
            decode_document(b"<?xml version='1.0' encoding='klingon'?><a/>"),
            Err(FakturaceError::Xml(_))
        ));
    }
}
