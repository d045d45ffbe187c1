use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Cursor;

use crate::core::{FakturaceError, Result};

fn xml_io(e: std::io::Error) -> FakturaceError {
    FakturaceError::Xml(format!("XML write error: {e}"))
}

/// Indenting element writer. The buffer is UTF-8; transcoding to the
/// declared encoding happens afterwards.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new(encoding: &str) -> Result<Self> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| FakturaceError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer.write_event(Event::Start(elem)).map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write `name` only when `text` is present and non-empty.
    pub fn opt_text_element(&mut self, name: &str, text: Option<&str>) -> Result<&mut Self> {
        match text {
            Some(t) if !t.is_empty() => self.text_element(name, t),
            _ => Ok(self),
        }
    }

    /// `<outer><inner>text</inner></outer>`, e.g. `typ:ids` wrappers.
    pub fn wrapped_text_element(&mut self, outer: &str, inner: &str, text: &str) -> Result<&mut Self> {
        self.start_element(outer)?;
        self.text_element(inner, text)?;
        self.end_element(outer)
    }

    /// Write a decimal with exactly `dp` decimal places.
    pub fn decimal_element(&mut self, name: &str, value: Decimal, dp: u32) -> Result<&mut Self> {
        self.text_element(name, &format_fixed(value, dp))
    }
}

/// Format with exactly `dp` decimal places, rounding half away from zero.
pub fn format_fixed(d: Decimal, dp: u32) -> String {
    let mut r = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    r.rescale(dp);
    r.to_string()
}
