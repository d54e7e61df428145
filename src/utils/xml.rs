//! A small element tree over `quick-xml` events.
//!
//! Gateway responses are small, so they are read fully into an [`Element`]
//! tree and queried by local name, which covers the handful of path
//! lookups the client needs without pulling in an `XPath` engine.

use std::borrow::Cow;

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::{Error, Result};

/// An XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element.
    ///
    /// Leaf text is kept exactly as sent; whitespace-only text between child
    /// elements is dropped.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(Self::from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| Error::xml("unexpected closing tag", None))?;
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| Error::xml(e, None))?;
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        let bytes = e.into_inner();
                        current.text.push_str(&String::from_utf8_lossy(&bytes));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::xml(
                        format!("XML parse error at position {}: {e}", reader.buffer_position()),
                        None,
                    ));
                }
                // declarations, comments, processing instructions, doctype
                Ok(_) => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::xml("document ended inside an open element", None));
        }
        root.ok_or_else(|| Error::xml("document has no root element", None))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::xml(e, None))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::xml(e, None))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => *root = Some(element),
            None => return Err(Error::xml("document has more than one root element", None)),
        }
        Ok(())
    }

    /// The first direct child with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All direct children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the direct children with the given name joined in document
    /// order, or `""` if there are none.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Cow<'_, str> {
        let mut matches = self.children.iter().filter(|child| child.name == name);
        let Some(first) = matches.next() else {
            return Cow::Borrowed("");
        };
        let mut text = first.text_content();
        for other in matches {
            text.to_mut().push_str(&other.text_content());
        }
        text
    }

    /// Follow a `/`-separated path of direct children.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// Every element named `name` in the subtree, including `self`, in document order.
    #[must_use]
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect_descendants(name, found);
        }
    }

    /// Concatenated text of this element and all of its descendants.
    #[must_use]
    pub fn text_content(&self) -> Cow<'_, str> {
        if self.children.is_empty() {
            return Cow::Borrowed(&self.text);
        }
        let mut text = self.text.clone();
        for child in &self.children {
            text.push_str(&child.text_content());
        }
        Cow::Owned(text)
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Thin wrapper over [`quick_xml::Writer`] for building request documents.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(crate) fn new() -> Result<Self> {
        let mut writer = Self {
            inner: Writer::new(Vec::new()),
        };
        writer.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(writer)
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::Encode(e.to_string()))
    }

    pub(crate) fn start(&mut self, name: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    pub(crate) fn start_with_attributes(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Start(start))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn empty(&mut self, name: &str) -> Result<()> {
        self.write(Event::Empty(BytesStart::new(name)))
    }

    /// Write `<name>text</name>`, escaping the text.
    pub(crate) fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name)?;
        if !text.is_empty() {
            self.write(Event::Text(BytesText::new(text)))?;
        }
        self.end(name)
    }

    pub(crate) fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner()).map_err(|e| Error::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <data listtype="department" count="2">
    <department>
      <DEPARTMENTID>100</DEPARTMENTID>
      <TITLE>Sales &amp; Marketing</TITLE>
    </department>
    <department>
      <DEPARTMENTID>200</DEPARTMENTID>
      <TITLE><![CDATA[R&D]]></TITLE>
      <PARENTID/>
    </department>
  </data>
</response>"#;

    #[test]
    fn descendants_in_document_order() {
        let root = Element::parse(ROWS).unwrap();
        let rows = root.descendants("department");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].child_text("DEPARTMENTID"), "100");
        assert_eq!(rows[1].child_text("DEPARTMENTID"), "200");
    }

    #[test]
    fn text_is_unescaped() {
        let root = Element::parse(ROWS).unwrap();
        let rows = root.descendants("department");
        assert_eq!(rows[0].child_text("TITLE"), "Sales & Marketing");
        assert_eq!(rows[1].child_text("TITLE"), "R&D");
    }

    #[test]
    fn missing_and_empty_children_are_empty_text() {
        let root = Element::parse(ROWS).unwrap();
        let rows = root.descendants("department");
        assert_eq!(rows[0].child_text("PARENTID"), "");
        assert_eq!(rows[1].child_text("PARENTID"), "");
    }

    #[test]
    fn leaf_text_keeps_surrounding_whitespace() {
        let root = Element::parse("<row>\n  <TITLE>  Sales  West </TITLE>\n  <BLANK>   </BLANK>\n</row>").unwrap();
        assert_eq!(root.text, "");
        assert_eq!(root.child_text("TITLE"), "  Sales  West ");
        assert_eq!(root.child_text("BLANK"), "   ");
        assert_eq!(root.text_content(), "  Sales  West    ");
    }

    #[test]
    fn repeated_children_are_joined() {
        let root = Element::parse("<row><MEMO>a</MEMO><ID>1</ID><MEMO>b</MEMO></row>").unwrap();
        assert_eq!(root.child_text("MEMO"), "ab");
        assert_eq!(root.child_text("ID"), "1");
    }

    #[test]
    fn names_match_case_sensitively() {
        let root = Element::parse(ROWS).unwrap();
        assert!(root.descendants("DEPARTMENT").is_empty());
        assert!(root.descendants("department")[0].child("title").is_none());
    }

    #[test]
    fn attributes_and_paths() {
        let root = Element::parse(ROWS).unwrap();
        let data = root.find("data").unwrap();
        assert_eq!(data.attribute("listtype"), Some("department"));
        assert_eq!(data.attribute("count"), Some("2"));
        assert!(root.find("data/nothing").is_none());
    }

    #[test]
    fn namespace_prefixes_are_stripped() {
        let root = Element::parse(r#"<a:root xmlns:a="urn:x"><a:item>1</a:item></a:root>"#).unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.child_text("item"), "1");
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(Element::parse("<a><b></a>"), Err(Error::Xml { .. })));
        assert!(matches!(Element::parse("<a>"), Err(Error::Xml { .. })));
        assert!(matches!(Element::parse(""), Err(Error::Xml { .. })));
    }

    #[test]
    fn writer_escapes_text() {
        let mut writer = XmlWriter::new().unwrap();
        writer.start("query").unwrap();
        writer.text_element("filter", "NAME = 'A&B' AND X < 3").unwrap();
        writer.empty("fields").unwrap();
        writer.end("query").unwrap();
        let xml = writer.finish().unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("A&amp;B"));
        assert!(xml.contains("X &lt; 3"));
        assert!(xml.contains("<fields/>"));

        let root = Element::parse(&xml).unwrap();
        assert_eq!(root.child_text("filter"), "NAME = 'A&B' AND X < 3");
    }
}
