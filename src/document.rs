/*!
 * Lightweight XHTML document tree.
 *
 * Chapter fragments are parsed into an ordered tree of elements, text and
 * raw markup. Text and attribute values are kept exactly as they appear in
 * the source (entity references included) so a parse/serialize round trip
 * does not rewrite content the translation service never touched.
 */

use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::errors::DocumentError;

/// A node in the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with attributes and children
    Element(Element),
    /// Raw character data, stored as escaped in the source
    Text(String),
    /// Verbatim markup written back untouched (comments, CDATA, entity
    /// references, injected translations)
    Raw(String),
}

/// An element with its tag name, attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name as written in the source
    pub name: String,
    /// Ordered attribute list, values stored as escaped in the source
    pub attrs: Vec<(String, String)>,
    /// Ordered child nodes
    pub children: Vec<Node>,
    /// Whether the element was written as `<tag/>`
    pub self_closing: bool,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Check the tag name, ignoring ASCII case
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Get an attribute value by name (case-insensitive)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same name
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(entry) = self
            .attrs
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            entry.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Concatenated text content of the element and its descendants,
    /// unescaped and trimmed
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out.trim().to_string()
    }

    /// Replace the element's children with a single plain-text node
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![Node::Text(escape(text).into_owned())];
        self.self_closing = false;
    }

    /// Replace the element's children with verbatim markup
    pub fn set_raw_content(&mut self, markup: String) {
        self.children = vec![Node::Raw(markup)];
        self.self_closing = false;
    }

    /// First descendant element with the given tag name, in document order
    pub fn find_first(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if let Node::Element(el) = child {
                if el.has_name(name) {
                    return Some(el);
                }
                if let Some(found) = el.find_first(name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Mutable variant of [`Element::find_first`]
    pub fn find_first_mut(&mut self, name: &str) -> Option<&mut Element> {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if el.has_name(name) {
                    return Some(el);
                }
                if let Some(found) = el.find_first_mut(name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Serialized markup of descendant elements matching any of the given
    /// tag names, in document order. A matching element is serialized whole
    /// and not descended into.
    pub fn content_elements(&self, names: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        collect_content_elements(self, names, &mut out);
        out
    }

    /// Serialize this element and its subtree to markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

/// A parsed chapter file: everything before the root element, the root
/// element itself, and everything after it
#[derive(Debug, Clone)]
pub struct Document {
    /// XML declaration, doctype and leading comments, kept verbatim
    pub prologue: String,
    /// The root element (normally `<html>`)
    pub root: Element,
    /// Trailing content after the root element, kept verbatim
    pub epilogue: String,
}

impl Document {
    /// Parse a document from markup
    pub fn parse(markup: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut prologue = String::new();
        let mut epilogue = String::new();
        let mut root: Option<Element> = None;
        // Open elements; index 0 is the root once it appears
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let element = read_element(&e, &reader, false)?;
                    stack.push(element);
                }
                Ok(Event::End(_)) => {
                    let closed = stack.pop().ok_or_else(|| {
                        DocumentError::Parse("unexpected closing tag".to_string())
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(closed)),
                        None => root = Some(closed),
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = read_element(&e, &reader, true)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = decode(&e, &reader)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text)),
                        None => outside_root(&root, &mut prologue, &mut epilogue, &text),
                    }
                }
                Ok(Event::GeneralRef(e)) => {
                    let name = decode(&e, &reader)?;
                    let raw = format!("&{};", name);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Raw(raw)),
                        None => outside_root(&root, &mut prologue, &mut epilogue, &raw),
                    }
                }
                Ok(Event::CData(e)) => {
                    let raw = format!("<![CDATA[{}]]>", decode(&e, &reader)?);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Raw(raw)),
                        None => outside_root(&root, &mut prologue, &mut epilogue, &raw),
                    }
                }
                Ok(Event::Comment(e)) => {
                    let raw = format!("<!--{}-->", decode(&e, &reader)?);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Raw(raw)),
                        None => outside_root(&root, &mut prologue, &mut epilogue, &raw),
                    }
                }
                Ok(Event::Decl(e)) => {
                    prologue.push_str(&format!("<?{}?>", decode(&e, &reader)?));
                }
                Ok(Event::PI(e)) => {
                    let raw = format!("<?{}?>", decode(&e, &reader)?);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Raw(raw)),
                        None => outside_root(&root, &mut prologue, &mut epilogue, &raw),
                    }
                }
                Ok(Event::DocType(e)) => {
                    prologue.push_str(&format!("<!DOCTYPE {}>", decode(&e, &reader)?));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocumentError::Parse(e.to_string())),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(DocumentError::Parse("unclosed element".to_string()));
        }

        Ok(Self {
            prologue,
            root: root.ok_or(DocumentError::MissingRoot)?,
            epilogue,
        })
    }

    /// Serialize the document back to markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.prologue);
        write_element(&self.root, &mut out);
        out.push_str(&self.epilogue);
        out
    }

    /// Set an attribute on the root element
    pub fn set_root_attr(&mut self, name: &str, value: &str) {
        self.root.set_attr(name, value);
    }

    /// Replace the text of the `<head><title>` node, if the document has one
    pub fn set_title(&mut self, text: &str) {
        if let Some(title) = self.root.find_first_mut("title") {
            title.set_text(text);
        }
    }

    /// Visit every outermost `<section>` element
    pub fn for_each_section<F>(&self, mut visit: F)
    where
        F: FnMut(&Element),
    {
        visit_sections(&self.root, &mut visit);
    }

    /// Visit every outermost `<section>` element mutably
    pub fn for_each_section_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Element),
    {
        visit_sections_mut(&mut self.root, &mut visit);
    }
}

fn read_element(
    e: &quick_xml::events::BytesStart,
    reader: &Reader<&[u8]>,
    self_closing: bool,
) -> Result<Element, DocumentError> {
    let name = decode(e.name().as_ref(), reader)?;
    let mut attrs = Vec::new();
    for attr in e.attributes().with_checks(false).flatten() {
        let key = decode(attr.key.as_ref(), reader)?;
        let value = decode(&attr.value, reader)?;
        attrs.push((key, value));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
        self_closing,
    })
}

fn decode(bytes: &[u8], reader: &Reader<&[u8]>) -> Result<String, DocumentError> {
    reader
        .decoder()
        .decode(bytes)
        .map(|s| s.to_string())
        .map_err(|e| DocumentError::Parse(format!("decode error: {:?}", e)))
}

// Content between the prologue and the root, or after the root, is kept
// verbatim on whichever side of the root it appeared.
fn outside_root(root: &Option<Element>, prologue: &mut String, epilogue: &mut String, raw: &str) {
    if root.is_some() {
        epilogue.push_str(raw);
    } else {
        prologue.push_str(raw);
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(text) => {
                out.push_str(&unescape(text).unwrap_or_else(|_| text.as_str().into()))
            }
            Node::Element(inner) => collect_text(inner, out),
            // Entity references are kept raw in the tree; resolve the ones
            // unescape knows so headings like "Tom &amp; Jerry" read back
            Node::Raw(raw) if raw.starts_with('&') && raw.ends_with(';') => {
                out.push_str(&unescape(raw).unwrap_or_else(|_| raw.as_str().into()))
            }
            Node::Raw(_) => {}
        }
    }
}

fn collect_content_elements(el: &Element, names: &[&str], out: &mut Vec<String>) {
    for child in &el.children {
        if let Node::Element(inner) = child {
            if names.iter().any(|name| inner.has_name(name)) {
                out.push(inner.to_markup());
            } else {
                collect_content_elements(inner, names, out);
            }
        }
    }
}

fn visit_sections<'a>(el: &'a Element, visit: &mut dyn FnMut(&'a Element)) {
    for child in &el.children {
        if let Node::Element(inner) = child {
            if inner.has_name("section") {
                visit(inner);
            } else {
                visit_sections(inner, visit);
            }
        }
    }
}

fn visit_sections_mut(el: &mut Element, visit: &mut dyn FnMut(&mut Element)) {
    for child in &mut el.children {
        if let Node::Element(inner) = child {
            if inner.has_name("section") {
                visit(inner);
            } else {
                visit_sections_mut(inner, visit);
            }
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (key, value) in &el.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    if el.self_closing && el.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &el.children {
        match child {
            Node::Element(inner) => write_element(inner, out),
            Node::Text(text) => out.push_str(text),
            Node::Raw(raw) => out.push_str(raw),
        }
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}
