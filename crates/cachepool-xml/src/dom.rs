//! Namespace-aware XML element tree.
//!
//! Configuration is handled as a small in-memory tree rather than as a
//! stream: the translator looks at whole elements, hands them to extension
//! parsers and builds new ones on the way out. Reading resolves every prefix
//! to its namespace URI; writing re-declares namespaces as needed.

use std::collections::BTreeMap;
use std::fmt;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;

use cachepool_error::{XmlConfigurationError, XmlResult};

use crate::settings::WriterSettings;

/// Namespace bound to the reserved `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
const XML_PREFIX: &str = "xml";

/// An attribute, with the namespace of its prefix if it had one.
///
/// As with elements, the prefix is only a hint for writing.
#[derive(Debug, Clone, Eq)]
pub struct XmlAttribute {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub name: String,
    pub value: String,
}

impl PartialEq for XmlAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name && self.value == other.value
    }
}

/// An element with its namespace resolved.
///
/// The prefix is only a hint for writing; two elements that differ only in
/// prefix are equal.
#[derive(Debug, Clone, Eq)]
pub struct XmlElement {
    namespace: Option<String>,
    prefix: Option<String>,
    name: String,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlElement>,
    text: Option<String>,
}

impl PartialEq for XmlElement {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace
            && self.name == other.name
            && self.attributes == other.attributes
            && self.children == other.children
            && self.text == other.text
    }
}

impl XmlElement {
    /// An element outside of any namespace
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::new(name)
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set an unqualified attribute, replacing any previous value
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = XmlElement>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|attr| attr.namespace.is_none() && attr.name == name)
        {
            Some(attr) => attr.value = value,
            None => self.attributes.push(XmlAttribute {
                namespace: None,
                prefix: None,
                name,
                value,
            }),
        }
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Copy of this element without its children and text
    pub fn shallow_clone(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            prefix: self.prefix.clone(),
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the element has this namespace and local name
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.name == name
    }

    /// Value of an unqualified attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.namespace.is_none() && attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn into_children(self) -> Vec<XmlElement> {
        self.children
    }

    /// First child with this namespace and local name
    pub fn child(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.is(namespace, name))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Read a document and return its root element
    pub fn parse_str(xml: &str) -> XmlResult<XmlElement> {
        let mut reader = NsReader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event().map_err(document_error)?;
            let namespace = owned_namespace(resolved);

            match event {
                Event::Start(start) => {
                    let element = open_element(&reader, namespace, &start)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = open_element(&reader, namespace, &start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        XmlConfigurationError::Document("unbalanced end tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(document_error)?;
                    append_text(&mut stack, &value)?;
                }
                Event::CData(data) => {
                    let value = String::from_utf8(data.into_inner().into_owned())
                        .map_err(document_error)?;
                    append_text(&mut stack, &value)?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlConfigurationError::Document(format!(
                "element {} is never closed",
                open
            )));
        }
        root.ok_or_else(|| XmlConfigurationError::Document("document has no root element".to_string()))
    }

    /// Write this element as a standalone document
    pub fn to_xml_string(&self, settings: &WriterSettings) -> XmlResult<String> {
        let mut writer = if settings.indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', settings.indent)
        } else {
            Writer::new(Vec::new())
        };

        if settings.write_declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(document_error)?;
        }

        let mut scope = NamespaceScope::new(&settings.prefixes);
        write_element(&mut writer, self, &mut scope)?;

        String::from_utf8(writer.into_inner()).map_err(document_error)
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        if let Some(ns) = &self.namespace {
            write!(f, "{{{}}}", ns)?;
        }
        write!(f, "{}", self.name)?;
        for attr in &self.attributes {
            write!(f, " {}=\"{}\"", attr.name, attr.value)?;
        }
        write!(f, ">")
    }
}

fn document_error(err: impl fmt::Display) -> XmlConfigurationError {
    XmlConfigurationError::Document(err.to_string())
}

fn utf8(bytes: &[u8]) -> XmlResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(document_error)
}

/// Detach the resolved namespace from the reader's buffer
fn owned_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>, String> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(String::from_utf8_lossy(&prefix).into_owned()),
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: Result<Option<String>, String>,
    start: &BytesStart<'_>,
) -> XmlResult<XmlElement> {
    let namespace = namespace.map_err(|prefix| {
        XmlConfigurationError::Document(format!("unknown namespace prefix '{}'", prefix))
    })?;

    let mut element = XmlElement {
        namespace,
        prefix: start.name().prefix().map(|p| utf8(p.as_ref())).transpose()?,
        name: utf8(start.local_name().as_ref())?,
        attributes: Vec::new(),
        children: Vec::new(),
        text: None,
    };

    for attr in start.attributes() {
        let attr = attr.map_err(document_error)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let namespace = owned_namespace(resolved).map_err(|prefix| {
            XmlConfigurationError::Document(format!("unknown namespace prefix '{}'", prefix))
        })?;
        element.attributes.push(XmlAttribute {
            namespace,
            prefix: attr.key.prefix().map(|p| utf8(p.as_ref())).transpose()?,
            name: utf8(local.as_ref())?,
            value: attr.unescape_value().map_err(document_error)?.into_owned(),
        });
    }

    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> XmlResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(XmlConfigurationError::Document(format!(
            "second root element {}",
            element
        ))),
    }
}

fn append_text(stack: &mut [XmlElement], value: &str) -> XmlResult<()> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(element) => {
            element.text.get_or_insert_with(String::new).push_str(value);
            Ok(())
        }
        None => Err(XmlConfigurationError::Document(format!(
            "text outside of the root element: '{}'",
            value
        ))),
    }
}

/// Namespace bindings in force while writing, innermost last
struct NamespaceScope<'a> {
    preferred: &'a BTreeMap<String, String>,
    bindings: Vec<(String, String)>,
    generated: usize,
}

impl<'a> NamespaceScope<'a> {
    fn new(preferred: &'a BTreeMap<String, String>) -> Self {
        Self {
            preferred,
            bindings: Vec::new(),
            generated: 0,
        }
    }

    fn lookup(&self, namespace: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(ns, _)| ns == namespace)
            .map(|(_, prefix)| prefix.as_str())
    }

    fn prefix_taken(&self, prefix: &str) -> bool {
        self.bindings.iter().any(|(_, p)| p == prefix)
    }

    /// Prefix for `namespace`, plus the declaration to emit if it is new
    fn bind(&mut self, namespace: &str, hint: Option<&str>) -> (String, Option<(String, String)>) {
        // Bound implicitly, never declared
        if namespace == XML_NAMESPACE {
            return (XML_PREFIX.to_string(), None);
        }
        if let Some(prefix) = self.lookup(namespace) {
            return (prefix.to_string(), None);
        }

        let candidates = [
            hint.filter(|p| !p.is_empty()).map(str::to_string),
            self.preferred.get(namespace).cloned(),
        ];
        let prefix = match candidates
            .into_iter()
            .flatten()
            .find(|p| !self.prefix_taken(p) && !is_reserved_prefix(p))
        {
            Some(prefix) => prefix,
            None => loop {
                let candidate = format!("ns{}", self.generated);
                self.generated += 1;
                if !self.prefix_taken(&candidate) {
                    break candidate;
                }
            },
        };

        self.bindings.push((namespace.to_string(), prefix.clone()));
        (prefix.clone(), Some((format!("xmlns:{}", prefix), namespace.to_string())))
    }
}

/// Prefixes starting with `xml` in any case belong to the XML specs
fn is_reserved_prefix(prefix: &str) -> bool {
    prefix
        .get(..XML_PREFIX.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(XML_PREFIX))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &XmlElement,
    scope: &mut NamespaceScope<'_>,
) -> XmlResult<()> {
    let mark = scope.bindings.len();
    let mut declarations = Vec::new();

    let qname = match &element.namespace {
        Some(ns) => {
            let (prefix, declaration) = scope.bind(ns, element.prefix.as_deref());
            declarations.extend(declaration);
            format!("{}:{}", prefix, element.name)
        }
        None => element.name.clone(),
    };

    let mut attributes = Vec::with_capacity(element.attributes.len());
    for attr in &element.attributes {
        let name = match &attr.namespace {
            Some(ns) => {
                let (prefix, declaration) = scope.bind(ns, attr.prefix.as_deref());
                declarations.extend(declaration);
                format!("{}:{}", prefix, attr.name)
            }
            None => attr.name.clone(),
        };
        attributes.push((name, attr.value.as_str()));
    }

    let mut start = BytesStart::new(qname.as_str());
    for (name, value) in &declarations {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    for (name, value) in &attributes {
        start.push_attribute((name.as_str(), *value));
    }

    if element.children.is_empty() && element.text.is_none() {
        writer.write_event(Event::Empty(start)).map_err(document_error)?;
    } else {
        writer.write_event(Event::Start(start)).map_err(document_error)?;
        if let Some(text) = &element.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(document_error)?;
        }
        for child in &element.children {
            write_element(writer, child, scope)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(qname.as_str())))
            .map_err(document_error)?;
    }

    scope.bindings.truncate(mark);
    Ok(())
}
