//! Cache elements as seen by the resource parser.
//!
//! [`CacheTemplate`] is the read side: the id of a cache or cache template,
//! its heap shorthand and its raw resource elements. [`CacheType`] is the
//! write side: a cache element whose resources get replaced.

use cachepool_error::{XmlConfigurationError, XmlResult};

use crate::codec::CoreSchemaCodec;
use crate::dom::XmlElement;
use crate::model::HeapResource;
use crate::schema;

/// Resource declarations of one `<cache>` or `<cache-template>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTemplate {
    id: String,
    heap: Option<HeapResource>,
    resources: Vec<XmlElement>,
    // A `<resources>` block was present, even if empty
    resources_declared: bool,
}

impl CacheTemplate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            heap: None,
            resources: Vec::new(),
            resources_declared: false,
        }
    }

    pub fn with_heap(mut self, heap: HeapResource) -> Self {
        self.heap = Some(heap);
        self
    }

    pub fn with_resource(mut self, resource: XmlElement) -> Self {
        self.resources.push(resource);
        self.resources_declared = true;
        self
    }

    pub fn with_resources(mut self, resources: impl IntoIterator<Item = XmlElement>) -> Self {
        self.resources.extend(resources);
        self.resources_declared = true;
        self
    }

    /// Alias of a cache or name of a template
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The `<heap>` shorthand, if declared
    pub fn heap(&self) -> Option<&HeapResource> {
        self.heap.as_ref()
    }

    /// Children of `<resources>`, in document order
    pub fn resources(&self) -> &[XmlElement] {
        &self.resources
    }

    /// False when the element relies on a template for its tiers
    pub fn declares_resources(&self) -> bool {
        self.heap.is_some() || self.resources_declared
    }

    /// Read a core `<cache>` or `<cache-template>` element
    pub fn from_element(element: &XmlElement, codec: &CoreSchemaCodec) -> XmlResult<Self> {
        let id = cache_id(element, codec)?;
        let ns = codec.namespace();

        let heap = element
            .child(ns, schema::HEAP)
            .map(|heap| codec.decode_heap(heap))
            .transpose()?;
        let block = element.child(ns, schema::RESOURCES);
        let resources = block
            .map(|resources| resources.children().to_vec())
            .unwrap_or_default();

        Ok(Self {
            id: id.to_string(),
            heap,
            resources,
            resources_declared: block.is_some(),
        })
    }
}

/// A cache element whose resources can be rewritten.
///
/// Everything but the `<heap>` shorthand and the `<resources>` block is kept
/// as is; new resources are written where the old ones were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheType {
    id: String,
    shell: XmlElement,
    children: Vec<XmlElement>,
    resources_at: usize,
    resources: Vec<XmlElement>,
}

impl CacheType {
    /// An empty `<cache alias="…">` in the given core namespace
    pub fn new(namespace: &str, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            shell: XmlElement::namespaced(namespace, schema::CACHE)
                .with_attribute(schema::ALIAS_ATTRIBUTE, alias.as_str()),
            id: alias,
            children: Vec::new(),
            resources_at: 0,
            resources: Vec::new(),
        }
    }

    pub fn from_element(element: &XmlElement, codec: &CoreSchemaCodec) -> XmlResult<Self> {
        let id = cache_id(element, codec)?.to_string();
        let ns = codec.namespace();

        let mut children = Vec::new();
        let mut resources_at = None;
        for child in element.children() {
            if child.is(ns, schema::HEAP) || child.is(ns, schema::RESOURCES) {
                resources_at.get_or_insert(children.len());
            } else {
                children.push(child.clone());
            }
        }

        Ok(Self {
            id,
            shell: element.shallow_clone(),
            resources_at: resources_at.unwrap_or(children.len()),
            children,
            resources: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resources(&self) -> &[XmlElement] {
        &self.resources
    }

    /// Replace the resources of this cache
    pub fn with_resources(mut self, resources: Vec<XmlElement>) -> Self {
        self.resources = resources;
        self
    }

    /// Rebuild the cache element with its current resources
    pub fn to_element(&self) -> XmlElement {
        let (before, after) = self.children.split_at(self.resources_at.min(self.children.len()));
        let mut element = self.shell.clone().with_children(before.iter().cloned());

        if !self.resources.is_empty() {
            let block = match self.shell.namespace() {
                Some(ns) => XmlElement::namespaced(ns, schema::RESOURCES),
                None => XmlElement::new(schema::RESOURCES),
            };
            element.push_child(block.with_children(self.resources.iter().cloned()));
        }

        element.with_children(after.iter().cloned())
    }
}

fn cache_id<'a>(element: &'a XmlElement, codec: &CoreSchemaCodec) -> XmlResult<&'a str> {
    let ns = codec.namespace();
    let id_attribute = if element.is(ns, schema::CACHE) {
        schema::ALIAS_ATTRIBUTE
    } else if element.is(ns, schema::CACHE_TEMPLATE) {
        schema::NAME_ATTRIBUTE
    } else {
        return Err(XmlConfigurationError::unmarshal(
            element.to_string(),
            "expected a cache or cache-template element",
        ));
    };

    element.attribute(id_attribute).ok_or_else(|| {
        XmlConfigurationError::unmarshal(
            element.to_string(),
            format!("missing '{}' attribute", id_attribute),
        )
    })
}
