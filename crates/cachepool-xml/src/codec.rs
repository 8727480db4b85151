//! Schema-bound decoding and encoding of the core resource elements.

use std::str::FromStr;

use dashu::integer::UBig;
use tracing::trace;

use cachepool_error::{XmlConfigurationError, XmlResult};

use crate::dom::XmlElement;
use crate::model::{CoreResource, DiskResource, HeapResource, MemoryResource};
use crate::schema;
use crate::settings::ParserSettings;

/// Maps core elements to [`CoreResource`] values and back.
///
/// Decoding checks the structure the schema imposes: a non-negative integer
/// body, no child elements, a well-formed `persistent` flag and, in strict
/// mode, no attributes beyond the declared ones. Unit tokens are carried
/// through untouched. Encoding only ever produces the schema's canonical
/// unit tokens and rejects anything else.
#[derive(Debug, Clone)]
pub struct CoreSchemaCodec {
    namespace: String,
    strict_attributes: bool,
}

impl Default for CoreSchemaCodec {
    fn default() -> Self {
        Self {
            namespace: schema::CORE_SCHEMA_NAMESPACE.to_string(),
            strict_attributes: true,
        }
    }
}

impl CoreSchemaCodec {
    pub fn new(settings: &ParserSettings) -> Self {
        Self {
            namespace: settings.core_namespace.clone(),
            strict_attributes: settings.strict_attributes,
        }
    }

    /// Namespace of the core schema
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_core(&self, element: &XmlElement) -> bool {
        element.namespace() == Some(self.namespace.as_str())
    }

    /// Decode a core element into its value object
    pub fn decode(&self, element: &XmlElement) -> XmlResult<CoreResource> {
        if !self.is_core(element) {
            return Err(XmlConfigurationError::unmarshal(
                element.to_string(),
                format!("element is not in the core namespace {}", self.namespace),
            ));
        }

        let resource = match element.name() {
            schema::HEAP => {
                self.check_attributes(element, &[schema::UNIT_ATTRIBUTE])?;
                CoreResource::Heap(HeapResource {
                    value: decode_size(element)?,
                    unit: decode_unit(element, schema::DEFAULT_HEAP_UNIT),
                })
            }
            schema::OFFHEAP => {
                self.check_attributes(element, &[schema::UNIT_ATTRIBUTE])?;
                CoreResource::Offheap(MemoryResource {
                    value: decode_size(element)?,
                    unit: decode_unit(element, schema::DEFAULT_MEMORY_UNIT),
                })
            }
            schema::DISK => {
                self.check_attributes(element, &[schema::UNIT_ATTRIBUTE, schema::PERSISTENT_ATTRIBUTE])?;
                CoreResource::Disk(DiskResource {
                    value: decode_size(element)?,
                    unit: decode_unit(element, schema::DEFAULT_MEMORY_UNIT),
                    persistent: decode_persistent(element)?,
                })
            }
            other => {
                return Err(XmlConfigurationError::unmarshal(
                    element.to_string(),
                    format!("'{}' is not a resource element", other),
                ))
            }
        };

        trace!(element = %element, "decoded core resource");
        Ok(resource)
    }

    /// Decode a heap element; any other core resource is an error
    pub fn decode_heap(&self, element: &XmlElement) -> XmlResult<HeapResource> {
        match self.decode(element)? {
            CoreResource::Heap(heap) => Ok(heap),
            other => Err(XmlConfigurationError::unmarshal(
                element.to_string(),
                format!("expected a heap element, found '{}'", other.element_name()),
            )),
        }
    }

    /// Encode a value object into a standalone core element
    pub fn encode(&self, resource: &CoreResource) -> XmlResult<XmlElement> {
        let (value, unit, allowed, persistent) = match resource {
            CoreResource::Heap(heap) => (&heap.value, &heap.unit, &schema::RESOURCE_UNITS[..], None),
            CoreResource::Offheap(offheap) => (&offheap.value, &offheap.unit, &schema::MEMORY_UNITS[..], None),
            CoreResource::Disk(disk) => (&disk.value, &disk.unit, &schema::MEMORY_UNITS[..], Some(disk.persistent)),
        };

        if !allowed.contains(&unit.as_str()) {
            return Err(XmlConfigurationError::marshal(
                resource.element_name(),
                format!("unit '{}' is not one of {}", unit, allowed.join(", ")),
            ));
        }

        let mut element = XmlElement::namespaced(self.namespace.as_str(), resource.element_name())
            .with_attribute(schema::UNIT_ATTRIBUTE, unit.as_str());
        if let Some(persistent) = persistent {
            element.set_attribute(schema::PERSISTENT_ATTRIBUTE, persistent.to_string());
        }
        Ok(element.with_text(value.to_string()))
    }

    fn check_attributes(&self, element: &XmlElement, declared: &[&str]) -> XmlResult<()> {
        if !self.strict_attributes {
            return Ok(());
        }
        // Namespaced attributes (xsi:…) belong to other vocabularies
        let unexpected = element
            .attributes()
            .iter()
            .find(|attr| attr.namespace.is_none() && !declared.contains(&attr.name.as_str()));
        match unexpected {
            Some(attr) => Err(XmlConfigurationError::unmarshal(
                element.to_string(),
                format!("unexpected attribute '{}'", attr.name),
            )),
            None => Ok(()),
        }
    }
}

/// Non-negative integer body of a leaf element
pub(crate) fn decode_size(element: &XmlElement) -> XmlResult<UBig> {
    if let Some(child) = element.children().first() {
        return Err(XmlConfigurationError::unmarshal(
            element.to_string(),
            format!("unexpected child element {}", child),
        ));
    }

    let text = element.text().map(str::trim).unwrap_or("");
    let digits = text.strip_prefix('+').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(XmlConfigurationError::unmarshal(
            element.to_string(),
            format!("'{}' is not a non-negative integer", text),
        ));
    }

    UBig::from_str(digits)
        .map_err(|e| XmlConfigurationError::unmarshal(element.to_string(), e.to_string()))
}

fn decode_unit(element: &XmlElement, default: &str) -> String {
    element
        .attribute(schema::UNIT_ATTRIBUTE)
        .map(|unit| unit.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

fn decode_persistent(element: &XmlElement) -> XmlResult<bool> {
    match element.attribute(schema::PERSISTENT_ATTRIBUTE).map(str::trim) {
        None => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(XmlConfigurationError::unmarshal(
            element.to_string(),
            format!("'{}' is not a boolean", other),
        )),
    }
}
