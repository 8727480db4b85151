//! Whole configuration documents.

use tracing::{debug, info};

use cachepool_error::{XmlConfigurationError, XmlResult};
use cachepool_types::ResourcePoolsBuilder;

use crate::codec::CoreSchemaCodec;
use crate::dom::XmlElement;
use crate::parser::ResourceConfigurationParser;
use crate::schema;
use crate::template::{CacheTemplate, CacheType};

fn is_cache(element: &XmlElement, codec: &CoreSchemaCodec) -> bool {
    let ns = codec.namespace();
    element.is(ns, schema::CACHE) || element.is(ns, schema::CACHE_TEMPLATE)
}

fn check_root(root: &XmlElement, codec: &CoreSchemaCodec) -> XmlResult<()> {
    if root.is(codec.namespace(), schema::CONFIG) {
        Ok(())
    } else {
        Err(XmlConfigurationError::Document(format!(
            "expected a <{}> root in {}, found {}",
            schema::CONFIG,
            codec.namespace(),
            root
        )))
    }
}

/// Every cache and cache template of a `<config>` root, in document order
pub fn read_cache_templates(root: &XmlElement, codec: &CoreSchemaCodec) -> XmlResult<Vec<CacheTemplate>> {
    check_root(root, codec)?;
    root.children()
        .iter()
        .filter(|child| is_cache(child, codec))
        .map(|child| CacheTemplate::from_element(child, codec))
        .collect()
}

/// Rewrite the resources of every cache in canonical form.
///
/// Each cache declaring resources is parsed and written back; caches that
/// take their tiers from a template are left untouched.
pub fn normalize_resources(root: &XmlElement, parser: &ResourceConfigurationParser) -> XmlResult<XmlElement> {
    let codec = parser.codec();
    check_root(root, codec)?;

    let mut normalized = root.shallow_clone();
    for child in root.children() {
        if !is_cache(child, codec) {
            normalized.push_child(child.clone());
            continue;
        }

        let template = CacheTemplate::from_element(child, codec)?;
        if !template.declares_resources() {
            debug!(cache = %template.id(), "no resources declared, keeping element");
            normalized.push_child(child.clone());
            continue;
        }

        let pools = parser.parse_resource_configuration(
            &template,
            ResourcePoolsBuilder::new_resource_pools_builder(),
        )?;
        let cache = parser.unparse_resource_configuration(&pools, CacheType::from_element(child, codec)?)?;
        normalized.push_child(cache.to_element());
    }

    info!(caches = root.children().iter().filter(|c| is_cache(c, codec)).count(), "normalized configuration");
    Ok(normalized)
}
