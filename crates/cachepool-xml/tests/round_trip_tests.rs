//! Round trips between cache elements and resource pools

use std::sync::Arc;

use cachepool_types::{MemoryUnit, ResourcePoolsBuilder, ResourceType, ResourceUnit, UBig};
use cachepool_xml::schema::CORE_SCHEMA_NAMESPACE as CORE;
use cachepool_xml::{
    CacheTemplate, CacheType, ClusteredResourceConfigurationParser, ExtensionParserRegistry,
    ParserSettings, ResourceConfigurationParser, WriterSettings, XmlElement,
};

fn clustered_parser() -> ResourceConfigurationParser {
    let registry = ExtensionParserRegistry::builder()
        .register(ClusteredResourceConfigurationParser::new())
        .build()
        .unwrap();
    ResourceConfigurationParser::new(&ParserSettings::default(), Arc::new(registry))
}

fn cache(resources: &str) -> XmlElement {
    let xml = format!(
        r#"<cache xmlns="http://www.ehcache.org/v3"
                  xmlns:tc="http://www.ehcache.org/v3/clustered"
                  alias="foo"><resources>{}</resources></cache>"#,
        resources
    );
    XmlElement::parse_str(&xml).unwrap()
}

/// Parse the resources of `element`, write them back, return the new resources
fn round_trip(parser: &ResourceConfigurationParser, element: &XmlElement) -> Vec<XmlElement> {
    let template = CacheTemplate::from_element(element, parser.codec()).unwrap();
    let pools = parser
        .parse_resource_configuration(&template, ResourcePoolsBuilder::new_resource_pools_builder())
        .unwrap();
    let cache = CacheType::from_element(element, parser.codec()).unwrap();
    parser
        .unparse_resource_configuration(&pools, cache)
        .unwrap()
        .resources()
        .to_vec()
}

#[test]
fn test_each_core_tier_round_trips() {
    let parser = ResourceConfigurationParser::with_defaults();
    let cases = [
        r#"<heap unit="entries">2000</heap>"#,
        r#"<heap unit="MB">10</heap>"#,
        r#"<offheap unit="GB">1</offheap>"#,
        r#"<offheap unit="kB">512</offheap>"#,
        r#"<disk unit="TB" persistent="true">3</disk>"#,
        r#"<disk unit="B" persistent="false">0</disk>"#,
    ];

    for case in cases {
        let element = cache(case);
        let written = round_trip(&parser, &element);
        assert_eq!(written.as_slice(), element.child(CORE, "resources").unwrap().children(), "{}", case);
    }
}

#[test]
fn test_all_core_tiers_together_keep_tier_order() {
    let parser = ResourceConfigurationParser::with_defaults();
    let element = cache(
        r#"<disk unit="GB" persistent="true">100</disk>
           <heap unit="entries">10</heap>
           <offheap unit="MB">50</offheap>"#,
    );

    let names: Vec<_> = round_trip(&parser, &element)
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["heap", "offheap", "disk"]);
}

#[test]
fn test_disk_persistence_defaults_to_false() {
    let parser = ResourceConfigurationParser::with_defaults();
    let written = round_trip(&parser, &cache(r#"<disk unit="GB">1</disk>"#));
    assert_eq!(written[0].attribute("persistent"), Some("false"));

    let written = round_trip(&parser, &cache(r#"<disk unit="GB" persistent="true">1</disk>"#));
    assert_eq!(written[0].attribute("persistent"), Some("true"));
}

#[test]
fn test_sizes_never_lose_precision() {
    let parser = ResourceConfigurationParser::with_defaults();
    let huge = "340282366920938463463374607431768211457";
    let element = cache(&format!(r#"<disk unit="B" persistent="false">{}</disk><heap unit="entries">18446744073709551616</heap>"#, huge));

    let template = CacheTemplate::from_element(&element, parser.codec()).unwrap();
    let pools = parser
        .parse_resource_configuration(&template, ResourcePoolsBuilder::new_resource_pools_builder())
        .unwrap();

    let disk = pools.sized_pool_for_resource(&ResourceType::DISK).unwrap();
    assert_eq!(disk.size(), &huge.parse::<UBig>().unwrap());
    assert_eq!(disk.size_u64(), None);

    let written = round_trip(&parser, &element);
    assert_eq!(written[0].text(), Some("18446744073709551616"));
    assert_eq!(written[1].text(), Some(huge));
}

#[test]
fn test_heap_shorthand_takes_precedence() {
    let parser = ResourceConfigurationParser::with_defaults();
    let element = XmlElement::parse_str(
        r#"<cache xmlns="http://www.ehcache.org/v3" alias="foo">
             <heap unit="entries">200</heap>
             <resources><offheap unit="MB">10</offheap><disk unit="GB">1</disk></resources>
           </cache>"#,
    )
    .unwrap();

    let template = CacheTemplate::from_element(&element, parser.codec()).unwrap();
    let pools = parser
        .parse_resource_configuration(&template, ResourcePoolsBuilder::new_resource_pools_builder())
        .unwrap();

    assert_eq!(pools.len(), 1);
    let heap = pools.sized_pool_for_resource(&ResourceType::HEAP).unwrap();
    assert_eq!(heap.size_u64(), Some(200));
    assert_eq!(heap.unit(), ResourceUnit::Entries);
}

#[test]
fn test_unit_names_are_written_canonically() {
    let parser = ResourceConfigurationParser::with_defaults();
    let written = round_trip(
        &parser,
        &cache(r#"<heap unit="ENTRIES">1</heap><offheap unit="kb">2</offheap><disk unit="gb">3</disk>"#),
    );

    let units: Vec<_> = written.iter().map(|e| e.attribute("unit").unwrap().to_string()).collect();
    assert_eq!(units, vec!["entries", "kB", "GB"]);
}

#[test]
fn test_clustered_tiers_round_trip_next_to_core_tiers() {
    let parser = clustered_parser();
    let element = cache(
        r#"<heap unit="entries">10</heap>
           <tc:clustered-dedicated from="primary" unit="MB">16</tc:clustered-dedicated>"#,
    );

    let written = round_trip(&parser, &element);
    assert_eq!(written.as_slice(), element.child(CORE, "resources").unwrap().children());

    let shared = cache(r#"<offheap unit="MB">1</offheap><tc:clustered-shared sharing="pool-a"/>"#);
    let written = round_trip(&parser, &shared);
    assert_eq!(written.as_slice(), shared.child(CORE, "resources").unwrap().children());
}

#[test]
fn test_pools_built_in_code_unparse_into_a_new_cache() {
    let parser = ResourceConfigurationParser::with_defaults();
    let pools = ResourcePoolsBuilder::new_resource_pools_builder()
        .heap(1000u32, ResourceUnit::Entries)
        .unwrap()
        .offheap(64u32, MemoryUnit::MB)
        .unwrap()
        .disk(2u32, MemoryUnit::GB, true)
        .unwrap()
        .build();

    let element = parser
        .unparse_resource_configuration(&pools, CacheType::new(CORE, "bar"))
        .unwrap()
        .to_element();

    let reparsed = CacheTemplate::from_element(&element, parser.codec()).unwrap();
    let again = parser
        .parse_resource_configuration(&reparsed, ResourcePoolsBuilder::new_resource_pools_builder())
        .unwrap();

    for resource_type in [ResourceType::HEAP, ResourceType::OFFHEAP, ResourceType::DISK] {
        assert_eq!(
            again.sized_pool_for_resource(&resource_type),
            pools.sized_pool_for_resource(&resource_type)
        );
    }
}

#[test]
fn test_written_document_reads_back_equal() {
    let parser = clustered_parser();
    let element = cache(
        r#"<heap unit="entries">10</heap>
           <tc:clustered-dedicated unit="GB">1</tc:clustered-dedicated>"#,
    );

    let written = CacheType::from_element(&element, parser.codec())
        .unwrap()
        .with_resources(round_trip(&parser, &element))
        .to_element();

    for settings in [parser.writer_settings(), WriterSettings { indent: 0, ..parser.writer_settings() }] {
        let xml = written.to_xml_string(&settings).unwrap();
        assert!(xml.contains("tc:clustered-dedicated"));
        assert_eq!(XmlElement::parse_str(&xml).unwrap(), written);
    }
}

#[test]
fn test_normalized_document_keeps_reserved_and_conventional_prefixes() {
    let xml = r#"<config xmlns="http://www.ehcache.org/v3"
                         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
                         xsi:schemaLocation="http://www.ehcache.org/v3 ehcache-core.xsd"
                         xml:lang="en">
                   <cache alias="a"><heap>1</heap></cache>
                 </config>"#;
    let parser = clustered_parser();
    let root = XmlElement::parse_str(xml).unwrap();

    let normalized = cachepool_xml::normalize_resources(&root, &parser).unwrap();
    let written = normalized.to_xml_string(&parser.writer_settings()).unwrap();
    assert!(written.contains("xml:lang=\"en\""));
    assert!(written.contains("xsi:schemaLocation="));
    assert!(!written.contains("xmlns:ns0"));

    let reread = XmlElement::parse_str(&written).unwrap();
    assert_eq!(reread, normalized);
}
