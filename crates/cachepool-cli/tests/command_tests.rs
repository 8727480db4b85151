//! Integration tests for the inspect and normalize commands

use anyhow::Result;

use cachepool_cli::commands::{
    build_parser, inspect_document, load_settings, normalize_document, NormalizeCommand,
};
use cachepool_xml::schema::CORE_SCHEMA_NAMESPACE as CORE;
use cachepool_xml::{ParserSettings, XmlConfigurationError, XmlElement};

const CONFIG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<config xmlns="http://www.ehcache.org/v3" xmlns:tc="http://www.ehcache.org/v3/clustered">
  <cache alias="users">
    <key-type>java.lang.Long</key-type>
    <heap unit="Entries">500</heap>
  </cache>
  <cache alias="sessions">
    <resources>
      <offheap unit="mb">32</offheap>
      <tc:clustered-dedicated from="main" unit="GB">2</tc:clustered-dedicated>
    </resources>
  </cache>
</config>"#;

#[test]
fn test_inspect_reports_every_cache() -> Result<()> {
    let parser = build_parser(&ParserSettings::default())?;
    let reports = inspect_document(CONFIG, &parser)?;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].id, "users");
    assert_eq!(reports[0].tiers[0].unit.as_deref(), Some("entries"));

    let sessions = &reports[1];
    assert_eq!(sessions.tiers.len(), 2);
    assert_eq!(sessions.tiers[1].resource, "clustered-dedicated");
    assert!(sessions.tiers[1].persistent);

    let json = serde_json::to_value(&reports)?;
    assert_eq!(json[1]["tiers"][0]["size"], "32");
    Ok(())
}

#[test]
fn test_normalize_writes_canonical_resources() -> Result<()> {
    let parser = build_parser(&ParserSettings::default())?;
    let normalized = normalize_document(CONFIG, &parser)?;

    assert!(normalized.starts_with("<?xml"));
    assert!(normalized.contains("xmlns:tc=\"http://www.ehcache.org/v3/clustered\""));

    let root = XmlElement::parse_str(&normalized)?;
    let users = &root.children()[0];
    assert!(users.child(CORE, "heap").is_none());
    let heap = users.child(CORE, "resources").and_then(|r| r.child(CORE, "heap")).unwrap();
    assert_eq!(heap.attribute("unit"), Some("entries"));
    assert_eq!(users.children()[0].name(), "key-type");

    // Normalizing twice changes nothing
    assert_eq!(normalize_document(&normalized, &parser)?, normalized);
    Ok(())
}

#[test]
fn test_normalize_command_writes_output_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("ehcache.xml");
    let output = dir.path().join("normalized.xml");
    std::fs::write(&input, CONFIG)?;

    let parser = build_parser(&ParserSettings::default())?;
    NormalizeCommand { file: input, output: Some(output.clone()) }.execute(&parser)?;

    let written = std::fs::read_to_string(&output)?;
    assert!(written.contains("<ehcache:offheap unit=\"MB\">32</ehcache:offheap>"));
    Ok(())
}

#[test]
fn test_settings_file_controls_the_writer() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cachepool.toml");
    std::fs::write(&path, "[writer]\nindent = 0\nwrite_declaration = false\n")?;

    let settings = load_settings(Some(&path))?;
    let parser = build_parser(&settings)?;
    let normalized = normalize_document(CONFIG, &parser)?;

    assert!(normalized.starts_with("<ehcache:config"));
    assert!(!normalized.contains('\n'));
    Ok(())
}

#[test]
fn test_errors_keep_their_configuration_type() -> Result<()> {
    let parser = build_parser(&ParserSettings::default())?;
    let xml = r#"<config xmlns="http://www.ehcache.org/v3"><cache alias="foo"><resources/></cache></config>"#;

    let err = inspect_document(xml, &parser).unwrap_err();
    assert!(err.to_string().contains("foo"));
    assert!(matches!(
        err.downcast_ref::<XmlConfigurationError>(),
        Some(XmlConfigurationError::NoResources { .. })
    ));
    Ok(())
}
