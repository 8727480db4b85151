//! Command modules for the cachepool CLI

//-----------------------------------------------------------------------------
// Command Modules
//-----------------------------------------------------------------------------

pub mod inspect;
pub mod normalize;

pub use inspect::{inspect_document, CacheReport, InspectCommand, PoolReport};
pub use normalize::{normalize_document, NormalizeCommand};

//-----------------------------------------------------------------------------
// Shared Setup
//-----------------------------------------------------------------------------

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use cachepool_xml::{
    ClusteredResourceConfigurationParser, ExtensionParserRegistry, ParserSettings,
    ResourceConfigurationParser,
};

/// Load parser settings, falling back to the defaults
pub fn load_settings(path: Option<&Path>) -> Result<ParserSettings> {
    match path {
        Some(path) => ParserSettings::from_toml_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(ParserSettings::default()),
    }
}

/// A parser knowing every extension shipped with the tools
pub fn build_parser(settings: &ParserSettings) -> Result<ResourceConfigurationParser> {
    let registry = ExtensionParserRegistry::builder()
        .register(ClusteredResourceConfigurationParser::new())
        .build()?;
    Ok(ResourceConfigurationParser::new(settings, Arc::new(registry)))
}
