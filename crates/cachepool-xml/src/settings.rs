//! Parser and writer settings.
//!
//! Settings can be built in code or loaded from a TOML file:
//!
//! ```toml
//! core_namespace = "http://www.ehcache.org/v3"
//! strict_attributes = true
//!
//! [writer]
//! indent = 2
//! write_declaration = true
//!
//! [writer.prefixes]
//! "http://www.ehcache.org/v3" = "ehcache"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use cachepool_error::{XmlConfigurationError, XmlResult};

use crate::schema;

/// Settings of the resource configuration parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Namespace of the core schema elements
    pub core_namespace: String,

    /// Reject undeclared attributes on core resource elements
    pub strict_attributes: bool,

    /// How elements are written out
    pub writer: WriterSettings,
}

/// Settings of the XML writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterSettings {
    /// Spaces per nesting level; 0 writes everything on one line
    pub indent: usize,

    /// Emit an `<?xml …?>` declaration
    pub write_declaration: bool,

    /// Preferred prefix per namespace URI
    pub prefixes: BTreeMap<String, String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            core_namespace: schema::CORE_SCHEMA_NAMESPACE.to_string(),
            strict_attributes: true,
            writer: WriterSettings::default(),
        }
    }
}

impl Default for WriterSettings {
    fn default() -> Self {
        let mut prefixes = BTreeMap::new();
        prefixes.insert(
            schema::CORE_SCHEMA_NAMESPACE.to_string(),
            schema::CORE_SCHEMA_PREFIX.to_string(),
        );
        Self {
            indent: 2,
            write_declaration: true,
            prefixes,
        }
    }
}

impl ParserSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different namespace for the core elements
    pub fn with_core_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.core_namespace = namespace.into();
        self
    }

    pub fn with_strict_attributes(mut self, strict: bool) -> Self {
        self.strict_attributes = strict;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.writer.indent = indent;
        self
    }

    pub fn with_declaration(mut self, write_declaration: bool) -> Self {
        self.writer.write_declaration = write_declaration;
        self
    }

    /// Prefer `prefix` when writing elements of `namespace`
    pub fn with_prefix(mut self, namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.writer.prefixes.insert(namespace.into(), prefix.into());
        self
    }

    pub fn from_toml_str(content: &str) -> XmlResult<Self> {
        toml::from_str(content).map_err(|e| XmlConfigurationError::Settings(e.to_string()))
    }

    pub fn to_toml_string(&self) -> XmlResult<String> {
        toml::to_string_pretty(self).map_err(|e| XmlConfigurationError::Settings(e.to_string()))
    }

    /// Load settings from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> XmlResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save settings to a TOML file
    pub fn to_toml_file(&self, path: impl AsRef<Path>) -> XmlResult<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
