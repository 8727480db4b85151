//! Normalize command: rewrite cache resources in canonical form

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use cachepool_xml::{normalize_resources, ResourceConfigurationParser, XmlElement};

/// Parse a document, rewrite every cache's resources and serialize it again
pub fn normalize_document(xml: &str, parser: &ResourceConfigurationParser) -> Result<String> {
    let root = XmlElement::parse_str(xml)?;
    let normalized = normalize_resources(&root, parser)?;
    Ok(normalized.to_xml_string(&parser.writer_settings())?)
}

#[derive(Debug, Clone)]
pub struct NormalizeCommand {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
}

impl NormalizeCommand {
    pub fn execute(&self, parser: &ResourceConfigurationParser) -> Result<()> {
        let xml = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        let normalized = normalize_document(&xml, parser)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &normalized)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(input = %self.file.display(), output = %path.display(), "wrote normalized configuration");
                eprintln!("{} {}", "Wrote".green().bold(), path.display());
            }
            None => println!("{}", normalized),
        }
        Ok(())
    }
}
