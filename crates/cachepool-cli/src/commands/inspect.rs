//! Inspect command: list the tiers of every cache in a configuration file

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use cachepool_types::{ResourcePool, ResourcePoolsBuilder};
use cachepool_xml::{read_cache_templates, ResourceConfigurationParser, XmlElement};

/// One tier of a cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    pub resource: String,
    /// Decimal size; kept as a string so large values survive JSON
    pub size: Option<String>,
    pub unit: Option<String>,
    pub persistent: bool,
}

impl PoolReport {
    fn from_pool(pool: &dyn ResourcePool) -> Self {
        let sized = pool.as_sized();
        Self {
            resource: pool.resource_type().to_string(),
            size: sized.map(|s| s.size().to_string()),
            unit: sized.map(|s| s.unit().to_string()),
            persistent: pool.is_persistent(),
        }
    }
}

/// The tiers of one cache or cache template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheReport {
    pub id: String,
    /// True when the tiers come from a template
    pub inherited: bool,
    pub tiers: Vec<PoolReport>,
}

/// Parse the resources of every cache in a document
pub fn inspect_document(xml: &str, parser: &ResourceConfigurationParser) -> Result<Vec<CacheReport>> {
    let root = XmlElement::parse_str(xml)?;
    let templates = read_cache_templates(&root, parser.codec())?;

    let mut reports = Vec::with_capacity(templates.len());
    for template in templates {
        if !template.declares_resources() {
            reports.push(CacheReport {
                id: template.id().to_string(),
                inherited: true,
                tiers: Vec::new(),
            });
            continue;
        }

        let pools = parser
            .parse_resource_configuration(&template, ResourcePoolsBuilder::new_resource_pools_builder())
            .with_context(|| format!("invalid resources for cache '{}'", template.id()))?;
        debug!(cache = %template.id(), tiers = pools.len(), "inspected cache");

        reports.push(CacheReport {
            id: template.id().to_string(),
            inherited: false,
            tiers: pools.iter().map(|(_, pool)| PoolReport::from_pool(pool.as_ref())).collect(),
        });
    }
    Ok(reports)
}

#[derive(Debug, Clone)]
pub struct InspectCommand {
    pub file: PathBuf,
    pub json: bool,
}

impl InspectCommand {
    pub fn execute(&self, parser: &ResourceConfigurationParser) -> Result<()> {
        let xml = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        let reports = inspect_document(&xml, parser)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
            return Ok(());
        }

        for report in &reports {
            println!("{}", report.id.cyan().bold());
            if report.inherited {
                println!("  {}", "resources inherited from template".dimmed());
                continue;
            }
            for tier in &report.tiers {
                let size = match (&tier.size, &tier.unit) {
                    (Some(size), Some(unit)) => format!("{} {}", size, unit),
                    _ => "-".to_string(),
                };
                let persistent = if tier.persistent { " (persistent)".yellow().to_string() } else { String::new() };
                println!("  {:<20} {}{}", tier.resource.green(), size, persistent);
            }
        }
        Ok(())
    }
}
