//! Inventory generation orchestrator.
//!
//! This module coordinates the overall generation process: loading the
//! design document, compiling it into an inventory and writing the result.

use crate::design::Design;
use crate::design_loader::load_design;
use crate::inventory::{compile_inventory, Inventory};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs;
use std::path::Path;

/// Serialization format of the generated inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Counts reported after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySummary {
    pub groups: usize,
    pub hosts: usize,
    pub vms: usize,
}

impl From<&Inventory> for InventorySummary {
    fn from(inventory: &Inventory) -> Self {
        Self {
            groups: inventory.group_count(),
            hosts: inventory.host_count(),
            vms: inventory.vm_count(),
        }
    }
}

/// Render an inventory in the requested format
pub fn render_inventory(inventory: &Inventory, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(inventory)
            .wrap_err("Failed to serialize inventory as YAML")?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(inventory)
                .wrap_err("Failed to serialize inventory as JSON")?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}

/// Compile an already loaded design and render it
pub fn compile_and_render(
    design: &Design,
    format: OutputFormat,
) -> Result<(String, InventorySummary)> {
    let inventory = compile_inventory(design);
    let summary = InventorySummary::from(&inventory);
    Ok((render_inventory(&inventory, format)?, summary))
}

/// Load a design file, compile it and write the inventory to `output_path`.
///
/// Parent directories of the output are created as needed.
pub fn generate_inventory(
    design_path: &Path,
    output_path: &Path,
    format: OutputFormat,
) -> Result<InventorySummary> {
    let design = load_design(design_path)?;
    let (rendered, summary) = compile_and_render(&design, format)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create output directory '{}'", parent.display()))?;
    }
    fs::write(output_path, rendered)
        .wrap_err_with(|| format!("Failed to write inventory to '{}'", output_path.display()))?;

    info!("Inventory written to {:?}", output_path);
    Ok(summary)
}
