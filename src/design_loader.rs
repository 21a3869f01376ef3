use crate::design::{
    Cell, Design, DesignDocument, DesignError, DesignRow, Table, VlanRow, GLOBAL_SHEET,
    RESOURCE_SHEET, VLAN_GROUP_SHEET, VM_LAUNCH_SHEET,
};
use crate::resource::{ResourceCatalog, ResourceTemplate};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info, warn};
use std::fs::File;
use std::path::Path;

/// VLAN set column of VLANGroup, filled forward over blank cells
pub const VLAN_SET_COLUMN: &str = "Vlan set";

/// Header renames applied to VLANGroup before lookup
const VLAN_COLUMN_RENAMES: [(&str, &str); 2] = [
    ("SITE Name", VLAN_SET_COLUMN),
    ("VLANs GW", "Other VLANs GW"),
];

/// Load, validate and normalize a design document from a YAML file
pub fn load_design(design_path: &Path) -> Result<Design> {
    info!("Loading design from: {:?}", design_path);

    let file = File::open(design_path)
        .wrap_err_with(|| format!("Failed to open design file '{}'", design_path.display()))?;
    let document: DesignDocument = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse design file '{}'", design_path.display()))?;

    let design = normalize_design(document)?;
    info!("Successfully loaded {} VM launch entries", design.launches.len());
    Ok(design)
}

/// Parse and normalize a design document held in memory
pub fn parse_design(yaml: &str) -> Result<Design> {
    let document: DesignDocument =
        serde_yaml::from_str(yaml).wrap_err("Failed to parse design document")?;
    Ok(normalize_design(document)?)
}

/// Turn the raw sheets into typed rows.
///
/// Fails only when a sheet is missing or structurally unusable; anything
/// row-level is left for the compiler to skip.
pub fn normalize_design(document: DesignDocument) -> Result<Design, DesignError> {
    document.validate()?;

    let mut global = require(document.global, GLOBAL_SHEET)?;
    let mut vm_launch = require(document.vm_launch, VM_LAUNCH_SHEET)?;
    let mut vlan_group = require(document.vlan_group, VLAN_GROUP_SHEET)?;
    let mut resource_cfg = require(document.resource_cfg, RESOURCE_SHEET)?;

    for table in [&mut global, &mut vm_launch, &mut vlan_group, &mut resource_cfg] {
        normalize_headers(table);
    }

    let globals = read_globals(&global)?;
    debug!("Loaded Global variables: {:?}", globals);

    Ok(Design {
        globals,
        launches: read_launches(&vm_launch),
        vlans: read_vlans(&mut vlan_group)?,
        resources: read_resources(&resource_cfg),
        settings: document.settings,
    })
}

fn require(table: Option<Table>, name: &str) -> Result<Table, DesignError> {
    table.ok_or_else(|| DesignError::MissingTables(vec![name.to_string()]))
}

/// Trim whitespace around every header name
pub fn normalize_headers(table: &mut Table) {
    for column in &mut table.columns {
        *column = column.trim().to_string();
    }
}

/// Fill blank VLAN sets from the nearest preceding row that has one.
///
/// Leading rows with no earlier value stay blank and can never be joined
/// to a launch row.
pub fn forward_fill(rows: &mut [VlanRow]) {
    let mut last: Option<String> = None;
    for (index, row) in rows.iter_mut().enumerate() {
        if let Some(scope) = &row.scope {
            last = Some(scope.clone());
        } else if let Some(scope) = &last {
            row.scope = Some(scope.clone());
        } else {
            warn!(
                "VLANGroup row {} has no VLAN set and nothing to inherit, ignoring it",
                index + 1
            );
        }
    }
}

/// Global sheet: first column is the key, second the value (or `Key`/`Value`
/// when those headers exist).
fn read_globals(table: &Table) -> Result<Vec<(String, Cell)>, DesignError> {
    let (key_col, value_col) = match (table.column("Key"), table.column("Value")) {
        (Some(key), Some(value)) => (key, value),
        _ if table.columns.len() >= 2 => (0, 1),
        _ => {
            return Err(DesignError::MalformedTable {
                table: GLOBAL_SHEET.to_string(),
                reason: "expected a key column and a value column".to_string(),
            })
        }
    };

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            let key = table.cell(row, Some(key_col)).as_text()?;
            Some((key, table.cell(row, Some(value_col)).clone()))
        })
        .collect())
}

fn read_launches(table: &Table) -> Vec<DesignRow> {
    let bm_ip_col = table.column("BM IP");
    let scope_col = table.column("Vlan set ID");
    let count_col = table.column("VM Count");
    for (name, col) in [("BM IP", bm_ip_col), ("Vlan set ID", scope_col), ("VM Count", count_col)] {
        if col.is_none() {
            warn!("{} has no '{}' column, its rows will be skipped", VM_LAUNCH_SHEET, name);
        }
    }

    // Slot order is header order
    let config_cols: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| name.contains("Config"))
        .map(|(idx, _)| idx)
        .collect();

    table
        .rows
        .iter()
        .map(|row| DesignRow {
            bm_ip: table.cell(row, bm_ip_col).as_text(),
            scope: table.cell(row, scope_col).as_text(),
            vm_count: read_count(table.cell(row, count_col)),
            vm_types: config_cols
                .iter()
                .map(|&idx| table.cell(row, Some(idx)).as_text())
                .collect(),
        })
        .collect()
}

fn read_count(cell: &Cell) -> u32 {
    match cell.as_f64() {
        Some(count) if count >= 1.0 => count.trunc() as u32,
        Some(_) => 0,
        None => {
            if !cell.is_blank() {
                warn!("Invalid VM Count '{}', treating as 0", cell);
            }
            0
        }
    }
}

fn read_vlans(table: &mut Table) -> Result<Vec<VlanRow>, DesignError> {
    for column in &mut table.columns {
        let renamed = VLAN_COLUMN_RENAMES
            .iter()
            .find(|(from, _)| column.as_str() == *from);
        if let Some((_, to)) = renamed {
            *column = to.to_string();
        }
    }

    let scope_col = table.column(VLAN_SET_COLUMN).ok_or_else(|| DesignError::MissingColumn {
        table: VLAN_GROUP_SHEET.to_string(),
        column: VLAN_SET_COLUMN.to_string(),
    })?;
    let id_col = table.column_any(&["VlanID", "Vlan ID", "Vlan"]);
    let vm_ips_col = table.column_any(&["VM startips"]);
    let container_ips_col = table.column_any(&["Container startip"]);
    let launch_gw_col = table.column_any(&["VMLaunch GW", "Management GW"]);
    let other_gw_col = table.column_any(&["Other VLANs GW"]);
    let subnet_col = table.column_any(&["VLAN Subnet"]);

    let mut rows: Vec<VlanRow> = table
        .rows
        .iter()
        .map(|row| VlanRow {
            scope: table.cell(row, Some(scope_col)).as_text(),
            vlan_id: table.cell(row, id_col).clone(),
            vm_start_ips: table.cell(row, vm_ips_col).as_text(),
            container_start_ips: table.cell(row, container_ips_col).as_text(),
            launch_gw: table.cell(row, launch_gw_col).as_text(),
            other_vlans_gw: table.cell(row, other_gw_col).as_text(),
            subnet: table.cell(row, subnet_col).as_text(),
        })
        .collect();

    forward_fill(&mut rows);
    Ok(rows)
}

fn read_resources(table: &Table) -> ResourceCatalog {
    let mut catalog = ResourceCatalog::new();
    let Some(type_col) = table.column("VMType") else {
        warn!("{} has no 'VMType' column, all VM types resolve to empty templates", RESOURCE_SHEET);
        return catalog;
    };

    for row in &table.rows {
        let Some(vm_type) = table.cell(row, Some(type_col)).as_text() else {
            continue;
        };

        let fields = table
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != type_col)
            .map(|(idx, name)| (name.clone(), table.cell(row, Some(idx)).clone()))
            .collect();

        if !catalog.insert(&vm_type, ResourceTemplate { fields }) {
            debug!("Duplicate definition of VM type '{}' ignored", vm_type);
        }
    }

    catalog
}
