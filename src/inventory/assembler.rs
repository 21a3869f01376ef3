//! Inventory assembly.
//!
//! [`InventoryCompiler`] walks the VM launch rows and builds one VM per
//! requested slot. It owns all mutable state of a compilation (VM name
//! counters per VLAN set and the IP pool allocator), and is consumed by
//! [`InventoryCompiler::compile`], so every run starts from zero.

use super::types::{Inventory, VmRecord};
use crate::design::{Cell, CompilerSettings, Design, DesignRow, VlanRow};
use crate::ip::PoolAllocator;
use crate::network::resolve_vlan;
use crate::resource::resolve_resources;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};

/// Why a launch row produced nothing
#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error("incomplete row (BM IP: {bm_ip:?}, VLAN set: {scope:?}, count: {count})")]
    Incomplete {
        bm_ip: Option<String>,
        scope: Option<String>,
        count: u32,
    },
    #[error("No VLANs found for {0}")]
    NoVlans(String),
}

/// Why a single VM slot produced nothing
#[derive(Debug, thiserror::Error)]
enum SlotError {
    #[error("no VM type selected for slot {0}")]
    NoVmType(usize),
    #[error("No interfaces for {0}, skipping")]
    NoInterfaces(String),
}

/// Single-run compiler from a normalized design to an inventory
pub struct InventoryCompiler<'a> {
    design: &'a Design,
    /// VLAN rows grouped by VLAN set, sheet order kept within a set
    vlans_by_scope: HashMap<&'a str, Vec<&'a VlanRow>>,
    allocator: PoolAllocator,
    vm_counters: HashMap<String, u32>,
}

impl<'a> InventoryCompiler<'a> {
    pub fn new(design: &'a Design) -> Self {
        let mut vlans_by_scope: HashMap<&str, Vec<&VlanRow>> = HashMap::new();
        for vlan in &design.vlans {
            if let Some(scope) = vlan.scope.as_deref() {
                vlans_by_scope.entry(scope).or_default().push(vlan);
            }
        }

        Self {
            design,
            vlans_by_scope,
            allocator: PoolAllocator::new(),
            vm_counters: HashMap::new(),
        }
    }

    /// Build the inventory. Bad rows and slots are logged and skipped.
    pub fn compile(mut self) -> Inventory {
        info!("Building inventory data structure...");
        let design = self.design;
        let mut inventory = Inventory::new(build_global_vars(&design.globals, &design.settings));

        for (index, row) in design.launches.iter().enumerate() {
            match self.process_row(row, &mut inventory) {
                Ok(()) => {}
                Err(e @ RowError::Incomplete { .. }) => {
                    debug!("Skipping VMLaunchInput row {}: {}", index + 1, e)
                }
                Err(e) => warn!("Skipping VMLaunchInput row {}: {}", index + 1, e),
            }
        }

        info!(
            "Built inventory with {} VMs across {} groups",
            inventory.vm_count(),
            inventory.group_count()
        );
        inventory
    }

    fn process_row(&mut self, row: &DesignRow, inventory: &mut Inventory) -> Result<(), RowError> {
        let (Some(bm_ip), Some(scope), count @ 1..) =
            (row.bm_ip.as_deref(), row.scope.as_deref(), row.vm_count)
        else {
            return Err(RowError::Incomplete {
                bm_ip: row.bm_ip.clone(),
                scope: row.scope.clone(),
                count: row.vm_count,
            });
        };

        let vlans = self
            .vlans_by_scope
            .get(scope)
            .cloned()
            .ok_or_else(|| RowError::NoVlans(scope.to_string()))?;

        // Slots past the last selector column can never resolve a VM type
        let slots = (count as usize).min(row.vm_types.len());
        if slots < count as usize {
            warn!(
                "VM Count {} for {} exceeds its {} VM type columns, skipping {} slots",
                count,
                scope,
                row.vm_types.len(),
                count as usize - slots
            );
        }

        for slot in 1..=slots {
            let vm_type = row.vm_types.get(slot - 1).cloned().flatten();
            let built = vm_type
                .ok_or(SlotError::NoVmType(slot))
                .and_then(|vm_type| self.build_vm(scope, &vlans, &vm_type));

            match built {
                Ok(vm) => {
                    let name = vm.name.clone();
                    if let Some(host_ip) = inventory.insert_vm(scope, bm_ip, vm) {
                        info!("Added {} on {} ({})", name, bm_ip, host_ip);
                    }
                }
                Err(e) => warn!("Error creating VM {} for {}: {}", slot, scope, e),
            }
        }

        Ok(())
    }

    /// Build one VM. The VLAN set's name counter only advances on success.
    fn build_vm(
        &mut self,
        scope: &str,
        vlans: &[&VlanRow],
        vm_type: &str,
    ) -> Result<VmRecord, SlotError> {
        let counter = self.vm_counters.entry(scope.to_string()).or_insert(0);
        *counter += 1;
        let name = format!("{}_vm{}", scope, counter);

        let mut interfaces = Vec::new();
        let mut routes = Vec::new();
        for vlan in vlans {
            match resolve_vlan(scope, vlan, &mut self.allocator, &self.design.settings) {
                Ok(Some(resolved)) => {
                    interfaces.push(resolved.interface);
                    routes.extend(resolved.route);
                }
                Ok(None) => {}
                Err(e) => warn!("Error processing VLAN for {}: {}", name, e),
            }
        }

        if interfaces.is_empty() {
            self.rollback_vm_counter(scope);
            return Err(SlotError::NoInterfaces(name));
        }

        let resources = resolve_resources(vm_type, &self.design.resources);
        info!("Created VM config for {} ({})", name, vm_type);

        Ok(VmRecord {
            name,
            network_interface: interfaces,
            route: (!routes.is_empty()).then_some(routes),
            vm_partition: resources.partition,
            vm_resource: resources.resource,
            vm_type: vm_type.to_string(),
        })
    }

    fn rollback_vm_counter(&mut self, scope: &str) {
        if let Some(counter) = self.vm_counters.get_mut(scope) {
            *counter = counter.saturating_sub(1);
        }
    }
}

/// Compile a design with a fresh compiler
pub fn compile_inventory(design: &Design) -> Inventory {
    InventoryCompiler::new(design).compile()
}

/// Image and domain variables the playbooks always reference
pub const REQUIRED_GLOBAL_KEYS: [&str; 5] = [
    "VM_LAUNCH_QCOW2",
    "VM_UPGRADE_QCOW2",
    "RHELIDM_VM_LAUNCH_QCOW2",
    "F5_VM_LAUNCH_QCOW2",
    "INTERNAL_HOST_DOMAIN",
];

/// Build `all.vars` from the Global sheet.
///
/// Every key passes through with its value as read (blank values as empty
/// strings), and [`REQUIRED_GLOBAL_KEYS`] default to empty strings. `setup`
/// is derived from `SETUP_TYPE`. `thinpool_BM` and `vg_name` always come from
/// the compiler settings, overriding the sheet.
pub fn build_global_vars(
    globals: &[(String, Cell)],
    settings: &CompilerSettings,
) -> BTreeMap<String, Cell> {
    let mut vars = BTreeMap::new();

    for (key, cell) in globals {
        let value = if cell.is_blank() {
            Cell::Text(String::new())
        } else {
            cell.clone()
        };
        vars.insert(key.clone(), value);
    }

    for key in REQUIRED_GLOBAL_KEYS {
        vars.entry(key.to_string())
            .or_insert_with(|| Cell::Text(String::new()));
    }

    let setup = match globals.iter().find(|(key, _)| key == "SETUP_TYPE") {
        Some((_, cell)) if !cell.is_blank() => match cell.as_f64() {
            Some(value) => value.trunc() as i64,
            None => {
                warn!("Could not convert SETUP_TYPE '{}' to int, using default 0", cell);
                0
            }
        },
        _ => 0,
    };
    vars.insert("setup".to_string(), Cell::Int(setup));
    vars.insert("thinpool_BM".to_string(), Cell::Int(settings.thinpool_bm));
    vars.insert("vg_name".to_string(), Cell::Text(settings.vg_name.clone()));

    vars
}
