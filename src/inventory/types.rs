//! Inventory document types.
//!
//! The layout follows an Ansible YAML inventory: one group per VLAN set under
//! `all.children`, hosts keyed by the primary address of their VMs, and the
//! global variables under `all.vars`. Maps are ordered so the rendered
//! document is stable from run to run.

use crate::design::Cell;
use crate::network::NetworkInterface;
use crate::resource::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inventory root
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub all: InventoryRoot,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryRoot {
    #[serde(default)]
    pub children: BTreeMap<String, InventoryGroup>,
    #[serde(default)]
    pub vars: BTreeMap<String, Cell>,
}

/// Hosts of one VLAN set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryGroup {
    #[serde(default)]
    pub hosts: BTreeMap<String, HostRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Management address of the baremetal host running the VMs
    pub ansible_host: String,
    pub vms: Vec<VmRecord>,
}

/// A fully resolved VM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmRecord {
    pub name: String,
    #[serde(rename = "networkInterface")]
    pub network_interface: Vec<NetworkInterface>,
    /// `None` (rendered as null) when the VM has no static routes
    pub route: Option<Vec<String>>,
    pub vm_partition: BTreeMap<String, FieldValue>,
    pub vm_resource: BTreeMap<String, FieldValue>,
    pub vm_type: String,
}

impl VmRecord {
    /// Address of the first interface, which keys the VM's host entry
    pub fn primary_address(&self) -> Option<&str> {
        self.network_interface.first().map(NetworkInterface::address)
    }
}

impl Inventory {
    pub fn new(vars: BTreeMap<String, Cell>) -> Self {
        Self {
            all: InventoryRoot {
                children: BTreeMap::new(),
                vars,
            },
        }
    }

    /// File a VM under `children[scope].hosts[primary address]`, creating the
    /// group and host entry on first use. Returns the host key.
    pub fn insert_vm(&mut self, scope: &str, bm_ip: &str, vm: VmRecord) -> Option<String> {
        let host_ip = vm.primary_address()?.to_string();

        let group = self.all.children.entry(scope.to_string()).or_default();
        group
            .hosts
            .entry(host_ip.clone())
            .or_insert_with(|| HostRecord {
                ansible_host: bm_ip.to_string(),
                vms: Vec::new(),
            })
            .vms
            .push(vm);

        Some(host_ip)
    }

    pub fn group(&self, scope: &str) -> Option<&InventoryGroup> {
        self.all.children.get(scope)
    }

    pub fn group_count(&self) -> usize {
        self.all.children.len()
    }

    pub fn host_count(&self) -> usize {
        self.all.children.values().map(|g| g.hosts.len()).sum()
    }

    pub fn vm_count(&self) -> usize {
        self.vms().count()
    }

    /// All VMs, group by group and host by host
    pub fn vms(&self) -> impl Iterator<Item = &VmRecord> {
        self.all
            .children
            .values()
            .flat_map(|g| g.hosts.values())
            .flat_map(|h| h.vms.iter())
    }
}
