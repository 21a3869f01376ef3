//! # VMLaunch Inventory - design sheet to Ansible inventory compiler
//!
//! This library turns a VM launch design (baremetal hosts, VLAN groups and VM
//! resource templates exported from the design workbook) into an Ansible
//! inventory: one group per VLAN set, hosts keyed by VM address, and fully
//! resolved VMs with interfaces, routes and resource allocations.
//!
//! ## Overview
//!
//! Compilation is deterministic. IP addresses are handed out round-robin per
//! VLAN set and bridge, VM names are numbered per VLAN set, and all of that
//! state lives in one [`inventory::InventoryCompiler`] per run, so compiling
//! the same design twice gives byte-identical output.
//!
//! ## Architecture
//!
//! - `design`: design document types (sheets, cells, typed rows)
//! - `design_loader`: document loading and column normalization
//! - `ip`: IP range expansion and round-robin pool allocation
//! - `network`: interface and static route derivation per VLAN membership
//! - `resource`: VM type templates and best-effort value coercion
//! - `inventory`: inventory document and the assembler that builds it
//! - `orchestrator`: load, compile and write in one call
//! - `utils`: IP helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vmlaunch_inventory::orchestrator::{generate_inventory, OutputFormat};
//!
//! let summary = generate_inventory(
//!     Path::new("design.yaml"),
//!     Path::new("inventory.yml"),
//!     OutputFormat::Yaml,
//! )?;
//! println!("{} VMs across {} groups", summary.vms, summary.groups);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Design Format
//!
//! Each workbook sheet is exported as a header row plus data rows:
//!
//! ```yaml
//! Global:
//!   columns: [Key, Value]
//!   rows:
//!     - [SETUP_TYPE, 1]
//! VMLaunchInput:
//!   columns: ["BM IP", "Vlan set ID", "VM Count", "VMConfig1", "VMConfig2"]
//!   rows:
//!     - ["10.10.0.5", SITE_A, 2, small, small]
//! VLANGroup:
//!   columns: ["Vlan set", VlanID, "VM startips", "VMLaunch GW", "Other VLANs GW", "VLAN Subnet"]
//!   rows:
//!     - [SITE_A, 12, "10.0.12.10-11", 10.0.12.1, 10.0.12.1, 10.0.12.0/24]
//!     - [null, 13, "10.0.13.10", null, 10.0.13.254, 10.0.13.0/24]
//! ResourceCfg:
//!   columns: [VMType, VCPU, RAM, DataDiskSize]
//!   rows:
//!     - [small, "4", "8192", "100"]
//! ```
//!
//! ## Error Handling
//!
//! Problems with a single row, VM slot or VLAN are logged and skipped. Only a
//! missing sheet or an unreadable document fails the run; those surface as
//! `color_eyre::eyre::Error` with context.

pub mod design;
pub mod design_loader;
pub mod inventory;
pub mod ip;
pub mod network;
pub mod orchestrator;
pub mod resource;
pub mod utils;
