#[cfg(test)]
mod inventory_tests {
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use vmlaunch_inventory::design::Cell;
    use vmlaunch_inventory::design_loader::{load_design, parse_design};
    use vmlaunch_inventory::inventory::{compile_inventory, Inventory};
    use vmlaunch_inventory::orchestrator::{generate_inventory, render_inventory, OutputFormat};
    use vmlaunch_inventory::resource::FieldValue;

    const SITE_DESIGN: &str = r#"
Global:
  columns: [Key, Value]
  rows:
    - [SETUP_TYPE, 1]
    - [VM_LAUNCH_QCOW2, rhel8.qcow2]
    - [RHEL_RELEASE, "8.10"]
    - [THRESHOLD, 0.75]
    - [thinpool_BM, 95]
VMLaunchInput:
  columns: ["BM IP", "Vlan set ID", "VM Count", "VMConfig1", "VMConfig2"]
  rows:
    - ["10.10.0.5", SITE_A, 2, small, small]
VLANGroup:
  columns: ["Vlan set", VlanID, "VM startips", "VMLaunch GW", "Other VLANs GW", "VLAN Subnet"]
  rows:
    - [SITE_A, 12, "10.0.12.10-11", 10.0.12.1, 10.0.12.1, 10.0.12.0/24]
    - [null, 13, "10.0.13.10", 10.0.13.1, 10.0.13.254, 10.0.13.0/24]
ResourceCfg:
  columns: [VMType, VCPU, RAM, DataDiskSize, ExtraFlag]
  rows:
    - [small, "4", "8192", "", "yes"]
"#;

    #[test]
    fn test_end_to_end_two_vms() {
        let design = parse_design(SITE_DESIGN).unwrap();
        let inventory = compile_inventory(&design);

        assert_eq!(inventory.vm_count(), 2);
        let group = inventory.group("SITE_A").expect("SITE_A group");
        assert_eq!(group.hosts.len(), 2);

        for vm in inventory.vms() {
            assert_eq!(vm.network_interface.len(), 2);
            assert_eq!(vm.vm_type, "small");
            assert_eq!(vm.vm_resource.len(), 2);
            assert_eq!(vm.vm_resource["VCPU"], FieldValue::Integer(4));
            assert_eq!(vm.vm_resource["RAM"], FieldValue::Integer(8192));
            assert_eq!(vm.vm_partition.len(), 1);
            assert_eq!(vm.vm_partition["ExtraFlag"], FieldValue::from("yes"));
            // Only the carry-forward VLAN has a distinct other-VLANs gateway
            assert_eq!(
                vm.route,
                Some(vec!["10.0.13.0/24 via 10.0.13.254 dev dpbr_13".to_string()])
            );
        }

        let vm1 = &group.hosts["10.0.12.10"].vms[0];
        assert_eq!(vm1.name, "SITE_A_vm1");
        assert_eq!(vm1.network_interface[0].gw.as_deref(), Some("10.0.12.1"));
        let vm2 = &group.hosts["10.0.12.11"].vms[0];
        assert_eq!(vm2.name, "SITE_A_vm2");
        assert_eq!(vm2.network_interface[1].ipaddress, "10.0.13.10/24");
        assert_eq!(group.hosts["10.0.12.11"].ansible_host, "10.10.0.5");
    }

    #[test]
    fn test_global_vars_in_inventory() {
        let design = parse_design(SITE_DESIGN).unwrap();
        let inventory = compile_inventory(&design);
        let vars = &inventory.all.vars;

        assert_eq!(vars["setup"], Cell::Int(1));
        assert_eq!(vars["thinpool_BM"], Cell::Int(80));
        assert_eq!(vars["vg_name"], Cell::from("vg01"));
        assert_eq!(vars["VM_LAUNCH_QCOW2"], Cell::from("rhel8.qcow2"));
        assert_eq!(vars["RHEL_RELEASE"], Cell::from("8.10"));
        assert_eq!(vars["THRESHOLD"], Cell::Float(0.75));
        assert_eq!(vars["VM_UPGRADE_QCOW2"], Cell::from(""));
        assert_eq!(vars["F5_VM_LAUNCH_QCOW2"], Cell::from(""));

        // Rendered values keep their sheet types
        let yaml = render_inventory(&inventory, OutputFormat::Yaml).unwrap();
        let raw: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(raw["all"]["vars"]["RHEL_RELEASE"].as_str(), Some("8.10"));
        assert_eq!(raw["all"]["vars"]["THRESHOLD"].as_f64(), Some(0.75));
        assert_eq!(raw["all"]["vars"]["INTERNAL_HOST_DOMAIN"].as_str(), Some(""));
    }

    #[test]
    fn test_recompiling_is_byte_identical() {
        let design = parse_design(SITE_DESIGN).unwrap();

        let first = render_inventory(&compile_inventory(&design), OutputFormat::Yaml).unwrap();
        let second = render_inventory(&compile_inventory(&design), OutputFormat::Yaml).unwrap();
        assert_eq!(first, second);

        let reparsed = parse_design(SITE_DESIGN).unwrap();
        let third = render_inventory(&compile_inventory(&reparsed), OutputFormat::Yaml).unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn test_failed_slot_keeps_names_dense() {
        // The last row leaves slot 2 blank, and the TRUNK set has no usable pool
        let yaml = r#"
Global:
  columns: [Key, Value]
VMLaunchInput:
  columns: ["BM IP", "Vlan set ID", "VM Count", "VMConfig1", "VMConfig2", "VMConfig3"]
  rows:
    - ["10.10.0.5", SITE_A, 1, small]
    - ["10.10.0.6", TRUNK, 1, small]
    - ["10.10.0.5", SITE_A, 3, small, nan, large]
VLANGroup:
  columns: ["Vlan set", VlanID, "VM startips", "Container startip"]
  rows:
    - [SITE_A, 12, "10.0.12.10-12", null]
    - [TRUNK, 30, null, "  "]
ResourceCfg:
  columns: [VMType, VCPU]
"#;
        let inventory = compile_inventory(&parse_design(yaml).unwrap());

        let mut names: Vec<&str> = inventory.vms().map(|vm| vm.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["SITE_A_vm1", "SITE_A_vm2", "SITE_A_vm3"]);
        assert!(inventory.group("TRUNK").is_none());

        // Unknown VM types still produce VMs, with empty maps
        for vm in inventory.vms() {
            assert!(vm.vm_resource.is_empty());
            assert!(vm.vm_partition.is_empty());
        }
    }

    #[test]
    fn test_container_pool_and_wraparound() {
        let yaml = r#"
Global:
  columns: [Key, Value]
VMLaunchInput:
  columns: ["BM IP", "Vlan set ID", "VM Count", "Config A", "Config B", "Config C"]
  rows:
    - ["10.10.0.9", SITE_C, 3, app, app, app]
VLANGroup:
  columns: ["SITE Name", VlanID, "Container startip", "VLANs GW", "VLAN Subnet"]
  rows:
    - [SITE_C, "40.0", "172.16.40.5-6", 172.16.40.254, 172.16.40.0/24]
ResourceCfg:
  columns: [VMType]
"#;
        let inventory = compile_inventory(&parse_design(yaml).unwrap());
        let group = inventory.group("SITE_C").unwrap();

        // Two-address pool wraps, so the third VM joins the first host entry
        assert_eq!(group.hosts.len(), 2);
        let shared = &group.hosts["172.16.40.5"].vms;
        let names: Vec<&str> = shared.iter().map(|vm| vm.name.as_str()).collect();
        assert_eq!(names, vec!["SITE_C_vm1", "SITE_C_vm3"]);
        assert_eq!(
            shared[0].route,
            Some(vec!["172.16.40.0/24 via 172.16.40.254 dev dpbr_40".to_string()])
        );
    }

    #[test]
    fn test_generate_inventory_file() {
        let mut design_file = NamedTempFile::new().unwrap();
        write!(design_file, "{}", SITE_DESIGN).unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("inventory.yml");

        let summary = generate_inventory(design_file.path(), &output, OutputFormat::Yaml).unwrap();
        assert_eq!(summary.vms, 2);
        assert_eq!(summary.hosts, 2);
        assert_eq!(summary.groups, 1);

        let written = fs::read_to_string(&output).unwrap();
        let inventory: Inventory = serde_yaml::from_str(&written).unwrap();
        assert_eq!(inventory, compile_inventory(&load_design(design_file.path()).unwrap()));

        let raw: serde_yaml::Value = serde_yaml::from_str(&written).unwrap();
        let vm = &raw["all"]["children"]["SITE_A"]["hosts"]["10.0.12.10"]["vms"][0];
        assert_eq!(vm["name"].as_str(), Some("SITE_A_vm1"));
        assert_eq!(vm["networkInterface"][0]["ipaddress"].as_str(), Some("10.0.12.10/24"));
        assert_eq!(vm["vm_resource"]["VCPU"].as_i64(), Some(4));
    }

    #[test]
    fn test_missing_sheet_aborts() {
        let mut design_file = NamedTempFile::new().unwrap();
        let yaml = "Global:\n  columns: [Key, Value]\nVMLaunchInput:\n  columns: []\n";
        write!(design_file, "{}", yaml).unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("inventory.yml");

        let err = generate_inventory(design_file.path(), &output, OutputFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("VLANGroup"));
        assert!(!output.exists());
    }
}
