//! Design document types.
//!
//! A design document is the tabular export of a VM launch workbook. Each
//! sheet is kept as an ordered header row plus data rows so that column
//! order (which decides VM slot order) survives the export. The loader in
//! [`crate::design_loader`] turns the raw [`DesignDocument`] into a
//! normalized [`Design`].

use crate::resource::ResourceCatalog;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sheet holding global key/value settings
pub const GLOBAL_SHEET: &str = "Global";
/// Sheet holding one host-launch request per row
pub const VM_LAUNCH_SHEET: &str = "VMLaunchInput";
/// Sheet holding VLAN memberships per VLAN set
pub const VLAN_GROUP_SHEET: &str = "VLANGroup";
/// Sheet holding VM type resource templates
pub const RESOURCE_SHEET: &str = "ResourceCfg";

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Blank cells are null, whitespace-only, `nan` or a NaN float.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Float(f) => f.is_nan(),
            Cell::Text(s) => {
                let s = s.trim();
                s.is_empty() || s.eq_ignore_ascii_case("nan")
            }
            Cell::Bool(_) | Cell::Int(_) => false,
        }
    }

    /// Trimmed textual rendering, or `None` for blank cells.
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        match self {
            Cell::Text(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Numeric reading of the cell, accepting decimal strings like `"12.0"`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Int(i) => *i as f64,
            Cell::Float(f) => *f,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" the workbook shows for whole floats
            Cell::Float(x) => write!(f, "{:?}", x),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<serde_yaml::Value> for Cell {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map(Cell::Float).unwrap_or_default(),
            },
            Value::String(s) => Cell::Text(s),
            Value::Tagged(tagged) => Cell::from(tagged.value),
            nested @ (Value::Sequence(_) | Value::Mapping(_)) => {
                let rendered = serde_yaml::to_string(&nested).unwrap_or_default();
                Cell::Text(rendered.trim().to_string())
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_yaml::Value::deserialize(deserializer).map(Cell::from)
    }
}

/// Cells are written back as their native YAML scalar; blank cells as null.
impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(f) if !f.is_nan() => serializer.serialize_f64(*f),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Empty | Cell::Float(_) => serializer.serialize_none(),
        }
    }
}

/// One exported sheet: header names plus data rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Index of the column with exactly this (trimmed) name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.trim() == name)
    }

    /// Index of the first column matching any of `names`, ignoring case
    pub fn column_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| {
            self.columns
                .iter()
                .position(|c| c.trim().eq_ignore_ascii_case(name))
        })
    }

    /// Cell at `row`/`column`; short rows read as empty cells.
    pub fn cell<'a>(&self, row: &'a [Cell], column: Option<usize>) -> &'a Cell {
        const EMPTY: &Cell = &Cell::Empty;
        column.and_then(|idx| row.get(idx)).unwrap_or(EMPTY)
    }
}

/// Raw design document as read from disk.
#[derive(Debug, Default, Deserialize)]
pub struct DesignDocument {
    #[serde(rename = "Global")]
    pub global: Option<Table>,
    #[serde(rename = "VMLaunchInput")]
    pub vm_launch: Option<Table>,
    #[serde(rename = "VLANGroup")]
    pub vlan_group: Option<Table>,
    #[serde(rename = "ResourceCfg")]
    pub resource_cfg: Option<Table>,
    #[serde(default)]
    pub settings: CompilerSettings,
}

impl DesignDocument {
    /// All four sheets must be present
    pub fn validate(&self) -> Result<(), DesignError> {
        let missing: Vec<String> = [
            (GLOBAL_SHEET, self.global.is_none()),
            (VM_LAUNCH_SHEET, self.vm_launch.is_none()),
            (VLAN_GROUP_SHEET, self.vlan_group.is_none()),
            (RESOURCE_SHEET, self.resource_cfg.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();

        if !missing.is_empty() {
            return Err(DesignError::MissingTables(missing));
        }
        Ok(())
    }
}

/// Compiler knobs carried in the optional `settings:` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Prefix of the bridge name derived from a VLAN id
    pub bridge_prefix: String,
    /// Default for the `thinpool_BM` inventory variable
    pub thinpool_bm: i64,
    /// Default for the `vg_name` inventory variable
    pub vg_name: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            bridge_prefix: "dpbr_".to_string(),
            thinpool_bm: 80,
            vg_name: "vg01".to_string(),
        }
    }
}

/// One host-launch request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesignRow {
    /// Management address of the baremetal host
    pub bm_ip: Option<String>,
    /// VLAN set the VMs belong to
    pub scope: Option<String>,
    pub vm_count: u32,
    /// VM type selectors, slot 1 first. `None` marks a blank selector.
    pub vm_types: Vec<Option<String>>,
}

/// One VLAN membership of a VLAN set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VlanRow {
    pub scope: Option<String>,
    pub vlan_id: Cell,
    pub vm_start_ips: Option<String>,
    pub container_start_ips: Option<String>,
    pub launch_gw: Option<String>,
    pub other_vlans_gw: Option<String>,
    pub subnet: Option<String>,
}

impl VlanRow {
    /// Address pool specification: the VM column wins over the container one.
    pub fn pool_spec(&self) -> Option<&str> {
        self.vm_start_ips
            .as_deref()
            .or(self.container_start_ips.as_deref())
    }
}

/// Normalized design, ready for compilation.
#[derive(Debug, Clone, Default)]
pub struct Design {
    /// Global key/value pairs in sheet order
    pub globals: Vec<(String, Cell)>,
    pub launches: Vec<DesignRow>,
    pub vlans: Vec<VlanRow>,
    pub resources: ResourceCatalog,
    pub settings: CompilerSettings,
}

/// Fatal problems with a design document
#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    #[error("Missing required tables: {}", .0.join(", "))]
    MissingTables(Vec<String>),
    #[error("Table {table} is missing required column '{column}'")]
    MissingColumn { table: String, column: String },
    #[error("Table {table} is malformed: {reason}")]
    MalformedTable { table: String, reason: String },
}
