use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Top-level shape of `lsblk -J` output.
#[derive(Debug, Clone, Deserialize)]
pub struct LsblkOutput {
    pub blockdevices: Vec<DeviceRecord>,
}

/// One node of the block-device tree as reported by lsblk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceRecord {
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    /// Human-readable capacity, passed through untouched ("32G").
    #[serde(default, deserialize_with = "text")]
    pub size: String,
    #[serde(default, rename = "type", deserialize_with = "text")]
    pub device_type: String,

    #[serde(default, rename = "fstype", deserialize_with = "text")]
    pub fs_type:    String,
    #[serde(default, rename = "fsver", deserialize_with = "text")]
    pub fs_version: String,
    #[serde(default, deserialize_with = "text")]
    pub label:      String,
    #[serde(default, deserialize_with = "text")]
    pub uuid:       String,
    #[serde(default, rename = "fsavail", deserialize_with = "text")]
    pub available:  String,
    #[serde(default, rename = "fsuse%", deserialize_with = "text")]
    pub used_pct:   String,

    #[serde(default, deserialize_with = "mountpoints")]
    pub mountpoints: Vec<String>,

    #[serde(default, deserialize_with = "children")]
    pub children: Vec<DeviceRecord>,
}

impl DeviceRecord {
    pub fn is_partition(&self) -> bool {
        self.device_type == "part"
    }

    pub fn mount_status(&self) -> MountStatus {
        MountStatus::from_mountpoints(&self.mountpoints)
    }

    /// "Label: value" lines for every populated filesystem field, in a fixed order.
    pub fn fs_details(&self) -> Vec<String> {
        [
            ("Type",      &self.fs_type),
            ("Version",   &self.fs_version),
            ("Label",     &self.label),
            ("Available", &self.available),
            ("Used",      &self.used_pct),
            ("UUID",      &self.uuid),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountStatus {
    NotMounted,
    Mounted(Vec<String>),
}

impl MountStatus {
    pub fn from_mountpoints(points: &[String]) -> Self {
        let mounted: Vec<String> = points.iter().filter(|p| !p.is_empty()).cloned().collect();
        if mounted.is_empty() { MountStatus::NotMounted } else { MountStatus::Mounted(mounted) }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self, MountStatus::Mounted(_))
    }
}

impl fmt::Display for MountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountStatus::NotMounted      => f.write_str("Not mounted"),
            MountStatus::Mounted(points) => f.write_str(&points.join(", ")),
        }
    }
}

/// A partition that is not on the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPartition {
    pub name:       String,
    pub size:       String,
    pub mount:      MountStatus,
    pub fs_type:    String,
    pub label:      String,
    pub fs_details: Vec<String>,
}

impl UnknownPartition {
    pub fn from_record(dev: &DeviceRecord) -> Self {
        Self {
            name:       dev.name.clone(),
            size:       dev.size.clone(),
            mount:      dev.mount_status(),
            fs_type:    dev.fs_type.clone(),
            label:      dev.label.clone(),
            fs_details: dev.fs_details(),
        }
    }

    /// Label when set, otherwise the kernel name.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() { &self.name } else { &self.label }
    }

    pub fn device_path(&self) -> String {
        format!("/dev/{}", self.name)
    }
}

// ── Lenient field decoding ───────────────────────────────────────────

/// Strings pass through, numbers become their decimal text, null is empty.
fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b)   => b.to_string(),
        _                => String::new(),
    })
}

/// `mountpoints` may be null, or contain null entries (unmounted).
fn mountpoints<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let points: Option<Vec<Option<String>>> = Option::deserialize(d)?;
    Ok(points.unwrap_or_default().into_iter().flatten().collect())
}

fn children<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<DeviceRecord>, D::Error> {
    let kids: Option<Vec<DeviceRecord>> = Option::deserialize(d)?;
    Ok(kids.unwrap_or_default())
}
