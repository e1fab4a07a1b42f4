use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub partitions: AllowList,

    #[serde(default)]
    pub commands: CommandsConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Partitions that are always expected to be present (root, swap, EFI …).
/// Anything of type `part` not listed here is reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowList {
    pub known: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub lsblk:  String,
    pub sync:   String,
    pub umount: String,
    pub notify: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Prefix of the bar text
    pub marker: String,
    /// Prefix of each partition header in the tooltip
    pub device: String,
    pub mount:  String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Passed as `--app-name`. Empty = flag omitted.
    pub app_name: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for AllowList {
    fn default() -> Self {
        Self::new(["sda1", "zram0", "nvme0n1p1", "nvme0n1p2"])
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            lsblk:  "lsblk".into(),
            sync:   "sync".into(),
            umount: "umount".into(),
            notify: "notify-send".into(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            marker: "🔌".into(),
            device: "📱".into(),
            mount:  "📍".into(),
            detail: "🔧".into(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { app_name: "drivemon".into() }
    }
}

impl AllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { known: names.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.known.contains(name)
    }
}

// ── Load ─────────────────────────────────────────────────────────────

impl Config {
    /// Compiled-in defaults, overridden by `explicit` or the per-user file
    /// when one exists. Never fails; a broken file is logged and ignored.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(p) => p,
            None    => return Config::default(),
        };
        if explicit.is_none() && !path.exists() {
            return Config::default();
        }
        match try_load(&path) {
            Ok(c)  => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("drivemon").join("drivemon.toml"))
    }
}

fn try_load(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&text)?;
    Ok(cfg)
}
