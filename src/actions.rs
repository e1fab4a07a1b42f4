use crate::collectors::partitions;
use crate::config::Config;
use crate::util::command::{succeeded, CommandRunner};
use crate::util::notify::{self, Notification};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Finished,
    Failed,
}

impl SyncOutcome {
    pub fn notification(&self) -> Notification {
        match self {
            SyncOutcome::Finished => Notification::new("Sync finished!"),
            SyncOutcome::Failed   => Notification::new("Sync failed!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmountOutcome {
    /// Enumeration found no unknown partitions at all.
    NothingDetected,
    /// The buffer flush failed, so nothing was touched.
    SyncFailed,
    PartiallyFailed { unmounted: usize, failed: Vec<String> },
    Unmounted(usize),
    /// Unknown partitions exist but none of them was mounted.
    NothingMounted,
}

impl UnmountOutcome {
    pub fn notification(&self) -> Notification {
        match self {
            UnmountOutcome::NothingDetected => Notification::new("No removable drives to unmount"),
            UnmountOutcome::SyncFailed      => Notification::new("Sync failed before unmounting!"),
            UnmountOutcome::PartiallyFailed { failed, .. } => Notification::with_body(
                "Unmount partially failed",
                format!("Failed to unmount: {}", failed.join(", ")),
            ),
            UnmountOutcome::Unmounted(n) => Notification::with_body(
                "Drives unmounted successfully",
                format!("Unmounted {} drive(s)", n),
            ),
            UnmountOutcome::NothingMounted => Notification::new("No mounted drives to unmount"),
        }
    }
}

// ── Sync ─────────────────────────────────────────────────────────────

pub fn flush(runner: &dyn CommandRunner, cfg: &Config) -> SyncOutcome {
    if succeeded(runner, &cfg.commands.sync, &[]) {
        SyncOutcome::Finished
    } else {
        SyncOutcome::Failed
    }
}

/// Flush filesystem buffers and tell the user how it went.
pub fn sync_drives(runner: &dyn CommandRunner, cfg: &Config) -> SyncOutcome {
    let outcome = flush(runner, cfg);
    tracing::info!(?outcome, "sync");
    notify::send(runner, cfg, &outcome.notification());
    outcome
}

// ── Unmount ──────────────────────────────────────────────────────────

/// Flush, then unmount every mounted unknown partition. One failure does not
/// stop the others; the user gets a single summary notification.
pub fn unmount_unknown(runner: &dyn CommandRunner, cfg: &Config) -> UnmountOutcome {
    let outcome = try_unmount(runner, cfg);
    tracing::info!(?outcome, "unmount");
    notify::send(runner, cfg, &outcome.notification());
    outcome
}

fn try_unmount(runner: &dyn CommandRunner, cfg: &Config) -> UnmountOutcome {
    let found = partitions::enumerate(runner, &cfg.commands.lsblk, &cfg.partitions);
    if found.is_empty() {
        return UnmountOutcome::NothingDetected;
    }

    if flush(runner, cfg) == SyncOutcome::Failed {
        return UnmountOutcome::SyncFailed;
    }

    let mut unmounted = 0;
    let mut failed = Vec::new();
    for part in found.iter().filter(|p| p.mount.is_mounted()) {
        let path = part.device_path();
        if succeeded(runner, &cfg.commands.umount, &[path.as_str()]) {
            unmounted += 1;
        } else {
            failed.push(part.name.clone());
        }
    }

    if !failed.is_empty() {
        UnmountOutcome::PartiallyFailed { unmounted, failed }
    } else if unmounted > 0 {
        UnmountOutcome::Unmounted(unmounted)
    } else {
        UnmountOutcome::NothingMounted
    }
}
