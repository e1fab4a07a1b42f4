use crate::collectors::lsblk;
use crate::config::AllowList;
use crate::models::device::{DeviceRecord, UnknownPartition};
use crate::util::command::CommandRunner;
use std::collections::HashSet;

/// Partitions currently attached that are not on the allow-list.
///
/// Fails soft: if lsblk is missing, exits non-zero or prints something that
/// does not parse, the result is empty.
pub fn enumerate(runner: &dyn CommandRunner, lsblk_program: &str, known: &AllowList) -> Vec<UnknownPartition> {
    match lsblk::run_lsblk(runner, lsblk_program) {
        Ok(devices) => unknown_partitions(&devices, known),
        Err(e) => {
            tracing::warn!("block device enumeration failed: {:#}", e);
            Vec::new()
        }
    }
}

/// Depth-first walk of the device tree, in declared order.
///
/// An allow-listed node is skipped itself, but its children are still
/// checked one by one. Each partition name is reported at most once.
pub fn unknown_partitions(devices: &[DeviceRecord], known: &AllowList) -> Vec<UnknownPartition> {
    let mut found = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&DeviceRecord> = devices.iter().rev().collect();

    while let Some(dev) = stack.pop() {
        stack.extend(dev.children.iter().rev());

        if known.contains(&dev.name) {
            tracing::debug!(name = %dev.name, "known device");
            continue;
        }
        if !dev.is_partition() {
            continue;
        }
        if !seen.insert(dev.name.as_str()) {
            continue;
        }
        let part = UnknownPartition::from_record(dev);
        tracing::debug!(name = %part.name, size = %part.size, fstype = %part.fs_type, mount = %part.mount, "unknown partition");
        found.push(part);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::device::MountStatus;
    use crate::util::command::fake::FakeRunner;
    use crate::util::command::CommandOutput;

    fn dev(name: &str, kind: &str, children: Vec<DeviceRecord>) -> DeviceRecord {
        DeviceRecord {
            name:        name.into(),
            size:        "32G".into(),
            device_type: kind.into(),
            children,
            ..Default::default()
        }
    }

    fn names(parts: &[UnknownPartition]) -> Vec<&str> {
        parts.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn fully_known_tree_yields_nothing() {
        let tree = vec![
            dev("sda", "disk", vec![dev("sda1", "part", vec![])]),
            dev("zram0", "disk", vec![]),
            dev("nvme0n1", "disk", vec![dev("nvme0n1p1", "part", vec![]), dev("nvme0n1p2", "part", vec![])]),
        ];
        assert!(unknown_partitions(&tree, &AllowList::default()).is_empty());
    }

    #[test]
    fn disks_are_never_reported_but_their_partitions_are() {
        let tree = vec![dev("sdb", "disk", vec![dev("sdb1", "part", vec![]), dev("sdb2", "part", vec![])])];
        let found = unknown_partitions(&tree, &AllowList::new(["sda1"]));
        assert_eq!(names(&found), vec!["sdb1", "sdb2"]);
    }

    #[test]
    fn known_parent_does_not_exempt_children() {
        let tree = vec![dev("sdb", "disk", vec![dev("sdb1", "part", vec![])])];
        let found = unknown_partitions(&tree, &AllowList::new(["sdb"]));
        assert_eq!(names(&found), vec!["sdb1"]);
    }

    #[test]
    fn known_partition_still_has_its_children_checked() {
        let tree = vec![dev("sdb", "disk", vec![
            dev("sdb1", "part", vec![dev("sdb1x", "part", vec![])]),
        ])];
        let found = unknown_partitions(&tree, &AllowList::new(["sdb1"]));
        assert_eq!(names(&found), vec!["sdb1x"]);
    }

    #[test]
    fn partition_seen_twice_is_reported_once() {
        let tree = vec![
            dev("sdb1", "part", vec![]),
            dev("sdb", "disk", vec![dev("sdb1", "part", vec![])]),
        ];
        let found = unknown_partitions(&tree, &AllowList::default());
        assert_eq!(names(&found), vec!["sdb1"]);
    }

    #[test]
    fn deep_nesting_is_walked_in_order() {
        let mut node = dev("leaf", "part", vec![]);
        for i in 0..1_000 {
            node = dev(&format!("n{}", i), "disk", vec![node]);
        }
        let tree = vec![node, dev("sdz1", "part", vec![])];
        let found = unknown_partitions(&tree, &AllowList::default());
        assert_eq!(names(&found), vec!["leaf", "sdz1"]);
    }

    #[test]
    fn node_without_type_is_skipped_but_its_children_are_not() {
        let tree = lsblk::parse_lsblk(
            r#"{"blockdevices": [{"name": "x", "children": [{"name": "sdq1", "type": "part"}]}]}"#,
        )
        .unwrap();
        let found = unknown_partitions(&tree, &AllowList::default());
        assert_eq!(names(&found), vec!["sdq1"]);
    }

    #[test]
    fn enumerate_builds_partition_summaries() {
        let runner = FakeRunner::new(|_, _| {
            Ok(CommandOutput::ok(
                r#"{"blockdevices": [
                    {"name": "sda", "size": "1T", "type": "disk",
                     "children": [{"name": "sda1", "size": "1T", "type": "part", "mountpoints": ["/"]}]},
                    {"name": "sdb", "size": "32G", "type": "disk", "mountpoints": [null],
                     "children": [{"name": "sdb1", "size": "32G", "type": "part", "label": "",
                                   "fstype": "vfat", "uuid": "AB-12",
                                   "mountpoints": ["/mnt/usb", null]}]}
                ]}"#,
            ))
        });
        let found = enumerate(&runner, "lsblk", &AllowList::new(["sda1"]));
        assert_eq!(found.len(), 1);
        let p = &found[0];
        assert_eq!(p.name, "sdb1");
        assert_eq!(p.mount, MountStatus::Mounted(vec!["/mnt/usb".into()]));
        assert_eq!(p.fs_details, vec!["Type: vfat", "UUID: AB-12"]);
    }

    #[test]
    fn enumerate_fails_soft() {
        let missing = FakeRunner::new(|_, _| Err(anyhow::anyhow!("lsblk not found")));
        assert!(enumerate(&missing, "lsblk", &AllowList::default()).is_empty());

        let failing = FakeRunner::new(|_, _| Ok(CommandOutput::failed("boom")));
        assert!(enumerate(&failing, "lsblk", &AllowList::default()).is_empty());

        let garbage = FakeRunner::new(|_, _| Ok(CommandOutput::ok("{\"blockdevices\": 3}")));
        assert!(enumerate(&garbage, "lsblk", &AllowList::default()).is_empty());
    }
}
