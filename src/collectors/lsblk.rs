use crate::models::device::{DeviceRecord, LsblkOutput};
use crate::util::command::{render, CommandRunner};
use anyhow::{bail, Context, Result};

/// Columns requested from lsblk; `--fs` adds the filesystem view.
pub const LSBLK_ARGS: &[&str] = &[
    "--fs",
    "-J",
    "-o",
    "NAME,SIZE,TYPE,FSTYPE,FSVER,LABEL,UUID,FSAVAIL,FSUSE%,MOUNTPOINTS",
];

/// Run lsblk and return the top-level devices with their nested children.
pub fn run_lsblk(runner: &dyn CommandRunner, program: &str) -> Result<Vec<DeviceRecord>> {
    let out = runner
        .run(program, LSBLK_ARGS)
        .context("lsblk not found")?;

    if !out.success {
        bail!("{} exited with failure: {}", render(program, LSBLK_ARGS), out.stderr.trim());
    }
    if out.stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    parse_lsblk(&out.stdout)
}

pub fn parse_lsblk(json: &str) -> Result<Vec<DeviceRecord>> {
    let parsed: LsblkOutput = serde_json::from_str(json).context("unexpected lsblk output")?;
    Ok(parsed.blockdevices)
}
