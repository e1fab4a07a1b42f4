use crate::config::DisplayConfig;
use crate::models::device::UnknownPartition;
use serde::Serialize;

pub const CLASS_HIDDEN:   &str = "hidden";
pub const CLASS_DETECTED: &str = "drive-detected";

/// Waybar custom-module payload. An empty `text` hides the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPayload {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub class: &'static str,
}

impl StatusPayload {
    pub fn hidden() -> Self {
        Self { text: String::new(), tooltip: None, class: CLASS_HIDDEN }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn build_status(partitions: &[UnknownPartition], display: &DisplayConfig) -> StatusPayload {
    let text = match partitions {
        []  => return StatusPayload::hidden(),
        [p] => format!("{} {} ({})", display.marker, p.display_name(), p.size),
        ps  => format!("{} {} drives", display.marker, ps.len()),
    };

    StatusPayload {
        text,
        tooltip: Some(tooltip(partitions, display)),
        class:   CLASS_DETECTED,
    }
}

/// One block per partition: header, mount line, detail lines, blank separator.
fn tooltip(partitions: &[UnknownPartition], display: &DisplayConfig) -> String {
    let mut lines: Vec<String> = Vec::new();

    for p in partitions {
        let mut header = format!("{} {} ({})", display.device, p.name, p.size);
        if !p.label.is_empty() {
            header.push_str(&format!(" - {}", p.label));
        }
        lines.push(header);
        lines.push(format!("   {} {}", display.mount, p.mount));
        for info in &p.fs_details {
            lines.push(format!("   {} {}", display.detail, info));
        }
        lines.push(String::new());
    }

    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
