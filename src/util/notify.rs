use crate::config::Config;
use crate::util::command::{render, CommandRunner};

/// A desktop notification: a title and an optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body:  Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), body: None }
    }

    pub fn with_body(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: Some(body.into()) }
    }
}

/// Fire a desktop notification via `notify-send`.
/// Best-effort: failures (not installed, no notification daemon) are only logged.
pub fn send(runner: &dyn CommandRunner, cfg: &Config, note: &Notification) {
    let program = cfg.commands.notify.as_str();
    let app_name = cfg.notifications.app_name.as_str();

    let mut args: Vec<&str> = Vec::with_capacity(4);
    if !app_name.is_empty() {
        args.extend(["--app-name", app_name]);
    }
    args.push(&note.title);
    if let Some(body) = &note.body {
        args.push(body);
    }

    match runner.run(program, &args) {
        Ok(out) if out.success => {}
        Ok(out) => tracing::debug!(command = %render(program, &args), stderr = out.stderr.trim(), "notification rejected"),
        Err(e)  => tracing::debug!(error = %e, "notification not sent"),
    }
}
