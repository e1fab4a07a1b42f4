use anyhow::{Context, Result};
use std::process::Command;

/// Captured result of one external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout:  String,
    pub stderr:  String,
}

/// Narrow seam over "run this program, wait, give me its output".
///
/// `Err` means the program could not be started at all. A program that ran
/// and exited non-zero is `Ok` with `success == false`.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Runs commands on the host, blocking until each one exits.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let out = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("{} not found", program))?;

        Ok(CommandOutput {
            success: out.status.success(),
            stdout:  String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr:  String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

/// Single-line rendering of a command, for log output.
pub fn render(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Run a command whose only contract is its exit status.
pub fn succeeded(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> bool {
    match runner.run(program, args) {
        Ok(out) if out.success => true,
        Ok(out) => {
            tracing::warn!(command = %render(program, args), stderr = out.stderr.trim(), "command failed");
            false
        }
        Err(e) => {
            tracing::warn!(command = %render(program, args), error = %e, "command could not be started");
            false
        }
    }
}

#[cfg(test)]
pub mod fake {
    use super::{render, CommandOutput, CommandRunner};
    use anyhow::Result;
    use std::cell::RefCell;

    impl CommandOutput {
        pub fn ok(stdout: &str) -> Self {
            Self { success: true, stdout: stdout.to_string(), stderr: String::new() }
        }

        pub fn failed(stderr: &str) -> Self {
            Self { success: false, stdout: String::new(), stderr: stderr.to_string() }
        }
    }

    /// Scripted runner: answers every call through `respond` and records
    /// the rendered command line.
    pub struct FakeRunner<F> {
        respond: F,
        calls:   RefCell<Vec<String>>,
    }

    impl<F> FakeRunner<F>
    where
        F: Fn(&str, &[&str]) -> Result<CommandOutput>,
    {
        pub fn new(respond: F) -> Self {
            Self { respond, calls: RefCell::new(Vec::new()) }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub fn calls_to(&self, program: &str) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| c == program || c.starts_with(&format!("{} ", program)))
                .collect()
        }
    }

    impl<F> CommandRunner for FakeRunner<F>
    where
        F: Fn(&str, &[&str]) -> Result<CommandOutput>,
    {
        fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
            self.calls.borrow_mut().push(render(program, args));
            (self.respond)(program, args)
        }
    }
}
