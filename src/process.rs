//! External process execution.

use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Run a command to completion and report whether it exited successfully.
///
/// With `verbose` the child inherits stdout and stderr so backend output
/// streams through; otherwise both are discarded. Blocks until the child
/// exits, however long that takes; timeouts are the caller's concern.
/// An error means the process could not be started at all. A non-zero exit
/// is `Ok(false)`.
pub fn run(mut cmd: Command, verbose: bool) -> Result<bool> {
    if verbose {
        println!("  Running: {}", render(&cmd));
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    } else {
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let status = cmd
        .status()
        .with_context(|| format!("failed to execute '{}'", cmd.get_program().to_string_lossy()))?;
    Ok(status.success())
}

/// One-line rendering of a command for progress output.
fn render(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_exit_is_true() {
        assert!(run(Command::new("true"), false).unwrap());
    }

    #[test]
    fn nonzero_exit_is_false() {
        assert!(!run(Command::new("false"), false).unwrap());
    }

    #[test]
    fn missing_program_is_an_error() {
        assert!(run(Command::new("definitely_not_a_real_command_12345"), false).is_err());
    }

    #[test]
    fn render_joins_program_and_args() {
        let mut cmd = Command::new("debos");
        cmd.arg("-t").arg("suite:bullseye");
        assert_eq!(render(&cmd), "debos -t suite:bullseye");
    }
}
